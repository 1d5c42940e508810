//! Data Transfer Objects for REST request/response serialization.
//!
//! Addresses travel as `0x`-prefixed hex strings.

pub mod flight_dto;
pub mod oracle_dto;

pub use flight_dto::*;
pub use oracle_dto::*;
