//! Ethereum account addresses.
//!
//! The simulator uses [`alloy_primitives::Address`] for oracle accounts,
//! airlines and contract addresses. It displays in EIP-55 checksummed form
//! and serializes as a `0x`-prefixed hex string.

pub use alloy_primitives::Address;

use crate::error::SimulatorError;

/// Parses a `0x`-prefixed or bare 40-digit hex address.
///
/// Mixed-case input is accepted without checksum validation.
///
/// # Errors
///
/// Returns [`SimulatorError::InvalidAddress`] if `text` is not 20 bytes of hex.
pub fn parse_address(text: &str) -> Result<Address, SimulatorError> {
    text.trim()
        .parse::<Address>()
        .map_err(|e| SimulatorError::InvalidAddress(format!("{text}: {e}")))
}
