//! Solidity bindings for the parts of the FlightSurety contracts the
//! simulator touches, plus conversions from their logs into domain types.

use alloy_primitives::{LogData, U256};
use alloy_sol_types::{SolEvent, sol};

use crate::domain::{FlightStatusInfo, OracleRequest};
use crate::error::SimulatorError;

sol! {
    interface FlightSuretyData {
        function authorizeCaller(address caller) external;
    }

    interface FlightSuretyApp {
        function isOperational() external view returns (bool);
        function REGISTRATION_FEE() external view returns (uint256);
        function registerOracle() external payable;
        function getMyIndexes() external view returns (uint8[3]);
        function submitOracleResponse(
            uint8 index,
            address airline,
            string flight,
            uint256 timestamp,
            uint8 statusCode
        ) external;
        function fetchFlightStatus(address airline, string flight, uint256 timestamp) external;

        event OracleRequest(uint8 index, address airline, string flight, uint256 timestamp);
        event FlightStatusInfo(address airline, string flight, uint256 timestamp, uint8 status);
    }
}

pub(super) fn abi_error(e: alloy_sol_types::Error) -> SimulatorError {
    SimulatorError::Abi(e.to_string())
}

fn timestamp_u64(timestamp: U256) -> Result<u64, SimulatorError> {
    u64::try_from(timestamp)
        .map_err(|_| SimulatorError::Abi(format!("timestamp {timestamp} exceeds u64")))
}

/// Decodes an `OracleRequest` log.
pub(super) fn oracle_request_from_log(
    log: &LogData,
    block_number: Option<u64>,
) -> Result<OracleRequest, SimulatorError> {
    let event = FlightSuretyApp::OracleRequest::decode_log_data(log).map_err(abi_error)?;
    Ok(OracleRequest {
        index: event.index,
        airline: event.airline,
        flight: event.flight,
        timestamp: timestamp_u64(event.timestamp)?,
        block_number,
    })
}

/// Decodes a `FlightStatusInfo` log.
pub(super) fn flight_status_from_log(
    log: &LogData,
    block_number: Option<u64>,
) -> Result<FlightStatusInfo, SimulatorError> {
    let event = FlightSuretyApp::FlightStatusInfo::decode_log_data(log).map_err(abi_error)?;
    Ok(FlightStatusInfo {
        airline: event.airline,
        flight: event.flight,
        timestamp: timestamp_u64(event.timestamp)?,
        status: event.status,
        block_number,
    })
}
