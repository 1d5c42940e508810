//! JSON-RPC implementation of [`OracleContract`].
//!
//! Transactions are sent with `eth_sendTransaction`, so every `from`
//! account must be unlocked on the node (Ganache/Hardhat style). A
//! transaction counts as successful only once its receipt reports status
//! `0x1`.

use std::time::Duration;

use alloy_primitives::{B256, Bytes, LogData, U64, U256};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::Instant;

use super::abi::{self, FlightSuretyApp, FlightSuretyData};
use super::rpc::JsonRpcClient;
use super::{OracleContract, TxHash, Wei};
use crate::config::SimulatorConfig;
use crate::domain::{Address, FlightStatusInfo, OracleRequest, OracleResponse};
use crate::error::SimulatorError;

/// `eth_call` / `eth_sendTransaction` parameter object.
#[derive(Debug, Serialize)]
struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
    to: Address,
    data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<U256>,
}

/// Subset of a transaction receipt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    status: Option<U64>,
}

impl TransactionReceipt {
    /// Pre-Byzantium receipts carry no status; they count as success.
    fn succeeded(&self) -> bool {
        self.status.is_none_or(|s| s == U64::from(1))
    }
}

/// `eth_getLogs` filter object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogFilter {
    address: Address,
    topics: Vec<B256>,
    from_block: U64,
    to_block: U64,
}

/// Subset of a log entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEntry {
    #[serde(default)]
    topics: Vec<B256>,
    data: Bytes,
    #[serde(default)]
    block_number: Option<U64>,
}

impl LogEntry {
    fn block(&self) -> Option<u64> {
        self.block_number.map(|b| b.to::<u64>())
    }
}

/// Client for the deployed `FlightSuretyApp` / `FlightSuretyData` pair.
#[derive(Debug)]
pub struct FlightSuretyClient {
    rpc: JsonRpcClient,
    app_address: Address,
    data_address: Address,
    gas_limit: u64,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl FlightSuretyClient {
    /// Creates a client with default gas and receipt polling settings.
    #[must_use]
    pub fn new(rpc: JsonRpcClient, app_address: Address, data_address: Address) -> Self {
        Self {
            rpc,
            app_address,
            data_address,
            gas_limit: 3_000_000,
            receipt_poll_interval: Duration::from_millis(500),
            receipt_timeout: Duration::from_secs(30),
        }
    }

    /// Creates a client from the process configuration.
    #[must_use]
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(
            JsonRpcClient::new(config.rpc_url.clone()),
            config.app_address,
            config.data_address,
        )
        .with_gas_limit(config.gas_limit)
        .with_receipt_polling(config.poll_interval, config.receipt_timeout)
    }

    /// Overrides the gas limit attached to transactions.
    #[must_use]
    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Overrides how receipts are awaited.
    #[must_use]
    pub const fn with_receipt_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self.receipt_timeout = timeout;
        self
    }

    /// Application contract address.
    #[must_use]
    pub const fn app_address(&self) -> Address {
        self.app_address
    }

    /// Data contract address.
    #[must_use]
    pub const fn data_address(&self) -> Address {
        self.data_address
    }

    async fn call(
        &self,
        from: Option<Address>,
        to: Address,
        data: Vec<u8>,
    ) -> Result<Bytes, SimulatorError> {
        let request = TransactionRequest {
            from,
            to,
            data: data.into(),
            gas: None,
            value: None,
        };
        self.rpc.request("eth_call", json!([request, "latest"])).await
    }

    async fn transact(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
        value: Wei,
    ) -> Result<TxHash, SimulatorError> {
        let request = TransactionRequest {
            from: Some(from),
            to,
            data: data.into(),
            gas: Some(U64::from(self.gas_limit)),
            value: (value > U256::ZERO).then_some(value),
        };
        let tx_hash: TxHash = self
            .rpc
            .request("eth_sendTransaction", json!([request]))
            .await?;
        self.wait_for_receipt(tx_hash).await
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxHash, SimulatorError> {
        let started = Instant::now();
        loop {
            let receipt: Option<TransactionReceipt> = self
                .rpc
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if let Some(receipt) = receipt {
                return if receipt.succeeded() {
                    Ok(receipt.transaction_hash)
                } else {
                    Err(SimulatorError::Reverted {
                        tx_hash: receipt.transaction_hash,
                    })
                };
            }
            if started.elapsed() >= self.receipt_timeout {
                return Err(SimulatorError::ReceiptTimeout {
                    tx_hash,
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }

    async fn logs(
        &self,
        topic: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogEntry>, SimulatorError> {
        let filter = LogFilter {
            address: self.app_address,
            topics: vec![topic],
            from_block: U64::from(from_block),
            to_block: U64::from(to_block),
        };
        self.rpc.request("eth_getLogs", json!([filter])).await
    }
}

/// Decodes each log, skipping malformed ones with a warning.
fn decode_logs<T>(
    event: &'static str,
    entries: Vec<LogEntry>,
    decode: impl Fn(&LogData, Option<u64>) -> Result<T, SimulatorError>,
) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let block = entry.block();
            let decoded = LogData::new(entry.topics, entry.data)
                .ok_or_else(|| SimulatorError::Abi("too many log topics".to_string()))
                .and_then(|log| decode(&log, block));
            match decoded {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(event, block, error = %e, "skipping malformed log");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl OracleContract for FlightSuretyClient {
    async fn accounts(&self) -> Result<Vec<Address>, SimulatorError> {
        self.rpc.request("eth_accounts", json!([])).await
    }

    async fn is_operational(&self) -> Result<bool, SimulatorError> {
        let data = FlightSuretyApp::isOperationalCall {}.abi_encode();
        let output = self.call(None, self.app_address, data).await?;
        FlightSuretyApp::isOperationalCall::abi_decode_returns(&output)
            .map_err(abi::abi_error)
    }

    async fn authorize_caller(
        &self,
        owner: Address,
        caller: Address,
    ) -> Result<TxHash, SimulatorError> {
        let data = FlightSuretyData::authorizeCallerCall { caller }.abi_encode();
        self.transact(owner, self.data_address, data, Wei::ZERO)
            .await
    }

    async fn registration_fee(&self) -> Result<Wei, SimulatorError> {
        let data = FlightSuretyApp::REGISTRATION_FEECall {}.abi_encode();
        let output = self.call(None, self.app_address, data).await?;
        FlightSuretyApp::REGISTRATION_FEECall::abi_decode_returns(&output)
            .map_err(abi::abi_error)
    }

    async fn register_oracle(&self, oracle: Address, fee: Wei) -> Result<TxHash, SimulatorError> {
        let data = FlightSuretyApp::registerOracleCall {}.abi_encode();
        self.transact(oracle, self.app_address, data, fee).await
    }

    async fn get_my_indexes(&self, oracle: Address) -> Result<Vec<u8>, SimulatorError> {
        let data = FlightSuretyApp::getMyIndexesCall {}.abi_encode();
        let output = self.call(Some(oracle), self.app_address, data).await?;
        let indexes = FlightSuretyApp::getMyIndexesCall::abi_decode_returns(&output)
            .map_err(abi::abi_error)?;
        Ok(indexes.to_vec())
    }

    async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxHash, SimulatorError> {
        let data = FlightSuretyApp::submitOracleResponseCall {
            index: response.index,
            airline: response.airline,
            flight: response.flight.clone(),
            timestamp: U256::from(response.timestamp),
            statusCode: response.status_code.code(),
        }
        .abi_encode();
        self.transact(oracle, self.app_address, data, Wei::ZERO)
            .await
    }

    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxHash, SimulatorError> {
        let data = FlightSuretyApp::fetchFlightStatusCall {
            airline,
            flight: flight.to_string(),
            timestamp: U256::from(timestamp),
        }
        .abi_encode();
        self.transact(from, self.app_address, data, Wei::ZERO)
            .await
    }

    async fn block_number(&self) -> Result<u64, SimulatorError> {
        let head: U64 = self.rpc.request("eth_blockNumber", json!([])).await?;
        Ok(head.to::<u64>())
    }

    async fn oracle_requests(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<OracleRequest>, SimulatorError> {
        let entries = self
            .logs(
                FlightSuretyApp::OracleRequest::SIGNATURE_HASH,
                from_block,
                to_block,
            )
            .await?;
        Ok(decode_logs(
            "OracleRequest",
            entries,
            abi::oracle_request_from_log,
        ))
    }

    async fn flight_status_infos(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<FlightStatusInfo>, SimulatorError> {
        let entries = self
            .logs(
                FlightSuretyApp::FlightStatusInfo::SIGNATURE_HASH,
                from_block,
                to_block,
            )
            .await?;
        Ok(decode_logs(
            "FlightStatusInfo",
            entries,
            abi::flight_status_from_log,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const HASH: &str = "0x00000000000000000000000000000000000000000000000000000000000000a1";

    fn parse_receipt(json: &str) -> TransactionReceipt {
        let Ok(receipt) = serde_json::from_str(json) else {
            panic!("receipt should parse");
        };
        receipt
    }

    #[test]
    fn receipt_status_decides_success() {
        let ok = parse_receipt(&format!(r#"{{"transactionHash":"{HASH}","status":"0x1"}}"#));
        assert!(ok.succeeded());
        assert_eq!(ok.transaction_hash, B256::from(U256::from(0xa1)));
        assert!(
            !parse_receipt(&format!(r#"{{"transactionHash":"{HASH}","status":"0x0"}}"#))
                .succeeded()
        );
        assert!(parse_receipt(&format!(r#"{{"transactionHash":"{HASH}"}}"#)).succeeded());
    }

    #[test]
    fn transaction_request_omits_empty_fields() {
        let request = TransactionRequest {
            from: None,
            to: Address::new([1u8; 20]),
            data: Bytes::from_static(&[0x8d, 0xa5, 0xcb, 0x5b]),
            gas: None,
            value: None,
        };
        let json = serde_json::to_value(&request).unwrap_or_default();
        assert_eq!(
            json,
            json!({"to": "0x0101010101010101010101010101010101010101", "data": "0x8da5cb5b"})
        );
    }

    #[test]
    fn transaction_request_encodes_quantities() {
        let request = TransactionRequest {
            from: Some(Address::new([1u8; 20])),
            to: Address::new([2u8; 20]),
            data: Bytes::new(),
            gas: Some(U64::from(3_000_000u64)),
            value: Some(U256::from(1_000_000_000_000_000_000u128)),
        };
        let json = serde_json::to_value(&request).unwrap_or_default();
        assert_eq!(json["gas"], "0x2dc6c0");
        assert_eq!(json["value"], "0xde0b6b3a7640000");
    }

    #[test]
    fn log_filter_uses_camel_case_quantities() {
        let filter = LogFilter {
            address: Address::ZERO,
            topics: vec![FlightSuretyApp::OracleRequest::SIGNATURE_HASH],
            from_block: U64::from(0),
            to_block: U64::from(255),
        };
        let json = serde_json::to_value(&filter).unwrap_or_default();
        assert_eq!(json["fromBlock"], "0x0");
        assert_eq!(json["toBlock"], "0xff");
        assert_eq!(
            json["topics"][0],
            FlightSuretyApp::OracleRequest::SIGNATURE_HASH.to_string()
        );
    }

    #[test]
    fn malformed_logs_are_skipped() {
        let good = FlightSuretyApp::OracleRequest {
            index: 1,
            airline: Address::new([3u8; 20]),
            flight: "TK1234".to_string(),
            timestamp: U256::from(99),
        }
        .encode_log_data();
        let entries = vec![
            LogEntry {
                topics: good.topics().to_vec(),
                data: good.data.clone(),
                block_number: Some(U64::from(5)),
            },
            LogEntry {
                topics: good.topics().to_vec(),
                data: Bytes::from_static(&[0x12, 0x34]),
                block_number: Some(U64::from(6)),
            },
        ];
        let decoded = decode_logs("OracleRequest", entries, abi::oracle_request_from_log);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.first().map(|r| r.block_number), Some(Some(5)));
        assert_eq!(decoded.first().map(|r| r.timestamp), Some(99));
    }

    #[test]
    fn log_entry_parses_node_json() {
        let topic = FlightSuretyApp::FlightStatusInfo::SIGNATURE_HASH;
        let json = format!(r#"{{"topics":["{topic}"],"data":"0x","blockNumber":"0x1f"}}"#);
        let Ok(entry) = serde_json::from_str::<LogEntry>(&json) else {
            panic!("log entry should parse");
        };
        assert_eq!(entry.block(), Some(31));
        assert_eq!(entry.topics, vec![topic]);
        assert!(entry.data.is_empty());
    }

    #[test]
    fn builder_overrides_settings() {
        let client = FlightSuretyClient::new(
            JsonRpcClient::new("http://localhost:8545"),
            Address::new([1u8; 20]),
            Address::new([2u8; 20]),
        )
        .with_gas_limit(6_000_000)
        .with_receipt_polling(Duration::from_millis(10), Duration::from_secs(1));
        assert_eq!(client.gas_limit, 6_000_000);
        assert_eq!(client.receipt_timeout, Duration::from_secs(1));
        assert_eq!(client.app_address(), Address::new([1u8; 20]));
        assert_eq!(client.data_address(), Address::new([2u8; 20]));
    }
}
