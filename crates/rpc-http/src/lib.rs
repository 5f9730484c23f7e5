//! HTTP JSON-RPC 2.0 implementation of the wallet's [`ChainRpc`] capability.
//!
//! One client serves every configured chain: each call posts to the endpoint
//! URL it is given, holding no per-chain state. Broadcast confirmations are
//! resolved by polling `eth_getTransactionReceipt`; the poll cadence and
//! attempt bound are transport policy and live here, not in the core.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use wallet_core::rpc::{CallParams, ChainRpc, Confirmation, RpcError, TxStatus};

/// Delay between receipt polls while awaiting confirmation.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Receipt polls before the confirmation future gives up.
const CONFIRM_MAX_POLLS: u32 = 40;

/// JSON-RPC node client over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpRpc {
    client: reqwest::Client,
}

impl HttpRpc {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn rpc_call(
    client: &reqwest::Client,
    endpoint: &str,
    method: &str,
    params: Value,
) -> Result<Value, RpcError> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });
    debug!(%method, %endpoint, "rpc request");

    let response = client
        .post(endpoint)
        .json(&body)
        .send()
        .await
        .map_err(|e| RpcError::Transport(e.to_string()))?;

    let envelope: RpcEnvelope = response
        .json()
        .await
        .map_err(|e| RpcError::Transport(e.to_string()))?;

    if let Some(err) = envelope.error {
        return Err(RpcError::Node {
            code: err.code,
            message: err.message,
        });
    }
    envelope
        .result
        .ok_or_else(|| RpcError::Response("missing result".into()))
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Parses a JSON-RPC quantity (`"0x..."` hex string) into a u128.
fn parse_quantity(value: &Value) -> Result<u128, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::Response(format!("expected hex quantity, got {value}")))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Response(format!("quantity {text:?} lacks 0x prefix")))?;
    u128::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Response(format!("quantity {text:?}: {e}")))
}

/// Parses a 32-byte ABI word (e.g. a `balanceOf` return) into a u128.
fn parse_word(value: &Value) -> Result<u128, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::Response(format!("expected hex data, got {value}")))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Response(format!("data {text:?} lacks 0x prefix")))?;
    let trimmed = digits.trim_start_matches('0');
    if trimmed.len() > 32 {
        return Err(RpcError::Response(format!(
            "value {text:?} exceeds 128 bits"
        )));
    }
    if trimmed.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(trimmed, 16)
        .map_err(|e| RpcError::Response(format!("data {text:?}: {e}")))
}

/// Maps a transaction receipt's `status` field to an outcome.
fn receipt_status(receipt: &Value) -> TxStatus {
    match receipt.get("status").and_then(Value::as_str) {
        Some("0x1") => TxStatus::Confirmed,
        _ => TxStatus::Failed,
    }
}

fn call_object(call: &CallParams) -> Value {
    let mut object = serde_json::Map::new();
    if let Some(from) = &call.from {
        object.insert("from".into(), json!(from));
    }
    if let Some(to) = &call.to {
        object.insert("to".into(), json!(to));
    }
    object.insert("value".into(), json!(format!("{:#x}", call.value)));
    if !call.data.is_empty() {
        object.insert("data".into(), json!(format!("0x{}", hex::encode(&call.data))));
    }
    Value::Object(object)
}

#[async_trait]
impl ChainRpc for HttpRpc {
    async fn transaction_count(&self, endpoint: &str, address: &str) -> Result<u64, RpcError> {
        let result = rpc_call(
            &self.client,
            endpoint,
            "eth_getTransactionCount",
            json!([address, "latest"]),
        )
        .await?;
        Ok(parse_quantity(&result)? as u64)
    }

    async fn gas_price(&self, endpoint: &str) -> Result<u128, RpcError> {
        let result = rpc_call(&self.client, endpoint, "eth_gasPrice", json!([])).await?;
        parse_quantity(&result)
    }

    async fn estimate_gas(&self, endpoint: &str, call: &CallParams) -> Result<u64, RpcError> {
        let result = rpc_call(
            &self.client,
            endpoint,
            "eth_estimateGas",
            json!([call_object(call)]),
        )
        .await?;
        Ok(parse_quantity(&result)? as u64)
    }

    async fn balance(&self, endpoint: &str, address: &str) -> Result<u128, RpcError> {
        let result = rpc_call(
            &self.client,
            endpoint,
            "eth_getBalance",
            json!([address, "latest"]),
        )
        .await?;
        parse_quantity(&result)
    }

    async fn token_balance(
        &self,
        endpoint: &str,
        contract: &str,
        address: &str,
    ) -> Result<u128, RpcError> {
        let data = chain_eth::erc20::encode_balance_of(address)
            .map_err(|e| RpcError::Response(e.to_string()))?;
        let result = rpc_call(
            &self.client,
            endpoint,
            "eth_call",
            json!([
                { "to": contract, "data": format!("0x{}", hex::encode(data)) },
                "latest"
            ]),
        )
        .await?;
        parse_word(&result)
    }

    async fn send_raw_transaction(
        &self,
        endpoint: &str,
        raw: &[u8],
    ) -> Result<Confirmation, RpcError> {
        let result = rpc_call(
            &self.client,
            endpoint,
            "eth_sendRawTransaction",
            json!([format!("0x{}", hex::encode(raw))]),
        )
        .await?;
        let txid = result
            .as_str()
            .ok_or_else(|| RpcError::Response(format!("expected tx hash, got {result}")))?
            .to_owned();

        let client = self.client.clone();
        let endpoint = endpoint.to_owned();
        Ok(Box::pin(async move {
            for _ in 0..CONFIRM_MAX_POLLS {
                let receipt = rpc_call(
                    &client,
                    &endpoint,
                    "eth_getTransactionReceipt",
                    json!([txid.as_str()]),
                )
                .await?;
                if !receipt.is_null() {
                    return Ok(receipt_status(&receipt));
                }
                tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
            }
            Err(RpcError::ConfirmationTimeout(txid))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quantity_valid() {
        assert_eq!(parse_quantity(&json!("0x0")).unwrap(), 0);
        assert_eq!(parse_quantity(&json!("0x10")).unwrap(), 16);
        assert_eq!(
            parse_quantity(&json!("0xde0b6b3a7640000")).unwrap(),
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn parse_quantity_rejects_garbage() {
        assert!(parse_quantity(&json!("16")).is_err());
        assert!(parse_quantity(&json!("0xzz")).is_err());
        assert!(parse_quantity(&json!(16)).is_err());
        assert!(parse_quantity(&json!(null)).is_err());
    }

    #[test]
    fn parse_word_handles_abi_padding() {
        // A balanceOf return: 32 bytes, left-padded.
        let word = json!("0x00000000000000000000000000000000000000000000000000000000002625a0");
        assert_eq!(parse_word(&word).unwrap(), 2_500_000);
    }

    #[test]
    fn parse_word_zero_balance() {
        let word = json!("0x0000000000000000000000000000000000000000000000000000000000000000");
        assert_eq!(parse_word(&word).unwrap(), 0);
    }

    #[test]
    fn parse_word_rejects_oversized_value() {
        let word = json!("0x0100000000000000000000000000000000000000000000000000000000000000");
        assert!(parse_word(&word).is_err());
    }

    #[test]
    fn receipt_status_maps_field() {
        assert_eq!(
            receipt_status(&json!({ "status": "0x1" })),
            TxStatus::Confirmed
        );
        assert_eq!(
            receipt_status(&json!({ "status": "0x0" })),
            TxStatus::Failed
        );
        assert_eq!(receipt_status(&json!({})), TxStatus::Failed);
    }

    #[test]
    fn envelope_decodes_result() {
        let envelope: RpcEnvelope =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x5"}"#).unwrap();
        assert_eq!(envelope.result, Some(json!("0x5")));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn envelope_decodes_error() {
        let envelope: RpcEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"nonce too low"}}"#,
        )
        .unwrap();
        let err = envelope.error.unwrap();
        assert_eq!(err.code, -32000);
        assert_eq!(err.message, "nonce too low");
    }

    #[test]
    fn call_object_includes_present_fields() {
        let call = CallParams {
            from: Some("0xaaa".into()),
            to: Some("0xbbb".into()),
            value: 255,
            data: vec![0xca, 0xfe],
        };
        let object = call_object(&call);

        assert_eq!(object["from"], "0xaaa");
        assert_eq!(object["to"], "0xbbb");
        assert_eq!(object["value"], "0xff");
        assert_eq!(object["data"], "0xcafe");
    }

    #[test]
    fn call_object_omits_absent_fields() {
        let call = CallParams::default();
        let object = call_object(&call);

        assert!(object.get("from").is_none());
        assert!(object.get("to").is_none());
        assert!(object.get("data").is_none());
        assert_eq!(object["value"], "0x0");
    }
}
