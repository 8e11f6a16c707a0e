use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),

	#[error("jsonrpsee error: {0}")]
	Jsonrpsee(#[from] jsonrpsee::core::ClientError),

	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("bad response: {0}")]
	BadResponse(String),

	#[error("jsonrpc error: {message} (code {code})")]
	Server { code: i32, message: String },

	#[error("subscriptions need a ws:// or wss:// endpoint")]
	SubscriptionsUnsupported,

	#[error("all {attempts} attempts failed, last error: {error}")]
	AttemptsFailed { attempts: usize, error: Box<RpcError> },
}

pub type Result<T, E = RpcError> = core::result::Result<T, E>;

/// Finalized block header, only the fields used here.
#[derive(Deserialize, Debug, Clone)]
pub struct Header {
	pub number: String,
}

impl Header {
	pub fn block_number(&self) -> Result<u32> {
		let digits = self
			.number
			.strip_prefix("0x")
			.ok_or_else(|| RpcError::BadResponse(format!("block number {:?}", self.number)))?;
		u32::from_str_radix(digits, 16)
			.map_err(|e| RpcError::BadResponse(format!("block number {:?}: {e}", self.number)))
	}
}

pub type HeaderStream = BoxStream<'static, Result<Header>>;

#[async_trait]
pub trait RpcClient {
	async fn system_chain(&self) -> Result<String>;

	/// Next transaction index of the account, pending pool transactions included.
	async fn account_next_index(&self, account: &str) -> Result<u64>;

	async fn get_block_hash(&self, num: Option<u32>) -> Result<Option<String>>;

	async fn get_finalized_head(&self) -> Result<String>;

	async fn get_storage(&self, key: String, at: Option<String>) -> Result<Option<String>>;

	async fn subscribe_finalized_heads(&self) -> Result<HeaderStream> {
		Err(RpcError::SubscriptionsUnsupported)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_number() {
		let header: Header = serde_json::from_str(r#"{"number":"0x1f","parentHash":"0x00"}"#).unwrap();
		assert_eq!(header.block_number().unwrap(), 31);
		let header = Header {
			number: "31".to_owned(),
		};
		assert!(matches!(header.block_number(), Err(RpcError::BadResponse(_))));
	}
}
