use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tokio::time::Duration;
use tracing::debug;

use crate::client::rpc::{Result, RpcClient, RpcError};

#[derive(Deserialize)]
pub struct Response<T> {
	result: Option<T>,
	error: Option<ResponseError>,
}

#[derive(Deserialize)]
pub struct ResponseError {
	code: i32,
	message: String,
}

pub struct HttpClient {
	client: reqwest::Client,
	url: url::Url,
}

impl HttpClient {
	pub fn new(url: url::Url, timeout: Duration) -> Result<Self> {
		Ok(Self {
			client: reqwest::Client::builder().timeout(timeout).build()?,
			url,
		})
	}

	async fn post<T: DeserializeOwned>(&self, method: &str, params: &impl Serialize) -> Result<Response<T>> {
		let body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params,
		});
		debug!("{method} -> {}", self.url);

		let response = self
			.client
			.post(self.url.clone())
			.json(&body)
			.send()
			.await?
			.error_for_status()?;
		Ok(response.json().await?)
	}

	async fn call<T: DeserializeOwned>(&self, method: &str, params: &impl Serialize) -> Result<T> {
		into_result(self.post(method, params).await?)
	}

	/// For methods answering `null` when the item is missing.
	async fn call_nullable<T: DeserializeOwned>(
		&self,
		method: &str,
		params: &impl Serialize,
	) -> Result<Option<T>> {
		into_optional(self.post(method, params).await?)
	}
}

fn into_result<T>(response: Response<T>) -> Result<T> {
	into_optional(response)?.ok_or_else(|| {
		RpcError::BadResponse("neither result nor error is present".to_owned())
	})
}

fn into_optional<T>(response: Response<T>) -> Result<Option<T>> {
	match (response.result, response.error) {
		(_, Some(ResponseError { code, message })) => Err(RpcError::Server { code, message }),
		(result, None) => Ok(result),
	}
}

#[async_trait]
impl RpcClient for HttpClient {
	async fn system_chain(&self) -> Result<String> {
		self.call("system_chain", &json!([])).await
	}

	async fn account_next_index(&self, account: &str) -> Result<u64> {
		self.call("system_accountNextIndex", &json!([account])).await
	}

	async fn get_block_hash(&self, num: Option<u32>) -> Result<Option<String>> {
		self.call_nullable("chain_getBlockHash", &json!([num])).await
	}

	async fn get_finalized_head(&self) -> Result<String> {
		self.call("chain_getFinalizedHead", &json!([])).await
	}

	async fn get_storage(&self, key: String, at: Option<String>) -> Result<Option<String>> {
		self.call_nullable("state_getStorage", &json!([key, at])).await
	}
}
