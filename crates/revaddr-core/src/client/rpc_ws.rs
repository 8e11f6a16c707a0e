use async_trait::async_trait;
use futures::{StreamExt as _, TryStreamExt as _};
use jsonrpsee::{
	core::client::{Subscription, SubscriptionClientT},
	proc_macros::rpc,
	rpc_params,
};
use tokio::time::Duration;
use tracing::debug;

use crate::client::rpc::{Header, HeaderStream, Result, RpcClient, RpcError};

#[rpc(client)]
pub trait SubstrateRpc {
	#[method(name = "system_chain")]
	fn system_chain(&self) -> RpcResult<String>;

	#[method(name = "system_accountNextIndex")]
	fn account_next_index(&self, account: &str) -> RpcResult<u64>;

	#[method(name = "chain_getBlockHash")]
	fn get_block_hash(&self, num: Option<u32>) -> RpcResult<Option<String>>;

	#[method(name = "chain_getFinalizedHead")]
	fn get_finalized_head(&self) -> RpcResult<String>;

	#[method(name = "state_getStorage")]
	fn get_storage(&self, key: String, at: Option<String>) -> RpcResult<Option<String>>;
}

pub struct WsClient {
	client: jsonrpsee::ws_client::WsClient,
}

impl WsClient {
	pub async fn new(url: url::Url, timeout: Duration) -> Result<Self> {
		debug!("connecting to {url}");
		Ok(Self {
			client: jsonrpsee::ws_client::WsClientBuilder::default()
				.request_timeout(timeout)
				.connection_timeout(timeout)
				.build(url.to_string())
				.await?,
		})
	}

}

fn convert_error(err: jsonrpsee::core::ClientError) -> RpcError {
	match err {
		jsonrpsee::core::ClientError::Call(err) => RpcError::Server {
			code: err.code(),
			message: err.message().to_owned(),
		},
		_ => RpcError::Jsonrpsee(err),
	}
}

#[async_trait]
impl RpcClient for WsClient {
	async fn system_chain(&self) -> Result<String> {
		SubstrateRpcClient::system_chain(&self.client)
			.await
			.map_err(convert_error)
	}

	async fn account_next_index(&self, account: &str) -> Result<u64> {
		SubstrateRpcClient::account_next_index(&self.client, account)
			.await
			.map_err(convert_error)
	}

	async fn get_block_hash(&self, num: Option<u32>) -> Result<Option<String>> {
		SubstrateRpcClient::get_block_hash(&self.client, num)
			.await
			.map_err(convert_error)
	}

	async fn get_finalized_head(&self) -> Result<String> {
		SubstrateRpcClient::get_finalized_head(&self.client)
			.await
			.map_err(convert_error)
	}

	async fn get_storage(&self, key: String, at: Option<String>) -> Result<Option<String>> {
		SubstrateRpcClient::get_storage(&self.client, key, at)
			.await
			.map_err(convert_error)
	}

	async fn subscribe_finalized_heads(&self) -> Result<HeaderStream> {
		let heads: Subscription<Header> = self
			.client
			.subscribe(
				"chain_subscribeFinalizedHeads",
				rpc_params![],
				"chain_unsubscribeFinalizedHeads",
			)
			.await
			.map_err(convert_error)?;
		debug!("subscribed to finalized heads");
		Ok(heads.map_err(RpcError::Json).boxed())
	}
}
