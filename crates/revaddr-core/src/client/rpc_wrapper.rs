use async_trait::async_trait;
use tracing::warn;

use crate::client::rpc::{HeaderStream, Result, RpcClient, RpcError};

/// Retries transport failures, server-side errors are returned as is.
pub struct RetryClient {
	client: Box<dyn RpcClient + Send + Sync + 'static>,
	max_attempts: usize,
}

impl RetryClient {
	pub fn new<C>(client: C, retries: usize) -> Self
	where
		C: RpcClient + Send + Sync + 'static,
	{
		Self {
			client: Box::new(client),
			max_attempts: retries.max(1),
		}
	}
}

macro_rules! retry {
	($max_attempts:expr, $method:expr) => {{
		let mut attempt = 1;
		loop {
			match $method {
				Ok(result) => break Ok(result),
				Err(err @ RpcError::Server { .. }) => break Err(err),
				Err(err) if attempt >= $max_attempts => {
					break Err(if $max_attempts < 2 {
						err
					} else {
						RpcError::AttemptsFailed {
							attempts: attempt,
							error: Box::new(err),
						}
					});
				}
				Err(err) => {
					warn!("failed to execute {}: {}", stringify!($method), err);
					attempt += 1;
				}
			}
		}
	}};
}

#[async_trait]
impl RpcClient for RetryClient {
	async fn system_chain(&self) -> Result<String> {
		retry!(self.max_attempts, self.client.system_chain().await)
	}

	async fn account_next_index(&self, account: &str) -> Result<u64> {
		retry!(
			self.max_attempts,
			self.client.account_next_index(account).await
		)
	}

	async fn get_block_hash(&self, num: Option<u32>) -> Result<Option<String>> {
		retry!(self.max_attempts, self.client.get_block_hash(num).await)
	}

	async fn get_finalized_head(&self) -> Result<String> {
		retry!(self.max_attempts, self.client.get_finalized_head().await)
	}

	async fn get_storage(&self, key: String, at: Option<String>) -> Result<Option<String>> {
		retry!(
			self.max_attempts,
			self.client.get_storage(key.clone(), at.clone()).await
		)
	}

	/// Not retried, a dropped subscription is reported through the stream.
	async fn subscribe_finalized_heads(&self) -> Result<HeaderStream> {
		self.client.subscribe_finalized_heads().await
	}
}
