use std::{env, fmt::Display, result, str::FromStr, time::Duration};

use futures::{Stream, TryStreamExt as _};
use parity_scale_codec::Decode;
use sp_core::{blake2_128, twox_128};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
	account::Ss58Format,
	address::AccountPublicKey,
	hex::{from_hex, to_hex},
	nonce::Nonce,
};

pub mod rpc;
pub mod rpc_http;
pub mod rpc_wrapper;
pub mod rpc_ws;

use rpc::{RpcClient, RpcError};
use rpc_http::HttpClient;
use rpc_wrapper::RetryClient;
use rpc_ws::WsClient;

#[derive(Error, Debug)]
pub enum Error {
	#[error("url error: {0}")]
	UrlParse(#[from] url::ParseError),
	#[error("unsupported url scheme: {0}")]
	UnsupportedUrlScheme(String),
	#[error("rpc error: {0}")]
	Rpc(#[from] RpcError),
	#[error("no hash for finalized block #{0}")]
	BlockNotFound(u32),
	#[error("invalid env var '{var}' value {value:?}: {error}")]
	InvalidEnvVar {
		var: &'static str,
		value: String,
		error: String,
	},
}

pub type Result<T, E = Error> = result::Result<T, E>;

pub const TIMEOUT_VAR: &str = "REVADDR_TIMEOUT_SECS";
pub const RETRIES_VAR: &str = "REVADDR_RETRIES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	pub timeout: Duration,
	pub retries: usize,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs(30),
			retries: 3,
		}
	}
}

impl ClientConfig {
	pub fn from_env() -> Result<Self> {
		let default = Self::default();
		Ok(Self {
			timeout: Duration::from_secs(get_var(TIMEOUT_VAR, default.timeout.as_secs())?),
			retries: get_var(RETRIES_VAR, default.retries)?,
		})
	}
}

fn get_var<T>(var: &'static str, default: T) -> Result<T>
where
	T: FromStr,
	T::Err: Display,
{
	let value = match env::var(var) {
		Ok(value) => value,
		Err(env::VarError::NotPresent) => return Ok(default),
		Err(env::VarError::NotUnicode(value)) => {
			return Err(Error::InvalidEnvVar {
				var,
				value: value.to_string_lossy().into_owned(),
				error: "not unicode".to_owned(),
			})
		}
	};

	value.parse::<T>().map_err(|error| Error::InvalidEnvVar {
		var,
		error: error.to_string(),
		value,
	})
}

/// Account nonce observed at a finalized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceAt {
	pub block: u32,
	pub nonce: Nonce,
}

/// Storage key of `System.Account(id)`.
pub fn system_account_key(account: &AccountPublicKey) -> Vec<u8> {
	let mut key = Vec::with_capacity(80);
	key.extend_from_slice(&twox_128(b"System"));
	key.extend_from_slice(&twox_128(b"Account"));
	key.extend_from_slice(&blake2_128(&account.0));
	key.extend_from_slice(&account.0);
	key
}

/// Leading field of the `AccountInfo` storage value, the rest is left unread.
#[derive(Decode)]
struct AccountNonce {
	nonce: u32,
}

/// Read-only access to the few node endpoints needed for address prediction.
pub struct NodeClient {
	rpc: RetryClient,
}

impl NodeClient {
	pub async fn connect(url: impl AsRef<str>, config: &ClientConfig) -> Result<Self> {
		let url: Url = url.as_ref().parse()?;

		let rpc = match url.scheme() {
			"http" | "https" => {
				let client = HttpClient::new(url, config.timeout).map_err(Error::Rpc)?;
				RetryClient::new(client, config.retries)
			}
			"ws" | "wss" => {
				let client = WsClient::new(url, config.timeout).await?;
				RetryClient::new(client, config.retries)
			}
			scheme => return Err(Error::UnsupportedUrlScheme(scheme.to_owned())),
		};
		Ok(Self { rpc })
	}

	pub fn from_rpc<C>(client: C, retries: usize) -> Self
	where
		C: RpcClient + Send + Sync + 'static,
	{
		Self {
			rpc: RetryClient::new(client, retries),
		}
	}

	pub async fn chain_name(&self) -> Result<String> {
		Ok(self.rpc.system_chain().await?)
	}

	/// Nonce the next transaction of the account would use, pending pool transactions included.
	pub async fn next_nonce(&self, account: &AccountPublicKey) -> Result<Nonce> {
		let address = account.to_ss58(Ss58Format::default());
		let index = self.rpc.account_next_index(&address).await?;
		debug!("next index of {address} is {index}");
		Ok(Nonce::from(index))
	}

	/// Account nonce stored in the state of block `at`, or of the best block when `None`.
	///
	/// An account without storage has never sent anything, its nonce is zero.
	pub async fn nonce_at(&self, account: &AccountPublicKey, at: Option<String>) -> Result<Nonce> {
		let key = to_hex(&system_account_key(account));
		let Some(value) = self.rpc.get_storage(key, at).await? else {
			return Ok(Nonce::zero());
		};
		let bytes = from_hex(&value)
			.map_err(|e| RpcError::BadResponse(format!("account storage: {e}")))?;
		let info = AccountNonce::decode(&mut bytes.as_slice())
			.map_err(|e| RpcError::BadResponse(format!("account storage: {e}")))?;
		Ok(Nonce::from(info.nonce))
	}

	/// Account nonce at the latest finalized block.
	pub async fn finalized_nonce(&self, account: &AccountPublicKey) -> Result<Nonce> {
		let hash = self.rpc.get_finalized_head().await?;
		let nonce = self.nonce_at(account, Some(hash.clone())).await?;
		debug!("finalized head {hash}: nonce {nonce}");
		Ok(nonce)
	}

	/// Account nonce read from the state of every finalized head.
	pub async fn finalized_nonces<'a>(
		&'a self,
		account: &'a AccountPublicKey,
	) -> Result<impl Stream<Item = Result<NonceAt>> + 'a> {
		let heads = self.rpc.subscribe_finalized_heads().await?;
		info!("subscribed to finalized heads");

		Ok(heads
			.map_err(Error::Rpc)
			.and_then(move |header| async move {
				let block = header.block_number()?;
				let hash = self
					.rpc
					.get_block_hash(Some(block))
					.await?
					.ok_or(Error::BlockNotFound(block))?;
				let nonce = self.nonce_at(account, Some(hash)).await?;
				debug!("block #{block}: nonce {nonce}");
				Ok(NonceAt { block, nonce })
			}))
	}
}
