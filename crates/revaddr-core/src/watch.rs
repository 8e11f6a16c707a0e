//! Waiting for a single matching notification on a stream.
//!
//! Chain interactions follow the same shape: send a request, then watch a stream of
//! notifications until one of them says the request took effect. The wait is bounded
//! both in the number of notifications inspected and in wall-clock time.

use std::time::Duration;

use futures::{Stream, StreamExt as _};
use thiserror::Error;
use tracing::{debug, info};

use crate::{address::EthAddress, client::NonceAt, nonce::Nonce, ContractAddress};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WaitError<E> {
	#[error("timed out after {0:?}")]
	Timeout(Duration),
	#[error("no matching notification among {0} received")]
	LimitReached(usize),
	#[error("notification stream ended")]
	Exhausted,
	#[error("{0}")]
	Source(E),
}

/// Resolve with the first item matching `predicate`.
///
/// Errors from the stream abort the wait.
pub async fn wait_for<S, T, E, P>(
	stream: S,
	limit: usize,
	timeout: Duration,
	mut predicate: P,
) -> Result<T, WaitError<E>>
where
	S: Stream<Item = Result<T, E>>,
	P: FnMut(&T) -> bool,
{
	let search = async move {
		let mut stream = std::pin::pin!(stream);
		let mut seen = 0;
		while seen < limit {
			let Some(item) = stream.next().await else {
				return Err(WaitError::Exhausted);
			};
			let item = item.map_err(WaitError::Source)?;
			seen += 1;
			if predicate(&item) {
				return Ok(item);
			}
		}
		Err(WaitError::LimitReached(limit))
	};
	tokio::time::timeout(timeout, search)
		.await
		.unwrap_or(Err(WaitError::Timeout(timeout)))
}

/// The account nonce moved past `from` at `block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceAdvance {
	pub block: u32,
	pub from: Nonce,
	pub to: Nonce,
}

impl NonceAdvance {
	/// Every consumed nonce with the contract address it would have created.
	///
	/// A nonce is consumed by any extrinsic, so only some of them may hold code.
	pub fn created_addresses(&self, sender: &EthAddress) -> Vec<(Nonce, ContractAddress)> {
		let mut out = Vec::new();
		let mut nonce = self.from.clone();
		while nonce < self.to {
			let address = sender.create1(&nonce);
			let next = nonce.next();
			out.push((nonce, address));
			nonce = next;
		}
		out
	}
}

/// Wait until a finalized block shows a nonce greater than `from`.
pub async fn wait_for_nonce_advance<S, E>(
	nonces: S,
	from: Nonce,
	limit: usize,
	timeout: Duration,
) -> Result<NonceAdvance, WaitError<E>>
where
	S: Stream<Item = Result<NonceAt, E>>,
{
	info!("waiting for nonce to advance past {from}");
	let seen = wait_for(nonces, limit, timeout, |at| {
		debug!("block #{}: nonce {}", at.block, at.nonce);
		at.nonce > from
	})
	.await?;
	Ok(NonceAdvance {
		block: seen.block,
		from,
		to: seen.nonce,
	})
}
