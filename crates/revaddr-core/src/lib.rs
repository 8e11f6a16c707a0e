//! Contract address prediction for `pallet-revive` accounts.
//!
//! A native 32-byte account key is mapped into the 20-byte address space by
//! truncating its Keccak-256 hash, and the address of the next contract it creates is
//! then computed with the EVM `CREATE` scheme: `keccak256(rlp([sender, nonce]))[12..]`.

use num_bigint::BigInt;

pub mod account;
pub mod address;
pub mod client;
pub mod ethereum;
pub mod hex;
pub mod nonce;
pub mod rlp;
pub mod watch;

pub use address::{
	create1_preimage, derive_contract_address, derive_eth_address, AccountPublicKey,
	ContractAddress, EthAddress,
};
pub use nonce::{IntoNonce, Nonce};

/// Precondition violations of the address derivation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error("invalid input length: expected {expected} bytes, got {actual}")]
	InvalidInputLength { expected: usize, actual: usize },
	#[error("nonce must be non-negative, got {0}")]
	NegativeNonce(BigInt),
	#[error("invalid nonce literal: {0:?}")]
	InvalidNonce(String),
	#[error("hex: {0}")]
	Hex(#[from] crate::hex::HexError),
	#[error("address checksum mismatch, expected {expected}")]
	BadChecksum { expected: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return early with an error if the condition is not met.
#[macro_export]
macro_rules! ensure {
	($cond:expr, $err:expr $(,)?) => {
		if !($cond) {
			return Err($err.into());
		}
	};
}
