use std::{fmt, str::FromStr};

use sp_core::{
	blake2_256,
	crypto::{AccountId32, Ss58AddressFormat, Ss58AddressFormatRegistry, Ss58Codec},
	ecdsa, ed25519, sr25519, Pair,
};
use thiserror::Error;
use tracing::debug;

use crate::{
	address::{AccountPublicKey, EthAddress},
	hex::{from_hex, HexError},
};

#[derive(Error, Debug)]
pub enum Error {
	#[error("hex: {0}")]
	Hex(#[from] HexError),
	#[error("{0}")]
	Address(#[from] crate::Error),
	#[error("expected 32 byte public key or 20 byte address, got {0} bytes")]
	UnexpectedLength(usize),
	#[error("invalid ss58 address: {0}")]
	Ss58(String),
	#[error("invalid seed: {0}")]
	Seed(String),
	#[error("unknown key schema: {0}")]
	UnknownSchema(String),
	#[error("unsupported address format: {0}")]
	UnknownFormat(String),
	#[error("{input:?} is neither a hex key, an ss58 address nor a secret uri ({seed})")]
	Unrecognized { input: String, seed: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureSchema {
	Ed25519,
	#[default]
	Sr25519,
	Ecdsa,
}
impl FromStr for SignatureSchema {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s.to_ascii_lowercase().as_str() {
			"ed25519" => Self::Ed25519,
			"sr25519" => Self::Sr25519,
			"ecdsa" => Self::Ecdsa,
			_ => return Err(Error::UnknownSchema(s.to_owned())),
		})
	}
}
impl fmt::Display for SignatureSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Ed25519 => "ed25519",
			Self::Sr25519 => "sr25519",
			Self::Ecdsa => "ecdsa",
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ss58Format(pub Ss58AddressFormat);
impl FromStr for Ss58Format {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		if let Ok(id) = s.parse::<u16>() {
			return Ok(Self(Ss58AddressFormat::custom(id)));
		}
		match Ss58AddressFormatRegistry::from_str(s) {
			Ok(v) => Ok(Self(v.into())),
			Err(e) => Err(Error::UnknownFormat(format!("{s}: {e}"))),
		}
	}
}
impl Default for Ss58Format {
	fn default() -> Self {
		Self(Ss58AddressFormatRegistry::SubstrateAccount.into())
	}
}

/// Account id bytes for the key derived from a secret URI.
///
/// ECDSA public keys are 33 bytes, their account id is the blake2 hash of the key.
pub fn public_bytes_seed(scheme: SignatureSchema, suri: &str) -> Result<AccountPublicKey> {
	let bytes = match scheme {
		SignatureSchema::Ed25519 => {
			ed25519::Pair::from_string_with_seed(suri, None)
				.map_err(|e| Error::Seed(e.to_string()))?
				.0
				.public()
				.0
		}
		SignatureSchema::Sr25519 => {
			sr25519::Pair::from_string_with_seed(suri, None)
				.map_err(|e| Error::Seed(e.to_string()))?
				.0
				.public()
				.0
		}
		SignatureSchema::Ecdsa => {
			let public = ecdsa::Pair::from_string_with_seed(suri, None)
				.map_err(|e| Error::Seed(e.to_string()))?
				.0
				.public();
			blake2_256(&public.0)
		}
	};
	Ok(AccountPublicKey(bytes))
}

impl AccountPublicKey {
	pub fn from_ss58(address: &str) -> Result<Self> {
		let (id, _format) = AccountId32::from_ss58check_with_version(address)
			.map_err(|e| Error::Ss58(e.to_string()))?;
		Ok(Self(id.into()))
	}

	pub fn to_ss58(&self, format: Ss58Format) -> String {
		AccountId32::new(self.0).to_ss58check_with_version(format.0)
	}
}

/// Who deploys the contract, as given by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
	Account(AccountPublicKey),
	Eth(EthAddress),
}
impl Sender {
	pub fn eth_address(&self) -> EthAddress {
		match self {
			Self::Account(key) => key.eth_address(),
			Self::Eth(address) => *address,
		}
	}

	pub fn account(&self) -> Option<&AccountPublicKey> {
		match self {
			Self::Account(key) => Some(key),
			Self::Eth(_) => None,
		}
	}
}

/// Accepts `0x`-prefixed hex (32 byte key or 20 byte address), ss58, or a secret uri.
pub fn parse_sender(input: &str, scheme: SignatureSchema) -> Result<Sender> {
	if input.starts_with("0x") {
		let bytes = from_hex(input)?;
		return match bytes.len() {
			32 => Ok(Sender::Account(AccountPublicKey::from_slice(&bytes)?)),
			20 => Ok(Sender::Eth(EthAddress::from_str(input)?)),
			l => Err(Error::UnexpectedLength(l)),
		};
	}
	if let Ok(key) = AccountPublicKey::from_ss58(input) {
		debug!("parsed {input} as ss58 address");
		return Ok(Sender::Account(key));
	}
	match public_bytes_seed(scheme, input) {
		Ok(key) => {
			debug!("derived {scheme} key from secret uri");
			Ok(Sender::Account(key))
		}
		Err(e) => Err(Error::Unrecognized {
			input: input.to_owned(),
			seed: e.to_string(),
		}),
	}
}
