use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use sp_core::keccak_256;

use crate::{
	ethereum::{eth_cksum_address, verify_cksum},
	hex::{from_hex_array, to_hex},
	nonce::{IntoNonce, Nonce},
	rlp, Error, Result,
};

/// Raw public key bytes of a chain account, regardless of its signature scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountPublicKey(pub [u8; 32]);

/// 20-byte address in the ethereum-compatible address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EthAddress(pub [u8; 20]);

/// Address assigned to a newly instantiated contract.
pub type ContractAddress = EthAddress;

fn fixed<const N: usize>(data: &[u8]) -> Result<[u8; N]> {
	data.try_into().map_err(|_| Error::InvalidInputLength {
		expected: N,
		actual: data.len(),
	})
}

fn truncated_keccak(data: &[u8]) -> [u8; 20] {
	let hash = keccak_256(data);
	let mut out = [0u8; 20];
	out.copy_from_slice(&hash[12..]);
	out
}

impl AccountPublicKey {
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		fixed(data).map(Self)
	}

	/// Last 20 bytes of the key's Keccak-256 hash.
	pub fn eth_address(&self) -> EthAddress {
		EthAddress(truncated_keccak(&self.0))
	}
}

impl EthAddress {
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		fixed(data).map(Self)
	}

	/// Address of the contract created by this sender at `nonce`.
	pub fn create1(&self, nonce: &Nonce) -> ContractAddress {
		EthAddress(truncated_keccak(&create1_preimage(self, nonce)))
	}

	pub fn to_checksummed(&self) -> String {
		eth_cksum_address(self.0)
	}
}

/// `rlp([sender, minimal_be(nonce)])`, the bytes hashed by [`EthAddress::create1`].
pub fn create1_preimage(sender: &EthAddress, nonce: &Nonce) -> Vec<u8> {
	rlp::encode_list([&sender.0[..], &nonce.to_minimal_be()[..]])
}

/// Map a 32-byte account public key into the 20-byte address space.
pub fn derive_eth_address(public_key: &[u8]) -> Result<EthAddress> {
	Ok(AccountPublicKey::from_slice(public_key)?.eth_address())
}

/// Address of the contract which `sender` creates when its nonce equals `nonce`.
///
/// Fails with [`Error::InvalidInputLength`] unless `sender` is 20 bytes, and with
/// [`Error::NegativeNonce`] for a negative signed nonce.
pub fn derive_contract_address(sender: &[u8], nonce: impl IntoNonce) -> Result<ContractAddress> {
	let sender = EthAddress::from_slice(sender)?;
	let nonce = nonce.into_nonce()?;
	Ok(sender.create1(&nonce))
}

impl fmt::Display for AccountPublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&to_hex(&self.0))
	}
}
impl fmt::Display for EthAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&to_hex(&self.0))
	}
}

impl FromStr for AccountPublicKey {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		from_hex_array(s)?
			.map(Self)
			.map_err(|actual| Error::InvalidInputLength {
				expected: 32,
				actual,
			})
	}
}
impl FromStr for EthAddress {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		let address = from_hex_array(s)?.map_err(|actual| Error::InvalidInputLength {
			expected: 20,
			actual,
		})?;
		verify_cksum(s, address)?;
		Ok(Self(address))
	}
}

impl Serialize for EthAddress {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&to_hex(&self.0))
	}
}
impl Serialize for AccountPublicKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&to_hex(&self.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn public_key_length() {
		assert_eq!(
			derive_eth_address(&[0; 31]),
			Err(Error::InvalidInputLength {
				expected: 32,
				actual: 31
			})
		);
		assert!(derive_eth_address(&[0; 32]).is_ok());
	}

	#[test]
	fn sender_length_is_checked_first() {
		assert_eq!(
			derive_contract_address(&[0; 32], -1i64),
			Err(Error::InvalidInputLength {
				expected: 20,
				actual: 32
			})
		);
	}

	#[test]
	fn preimage_layout() {
		let sender = EthAddress([0xab; 20]);
		let preimage = create1_preimage(&sender, &Nonce::from(0x7fu8));
		assert_eq!(preimage[0], 0xd6);
		assert_eq!(preimage[1], 0x94);
		assert_eq!(&preimage[2..22], &[0xab; 20]);
		assert_eq!(preimage[22], 0x7f);

		let preimage = create1_preimage(&sender, &Nonce::from(0x80u8));
		assert_eq!(preimage[0], 0xd7);
		assert_eq!(&preimage[22..], &[0x81, 0x80]);
	}

	#[test]
	fn parse_and_display() {
		let address: EthAddress = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
		assert_eq!(address.to_string(), "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
		assert_eq!(address.to_checksummed(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
		assert_eq!(
			"0x01".parse::<EthAddress>(),
			Err(Error::InvalidInputLength {
				expected: 20,
				actual: 1
			})
		);
		assert_eq!(
			serde_json::to_string(&address).unwrap(),
			"\"0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed\""
		);
	}
}
