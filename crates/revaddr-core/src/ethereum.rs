use sp_core::keccak_256;

use crate::{ensure, hex::to_hex, Error, Result};

/// Render a 20-byte address with the EIP-55 mixed-case checksum.
pub fn eth_cksum_address(address: [u8; 20]) -> String {
	let address_string = to_hex(&address);
	// address string hash byte nibbles
	let ashbn = keccak_256(&address_string.as_bytes()[2..])
		.into_iter()
		.flat_map(|b| [b >> 4, b & 0b1111])
		.collect::<Vec<u8>>();
	let mut out = "0x".to_owned();
	for (bn, byte) in address.iter().enumerate() {
		for (nn, nibble) in [byte >> 4, byte & 0b1111].into_iter().enumerate() {
			let n = bn * 2 + nn;
			let ch = b"0123456789abcdef"[nibble as usize];
			out.push(if ashbn[n] >= 8 {
				ch.to_ascii_uppercase() as char
			} else {
				ch as char
			});
		}
	}
	out
}

/// Check the case of a `0x`-prefixed address string against its EIP-55 checksum.
///
/// Single-case strings carry no checksum and are accepted as is.
pub fn verify_cksum(address_string: &str, address: [u8; 20]) -> Result<()> {
	let digits = &address_string[2..];
	let has_lower = digits.bytes().any(|c| c.is_ascii_lowercase());
	let has_upper = digits.bytes().any(|c| c.is_ascii_uppercase());
	if !(has_lower && has_upper) {
		return Ok(());
	}
	let expected = eth_cksum_address(address);
	ensure!(expected == address_string, Error::BadChecksum { expected });
	Ok(())
}
