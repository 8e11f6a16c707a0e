use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
	#[error("string doesn't start with 0x")]
	MissingPrefix,
	#[error("failed to decode hex: {0}")]
	Decode(#[from] hex::FromHexError),
}

/// Convert an array of bytes to a hex string.
///
/// ```
/// assert_eq!(revaddr_core::hex::to_hex(&[0, 0, 2, 16, 62, 200, 1]), "0x000002103ec801");
/// ```
pub fn to_hex(data: &[u8]) -> String {
	let mut out = String::with_capacity(data.len() * 2 + 2);
	out.push_str("0x");
	out.push_str(&hex::encode(data));
	out
}

/// Convert a hex string to a vector of bytes.
///
/// Both lowercase and uppercase digits are accepted, the `0x` prefix is mandatory.
pub fn from_hex(data: &str) -> Result<Vec<u8>, HexError> {
	let digits = data.strip_prefix("0x").ok_or(HexError::MissingPrefix)?;
	Ok(hex::decode(digits)?)
}

/// Decode hex into a fixed-size array, reporting the decoded length on mismatch.
pub(crate) fn from_hex_array<const N: usize>(data: &str) -> Result<Result<[u8; N], usize>, HexError> {
	let bytes = from_hex(data)?;
	let len = bytes.len();
	Ok(bytes.try_into().map_err(|_| len))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn requires_prefix() {
		assert_eq!(from_hex("abcd"), Err(HexError::MissingPrefix));
		assert_eq!(from_hex("0xabcd").unwrap(), vec![0xab, 0xcd]);
		assert_eq!(from_hex("0xABCD").unwrap(), vec![0xab, 0xcd]);
	}

	#[test]
	fn rejects_odd_length() {
		assert!(matches!(from_hex("0xabc"), Err(HexError::Decode(_))));
	}

	#[test]
	fn empty_is_allowed() {
		assert_eq!(from_hex("0x").unwrap(), Vec::<u8>::new());
		assert_eq!(to_hex(&[]), "0x");
	}

	#[test]
	fn fixed_arrays() {
		assert_eq!(from_hex_array::<2>("0x0102").unwrap(), Ok([1, 2]));
		assert_eq!(from_hex_array::<3>("0x0102").unwrap(), Err(2));
	}
}
