use std::{fmt, str::FromStr};

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Count of contract-creating actions performed by an account.
///
/// Not bounded to 64 bits, the hashing form is the minimal big-endian encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(BigUint);

impl Nonce {
	pub fn zero() -> Self {
		Self(BigUint::zero())
	}

	pub fn next(&self) -> Self {
		Self(&self.0 + BigUint::one())
	}

	/// Shortest big-endian representation: empty for zero, no leading zero byte otherwise.
	pub fn to_minimal_be(&self) -> Vec<u8> {
		if self.0.is_zero() {
			return Vec::new();
		}
		self.0.to_bytes_be()
	}
}

impl fmt::Display for Nonce {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl From<BigUint> for Nonce {
	fn from(value: BigUint) -> Self {
		Self(value)
	}
}

impl TryFrom<BigInt> for Nonce {
	type Error = Error;

	fn try_from(value: BigInt) -> Result<Self> {
		match value.to_biguint() {
			Some(value) => Ok(Self(value)),
			None => Err(Error::NegativeNonce(value)),
		}
	}
}

impl FromStr for Nonce {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		let value = BigInt::from_str(s.trim()).map_err(|_| Error::InvalidNonce(s.to_owned()))?;
		Self::try_from(value)
	}
}

/// Anything a caller may pass as a nonce.
///
/// Signed inputs are checked, a negative value is a caller error.
pub trait IntoNonce {
	fn into_nonce(self) -> Result<Nonce>;
}

impl IntoNonce for Nonce {
	fn into_nonce(self) -> Result<Nonce> {
		Ok(self)
	}
}
impl IntoNonce for &Nonce {
	fn into_nonce(self) -> Result<Nonce> {
		Ok(self.clone())
	}
}
impl IntoNonce for BigUint {
	fn into_nonce(self) -> Result<Nonce> {
		Ok(Nonce(self))
	}
}
impl IntoNonce for BigInt {
	fn into_nonce(self) -> Result<Nonce> {
		Nonce::try_from(self)
	}
}

macro_rules! unsigned_nonce {
	($($ty:ty),* $(,)?) => {$(
		impl From<$ty> for Nonce {
			fn from(value: $ty) -> Self {
				Self(BigUint::from(value))
			}
		}
		impl IntoNonce for $ty {
			fn into_nonce(self) -> Result<Nonce> {
				Ok(Nonce::from(self))
			}
		}
	)*};
}
unsigned_nonce!(u8, u16, u32, u64, u128, usize);

macro_rules! signed_nonce {
	($($ty:ty),* $(,)?) => {$(
		impl TryFrom<$ty> for Nonce {
			type Error = Error;

			fn try_from(value: $ty) -> Result<Self> {
				Self::try_from(BigInt::from(value))
			}
		}
		impl IntoNonce for $ty {
			fn into_nonce(self) -> Result<Nonce> {
				Nonce::try_from(self)
			}
		}
	)*};
}
signed_nonce!(i8, i16, i32, i64, i128, isize);
