use num_bigint::{BigInt, BigUint};
use revaddr_core::{
	create1_preimage, derive_contract_address, derive_eth_address, hex::from_hex, EthAddress, Error,
	Nonce,
};

fn sequential_key() -> [u8; 32] {
	let mut key = [0u8; 32];
	for (i, byte) in key.iter_mut().enumerate() {
		*byte = i as u8 + 1;
	}
	key
}

fn address(hex: &str) -> EthAddress {
	hex.parse().unwrap()
}

#[test]
fn eth_address_is_deterministic() {
	for key in [[0u8; 32], [0xff; 32], sequential_key()] {
		let first = derive_eth_address(&key).unwrap();
		let second = derive_eth_address(&key).unwrap();
		assert_eq!(first, second);
		assert_eq!(first.0.len(), 20);
	}
}

#[test]
fn eth_address_of_sequential_key() {
	assert_eq!(
		derive_eth_address(&sequential_key()).unwrap(),
		address("0x3ef9427070bda64128fb5630b97b6ab17a8ff0a8")
	);
}

#[test]
fn alice_eth_address() {
	let alice = from_hex("0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d").unwrap();
	let eth = derive_eth_address(&alice).unwrap();
	assert_eq!(eth.to_checksummed(), "0x9621DDe636dE098B43Efb0fA9b61fAcFE328F99D");
	assert_eq!(
		derive_contract_address(&eth.0, 0u32).unwrap().to_checksummed(),
		"0xe2A313e210A6Ec1D5A9c0806545670f2E6264f86"
	);
}

#[test]
fn nonce_changes_address() {
	let sender = [0x11; 20];
	let zero = derive_contract_address(&sender, 0u64).unwrap();
	let one = derive_contract_address(&sender, 1u64).unwrap();
	assert_ne!(zero, one);
	assert_eq!(zero.0.len(), 20);
}

#[test]
fn zero_sender_zero_nonce() {
	let sender = EthAddress([0; 20]);
	let mut expected = vec![0xd6, 0x94];
	expected.extend_from_slice(&[0; 20]);
	expected.push(0x80);
	assert_eq!(create1_preimage(&sender, &Nonce::zero()), expected);

	assert_eq!(
		derive_contract_address(&[0; 20], 0u8).unwrap(),
		address("0xbd770416a3345f91e4b34576cb804a576fa48eb1")
	);
}

#[test]
fn zero_sender_boundary_nonces() {
	for (nonce, preimage_tail, expected) in [
		(1u64, &[0x01][..], "0x5a443704dd4b594b382c22a083e2bd3090a6fef3"),
		(127, &[0x7f][..], "0x5a1bfc20f2037f3e54d367a70957a5327130cea5"),
		(128, &[0x81, 0x80][..], "0xc1784bd8a0ffebd60d0bc7099dcd811b57f30bc4"),
		(255, &[0x81, 0xff][..], "0x2e021f429ff10bfc9373f73720a14bee2cfd5fdd"),
		(256, &[0x82, 0x01, 0x00][..], "0x1183a5a83c1fa113618603abc4509077ec672699"),
	] {
		let preimage = create1_preimage(&EthAddress([0; 20]), &Nonce::from(nonce));
		assert!(preimage.ends_with(preimage_tail), "{nonce}");
		assert_eq!(
			derive_contract_address(&[0; 20], nonce).unwrap(),
			address(expected),
			"{nonce}"
		);
	}
}

#[test]
fn nonces_wider_than_u64() {
	let nonce = BigUint::from(1u8) << 64;
	assert_eq!(
		derive_contract_address(&[0; 20], nonce).unwrap(),
		address("0x3c77411b8e728c0694048df93264ef4de6adf0e3")
	);
	let nonce = BigUint::from(1u8) << 80;
	assert_eq!(
		derive_contract_address(&[0; 20], nonce).unwrap(),
		address("0x0e07c441c46c0785ccecdf1c7290980895e7a5c5")
	);
}

#[test]
fn well_known_create_vectors() {
	let sender = from_hex("0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0").unwrap();
	for (nonce, expected) in [
		"0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d",
		"0x343c43a37d37dff08ae8c4a11544c718abb4fcf8",
		"0xf778b86fa74e846c4f0a1fbd1335fe81c00a0c91",
		"0xfffd933a0bc612844eaf0c6fe3e5b8e9b6c1d19c",
	]
	.into_iter()
	.enumerate()
	{
		assert_eq!(
			derive_contract_address(&sender, nonce).unwrap(),
			address(expected)
		);
	}
}

#[test]
fn minimal_nonce_encoding() {
	assert!(Nonce::from(0u8).to_minimal_be().is_empty());
	assert_eq!(Nonce::from(255u16).to_minimal_be(), vec![0xff]);
	assert_eq!(Nonce::from(256u16).to_minimal_be(), vec![0x01, 0x00]);
	for value in (1u32..70_000).step_by(97) {
		assert_ne!(Nonce::from(value).to_minimal_be()[0], 0);
	}
}

#[test]
fn input_validation() {
	for len in [31, 33] {
		assert_eq!(
			derive_eth_address(&vec![0; len]),
			Err(Error::InvalidInputLength {
				expected: 32,
				actual: len
			})
		);
	}
	assert_eq!(
		derive_contract_address(&[0; 19], 0u8),
		Err(Error::InvalidInputLength {
			expected: 20,
			actual: 19
		})
	);
	assert_eq!(
		derive_contract_address(&[0; 20], -1i32),
		Err(Error::NegativeNonce(BigInt::from(-1)))
	);
	assert!(matches!(
		derive_contract_address(&[0; 20], BigInt::from(-300)),
		Err(Error::NegativeNonce(_))
	));
}

#[test]
fn end_to_end() {
	let key = sequential_key();
	let eth = derive_eth_address(&key).unwrap();
	let addr0 = derive_contract_address(&eth.0, 0u64).unwrap();
	let addr1 = derive_contract_address(&eth.0, 1u64).unwrap();

	assert_ne!(eth, addr0);
	assert_ne!(eth, addr1);
	assert_ne!(addr0, addr1);
	assert_eq!(addr0, address("0x14376af95a2a06319facca2cb6c8da6de6e017df"));
	assert_eq!(addr1, address("0xf97a524fb82a0271ee7d9207d610ac98ea0bde74"));

	let again = derive_contract_address(&derive_eth_address(&key).unwrap().0, 0u64).unwrap();
	assert_eq!(again, addr0);
}
