//! Recursive Length Prefix encoding, limited to byte strings and flat lists of them.

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
/// Longest payload which still fits a single-byte prefix.
const SHORT_PAYLOAD: usize = 55;

fn minimal_len(len: usize) -> Vec<u8> {
	let bytes = len.to_be_bytes();
	let skip = bytes.iter().take_while(|b| **b == 0).count();
	bytes[skip..].to_vec()
}

fn encode_header(offset: u8, len: usize, out: &mut Vec<u8>) {
	if len <= SHORT_PAYLOAD {
		out.push(offset + len as u8);
	} else {
		let len_bytes = minimal_len(len);
		out.push(offset + SHORT_PAYLOAD as u8 + len_bytes.len() as u8);
		out.extend_from_slice(&len_bytes);
	}
}

/// Append the encoding of a single byte string.
pub fn encode_bytes(data: &[u8], out: &mut Vec<u8>) {
	if let [byte] = data {
		if *byte < STRING_OFFSET {
			out.push(*byte);
			return;
		}
	}
	encode_header(STRING_OFFSET, data.len(), out);
	out.extend_from_slice(data);
}

/// Encode a list whose items are all byte strings.
pub fn encode_list<I, T>(items: I) -> Vec<u8>
where
	I: IntoIterator<Item = T>,
	T: AsRef<[u8]>,
{
	let mut payload = Vec::new();
	for item in items {
		encode_bytes(item.as_ref(), &mut payload);
	}
	let mut out = Vec::with_capacity(payload.len() + 9);
	encode_header(LIST_OFFSET, payload.len(), &mut out);
	out.extend_from_slice(&payload);
	out
}
