//! A native-Rust parity implementation of the wire format spec §6
//! describes and the emitted Go text implements via the C7 runtime
//! block (`crate::emit::runtime_text::RUNTIME_GO`). Nothing here is
//! emitted into generated output — it exists so this crate's own test
//! suite can assert spec §8's properties (round-trip, envelope
//! round-trip, field-order tolerance) against literal byte sequences
//! without invoking a Go toolchain.
//!
//! Ported from `examples/original_source/extra.go`'s
//! `codonEncode*`/`codonDecode*` family.

pub mod varint;

use crate::wire::{tag, WireType};

/// The error taxonomy observable inside decode (spec §7, second half).
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum DecodeError {
	#[error("buffer too small to decode a varint")]
	BufferTooSmall,
	#[error("varint overflows 64 bits")]
	VarintOverflow,
	#[error("declared length {declared} exceeds {remaining} remaining bytes")]
	LengthTooLarge { declared: usize, remaining: usize },
	#[error("nested body declared {declared} bytes but decoding consumed {consumed}")]
	LengthMismatch { declared: usize, consumed: usize },
	#[error("unexpected field number {field_num}")]
	UnknownField { field_num: u64 },
	#[error("unknown magic number {magic}")]
	UnknownType { magic: u32 },
}

pub type DecodeResult<T> = Result<(T, usize), DecodeError>;

fn write_tag(buf: &mut Vec<u8>, field_num: u32, wire_type: WireType) {
	varint::write_uvarint(buf, tag(field_num, wire_type));
}

pub fn encode_bool(field_num: u32, buf: &mut Vec<u8>, value: bool) {
	write_tag(buf, field_num, WireType::Varint);
	varint::write_uvarint(buf, value as u64);
}

pub fn encode_varint(field_num: u32, buf: &mut Vec<u8>, value: i64) {
	write_tag(buf, field_num, WireType::Varint);
	varint::write_varint(buf, value);
}

pub fn encode_uvarint(field_num: u32, buf: &mut Vec<u8>, value: u64) {
	write_tag(buf, field_num, WireType::Varint);
	varint::write_uvarint(buf, value);
}

pub fn encode_int8(field_num: u32, buf: &mut Vec<u8>, value: i8) {
	write_tag(buf, field_num, WireType::Varint);
	buf.push(value as u8);
}

pub fn encode_uint8(field_num: u32, buf: &mut Vec<u8>, value: u8) {
	write_tag(buf, field_num, WireType::Varint);
	buf.push(value);
}

pub fn encode_int16(field_num: u32, buf: &mut Vec<u8>, value: i16) {
	write_tag(buf, field_num, WireType::Varint);
	buf.extend_from_slice(&value.to_le_bytes());
}

pub fn encode_uint16(field_num: u32, buf: &mut Vec<u8>, value: u16) {
	write_tag(buf, field_num, WireType::Varint);
	buf.extend_from_slice(&value.to_le_bytes());
}

pub fn encode_byte_slice(field_num: u32, buf: &mut Vec<u8>, value: &[u8]) {
	write_tag(buf, field_num, WireType::LengthDelimited);
	varint::write_uvarint(buf, value.len() as u64);
	buf.extend_from_slice(value);
}

pub fn encode_string(field_num: u32, buf: &mut Vec<u8>, value: &str) {
	encode_byte_slice(field_num, buf, value.as_bytes());
}

/// Writes a nested message or interface field: tag, varint length,
/// then the already-encoded inner body (spec §4.4 "Nested messages and
/// interface fields are produced by constructing a *temporary*
/// buffer... then writing `(tag, length(temp), temp)`").
pub fn encode_length_delimited(field_num: u32, buf: &mut Vec<u8>, body: &[u8]) {
	encode_byte_slice(field_num, buf, body);
}

pub fn decode_tag(bz: &[u8]) -> Result<(u32, WireType, usize), DecodeError> {
	let (raw, n) = varint::read_uvarint(bz)?;
	let field_num = (raw >> 3) as u32;
	let wire_type = if raw & 0x7 == 2 { WireType::LengthDelimited } else { WireType::Varint };
	Ok((field_num, wire_type, n))
}

pub fn decode_bool(bz: &[u8]) -> DecodeResult<bool> {
	let (v, n) = varint::read_varint(bz)?;
	Ok((v != 0, n))
}

pub fn decode_varint(bz: &[u8]) -> DecodeResult<i64> {
	varint::read_varint(bz)
}

pub fn decode_uvarint(bz: &[u8]) -> DecodeResult<u64> {
	varint::read_uvarint(bz)
}

pub fn decode_int8(bz: &[u8]) -> DecodeResult<i8> {
	match bz.first() {
		Some(&b) => Ok((b as i8, 1)),
		None => Err(DecodeError::BufferTooSmall),
	}
}

pub fn decode_uint8(bz: &[u8]) -> DecodeResult<u8> {
	match bz.first() {
		Some(&b) => Ok((b, 1)),
		None => Err(DecodeError::BufferTooSmall),
	}
}

pub fn decode_int16(bz: &[u8]) -> DecodeResult<i16> {
	if bz.len() < 2 {
		return Err(DecodeError::BufferTooSmall);
	}
	Ok((i16::from_le_bytes([bz[0], bz[1]]), 2))
}

pub fn decode_uint16(bz: &[u8]) -> DecodeResult<u16> {
	if bz.len() < 2 {
		return Err(DecodeError::BufferTooSmall);
	}
	Ok((u16::from_le_bytes([bz[0], bz[1]]), 2))
}

/// Reads a varint length then that many bytes, mirroring
/// `codonGetByteSlice` (`examples/original_source/extra.go:131-157`).
pub fn decode_byte_slice(bz: &[u8]) -> DecodeResult<Vec<u8>> {
	let (length, n) = varint::read_uvarint(bz)?;
	let length = length as usize;
	let remaining = &bz[n..];
	if remaining.len() < length {
		return Err(DecodeError::LengthTooLarge { declared: length, remaining: remaining.len() });
	}
	Ok((remaining[..length].to_vec(), n + length))
}

pub fn decode_string(bz: &[u8]) -> DecodeResult<String> {
	let (bytes, n) = decode_byte_slice(bz)?;
	Ok((String::from_utf8_lossy(&bytes).into_owned(), n))
}

/// Splits off the length-delimited body of a nested message or
/// interface field and asserts it is then fully consumed by `decode`
/// (spec §4.4: "asserts the slice was fully consumed").
pub fn decode_length_delimited<T>(bz: &[u8], decode: impl FnOnce(&[u8]) -> DecodeResult<T>) -> DecodeResult<T> {
	let (length, n) = varint::read_uvarint(bz)?;
	let length = length as usize;
	let remaining = &bz[n..];
	if remaining.len() < length {
		return Err(DecodeError::LengthTooLarge { declared: length, remaining: remaining.len() });
	}
	let body = &remaining[..length];
	let (value, consumed) = decode(body)?;
	if consumed != length {
		return Err(DecodeError::LengthMismatch { declared: length, consumed });
	}
	Ok((value, n + length))
}

#[cfg(test)]
mod quickcheck_properties {
	use super::*;
	use quickcheck_macros::quickcheck;

	/// Spec §8 property 1 ("Round-trip") at the length-delimited
	/// framing level: any byte string, tagged and length-prefixed,
	/// decodes back to the same bytes and reports the bytes consumed.
	#[quickcheck]
	fn byte_slice_round_trips(field_num: u32, value: Vec<u8>) -> bool {
		let field_num = field_num % crate::wire::MAX_FIELD_NUMBER + 1;
		let mut buf = Vec::new();
		encode_byte_slice(field_num, &mut buf, &value);
		let Ok((got_field, _, n)) = decode_tag(&buf) else { return false };
		if got_field != field_num {
			return false;
		}
		matches!(decode_byte_slice(&buf[n..]), Ok((decoded, consumed)) if decoded == value && n + consumed == buf.len())
	}

	/// Spec §8 property 6 ("Field-order tolerance"): concatenating two
	/// tagged fields in either order still yields two decodable
	/// field/value pairs with field numbers and payloads intact.
	#[quickcheck]
	fn tagged_fields_decode_independent_of_order(a: u8, b: u8) -> bool {
		let mut forward = Vec::new();
		encode_uint8(1, &mut forward, a);
		encode_uint8(2, &mut forward, b);

		let mut reversed = Vec::new();
		encode_uint8(2, &mut reversed, b);
		encode_uint8(1, &mut reversed, a);

		let read_pair = |mut bz: &[u8]| -> Vec<(u32, u8)> {
			let mut out = Vec::new();
			while !bz.is_empty() {
				let (field, _, n) = decode_tag(bz).unwrap();
				let (v, vn) = decode_uint8(&bz[n..]).unwrap();
				out.push((field, v));
				bz = &bz[n + vn..];
			}
			out
		};

		let mut forward_pairs = read_pair(&forward);
		let mut reversed_pairs = read_pair(&reversed);
		forward_pairs.sort();
		reversed_pairs.sort();
		forward_pairs == reversed_pairs
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scenario_s1_primitive_round_trip() {
		// S1: A = {x: uint32, y: string}; EncodeA({x: 300, y: "hi"})
		// == 08 AC 02 12 02 68 69
		let mut buf = Vec::new();
		encode_uvarint(1, &mut buf, 300);
		encode_string(2, &mut buf, "hi");
		assert_eq!(buf, vec![0x08, 0xAC, 0x02, 0x12, 0x02, 0x68, 0x69]);

		let (field1, wire1, n1) = decode_tag(&buf).unwrap();
		assert_eq!((field1, wire1), (1, WireType::Varint));
		let (x, n) = decode_uvarint(&buf[n1..]).unwrap();
		assert_eq!(x, 300);
		let rest = &buf[n1 + n..];
		let (field2, wire2, n2) = decode_tag(rest).unwrap();
		assert_eq!((field2, wire2), (2, WireType::LengthDelimited));
		let (y, _) = decode_string(&rest[n2..]).unwrap();
		assert_eq!(y, "hi");
	}

	#[test]
	fn scenario_s2_nested_message() {
		// S2: Inner = {v: uint8}, Outer = {i: Inner};
		// EncodeOuter({i: {v: 7}}) == 0A 03 08 01 07
		let mut inner = Vec::new();
		encode_uint8(1, &mut inner, 7);
		assert_eq!(inner, vec![0x08, 0x07]);

		let mut outer = Vec::new();
		encode_length_delimited(1, &mut outer, &inner);
		assert_eq!(outer, vec![0x0A, 0x02, 0x08, 0x07]);

		let (value, n) = decode_length_delimited(&outer[1..], |body| {
			let (field, _, n) = decode_tag(body).unwrap();
			assert_eq!(field, 1);
			let (v, vn) = decode_uint8(&body[n..]).unwrap();
			Ok((v, n + vn))
		})
		.unwrap();
		assert_eq!(value, 7);
		assert_eq!(n, outer.len() - 1);
	}

	#[test]
	fn scenario_s3_interface_envelope() {
		// S3: I implemented by A (magic 20050) and B (magic 20100).
		// EncodeI(A-value) begins with a varint for (20050<<3) then a
		// varint length then EncodeA's body.
		let a_body = vec![0x08, 0x2A]; // arbitrary EncodeA(...) body
		let magic: u32 = 20050;
		let mut envelope = Vec::new();
		varint::write_uvarint(&mut envelope, (magic as u64) << 3);
		encode_byte_slice_raw_len(&mut envelope, &a_body);

		let (raw_tag, n) = varint::read_uvarint(&envelope).unwrap();
		assert_eq!((raw_tag >> 3) as u32, magic);
		let (length, n2) = varint::read_uvarint(&envelope[n..]).unwrap();
		assert_eq!(length as usize, a_body.len());
		assert_eq!(&envelope[n + n2..], a_body.as_slice());
	}

	fn encode_byte_slice_raw_len(buf: &mut Vec<u8>, body: &[u8]) {
		varint::write_uvarint(buf, body.len() as u64);
		buf.extend_from_slice(body);
	}

	#[test]
	fn scenario_s4_repeated_field() {
		// S4: L = {xs: []uint32}; EncodeL({xs: [1,2,3]}) emits three
		// separate tagged-varint fields, all field number 1.
		let mut buf = Vec::new();
		for x in [1u32, 2, 3] {
			encode_uvarint(1, &mut buf, x as u64);
		}
		assert_eq!(buf, vec![0x08, 0x01, 0x08, 0x02, 0x08, 0x03]);

		let mut values = Vec::new();
		let mut rest = buf.as_slice();
		while !rest.is_empty() {
			let (field, _, n) = decode_tag(rest).unwrap();
			assert_eq!(field, 1);
			let (v, n2) = decode_uvarint(&rest[n..]).unwrap();
			values.push(v as u32);
			rest = &rest[n + n2..];
		}
		assert_eq!(values, vec![1, 2, 3]);
	}

	#[test]
	fn length_mismatch_is_detected() {
		let mut outer = Vec::new();
		// Declare a length of 3 but only supply 2 bytes of body.
		varint::write_uvarint(&mut outer, 3);
		outer.extend_from_slice(&[0x08, 0x07]);
		let err = decode_length_delimited(&outer, |body| {
			let (field, _, n) = decode_tag(body).unwrap();
			let (v, vn) = decode_uint8(&body[n..]).unwrap();
			let _ = field;
			Ok((v, n + vn))
		})
		.unwrap_err();
		assert!(matches!(err, DecodeError::LengthTooLarge { .. }));
	}
}
