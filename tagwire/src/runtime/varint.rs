//! LEB128 unsigned varints and Go-`encoding/binary`-compatible zigzag
//! signed varints, ported byte-for-byte from
//! `examples/original_source/extra.go:22-31,89-130`
//! (`codonWriteVarint`/`codonWriteUvarint`/`codonDecodeInt64`/
//! `codonDecodeUint64`). The emitted Go text calls the originals
//! directly; this module exists so this crate's own tests can assert
//! the wire format is bit-exact without a Go toolchain (see
//! `crate::runtime`).

use super::DecodeError;

pub fn write_uvarint(buf: &mut Vec<u8>, mut value: u64) {
	while value >= 0x80 {
		buf.push((value as u8) | 0x80);
		value >>= 7;
	}
	buf.push(value as u8);
}

pub fn write_varint(buf: &mut Vec<u8>, value: i64) {
	let mut encoded = (value as u64) << 1;
	if value < 0 {
		encoded = !encoded;
	}
	write_uvarint(buf, encoded);
}

pub fn read_uvarint(bz: &[u8]) -> Result<(u64, usize), DecodeError> {
	let mut result: u64 = 0;
	let mut shift: u32 = 0;
	for (i, &byte) in bz.iter().enumerate() {
		if shift >= 64 {
			return Err(DecodeError::VarintOverflow);
		}
		result |= ((byte & 0x7F) as u64) << shift;
		if byte & 0x80 == 0 {
			return Ok((result, i + 1));
		}
		shift += 7;
	}
	Err(DecodeError::BufferTooSmall)
}

pub fn read_varint(bz: &[u8]) -> Result<(i64, usize), DecodeError> {
	let (encoded, n) = read_uvarint(bz)?;
	let mut value = (encoded >> 1) as i64;
	if encoded & 1 != 0 {
		value = !value;
	}
	Ok((value, n))
}

#[cfg(test)]
mod quickcheck_properties {
	use super::*;
	use quickcheck_macros::quickcheck;

	/// Spec §8 property 1 ("Round-trip"), at the varint level: any
	/// `u64` survives an encode/decode cycle and reports the exact
	/// number of bytes it occupied.
	#[quickcheck]
	fn uvarint_round_trips(value: u64) -> bool {
		let mut buf = Vec::new();
		write_uvarint(&mut buf, value);
		matches!(read_uvarint(&buf), Ok((decoded, n)) if decoded == value && n == buf.len())
	}

	#[quickcheck]
	fn varint_round_trips(value: i64) -> bool {
		let mut buf = Vec::new();
		write_varint(&mut buf, value);
		matches!(read_varint(&buf), Ok((decoded, n)) if decoded == value && n == buf.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scenario_s1_uint32_300_encodes_as_ac_02() {
		// spec §8 S1: x = 300 encodes as `AC 02`.
		let mut buf = Vec::new();
		write_uvarint(&mut buf, 300);
		assert_eq!(buf, vec![0xAC, 0x02]);
	}

	#[test]
	fn uvarint_round_trips() {
		for value in [0u64, 1, 127, 128, 300, u32::MAX as u64, u64::MAX] {
			let mut buf = Vec::new();
			write_uvarint(&mut buf, value);
			let (decoded, n) = read_uvarint(&buf).unwrap();
			assert_eq!(decoded, value);
			assert_eq!(n, buf.len());
		}
	}

	#[test]
	fn varint_round_trips_negative_values() {
		for value in [0i64, 1, -1, 42, -42, i32::MIN as i64, i64::MAX, i64::MIN] {
			let mut buf = Vec::new();
			write_varint(&mut buf, value);
			let (decoded, n) = read_varint(&buf).unwrap();
			assert_eq!(decoded, value);
			assert_eq!(n, buf.len());
		}
	}

	#[test]
	fn truncated_buffer_is_an_error() {
		let err = read_uvarint(&[0x80, 0x80]).unwrap_err();
		assert!(matches!(err, DecodeError::BufferTooSmall));
	}
}
