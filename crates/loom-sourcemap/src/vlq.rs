// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! VLQ (Variable-Length Quantity) decoder for source map mappings.
//!
//! Source maps use Base64 VLQ encoding for compact storage of line/column deltas.
//! Every character carries 5 value bits plus a continuation bit, least significant
//! group first. The low bit of the reassembled value is the sign.

use crate::error::{Result, SourceMapError};

/// Base64 character set used in VLQ encoding.
const BASE64_CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const INVALID: u8 = 0xff;

/// ASCII byte -> 6-bit value, `INVALID` for bytes outside the alphabet.
const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
	let mut table = [INVALID; 128];
	let mut i = 0;
	while i < BASE64_CHARS.len() {
		table[BASE64_CHARS[i] as usize] = i as u8;
		i += 1;
	}
	table
}

const CONTINUATION_BIT: u8 = 0b10_0000;
const VALUE_MASK: u8 = 0b01_1111;

/// Largest shift that still fits a 32-bit value plus its sign bit.
const MAX_SHIFT: u32 = 30;

fn decode_char(ch: char, segment: &str) -> Result<u8> {
	let value = if ch.is_ascii() {
		DECODE_TABLE[ch as usize]
	} else {
		INVALID
	};

	if value == INVALID {
		return Err(SourceMapError::InvalidVlqChar {
			ch,
			segment: segment.to_string(),
		});
	}
	Ok(value)
}

/// Decode a VLQ-encoded segment into a vector of signed integers.
///
/// A segment in a `mappings` string holds 1, 4 or 5 values; this function does
/// not enforce the count, it only decodes.
pub fn decode_segment(segment: &str) -> Result<Vec<i32>> {
	let mut values = Vec::with_capacity(5);
	let mut value = 0i64;
	let mut shift = 0u32;

	for ch in segment.chars() {
		let digit = decode_char(ch, segment)?;

		if shift > MAX_SHIFT {
			return Err(SourceMapError::VlqOverflow(segment.to_string()));
		}

		value += i64::from(digit & VALUE_MASK) << shift;
		shift += 5;

		if digit & CONTINUATION_BIT == 0 {
			let negative = value & 1 != 0;
			let magnitude = value >> 1;
			let decoded = i32::try_from(if negative { -magnitude } else { magnitude })
				.map_err(|_| SourceMapError::VlqOverflow(segment.to_string()))?;
			values.push(decoded);
			value = 0;
			shift = 0;
		}
	}

	if value != 0 || shift != 0 {
		return Err(SourceMapError::UnterminatedVlq(segment.to_string()));
	}

	Ok(values)
}

#[cfg(test)]
pub(crate) fn encode_segment(values: &[i32]) -> String {
	let mut out = String::new();
	for &value in values {
		let mut vlq = if value < 0 {
			((-(value as i64)) << 1) | 1
		} else {
			(value as i64) << 1
		};
		loop {
			let mut digit = (vlq & VALUE_MASK as i64) as u8;
			vlq >>= 5;
			if vlq > 0 {
				digit |= CONTINUATION_BIT;
			}
			out.push(BASE64_CHARS[digit as usize] as char);
			if vlq == 0 {
				break;
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_decode_segment_simple() {
		// 'A' = 0
		assert_eq!(decode_segment("A").unwrap(), vec![0]);
		// 'C' = 1
		assert_eq!(decode_segment("C").unwrap(), vec![1]);
		// 'D' = -1
		assert_eq!(decode_segment("D").unwrap(), vec![-1]);
	}

	#[test]
	fn test_decode_segment_multi_value() {
		assert_eq!(decode_segment("AAAA").unwrap(), vec![0, 0, 0, 0]);
		assert_eq!(decode_segment("AACA").unwrap(), vec![0, 0, 1, 0]);
	}

	#[test]
	fn test_decode_segment_continuation() {
		// 'gB' = 16
		assert_eq!(decode_segment("gB").unwrap(), vec![16]);
		assert_eq!(decode_segment("2HwcqxB").unwrap(), vec![123, 456, 789]);
		assert_eq!(decode_segment("AAgBC").unwrap(), vec![0, 0, 16, 1]);
	}

	#[test]
	fn test_empty_segment() {
		assert!(decode_segment("").unwrap().is_empty());
	}

	#[test]
	fn test_invalid_vlq_char() {
		let err = decode_segment("AA!A").unwrap_err();
		assert!(matches!(
			err,
			SourceMapError::InvalidVlqChar { ch: '!', ref segment } if segment == "AA!A"
		));

		assert!(decode_segment("AAé").is_err());
	}

	#[test]
	fn test_unterminated_continuation() {
		// 'g' has the continuation bit set and nothing follows it.
		let err = decode_segment("AAg").unwrap_err();
		assert!(matches!(err, SourceMapError::UnterminatedVlq(_)));
	}

	#[test]
	fn test_overflow() {
		let err = decode_segment("gggggggggB").unwrap_err();
		assert!(matches!(err, SourceMapError::VlqOverflow(_)));
	}

	#[test]
	fn test_extremes_roundtrip() {
		for value in [i32::MAX, -i32::MAX, 0, 1, -1, 15, 16, -16] {
			let encoded = encode_segment(&[value]);
			assert_eq!(decode_segment(&encoded).unwrap(), vec![value], "{encoded}");
		}
	}

	proptest! {
		#[test]
		fn vlq_roundtrip(values in proptest::collection::vec(-i32::MAX..=i32::MAX, 1..6)) {
			let encoded = encode_segment(&values);
			prop_assert_eq!(decode_segment(&encoded).unwrap(), values);
		}
	}
}
