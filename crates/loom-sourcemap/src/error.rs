// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map decoding and lookup.

use thiserror::Error;

/// Broad classification of a [`SourceMapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The document is not a structurally valid source map.
	Format,
	/// The `mappings` table could not be decoded.
	Decode,
	/// A query asked for a position no token covers.
	Lookup,
}

/// Errors that can occur while decoding or querying a source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
	#[error("invalid source map JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("invalid source map: {0}")]
	InvalidFormat(String),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("invalid VLQ character {ch:?} in segment {segment:?}")]
	InvalidVlqChar { ch: char, segment: String },

	#[error("unterminated VLQ sequence in segment {0:?}")]
	UnterminatedVlq(String),

	#[error("VLQ value overflows 32 bits in segment {0:?}")]
	VlqOverflow(String),

	#[error("segment {segment:?} has {count} fields, expected 1, 4 or 5")]
	InvalidSegmentLength { segment: String, count: usize },

	#[error("segment {segment:?} references source {index} but only {len} sources are declared")]
	InvalidSourceIndex { segment: String, index: i64, len: usize },

	#[error("segment {segment:?} references name {index} but only {len} names are declared")]
	InvalidNameIndex { segment: String, index: i64, len: usize },

	#[error("segment {segment:?} produced invalid {field} {value}{}", describe_source(.source_path))]
	InvalidPosition {
		field: &'static str,
		value: i64,
		segment: String,
		source_path: Option<String>,
	},

	#[error("generated column {column} follows column {previous} on line {line}")]
	UnsortedColumns { line: u32, column: u32, previous: u32 },

	#[error("no mapping found for line {line}, column {column}")]
	NoMappingFound { line: u32, column: u32 },
}

impl SourceMapError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InvalidJson(_) | Self::InvalidFormat(_) | Self::InvalidConfig(_) => ErrorKind::Format,
			Self::NoMappingFound { .. } => ErrorKind::Lookup,
			_ => ErrorKind::Decode,
		}
	}

	pub(crate) fn format(message: impl Into<String>) -> Self {
		Self::InvalidFormat(message.into())
	}
}

fn describe_source(source_path: &Option<String>) -> String {
	match source_path {
		Some(path) => format!(" (source {path})"),
		None => String::new(),
	}
}

pub type Result<T> = std::result::Result<T, SourceMapError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_classification() {
		assert_eq!(SourceMapError::format("bad").kind(), ErrorKind::Format);
		assert_eq!(
			SourceMapError::UnterminatedVlq("g".to_string()).kind(),
			ErrorKind::Decode
		);
		assert_eq!(
			SourceMapError::NoMappingFound { line: 0, column: 0 }.kind(),
			ErrorKind::Lookup
		);
	}

	#[test]
	fn test_invalid_position_message_names_source() {
		let err = SourceMapError::InvalidPosition {
			field: "source_line",
			value: -1,
			segment: "AADA".to_string(),
			source_path: Some("src/app.ts".to_string()),
		};
		assert_eq!(
			err.to_string(),
			"segment \"AADA\" produced invalid source_line -1 (source src/app.ts)"
		);

		let err = SourceMapError::InvalidPosition {
			field: "generated_column",
			value: -1,
			segment: "D".to_string(),
			source_path: None,
		};
		assert_eq!(err.to_string(), "segment \"D\" produced invalid generated_column -1");
	}
}
