// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Walks a `mappings` string and rebuilds absolute token positions.
//!
//! The mappings string format:
//! - Lines are separated by semicolons (;)
//! - Segments within a line are separated by commas (,)
//! - Each segment contains 1, 4 or 5 VLQ-encoded deltas
//!
//! The generated column resets on every line. Source index, source line,
//! source column and name index accumulate across the whole document.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::config::ColumnOrder;
use crate::error::{Result, SourceMapError};
use crate::token::Token;
use crate::vlq::decode_segment;

/// Output of a mappings walk.
#[derive(Debug, Clone, Default)]
pub(crate) struct DecodedMappings {
	/// Tokens in decode order.
	pub tokens: Vec<Token>,
	/// Generated columns per generated line, ascending.
	pub lines: Vec<Vec<u32>>,
	/// (generated line, generated column) -> position in `tokens`.
	pub index: HashMap<(u32, u32), usize>,
}

/// Decode `mappings` against the resolved `sources` and `names` tables.
pub(crate) fn walk_mappings(
	mappings: &str,
	sources: &[Arc<str>],
	names: &[Arc<str>],
	column_order: ColumnOrder,
) -> Result<DecodedMappings> {
	let mut result = DecodedMappings::default();

	let mut source_index = 0i64;
	let mut source_line = 0i64;
	let mut source_column = 0i64;
	let mut name_index = 0i64;

	for (line_idx, line) in mappings.split(';').enumerate() {
		let generated_line = u32::try_from(line_idx).map_err(|_| SourceMapError::InvalidPosition {
			field: "generated_line",
			value: i64::try_from(line_idx).unwrap_or(i64::MAX),
			segment: String::new(),
			source_path: None,
		})?;
		let mut generated_column = 0i64;
		let mut columns: Vec<u32> = Vec::new();
		let mut out_of_order = false;

		for segment in line.split(',') {
			if segment.is_empty() {
				continue;
			}

			let values = decode_segment(segment)?;
			if !matches!(values.len(), 1 | 4 | 5) {
				return Err(SourceMapError::InvalidSegmentLength {
					segment: segment.to_string(),
					count: values.len(),
				});
			}

			generated_column += i64::from(values[0]);

			let mut token = Token {
				generated_line,
				generated_column: 0,
				source: None,
				source_line: 0,
				source_column: 0,
				name: None,
			};

			if values.len() >= 4 {
				source_index += i64::from(values[1]);
				source_line += i64::from(values[2]);
				source_column += i64::from(values[3]);

				let source = table_entry(sources, source_index).ok_or_else(|| {
					SourceMapError::InvalidSourceIndex {
						segment: segment.to_string(),
						index: source_index,
						len: sources.len(),
					}
				})?;

				token.source_line = position("source_line", source_line, segment, Some(source))?;
				token.source_column = position("source_column", source_column, segment, Some(source))?;
				token.source = Some(Arc::clone(source));

				if values.len() == 5 {
					name_index += i64::from(values[4]);
					let name = table_entry(names, name_index).ok_or_else(|| {
						SourceMapError::InvalidNameIndex {
							segment: segment.to_string(),
							index: name_index,
							len: names.len(),
						}
					})?;
					token.name = Some(Arc::clone(name));
				}
			}

			token.generated_column = position(
				"generated_column",
				generated_column,
				segment,
				token.source.as_ref(),
			)?;

			if let Some(&previous) = columns.last() {
				if token.generated_column < previous {
					match column_order {
						ColumnOrder::Reject => {
							return Err(SourceMapError::UnsortedColumns {
								line: generated_line,
								column: token.generated_column,
								previous,
							});
						}
						ColumnOrder::Sort => out_of_order = true,
					}
				}
			}

			columns.push(token.generated_column);
			result
				.index
				.insert((generated_line, token.generated_column), result.tokens.len());
			result.tokens.push(token);
		}

		if out_of_order {
			warn!(line = generated_line, "generated columns out of order, sorting");
			columns.sort_unstable();
		}
		result.lines.push(columns);
	}

	Ok(result)
}

fn table_entry(table: &[Arc<str>], index: i64) -> Option<&Arc<str>> {
	usize::try_from(index).ok().and_then(|i| table.get(i))
}

fn position(field: &'static str, value: i64, segment: &str, source: Option<&Arc<str>>) -> Result<u32> {
	u32::try_from(value).map_err(|_| SourceMapError::InvalidPosition {
		field,
		value,
		segment: segment.to_string(),
		source_path: source.map(|s| s.to_string()),
	})
}
