// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sectioned (index) source maps.
//!
//! A sectioned map stitches several complete maps together, each anchored at a
//! generated `(line, column)` offset. A section owns every generated position
//! from its anchor up to the next section's anchor. Column offsets only apply
//! on the anchor's own line.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::{Result, SourceMapError};
use crate::index::FlatIndex;
use crate::lookup::SourceMapLookup;
use crate::raw;
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct SectionedIndex {
	raw: Value,
	/// Section anchors, ascending.
	offsets: Vec<(u32, u32)>,
	maps: Vec<FlatIndex>,
}

impl SectionedIndex {
	/// Build an index from a parsed document with a `sections` array.
	pub fn from_value(raw: Value, config: &DecodeConfig) -> Result<Self> {
		let obj = raw::as_object(&raw, "source map")?;
		let sections = raw::required_array(obj, "sections")?;

		let mut offsets = Vec::with_capacity(sections.len());
		let mut maps = Vec::with_capacity(sections.len());

		for (i, section) in sections.iter().enumerate() {
			let what = format!("sections[{i}]");
			let section = raw::as_object(section, &what)?;

			let offset = section
				.get("offset")
				.ok_or_else(|| SourceMapError::format(format!("{what} is missing `offset`")))?;
			let offset_what = format!("{what}.offset");
			let offset = raw::as_object(offset, &offset_what)?;
			let anchor = (
				raw::non_negative_u32(offset, "line", &offset_what)?,
				raw::non_negative_u32(offset, "column", &offset_what)?,
			);

			if let Some(&previous) = offsets.last() {
				if anchor < previous {
					return Err(SourceMapError::format(format!(
						"{what} offset {anchor:?} precedes previous section offset {previous:?}"
					)));
				}
			}

			let map = match section.get("map") {
				Some(map) => map,
				None if section.contains_key("url") => {
					return Err(SourceMapError::format(format!(
						"{what} references an external map by `url`, which is not supported"
					)));
				}
				None => return Err(SourceMapError::format(format!("{what} is missing `map`"))),
			};

			let map = FlatIndex::from_value(map.clone(), config)?;
			check_addressable(&map, anchor, &what)?;
			maps.push(map);
			offsets.push(anchor);
		}

		debug!(
			sections = maps.len(),
			tokens = maps.iter().map(FlatIndex::len).sum::<usize>(),
			"decoded sectioned source map"
		);

		Ok(Self { raw, offsets, maps })
	}

	pub fn raw(&self) -> &Value {
		&self.raw
	}

	/// Sections with their `(line, column)` anchors.
	pub fn sections(&self) -> impl Iterator<Item = ((u32, u32), &FlatIndex)> {
		self.offsets.iter().copied().zip(self.maps.iter())
	}

	pub fn len(&self) -> usize {
		self.maps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}

	/// Every token of every section, translated to global generated coordinates.
	///
	/// Tokens shadowed by the next section's anchor are skipped, so every
	/// yielded token is what [`SourceMapLookup::lookup`] returns for its position.
	pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
		self.offsets
			.iter()
			.enumerate()
			.flat_map(move |(k, &(line_offset, column_offset))| {
				let next = self.offsets.get(k + 1).copied();
				self.maps[k].iter().filter_map(move |token| {
					let column_offset = if token.generated_line == 0 { column_offset } else { 0 };
					let token = token.translated(line_offset, column_offset);
					(!shadowed(next, token.generated_line, token.generated_column)).then_some(token)
				})
			})
	}

	/// Index of the section owning `(line, column)`.
	fn section_for(&self, line: u32, column: u32) -> Option<usize> {
		self.offsets
			.partition_point(|&anchor| anchor <= (line, column))
			.checked_sub(1)
	}
}

impl SourceMapLookup for SectionedIndex {
	fn lookup(&self, line: u32, column: u32) -> Result<Cow<'_, Token>> {
		let not_found = || SourceMapError::NoMappingFound { line, column };

		let k = self.section_for(line, column).ok_or_else(not_found)?;
		let (line_offset, column_offset) = self.offsets[k];

		let same_line = line == line_offset;
		let local_column = if same_line { column - column_offset } else { column };

		let token = self.maps[k]
			.lookup(line - line_offset, local_column)
			.map_err(|err| match err {
				SourceMapError::NoMappingFound { .. } => not_found(),
				other => other,
			})?;

		// A fresh token; the section's stored one keeps its local coordinates.
		let column_offset = if same_line { column_offset } else { 0 };
		Ok(Cow::Owned(token.translated(line_offset, column_offset)))
	}

	fn columns_for_line(&self, line: u32) -> Vec<u32> {
		let mut columns = Vec::new();

		for (k, &(line_offset, column_offset)) in self.offsets.iter().enumerate() {
			if line < line_offset {
				break;
			}
			let next = self.offsets.get(k + 1).copied();

			for column in self.maps[k].columns_for_line(line - line_offset) {
				let column = if line == line_offset {
					column + column_offset
				} else {
					column
				};
				if shadowed(next, line, column) {
					continue;
				}
				columns.push(column);
			}
		}

		columns
	}

	fn total_lines(&self) -> usize {
		self.sections()
			.map(|((line_offset, _), map)| line_offset as usize + map.total_lines())
			.max()
			.unwrap_or(0)
	}

	fn files(&self) -> Vec<&str> {
		self.maps.iter().flat_map(|map| map.files()).collect()
	}

	fn sources_content_map(&self) -> HashMap<&str, &str> {
		let mut contents = HashMap::new();
		for map in &self.maps {
			contents.extend(map.sources_content_map());
		}
		contents
	}

	fn raw_sources(&self) -> Vec<&str> {
		self.maps.iter().flat_map(|map| map.raw_sources()).collect()
	}

	fn source_content(&self, source: &str) -> Option<&str> {
		self.maps.iter().find_map(|map| map.source_content(source))
	}
}

/// Positions at or past the next anchor belong to the next section.
fn shadowed(next: Option<(u32, u32)>, line: u32, column: u32) -> bool {
	next.is_some_and(|next| (line, column) >= next)
}

/// Every token of `map` must stay representable once moved by `anchor`.
fn check_addressable(map: &FlatIndex, anchor: (u32, u32), what: &str) -> Result<()> {
	let (line_offset, column_offset) = anchor;
	let last_line = u32::try_from(map.total_lines().saturating_sub(1))
		.ok()
		.and_then(|line| line.checked_add(line_offset));
	let last_column = map
		.columns_for_line(0)
		.last()
		.map_or(Some(column_offset), |&column| column.checked_add(column_offset));

	if last_line.is_none() || last_column.is_none() {
		return Err(SourceMapError::format(format!(
			"{what} extends past the addressable generated range from offset {anchor:?}"
		)));
	}
	Ok(())
}
