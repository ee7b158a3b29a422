// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flat (single-table) source map index.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::{Result, SourceMapError};
use crate::lookup::SourceMapLookup;
use crate::raw;
use crate::token::Token;
use crate::walker::walk_mappings;

/// Index over one decoded `mappings` table.
///
/// Lookups go through an exact `(line, column)` map first, then fall back to a
/// binary search over the sorted columns of the requested line.
#[derive(Debug, Clone)]
pub struct FlatIndex {
	raw: Value,
	/// Source paths with `sourceRoot` applied.
	sources: Vec<Arc<str>>,
	/// Embedded content parallel to `sources`.
	sources_content: Vec<Option<Arc<str>>>,
	tokens: Vec<Token>,
	lines: Vec<Vec<u32>>,
	index: HashMap<(u32, u32), usize>,
}

impl FlatIndex {
	/// Build an index from a parsed source map document.
	pub fn from_value(raw: Value, config: &DecodeConfig) -> Result<Self> {
		let obj = raw::as_object(&raw, "source map")?;

		if matches!(obj.get("sections"), Some(Value::Array(items)) if !items.is_empty()) {
			return Err(SourceMapError::format(
				"nested sectioned source maps are not supported",
			));
		}

		let source_root = raw::optional_str(obj, "sourceRoot")?;
		let sources: Vec<Arc<str>> = raw::sources(obj)?
			.into_iter()
			.map(|source| -> Arc<str> {
				match source_root {
					Some(root) => raw::join_source_root(root, source).into(),
					None => source.into(),
				}
			})
			.collect();
		let names: Vec<Arc<str>> = raw::names(obj)?.into_iter().map(Arc::<str>::from).collect();
		let mappings = raw::required_str(obj, "mappings")?;

		let sources_content: Vec<Option<Arc<str>>> = raw::sources_content(obj)?
			.into_iter()
			.map(|content| content.map(Arc::<str>::from))
			.collect();

		// Validated here so `file()` can read it infallibly.
		raw::optional_str(obj, "file")?;

		let decoded = walk_mappings(mappings, &sources, &names, config.column_order)?;

		debug!(
			tokens = decoded.tokens.len(),
			lines = decoded.lines.len(),
			sources = sources.len(),
			names = names.len(),
			"decoded source map"
		);

		Ok(Self {
			raw,
			sources,
			sources_content,
			tokens: decoded.tokens,
			lines: decoded.lines,
			index: decoded.index,
		})
	}

	/// The parsed JSON document.
	pub fn raw(&self) -> &Value {
		&self.raw
	}

	/// The declared output file, if any.
	pub fn file(&self) -> Option<&str> {
		self.raw.get("file").and_then(Value::as_str)
	}

	/// Source paths with `sourceRoot` applied.
	pub fn sources(&self) -> impl Iterator<Item = &str> {
		self.sources.iter().map(|s| &**s)
	}

	/// Tokens in decode order.
	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn token(&self, idx: usize) -> Option<&Token> {
		self.tokens.get(idx)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Token> {
		self.tokens.iter()
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

impl SourceMapLookup for FlatIndex {
	fn lookup(&self, line: u32, column: u32) -> Result<Cow<'_, Token>> {
		if let Some(&idx) = self.index.get(&(line, column)) {
			return Ok(Cow::Borrowed(&self.tokens[idx]));
		}

		let not_found = || SourceMapError::NoMappingFound { line, column };

		let columns = self.lines.get(line as usize).ok_or_else(not_found)?;

		// Rightmost insertion point for `column`; the entry before it is the
		// closest token starting at or before the requested column.
		let insert_at = columns.partition_point(|&c| c <= column);
		let nearest = insert_at
			.checked_sub(1)
			.map(|i| columns[i])
			.ok_or_else(not_found)?;

		let &idx = self.index.get(&(line, nearest)).ok_or_else(not_found)?;
		Ok(Cow::Borrowed(&self.tokens[idx]))
	}

	fn columns_for_line(&self, line: u32) -> Vec<u32> {
		self.lines.get(line as usize).cloned().unwrap_or_default()
	}

	fn total_lines(&self) -> usize {
		self.lines.len()
	}

	fn files(&self) -> Vec<&str> {
		self.file().into_iter().collect()
	}

	fn sources_content_map(&self) -> HashMap<&str, &str> {
		self.sources
			.iter()
			.zip(&self.sources_content)
			.filter_map(|(source, content)| Some((&**source, content.as_deref()?)))
			.collect()
	}

	fn raw_sources(&self) -> Vec<&str> {
		self.raw
			.get("sources")
			.and_then(Value::as_array)
			.map(|items| items.iter().filter_map(Value::as_str).collect())
			.unwrap_or_default()
	}

	fn source_content(&self, source: &str) -> Option<&str> {
		let idx = self.sources.iter().position(|s| &**s == source)?;
		self.sources_content.get(idx)?.as_deref()
	}
}

impl Index<usize> for FlatIndex {
	type Output = Token;

	fn index(&self, idx: usize) -> &Token {
		&self.tokens[idx]
	}
}

impl<'a> IntoIterator for &'a FlatIndex {
	type Item = &'a Token;
	type IntoIter = std::slice::Iter<'a, Token>;

	fn into_iter(self) -> Self::IntoIter {
		self.tokens.iter()
	}
}
