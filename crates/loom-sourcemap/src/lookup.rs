// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The query surface shared by flat and sectioned indexes.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::context::{extract_context, SourceContext};
use crate::error::Result;
use crate::index::FlatIndex;
use crate::sectioned::SectionedIndex;
use crate::token::Token;

/// Read-only queries over a decoded source map.
///
/// All coordinates are 0-indexed generated positions.
pub trait SourceMapLookup {
	/// Find the token at `(line, column)`, or the nearest one before it on the
	/// same line.
	///
	/// Fails with [`crate::SourceMapError::NoMappingFound`] when no token on
	/// `line` starts at or before `column`.
	fn lookup(&self, line: u32, column: u32) -> Result<Cow<'_, Token>>;

	/// Generated columns with a token on `line`, ascending.
	fn columns_for_line(&self, line: u32) -> Vec<u32>;

	/// Number of generated lines the map covers.
	fn total_lines(&self) -> usize;

	/// Declared output file names.
	fn files(&self) -> Vec<&str>;

	/// Resolved source path -> embedded source content.
	fn sources_content_map(&self) -> HashMap<&str, &str>;

	/// Source paths as declared, without `sourceRoot` applied.
	fn raw_sources(&self) -> Vec<&str>;

	/// Embedded content of a resolved source path.
	fn source_content(&self, source: &str) -> Option<&str>;

	/// Lines of embedded source around the original position of `token`.
	fn source_context(&self, token: &Token, context_lines: usize) -> Option<SourceContext> {
		let content = self.source_content(token.source()?)?;
		extract_context(content, token.source_line as usize, context_lines)
	}
}

/// A decoded source map of either format.
#[derive(Debug, Clone)]
pub enum DecodedMap {
	Flat(FlatIndex),
	Sectioned(SectionedIndex),
}

impl DecodedMap {
	pub fn is_sectioned(&self) -> bool {
		matches!(self, Self::Sectioned(_))
	}

	pub fn as_flat(&self) -> Option<&FlatIndex> {
		match self {
			Self::Flat(index) => Some(index),
			Self::Sectioned(_) => None,
		}
	}

	pub fn as_sectioned(&self) -> Option<&SectionedIndex> {
		match self {
			Self::Flat(_) => None,
			Self::Sectioned(index) => Some(index),
		}
	}

	/// The parsed JSON document.
	pub fn raw(&self) -> &Value {
		match self {
			Self::Flat(index) => index.raw(),
			Self::Sectioned(index) => index.raw(),
		}
	}

	/// Every token in generated coordinates, section by section.
	pub fn tokens(&self) -> Vec<Token> {
		match self {
			Self::Flat(index) => index.tokens().to_vec(),
			Self::Sectioned(index) => index.tokens().collect(),
		}
	}

	fn inner(&self) -> &dyn SourceMapLookup {
		match self {
			Self::Flat(index) => index,
			Self::Sectioned(index) => index,
		}
	}
}

impl SourceMapLookup for DecodedMap {
	fn lookup(&self, line: u32, column: u32) -> Result<Cow<'_, Token>> {
		self.inner().lookup(line, column)
	}

	fn columns_for_line(&self, line: u32) -> Vec<u32> {
		self.inner().columns_for_line(line)
	}

	fn total_lines(&self) -> usize {
		self.inner().total_lines()
	}

	fn files(&self) -> Vec<&str> {
		self.inner().files()
	}

	fn sources_content_map(&self) -> HashMap<&str, &str> {
		self.inner().sources_content_map()
	}

	fn raw_sources(&self) -> Vec<&str> {
		self.inner().raw_sources()
	}

	fn source_content(&self, source: &str) -> Option<&str> {
		self.inner().source_content(source)
	}
}
