// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The decoded mapping record.

use std::fmt;
use std::sync::Arc;

/// One decoded mapping: a generated position and the original position it came from.
///
/// All lines and columns are 0-indexed. Tokens decoded from a segment without
/// source information have no `source`, no `name` and zero source coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
	/// Line in the generated file.
	pub generated_line: u32,
	/// Column in the generated file.
	pub generated_column: u32,
	/// Original source path, with `sourceRoot` applied.
	pub source: Option<Arc<str>>,
	/// Line in the original source.
	pub source_line: u32,
	/// Column in the original source.
	pub source_column: u32,
	/// Original identifier name.
	pub name: Option<Arc<str>>,
}

impl Token {
	pub fn source(&self) -> Option<&str> {
		self.source.as_deref()
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Same token, moved by a section anchor.
	///
	/// Sections are checked at build time so the sums fit in `u32`.
	pub(crate) fn translated(&self, line_offset: u32, column_offset: u32) -> Token {
		Token {
			generated_line: self.generated_line + line_offset,
			generated_column: self.generated_column + column_offset,
			..self.clone()
		}
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.source() {
			Some(source) => write!(f, "{}:{}:{}", source, self.source_line, self.source_column)?,
			None => write!(f, "<unknown>")?,
		}
		if let Some(name) = self.name() {
			write!(f, " ({name})")?;
		}
		Ok(())
	}
}
