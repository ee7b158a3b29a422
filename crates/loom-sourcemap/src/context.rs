// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source context extraction around an original line.

/// Lines surrounding a position in an original source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
	pub pre_context: Vec<String>,
	pub context_line: String,
	pub post_context: Vec<String>,
}

/// Extract up to `context_lines` lines on either side of `line` (0-indexed).
///
/// Returns `None` when `line` is past the end of `source_content`.
pub fn extract_context(source_content: &str, line: usize, context_lines: usize) -> Option<SourceContext> {
	let lines: Vec<&str> = source_content.lines().collect();
	let context_line = lines.get(line)?;

	let pre_start = line.saturating_sub(context_lines);
	let post_end = (line + 1).saturating_add(context_lines).min(lines.len());

	Some(SourceContext {
		pre_context: lines[pre_start..line].iter().map(|s| s.to_string()).collect(),
		context_line: context_line.to_string(),
		post_context: lines[line + 1..post_end].iter().map(|s| s.to_string()).collect(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_extract_context() {
		let source = "line 1\nline 2\nline 3\nline 4\nline 5\nline 6\nline 7";

		let ctx = extract_context(source, 3, 2).unwrap();

		assert_eq!(ctx.pre_context, vec!["line 2", "line 3"]);
		assert_eq!(ctx.context_line, "line 4");
		assert_eq!(ctx.post_context, vec!["line 5", "line 6"]);
	}

	#[test]
	fn test_extract_context_at_start() {
		let ctx = extract_context("line 1\nline 2\nline 3", 0, 2).unwrap();

		assert!(ctx.pre_context.is_empty());
		assert_eq!(ctx.context_line, "line 1");
		assert_eq!(ctx.post_context, vec!["line 2", "line 3"]);
	}

	#[test]
	fn test_extract_context_at_end() {
		let ctx = extract_context("line 1\nline 2\nline 3", 2, 2).unwrap();

		assert_eq!(ctx.pre_context, vec!["line 1", "line 2"]);
		assert_eq!(ctx.context_line, "line 3");
		assert!(ctx.post_context.is_empty());
	}

	#[test]
	fn test_extract_context_past_end() {
		assert_eq!(extract_context("line 1", 4, 2), None);
	}
}
