// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locate the `sourceMappingURL` comment in a generated file.

use tracing::trace;

use crate::config::{DecodeConfig, DEFAULT_DISCOVER_WINDOW};

const MARKERS: [&str; 2] = ["//# sourceMappingURL=", "//@ sourceMappingURL="];

/// Find the source map reference in the first or last few lines of `source`.
pub fn discover(source: &str) -> Option<&str> {
	discover_with_window(source, DEFAULT_DISCOVER_WINDOW)
}

/// Like [`discover`], scanning `config.discover_window` lines at each end.
pub fn discover_with_config<'a>(source: &'a str, config: &DecodeConfig) -> Option<&'a str> {
	discover_with_window(source, config.discover_window)
}

/// Like [`discover`], scanning `window` lines at each end of the file.
///
/// Files with at most `2 * window` lines are scanned in full. The first match in
/// document order wins.
pub fn discover_with_window(source: &str, window: usize) -> Option<&str> {
	let lines: Vec<&str> = source.lines().collect();

	let (head, tail): (&[&str], &[&str]) = if lines.len() > window.saturating_mul(2) {
		(&lines[..window], &lines[lines.len() - window..])
	} else {
		(&lines[..], &lines[..0])
	};

	for line in head.iter().chain(tail) {
		if let Some(url) = MARKERS.iter().find_map(|marker| line.strip_prefix(marker)) {
			let url = url.trim_end();
			trace!(url, "found source map reference");
			return Some(url);
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_finds_sourcemap() {
		let fixture = "\nhey\nthis is some code\nit's really awesome\n//@ sourceMappingURL=file.js\n";
		assert_eq!(discover(fixture), Some("file.js"));
	}

	#[test]
	fn test_finds_sourcemap_alt() {
		let fixture = "\nhey\nthis is some code\nit's really awesome\n//# sourceMappingURL=file.js\n";
		assert_eq!(discover(fixture), Some("file.js"));
	}

	#[test]
	fn test_strips_trailing_whitespace() {
		assert_eq!(discover("x\n//# sourceMappingURL=app.js.map  \r\n"), Some("app.js.map"));
	}

	#[test]
	fn test_doesnt_find_sourcemap() {
		assert_eq!(discover("\nthere\nis no sourcemap\nhere\n"), None);
		assert_eq!(discover(""), None);
		// Must start the line.
		assert_eq!(discover("code(); //# sourceMappingURL=file.js"), None);
	}

	#[test]
	fn test_only_scans_ends_of_long_files() {
		let mut lines: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();

		lines[15] = "//# sourceMappingURL=middle.js.map".to_string();
		assert_eq!(discover(&lines.join("\n")), None);

		lines[27] = "//# sourceMappingURL=tail.js.map".to_string();
		assert_eq!(discover(&lines.join("\n")), Some("tail.js.map"));

		lines[2] = "//@ sourceMappingURL=head.js.map".to_string();
		assert_eq!(discover(&lines.join("\n")), Some("head.js.map"));

		assert_eq!(discover_with_window(&lines.join("\n"), 15), Some("head.js.map"));
	}

	#[test]
	fn test_window_from_config() {
		let mut lines: Vec<String> = (0..40).map(|i| format!("line {i}")).collect();
		lines[10] = "//# sourceMappingURL=deep.js.map".to_string();
		let text = lines.join("\n");

		let default = DecodeConfig::default();
		assert_eq!(discover_with_config(&text, &default), None);

		let wide = crate::config::DecodeConfigLayer {
			discover_window: Some(20),
			..Default::default()
		}
		.finalize();
		assert_eq!(discover_with_config(&text, &wide), Some("deep.js.map"));
	}
}
