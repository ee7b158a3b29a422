// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decode configuration.
//!
//! Follows the layer/finalize pattern: a [`DecodeConfigLayer`] holds optional
//! overrides (from TOML, JSON or the environment), layers merge with later
//! values winning, and [`DecodeConfigLayer::finalize`] fills in defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceMapError};

/// Lines scanned at each end of a file when discovering a map reference.
pub const DEFAULT_DISCOVER_WINDOW: usize = 5;

/// What to do when a line's generated columns are emitted out of order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
	/// Sort the line's column list and log a warning.
	#[default]
	Sort,
	/// Fail the decode.
	Reject,
}

impl fmt::Display for ColumnOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Sort => write!(f, "sort"),
			Self::Reject => write!(f, "reject"),
		}
	}
}

impl FromStr for ColumnOrder {
	type Err = SourceMapError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"sort" => Ok(Self::Sort),
			"reject" => Ok(Self::Reject),
			_ => Err(SourceMapError::InvalidConfig(format!("unknown column order '{s}'"))),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DecodeConfigLayer {
	pub column_order: Option<ColumnOrder>,
	pub discover_window: Option<usize>,
	pub strip_preamble: Option<bool>,
}

impl DecodeConfigLayer {
	/// Read overrides from `LOOM_SOURCEMAP_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok().filter(|s| !s.is_empty()))
	}

	pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let column_order = lookup("LOOM_SOURCEMAP_COLUMN_ORDER")
			.map(|v| v.parse::<ColumnOrder>())
			.transpose()?;

		let discover_window = lookup("LOOM_SOURCEMAP_DISCOVER_WINDOW")
			.map(|v| {
				v.parse::<usize>().map_err(|_| {
					SourceMapError::InvalidConfig(format!(
						"LOOM_SOURCEMAP_DISCOVER_WINDOW: invalid value '{v}'"
					))
				})
			})
			.transpose()?;

		let strip_preamble = lookup("LOOM_SOURCEMAP_STRIP_PREAMBLE")
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1");

		Ok(Self {
			column_order,
			discover_window,
			strip_preamble,
		})
	}

	pub fn merge(&mut self, other: Self) {
		if other.column_order.is_some() {
			self.column_order = other.column_order;
		}
		if other.discover_window.is_some() {
			self.discover_window = other.discover_window;
		}
		if other.strip_preamble.is_some() {
			self.strip_preamble = other.strip_preamble;
		}
	}

	pub fn finalize(self) -> DecodeConfig {
		DecodeConfig {
			column_order: self.column_order.unwrap_or_default(),
			discover_window: self.discover_window.unwrap_or(DEFAULT_DISCOVER_WINDOW),
			strip_preamble: self.strip_preamble.unwrap_or(true),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecodeConfig {
	pub column_order: ColumnOrder,
	pub discover_window: usize,
	/// Drop a leading `)]}'` line before parsing.
	pub strip_preamble: bool,
}

impl Default for DecodeConfig {
	fn default() -> Self {
		Self {
			column_order: ColumnOrder::Sort,
			discover_window: DEFAULT_DISCOVER_WINDOW,
			strip_preamble: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_default_values() {
		let config = DecodeConfig::default();
		assert_eq!(config.column_order, ColumnOrder::Sort);
		assert_eq!(config.discover_window, 5);
		assert!(config.strip_preamble);
	}

	#[test]
	fn test_layer_finalize_defaults() {
		assert_eq!(DecodeConfigLayer::default().finalize(), DecodeConfig::default());
	}

	#[test]
	fn test_layer_merge() {
		let mut base = DecodeConfigLayer {
			column_order: Some(ColumnOrder::Reject),
			discover_window: Some(3),
			strip_preamble: None,
		};
		base.merge(DecodeConfigLayer {
			discover_window: Some(8),
			..Default::default()
		});

		let config = base.finalize();
		assert_eq!(config.column_order, ColumnOrder::Reject);
		assert_eq!(config.discover_window, 8);
		assert!(config.strip_preamble);
	}

	#[test]
	fn test_layer_deserialize() {
		let layer: DecodeConfigLayer =
			serde_json::from_str(r#"{"column_order": "reject", "strip_preamble": false}"#).unwrap();
		assert_eq!(layer.column_order, Some(ColumnOrder::Reject));
		assert_eq!(layer.strip_preamble, Some(false));
		assert_eq!(layer.discover_window, None);
	}

	#[test]
	fn test_from_lookup() {
		let vars: HashMap<&str, &str> = HashMap::from([
			("LOOM_SOURCEMAP_COLUMN_ORDER", "reject"),
			("LOOM_SOURCEMAP_DISCOVER_WINDOW", "10"),
			("LOOM_SOURCEMAP_STRIP_PREAMBLE", "0"),
		]);
		let layer = DecodeConfigLayer::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

		assert_eq!(layer.column_order, Some(ColumnOrder::Reject));
		assert_eq!(layer.discover_window, Some(10));
		assert_eq!(layer.strip_preamble, Some(false));
	}

	#[test]
	fn test_from_lookup_rejects_bad_values() {
		let err = DecodeConfigLayer::from_lookup(|name| {
			(name == "LOOM_SOURCEMAP_COLUMN_ORDER").then(|| "shuffle".to_string())
		})
		.unwrap_err();
		assert!(matches!(err, SourceMapError::InvalidConfig(_)));

		let err = DecodeConfigLayer::from_lookup(|name| {
			(name == "LOOM_SOURCEMAP_DISCOVER_WINDOW").then(|| "many".to_string())
		})
		.unwrap_err();
		assert!(matches!(err, SourceMapError::InvalidConfig(_)));
	}

	#[test]
	fn test_column_order_roundtrip() {
		for order in [ColumnOrder::Sort, ColumnOrder::Reject] {
			assert_eq!(order.to_string().parse::<ColumnOrder>().unwrap(), order);
		}
	}
}
