// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Top-level decode entry point.

use serde_json::Value;
use tracing::{instrument, trace};

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::index::FlatIndex;
use crate::lookup::DecodedMap;
use crate::raw;
use crate::sectioned::SectionedIndex;

/// Decode a source map document with the default configuration.
pub fn decode(text: &str) -> Result<DecodedMap> {
	decode_with_config(text, &DecodeConfig::default())
}

/// Decode a source map document.
///
/// Documents with a non-empty `sections` array decode to
/// [`DecodedMap::Sectioned`], everything else to [`DecodedMap::Flat`].
#[instrument(skip_all, fields(len = text.len()))]
pub fn decode_with_config(text: &str, config: &DecodeConfig) -> Result<DecodedMap> {
	let body = if config.strip_preamble {
		strip_preamble(text)
	} else {
		text
	};

	let value: Value = serde_json::from_str(body)?;
	let obj = raw::as_object(&value, "source map")?;
	let sectioned = matches!(obj.get("sections"), Some(Value::Array(items)) if !items.is_empty());

	if sectioned {
		SectionedIndex::from_value(value, config).map(DecodedMap::Sectioned)
	} else {
		FlatIndex::from_value(value, config).map(DecodedMap::Flat)
	}
}

/// Drop an XSSI guard line such as `)]}'`.
fn strip_preamble(text: &str) -> &str {
	if !text.starts_with(")]}") {
		return text;
	}
	trace!("stripping source map preamble");
	match text.split_once('\n') {
		Some((_, rest)) => rest,
		None => "",
	}
}
