// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checked access into the parsed JSON tree of a source map.
//!
//! The decoded indexes keep the original [`Value`] around for auxiliary
//! queries, so field access goes through these helpers instead of a
//! deserialized struct. Every type mismatch surfaces as
//! [`SourceMapError::InvalidFormat`].

use serde_json::{Map, Value};

use crate::error::{Result, SourceMapError};

pub(crate) type Object = Map<String, Value>;

pub(crate) fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object> {
	value
		.as_object()
		.ok_or_else(|| SourceMapError::format(format!("{what} must be an object, got {}", type_name(value))))
}

pub(crate) fn required_str<'a>(obj: &'a Object, key: &str) -> Result<&'a str> {
	match obj.get(key) {
		Some(Value::String(s)) => Ok(s.as_str()),
		Some(other) => Err(SourceMapError::format(format!(
			"`{key}` must be a string, got {}",
			type_name(other)
		))),
		None => Err(SourceMapError::format(format!("missing required field `{key}`"))),
	}
}

/// A missing key and an explicit `null` are both treated as absent.
pub(crate) fn optional_str<'a>(obj: &'a Object, key: &str) -> Result<Option<&'a str>> {
	match obj.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => Ok(Some(s.as_str())),
		Some(other) => Err(SourceMapError::format(format!(
			"`{key}` must be a string, got {}",
			type_name(other)
		))),
	}
}

pub(crate) fn required_array<'a>(obj: &'a Object, key: &str) -> Result<&'a [Value]> {
	match obj.get(key) {
		Some(Value::Array(items)) => Ok(items.as_slice()),
		Some(other) => Err(SourceMapError::format(format!(
			"`{key}` must be an array, got {}",
			type_name(other)
		))),
		None => Err(SourceMapError::format(format!("missing required field `{key}`"))),
	}
}

pub(crate) fn optional_array<'a>(obj: &'a Object, key: &str) -> Result<Option<&'a [Value]>> {
	match obj.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Array(items)) => Ok(Some(items.as_slice())),
		Some(other) => Err(SourceMapError::format(format!(
			"`{key}` must be an array, got {}",
			type_name(other)
		))),
	}
}

/// The `sources` list; every entry must be a string.
pub(crate) fn sources(obj: &Object) -> Result<Vec<&str>> {
	required_array(obj, "sources")?
		.iter()
		.enumerate()
		.map(|(i, item)| {
			item.as_str().ok_or_else(|| {
				SourceMapError::format(format!(
					"`sources[{i}]` must be a string, got {}",
					type_name(item)
				))
			})
		})
		.collect()
}

/// The `names` list, coerced to strings. Numbers and booleans are accepted in
/// their JSON text form.
pub(crate) fn names(obj: &Object) -> Result<Vec<String>> {
	required_array(obj, "names")?
		.iter()
		.enumerate()
		.map(|(i, item)| match item {
			Value::String(s) => Ok(s.clone()),
			Value::Number(n) => Ok(n.to_string()),
			Value::Bool(b) => Ok(b.to_string()),
			other => Err(SourceMapError::format(format!(
				"`names[{i}]` must be a string, got {}",
				type_name(other)
			))),
		})
		.collect()
}

/// The `sourcesContent` list; entries may be strings or `null`.
pub(crate) fn sources_content(obj: &Object) -> Result<Vec<Option<&str>>> {
	let Some(items) = optional_array(obj, "sourcesContent")? else {
		return Ok(Vec::new());
	};

	items
		.iter()
		.enumerate()
		.map(|(i, item)| match item {
			Value::String(s) => Ok(Some(s.as_str())),
			Value::Null => Ok(None),
			other => Err(SourceMapError::format(format!(
				"`sourcesContent[{i}]` must be a string or null, got {}",
				type_name(other)
			))),
		})
		.collect()
}

pub(crate) fn non_negative_u32(obj: &Object, key: &str, what: &str) -> Result<u32> {
	let value = obj
		.get(key)
		.ok_or_else(|| SourceMapError::format(format!("{what} is missing `{key}`")))?;

	value
		.as_u64()
		.and_then(|n| u32::try_from(n).ok())
		.ok_or_else(|| {
			SourceMapError::format(format!(
				"{what} `{key}` must be a non-negative integer, got {value}"
			))
		})
}

/// Join a source path onto `sourceRoot`.
///
/// Absolute paths and URLs are kept as they are. Exactly one `/` separates the
/// root from the relative path.
pub(crate) fn join_source_root(root: &str, source: &str) -> String {
	if root.is_empty() || source.starts_with('/') || source.contains("://") {
		return source.to_string();
	}
	let root = root.trim_end_matches('/');
	let source = source.trim_start_matches("./");
	if root.is_empty() {
		format!("/{source}")
	} else {
		format!("{root}/{source}")
	}
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn obj(value: Value) -> Object {
		value.as_object().unwrap().clone()
	}

	#[test]
	fn test_sources_reject_non_strings() {
		let map = obj(json!({"sources": ["a.js", 3]}));
		let err = sources(&map).unwrap_err();
		assert!(err.to_string().contains("`sources[1]` must be a string, got a number"));
	}

	#[test]
	fn test_missing_field() {
		let map = obj(json!({}));
		let err = required_str(&map, "mappings").unwrap_err();
		assert_eq!(err.to_string(), "invalid source map: missing required field `mappings`");
	}

	#[test]
	fn test_names_are_coerced() {
		let map = obj(json!({"names": ["foo", 42, true]}));
		assert_eq!(names(&map).unwrap(), vec!["foo", "42", "true"]);

		let map = obj(json!({"names": [null]}));
		assert!(names(&map).is_err());
	}

	#[test]
	fn test_sources_content_allows_null() {
		let map = obj(json!({"sourcesContent": ["a", null]}));
		assert_eq!(sources_content(&map).unwrap(), vec![Some("a"), None]);

		let map = obj(json!({}));
		assert!(sources_content(&map).unwrap().is_empty());
	}

	#[test]
	fn test_non_negative_u32() {
		let map = obj(json!({"line": 3, "column": -1}));
		assert_eq!(non_negative_u32(&map, "line", "offset").unwrap(), 3);
		assert!(non_negative_u32(&map, "column", "offset").is_err());
		assert!(non_negative_u32(&map, "missing", "offset").is_err());
	}

	#[test]
	fn test_join_source_root() {
		assert_eq!(join_source_root("src/", "index.ts"), "src/index.ts");
		assert_eq!(join_source_root("src", "index.ts"), "src/index.ts");
		assert_eq!(join_source_root("src//", "./index.ts"), "src/index.ts");
		assert_eq!(join_source_root("", "index.ts"), "index.ts");
		assert_eq!(join_source_root("src", "/abs/index.ts"), "/abs/index.ts");
		assert_eq!(
			join_source_root("src", "webpack://app/index.ts"),
			"webpack://app/index.ts"
		);
		assert_eq!(join_source_root("/", "index.ts"), "/index.ts");
	}
}
