// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map decoding and position lookup for Loom.
//!
//! This crate provides functionality for:
//! - Decoding Base64 VLQ `mappings` into absolute tokens
//! - Looking up the original position behind a generated line and column,
//!   falling back to the nearest preceding token on the line
//! - Composing sectioned (index) maps from their anchored sub-maps
//! - Finding the `sourceMappingURL` reference in a generated file
//! - Extracting source context from embedded `sourcesContent`
//!
//! All coordinates are 0-indexed. Decoded maps are immutable and can be shared
//! across threads for concurrent lookups.
//!
//! # Example
//!
//! ```
//! use loom_sourcemap::{decode, discover, SourceMapLookup};
//!
//! let bundle = "console.log(1);\n//# sourceMappingURL=bundle.js.map\n";
//! assert_eq!(discover(bundle), Some("bundle.js.map"));
//!
//! let map = decode(r#"{
//!     "version": 3,
//!     "sources": ["src/app.ts"],
//!     "names": ["log"],
//!     "mappings": "AAAA,QAAQA"
//! }"#).unwrap();
//!
//! let token = map.lookup(0, 10).unwrap();
//! assert_eq!(token.source(), Some("src/app.ts"));
//! assert_eq!(token.source_column, 8);
//! assert_eq!(token.name(), Some("log"));
//! ```

pub mod config;
pub mod context;
pub mod decoder;
pub mod discover;
pub mod error;
pub mod index;
pub mod lookup;
mod raw;
pub mod sectioned;
pub mod token;
pub mod vlq;
mod walker;

// Re-export main types
pub use config::{ColumnOrder, DecodeConfig, DecodeConfigLayer, DEFAULT_DISCOVER_WINDOW};
pub use context::{extract_context, SourceContext};
pub use decoder::{decode, decode_with_config};
pub use discover::{discover, discover_with_config, discover_with_window};
pub use error::{ErrorKind, Result, SourceMapError};
pub use index::FlatIndex;
pub use lookup::{DecodedMap, SourceMapLookup};
pub use sectioned::SectionedIndex;
pub use token::Token;
pub use vlq::decode_segment;
