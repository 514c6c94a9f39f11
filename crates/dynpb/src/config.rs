// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! dynpb configuration: static limits and runtime codec options.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: wire-format constants (field number range, depth limit)
//! - **Level 2 (Dynamic)**: [`CodecConfig`] passed to the `*_with` codec entry points
//!
//! # Example
//!
//! ```rust
//! use dynpb::config::{CodecConfig, DEFAULT_MAX_DEPTH};
//!
//! let config = CodecConfig::default().with_max_depth(32).with_emit_defaults(true);
//! assert_eq!(CodecConfig::default().max_depth, DEFAULT_MAX_DEPTH);
//! assert!(config.emit_defaults);
//! ```

use serde::{Deserialize, Serialize};

/// Largest field number the wire format can carry (29 bits).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Field numbers reserved by the protocol-buffers implementation.
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19000..=19999;

/// Default maximum nesting depth for encode, decode and deep copy.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Runtime options for the wire and JSON codecs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum submessage nesting depth accepted on encode and decode.
    pub max_depth: usize,
    /// JSON only: print fields that hold their default value.
    pub emit_defaults: bool,
    /// JSON only: skip unknown object keys instead of failing.
    pub ignore_unknown_json_fields: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            emit_defaults: false,
            ignore_unknown_json_fields: false,
        }
    }
}

impl CodecConfig {
    /// Set maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Print default-valued fields in JSON output.
    #[must_use]
    pub fn with_emit_defaults(mut self, emit_defaults: bool) -> Self {
        self.emit_defaults = emit_defaults;
        self
    }

    /// Tolerate unknown keys in JSON input.
    #[must_use]
    pub fn with_ignore_unknown_json_fields(mut self, ignore: bool) -> Self {
        self.ignore_unknown_json_fields = ignore;
        self
    }
}
