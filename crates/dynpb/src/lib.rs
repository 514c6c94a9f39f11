// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynpb - Dynamic protocol-buffers messages
//!
//! A schema-driven message runtime: message and enum types are registered
//! at runtime, instances are created and type-checked against those
//! descriptors, and messages are serialized to the protocol-buffers binary
//! wire format or to JSON. No generated code is involved.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynpb::{DescriptorPool, EnumDecl, FieldType, MessageDecl, Result, Value};
//!
//! fn main() -> Result<()> {
//!     let pool = DescriptorPool::new();
//!     pool.register(
//!         vec![MessageDecl::new("Reading")
//!             .optional("sensor", FieldType::String, 1)
//!             .optional("celsius", FieldType::Double, 2)
//!             .optional_of("unit", FieldType::Enum, 3, "Unit")
//!             .repeated("samples", FieldType::Int32, 4)],
//!         vec![EnumDecl::new("Unit").variant("METRIC").variant("IMPERIAL")],
//!     )?;
//!
//!     let reading = pool.get_message("Reading").expect("registered");
//!     let msg = reading.new_message();
//!     msg.set("sensor", "probe-1")?;
//!     msg.set("celsius", 21.5)?;
//!     msg.set("unit", Value::symbol("IMPERIAL"))?;
//!
//!     let bytes = msg.encode()?;
//!     assert_eq!(reading.decode(&bytes)?, msg);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |                   Codecs (wire, json)                         |
//! |   encode / decode | cycle + depth guard | default omission    |
//! +---------------------------------------------------------------+
//! |                   Message layer                               |
//! |   Message | RepeatedField | Value | ElementKind (coercion)    |
//! +---------------------------------------------------------------+
//! |                   Descriptor registry                         |
//! |   DescriptorPool (atomic batches) | Message/Field/Enum descs  |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DescriptorPool`] | Registry of message and enum types |
//! | [`MessageDescriptor`] | A registered message type; creates and decodes instances |
//! | [`Message`] | A message instance with checked field access |
//! | [`RepeatedField`] | Typed container behind repeated fields |
//! | [`Value`] | Dynamic value read from or written to fields |
//!
//! ## Features
//!
//! - **`json`** (default): JSON codec ([`encode_json`], [`decode_json`])

// Clippy: No blanket suppressions. Fix issues properly or use inline #[allow] with justification.

/// Static limits and runtime codec options.
pub mod config;
/// Descriptor registry and schema objects.
pub mod descriptor;
/// Error type shared by every module.
pub mod error;
/// JSON codec.
#[cfg(feature = "json")]
pub mod json;
/// Message instances, repeated containers and dynamic values.
pub mod message;
/// Protocol-buffers binary wire codec.
pub mod wire;

pub use config::CodecConfig;
pub use descriptor::{
    DescriptorPool, EnumDecl, EnumDescriptor, FieldDecl, FieldDescriptor, FieldType, Label,
    MessageDecl, MessageDescriptor, TypeRef,
};
pub use error::{Error, Result};
#[cfg(feature = "json")]
pub use json::{decode_json, decode_json_with, encode_json, encode_json_with};
pub use message::{ElementKind, FromValue, Message, RepeatedField, Value};
pub use wire::{decode, decode_with, encode, encode_with};
