// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field kinds and cardinalities.

use std::fmt;

/// Declared kind of a message field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    Float,
    Double,
    String,
    Bytes,
    /// Submessage; requires a message subtype.
    Message,
    /// Enumeration; requires an enum subtype.
    Enum,
}

impl FieldType {
    /// Schema-level name (`int32`, `message`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Message => "message",
            Self::Enum => "enum",
        }
    }

    /// Parse a schema-level name.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "bool" => Self::Bool,
            "float" => Self::Float,
            "double" => Self::Double,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "message" => Self::Message,
            "enum" => Self::Enum,
            _ => return None,
        };
        Some(ty)
    }

    /// True for kinds that resolve a subtype (message, enum).
    pub fn needs_subtype(&self) -> bool {
        matches!(self, Self::Message | Self::Enum)
    }

    /// True for kinds whose repeated form uses packed encoding.
    pub fn is_packable(&self) -> bool {
        !matches!(self, Self::String | Self::Bytes | Self::Message)
    }

    /// Inclusive integer range for the integral kinds (enum values are int32).
    pub(crate) fn int_range(&self) -> Option<(i128, i128)> {
        match self {
            Self::Int32 | Self::Enum => Some((i128::from(i32::MIN), i128::from(i32::MAX))),
            Self::Int64 => Some((i128::from(i64::MIN), i128::from(i64::MAX))),
            Self::Uint32 => Some((0, i128::from(u32::MAX))),
            Self::Uint64 => Some((0, i128::from(u64::MAX))),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field cardinality.
///
/// `Required` exists only so declarations can express it; the registry
/// rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Optional,
    Repeated,
    Required,
}

impl Label {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::Repeated => "repeated",
            Self::Required => "required",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for ty in [
            FieldType::Int32,
            FieldType::Uint64,
            FieldType::Bytes,
            FieldType::Message,
            FieldType::Enum,
        ] {
            assert_eq!(FieldType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(FieldType::from_name("sint32"), None);
    }

    #[test]
    fn test_int_ranges() {
        assert_eq!(FieldType::Uint32.int_range(), Some((0, 0xffff_ffff)));
        assert_eq!(
            FieldType::Enum.int_range(),
            FieldType::Int32.int_range()
        );
        assert_eq!(FieldType::Double.int_range(), None);
    }

    #[test]
    fn test_packable() {
        assert!(FieldType::Int32.is_packable());
        assert!(FieldType::Enum.is_packable());
        assert!(!FieldType::String.is_packable());
        assert!(!FieldType::Message.is_packable());
    }
}
