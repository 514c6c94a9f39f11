// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent declarations consumed by [`DescriptorPool::register`].
//!
//! Declarations are plain data: subtype references are names and stay
//! unresolved until the whole batch is registered.
//!
//! [`DescriptorPool::register`]: crate::DescriptorPool::register

use crate::descriptor::{FieldType, Label};

/// Declaration of a single message field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Field number (unique within the message).
    pub number: u32,
    /// Declared kind.
    pub field_type: FieldType,
    /// Cardinality.
    pub label: Label,
    /// Message or enum type name, for `Message` / `Enum` kinds.
    pub subtype: Option<String>,
}

impl FieldDecl {
    /// Create a field declaration.
    pub fn new(name: impl Into<String>, field_type: FieldType, number: u32, label: Label) -> Self {
        Self {
            name: name.into(),
            number,
            field_type,
            label,
            subtype: None,
        }
    }

    /// Optional (singular) field.
    pub fn optional(name: impl Into<String>, field_type: FieldType, number: u32) -> Self {
        Self::new(name, field_type, number, Label::Optional)
    }

    /// Repeated field.
    pub fn repeated(name: impl Into<String>, field_type: FieldType, number: u32) -> Self {
        Self::new(name, field_type, number, Label::Repeated)
    }

    /// Required field (always rejected at registration).
    pub fn required(name: impl Into<String>, field_type: FieldType, number: u32) -> Self {
        Self::new(name, field_type, number, Label::Required)
    }

    /// Set the referenced message/enum type name.
    #[must_use]
    pub fn subtype(mut self, type_name: impl Into<String>) -> Self {
        self.subtype = Some(type_name.into());
        self
    }
}

/// Builder for a message declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDecl {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldDecl>,
}

impl MessageDecl {
    /// Create a new message declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Message name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Add a field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an optional scalar field.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, field_type: FieldType, number: u32) -> Self {
        self.field(FieldDecl::optional(name, field_type, number))
    }

    /// Add a repeated scalar field.
    #[must_use]
    pub fn repeated(self, name: impl Into<String>, field_type: FieldType, number: u32) -> Self {
        self.field(FieldDecl::repeated(name, field_type, number))
    }

    /// Add a required field. Registration will reject the message.
    #[must_use]
    pub fn required(self, name: impl Into<String>, field_type: FieldType, number: u32) -> Self {
        self.field(FieldDecl::required(name, field_type, number))
    }

    /// Add an optional message/enum field referencing `subtype` by name.
    #[must_use]
    pub fn optional_of(
        self,
        name: impl Into<String>,
        field_type: FieldType,
        number: u32,
        subtype: impl Into<String>,
    ) -> Self {
        self.field(FieldDecl::optional(name, field_type, number).subtype(subtype))
    }

    /// Add a repeated message/enum field referencing `subtype` by name.
    #[must_use]
    pub fn repeated_of(
        self,
        name: impl Into<String>,
        field_type: FieldType,
        number: u32,
        subtype: impl Into<String>,
    ) -> Self {
        self.field(FieldDecl::repeated(name, field_type, number).subtype(subtype))
    }
}

/// Builder for an enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub(crate) name: String,
    pub(crate) values: Vec<(String, i32)>,
    next_value: i32,
}

impl EnumDecl {
    /// Create a new enum declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            next_value: 0,
        }
    }

    /// Enum name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a symbol with an explicit value.
    #[must_use]
    pub fn value(mut self, symbol: impl Into<String>, value: i32) -> Self {
        self.values.push((symbol.into(), value));
        self.next_value = value.wrapping_add(1);
        self
    }

    /// Add a symbol with the next auto-incremented value.
    #[must_use]
    pub fn variant(self, symbol: impl Into<String>) -> Self {
        let value = self.next_value;
        self.value(symbol, value)
    }
}
