// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor model: immutable message, field and enum schema objects.
//!
//! Descriptors are cheap handles into a pool snapshot. Two descriptors are
//! equal only if they name the same registered type; structurally identical
//! types registered separately are distinct.

mod builder;
mod pool;
mod types;

pub use builder::{EnumDecl, FieldDecl, MessageDecl};
pub use pool::DescriptorPool;
pub use types::{FieldType, Label};

use crate::error::Result;
use crate::message::{ElementKind, Message, Value};
use pool::{EnumDef, FieldDef, MessageDef, PoolInner, TypeIndex};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A resolved reference to a registered message or enum type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Message(MessageDescriptor),
    Enum(EnumDescriptor),
}

impl TypeRef {
    pub(crate) fn from_index(pool: &Arc<PoolInner>, index: TypeIndex) -> Self {
        match index {
            TypeIndex::Message(index) => TypeRef::Message(MessageDescriptor {
                pool: pool.clone(),
                index,
            }),
            TypeIndex::Enum(index) => TypeRef::Enum(EnumDescriptor {
                pool: pool.clone(),
                index,
            }),
        }
    }

    /// Registered type name.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Message(desc) => desc.name(),
            TypeRef::Enum(desc) => desc.name(),
        }
    }

    pub fn as_message(&self) -> Option<&MessageDescriptor> {
        match self {
            TypeRef::Message(desc) => Some(desc),
            TypeRef::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match self {
            TypeRef::Enum(desc) => Some(desc),
            TypeRef::Message(_) => None,
        }
    }
}

/// Descriptor of a registered message type.
#[derive(Clone)]
pub struct MessageDescriptor {
    pool: Arc<PoolInner>,
    index: usize,
}

impl MessageDescriptor {
    fn def(&self) -> &Arc<MessageDef> {
        &self.pool.messages[self.index]
    }

    /// Message name.
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.def().fields.len()
    }

    /// True if the message declares no fields.
    pub fn is_empty(&self) -> bool {
        self.def().fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = FieldDescriptor> + '_ {
        (0..self.len()).map(move |index| self.field_at(index))
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<FieldDescriptor> {
        let index = *self.def().by_name.get(name)?;
        Some(self.field_at(index))
    }

    /// Field by number.
    pub fn field_by_number(&self, number: u32) -> Option<FieldDescriptor> {
        let index = *self.def().by_number.get(&number)?;
        Some(self.field_at(index))
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.def().by_name.get(name).copied()
    }

    pub(crate) fn field_at(&self, index: usize) -> FieldDescriptor {
        FieldDescriptor {
            message: self.clone(),
            index,
        }
    }

    /// Create an empty instance of this message type.
    pub fn new_message(&self) -> Message {
        Message::new(self)
    }

    /// Decode wire bytes into a new instance of this type.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message> {
        crate::wire::decode(self, bytes)
    }

    /// Decode JSON text into a new instance of this type.
    #[cfg(feature = "json")]
    pub fn decode_json(&self, text: &str) -> Result<Message> {
        crate::json::decode_json(self, text)
    }

    fn identity(&self) -> *const MessageDef {
        Arc::as_ptr(self.def())
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for MessageDescriptor {}

impl Hash for MessageDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageDescriptor({})", self.name())
    }
}

/// Descriptor of one message field, with reflective get/set.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    message: MessageDescriptor,
    index: usize,
}

impl FieldDescriptor {
    fn def(&self) -> &FieldDef {
        &self.message.def().fields[self.index]
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Field number.
    pub fn number(&self) -> u32 {
        self.def().number
    }

    /// Declared kind.
    pub fn field_type(&self) -> FieldType {
        self.def().field_type
    }

    /// Cardinality.
    pub fn label(&self) -> Label {
        self.def().label
    }

    pub fn is_repeated(&self) -> bool {
        self.def().label == Label::Repeated
    }

    /// Referenced type name, as declared.
    pub fn subtype_name(&self) -> Option<&str> {
        self.def().subtype_name.as_deref()
    }

    /// Resolved message/enum type for `Message` and `Enum` fields.
    pub fn subtype(&self) -> Option<TypeRef> {
        self.def()
            .subtype
            .map(|index| TypeRef::from_index(&self.message.pool, index))
    }

    /// Message type declaring this field.
    pub fn containing_type(&self) -> &MessageDescriptor {
        &self.message
    }

    /// Position in declaration order.
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Element kind (type + subtype) shared by singular and repeated access.
    pub(crate) fn kind(&self) -> ElementKind {
        ElementKind::resolved(self.field_type(), self.subtype())
    }

    /// Read this field from `message`; identical to `message.get(self.name())`.
    pub fn get(&self, message: &Message) -> Result<Value> {
        message.get_field(self)
    }

    /// Write this field on `message`; identical to `message.set(self.name(), value)`.
    pub fn set(&self, message: &Message, value: Value) -> Result<()> {
        message.set_field(self, value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("message", &self.message.name())
            .field("name", &self.name())
            .field("number", &self.number())
            .field("type", &self.field_type())
            .field("label", &self.label())
            .finish()
    }
}

/// Descriptor of a registered enum type.
#[derive(Clone)]
pub struct EnumDescriptor {
    pool: Arc<PoolInner>,
    index: usize,
}

impl EnumDescriptor {
    fn def(&self) -> &Arc<EnumDef> {
        &self.pool.enums[self.index]
    }

    /// Enum name.
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Symbol for an integer value (first declared if several share it).
    pub fn lookup(&self, value: i32) -> Option<&str> {
        let position = *self.def().by_value.get(&value)?;
        Some(&self.def().values[position].0)
    }

    /// Integer value of a symbol.
    pub fn resolve(&self, symbol: &str) -> Option<i32> {
        self.def().by_symbol.get(symbol).copied()
    }

    /// (symbol, value) pairs in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.def().values.iter().map(|(s, v)| (s.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.def().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.def().values.is_empty()
    }

    fn identity(&self) -> *const EnumDef {
        Arc::as_ptr(self.def())
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for EnumDescriptor {}

impl Hash for EnumDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumDescriptor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> DescriptorPool {
        let pool = DescriptorPool::new();
        pool.register(
            vec![
                MessageDecl::new("Point")
                    .optional("x", FieldType::Int32, 1)
                    .optional("y", FieldType::Int32, 2)
                    .optional_of("color", FieldType::Enum, 5, "Color"),
                MessageDecl::new("Twin")
                    .optional("x", FieldType::Int32, 1)
                    .optional("y", FieldType::Int32, 2)
                    .optional_of("color", FieldType::Enum, 5, "Color"),
            ],
            vec![EnumDecl::new("Color")
                .value("NONE", 0)
                .value("RED", 1)
                .value("CRIMSON", 1)
                .value("BLUE", 2)],
        )
        .expect("register");
        pool
    }

    #[test]
    fn test_field_iteration_order() {
        let pool = pool();
        let point = pool.get_message("Point").expect("Point");
        let names: Vec<String> = point.fields().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["x", "y", "color"]);
        assert_eq!(point.len(), 3);
        assert_eq!(point.field_by_number(5).map(|f| f.index()), Some(2));
        assert!(point.field_by_number(3).is_none());
    }

    #[test]
    fn test_identity_not_structure() {
        let pool = pool();
        let point = pool.get_message("Point").expect("Point");
        let twin = pool.get_message("Twin").expect("Twin");
        assert_eq!(point, pool.get_message("Point").expect("Point again"));
        assert_ne!(point, twin);
    }

    #[test]
    fn test_enum_lookup_resolve() {
        let pool = pool();
        let color = pool.get_enum("Color").expect("Color");
        assert_eq!(color.lookup(1), Some("RED"));
        assert_eq!(color.resolve("CRIMSON"), Some(1));
        assert_eq!(color.lookup(7), None);
        assert_eq!(color.resolve("GREEN"), None);
        assert_eq!(color.len(), 4);
        let symbols: Vec<&str> = color.values().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["NONE", "RED", "CRIMSON", "BLUE"]);
    }

    #[test]
    fn test_field_metadata() {
        let pool = pool();
        let point = pool.get_message("Point").expect("Point");
        let color = point.field("color").expect("color");
        assert_eq!(color.field_type(), FieldType::Enum);
        assert_eq!(color.label(), Label::Optional);
        assert_eq!(color.subtype_name(), Some("Color"));
        assert_eq!(
            color.subtype().and_then(|t| t.as_enum().cloned()),
            pool.get_enum("Color")
        );
        assert_eq!(color.containing_type(), &point);
        assert!(point.field("x").and_then(|f| f.subtype()).is_none());
    }
}
