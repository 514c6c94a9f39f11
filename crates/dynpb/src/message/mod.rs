// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message instances with runtime type checking.
//!
//! A [`Message`] owns one slot per declared field. Singular slots hold a
//! scalar, an enum's raw integer, or a submessage handle; repeated slots
//! always hold a [`RepeatedField`] of the field's element kind.
//!
//! Messages and containers are shared handles: assigning a submessage or a
//! container stores a reference, so the same object can appear in several
//! parents (or, through a back-edge, inside itself).
//!
//! # Example
//!
//! ```rust
//! use dynpb::{DescriptorPool, FieldType, MessageDecl, Value};
//!
//! let pool = DescriptorPool::new();
//! pool.register(
//!     vec![MessageDecl::new("Point")
//!         .optional("x", FieldType::Int32, 1)
//!         .optional("label", FieldType::String, 2)],
//!     vec![],
//! ).unwrap();
//!
//! let point = pool.get_message("Point").unwrap().new_message();
//! point.set("x", 42).unwrap();
//! point.set("label", "origin").unwrap();
//! assert_eq!(point.get("x").unwrap(), Value::I32(42));
//! assert_eq!(point.get_as::<String>("label").unwrap(), "origin");
//! ```

mod accessor;
pub(crate) mod graph;
mod repeated;
mod value;

pub use accessor::ElementKind;
pub use repeated::RepeatedField;
pub use value::{FromValue, Value};

use crate::config::CodecConfig;
use crate::descriptor::{FieldDescriptor, MessageDescriptor};
use crate::error::{Error, Result};
use parking_lot::{RwLock, RwLockReadGuard};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct MessageInner {
    descriptor: MessageDescriptor,
    slots: RwLock<Vec<Value>>,
}

/// A message instance bound to one [`MessageDescriptor`].
///
/// `Clone` copies the handle, not the message. Equality is structural and
/// tolerates cycles.
#[derive(Clone)]
pub struct Message {
    inner: Arc<MessageInner>,
}

impl Message {
    /// Empty message: every singular field at its default, every repeated
    /// field an empty container.
    pub fn new(descriptor: &MessageDescriptor) -> Self {
        let slots = descriptor
            .fields()
            .map(|field| {
                let kind = field.kind();
                if field.is_repeated() {
                    Value::Repeated(RepeatedField::with_kind(kind))
                } else {
                    kind.default_value()
                }
            })
            .collect();
        Self::from_slots(descriptor.clone(), slots)
    }

    /// Message built from `(field name, value)` pairs.
    ///
    /// Repeated fields also accept a [`Value::List`], whose elements are
    /// checked one by one. The first bad pair fails the whole construction.
    pub fn with_fields<I, S>(descriptor: &MessageDescriptor, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let message = Self::new(descriptor);
        for (name, value) in fields {
            let field = message.field(name.as_ref())?;
            match value {
                Value::List(items) if field.is_repeated() => {
                    message.repeated_slot(&field)?.replace(items)?;
                }
                other => message.set_field(&field, other)?,
            }
        }
        Ok(message)
    }

    pub(crate) fn from_slots(descriptor: MessageDescriptor, slots: Vec<Value>) -> Self {
        Self {
            inner: Arc::new(MessageInner {
                descriptor,
                slots: RwLock::new(slots),
            }),
        }
    }

    /// Message type.
    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.inner.descriptor
    }

    /// Identity of the underlying message, stable while any handle lives.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Stored slots, in field declaration order.
    pub(crate) fn slots(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.inner.slots.read_recursive()
    }

    /// Overwrite one slot with an already-checked value.
    pub(crate) fn store(&self, index: usize, value: Value) {
        if let Some(slot) = self.inner.slots.write().get_mut(index) {
            *slot = value;
        }
    }

    fn field(&self, name: &str) -> Result<FieldDescriptor> {
        self.descriptor()
            .field_index(name)
            .map(|index| self.descriptor().field_at(index))
            .ok_or_else(|| Error::unknown_field(self.descriptor().name(), name))
    }

    fn check_owner(&self, field: &FieldDescriptor) -> Result<()> {
        if field.containing_type() == self.descriptor() {
            Ok(())
        } else {
            Err(Error::TypeError(format!(
                "field {}.{} does not belong to message {}",
                field.containing_type().name(),
                field.name(),
                self.descriptor().name()
            )))
        }
    }

    /// The container currently stored in a repeated slot.
    pub(crate) fn repeated_slot(&self, field: &FieldDescriptor) -> Result<RepeatedField> {
        match self.slots().get(field.index()) {
            Some(Value::Repeated(list)) => Ok(list.clone()),
            _ => Err(Error::TypeError(format!(
                "field {} is not repeated",
                field.name()
            ))),
        }
    }

    /// Read a field by name.
    ///
    /// Repeated fields return the live container handle; enum fields return
    /// a symbol when the stored number is declared.
    pub fn get(&self, name: &str) -> Result<Value> {
        let field = self.field(name)?;
        self.get_field(&field)
    }

    /// Read a field by name into a concrete type.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?)
    }

    /// Write a field by name.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?;
        self.set_field(&field, value.into())
    }

    /// Read a field through its descriptor.
    pub fn get_field(&self, field: &FieldDescriptor) -> Result<Value> {
        self.check_owner(field)?;
        let slots = self.slots();
        let stored = slots
            .get(field.index())
            .ok_or_else(|| Error::unknown_field(self.descriptor().name(), field.name()))?;
        Ok(field.kind().present(stored))
    }

    /// Write a field through its descriptor.
    ///
    /// Repeated fields take a [`RepeatedField`] of exactly the field's
    /// element kind, stored by reference.
    pub fn set_field(&self, field: &FieldDescriptor, value: Value) -> Result<()> {
        self.check_owner(field)?;
        let stored = if field.is_repeated() {
            match value {
                Value::Repeated(list) if *list.kind() == field.kind() => Value::Repeated(list),
                Value::Repeated(list) => {
                    return Err(Error::TypeError(format!(
                        "field {}: expected repeated {}, got repeated {}",
                        field.name(),
                        field.kind(),
                        list.kind()
                    )));
                }
                other => {
                    return Err(Error::TypeError(format!(
                        "field {}: expected repeated {}, got {}",
                        field.name(),
                        field.kind(),
                        other.kind_name()
                    )));
                }
            }
        } else {
            field
                .kind()
                .coerce(value, &format!("field {}", field.name()))?
        };
        self.store(field.index(), stored);
        Ok(())
    }

    /// Reset a field to its default. A repeated field gets a new empty
    /// container; the old one is left untouched for other holders.
    pub fn clear_field(&self, name: &str) -> Result<()> {
        let field = self.field(name)?;
        let kind = field.kind();
        let value = if field.is_repeated() {
            Value::Repeated(RepeatedField::with_kind(kind))
        } else {
            kind.default_value()
        };
        self.store(field.index(), value);
        Ok(())
    }

    /// True if a field differs from its default (non-empty for repeated
    /// fields, set for submessages).
    pub fn has(&self, name: &str) -> Result<bool> {
        let field = self.field(name)?;
        let slots = self.slots();
        Ok(match slots.get(field.index()) {
            Some(Value::Repeated(list)) => !list.is_empty(),
            Some(stored) => !field.kind().is_default(stored),
            None => false,
        })
    }

    /// Shallow copy: new slot table, shared submessages and containers.
    pub fn dup(&self) -> Message {
        Self::from_slots(self.descriptor().clone(), self.slots().clone())
    }

    /// Recursive copy sharing nothing with `self`.
    ///
    /// Fails with `CyclicStructure` if the message reaches itself, or with
    /// `DepthLimitExceeded` past the default nesting limit.
    pub fn deep_copy(&self) -> Result<Message> {
        self.deep_copy_with(&CodecConfig::default())
    }

    /// [`deep_copy`](Self::deep_copy) bounded by `config.max_depth`.
    pub fn deep_copy_with(&self, config: &CodecConfig) -> Result<Message> {
        graph::deep_copy_message(self, config.max_depth)
    }

    /// True if both handles refer to the same message.
    pub fn ptr_eq(&self, other: &Message) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        crate::wire::encode(self)
    }

    /// Encode to JSON text.
    #[cfg(feature = "json")]
    pub fn encode_json(&self) -> Result<String> {
        crate::json::encode_json(self)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        graph::messages_equal(self, other)
    }
}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        graph::hash_message(self, state);
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        graph::fmt_message(self, f)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        graph::fmt_message(self, f)
    }
}
