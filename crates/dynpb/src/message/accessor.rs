// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element kinds and the single conversion pipeline used by every accessor.
//!
//! Named field access, reflective access through [`FieldDescriptor`], and
//! [`RepeatedField`] element access all funnel through [`ElementKind`], so
//! type checks, range checks and enum symbol handling are identical on
//! every path.
//!
//! [`FieldDescriptor`]: crate::FieldDescriptor
//! [`RepeatedField`]: crate::RepeatedField

use crate::descriptor::{EnumDescriptor, FieldType, MessageDescriptor, TypeRef};
use crate::error::{Error, Result};
use crate::message::{Message, Value};
use std::fmt;

/// Field type plus resolved subtype: what a singular slot or a repeated
/// element can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementKind {
    field_type: FieldType,
    subtype: Option<TypeRef>,
}

impl ElementKind {
    /// Validated element kind.
    ///
    /// `Message` needs a message descriptor, `Enum` an enum descriptor,
    /// and scalar kinds take none.
    pub fn new(field_type: FieldType, subtype: Option<TypeRef>) -> Result<Self> {
        match (field_type, &subtype) {
            (FieldType::Message, Some(TypeRef::Message(_)))
            | (FieldType::Enum, Some(TypeRef::Enum(_))) => {}
            (FieldType::Message | FieldType::Enum, None) => {
                return Err(Error::ArgumentError(format!(
                    "{} elements require a {} descriptor",
                    field_type, field_type
                )));
            }
            (FieldType::Message | FieldType::Enum, Some(other)) => {
                return Err(Error::ArgumentError(format!(
                    "{} elements cannot use type {}",
                    field_type,
                    other.name()
                )));
            }
            (_, Some(other)) => {
                return Err(Error::ArgumentError(format!(
                    "{} elements take no type argument (got {})",
                    field_type,
                    other.name()
                )));
            }
            (_, None) => {}
        }
        Ok(Self {
            field_type,
            subtype,
        })
    }

    /// Kind taken from a registered field; already consistent.
    pub(crate) fn resolved(field_type: FieldType, subtype: Option<TypeRef>) -> Self {
        Self {
            field_type,
            subtype,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn subtype(&self) -> Option<&TypeRef> {
        self.subtype.as_ref()
    }

    /// Message type, for `Message` kinds.
    pub fn message_type(&self) -> Option<&MessageDescriptor> {
        self.subtype.as_ref().and_then(TypeRef::as_message)
    }

    /// Enum type, for `Enum` kinds.
    pub fn enum_type(&self) -> Option<&EnumDescriptor> {
        self.subtype.as_ref().and_then(TypeRef::as_enum)
    }

    /// Stored default for a singular slot.
    pub(crate) fn default_value(&self) -> Value {
        match self.field_type {
            FieldType::Int32 | FieldType::Enum => Value::I32(0),
            FieldType::Int64 => Value::I64(0),
            FieldType::Uint32 => Value::U32(0),
            FieldType::Uint64 => Value::U64(0),
            FieldType::Bool => Value::Bool(false),
            FieldType::Float => Value::F32(0.0),
            FieldType::Double => Value::F64(0.0),
            FieldType::String => Value::String(String::new()),
            FieldType::Bytes => Value::Bytes(Vec::new()),
            FieldType::Message => Value::Null,
        }
    }

    /// Filler for a repeated element; message kinds get a fresh empty message.
    pub(crate) fn default_element(&self) -> Value {
        match self.message_type() {
            Some(desc) => Value::Message(Message::new(desc)),
            None => self.default_value(),
        }
    }

    /// True if `stored` equals the default, so codecs may omit it.
    pub(crate) fn is_default(&self, stored: &Value) -> bool {
        match stored {
            Value::Null => true,
            Value::Message(_) => false,
            Value::F32(v) => *v == 0.0 && v.is_sign_positive(),
            Value::F64(v) => *v == 0.0 && v.is_sign_positive(),
            other => *other == self.default_value(),
        }
    }

    /// Check and convert an incoming value to its stored form.
    ///
    /// `context` names the target (field or container) in error messages.
    pub(crate) fn coerce(&self, value: Value, context: &str) -> Result<Value> {
        match self.field_type {
            FieldType::Int32 | FieldType::Int64 | FieldType::Uint32 | FieldType::Uint64 => {
                let n = self.integral(&value, context)?;
                Ok(self.narrow(n))
            }
            FieldType::Enum => match value {
                Value::Symbol(symbol) => {
                    let enum_type = self.expect_enum()?;
                    enum_type
                        .resolve(&symbol)
                        .map(Value::I32)
                        .ok_or_else(|| Error::UnknownSymbol {
                            enum_name: enum_type.name().to_string(),
                            symbol,
                        })
                }
                other => {
                    let n = self.integral(&other, context)?;
                    Ok(self.narrow(n))
                }
            },
            FieldType::Bool => match value {
                Value::Bool(v) => Ok(Value::Bool(v)),
                other => Err(self.type_error(&other, context)),
            },
            FieldType::Float => match float_of(&value) {
                Some(f) => Ok(Value::F32(f as f32)),
                None => Err(self.type_error(&value, context)),
            },
            FieldType::Double => match float_of(&value) {
                Some(f) => Ok(Value::F64(f)),
                None => Err(self.type_error(&value, context)),
            },
            FieldType::String => match value {
                Value::String(s) => Ok(Value::String(s)),
                other => Err(self.type_error(&other, context)),
            },
            FieldType::Bytes => match value {
                Value::Bytes(b) => Ok(Value::Bytes(b)),
                other => Err(self.type_error(&other, context)),
            },
            FieldType::Message => match value {
                Value::Null => Ok(Value::Null),
                Value::Message(m) => {
                    if Some(m.descriptor()) == self.message_type() {
                        Ok(Value::Message(m))
                    } else {
                        Err(Error::TypeError(format!(
                            "{}: expected message {}, got message {}",
                            context,
                            self,
                            m.descriptor().name()
                        )))
                    }
                }
                other => Err(self.type_error(&other, context)),
            },
        }
    }

    /// Public view of a stored value: enums become symbols when declared.
    pub(crate) fn present(&self, stored: &Value) -> Value {
        match (stored, self.enum_type()) {
            (Value::I32(n), Some(enum_type)) => enum_type
                .lookup(*n)
                .map_or(Value::I32(*n), Value::symbol),
            _ => stored.clone(),
        }
    }

    fn expect_enum(&self) -> Result<&EnumDescriptor> {
        self.enum_type()
            .ok_or_else(|| Error::ArgumentError("enum element kind without enum type".to_string()))
    }

    /// Integer value of a numeric input, range-checked for this kind.
    fn integral(&self, value: &Value, context: &str) -> Result<i128> {
        let (min, max) = self
            .field_type
            .int_range()
            .ok_or_else(|| self.type_error(value, context))?;

        let n = match value {
            Value::F32(f) => integral_float(f64::from(*f), min, max, context)?,
            Value::F64(f) => integral_float(*f, min, max, context)?,
            other => other
                .as_integer()
                .ok_or_else(|| self.type_error(other, context))?,
        };

        if n < min || n > max {
            return Err(Error::RangeError(format!(
                "{}: value {} out of range for {}",
                context, n, self.field_type
            )));
        }
        Ok(n)
    }

    // Callers have range-checked `n` for this kind.
    fn narrow(&self, n: i128) -> Value {
        match self.field_type {
            FieldType::Int64 => Value::I64(n as i64),
            FieldType::Uint32 => Value::U32(n as u32),
            FieldType::Uint64 => Value::U64(n as u64),
            _ => Value::I32(n as i32),
        }
    }

    fn type_error(&self, value: &Value, context: &str) -> Error {
        Error::TypeError(format!(
            "{}: expected {}, got {}",
            context,
            self,
            value.kind_name()
        ))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{} {}", self.field_type, subtype.name()),
            None => write!(f, "{}", self.field_type),
        }
    }
}

fn float_of(value: &Value) -> Option<f64> {
    match value {
        Value::F32(f) => Some(f64::from(*f)),
        Value::F64(f) => Some(*f),
        other => other.as_integer().map(|n| n as f64),
    }
}

/// Convert a float to an integer only if it is finite, integral and in range.
///
/// The upper bound is exclusive at `max + 1`: `max` itself is often not
/// representable as f64 and would round up past the range.
fn integral_float(f: f64, min: i128, max: i128, context: &str) -> Result<i128> {
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(Error::RangeError(format!(
            "{}: {} is not an integral value",
            context, f
        )));
    }
    if f < min as f64 || f >= (max + 1) as f64 {
        return Err(Error::RangeError(format!(
            "{}: value {} out of range",
            context, f
        )));
    }
    Ok(f as i128)
}
