// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed, growable container backing repeated fields.

use crate::config::CodecConfig;
use crate::descriptor::{EnumDescriptor, FieldType, MessageDescriptor, TypeRef};
use crate::error::{Error, Result};
use crate::message::{graph, ElementKind, Value};
use parking_lot::{RwLock, RwLockReadGuard};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct RepeatedInner {
    kind: ElementKind,
    items: RwLock<Vec<Value>>,
}

/// Ordered sequence of values of one [`ElementKind`].
///
/// Cloning a `RepeatedField` clones the handle: both handles see the same
/// elements. Use [`dup`](Self::dup) or [`deep_copy`](Self::deep_copy) for
/// independent containers. Every insertion runs the same checks as a
/// singular field of the element kind, and bulk operations are
/// all-or-nothing.
///
/// # Example
///
/// ```rust
/// use dynpb::{FieldType, RepeatedField, Value};
///
/// let list = RepeatedField::scalar(FieldType::Int32).unwrap();
/// list.push(Value::I32(5)).unwrap();
/// list.set(3, Value::I32(9)).unwrap();
/// assert_eq!(list.to_vec(), vec![Value::I32(5), Value::I32(0), Value::I32(0), Value::I32(9)]);
/// ```
#[derive(Clone)]
pub struct RepeatedField {
    inner: Arc<RepeatedInner>,
}

impl RepeatedField {
    /// Empty container of `field_type`; message and enum kinds need `subtype`.
    pub fn new(field_type: FieldType, subtype: Option<TypeRef>) -> Result<Self> {
        Ok(Self::with_kind(ElementKind::new(field_type, subtype)?))
    }

    /// Empty container of a scalar kind.
    pub fn scalar(field_type: FieldType) -> Result<Self> {
        Self::new(field_type, None)
    }

    /// Empty container of messages of type `descriptor`.
    pub fn of_message(descriptor: &MessageDescriptor) -> Self {
        Self::with_kind(ElementKind::resolved(
            FieldType::Message,
            Some(TypeRef::Message(descriptor.clone())),
        ))
    }

    /// Empty container of enum values of type `descriptor`.
    pub fn of_enum(descriptor: &EnumDescriptor) -> Self {
        Self::with_kind(ElementKind::resolved(
            FieldType::Enum,
            Some(TypeRef::Enum(descriptor.clone())),
        ))
    }

    /// Container pre-filled with `values`, each checked as by [`push`](Self::push).
    pub fn with_values(
        field_type: FieldType,
        subtype: Option<TypeRef>,
        values: Vec<Value>,
    ) -> Result<Self> {
        let field = Self::new(field_type, subtype)?;
        field.insert_all(values)?;
        Ok(field)
    }

    pub(crate) fn with_kind(kind: ElementKind) -> Self {
        Self::from_parts(kind, Vec::new())
    }

    /// Container over already-stored elements.
    pub(crate) fn from_parts(kind: ElementKind, items: Vec<Value>) -> Self {
        Self {
            inner: Arc::new(RepeatedInner {
                kind,
                items: RwLock::new(items),
            }),
        }
    }

    /// Element kind.
    pub fn kind(&self) -> &ElementKind {
        &self.inner.kind
    }

    /// Stored elements (enums as raw integers).
    pub(crate) fn items(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.inner.items.read_recursive()
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Err(Error::TypeError(format!(
                "repeated {} elements cannot be null",
                self.kind()
            )));
        }
        self.inner.kind.coerce(value, "repeated element")
    }

    /// Append an element already in stored form (decoders).
    pub(crate) fn push_stored(&self, value: Value) {
        self.inner.items.write().push(value);
    }

    fn coerce_all(&self, values: Vec<Value>) -> Result<Vec<Value>> {
        values.into_iter().map(|v| self.coerce(v)).collect()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Value> {
        let items = self.items();
        items.get(index).map(|v| self.inner.kind.present(v))
    }

    /// Append one element.
    pub fn push(&self, value: Value) -> Result<()> {
        let value = self.coerce(value)?;
        self.inner.items.write().push(value);
        Ok(())
    }

    /// Replace the element at `index`.
    ///
    /// Writing past the end grows the container; the gap is filled with the
    /// kind's default (fresh empty messages for message kinds).
    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        let value = self.coerce(value)?;
        let mut items = self.inner.items.write();
        if index >= items.len() {
            let kind = &self.inner.kind;
            let missing = index - items.len();
            items.extend((0..missing).map(|_| kind.default_element()));
            items.push(value);
        } else {
            items[index] = value;
        }
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&self) -> Option<Value> {
        let popped = self.inner.items.write().pop()?;
        Some(self.inner.kind.present(&popped))
    }

    /// Append several elements; nothing is appended if any is rejected.
    pub fn insert_all(&self, values: Vec<Value>) -> Result<()> {
        let values = self.coerce_all(values)?;
        self.inner.items.write().extend(values);
        Ok(())
    }

    /// Replace all contents; nothing changes if any element is rejected.
    pub fn replace(&self, values: Vec<Value>) -> Result<()> {
        let values = self.coerce_all(values)?;
        *self.inner.items.write() = values;
        Ok(())
    }

    /// Remove all elements.
    pub fn clear(&self) {
        self.inner.items.write().clear();
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        let items = self.items();
        items.iter().map(|v| self.inner.kind.present(v)).collect()
    }

    /// Iterate over a snapshot taken at call time.
    pub fn iter(&self) -> std::vec::IntoIter<Value> {
        self.to_vec().into_iter()
    }

    /// New container holding `self` followed by `other`. Kinds must match.
    pub fn concat(&self, other: &RepeatedField) -> Result<RepeatedField> {
        if self.kind() != other.kind() {
            return Err(Error::TypeError(format!(
                "cannot concatenate repeated {} with repeated {}",
                self.kind(),
                other.kind()
            )));
        }
        let mut items = self.items().clone();
        items.extend(other.items().iter().cloned());
        Ok(Self::from_parts(self.kind().clone(), items))
    }

    /// New container holding `self` followed by `values`, each checked.
    pub fn concat_values(&self, values: Vec<Value>) -> Result<RepeatedField> {
        let extra = self.coerce_all(values)?;
        let mut items = self.items().clone();
        items.extend(extra);
        Ok(Self::from_parts(self.kind().clone(), items))
    }

    /// Shallow copy: new container, same element handles.
    pub fn dup(&self) -> RepeatedField {
        Self::from_parts(self.kind().clone(), self.items().clone())
    }

    /// Recursive copy; fails with `CyclicStructure` if an element reaches itself.
    pub fn deep_copy(&self) -> Result<RepeatedField> {
        self.deep_copy_with(&CodecConfig::default())
    }

    /// Recursive copy nesting at most `config.max_depth` messages.
    pub fn deep_copy_with(&self, config: &CodecConfig) -> Result<RepeatedField> {
        graph::deep_copy_repeated(self, config.max_depth)
    }

    /// True if both handles refer to the same container.
    pub fn ptr_eq(&self, other: &RepeatedField) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for RepeatedField {
    fn eq(&self, other: &Self) -> bool {
        graph::repeated_equal(self, other)
    }
}

impl Hash for RepeatedField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        graph::hash_repeated(self, state);
    }
}

impl fmt::Display for RepeatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        graph::fmt_repeated(self, f)
    }
}

impl fmt::Debug for RepeatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepeatedField<{}>", self.kind())?;
        graph::fmt_repeated(self, f)
    }
}

impl IntoIterator for &RepeatedField {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
