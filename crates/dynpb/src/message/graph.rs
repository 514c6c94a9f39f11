// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Traversals over message graphs that may share or cycle.
//!
//! Messages and containers are reference handles, so a graph can be a DAG
//! or can reach itself. Every recursive walk here tracks the messages on
//! the current path (not every message ever seen): a shared submessage is
//! visited once per parent, and only a true back-edge counts as a cycle.

use crate::error::{Error, Result};
use crate::message::{Message, RepeatedField, Value};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Messages on the current traversal path, plus a depth bound.
pub(crate) struct PathGuard {
    on_path: HashSet<usize>,
    max_depth: usize,
}

impl PathGuard {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            on_path: HashSet::new(),
            max_depth,
        }
    }

    /// Push `message` onto the path.
    pub(crate) fn enter(&mut self, message: &Message) -> Result<()> {
        let id = message.id();
        if self.on_path.contains(&id) {
            log::debug!(
                "[PathGuard::enter] cycle through message {}",
                message.descriptor().name()
            );
            return Err(Error::CyclicStructure(format!(
                "message {} is reachable from itself",
                message.descriptor().name()
            )));
        }
        if self.on_path.len() >= self.max_depth {
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }
        self.on_path.insert(id);
        Ok(())
    }

    pub(crate) fn leave(&mut self, message: &Message) {
        self.on_path.remove(&message.id());
    }

    /// True if `message` is an ancestor on the current path.
    pub(crate) fn is_on_path(&self, message: &Message) -> bool {
        self.on_path.contains(&message.id())
    }
}

// ============================================================================
// Deep copy
// ============================================================================

pub(crate) fn deep_copy_message(message: &Message, max_depth: usize) -> Result<Message> {
    copy_message(message, &mut PathGuard::new(max_depth))
}

pub(crate) fn deep_copy_repeated(field: &RepeatedField, max_depth: usize) -> Result<RepeatedField> {
    copy_repeated(field, &mut PathGuard::new(max_depth))
}

fn copy_message(message: &Message, guard: &mut PathGuard) -> Result<Message> {
    guard.enter(message)?;
    let copied = {
        let slots = message.slots();
        slots
            .iter()
            .map(|slot| copy_value(slot, guard))
            .collect::<Result<Vec<_>>>()?
    };
    guard.leave(message);
    Ok(Message::from_slots(message.descriptor().clone(), copied))
}

fn copy_repeated(field: &RepeatedField, guard: &mut PathGuard) -> Result<RepeatedField> {
    let copied = {
        let items = field.items();
        items
            .iter()
            .map(|item| copy_value(item, guard))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(RepeatedField::from_parts(field.kind().clone(), copied))
}

fn copy_value(value: &Value, guard: &mut PathGuard) -> Result<Value> {
    Ok(match value {
        Value::Message(m) => Value::Message(copy_message(m, guard)?),
        Value::Repeated(r) => Value::Repeated(copy_repeated(r, guard)?),
        other => other.clone(),
    })
}

// ============================================================================
// Structural equality
// ============================================================================

/// Pairs of (left, right) message ids already being compared. Meeting a
/// pair again means the comparison looped; that branch is taken as equal
/// and the remaining fields decide.
type PairSet = HashSet<(usize, usize)>;

pub(crate) fn messages_equal(a: &Message, b: &Message) -> bool {
    message_eq(a, b, &mut PairSet::new())
}

pub(crate) fn repeated_equal(a: &RepeatedField, b: &RepeatedField) -> bool {
    repeated_eq(a, b, &mut PairSet::new())
}

fn message_eq(a: &Message, b: &Message, seen: &mut PairSet) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.descriptor() != b.descriptor() {
        return false;
    }
    if !seen.insert((a.id(), b.id())) {
        return true;
    }
    let left = a.slots();
    let right = b.slots();
    left.iter()
        .zip(right.iter())
        .all(|(x, y)| value_eq(x, y, seen))
}

fn repeated_eq(a: &RepeatedField, b: &RepeatedField, seen: &mut PairSet) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.kind() != b.kind() {
        return false;
    }
    let left = a.items();
    let right = b.items();
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(x, y)| value_eq(x, y, seen))
}

fn value_eq(x: &Value, y: &Value, seen: &mut PairSet) -> bool {
    match (x, y) {
        (Value::Message(a), Value::Message(b)) => message_eq(a, b, seen),
        (Value::Repeated(a), Value::Repeated(b)) => repeated_eq(a, b, seen),
        _ => x == y,
    }
}

// ============================================================================
// Hashing
// ============================================================================

pub(crate) fn hash_message<H: Hasher>(message: &Message, state: &mut H) {
    hash_shallow(message, state);
}

pub(crate) fn hash_repeated<H: Hasher>(field: &RepeatedField, state: &mut H) {
    field.kind().hash(state);
    let items = field.items();
    items.len().hash(state);
    for item in items.iter() {
        match item {
            Value::Message(m) => hash_shallow(m, state),
            other => hash_slot(other, state),
        }
    }
}

/// Descriptor plus top-level slots; submessages contribute only their type
/// and containers only their length.
///
/// Equality unrolls cycles of any shape, so a self-loop can equal a longer
/// cycle. Only what every equal pair shares at the first level is hashed.
fn hash_shallow<H: Hasher>(message: &Message, state: &mut H) {
    message.descriptor().hash(state);
    for slot in message.slots().iter() {
        hash_slot(slot, state);
    }
}

fn hash_slot<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(v) => v.hash(state),
        Value::I32(v) => v.hash(state),
        Value::I64(v) => v.hash(state),
        Value::U32(v) => v.hash(state),
        Value::U64(v) => v.hash(state),
        // -0.0 == 0.0, so both hash as zero.
        Value::F32(v) => (if *v == 0.0 { 0.0f32 } else { *v }).to_bits().hash(state),
        Value::F64(v) => (if *v == 0.0 { 0.0f64 } else { *v }).to_bits().hash(state),
        Value::String(v) | Value::Symbol(v) => v.hash(state),
        Value::Bytes(v) => v.hash(state),
        Value::Message(m) => m.descriptor().hash(state),
        Value::Repeated(r) => r.len().hash(state),
        Value::List(items) => items.len().hash(state),
    }
}

// ============================================================================
// Display
// ============================================================================

pub(crate) fn fmt_message(message: &Message, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_message_on_path(message, f, &mut PathGuard::new(usize::MAX))
}

pub(crate) fn fmt_repeated(field: &RepeatedField, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_repeated_on_path(field, f, &mut PathGuard::new(usize::MAX))
}

fn fmt_message_on_path(
    message: &Message,
    f: &mut fmt::Formatter<'_>,
    guard: &mut PathGuard,
) -> fmt::Result {
    let descriptor = message.descriptor();
    if guard.is_on_path(message) {
        return write!(f, "<cycle {}>", descriptor.name());
    }
    if guard.enter(message).is_err() {
        return f.write_str("<...>");
    }
    write!(f, "{} {{", descriptor.name())?;
    {
        let slots = message.slots();
        for (i, (field, slot)) in descriptor.fields().zip(slots.iter()).enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}: ", field.name())?;
            fmt_value(&field.kind().present(slot), f, guard)?;
        }
        if !slots.is_empty() {
            f.write_str(" ")?;
        }
    }
    guard.leave(message);
    f.write_str("}")
}

fn fmt_repeated_on_path(
    field: &RepeatedField,
    f: &mut fmt::Formatter<'_>,
    guard: &mut PathGuard,
) -> fmt::Result {
    f.write_str("[")?;
    let items = field.items();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_value(&field.kind().present(item), f, guard)?;
    }
    f.write_str("]")
}

fn fmt_value(value: &Value, f: &mut fmt::Formatter<'_>, guard: &mut PathGuard) -> fmt::Result {
    match value {
        Value::Message(m) => fmt_message_on_path(m, f, guard),
        Value::Repeated(r) => fmt_repeated_on_path(r, f, guard),
        other => write!(f, "{}", other),
    }
}
