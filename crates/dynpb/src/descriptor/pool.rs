// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor pool: batch registration with two-phase name resolution.
//!
//! ## Type Resolution
//!
//! A batch is registered in two passes. The first pass assigns every new
//! message and enum an index and checks names for collisions; the second
//! builds field tables and resolves subtype names against the union of the
//! existing pool and the batch. Forward and mutually recursive references
//! therefore resolve as long as the target is somewhere in the batch.
//!
//! The pool is copy-on-write: a successful batch publishes a new snapshot in
//! one atomic store, a rejected batch publishes nothing.

use crate::config::{MAX_FIELD_NUMBER, RESERVED_FIELD_NUMBERS};
use crate::descriptor::{
    EnumDecl, EnumDescriptor, FieldDecl, FieldType, Label, MessageDecl, MessageDescriptor, TypeRef,
};
use crate::error::{Error, Result};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

/// Index of a registered type inside a pool snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeIndex {
    Message(usize),
    Enum(usize),
}

#[derive(Debug)]
pub(crate) struct FieldDef {
    pub(crate) name: String,
    pub(crate) number: u32,
    pub(crate) field_type: FieldType,
    pub(crate) label: Label,
    pub(crate) subtype_name: Option<String>,
    pub(crate) subtype: Option<TypeIndex>,
}

#[derive(Debug)]
pub(crate) struct MessageDef {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) by_number: HashMap<u32, usize>,
}

#[derive(Debug)]
pub(crate) struct EnumDef {
    pub(crate) name: String,
    pub(crate) values: Vec<(String, i32)>,
    pub(crate) by_symbol: HashMap<String, i32>,
    /// First declared symbol for each integer.
    pub(crate) by_value: HashMap<i32, usize>,
}

/// Immutable pool snapshot. Indices are stable across snapshots because
/// registration only appends.
#[derive(Debug, Default)]
pub(crate) struct PoolInner {
    pub(crate) messages: Vec<Arc<MessageDef>>,
    pub(crate) enums: Vec<Arc<EnumDef>>,
    names: HashMap<String, TypeIndex>,
}

impl PoolInner {
    fn extend(&self, messages: Vec<MessageDecl>, enums: Vec<EnumDecl>) -> Result<PoolInner> {
        let mut names = self.names.clone();

        // Phase 1: claim names.
        let first_enum = self.enums.len();
        for (offset, decl) in enums.iter().enumerate() {
            claim_name(&mut names, &decl.name, TypeIndex::Enum(first_enum + offset))?;
        }
        let first_message = self.messages.len();
        for (offset, decl) in messages.iter().enumerate() {
            claim_name(
                &mut names,
                &decl.name,
                TypeIndex::Message(first_message + offset),
            )?;
        }

        // Phase 2: build definitions and resolve subtypes.
        let mut next_enums = self.enums.clone();
        for decl in enums {
            next_enums.push(Arc::new(build_enum(decl)?));
        }
        let mut next_messages = self.messages.clone();
        for decl in messages {
            next_messages.push(Arc::new(build_message(decl, &names)?));
        }

        Ok(PoolInner {
            messages: next_messages,
            enums: next_enums,
            names,
        })
    }
}

fn claim_name(names: &mut HashMap<String, TypeIndex>, name: &str, index: TypeIndex) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSchema("type name must not be empty".into()));
    }
    match names.entry(name.to_string()) {
        Entry::Occupied(_) => Err(Error::InvalidSchema(format!(
            "type '{}' is already defined",
            name
        ))),
        Entry::Vacant(slot) => {
            slot.insert(index);
            Ok(())
        }
    }
}

fn build_enum(decl: EnumDecl) -> Result<EnumDef> {
    let mut by_symbol = HashMap::with_capacity(decl.values.len());
    let mut by_value = HashMap::with_capacity(decl.values.len());
    for (position, (symbol, value)) in decl.values.iter().enumerate() {
        if symbol.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "enum {} declares an empty symbol",
                decl.name
            )));
        }
        if by_symbol.insert(symbol.clone(), *value).is_some() {
            return Err(Error::InvalidSchema(format!(
                "enum {} declares symbol '{}' twice",
                decl.name, symbol
            )));
        }
        by_value.entry(*value).or_insert(position);
    }
    if !by_value.contains_key(&0) {
        return Err(Error::InvalidSchema(format!(
            "enum {} has no symbol with value 0",
            decl.name
        )));
    }
    Ok(EnumDef {
        name: decl.name,
        values: decl.values,
        by_symbol,
        by_value,
    })
}

fn build_message(decl: MessageDecl, names: &HashMap<String, TypeIndex>) -> Result<MessageDef> {
    let mut fields = Vec::with_capacity(decl.fields.len());
    let mut by_name = HashMap::with_capacity(decl.fields.len());
    let mut by_number = HashMap::with_capacity(decl.fields.len());

    for field in decl.fields {
        let context = format!("{}.{}", decl.name, field.name);
        validate_field(&field, &context)?;
        let subtype = resolve_subtype(&field, names, &context)?;
        let index = fields.len();
        if by_name.insert(field.name.clone(), index).is_some() {
            return Err(Error::InvalidSchema(format!(
                "duplicate field name {}",
                context
            )));
        }
        if by_number.insert(field.number, index).is_some() {
            return Err(Error::InvalidSchema(format!(
                "duplicate field number {} at {}",
                field.number, context
            )));
        }
        fields.push(FieldDef {
            name: field.name,
            number: field.number,
            field_type: field.field_type,
            label: field.label,
            subtype_name: field.subtype,
            subtype,
        });
    }

    Ok(MessageDef {
        name: decl.name,
        fields,
        by_name,
        by_number,
    })
}

fn validate_field(field: &FieldDecl, context: &str) -> Result<()> {
    if field.name.is_empty() {
        return Err(Error::InvalidSchema(format!("empty field name at {}", context)));
    }
    if field.label == Label::Required {
        return Err(Error::InvalidSchema(format!(
            "required fields are not supported ({})",
            context
        )));
    }
    if field.number == 0 || field.number > MAX_FIELD_NUMBER {
        return Err(Error::InvalidSchema(format!(
            "field number {} out of range at {}",
            field.number, context
        )));
    }
    if RESERVED_FIELD_NUMBERS.contains(&field.number) {
        return Err(Error::InvalidSchema(format!(
            "field number {} is reserved ({})",
            field.number, context
        )));
    }
    Ok(())
}

fn resolve_subtype(
    field: &FieldDecl,
    names: &HashMap<String, TypeIndex>,
    context: &str,
) -> Result<Option<TypeIndex>> {
    match (&field.subtype, field.field_type.needs_subtype()) {
        (None, false) => Ok(None),
        (Some(name), false) => Err(Error::InvalidSchema(format!(
            "{} field {} cannot reference type '{}'",
            field.field_type, context, name
        ))),
        (None, true) => Err(Error::InvalidSchema(format!(
            "{} field {} has no subtype",
            field.field_type, context
        ))),
        (Some(name), true) => {
            let index = names.get(name).copied().ok_or_else(|| {
                Error::InvalidSchema(format!("unresolved type '{}' at {}", name, context))
            })?;
            match (field.field_type, index) {
                (FieldType::Message, TypeIndex::Message(_))
                | (FieldType::Enum, TypeIndex::Enum(_)) => Ok(Some(index)),
                _ => Err(Error::InvalidSchema(format!(
                    "type '{}' is not a {} ({})",
                    name, field.field_type, context
                ))),
            }
        }
    }
}

/// Registry of message and enum descriptors.
///
/// Lookups are lock-free reads of the current snapshot; registrations are
/// serialized and published atomically.
///
/// # Example
///
/// ```rust
/// use dynpb::{DescriptorPool, EnumDecl, FieldType, MessageDecl};
///
/// let pool = DescriptorPool::new();
/// pool.register(
///     vec![
///         MessageDecl::new("Node").optional_of("next", FieldType::Message, 1, "Node"),
///     ],
///     vec![EnumDecl::new("Color").value("NONE", 0).value("RED", 1)],
/// )
/// .unwrap();
///
/// let node = pool.get_message("Node").unwrap();
/// assert_eq!(node.field("next").unwrap().number(), 1);
/// assert_eq!(pool.get_enum("Color").unwrap().resolve("RED"), Some(1));
/// ```
pub struct DescriptorPool {
    inner: ArcSwap<PoolInner>,
    writer: Mutex<()>,
}

impl Default for DescriptorPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DescriptorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.inner.load();
        f.debug_struct("DescriptorPool")
            .field("messages", &snapshot.messages.len())
            .field("enums", &snapshot.enums.len())
            .finish()
    }
}

impl DescriptorPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(PoolInner::default()),
            writer: Mutex::new(()),
        }
    }

    /// Process-wide pool.
    pub fn global() -> &'static DescriptorPool {
        static GLOBAL: OnceLock<DescriptorPool> = OnceLock::new();
        GLOBAL.get_or_init(DescriptorPool::new)
    }

    /// Validate and insert a batch atomically.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` if any declaration in the batch is invalid; the pool
    /// is left unchanged.
    pub fn register(&self, messages: Vec<MessageDecl>, enums: Vec<EnumDecl>) -> Result<()> {
        let _writer = self.writer.lock();
        let current = self.inner.load_full();
        let (message_count, enum_count) = (messages.len(), enums.len());

        match current.extend(messages, enums) {
            Ok(next) => {
                self.inner.store(Arc::new(next));
                log::debug!(
                    "[DescriptorPool::register] committed {} messages, {} enums",
                    message_count,
                    enum_count
                );
                Ok(())
            }
            Err(e) => {
                log::debug!("[DescriptorPool::register] batch rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Look up a message descriptor by name.
    pub fn get_message(&self, name: &str) -> Option<MessageDescriptor> {
        match self.lookup(name)? {
            TypeRef::Message(desc) => Some(desc),
            TypeRef::Enum(_) => None,
        }
    }

    /// Look up an enum descriptor by name.
    pub fn get_enum(&self, name: &str) -> Option<EnumDescriptor> {
        match self.lookup(name)? {
            TypeRef::Enum(desc) => Some(desc),
            TypeRef::Message(_) => None,
        }
    }

    /// Look up any registered type by name.
    pub fn lookup(&self, name: &str) -> Option<TypeRef> {
        let snapshot = self.inner.load_full();
        let index = snapshot.names.get(name).copied()?;
        Some(TypeRef::from_index(&snapshot, index))
    }

    /// Names of all registered types.
    pub fn type_names(&self) -> HashSet<String> {
        self.inner.load().names.keys().cloned().collect()
    }
}
