// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message to wire bytes.

use super::varint::{put_fixed32, put_fixed64, put_varint, varint_len};
use super::WireType;
use crate::config::CodecConfig;
use crate::descriptor::FieldDescriptor;
use crate::error::Result;
use crate::message::graph::PathGuard;
use crate::message::{Message, RepeatedField, Value};

/// Depth-first encoder carrying the messages on the current path.
pub(super) struct Encoder {
    buffer: Vec<u8>,
    path: PathGuard,
}

impl Encoder {
    pub(super) fn new(config: &CodecConfig) -> Self {
        Self {
            buffer: Vec::new(),
            path: PathGuard::new(config.max_depth),
        }
    }

    pub(super) fn finish(mut self, message: &Message) -> Result<Vec<u8>> {
        self.message(message)?;
        Ok(self.buffer)
    }

    fn message(&mut self, message: &Message) -> Result<()> {
        self.path.enter(message)?;
        {
            let slots = message.slots();
            for (field, slot) in message.descriptor().fields().zip(slots.iter()) {
                self.field(&field, slot)?;
            }
        }
        self.path.leave(message);
        Ok(())
    }

    fn field(&mut self, field: &FieldDescriptor, slot: &Value) -> Result<()> {
        match slot {
            Value::Repeated(list) => self.repeated(field, list),
            Value::Null => Ok(()),
            Value::Message(sub) => {
                self.tag(field.number(), WireType::LengthDelimited);
                self.nested(sub)
            }
            scalar => {
                if !field.kind().is_default(scalar) {
                    self.tag(field.number(), WireType::of(field.field_type()));
                    put_scalar(&mut self.buffer, scalar);
                }
                Ok(())
            }
        }
    }

    fn repeated(&mut self, field: &FieldDescriptor, list: &RepeatedField) -> Result<()> {
        let items = list.items();
        if items.is_empty() {
            return Ok(());
        }

        if field.field_type().is_packable() {
            let mut packed = Vec::new();
            for item in items.iter() {
                put_scalar(&mut packed, item);
            }
            self.tag(field.number(), WireType::LengthDelimited);
            self.delimited(&packed);
            return Ok(());
        }

        for item in items.iter() {
            self.tag(field.number(), WireType::LengthDelimited);
            match item {
                Value::Message(sub) => self.nested(sub)?,
                other => put_scalar(&mut self.buffer, other),
            }
        }
        Ok(())
    }

    /// Length-prefixed submessage.
    fn nested(&mut self, message: &Message) -> Result<()> {
        let outer = std::mem::take(&mut self.buffer);
        let result = self.message(message);
        let body = std::mem::replace(&mut self.buffer, outer);
        result?;
        self.delimited(&body);
        Ok(())
    }

    fn tag(&mut self, number: u32, wire_type: WireType) {
        put_varint(
            &mut self.buffer,
            (u64::from(number) << 3) | wire_type as u64,
        );
    }

    fn delimited(&mut self, payload: &[u8]) {
        let len = payload.len() as u64;
        self.buffer.reserve(varint_len(len) + payload.len());
        put_varint(&mut self.buffer, len);
        self.buffer.extend_from_slice(payload);
    }
}

/// Payload of one stored scalar. Strings and bytes carry their length prefix.
fn put_scalar(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Bool(v) => put_varint(out, u64::from(*v)),
        // int32 and enum: negative values sign-extend to 10 bytes.
        Value::I32(v) => put_varint(out, i64::from(*v) as u64),
        Value::I64(v) => put_varint(out, *v as u64),
        Value::U32(v) => put_varint(out, u64::from(*v)),
        Value::U64(v) => put_varint(out, *v),
        Value::F32(v) => put_fixed32(out, v.to_bits()),
        Value::F64(v) => put_fixed64(out, v.to_bits()),
        Value::String(s) => {
            put_varint(out, s.len() as u64);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            put_varint(out, b.len() as u64);
            out.extend_from_slice(b);
        }
        // Not stored in scalar slots.
        Value::Null
        | Value::Symbol(_)
        | Value::Message(_)
        | Value::Repeated(_)
        | Value::List(_) => {}
    }
}
