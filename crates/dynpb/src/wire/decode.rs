// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire bytes to message.

use super::varint::{read_fixed32, read_fixed64, read_varint};
use super::WireType;
use crate::config::{CodecConfig, MAX_FIELD_NUMBER};
use crate::descriptor::{FieldDescriptor, FieldType};
use crate::error::{Error, Result};
use crate::message::{Message, Value};

pub(super) struct Decoder {
    max_depth: usize,
    depth: usize,
}

impl Decoder {
    pub(super) fn new(config: &CodecConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Merge the fields in `buf` into `message`.
    ///
    /// Only called on messages this decode created, so a failure never
    /// leaves a caller-visible message half-written.
    pub(super) fn merge(&mut self, message: &Message, buf: &[u8]) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }
        self.depth += 1;

        let mut pos = 0;
        while pos < buf.len() {
            let (number, wire_type, used) = read_tag(&buf[pos..])?;
            pos += used;
            pos += match message.descriptor().field_by_number(number) {
                Some(field) => self.field(message, &field, wire_type, &buf[pos..])?,
                None => {
                    log::trace!(
                        "[wire::decode] skipping unknown field {} ({:?}) on {}",
                        number,
                        wire_type,
                        message.descriptor().name()
                    );
                    self.skip(&buf[pos..], wire_type, number, 0)?
                }
            };
        }

        self.depth -= 1;
        Ok(())
    }

    /// Decode one occurrence of `field`; returns the bytes consumed.
    fn field(
        &mut self,
        message: &Message,
        field: &FieldDescriptor,
        wire_type: WireType,
        buf: &[u8],
    ) -> Result<usize> {
        let field_type = field.field_type();

        if field.is_repeated() {
            let list = message.repeated_slot(field)?;

            if wire_type == WireType::LengthDelimited && field_type.is_packable() {
                let (payload, used) = read_delimited(buf)?;
                let mut p = 0;
                while p < payload.len() {
                    let (value, n) = read_scalar(field_type, &payload[p..])?;
                    list.push_stored(value);
                    p += n;
                }
                return Ok(used);
            }

            expect_wire_type(field, wire_type)?;
            let (value, used) = if field_type == FieldType::Message {
                let (payload, used) = read_delimited(buf)?;
                let element = self.submessage(field)?;
                self.merge(&element, payload)?;
                (Value::Message(element), used)
            } else {
                read_scalar(field_type, buf)?
            };
            list.push_stored(value);
            return Ok(used);
        }

        expect_wire_type(field, wire_type)?;
        if field_type == FieldType::Message {
            let (payload, used) = read_delimited(buf)?;
            // A repeated occurrence of a singular submessage merges into it.
            let existing = match message.slots().get(field.index()) {
                Some(Value::Message(sub)) => Some(sub.clone()),
                _ => None,
            };
            let target = match existing {
                Some(sub) => sub,
                None => {
                    let sub = self.submessage(field)?;
                    message.store(field.index(), Value::Message(sub.clone()));
                    sub
                }
            };
            self.merge(&target, payload)?;
            return Ok(used);
        }

        let (value, used) = read_scalar(field_type, buf)?;
        message.store(field.index(), value);
        Ok(used)
    }

    fn submessage(&self, field: &FieldDescriptor) -> Result<Message> {
        field
            .kind()
            .message_type()
            .map(Message::new)
            .ok_or_else(|| {
                Error::ParseError(format!("field {} has no message type", field.name()))
            })
    }

    /// Skip one unknown field; returns the bytes consumed.
    fn skip(&self, buf: &[u8], wire_type: WireType, number: u32, nesting: usize) -> Result<usize> {
        match wire_type {
            WireType::Varint => read_varint(buf).map(|(_, n)| n),
            WireType::Fixed64 => read_fixed64(buf).map(|_| 8),
            WireType::Fixed32 => read_fixed32(buf).map(|_| 4),
            WireType::LengthDelimited => read_delimited(buf).map(|(_, n)| n),
            WireType::StartGroup => {
                if nesting >= self.max_depth {
                    return Err(Error::DepthLimitExceeded(self.max_depth));
                }
                let mut pos = 0;
                loop {
                    if pos >= buf.len() {
                        return Err(Error::ParseError(format!(
                            "unterminated group {}",
                            number
                        )));
                    }
                    let (inner, inner_type, used) = read_tag(&buf[pos..])?;
                    pos += used;
                    if inner_type == WireType::EndGroup {
                        if inner != number {
                            return Err(Error::ParseError(format!(
                                "group {} closed by end-group {}",
                                number, inner
                            )));
                        }
                        return Ok(pos);
                    }
                    pos += self.skip(&buf[pos..], inner_type, inner, nesting + 1)?;
                }
            }
            WireType::EndGroup => Err(Error::ParseError(format!(
                "unexpected end-group for field {}",
                number
            ))),
        }
    }
}

/// Split a tag into field number and wire type.
fn read_tag(buf: &[u8]) -> Result<(u32, WireType, usize)> {
    let (tag, used) = read_varint(buf)?;
    let number = tag >> 3;
    if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(Error::ParseError(format!("invalid field number {}", number)));
    }
    let wire_type = WireType::from_bits(tag & 0x7)?;
    Ok((number as u32, wire_type, used))
}

fn expect_wire_type(field: &FieldDescriptor, wire_type: WireType) -> Result<()> {
    let expected = WireType::of(field.field_type());
    if wire_type == expected {
        Ok(())
    } else {
        Err(Error::ParseError(format!(
            "field {} ({}) has wire type {:?}, expected {:?}",
            field.name(),
            field.field_type(),
            wire_type,
            expected
        )))
    }
}

/// Length-prefixed payload and the total bytes consumed.
fn read_delimited(buf: &[u8]) -> Result<(&[u8], usize)> {
    let (len, prefix) = read_varint(buf)?;
    let end = usize::try_from(len)
        .ok()
        .and_then(|len| prefix.checked_add(len))
        .filter(|end| *end <= buf.len())
        .ok_or_else(|| Error::ParseError("truncated length-delimited field".to_string()))?;
    Ok((&buf[prefix..end], end))
}

/// One scalar value in stored form; returns it and the bytes consumed.
fn read_scalar(field_type: FieldType, buf: &[u8]) -> Result<(Value, usize)> {
    let (raw, used) = match field_type {
        FieldType::Float => return read_fixed32(buf).map(|v| (Value::F32(f32::from_bits(v)), 4)),
        FieldType::Double => return read_fixed64(buf).map(|v| (Value::F64(f64::from_bits(v)), 8)),
        FieldType::String => {
            let (payload, used) = read_delimited(buf)?;
            let text = std::str::from_utf8(payload)
                .map_err(|e| Error::ParseError(format!("invalid UTF-8 in string field: {}", e)))?;
            return Ok((Value::String(text.to_string()), used));
        }
        FieldType::Bytes => {
            let (payload, used) = read_delimited(buf)?;
            return Ok((Value::Bytes(payload.to_vec()), used));
        }
        FieldType::Message => {
            return Err(Error::ParseError(
                "message fields cannot be packed".to_string(),
            ));
        }
        _ => read_varint(buf)?,
    };

    // Oversized varints truncate to the field width, as protobuf does.
    let value = match field_type {
        FieldType::Int64 => Value::I64(raw as i64),
        FieldType::Uint32 => Value::U32(raw as u32),
        FieldType::Uint64 => Value::U64(raw),
        FieldType::Bool => Value::Bool(raw != 0),
        _ => Value::I32(raw as i32),
    };
    Ok((value, used))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tag() {
        assert_eq!(read_tag(&[0x08]), Ok((1, WireType::Varint, 1)));
        assert_eq!(read_tag(&[0x92, 0x01]), Ok((18, WireType::LengthDelimited, 2)));
        assert!(read_tag(&[0x00]).is_err());
        assert!(read_tag(&[0x0E]).is_err());
    }

    #[test]
    fn test_read_delimited_bounds() {
        assert_eq!(read_delimited(&[0x02, b'a', b'b', b'c']), Ok((&b"ab"[..], 3)));
        assert!(read_delimited(&[0x05, b'a']).is_err());
        assert!(read_delimited(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]).is_err());
    }

    #[test]
    fn test_read_scalar_widths() {
        let minus_one = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(read_scalar(FieldType::Int32, &minus_one), Ok((Value::I32(-1), 10)));
        assert_eq!(read_scalar(FieldType::Enum, &minus_one), Ok((Value::I32(-1), 10)));
        assert_eq!(read_scalar(FieldType::Uint64, &minus_one), Ok((Value::U64(u64::MAX), 10)));
        assert_eq!(read_scalar(FieldType::Bool, &[0x02]), Ok((Value::Bool(true), 1)));
        assert!(read_scalar(FieldType::String, &[0x01, 0xFF]).is_err());
    }
}
