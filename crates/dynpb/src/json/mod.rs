// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON codec.
//!
//! Messages map to JSON objects keyed by field name, in declaration order.
//!
//! - enums print as their symbol, or as a number when undeclared
//! - bytes print as standard base64
//! - 64-bit integers print as numbers and parse from numbers or decimal strings
//! - non-finite floats print as `"NaN"`, `"Infinity"`, `"-Infinity"`
//! - default-valued fields are omitted unless `emit_defaults` is set
//! - `null` leaves a field at its default
//!
//! Any value the message layer rejects on decode (wrong kind, out of
//! range, unknown symbol) is reported as `ParseError`.

use crate::config::CodecConfig;
use crate::descriptor::{FieldDescriptor, FieldType, MessageDescriptor};
use crate::error::{Error, Result};
use crate::message::graph::PathGuard;
use crate::message::{ElementKind, Message, RepeatedField, Value};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Number, Value as Json};

/// Encode `message` as JSON text with the default configuration.
pub fn encode_json(message: &Message) -> Result<String> {
    encode_json_with(message, &CodecConfig::default())
}

/// Encode `message` as JSON text.
///
/// Fails with `CyclicStructure` if the message reaches itself.
pub fn encode_json_with(message: &Message, config: &CodecConfig) -> Result<String> {
    let mut encoder = JsonEncoder {
        path: PathGuard::new(config.max_depth),
        emit_defaults: config.emit_defaults,
    };
    let json = encoder.message(message)?;
    serde_json::to_string(&json).map_err(|e| Error::ParseError(format!("JSON output: {}", e)))
}

/// Decode JSON text as a `descriptor` message with the default configuration.
pub fn decode_json(descriptor: &MessageDescriptor, text: &str) -> Result<Message> {
    decode_json_with(descriptor, text, &CodecConfig::default())
}

/// Decode JSON text as a `descriptor` message.
pub fn decode_json_with(
    descriptor: &MessageDescriptor,
    text: &str,
    config: &CodecConfig,
) -> Result<Message> {
    let json: Json =
        serde_json::from_str(text).map_err(|e| Error::ParseError(format!("invalid JSON: {}", e)))?;
    let mut decoder = JsonDecoder { config, depth: 0 };
    decoder.message(descriptor, &json)
}

// ============================================================================
// Encoding
// ============================================================================

struct JsonEncoder {
    path: PathGuard,
    emit_defaults: bool,
}

impl JsonEncoder {
    fn message(&mut self, message: &Message) -> Result<Json> {
        self.path.enter(message)?;
        let mut object = Map::new();
        {
            let slots = message.slots();
            for (field, slot) in message.descriptor().fields().zip(slots.iter()) {
                if let Some(json) = self.field(&field, slot)? {
                    object.insert(field.name().to_string(), json);
                }
            }
        }
        self.path.leave(message);
        Ok(Json::Object(object))
    }

    fn field(&mut self, field: &FieldDescriptor, slot: &Value) -> Result<Option<Json>> {
        let kind = field.kind();
        match slot {
            Value::Repeated(list) => {
                if list.is_empty() && !self.emit_defaults {
                    return Ok(None);
                }
                self.list(&kind, list).map(Some)
            }
            Value::Null => Ok(self.emit_defaults.then_some(Json::Null)),
            Value::Message(sub) => self.message(sub).map(Some),
            scalar => {
                if kind.is_default(scalar) && !self.emit_defaults {
                    return Ok(None);
                }
                Ok(Some(scalar_to_json(&kind, scalar)))
            }
        }
    }

    fn list(&mut self, kind: &ElementKind, list: &RepeatedField) -> Result<Json> {
        let items = list.items();
        let mut array = Vec::with_capacity(items.len());
        for item in items.iter() {
            array.push(match item {
                Value::Message(sub) => self.message(sub)?,
                other => scalar_to_json(kind, other),
            });
        }
        Ok(Json::Array(array))
    }
}

fn scalar_to_json(kind: &ElementKind, stored: &Value) -> Json {
    match stored {
        Value::Bool(v) => Json::Bool(*v),
        Value::I32(v) => match kind.enum_type().and_then(|e| e.lookup(*v)) {
            Some(symbol) => Json::String(symbol.to_string()),
            None => Json::from(*v),
        },
        Value::I64(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::F32(v) => float_to_json(f64::from(*v)),
        Value::F64(v) => float_to_json(*v),
        Value::String(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::String(STANDARD.encode(b)),
        Value::Null
        | Value::Symbol(_)
        | Value::Message(_)
        | Value::Repeated(_)
        | Value::List(_) => Json::Null,
    }
}

fn float_to_json(v: f64) -> Json {
    match Number::from_f64(v) {
        Some(n) => Json::Number(n),
        None if v.is_nan() => Json::String("NaN".to_string()),
        None if v > 0.0 => Json::String("Infinity".to_string()),
        None => Json::String("-Infinity".to_string()),
    }
}

// ============================================================================
// Decoding
// ============================================================================

struct JsonDecoder<'a> {
    config: &'a CodecConfig,
    depth: usize,
}

impl JsonDecoder<'_> {
    fn message(&mut self, descriptor: &MessageDescriptor, json: &Json) -> Result<Message> {
        if self.depth >= self.config.max_depth {
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        let object = json.as_object().ok_or_else(|| {
            Error::ParseError(format!(
                "expected JSON object for message {}, got {}",
                descriptor.name(),
                json_kind(json)
            ))
        })?;

        self.depth += 1;
        let message = Message::new(descriptor);
        for (key, value) in object {
            let Some(field) = descriptor.field(key) else {
                if self.config.ignore_unknown_json_fields {
                    log::trace!(
                        "[json::decode] ignoring unknown key '{}' on {}",
                        key,
                        descriptor.name()
                    );
                    continue;
                }
                return Err(Error::ParseError(format!(
                    "unknown field '{}' on message {}",
                    key,
                    descriptor.name()
                )));
            };
            if value.is_null() {
                continue;
            }

            let rejected = |e: Error| Error::ParseError(format!("field {}: {}", field.name(), e));
            if field.is_repeated() {
                let array = value.as_array().ok_or_else(|| {
                    Error::ParseError(format!(
                        "field {}: expected JSON array, got {}",
                        field.name(),
                        json_kind(value)
                    ))
                })?;
                let values = array
                    .iter()
                    .map(|item| self.element(&field, item))
                    .collect::<Result<Vec<_>>>()?;
                message.repeated_slot(&field)?.replace(values).map_err(rejected)?;
            } else {
                let value = self.element(&field, value)?;
                message.set_field(&field, value).map_err(rejected)?;
            }
        }
        self.depth -= 1;
        Ok(message)
    }

    /// One JSON value as an unchecked [`Value`]; the message layer checks it.
    fn element(&mut self, field: &FieldDescriptor, json: &Json) -> Result<Value> {
        let unexpected = || {
            Error::ParseError(format!(
                "field {} ({}): unexpected JSON {}",
                field.name(),
                field.field_type(),
                json_kind(json)
            ))
        };

        match field.field_type() {
            FieldType::Message => {
                let kind = field.kind();
                let descriptor = kind.message_type().ok_or_else(unexpected)?;
                Ok(Value::Message(self.message(descriptor, json)?))
            }
            FieldType::Enum => match json {
                Json::String(symbol) => Ok(Value::symbol(symbol.as_str())),
                Json::Number(n) => number_to_value(n).ok_or_else(unexpected),
                _ => Err(unexpected()),
            },
            FieldType::Int32 | FieldType::Int64 | FieldType::Uint32 | FieldType::Uint64 => {
                match json {
                    Json::Number(n) => number_to_value(n).ok_or_else(unexpected),
                    Json::String(s) => parse_integer(s).ok_or_else(unexpected),
                    _ => Err(unexpected()),
                }
            }
            FieldType::Float | FieldType::Double => match json {
                Json::Number(n) => n.as_f64().map(Value::F64).ok_or_else(unexpected),
                Json::String(s) => parse_float(s).map(Value::F64).ok_or_else(unexpected),
                _ => Err(unexpected()),
            },
            FieldType::Bool => json.as_bool().map(Value::Bool).ok_or_else(unexpected),
            FieldType::String => json
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(unexpected),
            FieldType::Bytes => {
                let text = json.as_str().ok_or_else(unexpected)?;
                STANDARD.decode(text).map(Value::Bytes).map_err(|e| {
                    Error::ParseError(format!("field {}: invalid base64: {}", field.name(), e))
                })
            }
        }
    }
}

fn number_to_value(n: &Number) -> Option<Value> {
    if let Some(v) = n.as_i64() {
        Some(Value::I64(v))
    } else if let Some(v) = n.as_u64() {
        Some(Value::U64(v))
    } else {
        n.as_f64().map(Value::F64)
    }
}

fn parse_integer(text: &str) -> Option<Value> {
    if let Ok(v) = text.parse::<i64>() {
        Some(Value::I64(v))
    } else {
        text.parse::<u64>().ok().map(Value::U64)
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        other => other.parse().ok().filter(|v: &f64| v.is_finite()),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorPool, EnumDecl, MessageDecl};

    fn pool() -> DescriptorPool {
        let pool = DescriptorPool::new();
        pool.register(
            vec![MessageDecl::new("Sample")
                .optional("count", FieldType::Int64, 1)
                .optional("ratio", FieldType::Double, 2)
                .optional("blob", FieldType::Bytes, 3)
                .optional_of("tone", FieldType::Enum, 4, "Tone")
                .optional_of("inner", FieldType::Message, 5, "Sample")
                .repeated("flags", FieldType::Bool, 6)],
            vec![EnumDecl::new("Tone").variant("FLAT").variant("SHARP")],
        )
        .expect("register");
        pool
    }

    #[test]
    fn test_encode_conventions() {
        let pool = pool();
        let sample = pool.get_message("Sample").expect("Sample");
        let msg = sample.new_message();
        msg.set("count", i64::MIN).expect("set");
        msg.set("ratio", f64::NEG_INFINITY).expect("set");
        msg.set("blob", b"\x00\x01".to_vec()).expect("set");
        msg.set("tone", Value::symbol("SHARP")).expect("set");

        assert_eq!(
            encode_json(&msg),
            Ok(r#"{"count":-9223372036854775808,"ratio":"-Infinity","blob":"AAE=","tone":"SHARP"}"#.to_string())
        );
    }

    #[test]
    fn test_emit_defaults() {
        let pool = pool();
        let msg = pool.get_message("Sample").expect("Sample").new_message();
        assert_eq!(encode_json(&msg), Ok("{}".to_string()));

        let config = CodecConfig::default().with_emit_defaults(true);
        assert_eq!(
            encode_json_with(&msg, &config),
            Ok(r#"{"count":0,"ratio":0.0,"blob":"","tone":"FLAT","inner":null,"flags":[]}"#.to_string())
        );
    }

    #[test]
    fn test_decode_accepts_strings_for_numbers() {
        let pool = pool();
        let sample = pool.get_message("Sample").expect("Sample");
        let msg = decode_json(
            &sample,
            r#"{"count":"-12","ratio":"NaN","tone":1,"inner":{"flags":[true,false]},"blob":null}"#,
        )
        .expect("decode");

        assert_eq!(msg.get("count"), Ok(Value::I64(-12)));
        assert!(msg.get_as::<f64>("ratio").map(f64::is_nan).unwrap_or(false));
        assert_eq!(msg.get("tone"), Ok(Value::symbol("SHARP")));
        let inner: Message = msg.get_as("inner").expect("inner");
        let flags: RepeatedField = inner.get_as("flags").expect("flags");
        assert_eq!(flags.to_vec(), vec![Value::Bool(true), Value::Bool(false)]);
        assert_eq!(msg.get("blob"), Ok(Value::Bytes(Vec::new())));
    }

    #[test]
    fn test_decode_errors_are_parse_errors() {
        let pool = pool();
        let sample = pool.get_message("Sample").expect("Sample");
        for text in [
            "[1]",
            "{",
            r#"{"nope":1}"#,
            r#"{"count":1.5}"#,
            r#"{"tone":"MINOR"}"#,
            r#"{"blob":"***"}"#,
            r#"{"flags":true}"#,
            r#"{"inner":3}"#,
        ] {
            let result = decode_json(&sample, text);
            assert!(
                matches!(result, Err(Error::ParseError(_))),
                "{} gave {:?}",
                text,
                result
            );
        }
    }

    #[test]
    fn test_ignore_unknown_fields() {
        let pool = pool();
        let sample = pool.get_message("Sample").expect("Sample");
        let config = CodecConfig::default().with_ignore_unknown_json_fields(true);
        let msg = decode_json_with(&sample, r#"{"nope":1,"count":3}"#, &config).expect("decode");
        assert_eq!(msg.get("count"), Ok(Value::I64(3)));
    }

    #[test]
    fn test_encode_cycle() {
        let pool = pool();
        let msg = pool.get_message("Sample").expect("Sample").new_message();
        msg.set("inner", msg.clone()).expect("set");
        assert!(matches!(encode_json(&msg), Err(Error::CyclicStructure(_))));
    }
}
