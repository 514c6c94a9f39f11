// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared schema for the integration tests.

#![allow(dead_code)]

use dynpb::{
    DescriptorPool, EnumDecl, FieldType, Message, MessageDecl, MessageDescriptor, RepeatedField,
    Value,
};

/// Scalar kinds in declaration order, with their field-name suffix.
pub const SCALARS: [(&str, FieldType); 9] = [
    ("int32", FieldType::Int32),
    ("int64", FieldType::Int64),
    ("uint32", FieldType::Uint32),
    ("uint64", FieldType::Uint64),
    ("bool", FieldType::Bool),
    ("float", FieldType::Float),
    ("double", FieldType::Double),
    ("string", FieldType::String),
    ("bytes", FieldType::Bytes),
];

/// Pool holding `TestMessage` (every kind, optional 1..=11, repeated 12..=22),
/// `TestMessage2`, the mutually recursive `Recursive1`/`Recursive2`,
/// `BadFieldNames` and `TestEnum`.
pub fn basic_pool() -> DescriptorPool {
    let mut test_message = MessageDecl::new("TestMessage");
    let mut number = 1;
    for label in ["optional", "repeated"] {
        for (suffix, ty) in SCALARS {
            let name = format!("{}_{}", label, suffix);
            test_message = if label == "optional" {
                test_message.optional(name, ty, number)
            } else {
                test_message.repeated(name, ty, number)
            };
            number += 1;
        }
        let (msg_name, enum_name) = (format!("{}_msg", label), format!("{}_enum", label));
        test_message = if label == "optional" {
            test_message
                .optional_of(msg_name, FieldType::Message, number, "TestMessage2")
                .optional_of(enum_name, FieldType::Enum, number + 1, "TestEnum")
        } else {
            test_message
                .repeated_of(msg_name, FieldType::Message, number, "TestMessage2")
                .repeated_of(enum_name, FieldType::Enum, number + 1, "TestEnum")
        };
        number += 2;
    }

    let pool = DescriptorPool::new();
    pool.register(
        vec![
            test_message,
            MessageDecl::new("TestMessage2").optional("foo", FieldType::Int32, 1),
            MessageDecl::new("Recursive1").optional_of("foo", FieldType::Message, 1, "Recursive2"),
            MessageDecl::new("Recursive2").optional_of("foo", FieldType::Message, 1, "Recursive1"),
            MessageDecl::new("BadFieldNames")
                .optional("dup", FieldType::Int32, 1)
                .optional("class", FieldType::Int32, 2)
                .optional("a.b", FieldType::Int32, 3),
        ],
        vec![EnumDecl::new("TestEnum")
            .value("Default", 0)
            .value("A", 1)
            .value("B", 2)
            .value("C", 3)],
    )
    .expect("basic schema registers");
    pool
}

pub fn descriptor(pool: &DescriptorPool, name: &str) -> MessageDescriptor {
    pool.get_message(name)
        .unwrap_or_else(|| panic!("{} is registered", name))
}

/// `TestMessage2 { foo }`.
pub fn message2(pool: &DescriptorPool, foo: i32) -> Message {
    let m = descriptor(pool, "TestMessage2").new_message();
    m.set("foo", foo).expect("set foo");
    m
}

pub fn repeated(message: &Message, name: &str) -> RepeatedField {
    message
        .get_as::<RepeatedField>(name)
        .unwrap_or_else(|e| panic!("{} is repeated: {}", name, e))
}

pub fn ints(values: &[i32]) -> Vec<Value> {
    values.iter().map(|v| Value::I32(*v)).collect()
}

pub fn element(list: &RepeatedField, index: usize) -> Message {
    list.get(index)
        .and_then(|v| v.as_message().cloned())
        .unwrap_or_else(|| panic!("message at index {}", index))
}

/// A `TestMessage` with every kind of field populated.
pub fn populated(pool: &DescriptorPool) -> Message {
    let desc = descriptor(pool, "TestMessage");
    Message::with_fields(
        &desc,
        [
            ("optional_int32", Value::I32(-42)),
            ("optional_int64", Value::I64(-0x1_0000_0000)),
            ("optional_uint32", Value::U32(0x9000_0000)),
            ("optional_uint64", Value::U64(0x9000_0000_0000_0000)),
            ("optional_bool", Value::Bool(true)),
            ("optional_float", Value::F32(0.5)),
            ("optional_double", Value::F64(-1.25)),
            ("optional_string", Value::from("hello world")),
            ("optional_bytes", Value::Bytes(vec![0, 0xFF, 7])),
            ("optional_msg", Value::Message(message2(pool, 42))),
            ("optional_enum", Value::symbol("B")),
            ("repeated_int32", Value::list([42, 43, -44])),
            ("repeated_int64", Value::list([i64::MIN, 0, i64::MAX])),
            ("repeated_uint32", Value::list([0u32, u32::MAX])),
            ("repeated_uint64", Value::list([u64::MAX])),
            ("repeated_bool", Value::list([true, false, true])),
            ("repeated_float", Value::list([1.5f32, -2.0])),
            ("repeated_double", Value::list([0.25f64, 1e300])),
            ("repeated_string", Value::list(["a", "b", "c"])),
            ("repeated_bytes", Value::list([vec![1u8, 2], Vec::new()])),
            (
                "repeated_msg",
                Value::list([message2(pool, 1), message2(pool, 2)]),
            ),
            (
                "repeated_enum",
                Value::list([
                    Value::symbol("A"),
                    Value::symbol("B"),
                    Value::symbol("C"),
                    Value::I32(100),
                ]),
            ),
        ],
    )
    .expect("populated TestMessage")
}

/// Chain of `levels` messages alternating `Recursive1` / `Recursive2`.
pub fn chain(pool: &DescriptorPool, levels: usize) -> Message {
    let names = ["Recursive1", "Recursive2"];
    let mut current = descriptor(pool, names[(levels - 1) % 2]).new_message();
    for level in (0..levels - 1).rev() {
        let parent = descriptor(pool, names[level % 2]).new_message();
        parent.set("foo", current).expect("link");
        current = parent;
    }
    current
}
