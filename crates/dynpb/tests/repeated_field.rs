// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::too_many_lines)] // Test code

//! Repeated containers: element checks, growth, aliasing and copies.

mod common;

use common::{basic_pool, chain, descriptor, element, ints, message2, repeated};
use dynpb::{CodecConfig, Error, FieldType, RepeatedField, TypeRef, Value};

#[test]
fn test_int32_container() {
    let list = RepeatedField::scalar(FieldType::Int32).expect("int32");
    assert!(list.is_empty());

    list.push(Value::I32(1)).expect("push");
    list.push(Value::I32(2)).expect("push");
    list.push(Value::I32(3)).expect("push");
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(0), Some(Value::I32(1)));
    assert_eq!(list.get(3), None);
    assert_eq!(list.to_string(), "[1, 2, 3]");

    list.set(1, Value::I32(20)).expect("set");
    assert_eq!(list.to_vec(), ints(&[1, 20, 3]));

    let total: i32 = list.iter().filter_map(|v| v.as_i32()).sum();
    assert_eq!(total, 24);

    assert_eq!(list.pop(), Some(Value::I32(3)));
    assert_eq!(list.len(), 2);

    assert!(matches!(list.push(Value::from("x")), Err(Error::TypeError(_))));
    assert!(matches!(list.push(Value::Null), Err(Error::TypeError(_))));
    assert!(matches!(
        list.push(Value::I64(1 << 40)),
        Err(Error::RangeError(_))
    ));
    assert_eq!(list.len(), 2);

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.pop(), None);
}

#[test]
fn test_set_past_end_fills_defaults() {
    let list = RepeatedField::scalar(FieldType::Int32).expect("int32");
    list.set(3, Value::I32(9)).expect("grow");
    assert_eq!(list.to_vec(), ints(&[0, 0, 0, 9]));

    let strings = RepeatedField::scalar(FieldType::String).expect("string");
    strings.set(1, Value::from("b")).expect("grow");
    assert_eq!(strings.to_vec(), vec![Value::from(""), Value::from("b")]);
}

#[test]
fn test_bulk_operations_are_atomic() {
    let list = RepeatedField::with_values(FieldType::Int32, None, ints(&[1, 2])).expect("list");

    let result = list.insert_all(vec![Value::I32(3), Value::from("bad"), Value::I32(4)]);
    assert!(matches!(result, Err(Error::TypeError(_))));
    assert_eq!(list.to_vec(), ints(&[1, 2]));

    let result = list.replace(vec![Value::I32(5), Value::Null]);
    assert!(result.is_err());
    assert_eq!(list.to_vec(), ints(&[1, 2]));

    list.insert_all(ints(&[3, 4])).expect("extend");
    assert_eq!(list.to_vec(), ints(&[1, 2, 3, 4]));
    list.replace(ints(&[7])).expect("replace");
    assert_eq!(list.to_vec(), ints(&[7]));
}

#[test]
fn test_message_container() {
    let pool = basic_pool();
    let m2 = descriptor(&pool, "TestMessage2");
    let list = RepeatedField::of_message(&m2);

    list.push(Value::Message(message2(&pool, 1))).expect("push");
    list.push(Value::Message(message2(&pool, 2))).expect("push");
    assert_eq!(list.to_string(), "[TestMessage2 { foo: 1 }, TestMessage2 { foo: 2 }]");

    let wrong = descriptor(&pool, "TestMessage").new_message();
    assert!(matches!(
        list.push(Value::Message(wrong)),
        Err(Error::TypeError(_))
    ));
    assert!(matches!(list.push(Value::I32(1)), Err(Error::TypeError(_))));

    list.set(4, Value::Message(message2(&pool, 5))).expect("grow");
    assert_eq!(list.len(), 5);
    let filler_a = element(&list, 2);
    let filler_b = element(&list, 3);
    assert_eq!(filler_a, m2.new_message());
    assert!(!filler_a.ptr_eq(&filler_b));
}

#[test]
fn test_enum_container() {
    let pool = basic_pool();
    let test_enum = pool.get_enum("TestEnum").expect("TestEnum");
    let list = RepeatedField::of_enum(&test_enum);

    list.push(Value::symbol("A")).expect("symbol");
    list.push(Value::I32(2)).expect("declared number");
    list.push(Value::I32(100)).expect("undeclared number");
    assert_eq!(
        list.to_vec(),
        vec![Value::symbol("A"), Value::symbol("B"), Value::I32(100)]
    );
    assert_eq!(list.to_string(), "[A, B, 100]");

    let err = list.push(Value::symbol("Z"));
    assert!(err.is_err_and(|e| e.is_name_error()));
    assert_eq!(list.len(), 3);
}

#[test]
fn test_container_construction() {
    let pool = basic_pool();
    let m2 = pool.lookup("TestMessage2");
    let test_enum = pool.lookup("TestEnum");

    assert!(RepeatedField::new(FieldType::Message, m2.clone()).is_ok());
    assert!(RepeatedField::new(FieldType::Enum, test_enum.clone()).is_ok());
    for bad in [
        RepeatedField::new(FieldType::Message, None),
        RepeatedField::new(FieldType::Enum, None),
        RepeatedField::new(FieldType::Message, test_enum.clone()),
        RepeatedField::new(FieldType::Enum, m2.clone()),
        RepeatedField::new(FieldType::Int32, m2),
    ] {
        assert!(matches!(bad, Err(Error::ArgumentError(_))));
    }

    let list = RepeatedField::with_values(
        FieldType::Enum,
        test_enum,
        vec![Value::symbol("C"), Value::I32(1)],
    )
    .expect("initial values");
    assert_eq!(list.to_vec(), vec![Value::symbol("C"), Value::symbol("A")]);

    let bad = RepeatedField::with_values(FieldType::Int32, None, vec![Value::from("x")]);
    assert!(matches!(bad, Err(Error::TypeError(_))));
}

#[test]
fn test_field_container_is_live() {
    let pool = basic_pool();
    let m = descriptor(&pool, "TestMessage").new_message();

    let list = repeated(&m, "repeated_int32");
    list.insert_all(ints(&[1, 2, 3])).expect("extend");
    assert_eq!(repeated(&m, "repeated_int32").to_vec(), ints(&[1, 2, 3]));
    assert!(list.ptr_eq(&repeated(&m, "repeated_int32")));

    // Assigning a container shares it with the message.
    let replacement = RepeatedField::with_values(FieldType::Int32, None, ints(&[9])).expect("list");
    m.set("repeated_int32", replacement.clone()).expect("assign");
    replacement.push(Value::I32(10)).expect("push");
    assert_eq!(repeated(&m, "repeated_int32").to_vec(), ints(&[9, 10]));
    assert_eq!(list.to_vec(), ints(&[1, 2, 3]));
}

#[test]
fn test_field_assignment_requires_matching_kind() {
    let pool = basic_pool();
    let m = descriptor(&pool, "TestMessage").new_message();

    let int64s = RepeatedField::scalar(FieldType::Int64).expect("int64");
    assert!(matches!(
        m.set("repeated_int32", int64s),
        Err(Error::TypeError(_))
    ));

    let other_msgs = RepeatedField::of_message(&descriptor(&pool, "TestMessage"));
    assert!(matches!(
        m.set("repeated_msg", other_msgs),
        Err(Error::TypeError(_))
    ));

    let same_msgs = RepeatedField::new(FieldType::Message, pool.lookup("TestMessage2"))
        .expect("TestMessage2 list");
    m.set("repeated_msg", same_msgs).expect("matching kind");
}

#[test]
fn test_concat() {
    let a = RepeatedField::with_values(FieldType::Int32, None, ints(&[1, 2])).expect("a");
    let b = RepeatedField::with_values(FieldType::Int32, None, ints(&[3])).expect("b");

    let joined = a.concat(&b).expect("same kind");
    assert_eq!(joined.to_vec(), ints(&[1, 2, 3]));
    assert!(!joined.ptr_eq(&a));
    assert_eq!(a.len(), 2);

    let joined = a.concat_values(ints(&[4, 5])).expect("values");
    assert_eq!(joined.to_vec(), ints(&[1, 2, 4, 5]));
    assert!(a.concat_values(vec![Value::Bool(true)]).is_err());

    let strings = RepeatedField::scalar(FieldType::String).expect("string");
    assert!(matches!(a.concat(&strings), Err(Error::TypeError(_))));
}

#[test]
fn test_equality_and_copies() {
    let pool = basic_pool();
    let list = RepeatedField::of_message(&descriptor(&pool, "TestMessage2"));
    list.push(Value::Message(message2(&pool, 1))).expect("push");

    let same = RepeatedField::of_message(&descriptor(&pool, "TestMessage2"));
    same.push(Value::Message(message2(&pool, 1))).expect("push");
    assert_eq!(list, same);

    let shallow = list.dup();
    assert_eq!(shallow, list);
    assert!(element(&shallow, 0).ptr_eq(&element(&list, 0)));
    shallow.push(Value::Message(message2(&pool, 2))).expect("push");
    assert_eq!(list.len(), 1);

    let deep = list.deep_copy().expect("deep copy");
    assert_eq!(deep, list);
    assert!(!element(&deep, 0).ptr_eq(&element(&list, 0)));

    let ints_a = RepeatedField::with_values(FieldType::Int32, None, ints(&[1])).expect("a");
    let ints_b = RepeatedField::with_values(FieldType::Int64, None, vec![Value::I64(1)]).expect("b");
    assert_ne!(ints_a, ints_b);
}

#[test]
fn test_deep_copy_rejects_cycle_through_container() {
    let pool = basic_pool();
    let m = descriptor(&pool, "TestMessage").new_message();
    let sub = message2(&pool, 1);
    repeated(&m, "repeated_msg")
        .push(Value::Message(sub))
        .expect("push");
    assert!(m.deep_copy().is_ok());

    let r1 = descriptor(&pool, "Recursive1");
    let r2 = descriptor(&pool, "Recursive2");
    let a = r1.new_message();
    let b = r2.new_message();
    a.set("foo", b.clone()).expect("a -> b");
    b.set("foo", a.clone()).expect("b -> a");
    assert!(matches!(a.deep_copy(), Err(Error::CyclicStructure(_))));

    let holder = RepeatedField::new(FieldType::Message, Some(TypeRef::Message(r1)))
        .expect("Recursive1 list");
    holder.push(Value::Message(a)).expect("push");
    assert!(matches!(holder.deep_copy(), Err(Error::CyclicStructure(_))));
}

#[test]
fn test_deep_copy_depth_follows_config() {
    let pool = basic_pool();
    let r1 = descriptor(&pool, "Recursive1");
    let holder = RepeatedField::new(FieldType::Message, Some(TypeRef::Message(r1)))
        .expect("Recursive1 list");
    holder.push(Value::Message(chain(&pool, 150))).expect("push");

    assert_eq!(holder.deep_copy(), Err(Error::DepthLimitExceeded(100)));

    let relaxed = CodecConfig::default().with_max_depth(200);
    let copy = holder.deep_copy_with(&relaxed).expect("within relaxed limit");
    assert_eq!(copy, holder);
    assert!(!copy.ptr_eq(&holder));
    assert!(!element(&copy, 0).ptr_eq(&element(&holder, 0)));
}

#[test]
fn test_iteration_by_reference() {
    let list = RepeatedField::with_values(FieldType::Uint64, None, vec![Value::U64(5), Value::U64(6)])
        .expect("list");
    let mut seen = Vec::new();
    for value in &list {
        seen.push(value);
    }
    assert_eq!(seen, vec![Value::U64(5), Value::U64(6)]);
}
