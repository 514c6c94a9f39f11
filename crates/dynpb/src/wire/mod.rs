// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol-buffers binary wire codec.
//!
//! # Format
//!
//! Every field is a `tag` varint (`number << 3 | wire_type`) followed by its
//! payload:
//!
//! | Field type                                  | Wire type           |
//! |---------------------------------------------|---------------------|
//! | int32, int64, uint32, uint64, bool, enum    | 0 (varint)          |
//! | double                                      | 1 (fixed64)         |
//! | string, bytes, message, packed repeated     | 2 (length-delimited)|
//! | float                                       | 5 (fixed32)         |
//!
//! Negative int32/enum values are sign-extended to 64 bits (10 bytes).
//! Fields holding their default are omitted; set submessages are always
//! written. Repeated numeric fields are written packed and read in either
//! form. Fields are written in declaration order.
//!
//! # Example
//!
//! ```rust
//! use dynpb::{DescriptorPool, FieldType, MessageDecl};
//!
//! let pool = DescriptorPool::new();
//! pool.register(vec![MessageDecl::new("Test1").optional("a", FieldType::Int32, 1)], vec![])
//!     .unwrap();
//! let desc = pool.get_message("Test1").unwrap();
//!
//! let msg = desc.new_message();
//! msg.set("a", 150).unwrap();
//! let bytes = dynpb::encode(&msg).unwrap();
//! assert_eq!(bytes, vec![0x08, 0x96, 0x01]);
//! assert_eq!(dynpb::decode(&desc, &bytes).unwrap(), msg);
//! ```

mod decode;
mod encode;
pub(crate) mod varint;

use crate::config::CodecConfig;
use crate::descriptor::{FieldType, MessageDescriptor};
use crate::error::{Error, Result};
use crate::message::Message;

/// Wire type carried in the low three bits of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    pub(crate) fn from_bits(bits: u64) -> Result<Self> {
        Ok(match bits {
            0 => Self::Varint,
            1 => Self::Fixed64,
            2 => Self::LengthDelimited,
            3 => Self::StartGroup,
            4 => Self::EndGroup,
            5 => Self::Fixed32,
            other => {
                return Err(Error::ParseError(format!("invalid wire type {}", other)));
            }
        })
    }

    /// Wire type of a single (unpacked) value of `field_type`.
    pub(crate) fn of(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Int32
            | FieldType::Int64
            | FieldType::Uint32
            | FieldType::Uint64
            | FieldType::Bool
            | FieldType::Enum => Self::Varint,
            FieldType::Float => Self::Fixed32,
            FieldType::Double => Self::Fixed64,
            FieldType::String | FieldType::Bytes | FieldType::Message => Self::LengthDelimited,
        }
    }
}

/// Encode `message` with the default configuration.
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    encode_with(message, &CodecConfig::default())
}

/// Encode `message`.
///
/// Fails with `CyclicStructure` if the message reaches itself and with
/// `DepthLimitExceeded` if nesting exceeds `config.max_depth`.
pub fn encode_with(message: &Message, config: &CodecConfig) -> Result<Vec<u8>> {
    encode::Encoder::new(config).finish(message)
}

/// Decode `bytes` as a `descriptor` message with the default configuration.
pub fn decode(descriptor: &MessageDescriptor, bytes: &[u8]) -> Result<Message> {
    decode_with(descriptor, bytes, &CodecConfig::default())
}

/// Decode `bytes` as a `descriptor` message.
///
/// Unknown field numbers are skipped. Malformed input fails with
/// `ParseError`; nesting past `config.max_depth` with `DepthLimitExceeded`.
pub fn decode_with(
    descriptor: &MessageDescriptor,
    bytes: &[u8],
    config: &CodecConfig,
) -> Result<Message> {
    let message = Message::new(descriptor);
    decode::Decoder::new(config).merge(&message, bytes)?;
    Ok(message)
}
