//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! Definite-length X.690 subset used by SNMP v1/v2c: tags are single bytes,
//! lengths use at most 4 long-form octets, and indefinite lengths are
//! rejected.

mod decode;
mod encode;
mod hex;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use hex::HexDump;
pub use length::*;
pub use tag::*;

pub use crate::oid::{decode_ber_oid_to_text, encode_oid_text_to_ber};
