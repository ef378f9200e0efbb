//! BER tag definitions for SNMP.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for long form)

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30; // Constructed
}

/// Application tags (class bits 01) - SNMP-specific types
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    pub const UNSIGNED32: u8 = 0x42; // Also Gauge32
    pub const TIMETICKS: u8 = 0x43;
    pub const INT64: u8 = 0x44;
    /// Net-SNMP opaque-wrapped float, sent bare by small agents
    pub const FLOAT: u8 = 0x78;
    pub const DOUBLE: u8 = 0x79;
    pub const SIGNED64: u8 = 0x7A;
    pub const UNSIGNED64: u8 = 0x7B;
}

/// PDU tags (context-specific, constructed)
pub mod pdu {
    use super::CONSTRUCTED;
    use super::class::CONTEXT_SPECIFIC;

    pub const GET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED; // 0xA0
    pub const GET_NEXT_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x01; // 0xA1
    pub const RESPONSE: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x02; // 0xA2
    pub const SET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x03; // 0xA3
    pub const GET_BULK_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x05; // 0xA5
}

/// Check if a tag indicates a constructed type
#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}

/// Check if a tag carries a big-endian integer body.
#[inline]
pub const fn is_integer_family(tag: u8) -> bool {
    matches!(
        tag,
        universal::INTEGER
            | application::COUNTER32
            | application::UNSIGNED32
            | application::TIMETICKS
            | application::INT64
            | application::SIGNED64
            | application::UNSIGNED64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdu_tags() {
        assert_eq!(pdu::GET_REQUEST, 0xA0);
        assert_eq!(pdu::GET_NEXT_REQUEST, 0xA1);
        assert_eq!(pdu::RESPONSE, 0xA2);
        assert_eq!(pdu::SET_REQUEST, 0xA3);
        assert_eq!(pdu::GET_BULK_REQUEST, 0xA5);
    }

    #[test]
    fn test_constructed() {
        assert!(is_constructed(universal::SEQUENCE));
        assert!(is_constructed(pdu::GET_REQUEST));
        assert!(!is_constructed(universal::OBJECT_IDENTIFIER));
        assert!(!is_constructed(application::IP_ADDRESS));
    }

    #[test]
    fn test_integer_family() {
        assert!(is_integer_family(universal::INTEGER));
        assert!(is_integer_family(application::TIMETICKS));
        assert!(!is_integer_family(universal::OCTET_STRING));
        assert!(!is_integer_family(application::FLOAT));
    }
}
