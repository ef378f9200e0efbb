//! Property tests for the OID and integer codecs.

use proptest::prelude::*;
use snmp_agent_core::Oid;
use snmp_agent_core::ber::{Element, EncodeBuf, decode_ber_oid_to_text, encode_oid_text_to_ber};

fn oid_text() -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..(1 << 28), 0..20).prop_map(|arcs| {
        let mut text = String::from("1.3");
        for arc in arcs {
            text.push('.');
            text.push_str(&arc.to_string());
        }
        text
    })
}

proptest! {
    #[test]
    fn oid_text_survives_ber(text in oid_text()) {
        let ber = encode_oid_text_to_ber(&text).unwrap();
        prop_assert_eq!(ber[0], 0x2B);
        prop_assert_eq!(decode_ber_oid_to_text(&ber).unwrap(), text);
    }

    #[test]
    fn oid_ordering_matches_arcs(a in oid_text(), b in oid_text()) {
        let a = Oid::parse(&a).unwrap();
        let b = Oid::parse(&b).unwrap();
        let expected = a.arcs().collect::<Vec<_>>().cmp(&b.arcs().collect::<Vec<_>>());
        prop_assert_eq!(a.cmp_arcs(&b), expected);
    }

    #[test]
    fn integer_survives_ber(value in any::<i64>()) {
        let mut buf = EncodeBuf::new();
        buf.push_integer(value);
        let bytes = buf.finish_vec();
        let element = Element::from_slice(&bytes).unwrap();
        prop_assert_eq!(element.tag(), 0x02);
        prop_assert!(element.len() <= 8);
        prop_assert_eq!(element.to_i64().unwrap(), value);
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = Element::from_slice(&data).map(|e| e.children().count());
        let _ = decode_ber_oid_to_text(&data);
        let _ = snmp_agent_core::parse_request(&data, &Default::default());
    }
}
