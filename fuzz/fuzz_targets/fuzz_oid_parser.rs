#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_agent_core::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // Anything accepted from BER must survive a text round trip
    if let Ok(oid) = Oid::from_ber(data) {
        let reparsed = Oid::parse(oid.as_str()).expect("canonical text reparses");
        assert_eq!(reparsed.as_ber(), oid.as_ber());
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Oid::parse(s);
    }
});
