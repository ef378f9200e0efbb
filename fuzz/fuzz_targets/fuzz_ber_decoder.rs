#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_agent_core::ber::{Element, decode_header};
use snmp_agent_core::value::Value;

/// Walk every element reachable from `element`, decoding primitives.
fn visit(element: Element<'_>, depth: usize) {
    if depth > 32 {
        return;
    }
    let _ = element.to_i64();
    let _ = element.to_u64();
    let _ = Value::decode(&element);
    for child in element.children().flatten() {
        visit(child, depth + 1);
    }
}

fuzz_target!(|data: &[u8]| {
    let _ = decode_header(data, 0);

    if let Ok(element) = Element::from_slice(data) {
        assert!(element.end() <= data.len());
        visit(element, 0);
    }
});
