#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;

use snmp_agent_core::agent::decode_response;
use snmp_agent_core::{Agent, Communities, OidRegistry, parse_request};

static AGENT: LazyLock<Agent> = LazyLock::new(|| {
    let mut registry = OidRegistry::new();
    let _ = registry.insert("1.3.6.1.2.1.1.1.0", |_, r| {
        let _ = r.send("fuzz");
    });
    let _ = registry.insert("1.3.6.1.2.1.1.5.0", |_, r| {
        let _ = r.send(7i64);
    });
    let _ = registry.add_write_action("1.3.6.1.2.1.1.5.0", |ctx, r| {
        let mut scratch = [0u8; 32];
        let n = ctx.copy_user_data(&mut scratch);
        let _ = r.send(n as i64);
    });
    Agent::builder()
        .registry(registry)
        .build()
        .expect("default agent builds")
});

fuzz_target!(|data: &[u8]| {
    let oid_decodes = parse_request(data, &Communities::default())
        .ok()
        .is_some_and(|ctx| ctx.oid().is_ok());

    // Responses echo the requested OID, so only those under 1.3 decode back
    if let Some(response) = AGENT.handle_datagram(data)
        && oid_decodes
    {
        decode_response(&response).expect("agent produced an undecodable response");
    }
});
