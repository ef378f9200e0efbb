//! Loopback tests for `UdpListener`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use snmp_agent_core::agent::decode_response;
use snmp_agent_core::ber::tag;
use snmp_agent_core::{AgentTransport, ErrorStatus, UdpListener, Value};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn client_for(listener: &UdpListener) -> UdpSocket {
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.connect(listener.local_addr()).await.unwrap();
    client
}

async fn recv(client: &UdpSocket) -> Vec<u8> {
    let mut buf = vec![0u8; 1500];
    let n = tokio::time::timeout(TIMEOUT, client.recv(&mut buf))
        .await
        .expect("no response within timeout")
        .unwrap();
    buf.truncate(n);
    buf
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_answers_until_cancelled() {
    let sys = system_agent();
    let listener = UdpListener::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let client = client_for(&listener).await;
    let cancel = CancellationToken::new();

    let server = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            listener.run(&sys.agent, cancel).await.unwrap();
            sys.agent
        })
    };

    client.send(&get(0x1001, SYS_NAME)).await.unwrap();
    let decoded = decode_response(&recv(&client).await).unwrap();
    assert_eq!(decoded.request_id, 0x1001);
    assert_eq!(decoded.value, Value::from("Agent"));

    client.send(&get_next(0x1002, SYS_NAME)).await.unwrap();
    let decoded = decode_response(&recv(&client).await).unwrap();
    assert_eq!(decoded.oid.as_str(), SYS_LOCATION);

    client.send(&get(0x1003, "1.3.6.1.2.1.1.99.0")).await.unwrap();
    let decoded = decode_response(&recv(&client).await).unwrap();
    assert_eq!(decoded.error_status, ErrorStatus::NoSuchName);

    cancel.cancel();
    let agent = tokio::time::timeout(TIMEOUT, server)
        .await
        .expect("listener did not stop")
        .unwrap();
    assert_eq!(agent.counters().packets_received(), 3);
    assert_eq!(agent.counters().packets_sent(), 3);
}

#[tokio::test]
async fn poll_drops_garbage_and_answers_valid_request() {
    let sys = system_agent();
    let listener = UdpListener::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let client = client_for(&listener).await;

    client.send(b"\x30\x03\x02\x01").await.unwrap();
    client.send(&get(5, SYS_SERVICES)).await.unwrap();

    // Loopback delivery is asynchronous; wait until both are handled
    let mut handled = 0;
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while handled < 2 && tokio::time::Instant::now() < deadline {
        if listener.poll(&sys.agent).unwrap() {
            handled += 1;
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
    assert_eq!(handled, 2);

    let decoded = decode_response(&recv(&client).await).unwrap();
    assert_eq!(decoded.request_id, 5);
    assert_eq!(decoded.value, Value::Integer(72));
    assert_eq!(sys.agent.counters().packets_received(), 2);
    assert_eq!(sys.agent.counters().packets_sent(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn community_replaced_while_serving() {
    let agent = Arc::new(system_agent().agent);
    let listener = UdpListener::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let client = client_for(&listener).await;
    let cancel = CancellationToken::new();

    let server = {
        let agent = Arc::clone(&agent);
        let cancel = cancel.clone();
        tokio::spawn(async move { listener.run(&agent, cancel).await })
    };

    agent.set_read_community("monitor").unwrap();
    let frame = request(V2C, b"monitor", tag::pdu::GET_REQUEST, 0x2001, SYS_NAME, None);
    client.send(&frame).await.unwrap();
    let decoded = decode_response(&recv(&client).await).unwrap();
    assert_eq!(decoded.request_id, 0x2001);
    assert_eq!(&decoded.community[..], b"monitor");

    cancel.cancel();
    tokio::time::timeout(TIMEOUT, server)
        .await
        .expect("listener did not stop")
        .unwrap()
        .unwrap();
}
