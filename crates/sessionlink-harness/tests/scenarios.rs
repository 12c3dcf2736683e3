//! End-to-end scenarios driving a real [`sessionlink_server::Dispatcher`]
//! across `sessionlink-sim`'s in-process link.

use std::time::Duration;

use bytes::Bytes;
use sessionlink_client::system_env::SystemEnv as ClientClock;
use sessionlink_client::ClientSession;
use sessionlink_core::buffer::ReassemblyBuffer;
use sessionlink_proto::{Packet, State};
use sessionlink_server::DispatcherConfig;
use sessionlink_sim::LinkConfig;

const RECV_TIMEOUT: Duration = Duration::from_millis(200);

fn fragment(session_id: i64, packet_id: i64, begin: i64, end: i64, bytes: &[u8]) -> Packet {
    Packet {
        session_id,
        user_id: 1,
        msg_code: State::Ali,
        packet_id,
        frame_begin: begin,
        frame_end: end,
        payload_length: (end - begin + 1),
        payload: Bytes::copy_from_slice(bytes),
        remote_addr: None,
    }
}

#[tokio::test(start_paused = true)]
async fn handshake_completes_over_simulated_link() {
    let sim = sessionlink_sim::LinkSimulator::new(LinkConfig::default(), 1);
    let _server = sessionlink_harness::spawn_server(
        &sim,
        "server:1",
        1,
        DispatcherConfig::default(),
    );
    let client_port = sessionlink_harness::connect(&sim, "client:1", "server:1");

    let mut client = ClientSession::new(42, ClientClock::new());
    let req = client.initial_request(7, Bytes::from_static(b"hello"));
    sessionlink_harness::send(&client_port, &req).await;

    let opn = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("OPN arrives");
    assert_eq!(opn.msg_code, State::Opn);
    let reply = client.on_datagram(&opn).expect("client echoes OPN");
    sessionlink_harness::send(&client_port, &reply).await;

    let ack = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("ACK arrives");
    assert_eq!(ack.msg_code, State::Ack);
    let reply = client.on_datagram(&ack).expect("client bumps ACK to ALI");
    assert_eq!(reply.msg_code, State::Ali);
    sessionlink_harness::send(&client_port, &reply).await;

    let ali = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("ALI arrives");
    assert_eq!(ali.msg_code, State::Ali);
    assert!(client.on_datagram(&ali).is_none(), "steady-state ALI is silent");
    assert_eq!(client.state(), State::Ali);
}

#[tokio::test(start_paused = true)]
async fn retry_round_trip_over_the_wire() {
    let sim = sessionlink_sim::LinkSimulator::new(LinkConfig::default(), 2);
    let _server = sessionlink_harness::spawn_server(&sim, "server:2", 2, DispatcherConfig::default());
    let client_port = sessionlink_harness::connect(&sim, "client:2", "server:2");

    let mut client = ClientSession::new(9, ClientClock::new());
    let req = client.initial_request(1, Bytes::new());
    sessionlink_harness::send(&client_port, &req).await;
    let opn = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&opn).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    let ack = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&ack).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    let ali = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    client.on_datagram(&ali);
    assert_eq!(client.state(), State::Ali);

    // Server is now in ALI. Simulate a peer-initiated retry: send an RTY and
    // confirm it comes back around to ALI via ACK, per the side-path table.
    let rty = Packet { msg_code: State::Rty, ..req.clone() };
    let rty = Packet { session_id: 9, ..rty };
    sessionlink_harness::send(&client_port, &rty).await;
    let resp = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("RTY echoed back");
    assert_eq!(resp.msg_code, State::Rty);

    let ack_again = Packet { msg_code: State::Ack, session_id: 9, ..req };
    sessionlink_harness::send(&client_port, &ack_again).await;
    let resp = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("recovers to ALI");
    assert_eq!(resp.msg_code, State::Ali);
}

#[tokio::test(start_paused = true)]
async fn teardown_sequence_closes_session() {
    let sim = sessionlink_sim::LinkSimulator::new(LinkConfig::default(), 3);
    let _server = sessionlink_harness::spawn_server(&sim, "server:3", 3, DispatcherConfig::default());
    let client_port = sessionlink_harness::connect(&sim, "client:3", "server:3");

    let mut client = ClientSession::new(5, ClientClock::new());
    let req = client.initial_request(1, Bytes::new());
    sessionlink_harness::send(&client_port, &req).await;
    let opn = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&opn).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    let ack = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&ack).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    let ali = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    client.on_datagram(&ali);

    let fin = client.teardown();
    sessionlink_harness::send(&client_port, &fin).await;
    let fin_back = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("server echoes FIN");
    assert_eq!(fin_back.msg_code, State::Fin);
    let reply = client.on_datagram(&fin_back).expect("client echoes FIN");
    sessionlink_harness::send(&client_port, &reply).await;

    let cld = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.expect("server closes");
    assert_eq!(cld.msg_code, State::Cld);
    assert!(client.on_datagram(&cld).is_none());
    assert_eq!(client.state(), State::Cld);
}

#[tokio::test(start_paused = true)]
async fn cld_is_absorbing_over_the_wire() {
    let sim = sessionlink_sim::LinkSimulator::new(LinkConfig::default(), 4);
    let _server = sessionlink_harness::spawn_server(&sim, "server:4", 4, DispatcherConfig::default());
    let client_port = sessionlink_harness::connect(&sim, "client:4", "server:4");

    let mut client = ClientSession::new(11, ClientClock::new());
    let req = client.initial_request(1, Bytes::new());
    sessionlink_harness::send(&client_port, &req).await;
    let opn = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&opn).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    let ack = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&ack).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();

    let fin = client.teardown();
    sessionlink_harness::send(&client_port, &fin).await;
    let fin_back = sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap();
    let reply = client.on_datagram(&fin_back).unwrap();
    sessionlink_harness::send(&client_port, &reply).await;
    sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.unwrap(); // CLD

    // Server is absorbing now; any further datagram gets no reply.
    let stray = Packet { msg_code: State::Ali, session_id: 11, ..req };
    sessionlink_harness::send(&client_port, &stray).await;
    assert!(sessionlink_harness::recv(&client_port, RECV_TIMEOUT).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn handshake_survives_a_lossy_duplicating_link() {
    let config = LinkConfig::default().with_loss(0.4).with_duplication(0.3);
    let sim = sessionlink_sim::LinkSimulator::new(config, 5);
    let _server = sessionlink_harness::spawn_server(&sim, "server:5", 5, DispatcherConfig::default());
    let client_port = sessionlink_harness::connect(&sim, "client:5", "server:5");

    let mut client = ClientSession::new(21, ClientClock::new());
    let req = client.initial_request(1, Bytes::new());

    let mut opn = None;
    for _ in 0..40 {
        sessionlink_harness::send(&client_port, &req).await;
        if let Some(p) = sessionlink_harness::recv(&client_port, Duration::from_millis(20)).await {
            if p.msg_code == State::Opn {
                opn = Some(p);
                break;
            }
        }
    }
    let opn = opn.expect("at least one REQ gets through a 40%-loss link within 40 tries");
    let reply = client.on_datagram(&opn).expect("client echoes OPN");
    assert_eq!(reply.msg_code, State::Opn);
}

#[test]
fn multi_fragment_message_reassembles_from_ali_payloads() {
    let wire_one = sessionlink_proto::encode(&fragment(1, 10, 0, 2, b"abc"));
    let wire_two = sessionlink_proto::encode(&fragment(1, 11, 3, 5, b"def"));

    let mut buffer = ReassemblyBuffer::new();
    let first = sessionlink_proto::decode(&wire_one).expect("fragment one decodes");
    let second = sessionlink_proto::decode(&wire_two).expect("fragment two decodes");
    buffer.write(&first).expect("first fragment writes");
    buffer.write(&second).expect("second fragment writes");

    assert_eq!(&buffer.contents()[..6], b"abcdef");
    assert_eq!(buffer.received(), 6);
}
