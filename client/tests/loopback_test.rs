mod common;

use std::time::Duration;

use common::LoopbackServer;
use nat_detect::error::ErrorKind;
use nat_detect::retransmit::RetransmitPolicy;
use nat_detect::transport::{resolve, Transport, UdpTransport};
use nat_detect::{discovery_with, Client, ClientConfig, NatType};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn quick_policy() -> RetransmitPolicy {
    RetransmitPolicy {
        max_attempts: 3,
        initial_rto: Duration::from_millis(20),
        max_rto: Duration::from_millis(40),
    }
}

#[tokio::test]
async fn test_loopback_open_internet() {
    let server = LoopbackServer::start(true).await.unwrap();

    let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let mut client = Client::new(transport, StdRng::seed_from_u64(7), RetransmitPolicy::default());

    let nat_type = client.detect(server.primary).await.unwrap();
    assert_eq!(nat_type, NatType::OpenInternet);
}

#[tokio::test]
async fn test_loopback_route_local_addr() {
    let server = LoopbackServer::start(true).await.unwrap();

    let transport = UdpTransport::for_server(server.primary, None).await.unwrap();
    let local_addr = transport.local_addr().unwrap();
    assert!(local_addr.ip().is_loopback());
    assert_ne!(local_addr.port(), 0);
}

#[tokio::test]
async fn test_discovery_with_loopback_server() {
    let server = LoopbackServer::start(true).await.unwrap();
    let config = ClientConfig {
        local_ip: None,
        policy: quick_policy(),
    };

    let nat_type = discovery_with(&server.primary.to_string(), &config)
        .await
        .unwrap();
    assert_eq!(nat_type, NatType::OpenInternet);
}

#[tokio::test]
async fn test_discovery_with_silent_server() {
    let server = LoopbackServer::start(false).await.unwrap();
    let config = ClientConfig {
        local_ip: Some("127.0.0.1".parse().unwrap()),
        policy: quick_policy(),
    };

    let nat_type = discovery_with(&server.primary.to_string(), &config)
        .await
        .unwrap();
    assert_eq!(nat_type, NatType::UdpBlocked);
}

#[tokio::test]
async fn test_resolve() {
    let addr = resolve("127.0.0.1:3478").await.unwrap();
    assert_eq!(addr, "127.0.0.1:3478".parse().unwrap());

    let err = resolve("no port here").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
