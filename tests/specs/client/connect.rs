// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connect specs
//!
//! Socket discovery, dialing and the capability handshake.

use std::time::Duration;

use serial_test::serial;

use crate::prelude::*;

#[tokio::test]
async fn handshake_records_version_and_capabilities() {
    let socket = Socket::bind();
    let (client, _daemon) = socket.client().await;

    assert_eq!(client.version(), "4.9.0");
    assert_eq!(client.sock_name(), socket.path());
    assert!(client.has_capability("relative_root"));
    assert!(!client.has_capability("cmd-state-enter"));
}

#[tokio::test]
#[serial]
async fn socket_from_environment() {
    let socket = Socket::bind();
    std::env::set_var("WATCHMAN_SOCK", socket.path());
    let options = ConnectOptions::from_env();
    std::env::remove_var("WATCHMAN_SOCK");

    let daemon = async {
        let mut daemon = socket.accept().await;
        daemon.handshake("2023.08.14.00", &[]).await;
        daemon
    };
    let (client, _daemon) = tokio::join!(Client::connect_with(&options), daemon);
    let client = client.unwrap();
    assert_eq!(client.sock_name(), socket.path());
    assert_eq!(client.version(), "2023.08.14.00");
    assert!(client.capabilities().is_empty());
}

#[tokio::test]
async fn missing_socket_fails_to_dial() {
    let socket = Socket::bind();
    let options = ConnectOptions::default()
        .sock_name(format!("{}.absent", socket.path()))
        .dial_timeout(Duration::from_secs(1));

    let err = Client::connect_with(&options).await.err().expect("dial should fail");
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn daemon_hangup_during_handshake_is_a_handshake_error() {
    let socket = Socket::bind();
    let options = socket.options();

    let daemon = async {
        let mut daemon = socket.accept().await;
        daemon.expect_command(r#"["list-capabilities"]"#).await;
    };
    let (client, ()) = tokio::join!(Client::connect_with(&options), daemon);
    match client {
        Err(Error::Handshake(inner)) => assert!(matches!(*inner, Error::Transport(_))),
        Err(other) => panic!("expected handshake error, got {:?}", other),
        Ok(_) => panic!("handshake should fail"),
    }
}

#[tokio::test]
async fn pushes_before_handshake_reply_are_kept() {
    let socket = Socket::bind();
    let options = socket.options();

    let daemon = async {
        let mut daemon = socket.accept().await;
        daemon.expect_command(r#"["list-capabilities"]"#).await;
        daemon.push(r#"{"unilateral":true,"log":"starting up","level":"debug"}"#).await;
        daemon.push(r#"{"version":"4.9.0","capabilities":[]}"#).await;
        daemon
    };
    let (client, _daemon) = tokio::join!(Client::connect_with(&options), daemon);
    let client = client.unwrap();

    let mut notifications = client.notifications().unwrap();
    let first = tokio::time::timeout(STALL, notifications.recv()).await.unwrap().unwrap().unwrap();
    assert!(matches!(first, Notification::Log { ref message, .. } if message == "starting up"));
}
