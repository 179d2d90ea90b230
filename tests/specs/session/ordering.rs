// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session ordering specs
//!
//! Replies pair with commands in submission order and pushes never jump
//! ahead of, or get mistaken for, replies.

use std::sync::Arc;

use wm_wire::{Command, Fields};

use crate::prelude::*;

/// The subscribe reply resolves the call; the later push goes to the
/// unilateral stream.
#[tokio::test]
async fn subscribe_reply_and_push_are_routed_apart() {
    let socket = Socket::bind();
    let (stream, mut daemon) = tokio::join!(UnixStream::connect(socket.path()), socket.accept());
    let (session, mut unilaterals) = Session::spawn(stream.unwrap());

    let command = Command::new("subscribe")
        .arg("/tmp")
        .arg("sub1")
        .option("fields", vec!["name".to_string()]);
    let (reply, ()) = tokio::join!(session.send(command), async {
        daemon.expect_command(r#"["subscribe","/tmp","sub1",{"fields":["name"]}]"#).await;
        daemon.push(r#"{"clock":"c:1:2:2","subscribe":"sub1","version":"4.9.0"}"#).await;
        daemon
            .push(r#"{"unilateral":true,"subscription":"sub1","clock":"c:1:2:2","files":["a"],"is_fresh_instance":true}"#)
            .await;
    });

    let reply = reply.unwrap();
    assert!(!reply.is_unilateral());
    assert_eq!(reply.opt_str("subscribe").unwrap(), Some("sub1"));

    let push = tokio::time::timeout(STALL, unilaterals.recv()).await.unwrap().unwrap().unwrap();
    assert!(push.is_unilateral());
    assert_eq!(push.opt_str("subscription").unwrap(), Some("sub1"));
    assert_eq!(push.opt_bool("is_fresh_instance").unwrap(), Some(true));
    session.close().await;
}

/// An error frame is a command failure even when it names a subscription.
#[tokio::test]
async fn error_frames_never_reach_the_push_stream() {
    let socket = Socket::bind();
    let (stream, mut daemon) = tokio::join!(UnixStream::connect(socket.path()), socket.accept());
    let (session, mut unilaterals) = Session::spawn(stream.unwrap());

    let command = Command::new("unsubscribe").arg("/tmp").arg("x");
    let (reply, ()) = tokio::join!(session.send(command), async {
        daemon.expect().await;
        daemon
            .push(r#"{"error":"no such subscription","subscription":"x","unilateral":true}"#)
            .await;
    });
    match reply {
        Err(Error::Command { message }) => assert_eq!(message, "no such subscription"),
        other => panic!("expected command error, got {:?}", other),
    }

    session.close().await;
    assert!(unilaterals.recv().await.is_none());
}

/// Concurrent callers are served one at a time and each gets its own reply.
#[tokio::test]
async fn concurrent_callers_each_get_their_reply() {
    let socket = Socket::bind();
    let (client, mut daemon) = socket.client().await;
    let client = Arc::new(client);

    let callers: Vec<_> = ["/a", "/b", "/c"]
        .into_iter()
        .map(|root| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                let conn = client.connection();
                let reply = conn.send(Command::new("clock").arg(root)).await.unwrap();
                (root, reply.str_or_default("clock").unwrap())
            })
        })
        .collect();

    for _ in 0..3 {
        let line = daemon.expect().await;
        assert!(
            daemon.poll_command(std::time::Duration::from_millis(30)).await.is_none(),
            "more than one command in flight"
        );
        let args: Vec<String> = serde_json::from_str(&line).unwrap();
        daemon.push(&format!(r#"{{"clock":"clock-for{}"}}"#, args[1])).await;
    }

    for caller in callers {
        let (root, clock) = caller.await.unwrap();
        assert_eq!(clock, format!("clock-for{}", root));
    }
}
