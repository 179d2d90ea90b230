// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription specs
//!
//! Watch a root, subscribe, receive classified changes, unsubscribe and
//! tolerate stale pushes.

use crate::prelude::*;

const CHANGES: &str = concat!(
    r#"{"unilateral":true,"subscription":"sub1","root":"/src","clock":"c:1:2:9","#,
    r#""is_fresh_instance":false,"files":["#,
    r#"{"name":"new.rs","type":"f","size":10,"exists":true,"cclock":"c:1:2:9"},"#,
    r#"{"name":"blip.rs","type":"f","size":0,"exists":false,"cclock":"c:1:2:9"},"#,
    r#"{"name":"old.rs","type":"f","size":4,"exists":false,"cclock":"c:1:2:1"},"#,
    r#"{"name":"lib.rs","type":"f","size":7,"exists":true,"cclock":"c:1:2:1"}"#,
    r#"]}"#,
);

#[tokio::test]
async fn subscribe_receive_unsubscribe() {
    let socket = Socket::bind();
    let (client, mut daemon) = socket.client().await;
    let mut notifications = client.notifications().unwrap();

    let (watch, ()) = tokio::join!(client.add_watch("/src"), async {
        daemon.expect_command(r#"["watch-project","/src"]"#).await;
        daemon.push(r#"{"watch":"/src","watcher":"fsevents","version":"4.9.0"}"#).await;
    });
    let watch = watch.unwrap();

    let request = watch.subscribe_request("sub1").fields(["name", "type", "size", "exists", "cclock"]);
    let (subscription, ()) = tokio::join!(watch.subscribe_with(request), async {
        daemon
            .expect_command(
                r#"["subscribe","/src","sub1",{"fields":["name","type","size","exists","cclock"]}]"#,
            )
            .await;
        daemon.push(r#"{"clock":"c:1:2:2","subscribe":"sub1","version":"4.9.0"}"#).await;
        daemon.push(CHANGES).await;
    });
    let subscription = subscription.unwrap();
    assert_eq!(subscription.name(), "sub1");
    assert_eq!(subscription.clock(), "c:1:2:2");

    let change = match tokio::time::timeout(STALL, notifications.recv()).await.unwrap() {
        Some(Ok(Notification::Change(change))) => change,
        other => panic!("expected change notification, got {:?}", other),
    };
    let classified: Vec<_> = change.files.iter().map(|f| (f.name.as_str(), f.change)).collect();
    similar_asserts::assert_eq!(
        classified,
        vec![
            ("new.rs", StateChange::Created),
            ("blip.rs", StateChange::Ephemeral),
            ("old.rs", StateChange::Removed),
            ("lib.rs", StateChange::Updated),
        ]
    );

    let (deleted, ()) = tokio::join!(subscription.unsubscribe(), async {
        daemon.expect_command(r#"["unsubscribe","/src","sub1"]"#).await;
        // Still queued behind the reply when the caller reads notifications.
        daemon.push(CHANGES).await;
        daemon.push(r#"{"unsubscribe":"sub1","deleted":true,"version":"4.9.0"}"#).await;
        daemon.push(CHANGES).await;
        daemon.push(r#"{"unilateral":true,"log":"done","level":"debug"}"#).await;
    });
    assert!(deleted.unwrap());

    let after = tokio::time::timeout(STALL, notifications.recv()).await.unwrap();
    assert!(matches!(after, Some(Ok(Notification::Log { .. }))), "stale push leaked: {:?}", after);

    client.close().await;
    assert!(notifications.recv().await.is_none());
    daemon.expect_eof().await;
}
