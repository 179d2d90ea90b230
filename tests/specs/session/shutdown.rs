// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session shutdown specs
//!
//! Closing or cancelling ends every stream within bounded time and releases
//! the socket.

use std::sync::Arc;
use std::time::Duration;

use wm_wire::Command;

use crate::prelude::*;

async fn session(socket: &Socket) -> (Session, wm_client::Unilaterals, FakeDaemon<UnixStream>) {
    let (stream, daemon) = tokio::join!(UnixStream::connect(socket.path()), socket.accept());
    let (session, unilaterals) = Session::spawn(stream.unwrap());
    (session, unilaterals, daemon)
}

#[tokio::test]
async fn close_releases_socket_and_ends_streams() {
    let socket = Socket::bind();
    let (session, mut unilaterals, mut daemon) = session(&socket).await;

    tokio::time::timeout(STALL, session.close()).await.expect("session task leaked");
    tokio::time::timeout(STALL, session.close()).await.expect("second close hung");

    assert!(unilaterals.recv().await.is_none());
    assert!(matches!(session.send(Command::new("watch-list")).await, Err(Error::Closed)));
    daemon.expect_eof().await;
}

#[tokio::test]
async fn daemon_hangup_fails_pending_command() {
    let socket = Socket::bind();
    let (session, mut unilaterals, mut daemon) = session(&socket).await;

    let (reply, ()) = tokio::join!(session.send(Command::new("watch-list")), async {
        daemon.expect().await;
        drop(daemon);
    });
    let err = reply.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_fatal());
    assert!(unilaterals.recv().await.is_none());
}

#[tokio::test]
async fn cancel_unblocks_every_waiter() {
    let socket = Socket::bind();
    let (session, mut unilaterals, mut daemon) = session(&socket).await;
    let session = Arc::new(session);

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.send(Command::new("clock").arg("/a")).await })
    };
    daemon.expect().await;
    let queued = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.send(Command::new("clock").arg("/b")).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    session.cancel();
    assert!(matches!(pending.await.unwrap(), Err(Error::Closed)));
    assert!(matches!(queued.await.unwrap(), Err(Error::Closed)));
    assert!(tokio::time::timeout(STALL, unilaterals.recv()).await.unwrap().is_none());
    daemon.expect_eof().await;
}

#[tokio::test]
async fn delayed_close_defers_socket_release() {
    let socket = Socket::bind();
    let (stream, mut daemon) = tokio::join!(UnixStream::connect(socket.path()), socket.accept());
    let (session, mut unilaterals, gate) = Session::spawn_delayed(stream.unwrap());
    let session = Arc::new(session);

    let closing = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.close().await })
    };
    assert!(unilaterals.recv().await.is_none());
    assert!(tokio::time::timeout(Duration::from_millis(50), daemon.expect_eof()).await.is_err());

    gate.release();
    daemon.expect_eof().await;
    tokio::time::timeout(STALL, closing).await.unwrap().unwrap();
}
