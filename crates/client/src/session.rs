// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session engine: multiplexes one duplex stream into request/reply pairs
//! and a stream of unilateral pushes.
//!
//! A single task owns the transport. Callers reach it only through channels:
//!
//! - submissions (capacity 1) carry a command and a oneshot for its reply,
//! - an unbounded channel carries unilateral PDUs in arrival order,
//! - two cancellation tokens request graceful close or abort.
//!
//! The task alternates between two states. While awaiting a command it
//! selects over submissions and inbound frames; while awaiting a reply it
//! reads frames only, forwarding unilaterals until the first reply or error
//! frame, which resolves the pending caller.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::{FutureExt, SinkExt, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wm_wire::{classify, parse_frame, Command, Inbound, LineCodec, Pdu, WireError};

use crate::Error;

type Reply = Result<Pdu, Error>;

struct Submission {
    command: Command,
    reply: oneshot::Sender<Reply>,
}

/// Handle to a running session engine.
///
/// Dropping every handle without calling [`close`](Session::close) also shuts
/// the engine down gracefully.
pub struct Session {
    submit: mpsc::Sender<Submission>,
    shutdown: CancellationToken,
    abort: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Unilateral PDUs in the order the daemon sent them.
///
/// A transport or framing failure seen while no command was outstanding is
/// yielded once as an `Err`; the stream ends when the engine stops.
pub struct Unilaterals {
    rx: mpsc::UnboundedReceiver<Reply>,
}

impl Unilaterals {
    pub async fn recv(&mut self) -> Option<Reply> {
        self.rx.recv().await
    }
}

impl Stream for Unilaterals {
    type Item = Reply;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Reply>> {
        self.rx.poll_recv(cx)
    }
}

/// Releases a delayed-close session's transport.
#[cfg(any(test, feature = "test-support"))]
pub struct CloseGate(oneshot::Sender<()>);

#[cfg(any(test, feature = "test-support"))]
impl CloseGate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

impl Session {
    /// Start an engine over `transport`.
    pub fn spawn<T>(transport: T) -> (Session, Unilaterals)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::start(transport, CancellationToken::new(), None)
    }

    /// Start an engine that also aborts when `cancel` fires.
    pub fn spawn_with_cancel<T>(transport: T, cancel: &CancellationToken) -> (Session, Unilaterals)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::start(transport, cancel.child_token(), None)
    }

    /// Start an engine whose transport is only released once the returned
    /// gate is released (or the session is aborted).
    #[cfg(any(test, feature = "test-support"))]
    pub fn spawn_delayed<T>(transport: T) -> (Session, Unilaterals, CloseGate)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (gate, release) = oneshot::channel();
        let (session, unilaterals) = Self::start(transport, CancellationToken::new(), Some(release));
        (session, unilaterals, CloseGate(gate))
    }

    fn start<T>(
        transport: T,
        abort: CancellationToken,
        release: Option<oneshot::Receiver<()>>,
    ) -> (Session, Unilaterals)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read, write) = tokio::io::split(transport);
        let (submit, submissions) = mpsc::channel(1);
        let (unilateral_tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let engine = Engine {
            frames: FramedRead::new(read, LineCodec::new()),
            sink: FramedWrite::new(write, LineCodec::new()),
            submissions,
            unilaterals: unilateral_tx,
            shutdown: shutdown.clone(),
            abort: abort.clone(),
            release,
        };
        let task = tokio::spawn(engine.run());

        let session = Session { submit, shutdown, abort, task: Mutex::new(Some(task)) };
        (session, Unilaterals { rx })
    }

    /// Submit a command and wait for its reply.
    ///
    /// Only one command is in flight at a time; concurrent callers wait their
    /// turn in submission order.
    pub async fn send(&self, command: Command) -> Result<Pdu, Error> {
        let (reply, rx) = oneshot::channel();
        self.submit.send(Submission { command, reply }).await.map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)?
    }

    /// Gracefully shut down and wait for the engine task to exit.
    ///
    /// An in-flight command still gets its reply while its caller waits for
    /// it; once that caller has given up the reply is no longer awaited.
    /// Queued commands fail with [`Error::Closed`]. Safe to call more than once.
    pub async fn close(&self) {
        self.shutdown.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "session task did not exit cleanly");
            }
        }
    }

    /// Abort the engine at whatever point it is blocked.
    ///
    /// The pending caller and all queued callers observe [`Error::Closed`].
    pub fn cancel(&self) {
        self.abort.cancel();
    }

    /// Whether the engine has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.submit.is_closed()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

enum State {
    AwaitingCommand,
    AwaitingReply { verb: String, reply: oneshot::Sender<Reply> },
    Closed(Teardown),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    /// Close was requested: discard buffered input, then shut the writer down.
    Graceful,
    /// The transport failed or ended.
    Broken,
    /// Aborted from outside.
    Aborted,
}

struct Engine<T> {
    frames: FramedRead<ReadHalf<T>, LineCodec>,
    sink: FramedWrite<WriteHalf<T>, LineCodec>,
    submissions: mpsc::Receiver<Submission>,
    unilaterals: mpsc::UnboundedSender<Reply>,
    shutdown: CancellationToken,
    abort: CancellationToken,
    release: Option<oneshot::Receiver<()>>,
}

impl<T> Engine<T>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn run(mut self) {
        let mut state = State::AwaitingCommand;
        let teardown = loop {
            state = match state {
                State::AwaitingCommand => self.await_command().await,
                State::AwaitingReply { verb, reply } => self.await_reply(verb, reply).await,
                State::Closed(teardown) => break teardown,
            };
        };
        self.finish(teardown).await;
    }

    async fn await_command(&mut self) -> State {
        tokio::select! {
            biased;
            _ = self.abort.cancelled() => State::Closed(Teardown::Aborted),
            _ = self.shutdown.cancelled() => State::Closed(Teardown::Graceful),
            submission = self.submissions.recv() => match submission {
                Some(submission) => self.write(submission).await,
                None => State::Closed(Teardown::Graceful),
            },
            frame = self.frames.next() => self.idle_frame(frame),
        }
    }

    async fn write(&mut self, submission: Submission) -> State {
        let Submission { command, reply } = submission;
        if reply.is_closed() {
            debug!(verb = command.verb(), "caller gave up before send, skipping command");
            return State::AwaitingCommand;
        }

        let verb = command.verb().to_string();
        let sent = tokio::select! {
            biased;
            _ = self.abort.cancelled() => return State::Closed(Teardown::Aborted),
            sent = self.sink.send(command) => sent,
        };

        match sent {
            Ok(()) => {
                debug!(verb = %verb, "command sent");
                State::AwaitingReply { verb, reply }
            }
            Err(WireError::Encode(e)) => {
                let _ = reply.send(Err(Error::Encode(e)));
                State::AwaitingCommand
            }
            Err(e) => {
                warn!(verb = %verb, error = %e, "write failed, closing session");
                let _ = reply.send(Err(e.into()));
                State::Closed(Teardown::Broken)
            }
        }
    }

    /// A frame arrived with no command outstanding.
    fn idle_frame(&mut self, frame: Option<Result<Bytes, WireError>>) -> State {
        let line = match frame {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!(error = %e, "transport failed while idle");
                let _ = self.unilaterals.send(Err(e.into()));
                return State::Closed(Teardown::Broken);
            }
            None => {
                info!("daemon closed the connection");
                return State::Closed(Teardown::Broken);
            }
        };

        match parse_frame(&line) {
            Ok(frame) => match classify(frame) {
                Inbound::Unilateral(pdu) => {
                    self.forward(pdu);
                    State::AwaitingCommand
                }
                inbound => {
                    warn!(kind = inbound.kind(), "discarding frame with no outstanding command");
                    State::AwaitingCommand
                }
            },
            Err(e) => {
                warn!(error = %e, "malformed frame while idle, closing session");
                let _ = self.unilaterals.send(Err(e.into()));
                State::Closed(Teardown::Broken)
            }
        }
    }

    async fn await_reply(&mut self, verb: String, mut reply: oneshot::Sender<Reply>) -> State {
        let frame = tokio::select! {
            biased;
            _ = self.abort.cancelled() => return State::Closed(Teardown::Aborted),
            _ = abandoned(&self.shutdown, &mut reply) => {
                warn!(verb = %verb, "caller gave up on the reply, closing without it");
                return State::Closed(Teardown::Broken);
            }
            frame = self.frames.next() => frame,
        };

        let line = match frame {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!(verb = %verb, error = %e, "transport failed awaiting reply");
                let _ = reply.send(Err(e.into()));
                return State::Closed(Teardown::Broken);
            }
            None => {
                info!(verb = %verb, "daemon closed the connection before replying");
                let eof = io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("connection closed awaiting reply to {}", verb),
                );
                let _ = reply.send(Err(Error::Transport(eof)));
                return State::Closed(Teardown::Broken);
            }
        };

        let frame = match parse_frame(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(verb = %verb, error = %e, "malformed reply, closing session");
                let _ = reply.send(Err(e.into()));
                return State::Closed(Teardown::Broken);
            }
        };

        match classify(frame) {
            Inbound::Unilateral(pdu) => {
                self.forward(pdu);
                State::AwaitingReply { verb, reply }
            }
            Inbound::Reply(pdu) => {
                debug!(verb = %verb, "reply received");
                if reply.send(Ok(pdu)).is_err() {
                    debug!(verb = %verb, "caller gone, reply discarded");
                }
                State::AwaitingCommand
            }
            Inbound::Error(failure) => {
                debug!(verb = %verb, error = %failure.message, "command failed");
                let _ = reply.send(Err(Error::Command { message: failure.message }));
                State::AwaitingCommand
            }
        }
    }

    fn forward(&self, pdu: Pdu) {
        debug!("unilateral received");
        // Nobody listening is fine; pushes are advisory.
        let _ = self.unilaterals.send(Ok(pdu));
    }

    async fn finish(self, teardown: Teardown) {
        let Engine { mut frames, mut sink, mut submissions, unilaterals, abort, release, .. } = self;

        // Unblock everyone waiting on us before touching the transport.
        drop(unilaterals);
        submissions.close();
        while let Ok(submission) = submissions.try_recv() {
            let _ = submission.reply.send(Err(Error::Closed));
        }

        if teardown == Teardown::Graceful {
            let mut discarded = 0usize;
            while let Some(Some(Ok(_))) = frames.next().now_or_never() {
                discarded += 1;
            }
            if discarded > 0 {
                debug!(discarded, "discarded buffered frames on close");
            }
        }

        if let Some(release) = release {
            tokio::select! {
                _ = release => {}
                _ = abort.cancelled() => {}
            }
        }

        if teardown != Teardown::Aborted {
            tokio::select! {
                biased;
                _ = abort.cancelled() => {}
                result = sink.close() => {
                    if let Err(e) = result {
                        debug!(error = %e, "shutting down writer failed");
                    }
                }
            }
        }

        info!(?teardown, "session closed");
    }
}

/// Resolves once close was requested and the pending caller has gone away.
async fn abandoned(shutdown: &CancellationToken, reply: &mut oneshot::Sender<Reply>) {
    shutdown.cancelled().await;
    reply.closed().await;
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
