//! Per-session state: envelope processing, stream attachment, teardown.
//!
//! A `SessionHandle` lives in the registry from successful initialization
//! until its transport closes. Close signals can arrive more than once (an
//! explicit terminate, the stream drop guard, a racing disconnect) — the
//! handle absorbs all but the first.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::response::sse::Event;
use chrono::{DateTime, Utc};
use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use meridian_core::{RequestEnvelope, ResponseEnvelope, SessionToken};

use crate::engine::RpcEngine;

/// Callback invoked exactly once when the session's transport closes.
/// Responsible for registry cleanup.
pub type FinalizeFn = Box<dyn FnOnce() + Send>;

#[derive(Debug, thiserror::Error)]
#[error("session closed")]
pub struct SessionClosed;

/// One logical client session, bound to its token and RPC engine instance.
pub struct SessionHandle {
    token: SessionToken,
    created_at: DateTime<Utc>,
    engine: RpcEngine,
    closed: AtomicBool,
    stream_tx: Mutex<Option<mpsc::Sender<String>>>,
    finalize: Mutex<Option<FinalizeFn>>,
    stream_queue: usize,
}

impl SessionHandle {
    pub fn new(
        token: SessionToken,
        engine: RpcEngine,
        stream_queue: usize,
        finalize: FinalizeFn,
    ) -> Self {
        Self {
            token,
            created_at: Utc::now(),
            engine,
            closed: AtomicBool::new(false),
            stream_tx: Mutex::new(None),
            finalize: Mutex::new(Some(finalize)),
            stream_queue,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Process one decoded envelope through the bound engine.
    ///
    /// Notifications produce no response. A request that races a concurrent
    /// close gets an invalid-session envelope rather than a fault.
    pub fn process(&self, envelope: &RequestEnvelope) -> Option<ResponseEnvelope> {
        if self.is_closed() {
            return envelope
                .is_request()
                .then(|| ResponseEnvelope::invalid_session("session closed"));
        }
        self.engine.handle(envelope)
    }

    /// Install a fresh server-push channel, replacing any previous stream,
    /// and return its receiving end. The caller wraps the receiver in a
    /// [`SessionStream`] so the HTTP connection owns the close signal.
    pub fn attach_stream(&self) -> Result<mpsc::Receiver<String>, SessionClosed> {
        let mut slot = self.stream_tx.lock();
        if self.is_closed() {
            return Err(SessionClosed);
        }
        let (tx, rx) = mpsc::channel(self.stream_queue);
        *slot = Some(tx);
        Ok(rx)
    }

    /// Send a server-initiated message over the attached stream.
    ///
    /// Returns `false` when the session is closed, no stream is attached, or
    /// the queue is full — a dropped push is a no-op, not a fault.
    pub fn push(&self, message: &serde_json::Value) -> bool {
        if self.is_closed() {
            return false;
        }
        let slot = self.stream_tx.lock();
        let Some(tx) = slot.as_ref() else {
            return false;
        };
        match tx.try_send(message.to_string()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(token = %self.token, "session stream queue full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Close the session. The first call marks the transport closed, drops
    /// the stream sender (ending any open stream response), and runs the
    /// finalize callback; every later call is a no-op.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.stream_tx.lock().take();
        if let Some(finalize) = self.finalize.lock().take() {
            finalize();
        }
        let age_secs = (Utc::now() - self.created_at).num_seconds();
        tracing::debug!(token = %self.token, age_secs, "session closed");
    }
}

/// Server-push stream for one session, served as SSE.
///
/// Dropping the stream — the client disconnected, or the response was torn
/// down after [`SessionHandle::close`] ended the channel — finalizes the
/// owning session. This is the transport-close signal for sessions that
/// never send an explicit terminate.
pub struct SessionStream {
    inner: ReceiverStream<String>,
    handle: Arc<SessionHandle>,
}

impl SessionStream {
    pub fn new(handle: Arc<SessionHandle>, rx: mpsc::Receiver<String>) -> Self {
        Self {
            inner: ReceiverStream::new(rx),
            handle,
        }
    }
}

impl Stream for SessionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(data)) => {
                Poll::Ready(Some(Ok(Event::default().event("message").data(data))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.handle.close();
    }
}
