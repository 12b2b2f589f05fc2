//! Request/reply lifecycle shared by the tile and elevation fetchers.
//!
//! A [`Reply`] starts `Pending` and ends in exactly one of `Finished`,
//! `Error` or `Aborted`. Terminal states are final: every transition is an
//! atomic compare-and-set guarded on `Pending`, so a transport response
//! arriving after an abort can never resurrect the reply.

use std::sync::{Arc, Mutex};

use futures::channel::oneshot;
use futures::future::Either;
use tokio::sync::watch;

use crate::error::Error;

/// Lifecycle of one asynchronous request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyState<T> {
    /// The transfer is still in flight.
    Pending,
    /// The transfer completed and delivered a value.
    Finished(T),
    /// The transfer failed; cancellation is *not* an error.
    Error(Error),
    /// The transfer was cancelled via [`Reply::abort`] or by dropping the
    /// reply.
    Aborted,
}

impl<T> ReplyState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Handle to one in-flight or completed request.
///
/// The owner observes the state by polling [`Reply::state`] or awaiting
/// [`Reply::wait_terminal`]. Dropping the reply cancels the transfer.
pub struct Reply<T> {
    state_rx: watch::Receiver<ReplyState<T>>,
    state_tx: Arc<watch::Sender<ReplyState<T>>>,
    abort_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl<T: Clone> Reply<T> {
    /// Current state. A snapshot; a `Pending` reply may become terminal
    /// right after this returns, but a terminal state never changes again.
    pub fn state(&self) -> ReplyState<T> {
        self.state_rx.borrow().clone()
    }

    /// Wait until the reply reaches its terminal state and return it.
    pub async fn wait_terminal(&mut self) -> ReplyState<T> {
        match self.state_rx.wait_for(ReplyState::is_terminal).await {
            Ok(state) => state.clone(),
            // Cannot happen while we hold the sender, but losing the
            // channel would mean the transfer is gone anyway.
            Err(_) => ReplyState::Aborted,
        }
    }

    /// Request cancellation. Idempotent: aborting an already-terminal
    /// reply is a no-op. After this returns the reply is observed
    /// `Aborted` (unless it was already `Finished` or `Error`), even if
    /// the network response arrives later.
    pub fn abort(&self) {
        let transitioned = self.state_tx.send_if_modified(|state| {
            if state.is_terminal() {
                false
            } else {
                *state = ReplyState::Aborted;
                true
            }
        });

        if transitioned {
            log::debug!("Reply aborted.");
            if let Ok(mut abort_tx) = self.abort_tx.lock() {
                if let Some(abort_tx) = abort_tx.take() {
                    let _ = abort_tx.send(());
                }
            }
        }
    }
}

/// Write half given to the transfer task.
pub(crate) struct ReplyWriter<T> {
    state_tx: Arc<watch::Sender<ReplyState<T>>>,
}

impl<T: Clone> ReplyWriter<T> {
    pub(crate) fn transition(&self, terminal: ReplyState<T>) -> bool {
        debug_assert!(terminal.is_terminal());
        self.state_tx.send_if_modified(|state| {
            if state.is_terminal() {
                false
            } else {
                *state = terminal;
                true
            }
        })
    }
}

/// Create a pending reply and its write half.
pub(crate) fn pending<T: Clone>() -> (Reply<T>, ReplyWriter<T>, oneshot::Receiver<()>) {
    let (state_tx, state_rx) = watch::channel(ReplyState::Pending);
    let state_tx = Arc::new(state_tx);
    let (abort_tx, abort_rx) = oneshot::channel();

    let reply = Reply {
        state_rx,
        state_tx: state_tx.clone(),
        abort_tx: Mutex::new(Some(abort_tx)),
    };

    (reply, ReplyWriter { state_tx }, abort_rx)
}

/// Run the transfer until it completes or the reply is aborted, then store
/// the terminal state.
pub(crate) async fn drive<T, F>(
    writer: ReplyWriter<T>,
    abort_rx: oneshot::Receiver<()>,
    transfer: F,
) where
    T: Clone,
    F: std::future::Future<Output = Result<T, Error>>,
{
    futures::pin_mut!(transfer);

    match futures::future::select(transfer, abort_rx).await {
        Either::Left((Ok(value), _)) => {
            writer.transition(ReplyState::Finished(value));
        }
        Either::Left((Err(error), _)) => {
            log::warn!("Transfer failed: {error}.");
            writer.transition(ReplyState::Error(error));
        }
        Either::Right((_, _)) => {
            // Abort already stored the terminal state; if the reply was
            // dropped instead, nobody is looking anymore. Either way the
            // transfer future is dropped here, cancelling the transport.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finished_is_final() {
        let (mut reply, writer, _abort_rx) = pending::<u32>();
        assert_eq!(reply.state(), ReplyState::Pending);

        assert!(writer.transition(ReplyState::Finished(7)));
        assert_eq!(reply.wait_terminal().await, ReplyState::Finished(7));

        // A later abort must not change anything.
        reply.abort();
        assert_eq!(reply.state(), ReplyState::Finished(7));
    }

    #[tokio::test]
    async fn abort_wins_over_a_late_response() {
        let (reply, writer, _abort_rx) = pending::<u32>();

        reply.abort();
        assert_eq!(reply.state(), ReplyState::Aborted);

        // The "response" arrives after the abort.
        assert!(!writer.transition(ReplyState::Finished(7)));
        assert_eq!(reply.state(), ReplyState::Aborted);
    }

    #[tokio::test]
    async fn abort_is_idempotent() {
        let (reply, _writer, mut abort_rx) = pending::<u32>();

        reply.abort();
        reply.abort();
        assert_eq!(reply.state(), ReplyState::Aborted);
        assert_eq!(abort_rx.try_recv(), Ok(Some(())));
    }

    #[tokio::test]
    async fn drive_reports_errors() {
        let (mut reply, writer, abort_rx) = pending::<u32>();

        drive(writer, abort_rx, async {
            Err(Error::Communication("connection reset".to_owned()))
        })
        .await;

        assert_eq!(
            reply.wait_terminal().await,
            ReplyState::Error(Error::Communication("connection reset".to_owned()))
        );
    }
}
