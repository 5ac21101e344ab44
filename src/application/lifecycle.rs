//! # Process Lifecycle
//!
//! Listeners cannot end the process themselves; they hand an [`ExitReason`] to `main`, which
//! broadcasts `shutdown` and then exits with the matching code.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Ctrl-C / SIGINT.
    Interrupted,
    LoginFailed,
    /// A listener fault escaped to the transport boundary.
    ListenerFault,
}

impl ExitReason {
    pub fn code(self) -> i32 {
        match self {
            ExitReason::Interrupted => 0,
            ExitReason::LoginFailed => 1,
            ExitReason::ListenerFault => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExitHandle {
    tx: mpsc::UnboundedSender<ExitReason>,
}

impl ExitHandle {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ExitReason>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn request(&self, reason: ExitReason) {
        if self.tx.send(reason).is_err() {
            tracing::warn!(?reason, "Exit already in progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_reaches_receiver() {
        let (handle, mut rx) = ExitHandle::new();
        handle.clone().request(ExitReason::LoginFailed);
        let reason = rx.recv().await.unwrap();
        assert_eq!(reason, ExitReason::LoginFailed);
        assert_eq!(reason.code(), 1);
    }
}
