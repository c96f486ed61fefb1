//! Explicit mailbox timeouts (spec.md §9): every blocking receive in
//! this crate goes through [`recv_with_timeout`] rather than an
//! implicit infinite wait, so a crashed upstream actor surfaces as a
//! timeout error instead of hanging the whole cortex forever.

use std::time::Duration;
use tokio::sync::mpsc::Receiver;

/// Default bound on every actor mailbox in this crate
pub const MAILBOX_CAPACITY: usize = 64;

/// The ceiling an actuator waits for a scape's fitness report before
/// giving up (spec.md §5)
pub const ACTUATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Receive the next message from `rx`, or `None` if `timeout` elapses
/// or the channel closes first.
pub async fn recv_with_timeout<T>(rx: &mut Receiver<T>, timeout: Duration) -> Option<T> {
    tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recv_returns_none_on_timeout() {
        let (_tx, mut rx) = tokio::sync::mpsc::channel::<u32>(1);
        let got = recv_with_timeout(&mut rx, Duration::from_millis(10)).await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn recv_returns_the_sent_value() {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<u32>(1);
        tx.send(7).await.unwrap();
        let got = recv_with_timeout(&mut rx, Duration::from_millis(100)).await;
        assert_eq!(got, Some(7));
    }
}
