//! Transient alert banners with fire-and-forget auto-dismiss timers.
//!
//! Pushing a non-permanent alert spawns a one-shot timer task; when it
//! fires, the alert id lands on a channel that `poll_expired` drains from
//! the main loop's tick. Dismissing an alert that is already gone (the user
//! closed it first) is a silent no-op.

use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub id: u64,
    pub level: AlertLevel,
    pub message: String,
    /// Permanent alerts never get a timer; only manual dismissal removes them.
    pub permanent: bool,
}

pub struct AlertQueue {
    alerts: Vec<Alert>,
    next_id: u64,
    timeout: Duration,
    expired_tx: mpsc::UnboundedSender<u64>,
    expired_rx: mpsc::UnboundedReceiver<u64>,
}

impl AlertQueue {
    pub fn new(timeout: Duration) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        Self {
            alerts: Vec::new(),
            next_id: 0,
            timeout,
            expired_tx,
            expired_rx,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Push an auto-dismissing alert and start its one-shot timer.
    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>) -> u64 {
        self.push_inner(level, message.into(), false)
    }

    /// Push an alert that stays until manually dismissed.
    pub fn push_permanent(&mut self, level: AlertLevel, message: impl Into<String>) -> u64 {
        self.push_inner(level, message.into(), true)
    }

    fn push_inner(&mut self, level: AlertLevel, message: String, permanent: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.alerts.push(Alert {
            id,
            level,
            message,
            permanent,
        });

        if !permanent {
            let tx = self.expired_tx.clone();
            let timeout = self.timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                // Receiver may be gone on shutdown; nothing to do then.
                let _ = tx.send(id);
            });
        }

        id
    }

    /// Remove an alert by id. Missing ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.alerts.retain(|a| a.id != id);
    }

    /// Dismiss the oldest dismissible alert (bound to a key in the TUI).
    pub fn dismiss_front(&mut self) {
        if let Some(front) = self.alerts.first() {
            let id = front.id;
            self.dismiss(id);
        }
    }

    /// Drain timer expirations and drop the matching alerts.
    /// Called from the main loop's tick.
    pub fn poll_expired(&mut self) {
        while let Ok(id) = self.expired_rx.try_recv() {
            self.dismiss(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn alert_expires_after_timeout() {
        let mut queue = AlertQueue::new(Duration::from_millis(20));
        queue.push(AlertLevel::Info, "saved");
        assert_eq!(queue.len(), 1);

        // Not before the timeout.
        queue.poll_expired();
        assert_eq!(queue.len(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        queue.poll_expired();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn permanent_alert_outlives_timeout() {
        let mut queue = AlertQueue::new(Duration::from_millis(20));
        let id = queue.push_permanent(AlertLevel::Error, "store unreadable");

        tokio::time::sleep(Duration::from_millis(80)).await;
        queue.poll_expired();
        assert_eq!(queue.len(), 1);

        queue.dismiss(id);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn late_timer_on_dismissed_alert_is_a_noop() {
        let mut queue = AlertQueue::new(Duration::from_millis(20));
        let id = queue.push(AlertLevel::Success, "reserved");
        queue.dismiss(id);
        assert!(queue.is_empty());

        // Let the timer fire into nothing.
        tokio::time::sleep(Duration::from_millis(80)).await;
        queue.poll_expired();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn dismiss_front_skips_nothing_on_empty() {
        let mut queue = AlertQueue::new(DEFAULT_TIMEOUT);
        queue.dismiss_front();
        assert!(queue.is_empty());

        queue.push(AlertLevel::Info, "first");
        queue.push(AlertLevel::Info, "second");
        queue.dismiss_front();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().map(|a| a.message.as_str()), Some("second"));
    }
}
