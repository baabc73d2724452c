use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// How long a notification stays up before dismissing itself.
pub const AUTO_DISMISS: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Ephemeral user-facing status message. Dismissal only clears `visible`;
/// the text stays behind so a fade-out can keep rendering it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub visible: bool,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            message: String::new(),
            severity: Severity::Success,
            visible: false,
        }
    }
}

/// Single-slot notification signal. A `watch` channel gives the replace
/// semantics directly: a new message overwrites whatever was showing, there
/// is no queue and no coalescing.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    slot: watch::Sender<Notification>,
    seq: AtomicU64,
    auto_dismiss: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_timeout(AUTO_DISMISS)
    }

    /// Same signal with a custom auto-dismiss delay; tests shorten it.
    pub fn with_timeout(auto_dismiss: Duration) -> Self {
        let (slot, _) = watch::channel(Notification::default());
        Self {
            inner: Arc::new(Inner {
                slot,
                seq: AtomicU64::new(0),
                auto_dismiss,
            }),
        }
    }

    /// Show a message, replacing any pending or visible one, and arm the
    /// auto-dismiss timer. A newer `show` invalidates the older timer.
    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.slot.send_replace(Notification {
            message: message.into(),
            severity,
            visible: true,
        });

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(inner.auto_dismiss).await;
            if inner.seq.load(Ordering::SeqCst) == seq {
                inner.slot.send_modify(|n| n.visible = false);
            }
        });
    }

    /// Hide the current notification without clearing its text.
    pub fn dismiss(&self) {
        self.inner.slot.send_modify(|n| n.visible = false);
    }

    pub fn current(&self) -> Notification {
        self.inner.slot.borrow().clone()
    }

    /// Receiver for the presentation layer; it always observes the latest
    /// slot value only.
    pub fn subscribe(&self) -> watch::Receiver<Notification> {
        self.inner.slot.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
