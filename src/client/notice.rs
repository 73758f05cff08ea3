use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

/// how long a notice stays up when nothing replaces it
pub const NOTICE_DURATION: Duration = Duration::from_millis(4000);

/// The two flavours of notice shown to the user
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// a mutation went through
    Info,
    /// a mutation failed and the mirror was reconciled
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// info or error
    pub kind: NoticeKind,
    /// the text shown
    pub text: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Info => write!(f, "{}", self.text),
            NoticeKind::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// Holds the single current [`Notice`].
///
/// Showing a notice replaces the previous one and schedules a timer that clears it after the
/// display duration. Every notice bumps a generation counter and a timer only clears the notice
/// of its own generation, so timers of replaced notices do nothing.
#[derive(Debug, Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier::with_duration(NOTICE_DURATION)
    }
}

impl Notifier {
    /// a notifier whose notices clear after [`NOTICE_DURATION`]
    pub fn new() -> Self {
        Notifier::default()
    }

    /// a notifier whose notices clear after `duration`
    pub fn with_duration(duration: Duration) -> Self {
        Notifier {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    /// shows an info notice
    pub fn info(&self, text: impl Into<String>) {
        self.show(Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        })
    }

    /// shows an error notice
    pub fn error(&self, text: impl Into<String>) {
        self.show(Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        })
    }

    /// replaces the current notice and schedules its removal.
    ///
    /// Outside of a tokio runtime no timer can be scheduled and the notice stays until replaced.
    pub fn show(&self, notice: Notice) {
        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.current = Some(notice);
            slot.generation
        };

        if let Ok(handle) = Handle::try_current() {
            let shared = Arc::clone(&self.slot);
            let duration = self.duration;
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                let mut slot = lock(&shared);
                if slot.generation == generation {
                    slot.current = None;
                }
            });
        }
    }

    /// the notice currently shown, if any
    pub fn current(&self) -> Option<Notice> {
        lock(&self.slot).current.clone()
    }
}

// a panic while holding the lock cannot leave the slot half written
fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn notice_clears_after_duration() {
        let notifier = Notifier::new();
        notifier.info("Added Ada");
        assert_eq!(notifier.current().unwrap().text, "Added Ada");

        sleep(Duration::from_millis(3999)).await;
        assert!(notifier.current().is_some());

        sleep(Duration::from_millis(2)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_does_not_clear_newer_notice() {
        let notifier = Notifier::new();
        notifier.info("first");

        sleep(Duration::from_millis(3000)).await;
        notifier.error("second");

        // the first timer fires at 4000 ms
        sleep(Duration::from_millis(1500)).await;
        let current = notifier.current().expect("second notice still shown");
        assert_eq!(current.kind, NoticeKind::Error);
        assert_eq!(current.text, "second");

        // the second one at 7000 ms
        sleep(Duration::from_millis(3000)).await;
        assert!(notifier.current().is_none());
    }

    #[test]
    fn without_runtime_notice_stays() {
        let notifier = Notifier::new();
        notifier.error("boom");
        assert_eq!(notifier.current().unwrap().to_string(), "error: boom");
    }
}
