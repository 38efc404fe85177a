use std::sync::mpsc::Sender;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        debug!(level = ?notice.level, "notice");
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.message),
            NoticeLevel::Warning => eprintln!("warning: {}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }
}

/// Forwards notices to a receiver polled by the UI thread.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: Sender<Notice>,
}

impl ChannelNotifier {
    pub fn new(tx: Sender<Notice>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // A closed receiver means the window is gone.
        let _ = self.tx.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn channel_notifier_forwards_in_order() {
        let (tx, rx) = mpsc::channel();
        let notifier = ChannelNotifier::new(tx);
        notifier.notify(Notice::info("one"));
        notifier.notify(Notice::warning("two"));
        assert_eq!(rx.try_recv().unwrap(), Notice::info("one"));
        assert_eq!(rx.try_recv().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn channel_notifier_tolerates_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelNotifier::new(tx).notify(Notice::error("lost"));
    }
}
