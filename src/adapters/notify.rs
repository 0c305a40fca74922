use crate::domain::ports::{NoticeLevel, Notifier, ProgressIndicator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 以日誌輸出通知
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!("✅ {} {}", title, message)
            }
            NoticeLevel::Warning => tracing::warn!("⚠️ {} {}", title, message),
            NoticeLevel::Danger => tracing::error!("❌ {} {}", title, message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// 收集通知，供 CLI 摘要與測試檢查
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                level,
                title: title.to_string(),
                message: message.to_string(),
            });
        }
    }
}

/// 計數型進度指示（開始/結束次數）
#[derive(Debug, Default)]
pub struct ProgressCounter {
    started: AtomicUsize,
    closed: AtomicUsize,
}

impl ProgressCounter {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        self.started() == self.closed()
    }
}

impl ProgressIndicator for ProgressCounter {
    fn start(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        tracing::trace!("⏳ navigation started");
    }

    fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        tracing::trace!("⌛ navigation finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_collects() {
        let notifier = MemoryNotifier::new();
        notifier.success();
        notifier.deleted();
        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.count(NoticeLevel::Warning), 1);
    }

    #[test]
    fn test_progress_counter() {
        let progress = ProgressCounter::default();
        progress.start();
        assert!(!progress.is_idle());
        progress.close();
        assert!(progress.is_idle());
    }
}
