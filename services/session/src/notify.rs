//! User-facing operation notifications.
//!
//! Carries what the original page surfaced as alert dialogs. The console
//! driver prints notifications, tests record them, and the orchestrator
//! stays free of any rendering concern.

use onchain::H256;
use tracing::{error, info};

use crate::orchestrator::OperationKind;

/// Outcome report for one mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    OperationSucceeded {
        operation: OperationKind,
        tx_hash: H256,
    },
    OperationFailed {
        operation: OperationKind,
        message: String,
    },
}

impl Notification {
    /// One-line text as shown to the user.
    pub fn text(&self) -> String {
        match self {
            Notification::OperationSucceeded { operation, tx_hash } => {
                format!("{} (tx 0x{:x})", operation.success_text(), tx_hash)
            }
            Notification::OperationFailed { operation, message } => {
                format!("{} failed: {}", operation.failure_prefix(), message)
            }
        }
    }
}

/// Destination for operation outcome reports.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::OperationSucceeded { .. } => info!("✅ {}", notification.text()),
            Notification::OperationFailed { .. } => error!("❌ {}", notification.text()),
        }
    }
}
