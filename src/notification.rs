//! Enrollment notifications.
//!
//! The batches only describe who must be told about an enrollment. Rendering
//! and delivering the message belongs to the host, behind
//! [`NotificationDispatcher`].

use log::{info, warn};
use serde::Serialize;

use crate::BatchError;

/// Which message a recipient gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    /// The account was created by the batch, the message carries the credentials.
    NewAccount,
    ExistingAccount,
}

/// Everything needed to tell one user about one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub email: String,
    pub user_name: String,
    /// Empty unless the account was just created
    pub password: String,
    pub course_name: String,
}

impl NotificationPayload {
    pub fn subject(&self) -> String {
        format!("Inscripción en el curso: {}", self.course_name)
    }

    pub fn template(&self) -> NotificationTemplate {
        if self.password.is_empty() {
            NotificationTemplate::ExistingAccount
        } else {
            NotificationTemplate::NewAccount
        }
    }
}

pub trait NotificationDispatcher {
    fn dispatch(&self, payload: &NotificationPayload, login_url: &str) -> Result<(), BatchError>;
}

/// Outcome of [`dispatch_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Hands every payload to `dispatcher`. A failed delivery is logged and
/// counted, it never stops the remaining ones.
pub fn dispatch_all(
    dispatcher: &dyn NotificationDispatcher,
    payloads: &[NotificationPayload],
    login_url: &str,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for payload in payloads {
        match dispatcher.dispatch(payload, login_url) {
            Ok(()) => summary.sent += 1,
            Err(err) => {
                warn!("Notification to {} failed: {}", payload.email, err);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Notifications dispatched: {} sent, {} failed",
        summary.sent, summary.failed
    );
    summary
}
