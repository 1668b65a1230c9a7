pub mod messages;
mod webhook;

pub use webhook::WebhookNotifier;

use std::{sync::Arc, time::Duration};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Report,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    // 嵌入消息的颜色，为空时按严重程度选择
    pub color: Option<u32>,
}

impl Message {
    pub fn new(severity: Severity, title: impl Into<String>, body: impl Into<String>) -> Self {
        Message {
            severity,
            title: title.into(),
            body: body.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn color(&self) -> u32 {
        self.color.unwrap_or(match self.severity {
            Severity::Info => messages::COLOR_BLUE,
            Severity::Report => messages::COLOR_GREEN,
            Severity::Error => messages::COLOR_RED,
        })
    }
}

/// Best-effort delivery of a message. Implementations log failures and never return them.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &Message);
}

/// Used when no endpoint is configured.
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, message: &Message) {
        debug!(
            "Notifications disabled, dropping {} message: {}",
            message.severity, message.title
        );
    }
}

pub fn from_endpoint(endpoint: Option<String>, timeout: Duration) -> Arc<dyn Notifier> {
    match endpoint {
        Some(url) => Arc::new(WebhookNotifier::new(url, timeout)),
        None => Arc::new(DisabledNotifier),
    }
}

/// Delivers `message` on the blocking pool so a slow endpoint doesn't stall the runtime.
pub async fn notify_async(notifier: Arc<dyn Notifier>, message: Message) {
    let title = message.title.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || notifier.notify(&message)).await {
        log::error!("Notification task for `{title}` failed: {e}");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Report.to_string(), "report");
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[test]
    fn test_color() {
        let message = Message::new(Severity::Error, "title", "body");
        assert_eq!(message.color(), messages::COLOR_RED);
        assert_eq!(message.with_color(0x123456).color(), 0x123456);
    }
}
