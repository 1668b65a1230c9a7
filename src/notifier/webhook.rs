use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;

use super::{Message, Notifier};
use crate::errors::Result;

// Discord 嵌入消息描述的长度上限
const MAX_DESCRIPTION_CHARS: usize = 4096;
const FOOTER: &str = "purgatory";

#[derive(Debug, Serialize)]
struct Payload<'a> {
    embeds: [Embed<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: String,
    color: u32,
    timestamp: String,
    footer: Footer,
}

#[derive(Debug, Serialize)]
struct Footer {
    text: &'static str,
}

/// Posts messages as Discord embeds.
pub struct WebhookNotifier {
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(url: String, timeout: Duration) -> Self {
        WebhookNotifier { url, timeout }
    }

    fn send(&self, message: &Message) -> Result<i32> {
        let body = render(message)?;
        let resp = minreq::post(&self.url)
            .with_header("Content-Type", "application/json")
            .with_body(body)
            .with_timeout(self.timeout.as_secs().max(1))
            .send()?;

        Ok(resp.status_code)
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, message: &Message) {
        match self.send(message) {
            Ok(status_code) if (200..300).contains(&status_code) => {
                info!("Notification sent: {}", message.title)
            }
            Ok(status_code) => warn!(
                "Notification `{}` rejected with status: {status_code}",
                message.title
            ),
            Err(e) => error!("Failed to send notification `{}`: {e}", message.title),
        }
    }
}

fn render(message: &Message) -> Result<String> {
    let payload = Payload {
        embeds: [Embed {
            title: &message.title,
            description: truncate(&message.body, MAX_DESCRIPTION_CHARS),
            color: message.color(),
            timestamp: Utc::now().to_rfc3339(),
            footer: Footer { text: FOOTER },
        }],
    };

    Ok(serde_json::to_string(&payload)?)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars.saturating_sub(1)) {
        Some((idx, _)) if text[idx..].chars().count() > 1 => format!("{}…", &text[..idx]),
        _ => text.to_string(),
    }
}
