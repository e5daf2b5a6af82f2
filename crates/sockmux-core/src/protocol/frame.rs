//! Frame encoding and decoding
//!
//! Inbound text may arrive wrapped in one layer of double quotes. After the
//! quotes are stripped the text is split on commas:
//!
//! ```text
//! frame := type "," channel_name ["," payload_remainder]
//! ```
//!
//! Text with fewer than two parts is not a frame and is handed back as
//! [`Inbound::Unframed`]. The payload is every part after the channel name,
//! rejoined with commas, with all backslashes removed. That unescape is purely
//! textual: it undoes the quoting applied by [`Frame::to_wire`] for `\"` and
//! `\\`, but not for escapes such as `\n` or `\u0001`.

use super::FrameKind;

/// Field separator
pub const SEPARATOR: char = ',';

const QUOTE: char = '"';
const BACKSLASH: char = '\\';

/// One decoded protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame type
    pub kind: FrameKind,
    /// Addressed channel name
    pub channel: String,
    /// Payload (empty when the frame has only two parts)
    pub payload: String,
}

/// Result of decoding one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A frame with at least a type and a channel name
    Frame(Frame),
    /// Quote-stripped text that is not a frame
    Unframed(String),
}

impl Inbound {
    /// Decode raw inbound text
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        let text = strip_quotes(raw);

        let mut parts = text.split(SEPARATOR);
        let (Some(kind), Some(channel)) = (parts.next(), parts.next()) else {
            return Self::Unframed(text.to_string());
        };

        let remainder: Vec<&str> = parts.collect();
        let payload = remainder.join(",").replace(BACKSLASH, "");

        Self::Frame(Frame {
            kind: FrameKind::parse(kind),
            channel: channel.to_string(),
            payload,
        })
    }
}

impl Frame {
    /// Create a subscribe frame
    #[must_use]
    pub fn subscribe(channel: impl Into<String>) -> Self {
        Self {
            kind: FrameKind::Subscribe,
            channel: channel.into(),
            payload: String::new(),
        }
    }

    /// Create an unsubscribe frame
    #[must_use]
    pub fn unsubscribe(channel: impl Into<String>) -> Self {
        Self {
            kind: FrameKind::Unsubscribe,
            channel: channel.into(),
            payload: String::new(),
        }
    }

    /// Create a data frame
    #[must_use]
    pub fn message(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: FrameKind::Message,
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    /// Render the frame as a quoted string literal
    ///
    /// Data frames always carry the payload field, even when it is empty.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut text = format!("{}{SEPARATOR}{}", self.kind, self.channel);
        if self.kind == FrameKind::Message || !self.payload.is_empty() {
            text.push(SEPARATOR);
            text.push_str(&self.payload);
        }
        quote(&text)
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Frame(type={}, channel={}, payload_len={})",
            self.kind,
            self.channel,
            self.payload.len()
        )
    }
}

/// Encode an outbound `msg,<channel>,<message>` frame
#[must_use]
pub fn encode_message(channel: &str, message: &str) -> String {
    Frame::message(channel, message).to_wire()
}

/// Remove one layer of surrounding double quotes, if present
///
/// Only a matched leading and trailing pair is removed. A lone quote on one
/// side is kept (`"ping` stays `"ping`), and inner quotes are never trimmed,
/// so a quoted payload ending in an escaped quote keeps it.
#[must_use]
pub fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix(QUOTE)
        .and_then(|inner| inner.strip_suffix(QUOTE))
        .unwrap_or(raw)
}

fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
