//! Frame types
//!
//! The first comma-separated field of every inbound frame.

/// Wire token for a subscribe frame
pub const SUBSCRIBE: &str = "sub";
/// Wire token for an unsubscribe frame
pub const UNSUBSCRIBE: &str = "uns";
/// Wire token for a data frame
pub const MESSAGE: &str = "msg";

/// Frame type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Join the addressed channel
    Subscribe,
    /// Leave the addressed channel
    Unsubscribe,
    /// Deliver a payload to the addressed channel
    Message,
    /// Any other token; dropped by the multiplexer
    Other(String),
}

impl FrameKind {
    /// Parse a wire token
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            SUBSCRIBE => Self::Subscribe,
            UNSUBSCRIBE => Self::Unsubscribe,
            MESSAGE => Self::Message,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the wire token
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Subscribe => SUBSCRIBE,
            Self::Unsubscribe => UNSUBSCRIBE,
            Self::Message => MESSAGE,
            Self::Other(token) => token,
        }
    }

    /// Check if the multiplexer acts on this frame type
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
