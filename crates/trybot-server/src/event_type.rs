//! Event types.

use thiserror::Error;

/// Event type error.
#[derive(Debug, Error)]
pub enum EventTypeError {
    /// Unsupported event.
    #[error("Unsupported event: {}", event)]
    UnsupportedEvent { event: String },
}

/// Handled webhook event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Issue comment event.
    IssueComment,
    /// Ping event.
    Ping,
}

impl EventType {
    /// Convert event type to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl TryFrom<&str> for EventType {
    type Error = EventTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "issue_comment" => Ok(Self::IssueComment),
            "ping" => Ok(Self::Ping),
            name => Err(EventTypeError::UnsupportedEvent {
                event: name.to_owned(),
            }),
        }
    }
}

impl From<EventType> for &'static str {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::IssueComment => "issue_comment",
            EventType::Ping => "ping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventType;

    #[test]
    fn test_event_as_str() {
        assert_eq!(EventType::Ping.to_str(), "ping");
        assert_eq!(EventType::IssueComment.to_str(), "issue_comment");
    }

    #[test]
    fn test_unsupported_event() {
        assert!(EventType::try_from("pull_request").is_err());
    }
}
