//! Position in a forum's history.
//!
//! Messages are ordered by `(sent_at, id)`, so two messages stamped at the
//! same instant still have a fixed order and a page boundary between them
//! loses neither.

use std::fmt;
use std::str::FromStr;

use chrono::SecondsFormat;
use uuid::Uuid;

use super::ForumMessage;
use crate::domain::foundation::{ForumMessageId, Timestamp, ValidationError};

/// Everything strictly after this position is "since" it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageCursor {
    pub sent_at: Timestamp,
    pub id: ForumMessageId,
}

impl MessageCursor {
    /// The position of `message` itself.
    pub fn of(message: &ForumMessage) -> Self {
        Self {
            sent_at: message.sent_at,
            id: message.id,
        }
    }

    /// Before every message stamped at `sent_at`.
    pub fn start_of(sent_at: Timestamp) -> Self {
        Self {
            sent_at,
            id: ForumMessageId::from_uuid(Uuid::nil()),
        }
    }

    /// After every message stamped at `sent_at`.
    pub fn end_of(sent_at: Timestamp) -> Self {
        Self {
            sent_at,
            id: ForumMessageId::from_uuid(Uuid::from_u128(u128::MAX)),
        }
    }

    pub fn precedes(&self, message: &ForumMessage) -> bool {
        *self < Self::of(message)
    }
}

impl fmt::Display for MessageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}",
            self.sent_at.as_datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.id
        )
    }
}

/// Parses `<rfc3339>_<message id>`. A bare timestamp means "after every
/// message sent at that instant".
impl FromStr for MessageCursor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "cursor".to_string(),
            reason: reason.to_string(),
        };

        let (sent_at, id) = match s.rsplit_once('_') {
            Some((sent_at, id)) => (sent_at, Some(id)),
            None => (s, None),
        };
        let sent_at =
            Timestamp::parse_rfc3339(sent_at).map_err(|_| invalid("not an RFC 3339 timestamp"))?;

        match id {
            Some(id) => Ok(Self {
                sent_at,
                id: id.parse().map_err(|_| invalid("not a message id"))?,
            }),
            None => Ok(Self::end_of(sent_at)),
        }
    }
}
