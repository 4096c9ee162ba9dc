//! Forum message entity.

use serde::{Deserialize, Serialize};

use super::ChatError;
use crate::domain::foundation::{ForumId, ForumMessageId, Principal, Timestamp, UserId};

/// Maximum length for a message body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// A message posted to a forum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumMessage {
    pub id: ForumMessageId,
    pub forum_id: ForumId,
    pub author_id: UserId,
    pub author_name: String,
    pub body: String,
    pub sent_at: Timestamp,
}

impl ForumMessage {
    /// Creates a message authored by `author`, stamped now.
    ///
    /// # Errors
    ///
    /// - `EmptyMessage` if the body is blank
    /// - `MessageTooLong` if the body exceeds [`MAX_MESSAGE_LENGTH`]
    pub fn compose(forum_id: ForumId, author: &Principal, body: &str) -> Result<Self, ChatError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let length = body.chars().count();
        if length > MAX_MESSAGE_LENGTH {
            return Err(ChatError::MessageTooLong { length });
        }

        Ok(Self {
            id: ForumMessageId::new(),
            forum_id,
            author_id: author.id.clone(),
            author_name: author.display_name_or_email().to_string(),
            body: body.to_string(),
            sent_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    fn author() -> Principal {
        Principal::new(UserId::new("u-1").unwrap(), Role::User, "", "ada@example.com")
    }

    #[test]
    fn compose_trims_body_and_uses_email_fallback() {
        let message = ForumMessage::compose(ForumId::new(), &author(), "  hello  ").unwrap();

        assert_eq!(message.body, "hello");
        assert_eq!(message.author_name, "ada@example.com");
    }

    #[test]
    fn compose_rejects_blank_body() {
        assert_eq!(
            ForumMessage::compose(ForumId::new(), &author(), "   ").unwrap_err(),
            ChatError::EmptyMessage
        );
    }

    #[test]
    fn compose_rejects_long_body() {
        let body = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(matches!(
            ForumMessage::compose(ForumId::new(), &author(), &body),
            Err(ChatError::MessageTooLong { .. })
        ));
    }
}
