//! Conversations.
//!
//! The endpoint returns every conversation at once, so search and paging
//! are always done locally.

use futures::future::try_join_all;
use moveminds_dto::{Conversation, Message, NewMessage, Page};

use crate::api::ApiClient;
use crate::collection::{
    CollectionSource, FilterSet, FilterState, RemoteCollection, search_matches,
};
use crate::error::Result;
use crate::forms::{FormValues, message_form};
use crate::notices::Notices;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    pub unread_only: bool,
}

impl FilterSet<Conversation> for ConversationFilter {
    fn matches(&self, conversation: &Conversation, search: &str) -> bool {
        (!self.unread_only || conversation.unread_count > 0)
            && search_matches(
                search,
                &[
                    Some(&conversation.participant_name),
                    conversation.last_message.as_deref(),
                ],
            )
    }
}

pub struct ConversationSource {
    api: ApiClient,
}

impl CollectionSource for ConversationSource {
    type Item = Conversation;
    type Filter = ConversationFilter;

    async fn fetch(
        &self,
        _request: &FilterState<ConversationFilter>,
    ) -> Result<Page<Conversation>> {
        Ok(Page::single(self.api.conversations().await?))
    }

    fn supports(&self, _filters: &ConversationFilter) -> bool {
        false
    }

    fn arrange(&self, items: &mut [Conversation]) {
        // Most recent first; ISO-8601 strings sort chronologically.
        items.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    }
}

pub struct MessagesView {
    api: ApiClient,
    conversations: RemoteCollection<ConversationSource>,
}

impl MessagesView {
    pub fn new(api: ApiClient, page_size: usize, notices: Notices) -> Self {
        let source = ConversationSource { api: api.clone() };
        Self {
            api,
            conversations: RemoteCollection::with_notices(source, page_size, notices),
        }
    }

    pub fn conversations(&self) -> &RemoteCollection<ConversationSource> {
        &self.conversations
    }

    pub fn unread_total(&self) -> u32 {
        self.conversations
            .items()
            .iter()
            .map(|c| c.unread_count)
            .sum()
    }

    pub async fn thread(&self, other_user_id: i64) -> Result<Vec<Message>> {
        self.api.conversation(other_user_id).await
    }

    /// Clear the unread badge right away, then mark every unread message
    /// `other_user_id` sent in `thread` as read on the backend.
    pub async fn mark_read(&self, other_user_id: i64, thread: &[Message]) -> Result<()> {
        let unread: Vec<i64> = thread
            .iter()
            .filter(|m| m.sender_id == other_user_id && !m.is_read)
            .map(|m| m.id)
            .collect();
        if unread.is_empty() {
            return Ok(());
        }
        self.conversations
            .apply_and_commit(
                other_user_id,
                || try_join_all(unread.iter().map(|&id| self.api.mark_message_read(id))),
                |conversation| Conversation {
                    unread_count: 0,
                    ..conversation.clone()
                },
            )
            .await?;
        Ok(())
    }

    pub async fn send(&self, receiver_id: i64, values: &FormValues) -> Result<Message> {
        message_form().validate(values)?;
        let content = values.text("content").unwrap_or_default();
        let message = self
            .api
            .send_message(&NewMessage {
                receiver_id,
                content: content.clone(),
            })
            .await?;
        self.conversations
            .patch_local(receiver_id, |conversation| Conversation {
                last_message: Some(content.clone()),
                last_message_at: message.sent_at.clone(),
                ..conversation.clone()
            });
        self.conversations.notices().success("Message sent");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: i64, name: &str, unread: u32, at: &str) -> Conversation {
        Conversation {
            id,
            participant_name: name.to_string(),
            participant_role: None,
            last_message: Some("See you at 6".to_string()),
            last_message_at: Some(at.to_string()),
            unread_count: unread,
        }
    }

    #[test]
    fn test_filter_searches_name_and_last_message() {
        let c = conversation(1, "Nuwan Silva", 2, "2024-05-01T10:00:00");
        let filter = ConversationFilter::default();
        assert!(filter.matches(&c, "silva"));
        assert!(filter.matches(&c, "at 6"));
        assert!(!filter.matches(&c, "pilates"));

        let unread = ConversationFilter { unread_only: true };
        assert!(unread.matches(&c, ""));
        assert!(!unread.matches(&conversation(2, "A", 0, "2024-05-01T10:00:00"), ""));
    }

    #[test]
    fn test_latest_conversation_first() {
        let source = ConversationSource {
            api: ApiClient::with_client(
                reqwest::Client::new(),
                "http://localhost:1",
                crate::session::SessionContext::in_memory(Default::default()),
            ),
        };
        let mut items = vec![
            conversation(1, "Old", 0, "2024-04-01T09:00:00"),
            conversation(2, "New", 0, "2024-05-02T09:00:00"),
        ];
        source.arrange(&mut items);
        assert_eq!(items[0].participant_name, "New");
        assert!(!source.supports(&ConversationFilter::default()));
    }
}
