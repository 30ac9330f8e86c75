use std::collections::HashMap;

use serde::Serialize;

use crate::users::UserId;

use super::Interaction;

/// Number of trailing messages shown in an inbox row.
pub const PREVIEW_LEN: usize = 3;

/// All interactions between the viewer and one counterpart, oldest first.
///
/// Only [`build_conversations`] creates these, so `messages` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    counterpart_id: UserId,
    messages: Vec<Interaction>,
}

impl Conversation {
    pub fn counterpart_id(&self) -> &str {
        &self.counterpart_id
    }

    pub fn messages(&self) -> &[Interaction] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Interaction> {
        self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Latest message; on equal timestamps, the one stored last.
    pub fn last_message(&self) -> &Interaction {
        &self.messages[self.messages.len() - 1]
    }

    /// Adds a freshly stored interaction of this thread after every message
    /// with an equal or earlier timestamp.
    pub fn append(mut self, interaction: Interaction) -> Conversation {
        let at = self
            .messages
            .partition_point(|message| message.timestamp <= interaction.timestamp);
        self.messages.insert(at, interaction);
        self
    }
}

/// Groups a viewer's interactions into threads, most recent thread first.
///
/// Every interaction must have `viewer_id` as sender or counterpart; filtering
/// by viewer is the store query's job. Input order stands in for insertion
/// order when breaking timestamp ties, both inside a thread and between threads.
pub fn build_conversations(
    interactions: impl IntoIterator<Item = Interaction>,
    viewer_id: &str,
) -> Vec<Conversation> {
    let mut first_seen: Vec<UserId> = Vec::new();
    let mut groups: HashMap<UserId, Vec<Interaction>> = HashMap::new();

    for interaction in interactions {
        let other = interaction.other_party(viewer_id).to_owned();
        groups
            .entry(other)
            .or_insert_with_key(|other| {
                first_seen.push(other.clone());
                Vec::new()
            })
            .push(interaction);
    }

    let mut conversations: Vec<Conversation> = first_seen
        .into_iter()
        .filter_map(|counterpart_id| {
            let mut messages = groups.remove(&counterpart_id)?;
            messages.sort_by_key(|message| message.timestamp);
            Some(Conversation {
                counterpart_id,
                messages,
            })
        })
        .collect();

    conversations.sort_by(|a, b| b.last_message().timestamp.cmp(&a.last_message().timestamp));
    conversations
}

/// One inbox row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub counterpart_id: UserId,
    pub counterpart_label: String,
    pub message_count: usize,
    pub last_message: Interaction,
    /// `true` when the viewer wrote the last message ("you replied").
    pub viewer_sent_last: bool,
    pub recent: Vec<Interaction>,
}

impl ConversationSummary {
    pub fn new(conversation: &Conversation, viewer_id: &str, counterpart_label: String) -> Self {
        let messages = conversation.messages();
        let last_message = conversation.last_message().clone();
        Self {
            counterpart_id: conversation.counterpart_id.clone(),
            counterpart_label,
            message_count: messages.len(),
            viewer_sent_last: last_message.is_from(viewer_id),
            last_message,
            recent: messages[messages.len().saturating_sub(PREVIEW_LEN)..].to_vec(),
        }
    }
}
