//! In-memory view of the conversation, kept in step with the store.
//!
//! The messages held here are exactly what is sent to the model. A seed
//! pair shown for an empty store is not written until the first real turn,
//! and is then written in the same transaction as that turn.

use lingua_core::{ChatMessage, Error, MessageStore, Result, Role, SeedProvider, Turn};
use tracing::{debug, info};

pub struct ConversationSession<S> {
    store: S,
    messages: Vec<ChatMessage>,
    /// Leading messages already in the store. Less than `messages.len()`
    /// only while an unpersisted seed pair is shown.
    persisted: usize,
}

impl<S: MessageStore> ConversationSession<S> {
    /// Load the persisted conversation, or show the seed pair if there is none.
    pub async fn start(store: S, seed: &dyn SeedProvider) -> Result<Self> {
        let mut session = Self {
            store,
            messages: Vec::new(),
            persisted: 0,
        };
        session.reload(seed).await?;
        Ok(session)
    }

    /// Show the seed pair again after the store was cleared. Nothing is
    /// read or written; the seed is stored with the next append.
    pub fn restart(&mut self, seed: &dyn SeedProvider) {
        info!("Conversation cleared, starting from seed pair");
        self.messages = seed.seed().to_vec();
        self.persisted = 0;
    }

    async fn reload(&mut self, seed: &dyn SeedProvider) -> Result<()> {
        let turns = self.store.load_all().await?;

        if turns.is_empty() {
            info!("No stored conversation, starting from seed pair");
            self.messages = seed.seed().to_vec();
            self.persisted = 0;
        } else {
            info!("Resuming conversation with {} turns", turns.len());
            self.messages = turns.iter().map(Turn::to_message).collect();
            self.persisted = self.messages.len();
        }
        Ok(())
    }

    pub async fn append_user(&mut self, content: &str) -> Result<Turn> {
        self.append(Role::User, content).await
    }

    pub async fn append_assistant(&mut self, content: &str) -> Result<Turn> {
        self.append(Role::Assistant, content).await
    }

    /// Persist first, then extend the in-memory view. A failed write leaves
    /// the session exactly as it was.
    async fn append(&mut self, role: Role, content: &str) -> Result<Turn> {
        let message = ChatMessage::new(role, content);

        let turn = if self.has_pending_seed() {
            let mut pending = self.messages[self.persisted..].to_vec();
            pending.push(message.clone());
            debug!("Persisting seed pair with first {} turn", role);
            self.store
                .append_batch(&pending)
                .await?
                .pop()
                .ok_or_else(|| Error::storage("append batch", anyhow::anyhow!("no rows written")))?
        } else {
            self.store.append(role, content).await?
        };

        self.messages.push(message);
        self.persisted = self.messages.len();
        Ok(turn)
    }

    /// The ordered history to send to the model.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True while the seed pair is shown but not yet stored.
    #[must_use]
    pub const fn has_pending_seed(&self) -> bool {
        self.persisted < self.messages.len()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
