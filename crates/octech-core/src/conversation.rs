use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use octech_schema::{ChatMessage, ContactInfo, ConversationState, Sender};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::responder::{self, respond};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("no live agent handoff is being offered")]
    NoHandoffOffered,
    #[error("contact info is not being collected")]
    NotCollectingContactInfo,
    #[error("chat session is closed")]
    SessionClosed,
}

/// Simulated latencies for deferred bot messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatDelays {
    pub reply: Duration,
    pub handoff_connect: Duration,
}

impl ChatDelays {
    pub fn immediate() -> Self {
        Self {
            reply: Duration::ZERO,
            handoff_connect: Duration::ZERO,
        }
    }
}

impl Default for ChatDelays {
    fn default() -> Self {
        Self {
            reply: Duration::from_millis(1000),
            handoff_connect: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub id: Uuid,
    pub state: ConversationState,
    pub messages: Vec<ChatMessage>,
    /// True while at least one bot message is still scheduled.
    pub typing: bool,
}

/// Sessions untouched for this long are dropped when the next one opens.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct Inner {
    state: ConversationState,
    log: Vec<ChatMessage>,
    pending: usize,
    last_active: Instant,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: ConversationState::default(),
            log: Vec::new(),
            pending: 0,
            last_active: Instant::now(),
        }
    }

    fn push(&mut self, text: impl Into<String>, sender: Sender) -> ChatMessage {
        // Wall clocks can step backwards; the log must not.
        let now = Utc::now();
        let timestamp = match self.log.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        let message = ChatMessage::new(text, sender, timestamp);
        self.log.push(message.clone());
        message
    }
}

/// One visitor's conversation with the scripted bot.
///
/// Deferred bot messages run as tasks bound to the session's cancellation
/// token. After [`ChatSession::close`] returns, no task writes to the log.
pub struct ChatSession {
    id: Uuid,
    inner: Arc<Mutex<Inner>>,
    delays: ChatDelays,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl ChatSession {
    pub fn new(delays: ChatDelays) -> Self {
        let mut inner = Inner::new();
        inner.push(responder::GREETING, Sender::Bot);
        Self {
            id: Uuid::new_v4(),
            inner: Arc::new(Mutex::new(inner)),
            delays,
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn idle_for(&self) -> Duration {
        self.inner.lock().await.last_active.elapsed()
    }

    pub async fn state(&self) -> ConversationState {
        self.inner.lock().await.state
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.log.clone()
    }

    /// Polling counts as activity, so an open widget keeps its session alive.
    pub async fn snapshot(&self) -> ChatSnapshot {
        let mut inner = self.inner.lock().await;
        inner.last_active = Instant::now();
        ChatSnapshot {
            id: self.id,
            state: inner.state,
            messages: inner.log.clone(),
            typing: inner.pending > 0,
        }
    }

    /// Appends the user's message now and the bot's reply after the reply delay.
    ///
    /// The reply is chosen from the conversation state at the moment of the
    /// send; only its next state is applied when the reply lands.
    pub async fn send(&self, text: &str) -> Result<ChatMessage, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut inner = self.inner.lock().await;
        self.ensure_open()?;
        inner.last_active = Instant::now();
        let message = inner.push(text, Sender::User);
        let reply = respond(inner.state, text);
        inner.pending += 1;
        drop(inner);

        self.schedule(self.delays.reply, move |inner| {
            inner.state = reply.next_state;
            inner.push(reply.text(), Sender::Bot);
        });

        tracing::debug!(session = %self.id, "user message accepted");
        Ok(message)
    }

    pub async fn accept_handoff(&self) -> Result<ChatMessage, ChatError> {
        let mut inner = self.inner.lock().await;
        self.ensure_open()?;
        if inner.state != ConversationState::OfferingHandoff {
            return Err(ChatError::NoHandoffOffered);
        }
        inner.last_active = Instant::now();
        inner.state = ConversationState::Idle;
        let connecting = inner.push(responder::HANDOFF_CONNECTING, Sender::Bot);
        inner.pending += 1;
        drop(inner);

        self.schedule(self.delays.handoff_connect, |inner| {
            inner.push(responder::HANDOFF_CONNECTED, Sender::Bot);
        });

        tracing::info!(session = %self.id, "live agent handoff accepted");
        Ok(connecting)
    }

    pub async fn decline_handoff(&self) -> Result<ChatMessage, ChatError> {
        let mut inner = self.inner.lock().await;
        self.ensure_open()?;
        if inner.state != ConversationState::OfferingHandoff {
            return Err(ChatError::NoHandoffOffered);
        }
        inner.last_active = Instant::now();
        inner.state = ConversationState::Idle;
        Ok(inner.push(responder::HANDOFF_DECLINED, Sender::Bot))
    }

    /// Echoes the submitted details back verbatim; nothing is validated.
    pub async fn submit_contact_info(&self, info: &ContactInfo) -> Result<ChatMessage, ChatError> {
        let mut inner = self.inner.lock().await;
        self.ensure_open()?;
        if inner.state != ConversationState::CollectingContactInfo {
            return Err(ChatError::NotCollectingContactInfo);
        }
        inner.last_active = Instant::now();
        inner.state = ConversationState::Idle;
        let text = format!(
            "Information received - Name: {}, Email: {}",
            info.name, info.email
        );
        Ok(inner.push(text, Sender::Bot))
    }

    /// Cancels every scheduled message and waits for the tasks to finish.
    pub async fn close(&self) {
        {
            let _guard = self.inner.lock().await;
            self.cancel.cancel();
        }
        self.tracker.close();
        self.tracker.wait().await;
        tracing::debug!(session = %self.id, "chat session closed");
    }

    fn ensure_open(&self) -> Result<(), ChatError> {
        if self.cancel.is_cancelled() {
            Err(ChatError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn schedule<F>(&self, delay: Duration, apply: F)
    where
        F: FnOnce(&mut Inner) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let token = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let mut inner = inner.lock().await;
                    // close() cancels while holding the lock.
                    if token.is_cancelled() {
                        return;
                    }
                    apply(&mut inner);
                    inner.pending = inner.pending.saturating_sub(1);
                }
            }
        });
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Live chat sessions keyed by id.
///
/// A visitor that leaves without closing its widget never sends the delete,
/// so opening a session first drops every session idle longer than the TTL.
pub struct ChatRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<ChatSession>>>,
    delays: ChatDelays,
    idle_ttl: Duration,
}

impl ChatRegistry {
    pub fn new(delays: ChatDelays) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            delays,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }

    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    pub async fn create(&self) -> Arc<ChatSession> {
        self.evict_idle().await;
        let session = Arc::new(ChatSession::new(self.delays));
        self.sessions
            .write()
            .await
            .insert(session.id(), Arc::clone(&session));
        tracing::info!(session = %session.id(), "chat session opened");
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<ChatSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Removes the session and cancels its pending messages.
    pub async fn close(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(session) => {
                session.close().await;
                true
            }
            None => false,
        }
    }

    /// Closes and removes sessions idle for longer than the TTL.
    pub async fn evict_idle(&self) -> usize {
        let stale: Vec<Arc<ChatSession>> = {
            let mut sessions = self.sessions.write().await;
            let mut stale_ids = Vec::new();
            for (id, session) in sessions.iter() {
                if session.idle_for().await > self.idle_ttl {
                    stale_ids.push(*id);
                }
            }
            stale_ids
                .iter()
                .filter_map(|id| sessions.remove(id))
                .collect()
        };

        for session in &stale {
            session.close().await;
        }
        if !stale.is_empty() {
            tracing::info!(evicted = stale.len(), "idle chat sessions closed");
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
