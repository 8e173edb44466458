//! Per-client sessions for the HTTP API
//!
//! Each session owns a [`SessionState`] snapshot, a support conversation and
//! the cancellation tokens of its in-flight search and insight fetch.

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::InsightReport;
use crate::models::PostalRecord;
use crate::models::Resolution;
use crate::session::DetailTicket;
use crate::session::SearchTicket;
use crate::session::SessionState;
use crate::support::SupportAgent;
use crate::support::SupportConversation;
use crate::support::SupportMessage;

/// Detail view waiting for insights
pub struct DetailClaim {
    pub ticket: DetailTicket,
    pub record: PostalRecord,
    pub token: CancellationToken,
}

/// Snapshot plus the tokens of the work it waits on. Locked together so a
/// ticket and its token are always issued in one step.
struct SessionSlot {
    state: SessionState,
    search_token: Option<CancellationToken>,
    detail_token: Option<CancellationToken>,
}

impl SessionSlot {
    fn install_search_token(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        cancel(self.search_token.replace(token.clone()));
        cancel(self.detail_token.take());
        token
    }

    fn install_detail_token(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        cancel(self.detail_token.replace(token.clone()));
        token
    }
}

fn cancel(token: Option<CancellationToken>) {
    if let Some(token) = token {
        token.cancel();
    }
}

pub struct PincodeSession {
    session_id: String,
    created_at: DateTime<Utc>,
    last_activity: AtomicI64,
    slot: Mutex<SessionSlot>,
    support: Mutex<SupportConversation>,
}

impl PincodeSession {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            created_at: now,
            last_activity: AtomicI64::new(now.timestamp()),
            slot: Mutex::new(SessionSlot {
                state: SessionState::new(),
                search_token: None,
                detail_token: None,
            }),
            support: Mutex::new(SupportConversation::default()),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn touch(&self) {
        self.last_activity.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_expired_at(&self, now: i64, timeout_secs: u64) -> bool {
        let idle = now.saturating_sub(self.last_activity.load(Ordering::Relaxed));
        idle > i64::try_from(timeout_secs).unwrap_or(i64::MAX)
    }

    #[must_use]
    pub fn is_expired(&self, timeout_secs: u64) -> bool {
        self.is_expired_at(Utc::now().timestamp(), timeout_secs)
    }

    pub async fn snapshot(&self) -> SessionState {
        self.slot.lock().await.state.clone()
    }

    /// Start a search, cancelling the previous search and any insight fetch
    pub async fn begin_search(&self, raw: &str) -> (SearchTicket, CancellationToken) {
        let mut slot = self.slot.lock().await;
        let (next, ticket) = slot.state.begin_search(raw);
        slot.state = next;
        let token = slot.install_search_token();
        (ticket, token)
    }

    /// Store a finished search unless it was superseded
    pub async fn complete_search(&self, ticket: SearchTicket, resolution: Resolution) -> Option<SessionState> {
        let mut slot = self.slot.lock().await;
        let next = slot.state.apply_resolution(ticket, resolution)?;
        slot.state = next.clone();
        Some(next)
    }

    /// Give up on a search that produced nothing to show
    pub async fn abandon_search(&self, ticket: SearchTicket) -> Option<SessionState> {
        let mut slot = self.slot.lock().await;
        let next = slot.state.abandon_search(ticket)?;
        slot.state = next.clone();
        Some(next)
    }

    /// Open the record at `index` and take ownership of its insight fetch
    pub async fn open_detail(&self, index: usize) -> Option<DetailClaim> {
        let mut slot = self.slot.lock().await;
        let (next, ticket) = slot.state.open_detail(index)?;
        let record = next.selected()?.clone();
        slot.state = next;
        let token = slot.install_detail_token();
        Some(DetailClaim { ticket, record, token })
    }

    /// Claim the insight fetch of a detail view opened by a search
    pub async fn claim_pending_detail(&self) -> Option<DetailClaim> {
        let mut slot = self.slot.lock().await;
        let ticket = slot.state.pending_detail()?;
        let record = slot.state.selected()?.clone();
        let token = slot.install_detail_token();
        Some(DetailClaim { ticket, record, token })
    }

    /// Store fetched insights unless the view has moved on
    pub async fn complete_detail(&self, ticket: DetailTicket, insight: Option<InsightReport>) -> Option<SessionState> {
        let mut slot = self.slot.lock().await;
        let next = slot.state.apply_insight(ticket, insight)?;
        slot.state = next.clone();
        Some(next)
    }

    pub async fn close_detail(&self) -> SessionState {
        let mut slot = self.slot.lock().await;
        cancel(slot.detail_token.take());
        let next = slot.state.close_detail();
        slot.state = next.clone();
        next
    }

    /// One support exchange; returns the reply and the full transcript
    pub async fn support_reply(&self, agent: &SupportAgent, message: &str) -> Result<(String, Vec<SupportMessage>)> {
        let mut conversation = self.support.lock().await;
        let reply = agent.reply(&mut conversation, message).await?;
        Ok((reply, conversation.transcript()))
    }
}

impl Default for PincodeSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session manager with automatic cleanup
pub struct SessionManager {
    sessions: Arc<DashMap<String, Arc<PincodeSession>>>,
    session_timeout: Duration,
}

impl SessionManager {
    /// Must be called inside a tokio runtime; spawns the cleanup task
    #[must_use]
    pub fn new(session_timeout_secs: u64) -> Self {
        let sessions = Arc::new(DashMap::new());

        let sessions_clone = Arc::clone(&sessions);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Self::cleanup_expired_sessions(&sessions_clone, session_timeout_secs);
            }
        });

        Self {
            sessions,
            session_timeout: Duration::from_secs(session_timeout_secs),
        }
    }

    #[must_use]
    pub const fn session_timeout(&self) -> Duration {
        self.session_timeout
    }

    #[must_use]
    pub fn create_session(&self) -> Arc<PincodeSession> {
        let session = Arc::new(PincodeSession::new());
        self.sessions
            .insert(session.session_id().to_string(), Arc::clone(&session));
        session
    }

    /// Look up a live session and mark it active
    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<Arc<PincodeSession>> {
        let session = self.sessions.get(session_id).map(|s| Arc::clone(s.value()))?;
        if session.is_expired(self.session_timeout.as_secs()) {
            self.sessions.remove(session_id);
            return None;
        }
        session.touch();
        Some(session)
    }

    /// Existing session for `session_id`, or a new one
    #[must_use]
    pub fn get_or_create(&self, session_id: Option<&str>) -> Arc<PincodeSession> {
        session_id
            .and_then(|id| self.get_session(id))
            .unwrap_or_else(|| self.create_session())
    }

    pub fn delete_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn cleanup_expired_sessions(sessions: &DashMap<String, Arc<PincodeSession>>, timeout_secs: u64) {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|entry| entry.value().is_expired(timeout_secs))
            .map(|entry| entry.key().clone())
            .collect();

        for session_id in expired {
            sessions.remove(&session_id);
            tracing::info!("Cleaned up expired session: {}", session_id);
        }
    }
}
