//! Search and detail-view state as explicit snapshots
//!
//! Every transition borrows the current snapshot and returns a new one.
//! Asynchronous work is tagged with a ticket taken when it starts; a result
//! whose ticket has been superseded is dropped instead of overwriting newer
//! state.

use serde::Deserialize;
use serde::Serialize;

use crate::catalog;
use crate::models::InsightReport;
use crate::models::NormalizedQuery;
use crate::models::PostalRecord;
use crate::models::Resolution;
use crate::models::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Results,
    Detail,
}

/// Issued by [`SessionState::begin_search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }
}

/// Issued whenever a detail view opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket(u64);

impl DetailTicket {
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }
}

/// The open detail view and its lazily fetched insights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailState {
    pub record: PostalRecord,
    pub insight: Option<InsightReport>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub view: View,
    /// Raw text of the most recent search
    pub last_search: Option<String>,
    /// How that search was interpreted, once resolved
    pub query: Option<NormalizedQuery>,
    pub results: ResultSet,
    pub searching: bool,
    pub detail: Option<DetailState>,
    search_seq: u64,
    detail_seq: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh session showing the sample head offices
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: View::Results,
            last_search: None,
            query: None,
            results: ResultSet::new(catalog::sample_records(), None),
            searching: false,
            detail: None,
            search_seq: 0,
            detail_seq: 0,
        }
    }

    #[must_use]
    pub const fn search_seq(&self) -> u64 {
        self.search_seq
    }

    #[must_use]
    pub const fn detail_seq(&self) -> u64 {
        self.detail_seq
    }

    /// Start a search. Supersedes any search or insight fetch in flight.
    #[must_use]
    pub fn begin_search(&self, raw: &str) -> (Self, SearchTicket) {
        let mut next = self.close_detail();
        next.search_seq += 1;
        next.searching = true;
        next.last_search = Some(raw.trim().to_string());
        let ticket = SearchTicket(next.search_seq);
        (next, ticket)
    }

    /// Whether `ticket` still belongs to the latest search
    #[must_use]
    pub const fn is_current_search(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.search_seq
    }

    /// Apply a finished search. `None` when a newer search has started.
    ///
    /// A singleton result opens its detail view; use
    /// [`SessionState::pending_detail`] to get the ticket for its insights.
    #[must_use]
    pub fn apply_resolution(&self, ticket: SearchTicket, resolution: Resolution) -> Option<Self> {
        if !self.is_current_search(ticket) {
            return None;
        }

        let mut next = self.clone();
        next.searching = false;
        next.query = Some(resolution.query);
        next.results = resolution.results;

        if let Some(record) = resolution.auto_open {
            next = next.open_record(record).0;
        }
        Some(next)
    }

    /// End a search that produced nothing to show, keeping the current
    /// results. `None` when a newer search has started.
    #[must_use]
    pub fn abandon_search(&self, ticket: SearchTicket) -> Option<Self> {
        if !self.is_current_search(ticket) {
            return None;
        }
        let mut next = self.clone();
        next.searching = false;
        Some(next)
    }

    /// Open the detail view for the record at `index` of the current results
    #[must_use]
    pub fn open_detail(&self, index: usize) -> Option<(Self, DetailTicket)> {
        let record = self.results.records.get(index)?.clone();
        Some(self.open_record(record))
    }

    /// Open the detail view for any record
    #[must_use]
    pub fn open_record(&self, record: PostalRecord) -> (Self, DetailTicket) {
        let mut next = self.clone();
        next.detail_seq += 1;
        next.view = View::Detail;
        next.detail = Some(DetailState {
            record,
            insight: None,
            loading: true,
        });
        let ticket = DetailTicket(next.detail_seq);
        (next, ticket)
    }

    /// Ticket of a detail view still waiting for insights
    #[must_use]
    pub fn pending_detail(&self) -> Option<DetailTicket> {
        self.detail
            .as_ref()
            .filter(|detail| detail.loading)
            .map(|_| DetailTicket(self.detail_seq))
    }

    #[must_use]
    pub fn is_current_detail(&self, ticket: DetailTicket) -> bool {
        self.detail.is_some() && ticket.0 == self.detail_seq
    }

    /// Attach fetched insights. `None` when the view closed or switched records.
    #[must_use]
    pub fn apply_insight(&self, ticket: DetailTicket, insight: Option<InsightReport>) -> Option<Self> {
        if !self.is_current_detail(ticket) {
            return None;
        }
        let mut next = self.clone();
        if let Some(detail) = next.detail.as_mut() {
            detail.insight = insight;
            detail.loading = false;
        }
        Some(next)
    }

    /// Close the detail view and discard its insights
    #[must_use]
    pub fn close_detail(&self) -> Self {
        let mut next = self.clone();
        if next.detail.take().is_some() {
            next.detail_seq += 1;
        }
        next.view = View::Results;
        next
    }

    /// The record shown in the detail view, if any
    #[must_use]
    pub fn selected(&self) -> Option<&PostalRecord> {
        self.detail.as_ref().map(|detail| &detail.record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::LocalityInsight;
    use crate::models::QueryMode;

    fn record(pincode: &str, name: &str) -> PostalRecord {
        PostalRecord {
            pincode: pincode.to_string(),
            office_name: name.to_string(),
            office_type: "S.O".to_string(),
            delivery_status: "Delivery".to_string(),
            division_name: String::new(),
            region_name: String::new(),
            circle_name: String::new(),
            district: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            block: String::new(),
        }
    }

    fn resolution(records: Vec<PostalRecord>) -> Resolution {
        Resolution::new(
            NormalizedQuery::passthrough("500016", QueryMode::Pincode),
            ResultSet::new(records, None),
        )
    }

    fn report() -> InsightReport {
        InsightReport {
            insights: LocalityInsight {
                summary: "Busy".to_string(),
                key_places: vec![],
                connectivity: "Metro".to_string(),
                popular_for: vec![],
                hospitals: vec![],
                schools: vec![],
            },
            sources: vec![],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_session_shows_samples() {
        let state = SessionState::new();
        assert_eq!(state.view, View::Results);
        assert_eq!(state.results.len(), 6);
        assert!(state.detail.is_none());
        assert_eq!(state.search_seq(), 0);
    }

    #[test]
    fn test_search_applies_results() {
        let (state, ticket) = SessionState::new().begin_search(" 500016 ");
        assert!(state.searching);
        assert_eq!(state.last_search.as_deref(), Some("500016"));

        let state = state
            .apply_resolution(ticket, resolution(vec![record("500016", "A"), record("500016", "B")]))
            .unwrap();
        assert!(!state.searching);
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.view, View::Results);
        assert!(state.pending_detail().is_none());
    }

    #[test]
    fn test_tickets_follow_sequence() {
        let (state, first) = SessionState::new().begin_search("Ameerpet");
        assert_eq!(first.seq(), 1);
        assert_eq!(state.search_seq(), 1);
        assert!(state.is_current_search(first));

        let (state, second) = state.begin_search("110001");
        assert_eq!(second.seq(), 2);
        assert!(!state.is_current_search(first));

        let (state, detail) = state.open_detail(0).unwrap();
        assert_eq!(detail.seq(), state.detail_seq());
        assert!(state.is_current_detail(detail));
    }

    #[test]
    fn test_stale_search_is_discarded() {
        let (state, first) = SessionState::new().begin_search("Ameerpet");
        let (state, second) = state.begin_search("Connaught Place");

        assert!(state.apply_resolution(first, resolution(vec![])).is_none());
        let state = state
            .apply_resolution(second, resolution(vec![record("110001", "Connaught Place")]))
            .unwrap();
        assert_eq!(state.results.records[0].pincode, "110001");
    }

    #[test]
    fn test_singleton_opens_detail_once() {
        let (state, ticket) = SessionState::new().begin_search("500016");
        let state = state
            .apply_resolution(ticket, resolution(vec![record("500016", "Ameerpet")]))
            .unwrap();
        assert_eq!(state.view, View::Detail);
        assert_eq!(state.selected().unwrap().office_name, "Ameerpet");

        let detail = state.pending_detail().unwrap();
        let state = state.apply_insight(detail, Some(report())).unwrap();
        assert!(state.pending_detail().is_none());
        assert!(state.detail.as_ref().unwrap().insight.is_some());
    }

    #[test]
    fn test_switching_records_discards_first_insight() {
        let state = SessionState::new();
        let (state, first) = state.open_detail(0).unwrap();
        let (state, second) = state.open_detail(1).unwrap();

        assert!(state.apply_insight(first, Some(report())).is_none());
        let state = state.apply_insight(second, None).unwrap();
        let detail = state.detail.unwrap();
        assert_eq!(detail.record.pincode, "400001");
        assert!(!detail.loading);
        assert!(detail.insight.is_none());
    }

    #[test]
    fn test_close_discards_in_flight_insight() {
        let (state, ticket) = SessionState::new().open_detail(2).unwrap();
        let state = state.close_detail();
        assert_eq!(state.view, View::Results);
        assert!(state.apply_insight(ticket, Some(report())).is_none());
    }

    #[test]
    fn test_abandoned_search_keeps_results() {
        let (state, ticket) = SessionState::new().begin_search("17.43,78.44");
        let state = state.abandon_search(ticket).unwrap();
        assert!(!state.searching);
        assert_eq!(state.results.len(), 6);
        assert!(state.abandon_search(ticket).is_some());

        let (state, _) = state.begin_search("Ameerpet");
        assert!(state.abandon_search(ticket).is_none());
    }

    #[test]
    fn test_open_detail_out_of_range() {
        assert!(SessionState::new().open_detail(99).is_none());
    }

    #[test]
    fn test_new_search_closes_detail() {
        let (state, detail) = SessionState::new().open_detail(0).unwrap();
        let (state, _) = state.begin_search("Ameerpet");
        assert!(state.detail.is_none());
        assert!(state.apply_insight(detail, None).is_none());
    }
}
