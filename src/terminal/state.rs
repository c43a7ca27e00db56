use std::collections::HashMap;

use ratatui::widgets::ListState;

use crate::api::Backend;
use crate::domain::dashboard::DashboardSummary;
use crate::domain::email::{EmailId, EmailSummary};
use crate::inbox::{AnalysisEntry, Inbox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Inbox,
    Dashboard,
}

/// Sections of the analysis detail panel (the modal tabs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Heuristic = 0,
    UrlMl = 1,
    Llm = 2,
    Osint = 3,
}

impl DetailTab {
    pub const TITLES: [&'static str; 4] = ["Heuristique", "URL (ML)", "LLM", "OSINT"];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        match self {
            DetailTab::Heuristic => DetailTab::UrlMl,
            DetailTab::UrlMl => DetailTab::Llm,
            DetailTab::Llm => DetailTab::Osint,
            DetailTab::Osint => DetailTab::Heuristic,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailTab::Heuristic => DetailTab::Osint,
            DetailTab::UrlMl => DetailTab::Heuristic,
            DetailTab::Llm => DetailTab::UrlMl,
            DetailTab::Osint => DetailTab::Llm,
        }
    }
}

pub struct AppState {
    pub route: Route,

    /// Render snapshots, refreshed from the inbox every frame.
    pub items: Vec<EmailSummary>,
    pub entries: HashMap<EmailId, AnalysisEntry>,
    pub list_state: ListState,

    /// The email opened in the detail panel, with its cached analysis.
    pub opened_id: Option<EmailId>,
    pub opened_entry: Option<AnalysisEntry>,
    pub detail_tab: DetailTab,

    pub dashboard: Option<DashboardSummary>,
    pub dashboard_period_days: u32,

    /// One-line footer message (poll results, errors).
    pub status_line: Option<String>,
}

impl AppState {
    pub fn new(dashboard_period_days: u32) -> Self {
        let mut s = Self {
            route: Route::Inbox,
            items: vec![],
            entries: HashMap::new(),
            list_state: ListState::default(),
            opened_id: None,
            opened_entry: None,
            detail_tab: DetailTab::Heuristic,
            dashboard: None,
            dashboard_period_days,
            status_line: None,
        };
        s.list_state.select(Some(0));
        s
    }

    /// Pull fresh snapshots out of the inbox, keeping the selection glued
    /// to the same email id when the list shifts under it.
    pub fn refresh_items(&mut self, inbox: &Inbox) {
        let selected_id = self.current_selected_id();
        self.items = inbox.emails();
        self.entries = inbox.analyses();

        if self.items.is_empty() {
            self.list_state.select(None);
            return;
        }
        let pos = selected_id
            .and_then(|id| self.items.iter().position(|e| e.id == id))
            .unwrap_or(0);
        self.list_state.select(Some(pos));
    }

    pub fn current_selected_id(&self) -> Option<EmailId> {
        let idx = self.list_state.selected()?;
        self.items.get(idx).map(|e| e.id.clone())
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.items.is_empty() {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let len = self.items.len() as i32;
        let next = (cur + delta).clamp(0, len - 1) as usize;
        self.list_state.select(Some(next));
    }

    /// Open the detail panel for the selected email. Waits for the
    /// analysis if there is no cache slot yet (on-demand path); a cached
    /// entry, failed included, is shown as-is.
    pub fn open_selected(&mut self, inbox: &Inbox, backend: &dyn Backend) {
        let Some(id) = self.current_selected_id() else {
            return;
        };
        let entry = inbox.analyze_one(backend, &id);
        self.opened_id = Some(id);
        self.opened_entry = Some(entry);
        self.detail_tab = DetailTab::Heuristic;
    }

    pub fn close_detail(&mut self) {
        self.opened_id = None;
        self.opened_entry = None;
        self.detail_tab = DetailTab::Heuristic;
    }

    pub fn detail_open(&self) -> bool {
        self.opened_id.is_some()
    }

    pub fn opened_email(&self) -> Option<&EmailSummary> {
        let id = self.opened_id.as_ref()?;
        self.items.iter().find(|e| &e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::analysis::AnalysisReport;

    struct StaticBackend;

    impl Backend for StaticBackend {
        fn fetch_emails(&self) -> Result<Vec<EmailSummary>, ApiError> {
            Ok(vec![
                EmailSummary {
                    id: "1".into(),
                    sender: "a@x.com".into(),
                    subject: "S1".into(),
                    preview: "P1".into(),
                    timestamp: "t1".into(),
                    is_analyzing: false,
                },
                EmailSummary {
                    id: "2".into(),
                    sender: "b@x.com".into(),
                    subject: "S2".into(),
                    preview: "P2".into(),
                    timestamp: "t2".into(),
                    is_analyzing: false,
                },
            ])
        }

        fn analyze_email(&self, id: &EmailId) -> Result<AnalysisReport, ApiError> {
            Ok(AnalysisReport {
                id_email: Some(id.clone()),
                phishgard_verdict: "Suspicious".into(),
                confidence_score: "67%".into(),
                final_score_internal: -10.0,
                summary: String::new(),
                breakdown: Default::default(),
            })
        }
    }

    #[test]
    fn selection_follows_id_when_new_emails_are_prepended() {
        let inbox = Inbox::new();
        inbox.load_initial(&StaticBackend).unwrap();

        let mut state = AppState::new(7);
        state.refresh_items(&inbox);
        state.move_selection(1);
        assert_eq!(state.current_selected_id(), Some("2".to_string()));

        // simulate a poll prepending a new email: positions shift by one
        struct Grown;
        impl Backend for Grown {
            fn fetch_emails(&self) -> Result<Vec<EmailSummary>, ApiError> {
                let mut v = StaticBackend.fetch_emails()?;
                v.insert(
                    0,
                    EmailSummary {
                        id: "3".into(),
                        sender: "c@x.com".into(),
                        subject: "S3".into(),
                        preview: "P3".into(),
                        timestamp: "t3".into(),
                        is_analyzing: false,
                    },
                );
                Ok(v)
            }
            fn analyze_email(&self, id: &EmailId) -> Result<AnalysisReport, ApiError> {
                StaticBackend.analyze_email(id)
            }
        }
        inbox.poll(&Grown).unwrap();
        state.refresh_items(&inbox);

        assert_eq!(state.current_selected_id(), Some("2".to_string()));
        assert_eq!(state.list_state.selected(), Some(2));
    }

    #[test]
    fn open_selected_populates_the_detail_panel() {
        let inbox = Inbox::new();
        inbox.load_initial(&StaticBackend).unwrap();

        let mut state = AppState::new(7);
        state.refresh_items(&inbox);
        state.open_selected(&inbox, &StaticBackend);

        assert!(state.detail_open());
        let entry = state.opened_entry.as_ref().unwrap();
        assert_eq!(entry.verdict_label(), "Suspicious");

        state.close_detail();
        assert!(!state.detail_open());
        assert_eq!(state.detail_tab, DetailTab::Heuristic);
    }

    #[test]
    fn detail_tabs_cycle_both_ways() {
        assert_eq!(DetailTab::Heuristic.next(), DetailTab::UrlMl);
        assert_eq!(DetailTab::Osint.next(), DetailTab::Heuristic);
        assert_eq!(DetailTab::Heuristic.prev(), DetailTab::Osint);
    }
}
