//! Client-side synchronization core: the known email list, the per-session
//! analysis cache, and the operations that keep both in step with the
//! backend (initial load, periodic poll, sequential analysis).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::{ApiError, Backend};
use crate::domain::analysis::AnalysisReport;
use crate::domain::email::{EmailId, EmailSummary};

/// Verdict shown for an email whose analysis request failed.
pub const ANALYSIS_ERROR_VERDICT: &str = "Erreur d'analyse";

/// Cache slot for one email. Either outcome is terminal for the session:
/// once a slot exists the email is never re-analyzed.
#[derive(Debug, Clone)]
pub enum AnalysisEntry {
    Report(AnalysisReport),
    Failed(String),
}

impl AnalysisEntry {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisEntry::Report(r) => Some(r),
            AnalysisEntry::Failed(_) => None,
        }
    }

    pub fn verdict_label(&self) -> &str {
        match self {
            AnalysisEntry::Report(r) => &r.phishgard_verdict,
            AnalysisEntry::Failed(_) => ANALYSIS_ERROR_VERDICT,
        }
    }

    pub fn confidence_label(&self) -> &str {
        match self {
            AnalysisEntry::Report(r) => &r.confidence_score,
            AnalysisEntry::Failed(_) => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A poll cycle was already running; this call did nothing.
    Skipped,
    NoChange,
    /// `n` previously unseen emails were prepended to the list.
    Discovered(usize),
}

/// Releases the poll guard on every exit path, error or not.
struct PollGuard<'a>(&'a AtomicBool);

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// All session state for one inbox view. Built by the caller and passed
/// around explicitly; nothing here is global. Everything is discarded when
/// the value is dropped — there is no persistence.
pub struct Inbox {
    emails: Mutex<Vec<EmailSummary>>,
    cache: Mutex<HashMap<EmailId, AnalysisEntry>>,
    polling: AtomicBool,
    cancelled: AtomicBool,
}

impl Inbox {
    pub fn new() -> Self {
        Self {
            emails: Mutex::new(Vec::new()),
            cache: Mutex::new(HashMap::new()),
            polling: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current list, newest first.
    pub fn emails(&self) -> Vec<EmailSummary> {
        self.emails.lock().unwrap().clone()
    }

    pub fn analysis_for(&self, id: &EmailId) -> Option<AnalysisEntry> {
        self.cache.lock().unwrap().get(id).cloned()
    }

    /// Snapshot of the whole cache, for list rendering.
    pub fn analyses(&self) -> HashMap<EmailId, AnalysisEntry> {
        self.cache.lock().unwrap().clone()
    }

    /// Stops any in-progress `analyze_all` pass at the next email boundary.
    /// Called on view teardown.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Fetch the full list and replace local state with it. On error the
    /// list is left untouched (empty on first call) and the caller surfaces
    /// the message.
    pub fn load_initial(&self, backend: &dyn Backend) -> Result<usize, ApiError> {
        let fetched = backend.fetch_emails()?;
        let n = fetched.len();
        *self.emails.lock().unwrap() = fetched;
        Ok(n)
    }

    /// One poll cycle: fetch the remote list and prepend anything unseen.
    /// The guard makes overlapping cycles impossible; a call arriving while
    /// another is in flight returns `Skipped`.
    pub fn poll(&self, backend: &dyn Backend) -> Result<PollOutcome, ApiError> {
        if self
            .polling
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Ok(PollOutcome::Skipped);
        }
        let _guard = PollGuard(&self.polling);

        let remote = backend.fetch_emails()?;

        let known: HashSet<EmailId> = {
            let emails = self.emails.lock().unwrap();
            emails.iter().map(|e| e.id.clone()).collect()
        };

        let mut seen = known;
        let newly_found: Vec<EmailSummary> = remote
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();

        if newly_found.is_empty() {
            return Ok(PollOutcome::NoChange);
        }

        let n = newly_found.len();
        // prepend, keeping remote order for the new items and relative
        // order for everything already known
        self.emails.lock().unwrap().splice(0..0, newly_found);
        Ok(PollOutcome::Discovered(n))
    }

    /// Analyze every email that has no cache slot yet, one request at a
    /// time. A failed request stores the error sentinel and the loop moves
    /// on. Returns how many emails were analyzed in this pass.
    pub fn analyze_all(&self, backend: &dyn Backend) -> usize {
        let mut analyzed = 0;
        while self.analyze_next(backend) {
            analyzed += 1;
        }
        analyzed
    }

    /// Analyze the first email (list order) without a cache slot. The TUI
    /// tick calls this so one request never blocks more than one frame.
    /// Returns false when nothing is pending or the inbox was cancelled.
    pub fn analyze_next(&self, backend: &dyn Backend) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return false;
        }
        let next_id: Option<EmailId> = {
            let emails = self.emails.lock().unwrap();
            let cache = self.cache.lock().unwrap();
            emails
                .iter()
                .find(|e| !cache.contains_key(&e.id))
                .map(|e| e.id.clone())
        };
        match next_id {
            Some(id) => {
                self.analyze_and_store(backend, &id);
                true
            }
            None => false,
        }
    }

    /// On-demand analysis for one email (detail view). A cache hit —
    /// including a failed one — is returned as-is; there is no retry
    /// within a session.
    pub fn analyze_one(&self, backend: &dyn Backend, id: &EmailId) -> AnalysisEntry {
        if let Some(entry) = self.analysis_for(id) {
            return entry;
        }
        self.analyze_and_store(backend, id)
    }

    fn analyze_and_store(&self, backend: &dyn Backend, id: &EmailId) -> AnalysisEntry {
        self.set_analyzing(id, true);
        let entry = match backend.analyze_email(id) {
            Ok(report) => AnalysisEntry::Report(report),
            Err(e) => {
                log::error!("analysis failed for email {id}: {e}");
                AnalysisEntry::Failed(e.to_string())
            }
        };
        self.cache.lock().unwrap().insert(id.clone(), entry.clone());
        self.set_analyzing(id, false);
        entry
    }

    fn set_analyzing(&self, id: &EmailId, value: bool) {
        let mut emails = self.emails.lock().unwrap();
        if let Some(email) = emails.iter_mut().find(|e| &e.id == id) {
            email.is_analyzing = value;
        }
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::mpsc;
    use std::thread;

    fn email(id: &str) -> EmailSummary {
        EmailSummary {
            id: id.into(),
            sender: format!("{id}@x.com"),
            subject: format!("S{id}"),
            preview: format!("P{id}"),
            timestamp: "t".into(),
            is_analyzing: false,
        }
    }

    fn report(id: &str) -> AnalysisReport {
        AnalysisReport {
            id_email: Some(id.into()),
            phishgard_verdict: "Phishing".into(),
            confidence_score: "92%".into(),
            final_score_internal: -92.0,
            summary: String::new(),
            breakdown: Default::default(),
        }
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            detail: "Une erreur interne est survenue".into(),
        }
    }

    /// Scripted backend: each `fetch_emails` pops the next list, every
    /// call is recorded, ids in `fail_ids` reject their analysis.
    struct MockBackend {
        lists: Mutex<VecDeque<Vec<EmailSummary>>>,
        fail_ids: Vec<EmailId>,
        calls: Mutex<Vec<String>>,
    }

    impl MockBackend {
        fn new(lists: Vec<Vec<EmailSummary>>) -> Self {
            Self {
                lists: Mutex::new(lists.into()),
                fail_ids: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(lists: Vec<Vec<EmailSummary>>, fail_ids: &[&str]) -> Self {
            let mut m = Self::new(lists);
            m.fail_ids = fail_ids.iter().map(|s| s.to_string()).collect();
            m
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Backend for MockBackend {
        fn fetch_emails(&self) -> Result<Vec<EmailSummary>, ApiError> {
            self.calls.lock().unwrap().push("fetch".into());
            self.lists
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(server_error)
        }

        fn analyze_email(&self, id: &EmailId) -> Result<AnalysisReport, ApiError> {
            self.calls.lock().unwrap().push(format!("analyze:{id}"));
            if self.fail_ids.contains(id) {
                Err(server_error())
            } else {
                Ok(report(id))
            }
        }
    }

    /// `fetch_emails` signals entry and then blocks until released, so a
    /// test can hold a poll cycle open at its suspension point.
    struct BlockingBackend {
        entered: mpsc::Sender<()>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl Backend for BlockingBackend {
        fn fetch_emails(&self) -> Result<Vec<EmailSummary>, ApiError> {
            self.entered.send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(vec![])
        }

        fn analyze_email(&self, _id: &EmailId) -> Result<AnalysisReport, ApiError> {
            unreachable!("poll never analyzes")
        }
    }

    #[test]
    fn analyze_all_fills_cache_for_every_email() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![vec![email("a"), email("b"), email("c")]]);
        inbox.load_initial(&backend).unwrap();

        let analyzed = inbox.analyze_all(&backend);

        assert_eq!(analyzed, 3);
        for id in ["a", "b", "c"] {
            assert!(inbox.analysis_for(&id.to_string()).is_some());
        }
        // nobody is left marked in-flight
        assert!(inbox.emails().iter().all(|e| !e.is_analyzing));
    }

    #[test]
    fn analyze_all_is_sequential_and_ordered() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![vec![email("a"), email("b"), email("c")]]);
        inbox.load_initial(&backend).unwrap();
        inbox.analyze_all(&backend);

        assert_eq!(
            backend.calls(),
            vec!["fetch", "analyze:a", "analyze:b", "analyze:c"]
        );
    }

    #[test]
    fn one_failure_does_not_stop_the_pass() {
        let inbox = Inbox::new();
        let backend = MockBackend::failing(
            vec![vec![email("a"), email("b"), email("c")]],
            &["b"],
        );
        inbox.load_initial(&backend).unwrap();
        inbox.analyze_all(&backend);

        let b = inbox.analysis_for(&"b".to_string()).unwrap();
        assert!(matches!(b, AnalysisEntry::Failed(_)));
        assert_eq!(b.verdict_label(), ANALYSIS_ERROR_VERDICT);
        assert!(inbox.analysis_for(&"c".to_string()).unwrap().report().is_some());
    }

    #[test]
    fn failed_entry_is_terminal_for_the_session() {
        let inbox = Inbox::new();
        let backend =
            MockBackend::failing(vec![vec![email("a")]], &["a"]);
        inbox.load_initial(&backend).unwrap();
        inbox.analyze_all(&backend);

        // a re-click must return the sentinel without a second request
        let entry = inbox.analyze_one(&backend, &"a".to_string());
        assert!(matches!(entry, AnalysisEntry::Failed(_)));
        assert_eq!(backend.calls(), vec!["fetch", "analyze:a"]);
    }

    #[test]
    fn poll_prepends_only_unseen_emails() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![
            vec![email("1"), email("2")],
            vec![email("3"), email("1"), email("2")],
        ]);
        inbox.load_initial(&backend).unwrap();

        let outcome = inbox.poll(&backend).unwrap();

        assert_eq!(outcome, PollOutcome::Discovered(1));
        let ids: Vec<_> = inbox.emails().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn poll_with_identical_remote_list_is_no_change() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![
            vec![email("1"), email("2")],
            vec![email("1"), email("2")],
        ]);
        inbox.load_initial(&backend).unwrap();
        assert_eq!(inbox.poll(&backend).unwrap(), PollOutcome::NoChange);
        assert_eq!(inbox.emails().len(), 2);
    }

    #[test]
    fn overlapping_poll_is_rejected_then_allowed_again() {
        let inbox = Inbox::new();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let blocking = BlockingBackend {
            entered: entered_tx,
            release: Mutex::new(release_rx),
        };

        thread::scope(|s| {
            let first = s.spawn(|| inbox.poll(&blocking));

            // wait until the first cycle sits inside its fetch
            entered_rx.recv().unwrap();
            assert_eq!(inbox.poll(&blocking).unwrap(), PollOutcome::Skipped);

            release_tx.send(()).unwrap();
            assert_eq!(first.join().unwrap().unwrap(), PollOutcome::NoChange);
        });

        // guard is clear again: the next cycle runs
        let backend = MockBackend::new(vec![vec![email("1")]]);
        assert_eq!(inbox.poll(&backend).unwrap(), PollOutcome::Discovered(1));
    }

    #[test]
    fn poll_error_releases_the_guard() {
        let inbox = Inbox::new();
        let failing = MockBackend::new(vec![]); // first fetch already errors
        assert!(inbox.poll(&failing).is_err());

        let backend = MockBackend::new(vec![vec![email("1")]]);
        assert_eq!(inbox.poll(&backend).unwrap(), PollOutcome::Discovered(1));
    }

    #[test]
    fn analyze_next_works_through_the_list_in_order() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![vec![email("a"), email("b")]]);
        inbox.load_initial(&backend).unwrap();

        assert!(inbox.analyze_next(&backend));
        assert!(inbox.analysis_for(&"a".to_string()).is_some());
        assert!(inbox.analysis_for(&"b".to_string()).is_none());

        assert!(inbox.analyze_next(&backend));
        assert!(!inbox.analyze_next(&backend));
        assert_eq!(backend.calls(), vec!["fetch", "analyze:a", "analyze:b"]);
    }

    #[test]
    fn cancel_stops_analysis_between_emails() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![vec![email("a"), email("b")]]);
        inbox.load_initial(&backend).unwrap();
        inbox.cancel();
        assert_eq!(inbox.analyze_all(&backend), 0);
    }

    #[test]
    fn initial_load_then_analysis_caches_the_verdict() {
        let inbox = Inbox::new();
        let backend = MockBackend::new(vec![vec![email("e1")]]);

        inbox.load_initial(&backend).unwrap();
        inbox.analyze_all(&backend);

        let entry = inbox.analysis_for(&"e1".to_string()).unwrap();
        let report = entry.report().unwrap();
        assert_eq!(report.phishgard_verdict, "Phishing");
        assert_eq!(report.confidence_score, "92%");
    }
}
