use notify_rust::{Hint, Notification};

use crate::domain::analysis::AnalysisReport;
use crate::domain::email::EmailSummary;

pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Self
    }

    /// Best effort: a notification that cannot be shown is logged and
    /// forgotten, never an error for the watcher loop.
    pub fn notify_phishing(&self, email: &EmailSummary, report: &AnalysisReport) {
        let summary = format!(
            "Phishing détecté ({}) — {}",
            report.confidence_score,
            email.sender_name()
        );
        let body = format!(
            "<{}>\n{}\n{}",
            email.sender_address(),
            email.subject,
            email.preview
        );

        let result = Notification::new()
            .summary(&summary)
            .body(&body)
            .icon("dialog-warning")
            .hint(Hint::Category("email".to_string()))
            .show();

        if let Err(e) = result {
            eprintln!("Notification error: {e}");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
