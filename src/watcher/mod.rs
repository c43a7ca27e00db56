pub mod notifier;

use anyhow::Result;
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use crate::api::Backend;
use crate::domain::analysis::Verdict;
use crate::inbox::{AnalysisEntry, Inbox, PollOutcome};
use crate::watcher::notifier::Notifier;

pub struct WatcherConfig {
    pub interval_secs: u64,
}

/// Headless mode: poll for new emails, analyze them sequentially, raise a
/// desktop notification for each new Phishing verdict. Runs until ctrl-c.
pub fn run_watcher(inbox: &Inbox, backend: &dyn Backend, cfg: WatcherConfig) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    let notifier = Notifier::new();

    match inbox.load_initial(backend) {
        Ok(n) => log::info!("initial load: {n} emails"),
        Err(e) => eprintln!("Initial load failed: {e}"),
    }
    inbox.analyze_all(backend);

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_secs(cfg.interval_secs));
        if !running.load(Ordering::SeqCst) {
            break;
        }

        match inbox.poll(backend) {
            Ok(PollOutcome::Discovered(n)) => {
                log::info!("poll: {n} new email(s)");
                inbox.analyze_all(backend);

                // new arrivals sit at the front of the list, remote order
                for email in inbox.emails().into_iter().take(n) {
                    let Some(entry) = inbox.analysis_for(&email.id) else {
                        continue;
                    };
                    if let AnalysisEntry::Report(report) = &entry
                        && report.verdict() == Verdict::Phishing
                    {
                        notifier.notify_phishing(&email, report);
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                // transient blips must not kill the loop
                eprintln!("Poll error: {e}");
            }
        }
    }

    inbox.cancel();
    Ok(())
}
