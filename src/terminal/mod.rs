pub mod events;
pub mod state;
pub mod ui;

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event};

use crate::api::ApiClient;
use crate::config::Config;
use crate::inbox::{Inbox, PollOutcome};
use crate::terminal::state::AppState;

pub fn run_tui(api: &ApiClient, inbox: &Inbox, cfg: &Config) -> Result<()> {
    let mut state = AppState::new(cfg.dashboard_period_days());

    if let Err(e) = inbox.load_initial(api) {
        // the view stays usable; polling will retry the list on its own
        state.status_line = Some(format!("Erreur: {e}"));
    }
    state.refresh_items(inbox);

    let terminal = ratatui::init();
    let result = run(
        terminal,
        &mut state,
        inbox,
        api,
        Duration::from_secs(cfg.poll_interval_secs()),
    );
    ratatui::restore();

    // teardown: stop any pending background analysis with the view
    inbox.cancel();

    result
}

fn run(
    mut terminal: DefaultTerminal,
    state: &mut AppState,
    inbox: &Inbox,
    api: &ApiClient,
    poll_interval: Duration,
) -> Result<()> {
    let mut last_poll = Instant::now();

    loop {
        state.refresh_items(inbox);
        terminal.draw(|f| ui::render(f, state))?;

        // short timeout so background work keeps progressing between keys
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()?
                && events::handle_key(key, state, inbox, api)?
            {
                break;
            }
            continue;
        }

        // tick: at most one analysis request per frame
        inbox.analyze_next(api);

        if last_poll.elapsed() >= poll_interval {
            last_poll = Instant::now();
            match inbox.poll(api) {
                Ok(PollOutcome::Discovered(n)) => {
                    state.status_line = Some(format!("{n} nouvel(aux) email(s)"));
                }
                Ok(_) => {}
                Err(e) => {
                    // transient network blips must not disturb the view
                    log::error!("poll failed: {e}");
                }
            }
        }
    }

    Ok(())
}
