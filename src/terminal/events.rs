use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::api::ApiClient;
use crate::inbox::{Inbox, PollOutcome};
use crate::terminal::state::{AppState, Route};

pub fn handle_key(
    key: KeyEvent,
    state: &mut AppState,
    inbox: &Inbox,
    api: &ApiClient,
) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),

        KeyCode::Esc => {
            if state.detail_open() {
                state.close_detail();
                return Ok(false);
            }
            return Ok(true);
        }

        KeyCode::Char('1') => {
            state.route = Route::Inbox;
            return Ok(false);
        }

        KeyCode::Char('2') => {
            state.route = Route::Dashboard;
            if state.dashboard.is_none() {
                load_dashboard(state, api);
            }
            return Ok(false);
        }

        _ => {}
    }

    match state.route {
        Route::Inbox => handle_inbox_keys(key, state, inbox, api),
        Route::Dashboard => handle_dashboard_keys(key, state, api),
    }
}

fn handle_inbox_keys(
    key: KeyEvent,
    state: &mut AppState,
    inbox: &Inbox,
    api: &ApiClient,
) -> Result<bool> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Home => state.list_state.select(Some(0)),
        KeyCode::End => {
            if !state.items.is_empty() {
                state.list_state.select(Some(state.items.len() - 1));
            }
        }

        KeyCode::Enter => state.open_selected(inbox, api),

        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            if state.detail_open() {
                state.detail_tab = state.detail_tab.next();
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if state.detail_open() {
                state.detail_tab = state.detail_tab.prev();
            }
        }

        // manual refresh, same path as the periodic tick
        KeyCode::Char('r') => match inbox.poll(api) {
            Ok(PollOutcome::Discovered(n)) => {
                state.status_line = Some(format!("{n} nouvel(aux) email(s)"));
            }
            Ok(PollOutcome::NoChange) => {
                state.status_line = Some("Aucun nouvel email".to_string());
            }
            Ok(PollOutcome::Skipped) => {}
            Err(e) => {
                log::error!("manual poll failed: {e}");
                state.status_line = Some(format!("Erreur: {e}"));
            }
        },

        _ => {}
    }
    Ok(false)
}

fn handle_dashboard_keys(key: KeyEvent, state: &mut AppState, api: &ApiClient) -> Result<bool> {
    match key.code {
        KeyCode::Char('w') => {
            state.dashboard_period_days = 7;
            load_dashboard(state, api);
        }
        KeyCode::Char('m') => {
            state.dashboard_period_days = 30;
            load_dashboard(state, api);
        }
        KeyCode::Char('d') => {
            state.dashboard_period_days = 1;
            load_dashboard(state, api);
        }
        KeyCode::Char('r') => load_dashboard(state, api),
        _ => {}
    }
    Ok(false)
}

fn load_dashboard(state: &mut AppState, api: &ApiClient) {
    match api.dashboard_summary(state.dashboard_period_days) {
        Ok(data) => {
            state.dashboard = Some(data);
            state.status_line = None;
        }
        Err(e) => {
            log::error!("dashboard fetch failed: {e}");
            state.status_line = Some(format!("Erreur tableau de bord: {e}"));
        }
    }
}
