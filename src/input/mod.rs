pub mod thread;

use crate::error::AppResult;
use crate::render::AppState;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use std::sync::mpsc::{Receiver, TryRecvError};
use thread::InputMessage;

#[derive(Debug, Default)]
pub struct InputState {
    pub quit_requested: bool,
}

pub fn drain_input_events(
    app_state: &mut AppState,
    input_rx: &Receiver<InputMessage>,
) -> AppResult<bool> {
    loop {
        match input_rx.try_recv() {
            Ok(InputMessage::Event(event)) => {
                handle_input_event(app_state, event);
                if app_state.input_state.quit_requested {
                    return Ok(true);
                }
            }
            Ok(InputMessage::ReadError(err)) => {
                tracing::warn!(%err, "input thread stopped");
                return Err(format!("Input thread read failed: {err}").into());
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                return Err("Input channel disconnected".into());
            }
        }
    }

    Ok(app_state.input_state.quit_requested)
}

pub fn handle_input_event(app_state: &mut AppState, event: Event) {
    match event {
        Event::Key(key_event)
            if matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
        {
            match key_event.code {
                KeyCode::Esc => app_state.input_state.quit_requested = true,
                KeyCode::Tab => {
                    app_state.show_hud = !app_state.show_hud;
                    app_state.needs_clear = true;
                }
                KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => {
                    app_state.input_state.quit_requested = true;
                }
                _ => {}
            }
        }
        Event::Resize(_, _) => app_state.needs_clear = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DonutConfig;
    use crossterm::event::{KeyEvent, KeyEventState, KeyModifiers};
    use std::sync::mpsc;

    fn make_state() -> AppState {
        AppState::new(DonutConfig::default().build_driver().expect("defaults are valid"))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn quit_keys_request_quit() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            let mut app = make_state();
            handle_input_event(&mut app, key(code));
            assert!(app.input_state.quit_requested, "{code:?}");
        }
    }

    #[test]
    fn tab_toggles_hud_and_forces_a_clear() {
        let mut app = make_state();
        app.needs_clear = false;
        handle_input_event(&mut app, key(KeyCode::Tab));
        assert!(app.show_hud);
        assert!(app.needs_clear);
        handle_input_event(&mut app, key(KeyCode::Tab));
        assert!(!app.show_hud);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = make_state();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_input_event(&mut app, Event::Key(release));
        assert!(!app.input_state.quit_requested);
    }

    #[test]
    fn resize_schedules_a_clear() {
        let mut app = make_state();
        app.needs_clear = false;
        handle_input_event(&mut app, Event::Resize(100, 40));
        assert!(app.needs_clear);
    }

    #[test]
    fn drain_stops_at_quit() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputMessage::Event(key(KeyCode::Tab))).expect("send tab");
        tx.send(InputMessage::Event(key(KeyCode::Char('q')))).expect("send q");
        tx.send(InputMessage::Event(key(KeyCode::Tab))).expect("send tab");

        let mut app = make_state();
        let quit = drain_input_events(&mut app, &rx).expect("drain should succeed");
        assert!(quit);
        assert!(app.show_hud);
        assert!(matches!(rx.try_recv(), Ok(InputMessage::Event(_))));
    }

    #[test]
    fn drain_consumes_all_queued_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputMessage::Event(key(KeyCode::Tab))).expect("send tab");
        tx.send(InputMessage::Event(Event::Resize(10, 10))).expect("send resize");

        let mut app = make_state();
        let quit = drain_input_events(&mut app, &rx).expect("drain should succeed");
        assert!(!quit);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn read_errors_surface() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputMessage::ReadError("boom".to_string())).expect("send error");
        let mut app = make_state();
        assert!(drain_input_events(&mut app, &rx).is_err());
    }
}
