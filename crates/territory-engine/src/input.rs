//! Keyboard input task.
//!
//! Crossterm's event API is blocking, so the poller runs on tokio's blocking
//! pool and forwards mapped events into the unbounded channel drained by the
//! simulation loop. It never touches simulation state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use territory_types::{Direction, InputEvent};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long one poll waits before re-checking the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn the poller. It exits after forwarding a terminate event, when
/// `stop` is set, or when the receiver is gone.
pub fn spawn_input_task(tx: UnboundedSender<InputEvent>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || poll_loop(&tx, &stop))
}

fn poll_loop(tx: &UnboundedSender<InputEvent>, stop: &AtomicBool) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                warn!(?err, "input poll failed, stopping input task");
                break;
            }
        }

        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                warn!(?err, "input read failed, stopping input task");
                break;
            }
        };

        let Event::Key(key) = event else { continue };
        let Some(input) = map_key(key) else { continue };
        debug!(?input, "input event");

        if tx.send(input).is_err() || input == InputEvent::Terminate {
            break;
        }
    }
    debug!("input task stopped");
}

/// Translate a key press into an input event.
///
/// Arrows move; `Esc`, `q` and `Ctrl-C` terminate. Key releases and repeats
/// are ignored.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(InputEvent::Move(Direction::Up)),
        KeyCode::Down => Some(InputEvent::Move(Direction::Down)),
        KeyCode::Left => Some(InputEvent::Move(Direction::Left)),
        KeyCode::Right => Some(InputEvent::Move(Direction::Right)),
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(InputEvent::Terminate),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Terminate)
        }
        _ => None,
    }
}
