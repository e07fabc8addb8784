//! Pure reducer for the studio
//!
//! All state transitions happen here. This function is pure:
//! - Takes the current state + an event
//! - Returns the next state + side effects
//! - No I/O, no async, no clock reads inside
//!
//! Side effects are returned for the app to execute after the state is replaced.

mod keys;
mod navigation;
mod results;

use std::time::Instant;

use super::events::{SideEffect, StudioEvent};
use super::state::AppState;

// ═══════════════════════════════════════════════════════════════════════════════
// Reducer Function
// ═══════════════════════════════════════════════════════════════════════════════

/// Reducer: (state, event) → (state, effects)
///
/// The single source of truth for all state transitions.
pub fn reduce(mut state: AppState, event: StudioEvent) -> (AppState, Vec<SideEffect>) {
    if event.is_task_result() {
        state.in_flight = state.in_flight.saturating_sub(1);
    }

    let effects = match event {
        StudioEvent::Key(key) => keys::reduce_key(&mut state, key),
        StudioEvent::Tick(now) => {
            tick(&mut state, now);
            Vec::new()
        }
        result => results::reduce_result(&mut state, result),
    };

    track(&mut state, &effects);
    (state, effects)
}

/// Effects issued when the studio opens
pub fn startup(mut state: AppState) -> (AppState, Vec<SideEffect>) {
    let effects = SideEffect::refresh();
    track(&mut state, &effects);
    (state, effects)
}

fn track(state: &mut AppState, effects: &[SideEffect]) {
    for effect in effects {
        if *effect == SideEffect::Quit {
            state.should_quit = true;
        } else {
            state.in_flight += 1;
        }
    }
}

/// Advance the spinner and expire the status message
fn tick(state: &mut AppState, now: Instant) {
    if state.in_flight > 0 {
        state.spinner_frame = state.spinner_frame.wrapping_add(1);
    }

    if let Some(message) = state.message.as_mut() {
        if message.shown_at.is_none() {
            message.shown_at = Some(now);
        } else if message.is_expired(now) {
            state.message = None;
        }
    }
}

/// Keep a list cursor inside `len` entries
fn clamp(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}
