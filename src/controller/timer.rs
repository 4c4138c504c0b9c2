// SPDX-License-Identifier: GPL-3.0-only

//! Long-press timer for held extra keys.
//!
//! At most one timer task exists per controller. Starting a new one aborts the
//! previous task and bumps a generation counter stored under the same lock as
//! the state the task mutates, so a task that already woke up cannot act once
//! it has been superseded.

use crate::app_settings::{
    DEFAULT_LONG_PRESS_TIMEOUT_MS, DEFAULT_REPEAT_DELAY_MS, MAX_LONG_PRESS_TIMEOUT_MS,
    MAX_REPEAT_DELAY_MS, MIN_LONG_PRESS_TIMEOUT_MS, MIN_REPEAT_DELAY_MS,
};
use crate::input::{DispatchEvent, KeySink, SpecialButton, SpecialButtons, dispatch};
use crate::layout::ConfigError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Returns `value` if it lies in `min..=max`, otherwise `default`.
fn in_range_or(value: u64, min: u64, max: u64, default: u64) -> u64 {
    if (min..=max).contains(&value) {
        value
    } else {
        tracing::debug!(
            "Timing value {}ms outside {}..={}ms, using {}ms",
            value,
            min,
            max,
            default
        );
        default
    }
}

/// Clamped long-press and auto-repeat timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    long_press_timeout: Duration,
    repeat_delay: Duration,
}

impl Timing {
    /// Creates timing from millisecond values. Out-of-range values fall back
    /// to the defaults rather than being clamped to the nearest bound.
    pub fn new(long_press_timeout_ms: u64, repeat_delay_ms: u64) -> Self {
        Self {
            long_press_timeout: Duration::from_millis(in_range_or(
                long_press_timeout_ms,
                MIN_LONG_PRESS_TIMEOUT_MS,
                MAX_LONG_PRESS_TIMEOUT_MS,
                DEFAULT_LONG_PRESS_TIMEOUT_MS,
            )),
            repeat_delay: Duration::from_millis(in_range_or(
                repeat_delay_ms,
                MIN_REPEAT_DELAY_MS,
                MAX_REPEAT_DELAY_MS,
                DEFAULT_REPEAT_DELAY_MS,
            )),
        }
    }

    /// Time a press must be held before repeat or lock kicks in.
    pub fn long_press_timeout(&self) -> Duration {
        self.long_press_timeout
    }

    /// Time between auto-repeat firings.
    pub fn repeat_delay(&self) -> Duration {
        self.repeat_delay
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS_TIMEOUT_MS, DEFAULT_REPEAT_DELAY_MS)
    }
}

/// State shared between the controller and its timer task.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) specials: SpecialButtons,
    pub(crate) repeat_count: u32,
    generation: u64,
}

impl Shared {
    pub(crate) fn new(specials: SpecialButtons) -> Self {
        Self {
            specials,
            repeat_count: 0,
            generation: 0,
        }
    }
}

pub(crate) type SharedSink = Arc<Mutex<Box<dyn KeySink>>>;

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owned handle to the single outstanding timer task.
#[derive(Debug, Default)]
pub(crate) struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Invalidates and aborts the outstanding task, if any. Idempotent.
    pub(crate) fn cancel(&mut self, shared: &Mutex<Shared>) {
        let mut state = lock(shared);
        state.generation = state.generation.wrapping_add(1);
        drop(state);

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn next_generation(&mut self, shared: &Mutex<Shared>) -> u64 {
        self.cancel(shared);
        lock(shared).generation
    }

    /// After `timing.long_press_timeout()`, dispatches `events` every
    /// `timing.repeat_delay()` until cancelled, counting each firing.
    pub(crate) fn start_repeat(
        &mut self,
        runtime: &Handle,
        shared: &Arc<Mutex<Shared>>,
        sink: &SharedSink,
        events: Vec<DispatchEvent>,
        timing: Timing,
    ) {
        let generation = self.next_generation(shared);
        let shared = Arc::clone(shared);
        let sink = Arc::clone(sink);

        self.task = Some(runtime.spawn(async move {
            tokio::time::sleep(timing.long_press_timeout()).await;
            loop {
                {
                    let mut sink = lock(&sink);
                    {
                        let mut state = lock(&shared);
                        if state.generation != generation {
                            return;
                        }
                        state.repeat_count = state.repeat_count.saturating_add(1);
                    }
                    dispatch(&events, &mut **sink);
                }
                tokio::time::sleep(timing.repeat_delay()).await;
            }
        }));
    }

    /// After `timeout`, toggles the lock state of `button` once.
    pub(crate) fn start_lock(
        &mut self,
        runtime: &Handle,
        shared: &Arc<Mutex<Shared>>,
        sink: &SharedSink,
        button: SpecialButton,
        timeout: Duration,
    ) {
        let generation = self.next_generation(shared);
        let shared = Arc::clone(shared);
        let sink = Arc::clone(sink);

        self.task = Some(runtime.spawn(async move {
            tokio::time::sleep(timeout).await;

            let toggled = {
                let mut guard = lock(&shared);
                let state = &mut *guard;
                if state.generation != generation {
                    return;
                }
                match state.specials.get_mut(button) {
                    Some(slot) => {
                        slot.toggle_lock();
                        state.repeat_count = state.repeat_count.saturating_add(1);
                        tracing::debug!(
                            "{} lock toggled: active={}, locked={}",
                            button,
                            slot.is_active,
                            slot.is_locked
                        );
                        true
                    }
                    None => false,
                }
            };

            if !toggled {
                let err = ConfigError::unknown_special_button(button.key_name());
                tracing::warn!("{}", err);
                lock(&sink).on_diagnostic(&err);
            }
        }));
    }
}
