//! Debounce abstraction with explicit generation tokens.
//!
//! Each edit arms the gate, invalidating every earlier token; the task that
//! wakes after the delay only fires if its token is still the latest. Rapid
//! successive edits therefore coalesce into one dispatch, last value winning.

use dioxus::prelude::*;

/// Delay before a debounced field edit becomes a pending update.
pub const DEBOUNCE_MS: u32 = 1000;

/// The token logic behind [`Debounce`], separated so it stays deterministic
/// and unit-testable without timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceGate {
    generation: u64,
}

impl DebounceGate {
    /// Start a new debounce window; earlier tokens stop being current.
    pub fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.generation == token
    }
}

/// Debounced dispatch owned by a component.
#[derive(Clone, Copy)]
pub struct Debounce {
    gate: Signal<DebounceGate>,
}

/// Hook: a debounce gate scoped to the calling component.
pub fn use_debounce() -> Debounce {
    Debounce {
        gate: use_signal(DebounceGate::default),
    }
}

impl Debounce {
    /// Run `action` after `delay_ms`, unless another trigger supersedes it
    /// within the window.
    pub fn trigger(mut self, delay_ms: u32, action: impl FnOnce() + 'static) {
        let token = self.gate.write().arm();
        spawn(async move {
            sleep_ms(delay_ms).await;
            if self.gate.peek().is_current(token) {
                action();
            }
        });
    }

    /// Drop any dispatch still waiting in the window.
    pub fn cancel(mut self) {
        self.gate.write().arm();
    }
}

async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_rapid_edits_leave_only_the_last_token_current() {
        let mut gate = DebounceGate::default();
        let tokens: Vec<u64> = (0..5).map(|_| gate.arm()).collect();

        assert!(tokens[..4].iter().all(|t| !gate.is_current(*t)));
        assert!(gate.is_current(tokens[4]));
    }

    #[test]
    fn arming_again_cancels_the_open_window() {
        let mut gate = DebounceGate::default();
        let token = gate.arm();
        assert!(gate.is_current(token));

        gate.arm();
        assert!(!gate.is_current(token));
    }
}
