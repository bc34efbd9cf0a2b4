// ABOUTME: Two-state machine deciding when a file change starts a deployment run.
// ABOUTME: Changes during a run coalesce into at most one follow-up run.

/// Whether a run is in flight, and whether anything changed since it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchState {
    #[default]
    Idle,
    Deploying {
        pending: bool,
    },
}

impl WatchState {
    /// Record a qualifying change. Returns `true` when a run should start now.
    pub fn on_change(&mut self) -> bool {
        match self {
            WatchState::Idle => {
                *self = WatchState::Deploying { pending: false };
                true
            }
            WatchState::Deploying { pending } => {
                *pending = true;
                false
            }
        }
    }

    /// Record that the in-flight run completed, successfully or not.
    /// Returns `true` when changes arrived during the run and one follow-up
    /// run should start; the state then stays `Deploying`.
    pub fn on_finished(&mut self) -> bool {
        match self {
            WatchState::Deploying { pending: true } => {
                *self = WatchState::Deploying { pending: false };
                true
            }
            _ => {
                *self = WatchState::Idle;
                false
            }
        }
    }
}
