//! Application lifecycle state machine.
//!
//! # States
//! - Created: constructed, never started
//! - Running: listener accepting connections
//! - Stopped: listener closed, may be started again
//!
//! # State Transitions
//! ```text
//! Created → Running: Started
//! Stopped → Running: Started
//! Running → Stopped: Stopped
//! ```
//! Every other combination is rejected and treated by the caller as a no-op.

/// Lifecycle of the whole application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Running,
    Stopped,
}

/// Event driving a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Started,
    Stopped,
}

impl Lifecycle {
    /// The state after `event`, or `None` if the transition is illegal.
    pub fn next(self, event: LifecycleEvent) -> Option<Lifecycle> {
        match (self, event) {
            (Lifecycle::Created, LifecycleEvent::Started) => Some(Lifecycle::Running),
            (Lifecycle::Stopped, LifecycleEvent::Started) => Some(Lifecycle::Running),
            (Lifecycle::Running, LifecycleEvent::Stopped) => Some(Lifecycle::Stopped),
            (Lifecycle::Running, LifecycleEvent::Started) => None,
            (Lifecycle::Created, LifecycleEvent::Stopped) => None,
            (Lifecycle::Stopped, LifecycleEvent::Stopped) => None,
        }
    }

    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Created => write!(f, "created"),
            Lifecycle::Running => write!(f, "running"),
            Lifecycle::Stopped => write!(f, "stopped"),
        }
    }
}
