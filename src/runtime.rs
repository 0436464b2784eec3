// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    KeyPressed,
    FrameBudget,
    TimeBudget,
    /// A termination signal was received.
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::KeyPressed => "key pressed",
            StopReason::FrameBudget => "frame budget reached",
            StopReason::TimeBudget => "time budget reached",
            StopReason::Interrupted => "interrupted",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RainState {
    Running,
    Stopped(StopReason),
}

impl RainState {
    pub fn is_running(self) -> bool {
        self == RainState::Running
    }
}

/// Outcome of one completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub frames: u64,
    pub columns: usize,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}
