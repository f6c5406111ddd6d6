use crate::{core::Ticks, scheduler::QueueLevel};

pub type Priority = i64;

/// One schedulable unit: fixed inputs, simulation state, and the metrics
/// latched while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    label: String,
    burst_time: Ticks,
    arrival_time: Ticks,
    level: QueueLevel,
    priority: Priority,

    remaining: Ticks,
    // Cleared on first dispatch
    first_run_pending: bool,

    response_time: Option<Ticks>,
    completion_time: Option<Ticks>,
    turnaround_time: Option<Ticks>,
    waiting_time: Option<Ticks>,
}

impl Process {
    pub fn new(
        label: impl Into<String>,
        burst_time: Ticks,
        arrival_time: Ticks,
        level: QueueLevel,
        priority: Priority,
    ) -> Self {
        Self {
            label: label.into(),
            burst_time,
            arrival_time,
            level,
            priority,
            remaining: burst_time,
            first_run_pending: true,
            response_time: None,
            completion_time: None,
            turnaround_time: None,
            waiting_time: None,
        }
    }

    /// Consume one tick of CPU. Saturates at zero.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Latch the response time on first dispatch. Returns `false` if the
    /// process had already run.
    pub fn record_first_run(&mut self, now: Ticks) -> bool {
        if !self.first_run_pending {
            return false;
        }
        debug_assert!(
            now >= self.arrival_time,
            "Process {} dispatched before arrival",
            self.label
        );
        self.response_time = Some(now - self.arrival_time);
        self.first_run_pending = false;
        true
    }

    /// `completion` is the first tick after the last execution tick.
    pub fn finalize(&mut self, completion: Ticks) {
        debug_assert!(
            self.is_finished(),
            "Process {} finalized with {} ticks left",
            self.label,
            self.remaining
        );
        debug_assert!(
            self.completion_time.is_none(),
            "Process {} finalized twice",
            self.label
        );

        let turnaround = completion - self.arrival_time;
        self.completion_time = Some(completion);
        self.turnaround_time = Some(turnaround);
        self.waiting_time = Some(turnaround - self.burst_time);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn burst_time(&self) -> Ticks {
        self.burst_time
    }

    pub fn arrival_time(&self) -> Ticks {
        self.arrival_time
    }

    pub fn level(&self) -> QueueLevel {
        self.level
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn has_run(&self) -> bool {
        !self.first_run_pending
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.response_time
    }

    pub fn completion_time(&self) -> Option<Ticks> {
        self.completion_time
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.turnaround_time
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        self.waiting_time
    }
}
