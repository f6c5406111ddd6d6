use std::num::NonZeroU64;

use crate::{
    core::Ticks,
    sim::{Process, Sim},
};

pub const DEFAULT_Q1_QUANTUM: NonZeroU64 = NonZeroU64::new(1).unwrap();
pub const DEFAULT_Q2_QUANTUM: NonZeroU64 = NonZeroU64::new(3).unwrap();

/// Static queue assignment of a process. Lower level wins the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueueLevel {
    One = 1,
    Two = 2,
    Three = 3,
}

impl QueueLevel {
    pub const ALL: [QueueLevel; 3] = [QueueLevel::One, QueueLevel::Two, QueueLevel::Three];

    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for QueueLevel {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// FIFO ordering; the running process is requeued at the back once
    /// `quantum` ticks of one occupancy are used up.
    RoundRobin { quantum: NonZeroU64 },
    /// Highest priority first, insertion order among equals. Runs until
    /// completion unless preempted by a lower-numbered level.
    PriorityRun,
}

impl Policy {
    /// `None` means the slice never expires.
    pub fn quantum(&self) -> Option<Ticks> {
        match self {
            Policy::RoundRobin { quantum } => Some(quantum.get()),
            Policy::PriorityRun => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlqConfig {
    pub levels: [Policy; 3],
}

impl MlqConfig {
    pub fn policy(&self, level: QueueLevel) -> Policy {
        self.levels[level.index()]
    }

    pub fn with_quantum(mut self, level: QueueLevel, quantum: NonZeroU64) -> Self {
        self.levels[level.index()] = Policy::RoundRobin { quantum };
        self
    }
}

impl Default for MlqConfig {
    fn default() -> Self {
        Self {
            levels: [
                Policy::RoundRobin {
                    quantum: DEFAULT_Q1_QUANTUM,
                },
                Policy::RoundRobin {
                    quantum: DEFAULT_Q2_QUANTUM,
                },
                Policy::PriorityRun,
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MlqScheduler {
    config: MlqConfig,
}

impl MlqScheduler {
    pub fn new(config: MlqConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MlqConfig {
        &self.config
    }

    /// Runs the tick loop until every process has finished and returns them
    /// in completion order.
    pub fn simulate(&self, processes: Vec<Process>) -> Vec<Process> {
        let mut sim = Sim::new(processes, self.config);
        sim.run();
        sim.into_finished()
    }
}

pub fn simulate(processes: Vec<Process>) -> Vec<Process> {
    MlqScheduler::default().simulate(processes)
}

/// Stable sort, so duplicate labels keep completion order.
pub fn sort_by_label(processes: &mut [Process]) {
    processes.sort_by(|a, b| a.label().cmp(b.label()));
}
