use crate::core::{TaskId, Ticks};
use crate::scheduler::QueueLevel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlqEvent {
    Arrived {
        task: TaskId,
        level: QueueLevel,
    },
    // `by` is the head of a lower-numbered queue
    Preempted {
        task: TaskId,
        by: TaskId,
    },
    Dispatched {
        task: TaskId,
        level: QueueLevel,
        quantum: Option<Ticks>,
    },
    FirstRun {
        task: TaskId,
        response: Ticks,
    },
    Completed {
        task: TaskId,
        completion: Ticks,
    },
    QuantumExpired {
        task: TaskId,
    },
    // No ready process after dispatch
    CpuIdle,
}
