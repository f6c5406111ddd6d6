use keyed_priority_queue::KeyedPriorityQueue;
use std::{cmp::Ordering, collections::VecDeque};

use super::state::TaskId;
use crate::sim::Priority;

// Enqueue order, shared by all queues of one context
pub type Seq = u64;

/// Heap key for the priority queue. `KeyedPriorityQueue` is a max-heap, so
/// the earlier sequence number has to compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrioKey {
    pub priority: Priority,
    pub seq: Seq,
}

impl PartialOrd for PrioKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrioKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
pub enum ReadyQueue {
    Fifo {
        tasks: VecDeque<TaskId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<TaskId, PrioKey>,
    },
}

impl ReadyQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    /// `priority` is ignored by FIFO queues.
    pub fn push(&mut self, task_id: TaskId, priority: Priority, seq: Seq) {
        match self {
            Self::Fifo { tasks } => tasks.push_back(task_id),
            Self::Priq { tasks } => {
                let previous = tasks.push(task_id, PrioKey { priority, seq });
                debug_assert!(previous.is_none(), "Task {task_id} pushed twice");
            }
        }
    }

    pub fn peek(&self) -> Option<TaskId> {
        match self {
            Self::Fifo { tasks } => tasks.front().copied(),
            Self::Priq { tasks } => tasks.peek().map(|(task, _)| *task),
        }
    }

    pub fn pop(&mut self) -> Option<TaskId> {
        match self {
            Self::Fifo { tasks } => tasks.pop_front(),
            Self::Priq { tasks } => tasks.pop().map(|(task, _)| task),
        }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&task_id),
            Self::Priq { tasks } => tasks.get_priority(&task_id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks } => tasks.len(),
            Self::Priq { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
