use rustc_hash::FxHashMap;

use super::queue::{ReadyQueue, Seq};
use crate::{
    scheduler::{MlqConfig, Policy, QueueLevel},
    sim::Process,
};

// Index into Process Vec
pub type TaskId = usize;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub task: TaskId,
    // None for levels whose slice never expires
    pub remaining_quantum: Option<Ticks>,
}

impl Occupancy {
    pub fn consume_quantum(&mut self) {
        if let Some(quantum) = self.remaining_quantum.as_mut() {
            *quantum = quantum.saturating_sub(1);
        }
    }

    pub fn quantum_expired(&self) -> bool {
        self.remaining_quantum == Some(0)
    }
}

#[derive(Debug)]
pub struct MlqCtx {
    pub now: Ticks,
    pub cpu: Option<Occupancy>,
    pub tasks: Vec<Process>,
    pub queues: [ReadyQueue; 3],
    pub task_to_queue: FxHashMap<TaskId, QueueLevel>,
    pub finished: Vec<TaskId>,
    pub config: MlqConfig,

    // Increment upon every enqueue
    next_seq: Seq,
}

impl MlqCtx {
    pub fn new(tasks: Vec<Process>, config: MlqConfig) -> Self {
        let queues = QueueLevel::ALL.map(|level| match config.policy(level) {
            Policy::RoundRobin { .. } => ReadyQueue::new_fifo(),
            Policy::PriorityRun => ReadyQueue::new_priq(),
        });

        Self {
            now: 0,
            cpu: None,
            finished: Vec::with_capacity(tasks.len()),
            tasks,
            queues,
            task_to_queue: FxHashMap::default(),
            config,
            next_seq: 0,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn task(&self, task_id: TaskId) -> &Process {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Process {
        &mut self.tasks[task_id]
    }

    pub fn queue(&self, level: QueueLevel) -> &ReadyQueue {
        &self.queues[level.index()]
    }

    /// Put `task_id` at the back (FIFO) or priority position (priq) of the
    /// queue for its level.
    pub fn enqueue(&mut self, task_id: TaskId) {
        assert!(
            !self.task_to_queue.contains_key(&task_id),
            "Task {task_id} already present in some queue"
        );

        let task = self.task(task_id);
        debug_assert!(
            !task.is_finished(),
            "Finished task {task_id} must not be enqueued"
        );
        debug_assert!(
            self.running() != Some(task_id),
            "Running task {task_id} must not be enqueued"
        );

        let level = task.level();
        let priority = task.priority();
        let seq = self.next_seq;
        self.next_seq += 1;

        self.queues[level.index()].push(task_id, priority, seq);
        self.task_to_queue.insert(task_id, level);
    }

    /// Head of the lowest-numbered non-empty queue.
    pub fn peek_best(&self) -> Option<TaskId> {
        self.queues.iter().find_map(ReadyQueue::peek)
    }

    /// Removes the task `peek_best` would have returned.
    pub fn pop_best(&mut self) -> Option<TaskId> {
        let task = self
            .queues
            .iter_mut()
            .find(|queue| !queue.is_empty())?
            .pop()?;

        let removed = self.task_to_queue.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing queue membership");

        Some(task)
    }

    pub fn task_in_any_queue(&self, task_id: TaskId) -> bool {
        self.task_to_queue.contains_key(&task_id)
    }

    pub fn running(&self) -> Option<TaskId> {
        self.cpu.map(|occupancy| occupancy.task)
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.cpu.is_none()
    }

    /// Place `task_id` on the CPU with the full quantum of its level.
    pub fn set_running(&mut self, task_id: TaskId) -> Option<Ticks> {
        debug_assert!(
            !self.task_to_queue.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.cpu.is_none(), "CPU already running a task");

        let remaining_quantum = self.config.policy(self.task(task_id).level()).quantum();
        self.cpu = Some(Occupancy {
            task: task_id,
            remaining_quantum,
        });
        remaining_quantum
    }

    pub fn clear_cpu(&mut self) -> Option<TaskId> {
        self.cpu.take().map(|occupancy| occupancy.task)
    }

    pub fn mark_completed(&mut self, task_id: TaskId, completion_time: Ticks) {
        debug_assert!(
            !self.task_to_queue.contains_key(&task_id),
            "Completing task {task_id} that is still enqueued"
        );

        self.task_mut(task_id).finalize(completion_time);
        self.finished.push(task_id);
    }

    pub fn all_completed(&self) -> bool {
        self.finished.len() == self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(tasks: Vec<Process>) -> MlqCtx {
        MlqCtx::new(tasks, MlqConfig::default())
    }

    #[test]
    fn best_respects_level_dominance() {
        let mut ctx = ctx(vec![
            Process::new("low", 1, 0, QueueLevel::Three, 100),
            Process::new("mid", 1, 0, QueueLevel::Two, 1),
            Process::new("high", 1, 0, QueueLevel::One, -5),
        ]);
        ctx.enqueue(0);
        ctx.enqueue(1);
        assert_eq!(ctx.peek_best(), Some(1));
        ctx.enqueue(2);
        assert_eq!(ctx.peek_best(), Some(2));
        assert_eq!(ctx.pop_best(), Some(2));
        assert_eq!(ctx.pop_best(), Some(1));
        assert_eq!(ctx.pop_best(), Some(0));
        assert_eq!(ctx.pop_best(), None);
        assert!(ctx.task_to_queue.is_empty());
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn double_enqueue_panics() {
        let mut ctx = ctx(vec![Process::new("A", 1, 0, QueueLevel::One, 1)]);
        ctx.enqueue(0);
        ctx.enqueue(0);
    }

    #[test]
    fn occupancy_gets_level_quantum() {
        let mut ctx = ctx(vec![
            Process::new("A", 5, 0, QueueLevel::Two, 1),
            Process::new("B", 5, 0, QueueLevel::Three, 1),
        ]);
        assert_eq!(ctx.set_running(0), Some(3));
        let mut occupancy = ctx.cpu.unwrap();
        for _ in 0..3 {
            occupancy.consume_quantum();
        }
        assert!(occupancy.quantum_expired());

        assert_eq!(ctx.clear_cpu(), Some(0));
        assert_eq!(ctx.set_running(1), None);
        let mut occupancy = ctx.cpu.unwrap();
        occupancy.consume_quantum();
        assert!(!occupancy.quantum_expired());
    }
}
