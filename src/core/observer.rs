use super::state::MlqCtx;

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    finished_seen: usize,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &MlqCtx) {
        self.step += 1;

        if let Some(task_id) = ctx.running() {
            debug_assert!(
                !ctx.task_in_any_queue(task_id),
                "Running task {task_id} must not appear in any queue"
            );
            debug_assert!(
                !ctx.task(task_id).is_finished(),
                "Finished task {task_id} still holds the CPU"
            );
        }

        debug_assert!(
            ctx.finished.len() >= self.finished_seen,
            "Finished set shrank from {} to {}",
            self.finished_seen,
            ctx.finished.len()
        );
        self.finished_seen = ctx.finished.len();

        for &task_id in &ctx.finished {
            debug_assert!(
                !ctx.task_in_any_queue(task_id),
                "Finished task {task_id} still present in a queue"
            );
        }

        for (&task_id, &level) in &ctx.task_to_queue {
            debug_assert_eq!(
                ctx.task(task_id).level(),
                level,
                "Task {task_id} queued on the wrong level"
            );
            debug_assert!(
                ctx.queue(level).contains(task_id),
                "task_to_queue claims task {task_id} in queue {level:?}, but queue does not contain it"
            );
        }

        let queued: usize = ctx.queues.iter().map(|queue| queue.len()).sum();
        debug_assert_eq!(
            queued,
            ctx.task_to_queue.len(),
            "Queue lengths disagree with membership index"
        );
    }
}
