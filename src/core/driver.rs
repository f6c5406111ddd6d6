use log::{debug, trace};

use super::{
    event::MlqEvent,
    observer::Observer,
    state::{MlqCtx, TaskId, Ticks},
};
use crate::{scheduler::MlqConfig, sim::Process};

pub struct MlqCore {
    pub ctx: MlqCtx,
    observer: Observer,
}

impl MlqCore {
    pub fn new(tasks: Vec<Process>, config: MlqConfig) -> Self {
        Self {
            ctx: MlqCtx::new(tasks, config),
            observer: Observer::new(),
        }
    }

    /// Make `task_id` ready at the current tick.
    pub fn arrive(&mut self, task_id: TaskId) -> MlqEvent {
        self.ctx.enqueue(task_id);
        let level = self.ctx.task(task_id).level();
        trace!("t={} arrival {}", self.ctx.now, self.ctx.task(task_id).label());
        MlqEvent::Arrived {
            task: task_id,
            level,
        }
    }

    /// Everything in a tick after arrivals: preempt, dispatch, execute,
    /// retire or requeue, then advance the clock.
    pub fn tick(&mut self) -> Vec<MlqEvent> {
        let mut events = Vec::new();

        self.preempt(&mut events);

        if self.ctx.cpu_is_idle() {
            self.dispatch(&mut events);
        }

        match self.ctx.running() {
            Some(task_id) => self.run_current(task_id, &mut events),
            None => events.push(MlqEvent::CpuIdle),
        }

        self.ctx.advance_time(1);
        self.observer.observe(&self.ctx);
        events
    }

    fn preempt(&mut self, events: &mut Vec<MlqEvent>) {
        let (Some(running), Some(best)) = (self.ctx.running(), self.ctx.peek_best()) else {
            return;
        };

        // Levels only, priorities never cross queues
        if self.ctx.task(best).level() < self.ctx.task(running).level() {
            self.ctx.clear_cpu();
            self.ctx.enqueue(running);
            debug!(
                "t={} {} preempted by {}",
                self.ctx.now,
                self.ctx.task(running).label(),
                self.ctx.task(best).label()
            );
            events.push(MlqEvent::Preempted {
                task: running,
                by: best,
            });
        }
    }

    fn dispatch(&mut self, events: &mut Vec<MlqEvent>) {
        let Some(task_id) = self.ctx.pop_best() else {
            return;
        };

        let quantum = self.ctx.set_running(task_id);
        let level = self.ctx.task(task_id).level();
        debug!(
            "t={} dispatch {} from {:?}",
            self.ctx.now,
            self.ctx.task(task_id).label(),
            level
        );
        events.push(MlqEvent::Dispatched {
            task: task_id,
            level,
            quantum,
        });
    }

    fn run_current(&mut self, task_id: TaskId, events: &mut Vec<MlqEvent>) {
        let now = self.ctx.now;

        let task = self.ctx.task_mut(task_id);
        if task.record_first_run(now) {
            events.push(MlqEvent::FirstRun {
                task: task_id,
                response: now - task.arrival_time(),
            });
        }
        task.tick();
        let finished = task.is_finished();

        let occupancy = self
            .ctx
            .cpu
            .as_mut()
            .expect("Running task missing from CPU slot");
        occupancy.consume_quantum();
        let quantum_expired = occupancy.quantum_expired();

        // Completion wins over an expiring quantum on the same tick
        if finished {
            self.retire(task_id, now + 1, events);
        } else if quantum_expired {
            self.ctx.clear_cpu();
            self.ctx.enqueue(task_id);
            events.push(MlqEvent::QuantumExpired { task: task_id });
        }
    }

    fn retire(&mut self, task_id: TaskId, completion: Ticks, events: &mut Vec<MlqEvent>) {
        self.ctx.clear_cpu();
        self.ctx.mark_completed(task_id, completion);
        debug!(
            "t={} {} completed",
            self.ctx.now,
            self.ctx.task(task_id).label()
        );
        events.push(MlqEvent::Completed {
            task: task_id,
            completion,
        });
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::QueueLevel;

    fn core(tasks: Vec<Process>) -> MlqCore {
        MlqCore::new(tasks, MlqConfig::default())
    }

    #[test]
    fn idle_tick_still_advances_clock() {
        let mut core = core(vec![Process::new("A", 1, 5, QueueLevel::One, 1)]);
        assert_eq!(core.tick(), [MlqEvent::CpuIdle]);
        assert_eq!(core.now(), 1);
        assert_eq!(core.observer().steps(), 1);
    }

    #[test]
    fn single_tick_dispatch_and_complete() {
        let mut core = core(vec![Process::new("A", 1, 0, QueueLevel::Two, 1)]);
        core.arrive(0);
        let events = core.tick();
        assert_eq!(
            events,
            [
                MlqEvent::Dispatched {
                    task: 0,
                    level: QueueLevel::Two,
                    quantum: Some(3),
                },
                MlqEvent::FirstRun {
                    task: 0,
                    response: 0,
                },
                MlqEvent::Completed {
                    task: 0,
                    completion: 1,
                },
            ]
        );
        assert!(core.ctx.all_completed());
        assert!(core.ctx.cpu_is_idle());
    }

    #[test]
    fn completion_beats_quantum_expiry() {
        // Burst equals the Q2 quantum, so both end on the third tick
        let mut core = core(vec![Process::new("A", 3, 0, QueueLevel::Two, 1)]);
        core.arrive(0);
        core.tick();
        core.tick();
        let events = core.tick();
        assert!(events.contains(&MlqEvent::Completed {
            task: 0,
            completion: 3,
        }));
        assert!(!events.contains(&MlqEvent::QuantumExpired { task: 0 }));
        assert!(!core.ctx.task_in_any_queue(0));
    }

    #[test]
    fn lower_level_arrival_preempts_running() {
        let mut core = core(vec![
            Process::new("slow", 4, 0, QueueLevel::Three, 1),
            Process::new("fast", 1, 1, QueueLevel::One, 1),
        ]);
        core.arrive(0);
        core.tick();
        core.arrive(1);
        let events = core.tick();
        assert_eq!(events[0], MlqEvent::Preempted { task: 0, by: 1 });
        assert!(core.ctx.task_in_any_queue(0));
        assert_eq!(core.ctx.task(1).completion_time(), Some(2));
    }

    #[test]
    fn same_level_arrival_does_not_preempt() {
        let mut core = core(vec![
            Process::new("A", 3, 0, QueueLevel::Three, 1),
            Process::new("B", 1, 1, QueueLevel::Three, 9),
        ]);
        core.arrive(0);
        core.tick();
        core.arrive(1);
        let events = core.tick();
        assert!(
            events
                .iter()
                .all(|e| !matches!(e, MlqEvent::Preempted { .. }))
        );
        assert_eq!(core.ctx.running(), Some(0));
    }
}
