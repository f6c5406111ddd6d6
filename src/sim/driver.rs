use super::process::Process;
use crate::{
    core::{MlqCore, MlqEvent, TaskId},
    scheduler::MlqConfig,
};

pub struct Sim {
    pub core: MlqCore,
    // Task ids ordered by arrival time, input order among equals
    arrivals: Vec<TaskId>,
    arrival_cursor: usize,
}

impl Sim {
    pub fn new(processes: Vec<Process>, config: MlqConfig) -> Self {
        let mut arrivals: Vec<TaskId> = (0..processes.len()).collect();
        arrivals.sort_by_key(|&task| processes[task].arrival_time());

        Self {
            core: MlqCore::new(processes, config),
            arrivals,
            arrival_cursor: 0,
        }
    }

    /// One full tick: arrivals first, so a process arriving now can be
    /// dispatched now.
    pub fn step(&mut self) -> Vec<MlqEvent> {
        let mut events = self.handle_arrivals();
        events.extend(self.core.tick());
        events
    }

    fn handle_arrivals(&mut self) -> Vec<MlqEvent> {
        let now = self.core.now();
        let mut events = Vec::new();

        // Contiguous, since arrivals are sorted and the clock never skips
        while let Some(&task) = self.arrivals.get(self.arrival_cursor) {
            let process = self.core.ctx.task(task);
            if process.arrival_time() != now {
                break;
            }
            if !process.is_finished() {
                events.push(self.core.arrive(task));
            }
            self.arrival_cursor += 1;
        }

        events
    }

    pub fn run(&mut self) {
        while !self.all_processes_completed() {
            self.step();
        }
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    pub fn processes(&self) -> &[Process] {
        &self.core.ctx.tasks
    }

    /// Consumes the simulation, returning processes in completion order.
    /// Processes that never finished are dropped.
    pub fn into_finished(self) -> Vec<Process> {
        let order = self.core.ctx.finished;
        let mut slots: Vec<Option<Process>> = self.core.ctx.tasks.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|task| slots[task].take())
            .collect()
    }
}
