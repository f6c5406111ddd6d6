use rand::prelude::*;

use super::process::{Priority, Process};
use crate::{core::Ticks, scheduler::QueueLevel};

#[derive(Debug, Clone, Copy)]
pub struct WorkloadParams {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    pub max_priority: Priority,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            ticks: 50,
            p_arrival: 0.3,
            p_short: 0.3,
            short_ticks: 2,
            long_ticks: 6,
            max_priority: 5,
        }
    }
}

/// At most one arrival per tick, with probability `p_arrival`. Same seed,
/// same processes.
pub fn bernoulli_processes(params: &WorkloadParams, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..params.ticks {
        if rng.random::<f64>() < params.p_arrival {
            let burst = if rng.random::<f64>() < params.p_short {
                params.short_ticks
            } else {
                params.long_ticks
            };
            let level = *QueueLevel::ALL
                .choose(&mut rng)
                .expect("QueueLevel::ALL is not empty");
            let priority = rng.random_range(1..=params.max_priority.max(1));

            processes.push(Process::new(
                format!("P{}", processes.len()),
                burst.max(1),
                t,
                level,
                priority,
            ));
        }
    }

    processes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_workload() {
        let params = WorkloadParams::default();
        assert_eq!(
            bernoulli_processes(&params, 7),
            bernoulli_processes(&params, 7)
        );
    }

    #[test]
    fn generated_processes_are_well_formed() {
        let params = WorkloadParams {
            ticks: 200,
            ..WorkloadParams::default()
        };
        let processes = bernoulli_processes(&params, 42);
        assert!(!processes.is_empty());

        let mut last_arrival = 0;
        for (i, p) in processes.iter().enumerate() {
            assert_eq!(p.label(), format!("P{i}"));
            assert!(p.burst_time() == params.short_ticks || p.burst_time() == params.long_ticks);
            assert!(p.arrival_time() < params.ticks);
            assert!(p.arrival_time() >= last_arrival);
            assert!((1..=params.max_priority).contains(&p.priority()));
            last_arrival = p.arrival_time();
        }
    }

    #[test]
    fn zero_arrival_probability_is_empty() {
        let params = WorkloadParams {
            p_arrival: 0.0,
            ..WorkloadParams::default()
        };
        assert!(bernoulli_processes(&params, 1).is_empty());
    }
}
