use average::{Estimate, Mean};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::sim::Process;

const OUTPUT_PREFIX: &str = "salida_";

/// Means of the four per-process metrics. Zero for an empty run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub waiting: f64,
    pub completion: f64,
    pub response: f64,
    pub turnaround: f64,
}

impl Summary {
    pub fn from_processes(processes: &[Process]) -> Self {
        Self {
            waiting: avg(processes.iter().map(Process::waiting_time)),
            completion: avg(processes.iter().map(Process::completion_time)),
            response: avg(processes.iter().map(Process::response_time)),
            turnaround: avg(processes.iter().map(Process::turnaround_time)),
        }
    }
}

fn avg(iter: impl Iterator<Item = Option<u64>>) -> f64 {
    iter.map(|value| value.unwrap_or_default() as f64)
        .collect::<Mean>()
        .estimate()
}

/// `salida_<name>` in the input's directory.
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{OUTPUT_PREFIX}{name}"))
}

/// Writes one `label;BT;AT;Q;Pr;WT;CT;RT;TAT` line per process in the given
/// order, followed by the averages.
pub fn write_report<W: Write>(out: &mut W, source: &str, processes: &[Process]) -> io::Result<()> {
    writeln!(out, "# archivo: {source}")?;
    writeln!(out, "# label; BT; AT; Q; Pr; WT; CT; RT; TAT")?;

    for p in processes {
        writeln!(
            out,
            "{};{};{};{};{};{};{};{};{}",
            p.label(),
            p.burst_time(),
            p.arrival_time(),
            p.level().number(),
            p.priority(),
            p.waiting_time().unwrap_or_default(),
            p.completion_time().unwrap_or_default(),
            p.response_time().unwrap_or_default(),
            p.turnaround_time().unwrap_or_default(),
        )?;
    }

    let summary = Summary::from_processes(processes);
    writeln!(
        out,
        "WT={:.1}; CT={:.1}; RT={:.1}; TAT={:.1};",
        summary.waiting, summary.completion, summary.response, summary.turnaround
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{QueueLevel, simulate, sort_by_label};

    fn finished() -> Vec<Process> {
        let mut done = simulate(vec![
            Process::new("B", 2, 0, QueueLevel::One, 4),
            Process::new("A", 3, 0, QueueLevel::One, 5),
        ]);
        sort_by_label(&mut done);
        done
    }

    #[test]
    fn summary_averages_metrics() {
        let summary = Summary::from_processes(&finished());
        // B: CT 3, A: CT 5
        assert_eq!(summary.completion, 4.0);
        assert_eq!(summary.turnaround, 4.0);
        assert_eq!(summary.response, 0.5);
        assert_eq!(summary.waiting, 1.5);
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = Summary::from_processes(&[]);
        assert_eq!(summary.waiting, 0.0);
        assert_eq!(summary.turnaround, 0.0);
    }

    #[test]
    fn report_lists_processes_then_averages() {
        let mut out = Vec::new();
        write_report(&mut out, "mlq001.txt", &finished()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# archivo: mlq001.txt\n\
             # label; BT; AT; Q; Pr; WT; CT; RT; TAT\n\
             A;3;0;1;5;2;5;1;5\n\
             B;2;0;1;4;1;3;0;3\n\
             WT=1.5; CT=4.0; RT=0.5; TAT=4.0;\n"
        );
    }

    #[test]
    fn output_lands_next_to_input() {
        assert_eq!(
            output_path(Path::new("inputs/mlq001.txt")),
            PathBuf::from("inputs/salida_mlq001.txt")
        );
    }
}
