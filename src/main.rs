use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use log::info;
use mlq_model::{
    MlqConfig, Process, QueueLevel, Sim,
    io::{load_processes, output_path, write_report},
    sim::workload::{WorkloadParams, bernoulli_processes},
    sort_by_label,
};
use std::{
    fs::File,
    io::BufWriter,
    num::NonZeroU64,
    path::{Path, PathBuf},
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("mlq_model")
        .about("Multilevel queue CPU scheduling simulator")
        .arg(
            Arg::new("inputfile")
                .long("inputfile")
                .value_parser(value_parser!(PathBuf))
                .default_value("inputs/mlq001.txt")
                .help("Process file, one `label;BT;AT;Q;Pr` record per line"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help("Report file [default: salida_<inputfile>]"),
        )
        .arg(
            Arg::new("q1-quantum")
                .long("q1-quantum")
                .value_parser(value_parser!(NonZeroU64))
                .help("Round-robin quantum of queue 1"),
        )
        .arg(
            Arg::new("q2-quantum")
                .long("q2-quantum")
                .value_parser(value_parser!(NonZeroU64))
                .help("Round-robin quantum of queue 2"),
        )
        .arg(
            Arg::new("generate")
                .long("generate")
                .value_parser(value_parser!(u64))
                .help("Simulate a random workload spanning this many ticks instead of reading a file"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .default_value("0")
                .help("Seed for --generate"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Log every scheduling event"),
        )
        .get_matches();

    let mut config = MlqConfig::default();
    if let Some(&quantum) = matches.get_one::<NonZeroU64>("q1-quantum") {
        config = config.with_quantum(QueueLevel::One, quantum);
    }
    if let Some(&quantum) = matches.get_one::<NonZeroU64>("q2-quantum") {
        config = config.with_quantum(QueueLevel::Two, quantum);
    }

    let inputfile = matches
        .get_one::<PathBuf>("inputfile")
        .expect("inputfile has a default");
    let (processes, source) = match matches.get_one::<u64>("generate") {
        Some(&ticks) => {
            let seed = *matches.get_one::<u64>("seed").expect("seed has a default");
            let params = WorkloadParams {
                ticks,
                ..WorkloadParams::default()
            };
            let processes = bernoulli_processes(&params, seed);
            info!("generated {} processes (seed {seed})", processes.len());
            (processes, PathBuf::from(format!("random_{seed}.txt")))
        }
        None => {
            let processes = load_processes(inputfile)
                .with_context(|| format!("failed to load {}", inputfile.display()))?;
            (processes, inputfile.clone())
        }
    };

    let results = run(processes, config, matches.get_flag("trace"));

    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| output_path(&source));
    write_results(&output, &source, &results)?;

    info!("simulation complete, results in {}", output.display());
    Ok(())
}

fn run(processes: Vec<Process>, config: MlqConfig, trace: bool) -> Vec<Process> {
    let mut sim = Sim::new(processes, config);

    while !sim.all_processes_completed() {
        let now = sim.core.now();
        let events = sim.step();

        if trace {
            for event in events {
                info!("t={} {:?}", now, event);
            }
        }
    }

    info!("all processes finished after {} ticks", sim.core.now());
    let mut results = sim.into_finished();
    sort_by_label(&mut results);
    results
}

fn write_results(output: &Path, source: &Path, results: &[Process]) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let source_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    write_report(&mut BufWriter::new(file), &source_name, results)
        .with_context(|| format!("failed to write {}", output.display()))
}
