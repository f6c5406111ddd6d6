use std::{fmt, fs, path::Path};

use crate::{scheduler::QueueLevel, sim::Process};

const FIELDS: [&str; 5] = ["label", "burst", "arrival", "queue", "priority"];

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    MissingField {
        line: usize,
        field: &'static str,
    },
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    EmptyLabel {
        line: usize,
    },
    NonPositiveBurst {
        line: usize,
        value: i64,
    },
    NegativeArrival {
        line: usize,
        value: i64,
    },
    InvalidQueue {
        line: usize,
        value: i64,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "failed to read process file: {err}"),
            LoadError::MissingField { line, field } => {
                write!(f, "line {line}: missing field `{field}`")
            }
            LoadError::InvalidNumber { line, field, value } => {
                write!(f, "line {line}: `{field}` is not an integer: {value:?}")
            }
            LoadError::EmptyLabel { line } => write!(f, "line {line}: empty label"),
            LoadError::NonPositiveBurst { line, value } => {
                write!(f, "line {line}: burst time must be positive, got {value}")
            }
            LoadError::NegativeArrival { line, value } => {
                write!(f, "line {line}: arrival time must not be negative, got {value}")
            }
            LoadError::InvalidQueue { line, value } => {
                write!(f, "line {line}: queue must be 1, 2 or 3, got {value}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

pub fn load_processes(path: impl AsRef<Path>) -> Result<Vec<Process>, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_processes(&text)
}

/// Parses `label;burst;arrival;queue;priority` records. Blank lines and
/// lines starting with `#` are skipped; fields past the fifth are ignored.
pub fn parse_processes(text: &str) -> Result<Vec<Process>, LoadError> {
    let mut processes = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        processes.push(parse_line(index + 1, line)?);
    }

    log::debug!("loaded {} processes", processes.len());
    Ok(processes)
}

fn parse_line(line: usize, text: &str) -> Result<Process, LoadError> {
    let mut parts = text.split(';').map(str::trim);
    let mut next = |field: &'static str| {
        parts
            .next()
            .filter(|part| !part.is_empty() || field == FIELDS[0])
            .ok_or(LoadError::MissingField { line, field })
    };

    let label = next(FIELDS[0])?;
    if label.is_empty() {
        return Err(LoadError::EmptyLabel { line });
    }
    let burst = parse_int(line, FIELDS[1], next(FIELDS[1])?)?;
    let arrival = parse_int(line, FIELDS[2], next(FIELDS[2])?)?;
    let queue = parse_int(line, FIELDS[3], next(FIELDS[3])?)?;
    let priority = parse_int(line, FIELDS[4], next(FIELDS[4])?)?;

    if burst <= 0 {
        return Err(LoadError::NonPositiveBurst { line, value: burst });
    }
    if arrival < 0 {
        return Err(LoadError::NegativeArrival {
            line,
            value: arrival,
        });
    }
    let level =
        QueueLevel::try_from(queue).map_err(|value| LoadError::InvalidQueue { line, value })?;

    Ok(Process::new(
        label,
        burst as u64,
        arrival as u64,
        level,
        priority,
    ))
}

fn parse_int(line: usize, field: &'static str, value: &str) -> Result<i64, LoadError> {
    value.parse().map_err(|_| LoadError::InvalidNumber {
        line,
        field,
        value: value.to_owned(),
    })
}
