pub mod loader;
pub mod report;

pub use loader::{LoadError, load_processes, parse_processes};
pub use report::{Summary, output_path, write_report};
