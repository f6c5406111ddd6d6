pub mod driver;
pub mod process;
pub mod workload;

pub use driver::Sim;
pub use process::{Priority, Process};
