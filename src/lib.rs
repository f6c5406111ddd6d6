pub mod core;
pub mod io;
pub mod scheduler;
pub mod sim;

pub use crate::core::MlqEvent;
pub use scheduler::{MlqConfig, MlqScheduler, Policy, QueueLevel, simulate, sort_by_label};
pub use sim::{Process, Sim};
