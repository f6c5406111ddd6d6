pub mod driver;
pub mod event;
pub mod observer;
pub mod queue;
pub mod state;

pub use driver::MlqCore;
pub use event::MlqEvent;
pub use queue::{PrioKey, ReadyQueue, Seq};
pub use state::{MlqCtx, Occupancy, TaskId, Ticks};
