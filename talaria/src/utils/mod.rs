pub use tokio;
pub use tokio::time::sleep;

pub mod events;
pub mod history;
pub mod range;
pub mod scale;
pub mod task;

pub use events::{EventHandler, EventManager};
pub use history::{History, HistoryEntry};
pub use range::Range;
pub use scale::Scalable;
pub use task::{TaskHandler, TaskResult};
