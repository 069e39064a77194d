pub mod models;
pub mod repository;

pub use models::{Event, EventInput};
pub use repository::{EventRepository, MemoryEventRepository};
