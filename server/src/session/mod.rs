pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{SessionStore, SESSION_TTL_HOURS};
