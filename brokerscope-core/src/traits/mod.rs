mod clock;
mod collector;
mod store;

pub use clock::{IClock, ManualClock, SystemClock};
pub use collector::IBrokerCollector;
pub use store::IMetricsStore;
