pub mod models;
pub mod src;

pub use models::{BlockRef, PeriodSummary};
pub use src::RangeView;
