pub mod models;
pub mod src;

pub use models::{QueryState, normalize_key, query_state};
pub use src::LookupController;
