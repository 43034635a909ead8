pub mod lookup;         // key lookups feeding the exchange log
pub mod range;          // month-range search feeding the period table
