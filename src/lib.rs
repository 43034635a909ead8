pub mod codec;          // bytes -> hex text, lower or upper case
pub mod config;         // loads console.toml, env overrides for endpoints
pub mod controllers;    // lookup + range controllers driving the session state
pub mod decode;         // BlockMeta payload decoding with raw hex fallback
pub mod error;          // Connect status codes and RPC error rendering
pub mod exchange;       // append-only exchange log
pub mod pb;             // prost wire messages
pub mod render;         // state -> text lines / table rows
pub mod state;          // observable session state
pub mod transport;      // client capability traits + Connect-over-HTTP client
pub mod mode;           // interactive front ends
