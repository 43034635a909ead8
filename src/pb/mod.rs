// Wire messages for the two services the console talks to.
// Field tags must stay in sync with the server's .proto files.

pub mod blockmeta;      // eth.block_meta.v1 (value stored under month:first:/month:last: keys)
pub mod kv;             // sf.substreams.sink.kv.v1.Kv
pub mod service;        // eth.service.v1.BlockMeta
