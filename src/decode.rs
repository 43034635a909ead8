use crate::{
    codec::{self, HexCase},
    pb::blockmeta::BlockMeta,
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, SecondsFormat, Utc};
use prost::Message;
use serde_json::json;
use tracing::debug;

/// A block-metadata value as stored by the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedRecord {
    pub height:      u64,
    pub hash:        Vec<u8>,
    pub parent_hash: Vec<u8>,
    pub timestamp:   String,        // RFC 3339, UTC
}

/// Payload that is not a block-metadata record, kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawBytes(pub Vec<u8>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Record(DecodedRecord),
    Raw(RawBytes),
}

/// Strict `BlockMeta` parse.
///
/// prost accepts almost anything (an empty buffer is a valid all-default
/// message), so a record only counts when every field the view shows is
/// present. A well-formed `BlockMeta` with an empty `hash` or `parent_hash`,
/// or with no `timestamp`, is rejected here, and [`decode`] shows it as raw
/// bytes.
pub fn decode_block_meta(buf: &[u8]) -> Result<DecodedRecord> {
    if buf.is_empty() {
        bail!("empty payload");
    }
    let meta = BlockMeta::decode(buf)
        .context("prost decode BlockMeta")?;

    if meta.hash.is_empty() {
        bail!("block meta without hash");
    }
    if meta.parent_hash.is_empty() {
        bail!("block meta without parent hash");
    }
    let ts = meta.timestamp
        .context("block meta without timestamp")?;
    let nanos = u32::try_from(ts.nanos)
        .ok()
        .filter(|n| *n < 1_000_000_000)
        .with_context(|| format!("invalid timestamp nanos {}", ts.nanos))?;
    let when = DateTime::<Utc>::from_timestamp(ts.seconds, nanos)
        .with_context(|| format!("timestamp {}s out of range", ts.seconds))?;

    Ok(DecodedRecord {
        height:      meta.number,
        hash:        meta.hash,
        parent_hash: meta.parent_hash,
        timestamp:   when.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    })
}

/// Interprets a lookup payload. Never fails: anything that is not a
/// well-formed block-metadata record comes back as [`Decoded::Raw`].
pub fn decode(raw: &[u8]) -> Decoded {
    match decode_block_meta(raw) {
        Ok(record) => Decoded::Record(record),
        Err(e) => {
            debug!(len = raw.len(), reason = %e, "payload is not a block meta record");
            Decoded::Raw(RawBytes(raw.to_vec()))
        }
    }
}

impl DecodedRecord {
    // hashes are always lowercase, whatever the raw fallback uses
    pub fn render(&self) -> String {
        let view = json!({
            "height":     self.height,
            "hash":       codec::encode_prefixed(&self.hash, HexCase::Lower),
            "parentHash": codec::encode_prefixed(&self.parent_hash, HexCase::Lower),
            "timestamp":  self.timestamp,
        });
        format!("{:#}", view)
    }
}

impl RawBytes {
    pub fn render(&self, case: HexCase) -> String {
        codec::encode_prefixed(&self.0, case)
    }
}

impl Decoded {
    /// Text shown in the exchange log. `case` only affects the raw fallback.
    pub fn render(&self, case: HexCase) -> String {
        match self {
            Decoded::Record(r) => r.render(),
            Decoded::Raw(b)    => b.render(case),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::Timestamp;

    fn sample() -> BlockMeta {
        BlockMeta {
            number:      46147,
            hash:        hex::decode("4e3a3754410177e6937ef1f84bba68ea139e8d1a2258c5f85db9f1cd715a1bdd").unwrap(),
            parent_hash: hex::decode("5a41d0e66b4120775176c09fcf39e7c0520517a13d2b57b18d33d342df038bfc").unwrap(),
            timestamp:   Some(Timestamp { seconds: 1_438_918_233, nanos: 0 }),
        }
    }

    #[test]
    fn well_formed_record_is_decoded() {
        let bytes = sample().encode_to_vec();
        match decode(&bytes) {
            Decoded::Record(r) => {
                assert_eq!(r.height, 46147);
                assert_eq!(r.timestamp, "2015-08-07T03:30:33Z");
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn record_renders_hashes_as_prefixed_lowercase_hex() {
        let text = decode(&sample().encode_to_vec()).render(HexCase::Upper);
        assert!(text.contains("\"hash\": \"0x4e3a3754410177e6937ef1f84bba68ea139e8d1a2258c5f85db9f1cd715a1bdd\""));
        assert!(text.contains("\"parentHash\": \"0x5a41d0e66b4120775176c09fcf39e7c0520517a13d2b57b18d33d342df038bfc\""));
        assert!(text.contains("\"height\": 46147"));
    }

    #[test]
    fn empty_payload_is_empty_raw() {
        let d = decode(&[]);
        assert_eq!(d, Decoded::Raw(RawBytes(vec![])));
        assert_eq!(d.render(HexCase::Lower), "0x");
    }

    #[test]
    fn truncated_record_falls_back_to_raw() {
        let bytes = sample().encode_to_vec();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).render(HexCase::Lower), format!("0x{}", hex::encode(cut)));
    }

    #[test]
    fn plain_text_value_falls_back_to_raw() {
        let d = decode(b"hello");
        assert_eq!(d.render(HexCase::Lower), "0x68656c6c6f");
        assert_eq!(d.render(HexCase::Upper), "0x68656C6C6F");
    }

    #[test]
    fn record_missing_timestamp_is_not_partially_decoded() {
        let mut meta = sample();
        meta.timestamp = None;
        assert!(matches!(decode(&meta.encode_to_vec()), Decoded::Raw(_)));
    }

    #[test]
    fn record_without_hash_is_shown_raw() {
        let mut meta = sample();
        meta.hash.clear();
        let bytes = meta.encode_to_vec();
        assert!(decode_block_meta(&bytes).is_err());
        assert_eq!(decode(&bytes), Decoded::Raw(RawBytes(bytes)));
    }

    #[test]
    fn out_of_range_nanos_is_rejected() {
        let mut meta = sample();
        meta.timestamp = Some(Timestamp { seconds: 0, nanos: -1 });
        assert!(decode_block_meta(&meta.encode_to_vec()).is_err());
    }
}
