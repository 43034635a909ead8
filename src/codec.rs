use serde::Deserialize;

/// Digit alphabet used when turning bytes into hex text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    #[default]
    Lower,
    Upper,
}

// two digits per byte, no prefix
pub fn encode(bytes: &[u8], case: HexCase) -> String {
    match case {
        HexCase::Lower => hex::encode(bytes),
        HexCase::Upper => hex::encode_upper(bytes),
    }
}

// `0x` + encode(bytes); hash-like fields always go through here in lowercase
pub fn encode_prefixed(bytes: &[u8], case: HexCase) -> String {
    let mut s = String::with_capacity(bytes.len() * 2 + 2);
    s.push_str("0x");
    s.push_str(&encode(bytes, case));
    s
}

/// Short display tag for a hash: `0x` followed by the first `digits` hex
/// characters and an ellipsis. Hashes shorter than that are shown whole.
pub fn short_tag(bytes: &[u8], digits: usize) -> String {
    let full = encode(bytes, HexCase::Lower);
    if full.len() <= digits {
        return format!("0x{full}");
    }
    format!("0x{}...", &full[..digits])
}
