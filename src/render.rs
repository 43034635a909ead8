//! Pure text rendering of the session state for the console.

use crate::{
    codec,
    controllers::range::models::{BlockRef, PeriodSummary},
    exchange::{Classification, ExchangeEntry, ExchangeLog},
    state::RangeState,
};

use std::fmt;

/// Hex digits of a block hash shown in a table cell.
pub const TAG_DIGITS: usize = 9;

pub fn render_entry(entry: &ExchangeEntry) -> String {
    match entry.classification {
        Classification::Request => format!("[{}] Request: {}", entry.query, entry.request_text),
        Classification::Success => format!("[{}] {}", entry.query, entry.response_text),
        Classification::Error   => format!("[{}] Error: {}", entry.query, entry.response_text),
    }
}

pub fn render_log(log: &ExchangeLog) -> Vec<String> {
    log.iter().map(render_entry).collect()
}

/// Linked block reference as shown in the first/last block columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCell {
    pub number:    u64,
    pub href:      String,
    pub tag:       String,
    pub timestamp: String,
}

impl BlockCell {
    pub fn new(block: &BlockRef, explorer_url: &str) -> Self {
        BlockCell {
            number:    block.number,
            href:      format!("{}/block/{}", explorer_url.trim_end_matches('/'), block.number),
            tag:       codec::short_tag(&block.hash, TAG_DIGITS),
            timestamp: block.timestamp.clone(),
        }
    }
}

impl fmt::Display for BlockCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> [{}] @ {}", self.number, self.href, self.tag, self.timestamp)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub date:        String,
    pub first_block: Option<BlockCell>,    // None renders as an empty cell
    pub last_block:  Option<BlockCell>,
}

// one row per summary, in the order the service returned them
pub fn table_rows(rows: &[PeriodSummary], explorer_url: &str) -> Vec<TableRow> {
    rows.iter()
        .map(|p| TableRow {
            date:        format!("{}-{:02}", p.year, p.month),
            first_block: p.first_block.as_ref().map(|b| BlockCell::new(b, explorer_url)),
            last_block:  p.last_block.as_ref().map(|b| BlockCell::new(b, explorer_url)),
        })
        .collect()
}

fn cell(c: &Option<BlockCell>) -> String {
    c.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn render_table(range: &RangeState, explorer_url: &str) -> Vec<String> {
    let mut out = Vec::new();

    let selected = format!(
        "range: {} .. {}",
        range.start.as_deref().unwrap_or("?"),
        range.end.as_deref().unwrap_or("?"),
    );
    let status = if range.loading {
        "loading..."
    } else if range.can_search() {
        "ready"
    } else {
        "search disabled"
    };
    out.push(format!("{selected}  [{status}]"));

    if let Some(err) = &range.error {
        out.push(format!("Error: {err}"));
    }

    out.push("Date    | First Block | Last Block".to_string());
    for row in table_rows(&range.rows, explorer_url) {
        out.push(format!("{} | {} | {}", row.date, cell(&row.first_block), cell(&row.last_block)));
    }
    out
}
