use crate::pb::service::{Block, Month};

use anyhow::{Context, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRef {
    pub number:    u64,
    pub hash:      Vec<u8>,
    pub timestamp: String,
}

/// First and last block seen in one calendar month. A month with no blocks
/// has neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodSummary {
    pub year:        i32,
    pub month:       u32,
    pub first_block: Option<BlockRef>,
    pub last_block:  Option<BlockRef>,
}

impl From<Block> for BlockRef {
    fn from(b: Block) -> Self {
        BlockRef {
            number:    b.number,
            hash:      b.hash,
            timestamp: b.timestamp,
        }
    }
}

// the service sends year/month as the digits cut out of its keys ("2019", "09")
impl TryFrom<Month> for PeriodSummary {
    type Error = anyhow::Error;

    fn try_from(m: Month) -> Result<Self> {
        let year = m.year.trim().parse::<i32>()
            .with_context(|| format!("bad year `{}`", m.year))?;
        let month = m.month.trim().parse::<u32>()
            .with_context(|| format!("bad month `{}`", m.month))?;

        Ok(PeriodSummary {
            year,
            month,
            first_block: m.first_block.map(Into::into),
            last_block:  m.last_block.map(Into::into),
        })
    }
}
