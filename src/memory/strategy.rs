/*!
 * Placement Strategies
 * Selection policies over the current partition
 *
 * A strategy only picks a candidate index; splitting and rewriting the
 * partition happen in the memory manager. The one piece of state a strategy
 * touches is the next-fit cursor, which advances whether or not a block is
 * found.
 */

use super::types::MemoryBlock;
use crate::core::types::Size;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Block placement strategy, fixed for the lifetime of a memory manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// First eligible block scanning from the start
    #[default]
    FirstFit,
    /// First eligible block scanning cyclically from just past the previous pick
    NextFit,
    /// Smallest eligible block
    BestFit,
    /// Largest free block, if it is large enough
    WorstFit,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::FirstFit,
        Strategy::NextFit,
        Strategy::BestFit,
        Strategy::WorstFit,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first-fit",
            Self::NextFit => "next-fit",
            Self::BestFit => "best-fit",
            Self::WorstFit => "worst-fit",
        }
    }

    /// Pick a block for `amount` units, or `None` if nothing is eligible
    pub fn select(
        &self,
        partition: &[MemoryBlock],
        amount: Size,
        cursor: &mut usize,
    ) -> Option<usize> {
        match self {
            Self::FirstFit => first_fit(partition, amount),
            Self::NextFit => next_fit(partition, amount, cursor),
            Self::BestFit => best_fit(partition, amount),
            Self::WorstFit => worst_fit(partition, amount),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first-fit" | "first_fit" | "firstfit" | "first" | "ff" | "0" => Ok(Self::FirstFit),
            "next-fit" | "next_fit" | "nextfit" | "next" | "nf" | "1" => Ok(Self::NextFit),
            "best-fit" | "best_fit" | "bestfit" | "best" | "bf" | "2" => Ok(Self::BestFit),
            "worst-fit" | "worst_fit" | "worstfit" | "worst" | "wf" | "3" => Ok(Self::WorstFit),
            _ => Err(format!(
                "Invalid strategy '{s}'. \
                 Valid: first-fit (0), next-fit (1), best-fit (2), worst-fit (3)"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Strategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[inline]
fn fits(block: &MemoryBlock, amount: Size) -> bool {
    block.is_free() && block.size() >= amount
}

pub fn first_fit(partition: &[MemoryBlock], amount: Size) -> Option<usize> {
    partition.iter().position(|b| fits(b, amount))
}

/// Scans once around the partition starting just past `cursor`
pub fn next_fit(partition: &[MemoryBlock], amount: Size, cursor: &mut usize) -> Option<usize> {
    for _ in 0..partition.len() {
        *cursor += 1;
        if *cursor >= partition.len() {
            *cursor = 0;
        }
        if fits(&partition[*cursor], amount) {
            return Some(*cursor);
        }
    }
    None
}

/// Smallest eligible block; exact ties go to the later block
pub fn best_fit(partition: &[MemoryBlock], amount: Size) -> Option<usize> {
    let mut best: Option<(usize, Size)> = None;
    for (idx, block) in partition.iter().enumerate() {
        if !fits(block, amount) {
            continue;
        }
        match best {
            Some((_, size)) if block.size() > size => {}
            _ => best = Some((idx, block.size())),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Largest free block overall, accepted only if it holds `amount`; ties go to the earlier block
pub fn worst_fit(partition: &[MemoryBlock], amount: Size) -> Option<usize> {
    let mut largest: Option<(usize, Size)> = None;
    for (idx, block) in partition.iter().enumerate() {
        if !block.is_free() {
            continue;
        }
        match largest {
            Some((_, size)) if block.size() <= size => {}
            _ => largest = Some((idx, block.size())),
        }
    }
    largest
        .filter(|&(_, size)| size >= amount)
        .map(|(idx, _)| idx)
}
