use std::{fmt, io::Write, ops::RangeInclusive, str::FromStr};

use anyhow::{bail, Result};
use itertools::Itertools;
use log::warn;
use thiserror::Error;

use crate::{
    grammar::{self, Rule},
    grid::{Cell, TableGrid},
    hex,
};

/// How a non-blank cell is split into fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Flags, size/cycles and mnemonic rules. See [`grammar`].
    #[default]
    Pattern,
    /// Last 7 chars are the flags, the last two words are size and cycles.
    /// Only works on the page's exact layout.
    FixedOffset,
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pattern" => Ok(Self::Pattern),
            "fixed-offset" | "fixed" => Ok(Self::FixedOffset),
            other => bail!("invalid strategy: {other:?}"),
        }
    }
}

/// What [`write_switch`] does with a cell that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnMismatch {
    #[default]
    Abort,
    /// Write a placeholder block and keep going.
    Skip,
}

impl FromStr for OnMismatch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => bail!("invalid mismatch policy: {other:?}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("rows {start}..={end} out of range: table has {rows} rows")]
    RowsOutOfRange {
        start: usize,
        end: usize,
        rows: usize,
    },

    #[error("cell {index}: no {rule} match in {text:?}")]
    NoMatch {
        index: usize,
        rule: Rule,
        text: String,
    },

    #[error("cell {index}: {text:?} too short for fixed-offset parsing")]
    TooShort { index: usize, text: String },
}

impl ExtractError {
    /// Flat index and raw text of the cell that failed, if a cell failed.
    pub fn cell(&self) -> Option<(usize, &str)> {
        match self {
            Self::RowsOutOfRange { .. } => None,
            Self::NoMatch { index, text, .. } | Self::TooShort { index, text } => {
                Some((*index, text.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Unused opcode slot.
    Blank,
    Described {
        mnemonic: String,
        size: char,
        cycles: String,
        flags: String,
    },
    /// Placeholder for a cell that failed to parse.
    Unparsed { text: String },
}

/// One `case` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeRecord {
    /// Flat position among the cells visited, used as the opcode value.
    pub index: usize,
    pub body: Body,
}

impl OpcodeRecord {
    pub fn label(&self) -> String {
        hex::label(self.index)
    }
}

impl fmt::Display for OpcodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "case {}:", self.label())?;
        match &self.body {
            Body::Blank => (),
            Body::Described {
                mnemonic,
                size,
                cycles,
                flags,
            } => {
                writeln!(f, "\t// {mnemonic}")?;
                writeln!(f, "\t// {size} {cycles}")?;
                writeln!(f, "\t// {flags}")?;
            }
            Body::Unparsed { text } => {
                // Raw cell text may span lines.
                writeln!(f, "\t// unparsed: {}", text.split_whitespace().join(" "))?;
            }
        }
        writeln!(f, "\tbreak;")
    }
}

/// Records for every data cell in `rows`, in row-major order.
///
/// The opcode value is a counter over the cells visited, starting at 0, not
/// the cell's position in the table. Header cells are skipped and don't
/// count.
pub fn extract(
    grid: &TableGrid,
    rows: RangeInclusive<usize>,
    strategy: Strategy,
) -> Result<impl Iterator<Item = Result<OpcodeRecord, ExtractError>> + '_, ExtractError> {
    let (start, end) = rows.into_inner();
    if start > end || end >= grid.len() {
        return Err(ExtractError::RowsOutOfRange {
            start,
            end,
            rows: grid.len(),
        });
    }

    let records = grid.rows()[start..=end]
        .iter()
        .flat_map(|row| row.data_cells())
        .enumerate()
        .map(move |(index, cell)| parse_cell(index, cell, strategy));
    Ok(records)
}

fn parse_cell(index: usize, cell: &Cell, strategy: Strategy) -> Result<OpcodeRecord, ExtractError> {
    if cell.is_blank() {
        return Ok(OpcodeRecord {
            index,
            body: Body::Blank,
        });
    }

    let text = cell.normalized();

    let body = match strategy {
        Strategy::Pattern => by_pattern(&text),
        Strategy::FixedOffset => by_fixed_offset(&text),
    };
    let body = body.map_err(|miss| match miss {
        Miss::NoMatch(rule) => ExtractError::NoMatch {
            index,
            rule,
            text: cell.text.clone(),
        },
        Miss::TooShort => ExtractError::TooShort {
            index,
            text: cell.text.clone(),
        },
    })?;
    Ok(OpcodeRecord { index, body })
}

enum Miss {
    NoMatch(Rule),
    TooShort,
}

fn by_pattern(text: &str) -> Result<Body, Miss> {
    let (flags, rest) = grammar::flags(text).ok_or(Miss::NoMatch(Rule::Flags))?;
    let (size_cycles, rest) =
        grammar::size_cycles(rest).ok_or(Miss::NoMatch(Rule::SizeCycles))?;
    let mnemonic = grammar::mnemonic(rest).ok_or(Miss::NoMatch(Rule::Mnemonic))?;

    Ok(Body::Described {
        mnemonic: mnemonic.to_owned(),
        size: size_cycles.size,
        cycles: size_cycles.cycles,
        flags: flags.to_string(),
    })
}

fn by_fixed_offset(text: &str) -> Result<Body, Miss> {
    const FLAGS_LEN: usize = 7;

    let chars = text.chars().collect_vec();
    let split = chars.len().checked_sub(FLAGS_LEN).ok_or(Miss::TooShort)?;
    let rest: String = chars[..split].iter().collect();
    let flags: String = chars[split..].iter().collect();

    let words = rest.split_whitespace().collect_vec();
    let [init @ .., size_word, cycles] = words.as_slice() else {
        return Err(Miss::TooShort);
    };

    // Size digit is glued to the end of the mnemonic.
    let mut size_word = size_word.chars();
    let size = size_word.next_back().ok_or(Miss::TooShort)?;
    let mnemonic = format!("{}{}", init.concat(), size_word.as_str());
    if mnemonic.is_empty() {
        return Err(Miss::TooShort);
    }

    Ok(Body::Described {
        mnemonic,
        size,
        cycles: cycles.to_string(),
        flags: flags.trim().to_owned(),
    })
}

/// Tally of what [`write_switch`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub blank: usize,
    pub skipped: usize,
}

/// Writes one block per record to `out`.
///
/// With [`OnMismatch::Abort`] the first failed cell is returned as the error;
/// blocks before it have already been written.
pub fn write_switch<W: Write>(
    out: &mut W,
    records: impl IntoIterator<Item = Result<OpcodeRecord, ExtractError>>,
    on_mismatch: OnMismatch,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for record in records {
        let record = match (record, on_mismatch) {
            (Ok(record), _) => record,
            (Err(e), OnMismatch::Skip) => {
                let Some((index, text)) = e.cell().map(|(i, t)| (i, t.to_owned())) else {
                    return Err(e.into());
                };
                warn!("skipping {}: {e}", hex::label(index));
                summary.skipped += 1;
                OpcodeRecord {
                    index,
                    body: Body::Unparsed { text },
                }
            }
            (Err(e), OnMismatch::Abort) => return Err(e.into()),
        };

        if record.body == Body::Blank {
            summary.blank += 1;
        }
        write!(out, "{record}")?;
        summary.written += 1;
    }

    Ok(summary)
}
