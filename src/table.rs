use std::{ops::RangeInclusive, str::FromStr};

use anyhow::{bail, ensure, Context, Result};
use itertools::Itertools;

/// Which rows of the page to turn into `case` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Unprefixed opcodes.
    Main,
    /// Opcodes after the `0xCB` prefix byte.
    Cb,
    Rows { start: usize, end_inclusive: usize },
    // todo: locate the tables by their caption instead of hardcoding rows,
    // once there's a second page layout to test against.
}

impl Table {
    pub fn rows(self) -> RangeInclusive<usize> {
        match self {
            Table::Main => 1..=16,
            Table::Cb => 18..=33,
            Table::Rows {
                start,
                end_inclusive,
            } => start..=end_inclusive,
        }
    }
}

impl FromStr for Table {
    type Err = anyhow::Error;

    fn from_str(mut s: &str) -> Result<Self> {
        s = s.trim();

        match s {
            "m" | "main" => return Ok(Table::Main),
            "c" | "cb" => return Ok(Table::Cb),
            _ => (),
        }

        if s.contains('.') {
            let (start, end) = s
                .split('.')
                .collect_tuple()
                .context("expected <start>.<end>")?;
            let start = decode_row(start)?;
            let end_inclusive = decode_row(end)?;
            ensure!(start <= end_inclusive, "backwards row range: {s:?}");
            return Ok(Table::Rows {
                start,
                end_inclusive,
            });
        }

        bail!("invalid table: {s:?}");
    }
}

fn decode_row(s: &str) -> Result<usize> {
    s.parse()
        .with_context(|| format!("not a row number: {s:?}"))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("main", Table::Main)]
    #[test_case("m", Table::Main; "short main")]
    #[test_case("cb", Table::Cb)]
    #[test_case(" c ", Table::Cb; "short cb with spaces")]
    #[test_case("1.16", Table::Rows { start: 1, end_inclusive: 16 })]
    #[test_case("5.5", Table::Rows { start: 5, end_inclusive: 5 }; "single row")]
    fn ok(s: &str, expected: Table) {
        assert_eq!(expected, s.parse::<Table>().unwrap());
    }

    #[test_case("")]
    #[test_case("CB"; "uppercase")]
    #[test_case("16.1"; "backwards")]
    #[test_case("1..16"; "rust range")]
    #[test_case("1.x")]
    #[test_case("-1.3"; "negative")]
    #[test_case("0x1.0x10"; "hex")]
    fn err(s: &str) {
        assert!(s.parse::<Table>().is_err());
    }

    #[test]
    fn rows() {
        assert_eq!(Table::Main.rows(), 1..=16);
        assert_eq!(Table::Cb.rows(), 18..=33);
        assert_eq!(Table::Main.rows().count(), Table::Cb.rows().count());
    }
}
