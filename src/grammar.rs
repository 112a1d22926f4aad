//! Field rules for one opcode cell.
//!
//! The page renders a cell as `MNEMONIC<br>SIZE&nbsp;&nbsp;CYCLES<br>FLAGS`, so
//! once the text nodes are joined the fields run into each other
//! (`LD BC,d163  12- - - -`). Operands contain digits, so the rules are
//! applied from the right: flags, then size/cycles, then the mnemonic from
//! whatever is left.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Which field a rule extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Mnemonic,
    SizeCycles,
    Flags,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Mnemonic => "mnemonic",
            Rule::SizeCycles => "size/cycles",
            Rule::Flags => "flags",
        };
        f.write_str(name)
    }
}

/// Effect on Z, N, H and C. Each is the flag letter, `0`, `1`, or `-` for
/// unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub z: char,
    pub n: char,
    pub h: char,
    pub c: char,
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { z, n, h, c } = self;
        write!(f, "{z} {n} {h} {c}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCycles {
    /// Instruction length in bytes.
    pub size: char,
    /// Either `4` or, for conditional instructions, `taken/not-taken`.
    pub cycles: String,
}

impl fmt::Display for SizeCycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.size, self.cycles)
    }
}

static FLAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([Z01-])\s+([N10-])\s+([H01-])\s+([01C-])\s*$").unwrap());

static SIZE_CYCLES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s+(\d+(?:/\d+)?)\s*$").unwrap());

static MNEMONIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z]+(?:\s+[\w()+\-]+)?(?:,\s*[\w()+\-]+)?)").unwrap()
});

/// Flags at the end of `s`, plus the text before them.
pub fn flags(s: &str) -> Option<(Flags, &str)> {
    let caps = FLAGS.captures(s)?;
    let flag = |i: usize| caps[i].chars().next();
    let flags = Flags {
        z: flag(1)?,
        n: flag(2)?,
        h: flag(3)?,
        c: flag(4)?,
    };
    let start = caps.get(0)?.start();
    Some((flags, &s[..start]))
}

/// Size and cycle count at the end of `s`, plus the text before them.
pub fn size_cycles(s: &str) -> Option<(SizeCycles, &str)> {
    let caps = SIZE_CYCLES.captures(s)?;
    let size = caps[1].chars().next()?;
    let cycles = caps[2].to_owned();
    let start = caps.get(0)?.start();
    Some((SizeCycles { size, cycles }, &s[..start]))
}

/// Mnemonic with up to two operands at the start of `s`.
pub fn mnemonic(s: &str) -> Option<&str> {
    MNEMONIC.captures(s)?.get(1).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("NOP1  4- - - -", "- - - -", "NOP1  4")]
    #[test_case("INC B1  4Z 0 H -", "Z 0 H -", "INC B1  4")]
    #[test_case("RLCA1  40 0 0 C", "0 0 0 C", "RLCA1  4"; "digit flag after cycles")]
    #[test_case("LD HL,SP+r82  120 0 H C", "0 0 H C", "LD HL,SP+r82  12")]
    #[test_case("CPL1  4- 1 1 - ", "- 1 1 -", "CPL1  4"; "trailing space")]
    fn flags_ok(s: &str, expected: &str, rest: &str) {
        let (flags, actual_rest) = flags(s).unwrap();
        assert_eq!(expected, flags.to_string());
        assert_eq!(rest, actual_rest);
    }

    #[test_case("NOP1  4"; "no flags")]
    #[test_case("NOP1  4X 0 H -"; "bad zero flag")]
    #[test_case("NOP1  4- - -"; "three flags")]
    #[test_case("NOP1  4- - - - extra"; "not at end")]
    fn flags_err(s: &str) {
        assert!(flags(s).is_none());
    }

    #[test]
    fn flags_fields() {
        let (flags, _) = flags("SCF1  4- 0 0 1").unwrap();
        assert_eq!(
            flags,
            Flags {
                z: '-',
                n: '0',
                h: '0',
                c: '1'
            }
        );
    }

    #[test_case("NOP1  4", '1', "4", "NOP")]
    #[test_case("NOP 1 4", '1', "4", "NOP "; "single spaces")]
    #[test_case("LD BC,d163  12", '3', "12", "LD BC,d16")]
    #[test_case("STOP 02  4", '2', "4", "STOP 0"; "digit operand")]
    #[test_case("JR NZ,r82  12/8", '2', "12/8", "JR NZ,r8"; "conditional cycles")]
    #[test_case("CALL Z,a163  24/12 ", '3', "24/12", "CALL Z,a16"; "trailing space")]
    fn size_cycles_ok(s: &str, size: char, cycles: &str, rest: &str) {
        let (actual, actual_rest) = size_cycles(s).unwrap();
        assert_eq!(size, actual.size);
        assert_eq!(cycles, actual.cycles);
        assert_eq!(rest, actual_rest);
    }

    #[test_case("NOP"; "no numbers")]
    #[test_case("NOP14"; "no separator")]
    #[test_case("NOP 1 4 x"; "not at end")]
    fn size_cycles_err(s: &str) {
        assert!(size_cycles(s).is_none());
    }

    #[test_case("NOP", "NOP")]
    #[test_case("NOP ", "NOP"; "trailing space")]
    #[test_case("  HALT", "HALT"; "leading space")]
    #[test_case("INC B", "INC B")]
    #[test_case("LD (BC),A", "LD (BC),A")]
    #[test_case("LD (HL+),A", "LD (HL+),A")]
    #[test_case("LD HL,SP+r8", "LD HL,SP+r8")]
    #[test_case("LD A, B", "LD A, B"; "space after comma")]
    #[test_case("PREFIX CB", "PREFIX CB")]
    #[test_case("RST 38H", "RST 38H")]
    #[test_case("STOP 0", "STOP 0")]
    #[test_case("BIT 7,(HL)", "BIT 7,(HL)")]
    fn mnemonic_ok(s: &str, expected: &str) {
        assert_eq!(Some(expected), mnemonic(s));
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "whitespace")]
    #[test_case("12 34"; "digits")]
    #[test_case("(HL)"; "operand only")]
    fn mnemonic_err(s: &str) {
        assert!(mnemonic(s).is_none());
    }
}
