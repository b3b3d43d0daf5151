//! Combination rules
//!
//! A combination rule is one of the 16 boolean functions of two inputs,
//! applied bitwise to a source word and a destination word. The code is
//! the truth table itself: bit `3 - (2 * s + d)` of the code is the result
//! for source bit `s` and destination bit `d`.
//!
//! | code | result           | code | result            |
//! |------|------------------|------|-------------------|
//! | 0    | 0                | 8    | !(s \| d)         |
//! | 1    | s & d            | 9    | !(s ^ d)          |
//! | 2    | s & !d           | 10   | !d                |
//! | 3    | s                | 11   | s \| !d           |
//! | 4    | !s & d           | 12   | !s                |
//! | 5    | d                | 13   | !s \| d           |
//! | 6    | s ^ d            | 14   | !(s & d)          |
//! | 7    | s \| d           | 15   | 1                 |

use std::fmt;

use super::BitBltError;

/// One of the 16 two-input boolean merge functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombinationRule(u8);

impl CombinationRule {
    pub const ERASE: Self = Self(0);
    pub const AND: Self = Self(1);
    pub const AND_INVERTED_DEST: Self = Self(2);
    pub const STORE: Self = Self(3);
    pub const ERASE_SOURCE: Self = Self(4);
    pub const NO_OP: Self = Self(5);
    pub const XOR: Self = Self(6);
    pub const OR: Self = Self(7);
    pub const NOR: Self = Self(8);
    pub const XNOR: Self = Self(9);
    pub const INVERT_DEST: Self = Self(10);
    pub const OR_INVERTED_DEST: Self = Self(11);
    pub const INVERT_SOURCE: Self = Self(12);
    pub const OR_INVERTED_SOURCE: Self = Self(13);
    pub const NAND: Self = Self(14);
    pub const FILL: Self = Self(15);

    /// Every rule, in code order.
    pub const ALL: [Self; 16] = [
        Self::ERASE,
        Self::AND,
        Self::AND_INVERTED_DEST,
        Self::STORE,
        Self::ERASE_SOURCE,
        Self::NO_OP,
        Self::XOR,
        Self::OR,
        Self::NOR,
        Self::XNOR,
        Self::INVERT_DEST,
        Self::OR_INVERTED_DEST,
        Self::INVERT_SOURCE,
        Self::OR_INVERTED_SOURCE,
        Self::NAND,
        Self::FILL,
    ];

    /// Rule from its numeric code (0..=15).
    pub fn new(code: i32) -> Result<Self, BitBltError> {
        match u8::try_from(code) {
            Ok(code) if code < 16 => Ok(Self(code)),
            _ => Err(BitBltError::InvalidRule(code)),
        }
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// Combine a source word with a destination word.
    #[inline]
    pub fn merge(self, source: u16, destination: u16) -> u16 {
        let (s, d) = (source, destination);
        match self.0 {
            0 => 0,
            1 => s & d,
            2 => s & !d,
            3 => s,
            4 => !s & d,
            5 => d,
            6 => s ^ d,
            7 => s | d,
            8 => !s & !d,
            9 => !s ^ d,
            10 => !d,
            11 => s | !d,
            12 => !s,
            13 => !s | d,
            14 => !s | !d,
            _ => 0xFFFF,
        }
    }

    /// Result for a single source bit and destination bit.
    pub fn apply_bit(self, source: bool, destination: bool) -> bool {
        let row = 2 * source as u8 + destination as u8;
        (self.0 >> (3 - row)) & 1 == 1
    }

    /// Whether the result depends on the source at all.
    pub fn uses_source(self) -> bool {
        !matches!(self.0, 0 | 5 | 10 | 15)
    }
}

impl Default for CombinationRule {
    fn default() -> Self {
        Self::STORE
    }
}

impl TryFrom<i32> for CombinationRule {
    type Error = BitBltError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0 => "erase",
            1 => "and",
            2 => "and-inverted-dest",
            3 => "store",
            4 => "erase-source",
            5 => "no-op",
            6 => "xor",
            7 => "or",
            8 => "nor",
            9 => "xnor",
            10 => "invert-dest",
            11 => "or-inverted-dest",
            12 => "invert-source",
            13 => "or-inverted-source",
            14 => "nand",
            _ => "fill",
        };
        write!(f, "{} ({})", name, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_codes() {
        for (code, rule) in CombinationRule::ALL.iter().enumerate() {
            assert_eq!(rule.code() as usize, code);
            assert_eq!(CombinationRule::new(code as i32).unwrap(), *rule);
        }
    }

    #[test]
    fn test_invalid_codes() {
        assert_eq!(CombinationRule::new(16), Err(BitBltError::InvalidRule(16)));
        assert_eq!(CombinationRule::new(-1), Err(BitBltError::InvalidRule(-1)));
        assert!(CombinationRule::try_from(300).is_err());
    }

    #[test]
    fn test_merge_matches_bit_table() {
        let source = 0b1100;
        let destination = 0b1010;
        for rule in CombinationRule::ALL {
            let merged = rule.merge(source, destination);
            for bit in 0..4 {
                let s = source >> bit & 1 == 1;
                let d = destination >> bit & 1 == 1;
                assert_eq!(
                    merged >> bit & 1 == 1,
                    rule.apply_bit(s, d),
                    "rule {} bit {}",
                    rule,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_named_rules() {
        assert_eq!(CombinationRule::ERASE.merge(0xFFFF, 0xFFFF), 0);
        assert_eq!(CombinationRule::STORE.merge(0x1234, 0xFFFF), 0x1234);
        assert_eq!(CombinationRule::XOR.merge(0xFF00, 0x0FF0), 0xF0F0);
        assert_eq!(CombinationRule::OR.merge(0xFF00, 0x00F0), 0xFFF0);
        assert_eq!(CombinationRule::FILL.merge(0, 0), 0xFFFF);
        assert_eq!(CombinationRule::NO_OP.merge(0xFFFF, 0x0F0F), 0x0F0F);
    }

    #[test]
    fn test_uses_source() {
        assert!(!CombinationRule::ERASE.uses_source());
        assert!(!CombinationRule::INVERT_DEST.uses_source());
        assert!(CombinationRule::STORE.uses_source());
        assert!(CombinationRule::NAND.uses_source());
    }

    #[test]
    fn test_display() {
        assert_eq!(CombinationRule::XOR.to_string(), "xor (6)");
        assert_eq!(CombinationRule::default(), CombinationRule::STORE);
    }
}
