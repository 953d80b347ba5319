//! Fixed-width bit types used by the search engines.
//!
//! All bit manipulation in the crate goes through [`SymbolSet`] and
//! [`WordMask`]; engines never shift raw integers themselves.

use crate::core::alphabet::{symbol_index, ALPHABET_SIZE};

/// Machine word width for the bit-parallel engines
pub const WORD_SIZE: usize = 32;

/// A set of alphabet symbols, one bit per 7-bit ASCII code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolSet(u128);

impl SymbolSet {
    pub const EMPTY: Self = Self(0);

    /// Build a set from residue bytes; bytes outside the alphabet are ignored
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::EMPTY;
        for &b in bytes {
            set.insert(b);
        }
        set
    }

    pub fn insert(&mut self, byte: u8) {
        if let Some(idx) = symbol_index(byte) {
            self.0 |= 1u128 << idx;
        }
    }

    /// Membership test; out-of-alphabet bytes are never members
    #[inline]
    #[must_use]
    pub fn contains(self, byte: u8) -> bool {
        symbol_index(byte).is_some_and(|idx| self.0 & (1u128 << idx) != 0)
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ascending byte order
    #[allow(clippy::cast_possible_truncation)] // idx < 128
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..ALPHABET_SIZE)
            .filter(move |&idx| self.0 & (1u128 << idx) != 0)
            .map(|idx| idx as u8)
    }
}

/// One machine word of bit-parallel state or a per-symbol mask.
///
/// In the shift-or formulation a 0 bit at position `i` means "pattern
/// positions `0..=i` match the text ending here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMask(u32);

impl WordMask {
    /// Every bit set: no pattern position matches
    pub const ALL: Self = Self(u32::MAX);

    /// Mark pattern position `pos` as matching
    ///
    /// `pos` must be below [`WORD_SIZE`].
    pub fn clear(&mut self, pos: usize) {
        debug_assert!(pos < WORD_SIZE);
        self.0 &= !(1u32 << pos);
    }

    #[must_use]
    pub fn is_clear(self, pos: usize) -> bool {
        pos < WORD_SIZE && self.0 & (1u32 << pos) == 0
    }

    /// Advance the state by one text symbol
    #[inline]
    #[must_use]
    pub fn shift_in(self, mask: Self) -> Self {
        Self((self.0 << 1) | mask.0)
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Acceptance threshold for a shift-or state over a pattern of a given length.
///
/// A state is a match exactly when it compares below the limit, i.e. when
/// the bit for the last pattern position is clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimit(u32);

impl MatchLimit {
    /// Limit for a pattern of `length` positions (1..=[`WORD_SIZE`])
    #[must_use]
    pub fn for_length(length: usize) -> Self {
        debug_assert!((1..=WORD_SIZE).contains(&length));
        let occupied = if length >= WORD_SIZE {
            u32::MAX
        } else {
            (1u32 << length) - 1
        };
        Self(!(occupied >> 1))
    }

    #[inline]
    #[must_use]
    pub fn accepts(self, state: WordMask) -> bool {
        state.0 < self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_set_membership() {
        let set = SymbolSet::from_bytes(b"ACG");
        assert!(set.contains(b'A'));
        assert!(!set.contains(b'T'));
        assert!(!set.contains(0xC1));
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), b"ACG".to_vec());
        assert!(SymbolSet::EMPTY.is_empty());
    }

    #[test]
    fn test_word_mask_shift() {
        let mut mask = WordMask::ALL;
        mask.clear(0);
        assert!(mask.is_clear(0));
        assert!(!mask.is_clear(1));
        let state = WordMask::ALL.shift_in(mask);
        assert_eq!(state.bits(), u32::MAX - 1);
    }

    #[test]
    fn test_match_limit_single_position() {
        let limit = MatchLimit::for_length(1);
        let mut mask = WordMask::ALL;
        mask.clear(0);
        assert!(limit.accepts(WordMask::ALL.shift_in(mask)));
        assert!(!limit.accepts(WordMask::ALL));
    }

    #[test]
    fn test_match_limit_full_word() {
        let limit = MatchLimit::for_length(WORD_SIZE);
        assert!(limit.accepts(WordMask(0x7fff_ffff)));
        assert!(!limit.accepts(WordMask(0x8000_0000)));
    }
}
