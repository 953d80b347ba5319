//! Residue alphabets and bounds-checked per-symbol tables.
//!
//! Every engine table in the crate is indexed through [`symbol_index`]. Bytes
//! outside 7-bit ASCII never index a table directly; they share a single
//! reserved [`OTHER_SLOT`] whose entry is computed as "a residue that no
//! class or literal names".

use serde::{Deserialize, Serialize};

/// Number of addressable symbols (7-bit ASCII)
pub const ALPHABET_SIZE: usize = 128;

/// Table slot shared by every byte outside the alphabet
pub const OTHER_SLOT: usize = ALPHABET_SIZE;

/// Total number of slots in a [`SymbolTable`]
pub const SYMBOL_SLOTS: usize = ALPHABET_SIZE + 1;

/// Map a byte to its alphabet index.
///
/// Returns `None` for bytes outside the alphabet.
#[inline]
#[must_use]
pub fn symbol_index(byte: u8) -> Option<usize> {
    let idx = usize::from(byte);
    (idx < ALPHABET_SIZE).then_some(idx)
}

/// Map a byte to a table slot, sending out-of-alphabet bytes to [`OTHER_SLOT`]
#[inline]
#[must_use]
pub fn symbol_slot(byte: u8) -> usize {
    symbol_index(byte).unwrap_or(OTHER_SLOT)
}

/// A byte that maps to `slot`, for evaluating predicates once per slot.
///
/// [`OTHER_SLOT`] is represented by `0x80`, which no class or literal names.
#[inline]
#[must_use]
pub fn slot_byte(slot: usize) -> u8 {
    u8::try_from(slot).ok().filter(|&b| b < 0x80).unwrap_or(0x80)
}

/// Residue type of a sequence or pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeqType {
    #[default]
    Protein,
    Nucleic,
}

impl SeqType {
    /// The symbol that matches any residue
    #[must_use]
    pub fn dont_care(self) -> u8 {
        match self {
            Self::Protein => b'X',
            Self::Nucleic => b'N',
        }
    }

    /// Residues denoted by an ambiguity letter, if `letter` is one.
    ///
    /// The don't-care symbol is not listed here; it is its own atom kind.
    #[must_use]
    pub fn ambiguity(self, letter: u8) -> Option<&'static [u8]> {
        match self {
            Self::Protein => match letter {
                b'B' => Some(b"DN"),
                b'Z' => Some(b"EQ"),
                _ => None,
            },
            Self::Nucleic => match letter {
                b'B' => Some(b"CGT"),
                b'D' => Some(b"AGT"),
                b'H' => Some(b"ACT"),
                b'K' => Some(b"GT"),
                b'M' => Some(b"AC"),
                b'R' => Some(b"AG"),
                b'S' => Some(b"CG"),
                b'V' => Some(b"ACG"),
                b'W' => Some(b"AT"),
                b'Y' => Some(b"CT"),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for SeqType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Nucleic => write!(f, "nucleic"),
        }
    }
}

/// A fixed-size lookup table with one entry per alphabet symbol plus the
/// shared out-of-alphabet slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable<T> {
    slots: Vec<T>,
}

impl<T: Clone> SymbolTable<T> {
    /// Create a table with every slot set to `fill`
    pub fn new(fill: T) -> Self {
        Self {
            slots: vec![fill; SYMBOL_SLOTS],
        }
    }

    /// Build a table by evaluating `f` for every slot
    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        Self {
            slots: (0..SYMBOL_SLOTS).map(&mut f).collect(),
        }
    }

    /// Entry for the slot `byte` maps to
    #[inline]
    pub fn get(&self, byte: u8) -> &T {
        &self.slots[symbol_slot(byte)]
    }

    /// Mutable entry for the slot `byte` maps to
    #[inline]
    pub fn get_mut(&mut self, byte: u8) -> &mut T {
        &mut self.slots[symbol_slot(byte)]
    }

    /// Entry by slot number; slots past the table read the shared slot
    #[inline]
    pub fn slot(&self, slot: usize) -> &T {
        &self.slots[slot.min(OTHER_SLOT)]
    }
}

impl<T: Copy> SymbolTable<T> {
    /// Copy of the entry for `byte`
    #[inline]
    pub fn lookup(&self, byte: u8) -> T {
        *self.get(byte)
    }
}
