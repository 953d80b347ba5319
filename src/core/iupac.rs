const DNA_BITMASK_A: u8 = 1;
const DNA_BITMASK_C: u8 = 2;
const DNA_BITMASK_G: u8 = 4;
const DNA_BITMASK_T: u8 = 8;
const DNA_BITMASK_N: u8 = DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T;

/// A 4-bit IUB ambiguity code, one bit per base
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IupacCode(u8);

impl IupacCode {
    #[must_use]
    pub fn new(bitmask: u8) -> Self {
        Self(bitmask & DNA_BITMASK_N)
    }

    /// Code for a nucleotide letter; unknown letters map to the empty code
    #[inline]
    #[must_use]
    pub fn from_letter(letter: u8) -> Self {
        match letter.to_ascii_uppercase() {
            b'A' => Self(DNA_BITMASK_A),
            b'C' => Self(DNA_BITMASK_C),
            b'G' => Self(DNA_BITMASK_G),
            b'T' | b'U' => Self(DNA_BITMASK_T),
            b'W' => Self(DNA_BITMASK_A | DNA_BITMASK_T),
            b'S' => Self(DNA_BITMASK_C | DNA_BITMASK_G),
            b'M' => Self(DNA_BITMASK_A | DNA_BITMASK_C),
            b'K' => Self(DNA_BITMASK_G | DNA_BITMASK_T),
            b'R' => Self(DNA_BITMASK_A | DNA_BITMASK_G),
            b'Y' => Self(DNA_BITMASK_C | DNA_BITMASK_T),
            b'B' => Self(DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T),
            b'D' => Self(DNA_BITMASK_A | DNA_BITMASK_G | DNA_BITMASK_T),
            b'H' => Self(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_T),
            b'V' => Self(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G),
            b'N' => Self(DNA_BITMASK_N),
            _ => Self(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when the two codes share at least one base
    #[inline]
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Code of the complementary strand
    #[must_use]
    pub fn complement(self) -> Self {
        let mut bits = 0;
        if self.0 & DNA_BITMASK_A != 0 {
            bits |= DNA_BITMASK_T;
        }
        if self.0 & DNA_BITMASK_C != 0 {
            bits |= DNA_BITMASK_G;
        }
        if self.0 & DNA_BITMASK_G != 0 {
            bits |= DNA_BITMASK_C;
        }
        if self.0 & DNA_BITMASK_T != 0 {
            bits |= DNA_BITMASK_A;
        }
        Self(bits)
    }

    #[must_use]
    pub fn is_valid_letter(letter: u8) -> bool {
        !Self::from_letter(letter).is_empty()
    }

    /// Complementary IUB letter; letters outside the code are returned as-is
    #[must_use]
    pub fn letter_complement(letter: u8) -> u8 {
        match letter.to_ascii_uppercase() {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' | b'U' => b'A',
            b'R' => b'Y',
            b'Y' => b'R',
            b'K' => b'M',
            b'M' => b'K',
            b'B' => b'V',
            b'V' => b'B',
            b'D' => b'H',
            b'H' => b'D',
            other => other,
        }
    }
}

/// Reverse complement of a nucleotide string using IUB complement rules
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| IupacCode::letter_complement(b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base2iupac() {
        assert!(IupacCode::from_letter(b'V').overlaps(IupacCode::from_letter(b'G')));
        assert!(!IupacCode::from_letter(b'H').overlaps(IupacCode::from_letter(b'G')));
        assert_eq!(IupacCode::from_letter(b'U'), IupacCode::new(DNA_BITMASK_T));
        assert!(IupacCode::from_letter(b'X').is_empty());
        assert!(IupacCode::is_valid_letter(b'n'));
        assert!(!IupacCode::is_valid_letter(b'*'));
    }

    #[test]
    fn test_complement_codes() {
        assert_eq!(
            IupacCode::from_letter(b'R').complement(),
            IupacCode::from_letter(b'Y')
        );
        assert_eq!(
            IupacCode::from_letter(b'N').complement(),
            IupacCode::from_letter(b'N')
        );
        assert_eq!(
            IupacCode::from_letter(b'B').complement(),
            IupacCode::from_letter(b'V')
        );
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"GAATTC"), b"GAATTC".to_vec());
        assert_eq!(reverse_complement(b"AACG"), b"CGTT".to_vec());
        assert_eq!(reverse_complement(b"RYN"), b"NRY".to_vec());
    }
}
