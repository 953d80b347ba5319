use crate::core::bits::SymbolSet;

/// What a single pattern position accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    /// Exactly this residue
    Literal(u8),
    /// Any residue in the set (`[...]`)
    Class(SymbolSet),
    /// Any residue not in the set (`{...}`)
    Complement(SymbolSet),
    /// Any residue at all
    DontCare,
}

impl AtomKind {
    /// Whether a text residue satisfies this position.
    ///
    /// Residues outside the alphabet only satisfy complements and don't-cares.
    #[inline]
    #[must_use]
    pub fn accepts(self, byte: u8) -> bool {
        match self {
            Self::Literal(c) => c == byte,
            Self::Class(set) => set.contains(byte),
            Self::Complement(set) => !set.contains(byte),
            Self::DontCare => true,
        }
    }

    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Repeat range attached to an atom, `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Repeat {
    pub min: usize,
    pub max: usize,
}

impl Repeat {
    pub const ONCE: Self = Self { min: 1, max: 1 };

    #[must_use]
    pub fn is_fixed(self) -> bool {
        self.min == self.max
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::ONCE
    }
}

/// One position of a compiled pattern, possibly repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom {
    pub kind: AtomKind,
    pub repeat: Repeat,
}

impl Atom {
    #[must_use]
    pub fn once(kind: AtomKind) -> Self {
        Self {
            kind,
            repeat: Repeat::ONCE,
        }
    }

    #[must_use]
    pub fn is_ranged(&self) -> bool {
        !self.repeat.is_fixed()
    }

    /// Render the atom in canonical pattern syntax
    #[must_use]
    pub fn render(&self, dont_care: u8) -> String {
        let mut out = String::new();
        match self.kind {
            AtomKind::Literal(c) => out.push(char::from(c)),
            AtomKind::Class(set) => {
                out.push('[');
                out.extend(set.iter().map(char::from));
                out.push(']');
            }
            AtomKind::Complement(set) => {
                out.push('{');
                out.extend(set.iter().map(char::from));
                out.push('}');
            }
            AtomKind::DontCare => out.push(char::from(dont_care)),
        }
        if self.repeat != Repeat::ONCE {
            if self.repeat.is_fixed() {
                out.push_str(&format!("({})", self.repeat.min));
            } else {
                out.push_str(&format!("({},{})", self.repeat.min, self.repeat.max));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts() {
        let class = AtomKind::Class(SymbolSet::from_bytes(b"CG"));
        assert!(class.accepts(b'C'));
        assert!(!class.accepts(b'A'));
        assert!(!class.accepts(0xC3));

        let complement = AtomKind::Complement(SymbolSet::from_bytes(b"P"));
        assert!(complement.accepts(b'A'));
        assert!(!complement.accepts(b'P'));
        assert!(complement.accepts(0xC3));

        assert!(AtomKind::DontCare.accepts(b'*'));
        assert!(AtomKind::Literal(b'W').accepts(b'W'));
    }

    #[test]
    fn test_render() {
        let atom = Atom {
            kind: AtomKind::Class(SymbolSet::from_bytes(b"GC")),
            repeat: Repeat { min: 2, max: 4 },
        };
        assert_eq!(atom.render(b'X'), "[CG](2,4)");
        assert_eq!(Atom::once(AtomKind::DontCare).render(b'N'), "N");
        assert_eq!(
            Atom::once(AtomKind::Complement(SymbolSet::from_bytes(b"P"))).render(b'X'),
            "{P}"
        );
    }
}
