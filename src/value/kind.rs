//! Value kinds and explicit kind sets used as registry keys.

use std::fmt;

/// Kind is the structural category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Null,
    Scalar,
    Sequence,
    Tuple,
    Set,
    Mapping,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 6] = [
        Kind::Null,
        Kind::Scalar,
        Kind::Sequence,
        Kind::Tuple,
        Kind::Set,
        Kind::Mapping,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Tuple => "tuple",
            Kind::Set => "set",
            Kind::Mapping => "mapping",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// KindSet is an explicit, finite set of kinds.
///
/// Bulk rule registration takes one of these for each side and installs the
/// rule for every pair of the Cartesian product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindSet {
    bits: u8,
}

impl KindSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        KindSet { bits: 0 }
    }

    /// Creates a set holding every kind.
    pub fn all() -> Self {
        Kind::ALL.into()
    }

    pub fn insert(&mut self, kind: Kind) {
        self.bits |= kind.bit();
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.bits & kind.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the kinds in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Returns every (left, right) pair of `self × right`.
    pub fn product(&self, right: &KindSet) -> Vec<(Kind, Kind)> {
        self.iter()
            .flat_map(|l| right.iter().map(move |r| (l, r)))
            .collect()
    }
}

impl From<Kind> for KindSet {
    fn from(kind: Kind) -> Self {
        KindSet { bits: kind.bit() }
    }
}

impl From<&[Kind]> for KindSet {
    fn from(kinds: &[Kind]) -> Self {
        kinds.iter().copied().collect()
    }
}

impl<const N: usize> From<[Kind; N]> for KindSet {
    fn from(kinds: [Kind; N]) -> Self {
        kinds.into_iter().collect()
    }
}

impl FromIterator<Kind> for KindSet {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        let mut set = KindSet::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, "}}")
    }
}
