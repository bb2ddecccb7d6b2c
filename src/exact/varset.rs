//! Bitset over variable indices, used as the lattice state type.

use std::fmt;

use crate::oracle::ParentSet;

/// A subset of at most 64 variables, stored as a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarSet(u64);

impl VarSet {
    /// Largest index a `VarSet` can hold, plus one.
    pub const CAPACITY: usize = 64;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// `{0, 1, ..., n - 1}`.
    pub fn full(n: usize) -> Self {
        debug_assert!(n <= Self::CAPACITY);
        if n >= Self::CAPACITY {
            Self(u64::MAX)
        } else {
            Self((1u64 << n) - 1)
        }
    }

    pub fn singleton(i: usize) -> Self {
        Self(1u64 << i)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn contains(self, i: usize) -> bool {
        i < Self::CAPACITY && self.0 & (1u64 << i) != 0
    }

    pub fn with(self, i: usize) -> Self {
        Self(self.0 | (1u64 << i))
    }

    pub fn without(self, i: usize) -> Self {
        Self(self.0 & !(1u64 << i))
    }

    pub fn union(self, other: VarSet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(self, other: VarSet) -> Self {
        Self(self.0 & other.0)
    }

    /// Members of `self` not in `other`.
    pub fn difference(self, other: VarSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn is_subset(self, other: VarSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let i = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(i)
        })
    }

    pub fn to_parent_set(self) -> ParentSet {
        self.iter().collect()
    }
}

impl FromIterator<usize> for VarSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        iter.into_iter().fold(VarSet::empty(), VarSet::with)
    }
}

impl fmt::Debug for VarSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let s: VarSet = [0, 3, 5].into_iter().collect();
        assert_eq!(s.len(), 3);
        assert!(s.contains(3));
        assert!(!s.contains(4));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 3, 5]);
        assert_eq!(s.without(3).with(1).iter().collect::<Vec<_>>(), vec![0, 1, 5]);
        assert!(VarSet::singleton(5).is_subset(s));
        assert_eq!(s.difference(VarSet::singleton(0)).len(), 2);
    }

    #[test]
    fn test_full() {
        assert_eq!(VarSet::full(0), VarSet::empty());
        assert_eq!(VarSet::full(3).bits(), 0b111);
        assert_eq!(VarSet::full(64).len(), 64);
    }

    #[test]
    fn test_to_parent_set() {
        let s: VarSet = [4, 1].into_iter().collect();
        assert_eq!(s.to_parent_set().as_slice(), &[1, 4]);
    }
}
