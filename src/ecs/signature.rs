//! Fixed-width component bitset

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Small integer identifying a registered component type. Doubles as the
/// bit position inside a [`Signature`].
pub type ComponentTypeId = u8;

/// One bit per component type. Bit `i` is set when the entity holds a
/// component whose type was assigned id `i`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    /// Number of bits available; the upper bound for `max_components`.
    pub const CAPACITY: usize = u64::BITS as usize;

    pub const EMPTY: Self = Self(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Builder form of [`Signature::set`].
    pub fn with(mut self, id: ComponentTypeId) -> Self {
        self.set(id);
        self
    }

    pub fn set(&mut self, id: ComponentTypeId) {
        self.0 |= Self::bit(id);
    }

    pub fn reset(&mut self, id: ComponentTypeId) {
        self.0 &= !Self::bit(id);
    }

    pub fn test(&self, id: ComponentTypeId) -> bool {
        self.0 & Self::bit(id) != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// `true` when every bit of `required` is also set here, i.e.
    /// `(self & required) == required`.
    pub fn contains(&self, required: Signature) -> bool {
        *self & required == required
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Component type ids present in this signature, ascending.
    pub fn iter(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        let bits = self.0;
        (0..Self::CAPACITY as u32)
            .filter(move |bit| bits & (1 << bit) != 0)
            .map(|bit| bit as ComponentTypeId)
    }

    fn bit(id: ComponentTypeId) -> u64 {
        debug_assert!((id as usize) < Self::CAPACITY);
        1u64 << id
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Self) -> Self::Output {
        Signature(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Self) -> Self::Output {
        Signature(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_reset() {
        let mut sig = Signature::new();
        assert!(sig.is_empty());

        sig.set(3);
        sig.set(31);
        assert!(sig.test(3));
        assert!(sig.test(31));
        assert!(!sig.test(4));
        assert_eq!(sig.count(), 2);

        sig.reset(3);
        assert!(!sig.test(3));
        assert_eq!(sig.iter().collect::<Vec<_>>(), vec![31]);

        sig.clear();
        assert!(sig.is_empty());
    }

    #[test]
    fn test_contains_is_subset_match() {
        let required: Signature = [0, 2].into_iter().collect();
        let entity = Signature::new().with(0).with(1).with(2);
        assert!(entity.contains(required));
        assert!(!Signature::new().with(0).contains(required));

        // every signature satisfies the empty requirement
        assert!(Signature::EMPTY.contains(Signature::EMPTY));
        assert!(entity.contains(Signature::EMPTY));
    }

    #[test]
    fn test_highest_bit() {
        let sig = Signature::new().with(63);
        assert!(sig.test(63));
        assert_eq!(sig.bits(), 1 << 63);
    }
}
