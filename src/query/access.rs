//! Read/write access sets over component and resource type-id spaces.

use fixedbitset::FixedBitSet;

use crate::component;
use crate::resource;

/// The four bitsets a system or ad-hoc query derives from its declared terms:
/// `c_read`/`c_write` over the component-id space, `r_read`/`r_write` over the
/// resource-id space.
///
/// Two [`Access`] sets conflict iff one writes a type the other reads or writes, over
/// either space. See [`Access::conflicts_with`].
#[derive(Debug, Default, Clone)]
pub struct Access {
    c_read: FixedBitSet,
    c_write: FixedBitSet,
    r_read: FixedBitSet,
    r_write: FixedBitSet,
}

impl Access {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read_component(&mut self, id: component::Id) {
        grow_and_set(&mut self.c_read, id.index());
    }

    pub(crate) fn write_component(&mut self, id: component::Id) {
        grow_and_set(&mut self.c_write, id.index());
    }

    pub(crate) fn read_resource(&mut self, id: resource::Id) {
        grow_and_set(&mut self.r_read, id.index());
    }

    pub(crate) fn write_resource(&mut self, id: resource::Id) {
        grow_and_set(&mut self.r_write, id.index());
    }

    /// `conflict(A, B) = (A.c_write ∩ B.c_write) ∪ (A.c_write ∩ B.c_read) ∪ (B.c_write ∩ A.c_read) ≠ ∅`,
    /// and the same over `r_read`/`r_write`. Two reads never conflict.
    pub fn conflicts_with(&self, other: &Access) -> bool {
        any_overlap(&self.c_write, &other.c_write)
            || any_overlap(&self.c_write, &other.c_read)
            || any_overlap(&other.c_write, &self.c_read)
            || any_overlap(&self.r_write, &other.r_write)
            || any_overlap(&self.r_write, &other.r_read)
            || any_overlap(&other.r_write, &self.r_read)
    }
}

fn grow_and_set(set: &mut FixedBitSet, bit: usize) {
    if bit >= set.len() {
        set.grow(bit + 1);
    }
    set.insert(bit);
}

fn any_overlap(a: &FixedBitSet, b: &FixedBitSet) -> bool {
    a.ones().any(|bit| b.contains(bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_reads_never_conflict() {
        // Given
        let mut a = Access::new();
        let mut b = Access::new();
        a.read_component(component::Id::new(0));
        b.read_component(component::Id::new(0));

        // Then
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn write_against_read_conflicts() {
        // Given
        let mut a = Access::new();
        let mut b = Access::new();
        a.write_component(component::Id::new(0));
        b.read_component(component::Id::new(0));

        // Then
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn writes_to_different_components_do_not_conflict() {
        // Given
        let mut a = Access::new();
        let mut b = Access::new();
        a.write_component(component::Id::new(0));
        b.write_component(component::Id::new(1));

        // Then
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn resource_writes_conflict_independently_of_component_space() {
        // Given
        let mut a = Access::new();
        let mut b = Access::new();
        a.write_resource(resource::Id::new(0));
        b.read_resource(resource::Id::new(0));

        // Then
        assert!(a.conflicts_with(&b));
    }
}
