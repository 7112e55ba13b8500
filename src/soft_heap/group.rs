//! Element groups: the bags of elements moved between nodes during a sift.

use super::node::CorruptionLog;
use smallvec::SmallVec;

/// Nodes of rank at most `r` never hold more than one element, so almost every
/// bag fits inline.
type Elements<T> = SmallVec<[T; 2]>;

/// A bag of elements sharing one upper-bound key.
///
/// Every element in the bag is at most `ckey`. Elements strictly below `ckey`
/// are corrupted: they will be reported at a larger key than their own.
/// `ckey_present` is set exactly when an element equal to `ckey` is still in
/// the bag.
#[derive(Debug, Clone)]
pub(crate) struct ElementGroup<T> {
    elements: Elements<T>,
    ckey: T,
    ckey_present: bool,
}

impl<T: Ord + Clone> ElementGroup<T> {
    /// A bag holding a single element, which is also its own ckey.
    pub(crate) fn singleton(item: T) -> Self {
        let mut elements = Elements::new();
        elements.push(item.clone());
        Self {
            elements,
            ckey: item,
            ckey_present: true,
        }
    }

    /// An empty bag whose ckey is a placeholder until the first absorb.
    pub(crate) fn empty(ckey: T) -> Self {
        Self {
            elements: Elements::new(),
            ckey,
            ckey_present: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn ckey(&self) -> &T {
        &self.ckey
    }

    pub(crate) fn ckey_present(&self) -> bool {
        self.ckey_present
    }

    pub(crate) fn elements(&self) -> &[T] {
        &self.elements
    }

    /// The element the next [`pop`](Self::pop) returns.
    pub(crate) fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    /// Removes the most recently added element.
    ///
    /// Popping the ckey element while it is marked present reports it: it
    /// leaves the heap at its true key, and consumers re-validating the
    /// structure need to see it. The flag stays set only if a duplicate of the
    /// ckey is still in the bag.
    pub(crate) fn pop<L: CorruptionLog<T>>(&mut self, log: &mut L) -> Option<T> {
        let item = self.elements.pop()?;
        if self.ckey_present && item == self.ckey {
            log.record(&item);
            self.ckey_present = self.elements.contains(&self.ckey);
        }
        Some(item)
    }

    /// Moves every element of `child` into this bag and takes over its ckey.
    ///
    /// A child ckey that is still present is handed to `log`, since it will
    /// now be reported under this bag. The presence flag moves up with the
    /// elements; it also stays set if this bag already held an element equal
    /// to the adopted ckey. `child` is left empty with its flag cleared.
    pub(crate) fn absorb<L: CorruptionLog<T>>(&mut self, child: &mut Self, log: &mut L) {
        if child.ckey_present {
            log.record(&child.ckey);
        }
        let kept = self.ckey_present && self.ckey == child.ckey;
        self.elements.append(&mut child.elements);
        self.ckey.clone_from(&child.ckey);
        self.ckey_present = child.ckey_present || kept;
        child.ckey_present = false;
    }

    /// Whether `ckey_present` agrees with the bag's contents.
    pub(crate) fn presence_consistent(&self) -> bool {
        self.ckey_present == self.elements.contains(&self.ckey)
    }

    /// Consumes the bag, returning its elements.
    pub(crate) fn into_elements(self) -> impl Iterator<Item = T> {
        self.elements.into_iter()
    }

    /// Number of elements whose key is strictly below the ckey.
    pub(crate) fn num_corrupted(&self) -> usize {
        self.elements.iter().filter(|item| **item < self.ckey).count()
    }

    #[cfg(test)]
    pub(crate) fn from_elements(elements: Vec<T>) -> Self {
        let ckey = elements
            .iter()
            .max()
            .cloned()
            .expect("test bags are non-empty");
        Self {
            elements: elements.into_iter().collect(),
            ckey,
            ckey_present: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_ckey_present(&mut self, present: bool) {
        self.ckey_present = present;
    }
}
