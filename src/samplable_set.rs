//! A set with constant time insert, remove, membership and uniform random sampling.
//!
//! Values live in a dense vector of slots `[0, len)` with a hash map from each value back to its
//! slot. Removal swaps the last slot into the freed one so the slots never have gaps, which is what
//! makes a uniform draw over the slots a uniform draw over the members.

use error_chain::bail;
use rand::Rng;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FromIterator;
use std::slice;

use crate::errors::*;
use crate::units::CellId;
use crate::utils::{self, FnvHashMap};

#[derive(Debug, Clone)]
pub struct SamplableSet<T = CellId>
    where T: Copy + Eq + Hash + Debug
{
    slot_of: FnvHashMap<T, usize>,
    values: Vec<T>,
}

impl<T> SamplableSet<T>
    where T: Copy + Eq + Hash + Debug
{
    pub fn new() -> SamplableSet<T> {
        SamplableSet::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> SamplableSet<T> {
        SamplableSet {
            slot_of: utils::fnv_hashmap(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Insert `value`. Returns false if it was already a member, in which case nothing changes.
    pub fn add(&mut self, value: T) -> bool {
        if self.slot_of.contains_key(&value) {
            return false;
        }
        self.slot_of.insert(value, self.values.len());
        self.values.push(value);
        true
    }

    /// Remove `value`, failing with `NotFound` if it is not a member.
    pub fn remove(&mut self, value: T) -> Result<()> {
        let slot = self.slot_of
            .remove(&value)
            .ok_or_else(|| ErrorKind::NotFound(format!("{:?}", value)))?;

        // The value from the last slot moves down into the freed slot
        let _ = self.values.swap_remove(slot);
        if let Some(&moved) = self.values.get(slot) {
            self.slot_of.insert(moved, slot);
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.slot_of.contains_key(&value)
    }

    /// Draw a member uniformly at random without removing it.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<T> {
        if self.values.is_empty() {
            bail!(ErrorKind::EmptyCollection);
        }
        let slot = rng.gen_range(0..self.values.len());
        Ok(self.values[slot])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Members in slot order. The order changes as values are removed.
    pub fn iter(&self) -> slice::Iter<T> {
        self.values.iter()
    }
}

impl<T> Default for SamplableSet<T>
    where T: Copy + Eq + Hash + Debug
{
    fn default() -> Self {
        SamplableSet::new()
    }
}

impl<T> FromIterator<T> for SamplableSet<T>
    where T: Copy + Eq + Hash + Debug
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = SamplableSet::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for SamplableSet<T>
    where T: Copy + Eq + Hash + Debug
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.add(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a SamplableSet<T>
    where T: Copy + Eq + Hash + Debug
{
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
