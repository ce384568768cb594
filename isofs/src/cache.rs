//! Inode translation cache
//!
//! A fixed number of slots, each holding the translation of one inode.
//! Every lookup walks the slots in order and ages each slot it passes; a hit
//! resets that slot's age and stops the walk. On a miss the record is parsed
//! and replaces the oldest slot (first one wins on equal ages). Lookups are
//! O(N).
//!
//! Nothing is ever invalidated, the medium is read-only.

use crate::directory::{Translate, Translation};
use crate::error::Result;
use crate::types::{Inode, CACHE_ENTRIES};
use alloc::boxed::Box;
use log::{debug, trace};

struct Slot {
    age: u32,
    cached: Option<(Inode, Translation)>,
}

/// Fixed-capacity translation cache with `N` slots
pub struct TranslationCache<const N: usize = CACHE_ENTRIES> {
    slots: Box<[Slot]>,
}

impl<const N: usize> TranslationCache<N> {
    /// Create an empty cache
    pub fn new() -> Self {
        let slots = (0..N)
            .map(|_| Slot {
                age: 0,
                cached: None,
            })
            .collect();
        Self { slots }
    }

    /// Translate `inode`, consulting `source` only on a miss.
    ///
    /// A failed translation leaves every slot's content as it was.
    pub fn lookup<T: Translate + ?Sized>(
        &mut self,
        source: &mut T,
        inode: Inode,
        max_len: u64,
    ) -> Result<Translation> {
        let mut victim = 0;
        let mut oldest = 0;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.age = slot.age.saturating_add(1);

            if let Some((cached, translation)) = &slot.cached {
                if *cached == inode {
                    slot.age = 0;
                    return Ok(translation.clone());
                }
            }

            if index == 0 || slot.age > oldest {
                victim = index;
                oldest = slot.age;
            }
        }

        trace!("isofs: cache miss for {}", inode);
        let translation = source.translate(inode, max_len)?;

        if let Some(slot) = self.slots.get_mut(victim) {
            if let Some((evicted, _)) = &slot.cached {
                debug!("isofs: cache evicts {} (age {}) for {}", evicted, slot.age, inode);
            }
            slot.age = 0;
            slot.cached = Some((inode, translation.clone()));
        }

        Ok(translation)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.cached.is_some()).count()
    }

    /// No slot occupied yet?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Is `inode` currently cached?
    pub fn contains(&self, inode: Inode) -> bool {
        self.age_of(inode).is_some()
    }

    /// Age of the slot holding `inode`
    pub fn age_of(&self, inode: Inode) -> Option<u32> {
        self.slots.iter().find_map(|slot| match &slot.cached {
            Some((cached, _)) if *cached == inode => Some(slot.age),
            _ => None,
        })
    }
}

impl<const N: usize> Default for TranslationCache<N> {
    fn default() -> Self {
        Self::new()
    }
}
