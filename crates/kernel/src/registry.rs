use std::collections::BTreeSet;
use terrain_common::BiomeId;

/// Number of biome ids in the default namespace.
pub const DEFAULT_BIOME_CAPACITY: u32 = 256;

/// Errors from claiming an id in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("biome id {id} is outside the registry capacity of {capacity}")]
    OutOfRange { id: BiomeId, capacity: u32 },
    #[error("biome id {0} is already claimed")]
    AlreadyClaimed(BiomeId),
}

/// Process-wide allocator for the shared biome id namespace.
pub trait IdentifierRegistry {
    /// Mark an id as in use.
    fn claim(&mut self, id: BiomeId) -> Result<(), RegistryError>;

    /// Mark every id in `ids` as free. Ids that are already free are ignored.
    fn release(&mut self, ids: &BTreeSet<BiomeId>);

    fn is_claimed(&self, id: BiomeId) -> bool;
}

impl<T: IdentifierRegistry + ?Sized> IdentifierRegistry for &mut T {
    fn claim(&mut self, id: BiomeId) -> Result<(), RegistryError> {
        (**self).claim(id)
    }

    fn release(&mut self, ids: &BTreeSet<BiomeId>) {
        (**self).release(ids)
    }

    fn is_claimed(&self, id: BiomeId) -> bool {
        (**self).is_claimed(id)
    }
}

/// Fixed-capacity bitset registry.
#[derive(Debug, Clone)]
pub struct BiomeIdRegistry {
    words: Vec<u64>,
    capacity: u32,
}

impl Default for BiomeIdRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BIOME_CAPACITY)
    }
}

impl BiomeIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            words: vec![0; (capacity as usize).div_ceil(64)],
            capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of ids currently marked in use.
    pub fn claimed_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Lowest id not marked in use, if any.
    pub fn first_free(&self) -> Option<BiomeId> {
        (0..self.capacity).map(BiomeId).find(|id| !self.is_claimed(*id))
    }

    /// All ids currently marked in use, ascending.
    pub fn claimed(&self) -> BTreeSet<BiomeId> {
        (0..self.capacity)
            .map(BiomeId)
            .filter(|id| self.is_claimed(*id))
            .collect()
    }

    fn slot(id: BiomeId) -> (usize, u64) {
        (id.index() / 64, 1u64 << (id.index() % 64))
    }
}

impl IdentifierRegistry for BiomeIdRegistry {
    fn claim(&mut self, id: BiomeId) -> Result<(), RegistryError> {
        if id.0 >= self.capacity {
            return Err(RegistryError::OutOfRange {
                id,
                capacity: self.capacity,
            });
        }
        let (word, bit) = Self::slot(id);
        if self.words[word] & bit != 0 {
            return Err(RegistryError::AlreadyClaimed(id));
        }
        self.words[word] |= bit;
        Ok(())
    }

    fn release(&mut self, ids: &BTreeSet<BiomeId>) {
        for &id in ids {
            if id.0 >= self.capacity {
                continue;
            }
            let (word, bit) = Self::slot(id);
            self.words[word] &= !bit;
        }
    }

    fn is_claimed(&self, id: BiomeId) -> bool {
        if id.0 >= self.capacity {
            return false;
        }
        let (word, bit) = Self::slot(id);
        self.words[word] & bit != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> BTreeSet<BiomeId> {
        raw.iter().copied().map(BiomeId).collect()
    }

    #[test]
    fn registry_starts_empty() {
        let reg = BiomeIdRegistry::new();
        assert_eq!(reg.capacity(), DEFAULT_BIOME_CAPACITY);
        assert_eq!(reg.claimed_count(), 0);
        assert_eq!(reg.first_free(), Some(BiomeId(0)));
    }

    #[test]
    fn claim_marks_in_use() {
        let mut reg = BiomeIdRegistry::new();
        reg.claim(BiomeId(5)).unwrap();
        reg.claim(BiomeId(70)).unwrap();
        assert!(reg.is_claimed(BiomeId(5)));
        assert!(reg.is_claimed(BiomeId(70)));
        assert!(!reg.is_claimed(BiomeId(6)));
        assert_eq!(reg.claimed(), ids(&[5, 70]));
    }

    #[test]
    fn duplicate_claim_rejected() {
        let mut reg = BiomeIdRegistry::new();
        reg.claim(BiomeId(9)).unwrap();
        assert_eq!(
            reg.claim(BiomeId(9)),
            Err(RegistryError::AlreadyClaimed(BiomeId(9)))
        );
    }

    #[test]
    fn out_of_range_claim_rejected() {
        let mut reg = BiomeIdRegistry::with_capacity(16);
        assert!(matches!(
            reg.claim(BiomeId(16)),
            Err(RegistryError::OutOfRange { capacity: 16, .. })
        ));
    }

    #[test]
    fn release_frees_ids_for_reuse() {
        let mut reg = BiomeIdRegistry::new();
        for id in [5, 6, 7] {
            reg.claim(BiomeId(id)).unwrap();
        }
        reg.release(&ids(&[5, 6, 7]));
        assert_eq!(reg.claimed_count(), 0);
        reg.claim(BiomeId(6)).unwrap();
    }

    #[test]
    fn release_of_free_or_unknown_ids_is_noop() {
        let mut reg = BiomeIdRegistry::with_capacity(64);
        reg.claim(BiomeId(1)).unwrap();
        reg.release(&ids(&[2, 3, 1000]));
        assert_eq!(reg.claimed(), ids(&[1]));
    }

    #[test]
    fn first_free_skips_claimed() {
        let mut reg = BiomeIdRegistry::with_capacity(3);
        reg.claim(BiomeId(0)).unwrap();
        reg.claim(BiomeId(1)).unwrap();
        assert_eq!(reg.first_free(), Some(BiomeId(2)));
        reg.claim(BiomeId(2)).unwrap();
        assert_eq!(reg.first_free(), None);
    }

    #[test]
    fn registry_usable_through_mut_ref() {
        let mut reg = BiomeIdRegistry::new();
        {
            let mut by_ref: &mut BiomeIdRegistry = &mut reg;
            IdentifierRegistry::claim(&mut by_ref, BiomeId(3)).unwrap();
        }
        assert!(reg.is_claimed(BiomeId(3)));
    }
}
