mod curated;

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::{Band, Item, ItemDraft, ItemError, ItemId};

pub use curated::{CuratedSource, INHERITANCE_TOPIC};

/// Items held per band per topic.
pub const DEFAULT_POOL_SIZE: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemBankError {
    #[error("pool size must be > 0")]
    ZeroPoolSize,

    #[error("curated source for {band} has {available} distinct items, {required} required")]
    SourceUnderflow {
        band: Band,
        required: usize,
        available: usize,
    },

    #[error("invalid curated item: {0}")]
    InvalidEntry(#[from] ItemError),
}

//
// ─── ITEM BANK ─────────────────────────────────────────────────────────────────
//

/// Fixed-size, band-partitioned pool of items for one topic.
///
/// After [`ItemBank::build`] or [`ItemBank::enforce_exact_size`] succeeds, every
/// band holds exactly `pool_size` items and every id is unique.
#[derive(Debug, Clone)]
pub struct ItemBank {
    topic: String,
    pool_size: usize,
    bands: BTreeMap<Band, Vec<Item>>,
    next_seq: u32,
}

impl ItemBank {
    /// Create a bank with no items.
    ///
    /// # Errors
    ///
    /// Returns `ItemBankError::ZeroPoolSize` if `pool_size` is zero.
    pub fn empty(topic: impl Into<String>, pool_size: usize) -> Result<Self, ItemBankError> {
        if pool_size == 0 {
            return Err(ItemBankError::ZeroPoolSize);
        }
        Ok(Self {
            topic: topic.into(),
            pool_size,
            bands: Band::ALL.into_iter().map(|band| (band, Vec::new())).collect(),
            next_seq: 0,
        })
    }

    /// Seed every band from `source` and settle it to exactly `pool_size` items.
    ///
    /// Each band's curated entries are shuffled, the first `pool_size` become
    /// items, and each item's options are shuffled.
    ///
    /// # Errors
    ///
    /// - `ZeroPoolSize` if `pool_size` is zero
    /// - `SourceUnderflow` if any band of `source` is smaller than `pool_size`
    /// - `InvalidEntry` if a curated entry is malformed
    pub fn build<R: Rng + ?Sized>(
        source: &CuratedSource,
        pool_size: usize,
        rng: &mut R,
    ) -> Result<Self, ItemBankError> {
        let mut bank = Self::empty(source.topic(), pool_size)?;

        for band in Band::ALL {
            let entries = source.entries(band);
            if entries.len() < pool_size {
                return Err(ItemBankError::SourceUnderflow {
                    band,
                    required: pool_size,
                    available: entries.len(),
                });
            }
            let mut shuffled = entries.to_vec();
            shuffled.shuffle(rng);
            for draft in shuffled.into_iter().take(pool_size) {
                bank.insert_draft(band, draft, rng)?;
            }
        }

        bank.enforce_exact_size(source, rng)?;
        Ok(bank)
    }

    /// Add one item to `band`, assigning the next free id.
    ///
    /// The bank may exceed its pool size until the next
    /// [`ItemBank::enforce_exact_size`].
    ///
    /// # Errors
    ///
    /// Returns `ItemBankError::InvalidEntry` if the draft is malformed.
    pub fn insert_draft<R: Rng + ?Sized>(
        &mut self,
        band: Band,
        draft: ItemDraft,
        rng: &mut R,
    ) -> Result<ItemId, ItemBankError> {
        let id = ItemId::new(band, self.next_seq);
        let item = draft.into_item(id, &self.topic, rng)?;
        self.next_seq = self.next_seq.saturating_add(1);
        self.bands.entry(band).or_default().push(item);
        Ok(id)
    }

    /// Trim or pad every band to exactly `pool_size` items.
    ///
    /// Oversized bands are shuffled and truncated. Undersized bands are padded
    /// from `source` in shuffled order, skipping stems the band already holds.
    /// The check runs before any band is modified, so an error leaves the bank
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `ItemBankError::SourceUnderflow` if `source` cannot supply enough
    /// distinct stems for some band, or `InvalidEntry` for a malformed entry.
    pub fn enforce_exact_size<R: Rng + ?Sized>(
        &mut self,
        source: &CuratedSource,
        rng: &mut R,
    ) -> Result<(), ItemBankError> {
        let mut padding: Vec<(Band, Vec<ItemDraft>)> = Vec::new();

        for band in Band::ALL {
            let held = self.items(band);
            if held.len() >= self.pool_size {
                continue;
            }
            let need = self.pool_size - held.len();
            let mut stems: HashSet<&str> = held.iter().map(Item::text).collect();

            let mut candidates: Vec<&ItemDraft> = source.entries(band).iter().collect();
            candidates.shuffle(rng);

            let mut picked = Vec::with_capacity(need);
            for draft in candidates {
                if picked.len() == need {
                    break;
                }
                if stems.insert(draft.text.as_str()) {
                    picked.push(draft.clone());
                }
            }

            if picked.len() < need {
                return Err(ItemBankError::SourceUnderflow {
                    band,
                    required: self.pool_size,
                    available: stems.len(),
                });
            }
            padding.push((band, picked));
        }

        for band in Band::ALL {
            let pool_size = self.pool_size;
            let items = self.bands.entry(band).or_default();
            if items.len() > pool_size {
                items.shuffle(rng);
                items.truncate(pool_size);
            }
        }

        for (band, drafts) in padding {
            for draft in drafts {
                self.insert_draft(band, draft, rng)?;
            }
        }
        Ok(())
    }

    /// Draw an item the session has not seen, preferring `band`.
    ///
    /// Picks uniformly among unseen items of `band`; when that band is
    /// exhausted, picks uniformly among unseen items of any band. Returns `None`
    /// only when every item in the bank has been seen.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        band: Band,
        seen: &HashSet<ItemId>,
        rng: &mut R,
    ) -> Option<&Item> {
        let in_band: Vec<&Item> = self
            .items(band)
            .iter()
            .filter(|item| !seen.contains(&item.id()))
            .collect();
        let pool: Vec<&Item> = if in_band.is_empty() {
            self.iter().filter(|item| !seen.contains(&item.id())).collect()
        } else {
            in_band
        };
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.random_range(0..pool.len())])
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    #[must_use]
    pub fn items(&self, band: Band) -> &[Item] {
        self.bands.get(&band).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items(id.band()).iter().find(|item| item.id() == *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.bands.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_source(per_band: usize) -> CuratedSource {
        let mut source = CuratedSource::new("oop");
        for band in Band::ALL {
            let drafts = (0..per_band)
                .map(|i| ItemDraft::new(format!("{band} question {i}"), ["right", "wrong a", "wrong b"], 0))
                .collect();
            source = source.with_band(band, drafts);
        }
        source
    }

    fn assert_exact(bank: &ItemBank) {
        let mut ids = HashSet::new();
        for band in Band::ALL {
            assert_eq!(bank.items(band).len(), bank.pool_size());
            for item in bank.items(band) {
                assert_eq!(item.band(), band);
                assert!(ids.insert(item.id()), "duplicate id {}", item.id());
            }
        }
    }

    #[test]
    fn build_fills_every_band_exactly() {
        let mut rng = StdRng::seed_from_u64(1);
        let bank = ItemBank::build(&CuratedSource::inheritance(), DEFAULT_POOL_SIZE, &mut rng).unwrap();
        assert_exact(&bank);
        assert_eq!(bank.len(), 3 * DEFAULT_POOL_SIZE);
        assert_eq!(bank.topic(), INHERITANCE_TOPIC);
    }

    #[test]
    fn build_preserves_correct_option_text() {
        let mut rng = StdRng::seed_from_u64(2);
        let source = CuratedSource::inheritance();
        let bank = ItemBank::build(&source, DEFAULT_POOL_SIZE, &mut rng).unwrap();
        for item in bank.iter() {
            let original = source
                .entries(item.band())
                .iter()
                .find(|draft| draft.text == item.text())
                .unwrap();
            assert_eq!(item.correct_option(), original.options[original.correct_index]);
        }
    }

    #[test]
    fn build_fails_fast_on_small_source() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = ItemBank::build(&small_source(4), 5, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ItemBankError::SourceUnderflow {
                band: Band::Easy,
                required: 5,
                available: 4
            }
        ));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        assert_eq!(ItemBank::empty("oop", 0).unwrap_err(), ItemBankError::ZeroPoolSize);
    }

    #[test]
    fn enforce_trims_oversized_band() {
        let mut rng = StdRng::seed_from_u64(4);
        let source = small_source(8);
        let mut bank = ItemBank::build(&source, 5, &mut rng).unwrap();
        bank.insert_draft(Band::Hard, ItemDraft::new("extra", ["a", "b"], 1), &mut rng)
            .unwrap();
        assert_eq!(bank.items(Band::Hard).len(), 6);

        bank.enforce_exact_size(&source, &mut rng).unwrap();
        assert_exact(&bank);
    }

    #[test]
    fn enforce_pads_without_duplicating_stems() {
        let mut rng = StdRng::seed_from_u64(5);
        let source = small_source(6);
        let mut bank = ItemBank::empty("oop", 6).unwrap();
        bank.insert_draft(Band::Easy, source.entries(Band::Easy)[0].clone(), &mut rng)
            .unwrap();

        bank.enforce_exact_size(&source, &mut rng).unwrap();
        assert_exact(&bank);
        for band in Band::ALL {
            let stems: HashSet<&str> = bank.items(band).iter().map(Item::text).collect();
            assert_eq!(stems.len(), 6);
        }
    }

    #[test]
    fn enforce_underflow_leaves_bank_untouched() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut bank = ItemBank::empty("oop", 4).unwrap();
        bank.insert_draft(Band::Medium, ItemDraft::new("kept", ["a", "b"], 0), &mut rng)
            .unwrap();

        let err = bank.enforce_exact_size(&small_source(2), &mut rng).unwrap_err();
        assert!(matches!(err, ItemBankError::SourceUnderflow { .. }));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn draw_prefers_band_then_falls_back() {
        let mut rng = StdRng::seed_from_u64(7);
        let bank = ItemBank::build(&small_source(3), 3, &mut rng).unwrap();
        let mut seen = HashSet::new();

        for _ in 0..3 {
            let item = bank.draw(Band::Medium, &seen, &mut rng).unwrap();
            assert_eq!(item.band(), Band::Medium);
            seen.insert(item.id());
        }

        let fallback = bank.draw(Band::Medium, &seen, &mut rng).unwrap();
        assert_ne!(fallback.band(), Band::Medium);
        assert!(!seen.contains(&fallback.id()));
    }

    #[test]
    fn draw_never_repeats_and_exhausts() {
        let mut rng = StdRng::seed_from_u64(8);
        let bank = ItemBank::build(&CuratedSource::inheritance(), DEFAULT_POOL_SIZE, &mut rng).unwrap();
        let mut seen = HashSet::new();
        for _ in 0..bank.len() {
            let item = bank.draw(Band::Hard, &seen, &mut rng).unwrap();
            assert!(seen.insert(item.id()));
        }
        assert!(bank.draw(Band::Hard, &seen, &mut rng).is_none());
    }

    #[test]
    fn get_finds_items_by_id() {
        let mut rng = StdRng::seed_from_u64(9);
        let bank = ItemBank::build(&small_source(3), 3, &mut rng).unwrap();
        let first = &bank.items(Band::Easy)[0];
        assert_eq!(bank.get(&first.id()), Some(first));
        assert!(bank.get(&ItemId::new(Band::Easy, 999)).is_none());
    }
}
