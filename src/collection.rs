//! The user's card collection and Meme Dust balance.
//!
//! The collection is kept in insertion order and written to storage as a
//! full JSON snapshot after every change. A snapshot that cannot be parsed is
//! logged and replaced with an empty collection.

use crate::booster::tables;
use crate::config::{COLLECTION_KEY, MEME_DUST_KEY, STARTING_MEME_DUST};
use crate::error::Result;
use crate::models::{Card, CardRarity, DisenchantOutcome};
use crate::storage::Storage;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Owns the list of cards a user possesses.
pub struct CollectionStore {
    cards: Vec<Card>,
    storage: Arc<dyn Storage>,
}

impl CollectionStore {
    /// Restore the collection from storage.
    ///
    /// A missing snapshot yields an empty collection; a corrupt one is logged
    /// and also yields an empty collection.
    pub fn load(storage: Arc<dyn Storage>) -> Result<Self> {
        let cards = match storage.get(COLLECTION_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<Card>>(&raw) {
                Ok(cards) => cards,
                Err(e) => {
                    warn!(error = %e, "failed to parse card collection, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!(cards = cards.len(), "loaded card collection");
        Ok(Self { cards, storage })
    }

    /// Append cards to the collection. Ids are not de-duplicated.
    pub fn add_cards(&mut self, new_cards: &[Card]) -> Result<()> {
        if new_cards.is_empty() {
            return Ok(());
        }
        let mut next = self.cards.clone();
        next.extend_from_slice(new_cards);
        self.commit(next)?;
        debug!(added = new_cards.len(), total = self.cards.len(), "added cards");
        Ok(())
    }

    /// Drop every card after the first `len`, undoing a recent
    /// [`add_cards`](Self::add_cards).
    pub(crate) fn truncate(&mut self, len: usize) -> Result<()> {
        if len >= self.cards.len() {
            return Ok(());
        }
        self.commit(self.cards[..len].to_vec())
    }

    /// Remove every card whose id is in `ids` and return how many were removed.
    ///
    /// Ids that are not in the collection are ignored.
    pub fn remove_cards(&mut self, ids: &[i64]) -> Result<usize> {
        Ok(self.remove_matching(ids)?.len())
    }

    /// Remove the cards in `ids` and credit their Meme Dust value.
    ///
    /// The credited balance is written before the cards are removed. If the
    /// removal cannot be saved the previous balance is written back.
    pub fn disenchant(&mut self, ids: &[i64]) -> Result<DisenchantOutcome> {
        let (removed, kept) = self.split_matching(ids);
        if removed.is_empty() {
            debug!("nothing to disenchant");
            return Ok(DisenchantOutcome { dust: 0, cards: 0 });
        }
        let dust: u64 = removed.iter().map(|c| tables::dust_value(c.rarity)).sum();

        let balance = self.dust_balance()?;
        self.storage
            .set(MEME_DUST_KEY, &balance.saturating_add(dust).to_string())?;
        if let Err(e) = self.commit(kept) {
            if let Err(restore) = self.storage.set(MEME_DUST_KEY, &balance.to_string()) {
                error!(error = %restore, dust, "failed to restore Meme Dust balance");
            }
            return Err(e);
        }

        info!(cards = removed.len(), dust, "disenchanted cards");
        Ok(DisenchantOutcome {
            dust,
            cards: removed.len(),
        })
    }

    /// Current Meme Dust balance.
    ///
    /// A user who never disenchanted, or whose stored balance is unreadable,
    /// has the starting balance.
    pub fn dust_balance(&self) -> Result<u64> {
        let balance = match self.storage.get(MEME_DUST_KEY)? {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
                warn!(error = %e, "corrupt Meme Dust balance, using starting balance");
                STARTING_MEME_DUST
            }),
            None => STARTING_MEME_DUST,
        };
        Ok(balance)
    }

    // -- Read helpers -------------------------------------------------------

    /// All owned cards, oldest first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of owned cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the collection holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// First card with the given id.
    pub fn get(&self, id: i64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Owned cards of one rarity, in collection order.
    pub fn by_rarity(&self, rarity: CardRarity) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.rarity == rarity).collect()
    }

    /// Number of owned cards per rarity, rarest last. Rarities with no cards
    /// are omitted.
    pub fn rarity_counts(&self) -> BTreeMap<CardRarity, usize> {
        let mut counts = BTreeMap::new();
        for card in &self.cards {
            *counts.entry(card.rarity).or_insert(0) += 1;
        }
        counts
    }

    // -- Private helpers ----------------------------------------------------

    fn remove_matching(&mut self, ids: &[i64]) -> Result<Vec<Card>> {
        let (removed, kept) = self.split_matching(ids);
        if !removed.is_empty() {
            self.commit(kept)?;
            debug!(removed = removed.len(), total = self.cards.len(), "removed cards");
        }
        Ok(removed)
    }

    /// Partition the collection into the cards whose id is in `ids` and the rest.
    fn split_matching(&self, ids: &[i64]) -> (Vec<Card>, Vec<Card>) {
        if ids.is_empty() {
            return (Vec::new(), self.cards.clone());
        }
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        self.cards
            .iter()
            .cloned()
            .partition(|c| wanted.contains(&c.id))
    }

    /// Persist `next` and only then make it the in-memory collection.
    fn commit(&mut self, next: Vec<Card>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.storage.set(COLLECTION_KEY, &json)?;
        self.cards = next;
        Ok(())
    }
}
