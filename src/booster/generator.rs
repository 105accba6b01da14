//! Card pack generator.
//!
//! Opens meme card packs by sampling a rarity for each card from the pack
//! type's weight table, rolling stats in that rarity's ranges, and sorting
//! the finished pack so the rarest cards come first.

use crate::booster::tables::{self, WeightTable};
use crate::clock::Clock;
use crate::config::NFT_CHANCE;
use crate::models::{Card, CardRarity};
use rand::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Generates cards with a rarity distribution matching a pack type.
///
/// The generator owns its RNG so that a seeded instance reproduces the same
/// packs, which is what the tests rely on.
pub struct PackGenerator<R = StdRng> {
    rng: R,
    clock: Arc<dyn Clock>,
}

impl PackGenerator<StdRng> {
    /// Create a generator seeded from the operating system's entropy source.
    pub fn from_entropy(clock: Arc<dyn Clock>) -> Self {
        Self::new(StdRng::from_entropy(), clock)
    }

    /// Create a deterministic generator from a fixed seed.
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), clock)
    }
}

impl<R: Rng> PackGenerator<R> {
    pub fn new(rng: R, clock: Arc<dyn Clock>) -> Self {
        Self { rng, clock }
    }

    /// Generate `count` cards for `pack_type`, sorted by descending rarity.
    ///
    /// Unknown pack types use the default pack's weight table. Cards of equal
    /// rarity keep the order they were generated in.
    pub fn generate_pack(&mut self, pack_type: &str, count: usize) -> Vec<Card> {
        if tables::find_weight_table(pack_type).is_none() {
            debug!(pack_type, "unknown pack type, using default weight table");
        }
        let table = tables::weight_table(pack_type);

        let mut cards: Vec<Card> = (0..count).map(|_| self.generate_card(table)).collect();
        sort_by_rarity_desc(&mut cards);

        debug!(pack_type, count, "generated pack");
        cards
    }

    /// Generate a single card using the given weight table.
    pub fn generate_card(&mut self, table: &WeightTable) -> Card {
        let rarity = self.sample_rarity(table);
        let power = roll_stat(&mut self.rng, tables::power_range(rarity));
        let social_score = roll_stat(&mut self.rng, tables::social_score_range(rarity));
        let id = self.clock.now_millis() + self.rng.gen_range(0..1000);
        let name = tables::CARD_NAMES[self.rng.gen_range(0..tables::CARD_NAMES.len())];
        let image = tables::CARD_IMAGES[self.rng.gen_range(0..tables::CARD_IMAGES.len())];
        let is_nft = self.rng.gen_bool(NFT_CHANCE);

        Card {
            id,
            name: name.to_string(),
            rarity,
            power,
            image: image.to_string(),
            social_score,
            is_nft,
        }
    }

    /// Draw one rarity from `table`.
    pub fn sample_rarity(&mut self, table: &WeightTable) -> CardRarity {
        let roll = self.rng.gen::<f64>() * 100.0;
        pick_rarity(table, roll)
    }
}

// ---------------------------------------------------------------------------
// Free-standing helpers
// ---------------------------------------------------------------------------

/// Inverse-CDF pick over a weight table.
///
/// Walks the table in declaration order accumulating weights and returns the
/// first rarity whose running total reaches `roll`. A roll past the end of
/// the table (only possible when its weights sum to less than 100) yields
/// `Common`.
pub fn pick_rarity(table: &WeightTable, roll: f64) -> CardRarity {
    let mut cumulative = 0.0;
    for &(rarity, weight) in table {
        cumulative += weight;
        if cumulative >= roll {
            return rarity;
        }
    }
    CardRarity::Common
}

/// Stable sort, rarest first.
pub fn sort_by_rarity_desc(cards: &mut [Card]) {
    cards.sort_by(|a, b| b.rarity.cmp(&a.rarity));
}

fn roll_stat<R: Rng>(rng: &mut R, range: tables::StatRange) -> u32 {
    range.base + rng.gen_range(0..range.range)
}
