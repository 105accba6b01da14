//! Static game data for pack opening.
//!
//! Rarity weights per pack type, stat ranges per rarity, the name and image
//! pools cards are drawn from, the shop catalog, and disenchant values.

use crate::config::DEFAULT_PACK_TYPE;
use crate::models::CardRarity;

/// Percentage weight for each rarity, in the order the rarities are checked
/// during sampling.
pub type WeightTable = [(CardRarity, f64); 6];

const DOGE_WEIGHTS: WeightTable = [
    (CardRarity::Common, 50.0),
    (CardRarity::Uncommon, 30.0),
    (CardRarity::Rare, 15.0),
    (CardRarity::Legendary, 4.0),
    (CardRarity::UltraRare, 0.9),
    (CardRarity::SuperRare, 0.1),
];

const POPCAT_WEIGHTS: WeightTable = [
    (CardRarity::Common, 40.0),
    (CardRarity::Uncommon, 35.0),
    (CardRarity::Rare, 20.0),
    (CardRarity::Legendary, 4.0),
    (CardRarity::UltraRare, 0.8),
    (CardRarity::SuperRare, 0.2),
];

const PEPE_WEIGHTS: WeightTable = [
    (CardRarity::Common, 30.0),
    (CardRarity::Uncommon, 35.0),
    (CardRarity::Rare, 25.0),
    (CardRarity::Legendary, 8.0),
    (CardRarity::UltraRare, 1.5),
    (CardRarity::SuperRare, 0.5),
];

const PACK_TABLES: [(&str, &WeightTable); 3] = [
    ("doge", &DOGE_WEIGHTS),
    ("popcat", &POPCAT_WEIGHTS),
    ("pepe", &PEPE_WEIGHTS),
];

/// Names of every pack type with its own weight table.
pub fn pack_types() -> Vec<&'static str> {
    PACK_TABLES.iter().map(|(name, _)| *name).collect()
}

/// Return the weight table for `pack_type`, or `None` if the name is unknown.
pub fn find_weight_table(pack_type: &str) -> Option<&'static WeightTable> {
    PACK_TABLES
        .iter()
        .find(|(name, _)| *name == pack_type)
        .map(|(_, table)| *table)
}

/// Return the weight table for `pack_type`.
///
/// Unknown pack types get the [`DEFAULT_PACK_TYPE`] table instead of an error.
pub fn weight_table(pack_type: &str) -> &'static WeightTable {
    find_weight_table(pack_type)
        .or_else(|| find_weight_table(DEFAULT_PACK_TYPE))
        .unwrap_or(PACK_TABLES[0].1)
}

// ---------------------------------------------------------------------------
// Stat ranges
// ---------------------------------------------------------------------------

/// A half-open stat range `[base, base + range)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatRange {
    pub base: u32,
    pub range: u32,
}

impl StatRange {
    const fn new(base: u32, range: u32) -> Self {
        Self { base, range }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.base && value < self.base + self.range
    }
}

pub fn power_range(rarity: CardRarity) -> StatRange {
    match rarity {
        CardRarity::Common => StatRange::new(4000, 1000),
        CardRarity::Uncommon => StatRange::new(5000, 1500),
        CardRarity::Rare => StatRange::new(6500, 2000),
        CardRarity::Legendary => StatRange::new(8500, 1500),
        CardRarity::UltraRare => StatRange::new(9500, 1000),
        CardRarity::SuperRare => StatRange::new(10000, 500),
    }
}

pub fn social_score_range(rarity: CardRarity) -> StatRange {
    match rarity {
        CardRarity::Common => StatRange::new(50, 20),
        CardRarity::Uncommon => StatRange::new(65, 20),
        CardRarity::Rare => StatRange::new(75, 15),
        CardRarity::Legendary => StatRange::new(85, 15),
        CardRarity::UltraRare => StatRange::new(90, 10),
        CardRarity::SuperRare => StatRange::new(95, 5),
    }
}

// ---------------------------------------------------------------------------
// Name and image pools
// ---------------------------------------------------------------------------

// "MOON" appears twice, which makes it twice as likely as the others.
pub const CARD_NAMES: [&str; 30] = [
    "DOGE", "PEPE", "SHIB", "FLOKI", "BONK", "SAMO", "ELON", "WOJAK", "SNEK", "MOON", "CHAD",
    "FROG", "HODL", "BULL", "BEAR", "PUMP", "DUMP", "MOON", "LAMBO", "WHALE", "APE", "DEFI",
    "NFT", "MEME", "COIN", "TOKEN", "CRYPTO", "DIAMOND", "HANDS", "ROCKET",
];

pub const CARD_IMAGES: [&str; 4] = [
    "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/1-olr9d2aE2Q4B1q7bGUOO6Q9Sa45wJV.png",
    "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/2-kOCVmyOO9SXGYayxMy3W2kHbjXUiVR.png",
    "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/3-M7wTxZE2HqPO1FddK78pCSr3SDdoMS.png",
    "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/4-cwDwOaf6X9BujnFhGzYr2GAytsznki.png",
];

// ---------------------------------------------------------------------------
// Shop and disenchant
// ---------------------------------------------------------------------------

/// Map a shop product id to the pack type whose weight table it uses.
pub fn shop_pack_type(shop_pack_id: &str) -> Option<&'static str> {
    match shop_pack_id {
        "standard" => Some("pepe"),
        "premium" => Some("doge"),
        "legendary" => Some("popcat"),
        _ => None,
    }
}

/// Meme Dust credited for disenchanting one card of the given rarity.
pub fn dust_value(rarity: CardRarity) -> u64 {
    match rarity {
        CardRarity::Common => 5,
        CardRarity::Uncommon => 20,
        CardRarity::Rare => 100,
        CardRarity::Legendary => 400,
        CardRarity::UltraRare => 800,
        CardRarity::SuperRare => 1600,
    }
}
