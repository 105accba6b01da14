use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MemePackError;

// ---------------------------------------------------------------------------
// CardRarity — Six-level rarity, ordered from lowest to highest rank
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    UltraRare,
    SuperRare,
}

impl CardRarity {
    /// All rarities in declaration order (lowest rank first).
    pub const ALL: [CardRarity; 6] = [
        CardRarity::Common,
        CardRarity::Uncommon,
        CardRarity::Rare,
        CardRarity::Legendary,
        CardRarity::UltraRare,
        CardRarity::SuperRare,
    ];

    /// Rank used for sorting: `Common` is 0, `SuperRare` is 5.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardRarity::Common => "Common",
            CardRarity::Uncommon => "Uncommon",
            CardRarity::Rare => "Rare",
            CardRarity::Legendary => "Legendary",
            CardRarity::UltraRare => "UltraRare",
            CardRarity::SuperRare => "SuperRare",
        }
    }
}

impl fmt::Display for CardRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CardRarity {
    type Err = MemePackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardRarity::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MemePackError::InvalidArgument(format!("Unknown rarity: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Card — One collectible produced by the pack generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub rarity: CardRarity,
    pub power: u32,
    pub image: String,
    pub social_score: u32,
    #[serde(rename = "isNFT")]
    pub is_nft: bool,
}
