use std::path::PathBuf;

/// Pack opportunities stop regenerating once this many are banked.
pub const MAX_PACK_OPPORTUNITIES: u8 = 5;
/// Seconds it takes for one pack opportunity to regenerate (2 hours).
pub const RECHARGE_INTERVAL_SECS: u32 = 7200;
/// Number of cards in a single pack.
pub const DEFAULT_PACK_SIZE: usize = 5;
/// Pack type whose weight table is used for unknown pack names.
pub const DEFAULT_PACK_TYPE: &str = "doge";
/// Probability that a generated card is flagged as an NFT.
pub const NFT_CHANCE: f64 = 0.2;
/// Meme Dust balance for a user who has never disenchanted anything.
pub const STARTING_MEME_DUST: u64 = 250;

/// Environment variable the CLI reads to override the data directory.
pub const DATA_DIR_ENV: &str = "MEMEPACK_DATA_DIR";

pub const PACK_STATE_KEY: &str = "packOpportunityState";
pub const PACK_LAST_UPDATED_KEY: &str = "packOpportunityLastUpdated";
pub const COLLECTION_KEY: &str = "cardCollection";
pub const MEME_DUST_KEY: &str = "memeDust";

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("memepack-sdk")
    } else {
        PathBuf::from(".memepack-sdk")
    }
}
