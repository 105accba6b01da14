//! Meme card pack SDK for Rust.
//!
//! Provides the game logic behind the meme trading-card front end: a pack
//! opportunity timer that recharges while the app is closed, a rarity-weighted
//! pack generator, and a persisted card collection with disenchanting. State
//! lives in a local key-value [`Storage`] and survives restarts.
//!
//! # Quick start
//!
//! ```no_run
//! use memepack_sdk::MemePackSdk;
//!
//! let mut sdk = MemePackSdk::builder().build().unwrap();
//!
//! // Spend a pack opportunity on a pepe pack
//! if let Some(cards) = sdk.open_pack("pepe").unwrap() {
//!     println!("pulled {} cards", cards.len());
//! }
//!
//! println!("{} opportunities left", sdk.timer().state().opportunities);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod booster;
pub mod clock;
pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod timer;

#[cfg(feature = "async")]
pub use async_client::AsyncMemePackSdk;
pub use booster::PackGenerator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::CollectionStore;
pub use error::{MemePackError, Result};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use timer::{PackTimer, TickOutcome};

use models::{Card, DisenchantOutcome};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

// ---------------------------------------------------------------------------
// MemePackSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`MemePackSdk`] instance.
///
/// Use [`MemePackSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](MemePackSdkBuilder::build) to create the SDK.
#[derive(Default)]
pub struct MemePackSdkBuilder {
    data_dir: Option<PathBuf>,
    storage: Option<Arc<dyn Storage>>,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
}

impl MemePackSdkBuilder {
    /// Set a custom data directory for the file-backed storage.
    ///
    /// If not set, the platform-appropriate default data directory is used
    /// (e.g. `~/.local/share/memepack-sdk` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep all state in memory. Nothing is written to disk.
    pub fn in_memory(self) -> Self {
        self.storage(Arc::new(MemoryStorage::new()))
    }

    /// Use an existing storage backend. Overrides [`data_dir`](Self::data_dir).
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Use a custom clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed the pack generator so pack contents are reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the SDK: open storage, resume the pack timer, load the collection.
    pub fn build(self) -> Result<MemePackSdk> {
        let storage: Arc<dyn Storage> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(FileStorage::open(self.data_dir)?),
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let timer = PackTimer::resume(storage.clone(), clock.clone())?;
        let collection = CollectionStore::load(storage)?;
        let generator = match self.seed {
            Some(seed) => PackGenerator::seeded(seed, clock),
            None => PackGenerator::from_entropy(clock),
        };

        Ok(MemePackSdk {
            timer,
            collection,
            generator,
        })
    }
}

// ---------------------------------------------------------------------------
// MemePackSdk
// ---------------------------------------------------------------------------

/// The main entry point for the meme card pack SDK.
///
/// Owns the [`PackTimer`], the [`CollectionStore`] and the [`PackGenerator`],
/// all sharing one [`Storage`] backend.
///
/// Created via [`MemePackSdk::builder()`].
pub struct MemePackSdk {
    timer: PackTimer,
    collection: CollectionStore,
    generator: PackGenerator,
}

impl MemePackSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> MemePackSdkBuilder {
        MemePackSdkBuilder::default()
    }

    /// Spend a pack opportunity and open a pack of `pack_type`.
    ///
    /// The new cards are added to the collection and returned, rarest first.
    /// Returns `None` when no pack opportunities are left. Unknown pack types
    /// use the default pack's rarity weights.
    pub fn open_pack(&mut self, pack_type: &str) -> Result<Option<Vec<Card>>> {
        if self.timer.opportunities() == 0 {
            debug!(pack_type, "no pack opportunities left");
            return Ok(None);
        }

        // Cards are saved before the opportunity is spent; if spending fails
        // they are taken back out.
        let owned = self.collection.len();
        let cards = self.open_into_collection(pack_type)?;
        match self.timer.try_consume() {
            Ok(true) => {}
            Ok(false) => {
                self.rollback_collection(owned);
                return Ok(None);
            }
            Err(e) => {
                self.rollback_collection(owned);
                return Err(e);
            }
        }

        info!(
            pack_type,
            opportunities = self.timer.opportunities(),
            "opened pack"
        );
        Ok(Some(cards))
    }

    /// Open a pack bought from the shop (`standard`, `premium` or
    /// `legendary`). Shop packs do not spend a pack opportunity.
    pub fn buy_pack(&mut self, shop_pack_id: &str) -> Result<Vec<Card>> {
        let pack_type = booster::tables::shop_pack_type(shop_pack_id).ok_or_else(|| {
            MemePackError::InvalidArgument(format!("Unknown shop pack: {}", shop_pack_id))
        })?;
        let cards = self.open_into_collection(pack_type)?;
        info!(shop_pack_id, pack_type, "opened shop pack");
        Ok(cards)
    }

    /// Disenchant cards from the collection for Meme Dust.
    pub fn disenchant(&mut self, ids: &[i64]) -> Result<DisenchantOutcome> {
        self.collection.disenchant(ids)
    }

    // -- Accessors ---------------------------------------------------------

    /// The pack opportunity timer.
    pub fn timer(&self) -> &PackTimer {
        &self.timer
    }

    /// Mutable access to the timer, e.g. to [`tick`](PackTimer::tick) it by hand.
    pub fn timer_mut(&mut self) -> &mut PackTimer {
        &mut self.timer
    }

    /// The user's card collection.
    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    /// Mutable access to the collection.
    pub fn collection_mut(&mut self) -> &mut CollectionStore {
        &mut self.collection
    }

    /// Mutable access to the pack generator.
    pub fn generator_mut(&mut self) -> &mut PackGenerator {
        &mut self.generator
    }

    fn open_into_collection(&mut self, pack_type: &str) -> Result<Vec<Card>> {
        let cards = self
            .generator
            .generate_pack(pack_type, config::DEFAULT_PACK_SIZE);
        self.collection.add_cards(&cards)?;
        Ok(cards)
    }

    fn rollback_collection(&mut self, len: usize) {
        if let Err(e) = self.collection.truncate(len) {
            error!(error = %e, "failed to take back cards from an unpaid pack");
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for MemePackSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.timer.state();
        write!(
            f,
            "MemePackSdk(opportunities={}/{}, next_pack_in={}, cards={})",
            state.opportunities,
            config::MAX_PACK_OPPORTUNITIES,
            state.formatted_remaining(),
            self.collection.len()
        )
    }
}
