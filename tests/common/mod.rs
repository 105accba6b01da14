//! Shared test fixtures for the meme pack SDK integration tests.
//!
//! Provides in-memory storage and a manual clock wired together, helpers to
//! plant a saved pack timer, a storage whose writes can be made to fail,
//! and a card constructor.

#![allow(dead_code)]

use memepack_sdk::config::{PACK_LAST_UPDATED_KEY, PACK_STATE_KEY};
use memepack_sdk::models::{Card, CardRarity};
use memepack_sdk::{ManualClock, MemePackError, MemoryStorage, Storage};
use std::sync::{Arc, Mutex};

/// 2023-11-14T22:13:20Z, an arbitrary fixed "now".
pub const T0_MILLIS: i64 = 1_700_000_000_000;

/// Fresh in-memory storage and a clock frozen at [`T0_MILLIS`].
pub fn setup() -> (Arc<MemoryStorage>, Arc<ManualClock>) {
    (
        Arc::new(MemoryStorage::new()),
        Arc::new(ManualClock::new(T0_MILLIS)),
    )
}

/// Write a saved pack timer as a previous session would have left it.
pub fn plant_timer(storage: &dyn Storage, opportunities: i64, time_until_next: i64, saved_at_ms: i64) {
    let state = serde_json::json!({
        "packOpportunities": opportunities,
        "timeUntilNextPack": time_until_next,
        "isTimerActive": opportunities < 5,
    });
    storage.set(PACK_STATE_KEY, &state.to_string()).unwrap();
    storage
        .set(PACK_LAST_UPDATED_KEY, &saved_at_ms.to_string())
        .unwrap();
}

/// Read back the saved timer as raw JSON.
pub fn saved_timer(storage: &dyn Storage) -> serde_json::Value {
    let raw = storage.get(PACK_STATE_KEY).unwrap().expect("timer state saved");
    serde_json::from_str(&raw).unwrap()
}

pub fn saved_at(storage: &dyn Storage) -> i64 {
    storage
        .get(PACK_LAST_UPDATED_KEY)
        .unwrap()
        .expect("timestamp saved")
        .parse()
        .unwrap()
}

pub fn card(id: i64, rarity: CardRarity) -> Card {
    Card {
        id,
        name: "PEPE".to_string(),
        rarity,
        power: 4000,
        image: "https://example.invalid/pepe.png".to_string(),
        social_score: 50,
        is_nft: false,
    }
}

// ---------------------------------------------------------------------------
// FlakyStorage
// ---------------------------------------------------------------------------

#[derive(Default)]
enum Failing {
    #[default]
    Nothing,
    Everything,
    Key(&'static str),
}

/// In-memory storage whose writes can be made to fail, for every key or
/// for one key only. Reads always succeed.
#[derive(Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    failing: Mutex<Failing>,
}

impl FlakyStorage {
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = Failing::Everything;
    }

    pub fn fail_key(&self, key: &'static str) {
        *self.failing.lock().unwrap() = Failing::Key(key);
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = Failing::Nothing;
    }

    fn check(&self, key: &str) -> memepack_sdk::Result<()> {
        let fails = match &*self.failing.lock().unwrap() {
            Failing::Nothing => false,
            Failing::Everything => true,
            Failing::Key(k) => *k == key,
        };
        if fails {
            return Err(MemePackError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl Storage for FlakyStorage {
    fn get(&self, key: &str) -> memepack_sdk::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> memepack_sdk::Result<()> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> memepack_sdk::Result<()> {
        self.check(key)?;
        self.inner.remove(key)
    }
}
