//! Async wrapper around [`MemePackSdk`] for use in async runtimes (Tokio).
//!
//! Besides running SDK operations on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], the async SDK drives the pack timer: a
//! background task ticks it once per second for as long as it is active.
//! The task ends itself as soon as the bank is full, and any operation that
//! leaves the timer active again (such as opening a pack) starts a new one.
//! Dropping the SDK stops the task.
//!
//! # Example
//!
//! ```no_run
//! use memepack_sdk::AsyncMemePackSdk;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncMemePackSdk::builder().build().await.unwrap();
//!
//!     let pack = sdk.open_pack("doge").await.unwrap();
//!     let state = sdk.state().await.unwrap();
//!     println!("{:?} -- next pack in {}", pack, state.formatted_remaining());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{MemePackError, Result};
use crate::models::{Card, DisenchantOutcome, TimerSnapshot};
use crate::storage::Storage;
use crate::timer::TickOutcome;
use crate::MemePackSdk;

const TICK_PERIOD: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// AsyncMemePackSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncMemePackSdk`] instance.
#[derive(Default)]
pub struct AsyncMemePackSdkBuilder {
    data_dir: Option<PathBuf>,
    storage: Option<Arc<dyn Storage>>,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
}

impl AsyncMemePackSdkBuilder {
    /// Set a custom data directory for the file-backed storage.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use an existing storage backend.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Use a custom clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed the pack generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the async SDK and start the ticker if the resumed timer is active.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn build(self) -> Result<AsyncMemePackSdk> {
        let sdk = tokio::task::spawn_blocking(move || {
            let mut builder = MemePackSdk::builder();
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            if let Some(storage) = self.storage {
                builder = builder.storage(storage);
            }
            if let Some(clock) = self.clock {
                builder = builder.clock(clock);
            }
            if let Some(seed) = self.seed {
                builder = builder.seed(seed);
            }
            builder.build()
        })
        .await
        .map_err(|e| MemePackError::InvalidArgument(format!("Task join error: {e}")))??;

        let client = AsyncMemePackSdk {
            inner: Arc::new(Mutex::new(Shared { sdk, ticker: None })),
            runtime: Handle::current(),
        };
        {
            let mut guard = lock_shared(&client.inner)?;
            ensure_ticker(&mut guard, &client.inner, &client.runtime);
        }
        Ok(client)
    }
}

// ---------------------------------------------------------------------------
// AsyncMemePackSdk
// ---------------------------------------------------------------------------

struct Shared {
    sdk: MemePackSdk,
    /// The running ticker task, if any. Only ever set or cleared while the
    /// lock is held, so at most one ticker exists.
    ticker: Option<JoinHandle<()>>,
}

/// Async wrapper around [`MemePackSdk`] that also keeps the pack timer ticking.
pub struct AsyncMemePackSdk {
    inner: Arc<Mutex<Shared>>,
    runtime: Handle,
}

impl AsyncMemePackSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncMemePackSdkBuilder {
        AsyncMemePackSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives a mutable reference to the SDK. If the timer is
    /// active afterwards and no ticker is running, one is started.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut MemePackSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = self.inner.clone();
        let runtime = self.runtime.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = lock_shared(&shared)?;
            let result = f(&mut guard.sdk);
            ensure_ticker(&mut guard, &shared, &runtime);
            result
        })
        .await
        .map_err(|e| MemePackError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Spend a pack opportunity and open a pack. `None` means none were left.
    pub async fn open_pack(&self, pack_type: &str) -> Result<Option<Vec<Card>>> {
        let pack_type = pack_type.to_string();
        self.run(move |s| s.open_pack(&pack_type)).await
    }

    /// Open a shop pack without spending an opportunity.
    pub async fn buy_pack(&self, shop_pack_id: &str) -> Result<Vec<Card>> {
        let shop_pack_id = shop_pack_id.to_string();
        self.run(move |s| s.buy_pack(&shop_pack_id)).await
    }

    /// Spend a pack opportunity without opening anything.
    pub async fn try_consume_opportunity(&self) -> Result<bool> {
        self.run(|s| s.timer_mut().try_consume()).await
    }

    /// Disenchant cards from the collection for Meme Dust.
    pub async fn disenchant(&self, ids: &[i64]) -> Result<DisenchantOutcome> {
        let ids = ids.to_vec();
        self.run(move |s| s.disenchant(&ids)).await
    }

    /// Snapshot of the pack timer.
    pub async fn state(&self) -> Result<TimerSnapshot> {
        self.run(|s| Ok(s.timer().state())).await
    }

    /// Whether the background ticker is currently running.
    pub fn is_ticking(&self) -> bool {
        match self.inner.lock() {
            Ok(guard) => guard.ticker.is_some(),
            Err(_) => false,
        }
    }

    /// Stop the ticker. The timer state already persisted is kept.
    pub async fn shutdown(self) -> Result<()> {
        let handle = lock_shared(&self.inner)?.ticker.take();
        abort_ticker(handle);
        Ok(())
    }
}

impl Drop for AsyncMemePackSdk {
    fn drop(&mut self) {
        let handle = match self.inner.lock() {
            Ok(mut guard) => guard.ticker.take(),
            Err(poisoned) => poisoned.into_inner().ticker.take(),
        };
        abort_ticker(handle);
    }
}

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

fn lock_shared(shared: &Mutex<Shared>) -> Result<MutexGuard<'_, Shared>> {
    shared
        .lock()
        .map_err(|_| MemePackError::InvalidArgument("SDK lock poisoned".into()))
}

fn abort_ticker(handle: Option<JoinHandle<()>>) {
    if let Some(handle) = handle {
        handle.abort();
        debug!("pack timer ticker aborted");
    }
}

/// Start a ticker if the timer is active and none is running.
///
/// Must be called with the lock held, through `guard`.
fn ensure_ticker(guard: &mut Shared, shared: &Arc<Mutex<Shared>>, runtime: &Handle) {
    if guard.ticker.is_none() && guard.sdk.timer().is_active() {
        guard.ticker = Some(runtime.spawn(run_ticker(Arc::downgrade(shared))));
        debug!("pack timer ticker started");
    }
}

/// Tick the timer once per second until it reports inactive or the SDK is
/// gone.
///
/// Missed ticks are delivered in a burst, so the countdown advances once per
/// elapsed second even if the runtime was busy.
async fn run_ticker(shared: Weak<Mutex<Shared>>) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        interval.tick().await;

        let Some(strong) = shared.upgrade() else {
            debug!("SDK dropped, pack timer ticker stopping");
            return;
        };
        let mut guard = match lock_shared(&strong) {
            Ok(guard) => guard,
            Err(e) => {
                warn!(error = %e, "pack timer ticker stopping");
                return;
            }
        };

        match guard.sdk.timer_mut().tick() {
            Ok(TickOutcome::Recharged { now_full: true }) => {
                info!("pack opportunities full, ticker stopping");
            }
            Ok(_) => {}
            // State is unchanged; the next tick retries the same transition.
            Err(e) => warn!(error = %e, "failed to persist pack timer tick"),
        }

        if !guard.sdk.timer().is_active() {
            guard.ticker = None;
            return;
        }
    }
}
