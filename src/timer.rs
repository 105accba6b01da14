//! Pack opportunity recharge timer.
//!
//! Users bank up to [`MAX_PACK_OPPORTUNITIES`] pack opportunities. While
//! fewer than that are banked the timer counts down one
//! [`RECHARGE_INTERVAL_SECS`] interval at a time and grants an opportunity
//! whenever it runs out. The state is persisted after every transition and,
//! when a session starts, replayed forward over the time the process was not
//! running.
//!
//! [`PackTimer`] is a plain state machine: something else has to call
//! [`PackTimer::tick`] once per second while [`PackTimer::is_active`] is true.
//! The async SDK does this with a tokio task.

use crate::clock::Clock;
use crate::config::{
    MAX_PACK_OPPORTUNITIES, PACK_LAST_UPDATED_KEY, PACK_STATE_KEY, RECHARGE_INTERVAL_SECS,
};
use crate::error::Result;
use crate::models::{PackOpportunityState, TimerSnapshot};
use crate::storage::Storage;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a call to [`PackTimer::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is not running; nothing changed.
    Idle,
    /// One second came off the countdown.
    Counting,
    /// The countdown ran out and an opportunity was granted.
    Recharged {
        /// True when the grant filled the bank and the timer stopped.
        now_full: bool,
    },
}

/// The recharge state machine together with its persistence.
pub struct PackTimer {
    state: PackOpportunityState,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl PackTimer {
    /// Start a session: load the persisted timer and fast-forward it to now.
    ///
    /// Missing or unreadable state is treated as a new user with a full bank.
    /// The resulting state is written back, stamped with the instant replay
    /// stopped at.
    pub fn resume(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Result<Self> {
        let now_ms = clock.now_millis();
        let (state, saved_at_ms) = match load_saved(storage.as_ref())? {
            Some((saved, last_updated_ms)) => {
                let elapsed_secs = now_ms.saturating_sub(last_updated_ms).div_euclid(1000);
                let replayed = replay(
                    saved.pack_opportunities,
                    saved.time_until_next_pack,
                    elapsed_secs,
                );
                info!(
                    elapsed_secs,
                    opportunities = replayed.pack_opportunities,
                    seconds_remaining = replayed.time_until_next_pack,
                    "resumed pack timer"
                );
                // Carry the unreplayed sub-second remainder into the next
                // session. A clock that went backwards rebases on now.
                let baseline_ms = if elapsed_secs < 0 {
                    warn!(elapsed_secs, "clock moved backwards since last save, replaying zero seconds");
                    now_ms
                } else {
                    last_updated_ms.saturating_add(elapsed_secs * 1000)
                };
                (replayed, baseline_ms)
            }
            None => {
                debug!("no saved pack timer, starting with a full bank");
                (PackOpportunityState::full(), now_ms)
            }
        };

        let timer = Self {
            state,
            storage,
            clock,
        };
        timer.persist(&state, saved_at_ms)?;
        Ok(timer)
    }

    /// Read-only snapshot of the timer.
    pub fn state(&self) -> TimerSnapshot {
        self.state.into()
    }

    /// Whether the countdown is running (fewer than the maximum banked).
    pub fn is_active(&self) -> bool {
        self.state.is_timer_active
    }

    /// Number of pack opportunities banked.
    pub fn opportunities(&self) -> u8 {
        self.state.pack_opportunities
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing while the timer is idle. When the countdown runs out an
    /// opportunity is granted and the countdown restarts at the full
    /// interval. If persisting the new state fails the in-memory state is
    /// left untouched and the error is returned.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if !self.state.is_timer_active {
            return Ok(TickOutcome::Idle);
        }

        let remaining = self.state.time_until_next_pack.saturating_sub(1);
        if remaining > 0 {
            self.commit(PackOpportunityState {
                time_until_next_pack: remaining,
                ..self.state
            })?;
            return Ok(TickOutcome::Counting);
        }

        let opportunities = (self.state.pack_opportunities + 1).min(MAX_PACK_OPPORTUNITIES);
        let next = PackOpportunityState {
            pack_opportunities: opportunities,
            time_until_next_pack: RECHARGE_INTERVAL_SECS,
            is_timer_active: opportunities < MAX_PACK_OPPORTUNITIES,
        };
        self.commit(next)?;

        let now_full = !next.is_timer_active;
        info!(opportunities, now_full, "pack opportunity recharged");
        Ok(TickOutcome::Recharged { now_full })
    }

    /// Spend one pack opportunity.
    ///
    /// Returns `Ok(false)` without changing anything when none are left.
    /// Spending from a full bank starts the countdown.
    pub fn try_consume(&mut self) -> Result<bool> {
        let current = self.state.pack_opportunities;
        if current == 0 {
            debug!("no pack opportunities left");
            return Ok(false);
        }

        self.commit(PackOpportunityState {
            pack_opportunities: current - 1,
            time_until_next_pack: self.state.time_until_next_pack,
            is_timer_active: true,
        })?;

        if current == MAX_PACK_OPPORTUNITIES {
            info!("bank no longer full, recharge timer started");
        }
        debug!(opportunities = current - 1, "consumed pack opportunity");
        Ok(true)
    }

    fn commit(&mut self, next: PackOpportunityState) -> Result<()> {
        debug_assert_eq!(
            next.is_timer_active,
            next.pack_opportunities < MAX_PACK_OPPORTUNITIES
        );
        self.persist(&next, self.clock.now_millis())?;
        self.state = next;
        Ok(())
    }

    /// Write the timestamp, then the state. If the state write fails the
    /// old state is kept on disk next to a newer timestamp, which at worst
    /// drops the time since the previous save from the next replay.
    fn persist(&self, state: &PackOpportunityState, saved_at_ms: i64) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.storage
            .set(PACK_LAST_UPDATED_KEY, &saved_at_ms.to_string())?;
        self.storage.set(PACK_STATE_KEY, &json)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Offline replay
// ---------------------------------------------------------------------------

/// Fast-forward a saved timer over `elapsed_secs` seconds.
///
/// Inputs are taken as wide signed integers so that hand-edited or corrupt
/// values can be clamped: opportunities into `[0, max]`, the countdown to at
/// most one interval, and negative elapsed time (a clock that moved
/// backwards) to zero.
pub fn replay(saved_opportunities: i64, saved_time: i64, elapsed_secs: i64) -> PackOpportunityState {
    let max = i64::from(MAX_PACK_OPPORTUNITIES);
    let interval = i64::from(RECHARGE_INTERVAL_SECS);

    let elapsed = elapsed_secs.max(0);
    let saved_opportunities = saved_opportunities.clamp(0, max);
    let saved_time = saved_time.min(interval);

    let mut opportunities = saved_opportunities
        .saturating_add(elapsed / interval)
        .min(max);
    let mut time = saved_time.saturating_sub(elapsed % interval);

    if time <= 0 && opportunities < max {
        opportunities += 1;
        time = interval;
    }
    // Already full: the countdown is only a display value.
    if time <= 0 {
        time = interval;
    }

    PackOpportunityState {
        pack_opportunities: opportunities as u8,
        time_until_next_pack: time as u32,
        is_timer_active: opportunities < max,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedState {
    pack_opportunities: i64,
    time_until_next_pack: i64,
}

/// Load the saved timer and its timestamp, or `None` if either is missing
/// or cannot be parsed.
fn load_saved(storage: &dyn Storage) -> Result<Option<(SavedState, i64)>> {
    let (Some(raw_state), Some(raw_updated)) = (
        storage.get(PACK_STATE_KEY)?,
        storage.get(PACK_LAST_UPDATED_KEY)?,
    ) else {
        return Ok(None);
    };

    let saved: SavedState = match serde_json::from_str(&raw_state) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "corrupt pack timer state, resetting");
            return Ok(None);
        }
    };
    let last_updated_ms: i64 = match raw_updated.trim().parse() {
        Ok(ms) => ms,
        Err(e) => {
            warn!(error = %e, value = %raw_updated, "corrupt pack timer timestamp, resetting");
            return Ok(None);
        }
    };

    Ok(Some((saved, last_updated_ms)))
}
