use serde::{Deserialize, Serialize};

use crate::config::{MAX_PACK_OPPORTUNITIES, RECHARGE_INTERVAL_SECS};

// ---------------------------------------------------------------------------
// PackOpportunityState — Persisted pack timer state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackOpportunityState {
    pub pack_opportunities: u8,
    pub time_until_next_pack: u32,
    pub is_timer_active: bool,
}

impl PackOpportunityState {
    /// A full bank of opportunities with the countdown parked at 2 hours.
    pub fn full() -> Self {
        Self {
            pack_opportunities: MAX_PACK_OPPORTUNITIES,
            time_until_next_pack: RECHARGE_INTERVAL_SECS,
            is_timer_active: false,
        }
    }
}

impl Default for PackOpportunityState {
    fn default() -> Self {
        Self::full()
    }
}

// ---------------------------------------------------------------------------
// TimerSnapshot — Read-only view of the pack timer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub opportunities: u8,
    pub seconds_remaining: u32,
    pub is_active: bool,
}

impl TimerSnapshot {
    /// The countdown rendered as `HH:MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_countdown(self.seconds_remaining)
    }
}

impl From<PackOpportunityState> for TimerSnapshot {
    fn from(state: PackOpportunityState) -> Self {
        Self {
            opportunities: state.pack_opportunities,
            seconds_remaining: state.time_until_next_pack,
            is_active: state.is_timer_active,
        }
    }
}

/// Format a number of seconds as zero-padded `HH:MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
