//! Auto-switch schedule: which theme should be active at a time of day.
//!
//! Times are `HH:MM` strings; once validated they compare correctly as plain
//! strings, which is all the schedule needs.

use super::document::AutoSwitch;
use chrono::NaiveTime;

/// Which half of the day a time falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Light,
    Dark,
}

fn valid_time(value: &str) -> bool {
    value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// The period `now` falls in, or `None` when the schedule is disabled or
/// its times are missing/invalid.
pub fn period_at(auto: &AutoSwitch, now: NaiveTime) -> Option<Period> {
    if !auto.enabled {
        return None;
    }
    let light = auto.light_time.as_deref()?;
    let dark = auto.dark_time.as_deref()?;
    if !valid_time(light) || !valid_time(dark) {
        tracing::warn!(light, dark, "Ignoring auto-switch schedule with invalid times");
        return None;
    }

    let now = now.format("%H:%M").to_string();
    let in_light = if light <= dark {
        light <= now.as_str() && now.as_str() < dark
    } else {
        // light period wraps past midnight
        now.as_str() >= light || now.as_str() < dark
    };
    Some(if in_light { Period::Light } else { Period::Dark })
}

/// The theme the schedule wants at `now`.
pub fn scheduled_theme(auto: &AutoSwitch, now: NaiveTime) -> Option<&str> {
    match period_at(auto, now)? {
        Period::Light => auto.light_theme.as_deref(),
        Period::Dark => auto.dark_theme.as_deref(),
    }
}

/// The next `HH:MM` boundary after `now`, for re-arming a timer.
pub fn next_boundary(auto: &AutoSwitch, now: NaiveTime) -> Option<String> {
    period_at(auto, now)?;
    let light = auto.light_time.as_deref()?;
    let dark = auto.dark_time.as_deref()?;
    let now = now.format("%H:%M").to_string();

    let mut upcoming: Vec<&str> = [light, dark]
        .into_iter()
        .filter(|t| *t > now.as_str())
        .collect();
    upcoming.sort_unstable();
    let next = upcoming
        .first()
        .copied()
        .unwrap_or_else(|| light.min(dark));
    Some(next.to_string())
}
