//! Relative-time footer label.
//!
//! The label's precision is matched to its refresh cadence: a label
//! shown in seconds is re-rendered every five seconds, one shown in
//! days every twelve hours. Each tier decision returns the delay after
//! which the label must be drawn again; arming that timer replaces any
//! previous one, so a card never accumulates render timers.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Language;
use crate::i18n::Catalog;

/// Re-render delay while the label shows seconds.
pub const REDRAW_SECONDS: Duration = Duration::from_secs(5);

/// Re-render delay while the label shows minutes.
pub const REDRAW_MINUTES: Duration = Duration::from_secs(30);

/// Re-render delay while the label shows hours.
pub const REDRAW_HOURS: Duration = Duration::from_secs(30 * 60);

/// Re-render delay while the label shows days.
pub const REDRAW_DAYS: Duration = Duration::from_secs(12 * 60 * 60);

/// Display unit for the relative label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
}

impl Unit {
    /// Suffix of the `relative.in.*` / `relative.ago.*` catalog keys.
    fn key_suffix(self) -> &'static str {
        match self {
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
        }
    }
}

/// What the footer label should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// No reference instant yet: label empty, footer hidden.
    Hidden,

    /// The next scheduled event just passed; the refresh cycle, not the
    /// render cycle, is responsible for what happens next.
    Soon,

    /// Relative offset from now. Positive amounts are in the future.
    Relative { unit: Unit, amount: i64 },
}

impl Label {
    /// Localized label text; empty for `Hidden`.
    pub fn localize(&self, catalog: &Catalog, lang: Language) -> String {
        match self {
            Label::Hidden => String::new(),
            Label::Soon => catalog.t(lang, "card.updatingSoon"),
            Label::Relative { unit, amount } => {
                if *amount == 0 {
                    catalog.t(lang, "relative.now")
                } else if *amount > 0 {
                    let key = format!("relative.in.{}", unit.key_suffix());
                    catalog.t_n(lang, &key, *amount)
                } else {
                    let key = format!("relative.ago.{}", unit.key_suffix());
                    catalog.t_n(lang, &key, -*amount)
                }
            }
        }
    }
}

/// Compute the footer label and the delay until it must be redrawn.
///
/// The reference instant is `next_event` when present, else
/// `last_refresh`. Tier boundaries are exclusive-below: a difference of
/// exactly 90 seconds is shown in minutes, 3600 in hours, 86400 in
/// days.
pub fn relative_label(
    last_refresh: Option<DateTime<Utc>>,
    next_event: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (Label, Option<Duration>) {
    let Some(last_refresh) = last_refresh else {
        return (Label::Hidden, None);
    };

    let reference = next_event.unwrap_or(last_refresh);
    let diff_secs = (reference - now).num_milliseconds() as f64 / 1000.0;

    if next_event.is_some() && diff_secs < 0.0 {
        return (Label::Soon, None);
    }

    let (unit, divisor, redraw) = if diff_secs.abs() < 90.0 {
        (Unit::Second, 1.0, REDRAW_SECONDS)
    } else if diff_secs.abs() < 3600.0 {
        (Unit::Minute, 60.0, REDRAW_MINUTES)
    } else if diff_secs.abs() < 86400.0 {
        (Unit::Hour, 3600.0, REDRAW_HOURS)
    } else {
        (Unit::Day, 86400.0, REDRAW_DAYS)
    };

    let amount = (diff_secs / divisor).round() as i64;

    (Label::Relative { unit, amount }, Some(redraw))
}
