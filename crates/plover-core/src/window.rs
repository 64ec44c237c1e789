//! Notification window math.
//!
//! A birthday notification fires at local midnight on the occurrence date in
//! the user's effective timezone. This module localizes that midnight into an
//! absolute instant and measures its distance from an explicit `now`, which
//! callers thread through so a whole batch of users is evaluated against one
//! consistent timestamp.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::Birthday;

/// Resolves a stored IANA timezone identifier to a timezone.
///
/// An absent or unrecognized identifier falls back to UTC; bad stored data
/// must never fail scheduling outright.
pub fn resolve_timezone(stored: Option<&str>) -> Tz {
    match stored {
        None => Tz::UTC,
        Some(name) => name.parse().unwrap_or_else(|_| {
            warn!(timezone = name, "Unrecognized timezone identifier, using UTC");
            Tz::UTC
        }),
    }
}

/// Converts local midnight on `date` in `tz` to an absolute instant.
///
/// An ambiguous midnight (clocks rolled back across it) takes the earlier
/// instant; a midnight skipped by a DST jump takes the first valid local
/// time after it.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).expect("valid time");
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // Some zones jump forward over midnight itself. Walk forward a
            // minute at a time until the local clock exists again; DST gaps
            // never exceed a few hours.
            for minutes in 1..=180 {
                let probe = midnight + Duration::minutes(minutes);
                if let LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) =
                    tz.from_local_datetime(&probe)
                {
                    return dt.with_timezone(&Utc);
                }
            }
            warn!(date = %date, timezone = %tz, "Could not localize midnight, treating as UTC");
            Utc.from_utc_datetime(&midnight)
        }
    }
}

/// The instant a birthday notification should fire, and its distance from
/// "now". Transient: computed per scheduling decision, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationWindow {
    /// The occurrence date the window was computed for.
    pub occurrence: NaiveDate,
    /// Local midnight of the occurrence as an absolute instant.
    pub fire_at: DateTime<Utc>,
    /// `fire_at - now`. Negative when midnight has already passed.
    pub delta: Duration,
}

impl NotificationWindow {
    /// Computes the window for this year's occurrence of `birthday` in `tz`.
    ///
    /// "This year" is the year of `now`'s UTC date; the birthday's stored
    /// year, if any, is ignored here (it only feeds age calculation).
    pub fn compute(birthday: &Birthday, tz: Tz, now: DateTime<Utc>) -> Self {
        let occurrence = birthday.date_in_year(now.year());
        let fire_at = local_midnight(occurrence, tz);
        Self {
            occurrence,
            fire_at,
            delta: fire_at - now,
        }
    }

    /// True when the fire instant is now or within the next 24 hours.
    pub fn is_within_next_day(&self) -> bool {
        self.delta >= Duration::zero() && self.delta < Duration::hours(24)
    }

    /// True when midnight has already passed but `now`'s calendar date in
    /// `tz` still equals the occurrence date, so the notification should
    /// fire immediately rather than be dropped.
    pub fn missed_but_still_today(&self, tz: Tz, now: DateTime<Utc>) -> bool {
        self.delta < Duration::zero() && now.with_timezone(&tz).date_naive() == self.occurrence
    }
}
