// Identifiers and the half-open time range shared by every booking component.
//
// Responsibilities
// - Give each entity its own id type so a room id can never be passed where a
//   reservation id is expected.
// - Own the interval arithmetic: overlap, containment and per-day slicing.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(RoomId);
entity_id!(EquipmentId);
entity_id!(UserId);
entity_id!(ReservationId);
entity_id!(PaymentId);
entity_id!(PaymentMethodId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interval end {end} must be after start {start}")]
pub struct InvalidInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// `[start, end)` in room-local wall-clock time. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = InvalidInterval;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, InvalidInterval> {
        if end <= start {
            return Err(InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window on `date` from `open` to `close`. A `close` of 00:00 means midnight
    /// at the end of the day. Returns `None` for an empty or inverted window.
    pub fn on_date(date: NaiveDate, open: NaiveTime, close: NaiveTime) -> Option<Self> {
        let start = date.and_time(open);
        let end = if close == NaiveTime::MIN {
            end_of_day(date)
        } else {
            date.and_time(close)
        };
        Self::new(start, end).ok()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Calendar dates touched by the range, first to last.
    pub fn first_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_date(&self) -> NaiveDate {
        // end is exclusive, so a range ending exactly at midnight stays on the previous day
        (self.end - TimeDelta::nanoseconds(1)).date()
    }

    /// Slices the range at every midnight it crosses.
    pub fn split_by_day(&self) -> Vec<(NaiveDate, TimeRange)> {
        let mut slices = Vec::new();
        let mut cursor = self.start;
        while cursor < self.end {
            let date = cursor.date();
            let slice_end = end_of_day(date).min(self.end);
            slices.push((
                date,
                TimeRange {
                    start: cursor,
                    end: slice_end,
                },
            ));
            cursor = slice_end;
        }
        slices
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX)
}
