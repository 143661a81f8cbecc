// Bookable things and their calendars.
//
// Purpose
// - Plain data for rooms, equipment, weekly opening hours and date overrides.
//
// Boundaries
// - Associations are id references only. Rooms do not own their reservations;
//   the reservation store is queried by interval instead.

use crate::shared::core::primitives::{EquipmentId, RoomId, TimeRange};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub width_m: Option<Decimal>,
    #[serde(default)]
    pub length_m: Option<Decimal>,
    pub status: RoomStatus,
    /// Equipment permanently installed in the room. Not priced.
    #[serde(default)]
    pub equipment: Vec<RoomEquipment>,
}

impl Room {
    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEquipment {
    pub equipment_id: EquipmentId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub stock: u32,
}

/// Equipment requested alongside a reservation. Quantity is signed so that
/// caller input can be rejected with a precise error instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentLine {
    pub equipment_id: EquipmentId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub room_id: RoomId,
    #[serde(deserialize_with = "deserialize_weekday")]
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WeeklySchedule {
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.weekday == date.weekday()
    }

    pub fn window_on(&self, date: NaiveDate) -> Option<TimeRange> {
        TimeRange::on_date(date, self.start, self.end)
    }

    /// False for an empty or inverted row, which would never open.
    pub fn has_window(&self) -> bool {
        TimeRange::on_date(NaiveDate::MIN, self.start, self.end).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub room_id: RoomId,
    pub date: NaiveDate,
    #[serde(default)]
    pub label: Option<String>,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub is_open: bool,
}

impl DateOverride {
    pub fn window(&self) -> Option<TimeRange> {
        TimeRange::on_date(self.date, self.start, self.end)
    }
}

/// 0 = Sunday through 6 = Saturday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeekdayRepr {
    Index(u8),
    Name(Weekday),
}

/// Accepts a day name ("Mon", "Tuesday") or an index with 0 = Sunday.
fn deserialize_weekday<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
where
    D: Deserializer<'de>,
{
    match WeekdayRepr::deserialize(deserializer)? {
        WeekdayRepr::Index(index) => weekday_from_index(index)
            .ok_or_else(|| D::Error::custom(format!("weekday index {index} is outside 0..=6"))),
        WeekdayRepr::Name(day) => Ok(day),
    }
}
