//! Buffet and opening hours models

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::util::format_hhmm;

/// Name given to the buffet row when it is first created
pub const DEFAULT_BUFFET_NAME: &str = "Iskolai Büfé";

/// Hungarian weekday names, Monday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Hétfő",
    "Kedd",
    "Szerda",
    "Csütörtök",
    "Péntek",
    "Szombat",
    "Vasárnap",
];

/// Buffet entity (singleton)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Buffet {
    pub id: i64,
    pub nev: String,
    /// Exceptionally closed, overrides the opening hours
    pub rendkivuli_zarva: bool,
}

/// One opening range of a weekday. Either bound missing means closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OpeningHours {
    pub id: i64,
    pub buffet_id: i64,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: i16,
    pub from_hour: Option<NaiveTime>,
    pub to_hour: Option<NaiveTime>,
}

impl OpeningHours {
    pub fn is_closed(&self) -> bool {
        self.from_hour.is_none() || self.to_hour.is_none()
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// Whether `time` falls inside this range (both ends inclusive)
    pub fn contains(&self, time: NaiveTime) -> bool {
        match (self.from_hour, self.to_hour) {
            (Some(from), Some(to)) => from <= time && time <= to,
            _ => false,
        }
    }
}

pub fn weekday_name(weekday: i16) -> &'static str {
    usize::try_from(weekday)
        .ok()
        .and_then(|i| WEEKDAY_NAMES.get(i))
        .copied()
        .unwrap_or("")
}

/// Whether the buffet is open at `at`.
///
/// The exceptional-closed flag wins over the schedule; otherwise some range
/// of that weekday has to contain the time of day.
pub fn is_open_at(buffet: &Buffet, hours: &[OpeningHours], at: NaiveDateTime) -> bool {
    if buffet.rendkivuli_zarva {
        return false;
    }
    let weekday = at.weekday().num_days_from_monday() as i16;
    let time = at.time();
    hours
        .iter()
        .any(|h| h.weekday == weekday && h.contains(time))
}

/// Opening hours as shown by the public endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHoursRepr {
    pub id: i64,
    pub weekday: i16,
    pub weekday_name: String,
    pub from_hour: Option<String>,
    pub to_hour: Option<String>,
    pub is_closed: bool,
}

impl From<&OpeningHours> for OpeningHoursRepr {
    fn from(h: &OpeningHours) -> Self {
        Self {
            id: h.id,
            weekday: h.weekday,
            weekday_name: h.weekday_name().to_string(),
            from_hour: h.from_hour.map(format_hhmm),
            to_hour: h.to_hour.map(format_hhmm),
            is_closed: h.is_closed(),
        }
    }
}

/// Public opening hours response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHoursResponse {
    pub bufe_name: String,
    pub rendkivuli_zarva: bool,
    pub is_open: bool,
    pub opening_hours: Vec<OpeningHoursRepr>,
}

/// Update one opening hours row; empty or missing time means closed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHoursUpdate {
    pub id: i64,
    #[serde(default)]
    pub from_hour: Option<String>,
    #[serde(default)]
    pub to_hour: Option<String>,
}

/// Update buffet payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffetUpdate {
    pub rendkivuli_zarva: bool,
}
