use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::is_http_url;
use crate::registration::slugify;

const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

/// Voting configuration for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityVotingEntry {
    pub key: String,
    pub name: String,
    pub url: String,
    pub opens_on: NaiveDate,
    /// Closed cities never open, whatever `opens_on` says.
    #[serde(default)]
    pub closed: bool,
}

/// City voting table, loadable from JSON so dates change without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSchedule {
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    pub cities: Vec<CityVotingEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("unable to read schedule {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed schedule: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("utc offset {0}h is outside -23..=23")]
    InvalidOffset(i32),
    #[error("city entry with empty key")]
    EmptyKey,
    #[error("city '{0}' listed more than once")]
    DuplicateCity(String),
    #[error("city '{key}' has non-http voting url '{url}'")]
    InvalidUrl { key: String, url: String },
    #[error("city '{0}' opens outside the supported date range")]
    OpeningOutOfRange(String),
}

impl VotingSchedule {
    /// Table shipped with the site.
    pub fn builtin() -> Self {
        let entry = |key: &str, name: &str, opens_on: (i32, u32, u32), closed: bool| {
            CityVotingEntry {
                key: key.to_string(),
                name: name.to_string(),
                url: format!("https://festivaldamusicagospelparaense.com/votacao/{key}"),
                opens_on: NaiveDate::from_ymd_opt(opens_on.0, opens_on.1, opens_on.2)
                    .unwrap_or(NaiveDate::MIN),
                closed,
            }
        };

        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            cities: vec![
                entry("maraba", "Marabá", (2025, 10, 4), true),
                entry("santarem", "Santarém", (2025, 10, 18), true),
                entry("portel", "Portel", (2025, 11, 8), false),
                entry("benevides", "Benevides", (2025, 11, 22), false),
                entry("belem", "Belém", (2025, 12, 6), false),
            ],
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ScheduleError> {
        let schedule: Self = serde_json::from_str(raw)?;
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let raw = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Loads `path` when given, otherwise the built-in table.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ScheduleError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(ScheduleError::InvalidOffset(self.utc_offset_hours));
        }

        let mut seen = HashSet::new();
        for city in &self.cities {
            let key = slugify(&city.key);
            if key.is_empty() {
                return Err(ScheduleError::EmptyKey);
            }
            if !seen.insert(key) {
                return Err(ScheduleError::DuplicateCity(city.key.clone()));
            }
            if !is_http_url(&city.url) {
                return Err(ScheduleError::InvalidUrl {
                    key: city.key.clone(),
                    url: city.url.clone(),
                });
            }
            if self.opening_instant(city.opens_on).is_none() {
                return Err(ScheduleError::OpeningOutOfRange(city.key.clone()));
            }
        }
        Ok(())
    }

    /// Local offset in which opening dates are expressed.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Local midnight of `opens_on` as a UTC instant, or `None` when that falls outside
    /// chrono's representable range.
    pub fn opening_instant(&self, opens_on: NaiveDate) -> Option<DateTime<Utc>> {
        let local_midnight = opens_on.and_time(NaiveTime::MIN);
        let offset = Duration::seconds(i64::from(self.offset().local_minus_utc()));
        local_midnight
            .checked_sub_signed(offset)
            .map(|utc| Utc.from_utc_datetime(&utc))
    }

    /// Looks a city up by key or display name, ignoring case and accents.
    pub fn entry(&self, key: &str) -> Option<&CityVotingEntry> {
        let wanted = slugify(key);
        self.cities
            .iter()
            .find(|city| slugify(&city.key) == wanted || slugify(&city.name) == wanted)
    }
}

impl Default for VotingSchedule {
    fn default() -> Self {
        Self::builtin()
    }
}
