use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::schedule::{CityVotingEntry, VotingSchedule};

/// Whether a city's voting link may be followed right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum VotingWindow {
    Open { url: String },
    NotYetOpen { opens_on: NaiveDate },
    PermanentlyClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VotingError {
    #[error("no voting schedule for city '{0}'")]
    UnknownCity(String),
    #[error("voting for city '{0}' opens outside the supported date range")]
    OpeningOutOfRange(String),
}

/// Fire-and-forget navigation to an external voting form.
pub trait LinkOpener {
    fn open(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NoticeStatus {
    Closed,
    OpensOn { date: NaiveDate, label: String },
}

/// What the informational modal shows when the link cannot be followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingNotice {
    pub city_name: String,
    pub status: NoticeStatus,
}

impl VotingNotice {
    pub fn message(&self) -> String {
        match &self.status {
            NoticeStatus::Closed => format!("A votação de {} está encerrada.", self.city_name),
            NoticeStatus::OpensOn { label, .. } => {
                format!("A votação de {} abre em {}.", self.city_name, label)
            }
        }
    }
}

/// Result of a city-button click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingPrompt {
    Opened { url: String },
    Notice(VotingNotice),
}

/// `D/M` without zero padding, as shown in the modal.
pub fn day_month_label(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

/// Stateless resolver; every call reads the schedule against the supplied instant.
#[derive(Debug, Clone, Default)]
pub struct VotingWindowResolver {
    schedule: VotingSchedule,
}

impl VotingWindowResolver {
    pub fn new(schedule: VotingSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &VotingSchedule {
        &self.schedule
    }

    /// Local midnight of `opens_on` in the schedule's offset, as a UTC instant.
    pub fn opening_instant(&self, opens_on: NaiveDate) -> Option<DateTime<Utc>> {
        self.schedule.opening_instant(opens_on)
    }

    pub fn resolve(&self, city_key: &str, now: DateTime<Utc>) -> Result<VotingWindow, VotingError> {
        let entry = self.entry(city_key)?;
        let window = self.window_for(entry, now)?;
        debug!(city = %entry.key, ?window, "resolved voting window");
        Ok(window)
    }

    /// Resolves and performs the click side effect.
    ///
    /// An open window hands the URL to `opener`; the other states come back as a notice for
    /// the caller to display.
    pub fn dispatch(
        &self,
        city_key: &str,
        now: DateTime<Utc>,
        opener: &dyn LinkOpener,
    ) -> Result<VotingPrompt, VotingError> {
        let entry = self.entry(city_key)?;
        let prompt = match self.window_for(entry, now)? {
            VotingWindow::Open { url } => {
                opener.open(&url);
                VotingPrompt::Opened { url }
            }
            VotingWindow::NotYetOpen { opens_on } => VotingPrompt::Notice(VotingNotice {
                city_name: entry.name.clone(),
                status: NoticeStatus::OpensOn {
                    date: opens_on,
                    label: day_month_label(opens_on),
                },
            }),
            VotingWindow::PermanentlyClosed => VotingPrompt::Notice(VotingNotice {
                city_name: entry.name.clone(),
                status: NoticeStatus::Closed,
            }),
        };
        Ok(prompt)
    }

    fn entry(&self, city_key: &str) -> Result<&CityVotingEntry, VotingError> {
        self.schedule
            .entry(city_key)
            .ok_or_else(|| VotingError::UnknownCity(city_key.to_string()))
    }

    fn window_for(
        &self,
        entry: &CityVotingEntry,
        now: DateTime<Utc>,
    ) -> Result<VotingWindow, VotingError> {
        if entry.closed {
            return Ok(VotingWindow::PermanentlyClosed);
        }
        let opens_at = self
            .opening_instant(entry.opens_on)
            .ok_or_else(|| VotingError::OpeningOutOfRange(entry.key.clone()))?;
        let window = if now >= opens_at {
            VotingWindow::Open {
                url: entry.url.clone(),
            }
        } else {
            VotingWindow::NotYetOpen {
                opens_on: entry.opens_on,
            }
        };
        Ok(window)
    }
}
