//! Per-city voting windows driven by a schedule artifact and the wall clock.

mod resolver;
mod schedule;

pub use resolver::{
    day_month_label, LinkOpener, NoticeStatus, VotingError, VotingNotice, VotingPrompt,
    VotingWindow, VotingWindowResolver,
};
pub use schedule::{CityVotingEntry, ScheduleError, VotingSchedule};
