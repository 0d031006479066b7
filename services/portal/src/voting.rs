use chrono::{DateTime, Utc};
use clap::Args;
use festival::config::AppConfig;
use festival::error::AppError;
use festival::voting::{VotingPrompt, VotingSchedule, VotingWindowResolver};

use crate::infra::TerminalLinkOpener;

#[derive(Args, Debug)]
pub(crate) struct VoteArgs {
    /// City key or display name, e.g. `portel` or `Belém`
    pub(crate) city: String,
    /// Evaluate at this instant (RFC 3339) instead of now
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_vote(config: &AppConfig, args: VoteArgs) -> Result<(), AppError> {
    let schedule = VotingSchedule::load_or_builtin(config.voting.schedule_path.as_deref())?;
    let resolver = VotingWindowResolver::new(schedule);
    let now = args.now.unwrap_or_else(Utc::now);

    match resolver.dispatch(&args.city, now, &TerminalLinkOpener)? {
        VotingPrompt::Opened { .. } => {}
        VotingPrompt::Notice(notice) => println!("{}", notice.message()),
    }
    Ok(())
}
