use crate::registration::{
    run_age, run_cities, run_document, run_groups, run_register, AgeArgs, CitiesArgs,
    DocumentArgs, GroupsArgs, RegisterArgs,
};
use crate::voting::{run_vote, VoteArgs};
use clap::{Parser, Subcommand};
use festival::config::AppConfig;
use festival::error::AppError;
use festival::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "festival-portal",
    about = "Register participants and follow voting links for the Festival da Música Gospel Paraense",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the cities offered in the registration form
    Cities(CitiesArgs),
    /// Mask and validate a CPF
    Document(DocumentArgs),
    /// Check whether a birth date is eligible to register
    Age(AgeArgs),
    /// Open a city's voting form, or explain why it is not available
    Vote(VoteArgs),
    /// Submit a participant registration
    Register(RegisterArgs),
    /// Show the regional WhatsApp groups
    Groups(GroupsArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Cities(args) => run_cities(&config, args).await,
        Command::Document(args) => run_document(args),
        Command::Age(args) => run_age(args),
        Command::Vote(args) => run_vote(&config, args),
        Command::Register(args) => run_register(&config, args).await,
        Command::Groups(args) => run_groups(args),
    }
}
