use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;
use festival::community::CommunityDirectory;
use festival::config::AppConfig;
use festival::error::AppError;
use festival::registration::{
    evaluate_birth_date, format_document, is_valid_document, normalize_document, CityCatalog,
    CityId, CitySource, HttpParticipantGateway, RegistrationForm, SubmissionCoordinator,
    SubmissionOutcome, SubmissionPolicy, ValidationError,
};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct CitiesArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DocumentArgs {
    /// CPF as typed, with or without punctuation
    pub(crate) raw: String,
}

#[derive(Args, Debug)]
pub(crate) struct AgeArgs {
    /// Birth date (YYYY-MM-DD)
    pub(crate) birth_date: String,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    /// Participant's full name
    #[arg(long)]
    pub(crate) name: String,
    /// CPF, with or without punctuation
    #[arg(long)]
    pub(crate) document: String,
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) birth_date: String,
    /// Mobile number with area code
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(long)]
    pub(crate) email: String,
    /// City id or display name
    #[arg(long)]
    pub(crate) city: String,
    /// Why the participant wants to take part
    #[arg(long, default_value = "")]
    pub(crate) reason: String,
    /// Confirms the participant read and accepted the regulation
    #[arg(long)]
    pub(crate) accept_regulation: bool,
    /// Evaluation date for the age check (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct GroupsArgs {
    /// Only show the group for this city
    #[arg(long)]
    pub(crate) city: Option<String>,
}

pub(crate) async fn run_cities(config: &AppConfig, args: CitiesArgs) -> Result<(), AppError> {
    let coordinator = coordinator(config);
    let catalog = coordinator.load_cities().await;

    if args.json {
        println!("{}", to_json(&catalog));
        return Ok(());
    }

    if catalog.source == CitySource::Fallback {
        println!("(lista padrão: serviço de inscrições indisponível)");
    }
    for city in &catalog.cities {
        match &city.state {
            Some(state) => println!("{} - {}  [{}]", city.name, state, city.id.0),
            None => println!("{}  [{}]", city.name, city.id.0),
        }
    }
    Ok(())
}

pub(crate) fn run_document(args: DocumentArgs) -> Result<(), AppError> {
    let masked = format_document(&args.raw);
    let digits = normalize_document(&args.raw);
    let verdict = if is_valid_document(&args.raw) {
        "válido"
    } else {
        "inválido"
    };
    println!("CPF: {masked}");
    println!("Dígitos: {digits}");
    println!("Situação: {verdict}");
    Ok(())
}

pub(crate) fn run_age(args: AgeArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let result = evaluate_birth_date(&args.birth_date, today);

    if args.json {
        println!("{}", to_json(&result));
        return Ok(());
    }

    println!("Idade: {}", result.age);
    println!("Elegível: {}", if result.is_valid { "sim" } else { "não" });
    if !result.message.is_empty() {
        println!("{}", result.message);
    }
    Ok(())
}

pub(crate) async fn run_register(config: &AppConfig, args: RegisterArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let coordinator = coordinator(config);
    let catalog = coordinator.load_cities().await;
    let city_id = resolve_city(&catalog, &args.city)?;
    let city_name = catalog
        .find(&city_id)
        .map(|city| city.name.clone())
        .unwrap_or_default();

    let mut form = RegistrationForm::new();
    form.open();
    form.set_full_name(&args.name);
    form.set_document(&args.document);
    form.set_birth_date(&args.birth_date, today);
    form.set_phone(&args.phone);
    form.set_email(&args.email);
    form.set_city(city_id);
    form.set_motivation(&args.reason);
    form.set_regulation_accepted(args.accept_regulation);

    if !form.age().message.is_empty() {
        println!("{}", form.age().message);
    }

    let outcome = coordinator.submit(&mut form).await?;
    info!(accepted = outcome.is_accepted(), city = %city_name, "registration finished");
    println!("{}", outcome.user_message());

    match &outcome {
        SubmissionOutcome::Accepted { .. } => {
            if let Some(group) = CommunityDirectory::builtin().for_city(&city_name) {
                println!("{}: {}", group.description, group.link);
            }
        }
        SubmissionOutcome::Rejected { status, message } if !message.is_empty() => {
            eprintln!("HTTP {status}: {message}");
        }
        _ => {}
    }
    Ok(())
}

pub(crate) fn run_groups(args: GroupsArgs) -> Result<(), AppError> {
    let directory = CommunityDirectory::builtin();
    let groups: Vec<_> = match &args.city {
        Some(city) => directory.for_city(city).into_iter().collect(),
        None => directory.groups().iter().collect(),
    };

    if groups.is_empty() {
        println!("Nenhum grupo encontrado.");
    }
    for group in groups {
        println!("{}: {}", group.city, group.link);
    }
    Ok(())
}

fn coordinator(config: &AppConfig) -> SubmissionCoordinator<HttpParticipantGateway> {
    SubmissionCoordinator::new(
        Arc::new(HttpParticipantGateway::from_config(&config.api)),
        SubmissionPolicy::from(&config.api),
    )
}

/// Accepts either a city id from the catalog or its display name.
fn resolve_city(catalog: &CityCatalog, raw: &str) -> Result<CityId, ValidationError> {
    let id = CityId(raw.trim().to_string());
    catalog
        .find(&id)
        .or_else(|| catalog.find_by_name(raw))
        .map(|city| city.id.clone())
        .ok_or_else(|| ValidationError::UnknownCity(raw.trim().to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}
