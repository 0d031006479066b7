use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::age::AgeValidationResult;
use super::domain::{fallback_cities, City, CityId, ParticipantDraft, ParticipantRequest};
use super::form::{preflight, RegistrationForm, ValidationError};
use super::gateway::{GatewayError, ParticipantGateway};
use crate::config::ApiConfig;

const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(8);
const DEFAULT_CITIES_TIMEOUT: Duration = Duration::from_secs(3);

/// What to report when the participant service cannot be reached at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreachablePolicy {
    /// Report the outage to the user.
    Strict,
    /// Pretend the submission was accepted. Development only.
    Lenient,
}

/// Bounded waits and failure policy for backend calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPolicy {
    pub submit_timeout: Duration,
    pub cities_timeout: Duration,
    pub unreachable: UnreachablePolicy,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            cities_timeout: DEFAULT_CITIES_TIMEOUT,
            unreachable: UnreachablePolicy::Strict,
        }
    }
}

impl From<&ApiConfig> for SubmissionPolicy {
    fn from(config: &ApiConfig) -> Self {
        Self {
            submit_timeout: config.submit_timeout,
            cities_timeout: config.cities_timeout,
            unreachable: config.unreachable_policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    Confirmed,
    /// The service was unreachable and the lenient policy stood in for it.
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkFailure {
    Timeout,
    Unreachable(String),
}

/// Result of a submission that passed the local checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SubmissionOutcome {
    Accepted { delivery: Delivery },
    Rejected { status: u16, message: String },
    NetworkFailure { failure: NetworkFailure },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    /// The draft is discarded only once the submission counts as accepted.
    pub fn clears_draft(&self) -> bool {
        self.is_accepted()
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted {
                delivery: Delivery::Confirmed,
            } => "Inscrição enviada com sucesso!",
            SubmissionOutcome::Accepted {
                delivery: Delivery::Simulated,
            } => "Servidor offline: inscrição simulada para desenvolvimento.",
            SubmissionOutcome::Rejected { .. } => "Erro ao enviar inscrição. Tente novamente.",
            SubmissionOutcome::NetworkFailure {
                failure: NetworkFailure::Timeout,
            } => "Timeout na conexão. Tente novamente mais tarde.",
            SubmissionOutcome::NetworkFailure {
                failure: NetworkFailure::Unreachable(_),
            } => "Não foi possível conectar ao servidor. Tente novamente mais tarde.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitySource {
    Remote,
    Fallback,
}

/// Cities available to the selector and where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCatalog {
    pub cities: Vec<City>,
    pub source: CitySource,
}

impl CityCatalog {
    pub fn fallback() -> Self {
        Self {
            cities: fallback_cities(),
            source: CitySource::Fallback,
        }
    }

    pub fn find(&self, id: &CityId) -> Option<&City> {
        self.cities.iter().find(|city| &city.id == id)
    }

    /// Matches a city by display name, ignoring case and accents.
    pub fn find_by_name(&self, name: &str) -> Option<&City> {
        let wanted = super::domain::slugify(name);
        self.cities.iter().find(|city| city.slug() == wanted)
    }
}

/// Releases the form's pending flag however the submit future ends, including when it is
/// dropped before the gateway answers.
struct PendingSubmission<'a>(&'a mut RegistrationForm);

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.0.is_pending() {
            debug!("submission abandoned before completion; releasing form");
            self.0.release_pending();
        }
    }
}

/// Drives the city fetch and participant submission against a gateway.
pub struct SubmissionCoordinator<G> {
    gateway: Arc<G>,
    policy: SubmissionPolicy,
}

impl<G> SubmissionCoordinator<G>
where
    G: ParticipantGateway + 'static,
{
    pub fn new(gateway: Arc<G>, policy: SubmissionPolicy) -> Self {
        Self { gateway, policy }
    }

    pub fn policy(&self) -> &SubmissionPolicy {
        &self.policy
    }

    /// Fetches the city list, substituting the built-in list on any failure.
    pub async fn load_cities(&self) -> CityCatalog {
        match timeout(self.policy.cities_timeout, self.gateway.fetch_cities()).await {
            Ok(Ok(cities)) if !cities.is_empty() => {
                debug!(count = cities.len(), "loaded cities from participant service");
                CityCatalog {
                    cities,
                    source: CitySource::Remote,
                }
            }
            Ok(Ok(_)) => {
                warn!("participant service returned no cities; using built-in list");
                CityCatalog::fallback()
            }
            Ok(Err(err)) => {
                warn!(error = %err, "city fetch failed; using built-in list");
                CityCatalog::fallback()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.policy.cities_timeout.as_millis() as u64,
                    "city fetch timed out; using built-in list"
                );
                CityCatalog::fallback()
            }
        }
    }

    /// Submits the form's draft, holding its pending flag for the duration of the call.
    ///
    /// Local validation failures leave the form untouched and never reach the gateway.
    pub async fn submit(
        &self,
        form: &mut RegistrationForm,
    ) -> Result<SubmissionOutcome, ValidationError> {
        let request = form.begin_submission()?;
        let held = PendingSubmission(form);
        let outcome = self.send(&request).await;
        held.0.finish_submission(&outcome);
        Ok(outcome)
    }

    /// Submits a bare draft without form bookkeeping.
    pub async fn submit_draft(
        &self,
        draft: &ParticipantDraft,
        age: &AgeValidationResult,
    ) -> Result<SubmissionOutcome, ValidationError> {
        let request = preflight(draft, age)?;
        Ok(self.send(&request).await)
    }

    async fn send(&self, request: &ParticipantRequest) -> SubmissionOutcome {
        info!(city_id = %request.city_id.0, "submitting participant registration");

        let result = timeout(
            self.policy.submit_timeout,
            self.gateway.create_participant(request),
        )
        .await;

        match result {
            Ok(Ok(())) => {
                info!("participant registration accepted");
                SubmissionOutcome::Accepted {
                    delivery: Delivery::Confirmed,
                }
            }
            Ok(Err(GatewayError::Rejected { status, message })) => {
                warn!(status, %message, "participant registration rejected");
                SubmissionOutcome::Rejected { status, message }
            }
            // The service answered, so the lenient policy never masks an unreadable reply.
            Ok(Err(GatewayError::Decode(reason))) => {
                warn!(%reason, "participant service sent an unreadable response");
                SubmissionOutcome::NetworkFailure {
                    failure: NetworkFailure::Unreachable(reason),
                }
            }
            Ok(Err(GatewayError::Unreachable(reason))) => match self.policy.unreachable {
                UnreachablePolicy::Strict => {
                    warn!(%reason, "participant service unreachable");
                    SubmissionOutcome::NetworkFailure {
                        failure: NetworkFailure::Unreachable(reason),
                    }
                }
                UnreachablePolicy::Lenient => {
                    warn!(%reason, "participant service unreachable; simulating acceptance");
                    SubmissionOutcome::Accepted {
                        delivery: Delivery::Simulated,
                    }
                }
            },
            Err(_) => {
                warn!(
                    timeout_ms = self.policy.submit_timeout.as_millis() as u64,
                    "participant submission timed out"
                );
                SubmissionOutcome::NetworkFailure {
                    failure: NetworkFailure::Timeout,
                }
            }
        }
    }
}
