use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::age::{AgeClass, AgePolicy, AgeValidationResult};
use super::coordinator::SubmissionOutcome;
use super::document::is_valid_document;
use super::domain::{CityId, ParticipantDraft, ParticipantRequest};
use super::format::{format_document, format_phone};

/// Local reasons a submission is refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{message}")]
    Ineligible { class: AgeClass, message: String },
    #[error("Você deve aceitar o regulamento para prosseguir com a inscrição.")]
    RegulationNotAccepted,
    #[error("Campo obrigatório não preenchido: {field}.")]
    MissingField { field: &'static str },
    #[error("CPF inválido.")]
    InvalidDocument,
    #[error("Cidade não encontrada: {0}.")]
    UnknownCity(String),
    #[error("Uma inscrição já está sendo enviada.")]
    SubmissionPending,
}

/// Checks a draft against its age result and builds the digits-only payload.
pub fn preflight(
    draft: &ParticipantDraft,
    age: &AgeValidationResult,
) -> Result<ParticipantRequest, ValidationError> {
    if !age.is_valid {
        return Err(ValidationError::Ineligible {
            class: age.class,
            message: age.message.clone(),
        });
    }

    if !draft.regulation_accepted {
        return Err(ValidationError::RegulationNotAccepted);
    }

    let required = [
        ("nome completo", draft.full_name.as_str()),
        ("data de nascimento", draft.birth_date.as_str()),
        ("celular", draft.phone.as_str()),
        ("e-mail", draft.email.as_str()),
        ("cidade", draft.city_id.0.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(ValidationError::MissingField { field: *field });
    }

    if !is_valid_document(&draft.document_number) {
        return Err(ValidationError::InvalidDocument);
    }

    Ok(ParticipantRequest::from(draft))
}

/// Registration modal state consumed by a rendering layer.
///
/// Every user interaction is a method call; the struct never reads ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    open: bool,
    draft: ParticipantDraft,
    age: AgeValidationResult,
    pending: bool,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn draft(&self) -> &ParticipantDraft {
        &self.draft
    }

    pub fn age(&self) -> &AgeValidationResult {
        &self.age
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hides the modal and discards whatever was typed.
    pub fn close(&mut self) {
        self.open = false;
        self.reset_fields();
    }

    pub fn set_full_name(&mut self, value: &str) {
        self.draft.full_name = value.to_string();
    }

    /// Stores the CPF as its display mask; digits beyond eleven are dropped.
    pub fn set_document(&mut self, raw: &str) {
        self.draft.document_number = format_document(raw);
    }

    pub fn set_birth_date(&mut self, raw: &str, today: NaiveDate) {
        self.set_birth_date_with(&AgePolicy::default(), raw, today);
    }

    pub fn set_birth_date_with(&mut self, policy: &AgePolicy, raw: &str, today: NaiveDate) {
        self.draft.birth_date = raw.trim().to_string();
        self.age = policy.evaluate(raw, today);
    }

    pub fn set_phone(&mut self, raw: &str) {
        self.draft.phone = format_phone(raw);
    }

    pub fn set_email(&mut self, value: &str) {
        self.draft.email = value.to_string();
    }

    pub fn set_city(&mut self, city_id: CityId) {
        self.draft.city_id = city_id;
    }

    pub fn set_motivation(&mut self, value: &str) {
        self.draft.motivation = value.to_string();
    }

    pub fn set_regulation_accepted(&mut self, accepted: bool) {
        self.draft.regulation_accepted = accepted;
    }

    /// Mirrors the submit button's enabled state.
    pub fn can_submit(&self, cities_loaded: bool) -> bool {
        !self.pending && cities_loaded && self.age.is_valid && self.draft.regulation_accepted
    }

    /// Runs the preflight checks and marks the form pending.
    ///
    /// Fails without side effects while another submission is in flight.
    pub fn begin_submission(&mut self) -> Result<ParticipantRequest, ValidationError> {
        if self.pending {
            return Err(ValidationError::SubmissionPending);
        }
        let request = preflight(&self.draft, &self.age)?;
        self.pending = true;
        Ok(request)
    }

    /// Releases the pending flag and clears the draft when the outcome counts as accepted.
    pub fn finish_submission(&mut self, outcome: &SubmissionOutcome) {
        self.pending = false;
        if outcome.clears_draft() {
            self.open = false;
            self.reset_fields();
        }
    }

    /// Drops the pending flag without touching the draft, for submissions abandoned mid-flight.
    pub(crate) fn release_pending(&mut self) {
        self.pending = false;
    }

    fn reset_fields(&mut self) {
        self.draft = ParticipantDraft::default();
        self.age = AgeValidationResult::neutral();
    }
}
