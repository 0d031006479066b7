//! Participant registration: input masks, eligibility checks, and submission to the
//! participant service.
//!
//! Field values flow from raw keystrokes through the masks in [`format`] into a
//! [`RegistrationForm`], whose preflight checks gate the single outbound request issued by
//! the [`SubmissionCoordinator`].

pub mod age;
pub mod coordinator;
pub mod document;
pub mod domain;
pub mod form;
pub mod format;
pub mod gateway;

#[cfg(test)]
mod tests;

pub use age::{
    evaluate_birth_date, AgeClass, AgePolicy, AgePolicyError, AgeValidationResult,
};
pub use coordinator::{
    CityCatalog, CitySource, Delivery, NetworkFailure, SubmissionCoordinator, SubmissionOutcome,
    SubmissionPolicy, UnreachablePolicy,
};
pub use document::{check_digits, is_valid_document, normalize_document};
pub use domain::{fallback_cities, slugify, City, CityId, ParticipantDraft, ParticipantRequest};
pub use form::{RegistrationForm, ValidationError};
pub use format::{digits_only, format_document, format_phone};
pub use gateway::{GatewayError, HttpParticipantGateway, ParticipantGateway};
