use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

use crate::registration::domain::{City, CityId, ParticipantRequest};
use crate::registration::form::RegistrationForm;
use crate::registration::gateway::{GatewayError, ParticipantGateway};
use crate::registration::{SubmissionCoordinator, SubmissionPolicy, UnreachablePolicy};

pub(super) const VALID_CPF: &str = "529.982.247-25";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date")
}

/// Birth date giving a participant of exactly `age` completed years on `today()`.
pub(super) fn birth_date_for(age: i32) -> String {
    format!("{:04}-09-15", 2025 - age)
}

pub(super) fn filled_form(age: i32) -> RegistrationForm {
    let mut form = RegistrationForm::new();
    form.open();
    form.set_full_name("Maria da Silva");
    form.set_document(VALID_CPF);
    form.set_birth_date(&birth_date_for(age), today());
    form.set_phone("91987654321");
    form.set_email("maria@example.com");
    form.set_city(CityId("550e8400-e29b-41d4-a716-446655440001".to_string()));
    form.set_motivation("Quero louvar com minha banda.");
    form.set_regulation_accepted(true);
    form
}

/// Scripted gateway that records every participant request it receives.
pub(super) struct FakeGateway {
    cities: Result<Vec<City>, GatewayError>,
    create_result: Result<(), GatewayError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<ParticipantRequest>>,
    city_calls: AtomicUsize,
}

impl FakeGateway {
    pub(super) fn accepting() -> Self {
        Self {
            cities: Ok(vec![City::new("remote-1", "Marabá")]),
            create_result: Ok(()),
            delay: None,
            requests: Mutex::new(Vec::new()),
            city_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing(error: GatewayError) -> Self {
        Self {
            cities: Err(error.clone()),
            create_result: Err(error),
            ..Self::accepting()
        }
    }

    pub(super) fn with_cities(mut self, cities: Vec<City>) -> Self {
        self.cities = Ok(cities);
        self
    }

    pub(super) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(super) fn requests(&self) -> Vec<ParticipantRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }

    pub(super) fn city_calls(&self) -> usize {
        self.city_calls.load(Ordering::SeqCst)
    }
}

impl ParticipantGateway for FakeGateway {
    async fn fetch_cities(&self) -> Result<Vec<City>, GatewayError> {
        self.city_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.cities.clone()
    }

    async fn create_participant(&self, request: &ParticipantRequest) -> Result<(), GatewayError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.create_result.clone()
    }
}

pub(super) fn coordinator(
    gateway: Arc<FakeGateway>,
    unreachable: UnreachablePolicy,
) -> SubmissionCoordinator<FakeGateway> {
    SubmissionCoordinator::new(
        gateway,
        SubmissionPolicy {
            unreachable,
            ..SubmissionPolicy::default()
        },
    )
}
