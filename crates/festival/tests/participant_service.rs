//! End-to-end behavior of the registration client against a local stand-in for the
//! participant service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use festival::registration::{
    CityId, CitySource, Delivery, HttpParticipantGateway, NetworkFailure, RegistrationForm,
    SubmissionCoordinator, SubmissionOutcome, SubmissionPolicy, UnreachablePolicy,
};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().expect("body mutex poisoned").clone()
    }
}

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("backend serves");
    });
    format!("http://{addr}")
}

async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn accepting_backend(recorded: Recorded) -> Router {
    Router::new()
        .route(
            "/participants",
            post(
                |State(recorded): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let content_type = headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    recorded
                        .content_types
                        .lock()
                        .expect("content type mutex poisoned")
                        .push(content_type);
                    recorded
                        .bodies
                        .lock()
                        .expect("body mutex poisoned")
                        .push(body);
                    (StatusCode::CREATED, Json(json!({ "id": "participant-1" })))
                },
            ),
        )
        .route(
            "/cities",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("v").map(String::as_str) != Some("3") {
                    return (StatusCode::BAD_REQUEST, "missing version").into_response();
                }
                Json(json!([
                    { "id": "c-1", "name": "Marabá", "state": "PA" },
                    { "id": "c-2", "name": "Portel" }
                ]))
                .into_response()
            }),
        )
        .with_state(recorded)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date")
}

fn completed_form() -> RegistrationForm {
    let mut form = RegistrationForm::new();
    form.open();
    form.set_full_name("João Pereira");
    form.set_document("529.982.247-25");
    form.set_birth_date("2005-03-02", today());
    form.set_phone("(91) 98888-7777");
    form.set_email("joao@example.com");
    form.set_city(CityId("c-2".to_string()));
    form.set_motivation("Cantar no festival.");
    form.set_regulation_accepted(true);
    form
}

fn policy(unreachable: UnreachablePolicy) -> SubmissionPolicy {
    SubmissionPolicy {
        submit_timeout: Duration::from_millis(500),
        cities_timeout: Duration::from_millis(500),
        unreachable,
    }
}

#[tokio::test]
async fn eligible_adult_is_submitted_with_digits_only_fields() {
    let recorded = Recorded::default();
    let base_url = spawn_backend(accepting_backend(recorded.clone())).await;
    let gateway = Arc::new(HttpParticipantGateway::new(base_url, "3"));
    let coordinator = SubmissionCoordinator::new(gateway, policy(UnreachablePolicy::Strict));
    let mut form = completed_form();
    assert_eq!(form.age().age, 20);

    let outcome = coordinator.submit(&mut form).await.expect("passes preflight");

    assert_eq!(
        outcome,
        SubmissionOutcome::Accepted {
            delivery: Delivery::Confirmed
        }
    );
    let bodies = recorded.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "name": "João Pereira",
            "email": "joao@example.com",
            "phone": "91988887777",
            "cpf": "52998224725",
            "birthDate": "2005-03-02",
            "cityId": "c-2",
            "reason": "Cantar no festival."
        })
    );
    let content_types = recorded
        .content_types
        .lock()
        .expect("content type mutex poisoned")
        .clone();
    assert!(content_types[0].starts_with("application/json"));
    assert!(!form.is_open());
}

#[tokio::test]
async fn rejection_text_is_returned_verbatim() {
    let router = Router::new().route(
        "/participants",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "CPF já cadastrado") }),
    );
    let base_url = spawn_backend(router).await;
    let gateway = Arc::new(HttpParticipantGateway::new(base_url, "3"));
    let coordinator = SubmissionCoordinator::new(gateway, policy(UnreachablePolicy::Strict));
    let mut form = completed_form();

    let outcome = coordinator.submit(&mut form).await.expect("passes preflight");

    assert_eq!(
        outcome,
        SubmissionOutcome::Rejected {
            status: 422,
            message: "CPF já cadastrado".to_string()
        }
    );
    assert!(form.is_open(), "draft kept for another attempt");
    assert!(!form.is_pending());
}

#[tokio::test]
async fn hung_backend_times_out() {
    let router = Router::new().route(
        "/participants",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::CREATED
        }),
    );
    let base_url = spawn_backend(router).await;
    let gateway = Arc::new(HttpParticipantGateway::new(base_url, "3"));
    let coordinator = SubmissionCoordinator::new(gateway, policy(UnreachablePolicy::Lenient));
    let mut form = completed_form();

    let outcome = coordinator.submit(&mut form).await.expect("passes preflight");

    assert_eq!(
        outcome,
        SubmissionOutcome::NetworkFailure {
            failure: NetworkFailure::Timeout
        }
    );
    assert!(!form.is_pending());
}

#[tokio::test]
async fn unreachable_backend_follows_policy() {
    let base_url = unreachable_base_url().await;

    let strict = SubmissionCoordinator::new(
        Arc::new(HttpParticipantGateway::new(base_url.clone(), "3")),
        policy(UnreachablePolicy::Strict),
    );
    let mut form = completed_form();
    let outcome = strict.submit(&mut form).await.expect("passes preflight");
    assert!(matches!(
        outcome,
        SubmissionOutcome::NetworkFailure {
            failure: NetworkFailure::Unreachable(_)
        }
    ));
    assert!(form.is_open());

    let lenient = SubmissionCoordinator::new(
        Arc::new(HttpParticipantGateway::new(base_url, "3")),
        policy(UnreachablePolicy::Lenient),
    );
    let outcome = lenient.submit(&mut form).await.expect("passes preflight");
    assert_eq!(
        outcome,
        SubmissionOutcome::Accepted {
            delivery: Delivery::Simulated
        }
    );
    assert!(!form.is_open());
}

#[tokio::test]
async fn cities_are_fetched_with_version_and_fall_back_when_down() {
    let base_url = spawn_backend(accepting_backend(Recorded::default())).await;
    let coordinator = SubmissionCoordinator::new(
        Arc::new(HttpParticipantGateway::new(base_url, "3")),
        policy(UnreachablePolicy::Strict),
    );
    let catalog = coordinator.load_cities().await;
    assert_eq!(catalog.source, CitySource::Remote);
    assert_eq!(catalog.cities.len(), 2);
    assert_eq!(catalog.cities[0].state.as_deref(), Some("PA"));
    assert_eq!(catalog.cities[0].slug(), "maraba");

    let down = SubmissionCoordinator::new(
        Arc::new(HttpParticipantGateway::new(unreachable_base_url().await, "3")),
        policy(UnreachablePolicy::Strict),
    );
    let catalog = down.load_cities().await;
    assert_eq!(catalog.source, CitySource::Fallback);
    assert_eq!(catalog.cities.len(), 5);
}

#[tokio::test]
async fn wrong_version_is_treated_as_a_failed_fetch() {
    let base_url = spawn_backend(accepting_backend(Recorded::default())).await;
    let coordinator = SubmissionCoordinator::new(
        Arc::new(HttpParticipantGateway::new(base_url, "1")),
        policy(UnreachablePolicy::Strict),
    );
    assert_eq!(coordinator.load_cities().await.source, CitySource::Fallback);
}
