use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::NaiveDate;
use client_core::{
    AppointmentViewModel, DayView, FixedClock, HttpAppointmentService, LoadOutcome,
    SessionContext, ViewEntry,
};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_backend(
    clients_available: bool,
    appointment_fetches: Arc<AtomicUsize>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let router = Router::new()
        .route(
            "/appointments/psychologist",
            get(move || {
                let fetches = appointment_fetches.clone();
                async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Json(json!([
                        {"id": 1, "clientId": 7, "date": "2024-05-01", "startTime": "09:00", "endTime": "10:00"},
                        {"id": 2, "clientId": 7, "date": "2024-05-01", "startTime": "08:00", "endTime": "08:30"},
                        {"id": 3, "clientId": 9, "date": "2024-05-02", "startTime": "08:00", "endTime": "09:00"}
                    ]))
                }
            }),
        )
        .route(
            "/clients/psychologist",
            get(move || async move {
                if clients_available {
                    Ok(Json(json!([
                        {"id": 7, "firstName": "Ivan", "lastName": "Petrov"}
                    ])))
                } else {
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
}

async fn provider_view_model(
    clients_available: bool,
) -> (AppointmentViewModel, Arc<AtomicUsize>) {
    let fetches = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_backend(clients_available, fetches.clone()).await;
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("http client");
    let service = HttpAppointmentService::with_client(&base_url, Some("token".into()), http)
        .expect("service");
    let clock = FixedClock(may_first().and_hms_opt(8, 45, 0).expect("valid time"));
    let vm = AppointmentViewModel::new(
        SessionContext::provider(shared::domain::UserId(3)),
        Arc::new(service),
        Arc::new(clock),
    );
    (vm, fetches)
}

#[tokio::test]
async fn provider_day_over_http_acceptance() {
    let (vm, fetches) = provider_view_model(true).await;

    let mounted = vm.mount().await;
    assert_eq!(mounted.appointments, LoadOutcome::Applied { count: 3 });
    assert_eq!(mounted.directory, LoadOutcome::Applied { count: 1 });

    let view = vm.day_view().await;
    let entries = match &view {
        DayView::Entries { date, entries } => {
            assert_eq!(*date, may_first());
            entries
        }
        DayView::Empty { .. } => panic!("expected appointments on 2024-05-01"),
    };
    let summary: Vec<(i64, String, bool)> = entries
        .iter()
        .map(|entry| match entry {
            ViewEntry::Provider(entry) => (entry.id.0, entry.label.clone(), entry.complete),
            ViewEntry::Client(_) => panic!("provider session produced a client entry"),
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, "Session with Ivan Petrov".to_string(), true),
            (1, "Session with Ivan Petrov".to_string(), false),
        ]
    );

    vm.step_days(1).await;
    let next_day = vm.day_view().await;
    assert_eq!(next_day.entries().len(), 1);
    assert_eq!(next_day.entries()[0].label(), "Session with 9");

    vm.start_create().await.expect("provider may create");
    vm.confirm().await.expect("reload after confirm");
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn provider_day_with_directory_outage_acceptance() {
    let (vm, _fetches) = provider_view_model(false).await;

    let mounted = vm.mount().await;
    assert!(matches!(mounted.directory, LoadOutcome::Failed(_)));

    let view = vm.day_view().await;
    assert_eq!(view.entries().len(), 2);
    assert!(view
        .entries()
        .iter()
        .all(|entry| entry.label() == "Session with 7"));
}
