mod common;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{DRAIN, FakePrinter, FakeStore, processor_with, setup_test_paths, stored_meals, ts};
use rmealticket::core::{AttendanceEventProcessor, DeviceGate};
use rmealticket::db::SqliteStore;
use rmealticket::models::employee::Employee;
use rmealticket::server::{AppState, router};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tower::ServiceExt;

const REFERENCE_BODY: &str = "2\t2025-11-23 17:05:30\t0\t15\t";

fn app(gate: DeviceGate, processor: AttendanceEventProcessor) -> (Router, Arc<AppState>) {
    let state = AppState::new(gate, processor);
    (router(state.clone()), state)
}

fn upload(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send `req` and check the one response the terminal may ever see.
async fn assert_ok(app: &Router, req: Request<Body>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );
    let body = to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

/// Store on a fresh database file; the path is returned for read-back.
async fn sqlite_store(name: &str) -> (Arc<SqliteStore>, String) {
    let (_, db) = setup_test_paths(name);
    let store = SqliteStore::open(&db).expect("open store");
    store
        .upsert_employee(Employee::new(2, "María López"))
        .await
        .expect("add employee");
    (Arc::new(store), db)
}

#[tokio::test]
async fn test_reference_upload_end_to_end() {
    let (store, db) = sqlite_store("server_reference").await;
    let printer = FakePrinter::new();
    let (app, state) = app(DeviceGate::new(None), processor_with(store.clone(), printer.clone()));

    assert_ok(
        &app,
        upload("/iclock/cdata?SN=CQZ7232260045&table=ATTLOG", REFERENCE_BODY),
    )
    .await;
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);

    let meals = stored_meals(&db);
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].meal.employee_id, 2);
    assert_eq!(meals[0].meal.recorded_at, ts("2025-11-23 17:05:30"));
    assert_eq!(printer.attempts(), 1);
    assert!(printer.printed()[0].plain_text().contains("Empleado: María López"));
}

#[tokio::test]
async fn test_redelivered_upload_keeps_one_record() {
    let (store, db) = sqlite_store("server_redelivery").await;
    let printer = FakePrinter::new();
    let (app, state) = app(DeviceGate::new(None), processor_with(store.clone(), printer.clone()));

    for _ in 0..3 {
        assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", REFERENCE_BODY)).await;
        assert!(state.processor.dispatcher().wait_idle(DRAIN).await);
    }

    assert_eq!(stored_meals(&db).len(), 1);
    assert_eq!(printer.attempts(), 1);
}

#[tokio::test]
async fn test_simultaneous_uploads_keep_one_record() {
    let (store, db) = sqlite_store("server_simultaneous").await;
    let printer = FakePrinter::new();
    let (app, state) = app(DeviceGate::new(None), processor_with(store.clone(), printer.clone()));

    let sends: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", REFERENCE_BODY)).await
            })
        })
        .collect();
    for send in sends {
        send.await.unwrap();
    }
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);

    assert_eq!(stored_meals(&db).len(), 1);
    assert_eq!(printer.attempts(), 1);
}

#[tokio::test]
async fn test_mismatched_serial_is_acknowledged_and_ignored() {
    let store = FakeStore::with_employees(&[(2, "Ana", true)]);
    let printer = FakePrinter::new();
    let gate = DeviceGate::new(Some("CQZ7232260045".into()));
    let (app, state) = app(gate, processor_with(store.clone(), printer.clone()));

    assert_ok(&app, upload("/iclock/cdata?SN=INTRUDER&table=ATTLOG", REFERENCE_BODY)).await;
    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", REFERENCE_BODY)).await;
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);
    assert!(store.meals().is_empty());

    assert_ok(
        &app,
        upload("/iclock/cdata?SN=CQZ7232260045&table=ATTLOG", REFERENCE_BODY),
    )
    .await;
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);
    assert_eq!(store.meals_for(2).len(), 1);
}

#[tokio::test]
async fn test_every_odd_request_still_gets_ok() {
    let store = FakeStore::with_employees(&[(2, "Ana", true)]);
    let printer = FakePrinter::new();
    let (app, state) = app(DeviceGate::new(None), processor_with(store.clone(), printer.clone()));

    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", "")).await;
    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", "  \r\n\n")).await;
    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", "complete garbage\n\u{0}\u{1}")).await;
    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", vec![0xFF_u8, 0xFE, b'\n'])).await;
    assert_ok(&app, upload("/iclock/cdata?table=BIODATA", REFERENCE_BODY)).await;
    assert_ok(&app, upload("/iclock/cdata?table=OPERLOG", "OPLOG 4\t0\t2025-11-23 17:05:30")).await;
    assert_ok(&app, upload("/iclock/cdata", REFERENCE_BODY)).await;
    assert_ok(&app, get("/iclock/cdata?SN=CQZ7232260045&options=all")).await;
    assert_ok(&app, get("/iclock/getrequest?SN=CQZ7232260045")).await;
    assert_ok(&app, get("/iclock/getrequest")).await;
    assert_ok(&app, get("/health")).await;
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);

    assert!(store.meals().is_empty(), "only ATTLOG bodies are processed");
    assert_eq!(printer.attempts(), 0);
}

#[tokio::test]
async fn test_failures_downstream_do_not_change_the_response() {
    let store = FakeStore::with_employees(&[(2, "Ana", true)]);
    store.fail_writes.store(true, Ordering::SeqCst);
    let printer = FakePrinter::new();
    printer.fail_print.store(true, Ordering::SeqCst);
    let (app, state) = app(DeviceGate::new(None), processor_with(store.clone(), printer.clone()));

    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", REFERENCE_BODY)).await;
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);
    assert!(store.meals().is_empty());

    store.fail_writes.store(false, Ordering::SeqCst);
    assert_ok(&app, upload("/iclock/cdata?table=ATTLOG", REFERENCE_BODY)).await;
    assert!(state.processor.dispatcher().wait_idle(DRAIN).await);
    assert_eq!(store.meals_for(2).len(), 1, "meal kept although printing failed");
    assert_eq!(printer.attempts(), 1);
}
