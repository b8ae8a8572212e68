//! Gateway tests against an in-process fake backend.
//!
//! Each test spins its own `axum` router on an ephemeral port, so the
//! request-counting and misbehaving-endpoint scenarios stay isolated.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use rigquote_client::{ApiClient, ApiError, Connectivity, SaveOptions};
use rigquote_core::config::AppConfig;
use rigquote_core::domain::line_item::LineItemDraft;
use rigquote_core::domain::party::{Party, PartyId};
use rigquote_core::domain::quotation::QuotationId;
use rigquote_core::session::QuotationSession;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test backend");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test backend serve");
    });
    format!("http://{address}")
}

fn client_for(base_url: &str, max_retries: u32) -> ApiClient {
    let mut config = AppConfig::default();
    config.backend.base_url = base_url.to_string();
    config.backend.timeout_secs = 5;
    config.backend.max_retries = max_retries;
    ApiClient::new(&config).expect("api client")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date")
}

fn party() -> Party {
    Party {
        id: PartyId("P-1".to_string()),
        display_id: "CUST-001".to_string(),
        name: "Sharma Traders".to_string(),
        phone: "+91 98111 22334".to_string(),
        address: "Karol Bagh, New Delhi".to_string(),
    }
}

fn draft() -> LineItemDraft {
    LineItemDraft {
        category: "Processor".to_string(),
        brand: "Intel".to_string(),
        model: "Core i5-12400F".to_string(),
        hsn_code: "8542".to_string(),
        warranty_text: "3 Years".to_string(),
        quantity: Some(2),
        purchase_incl_tax: dec!(16000),
        sale_incl_tax: dec!(18500),
        tax_rate_percent: Some(dec!(18)),
    }
}

fn party_json() -> Value {
    json!({
        "id": "P-1",
        "displayId": "CUST-001",
        "name": "Sharma Traders",
        "phone": "+91 98111 22334",
        "address": "Karol Bagh, New Delhi"
    })
}

fn record_json(id: &str, title: &str, revision_number: Option<u32>) -> Value {
    json!({
        "id": id,
        "title": title,
        "quotationNumber": "QTN-2025-0042",
        "date": "2025-07-01",
        "validUntil": "2025-07-16",
        "status": "draft",
        "totalAmount": "37000",
        "revisionNumber": revision_number,
        "revisionOf": null,
        "party": party_json(),
        "items": [{
            "category": "Processor",
            "brand": "Intel",
            "model": "Core i5-12400F",
            "hsnCode": "8542",
            "warrantyText": "3 Years",
            "quantity": 2,
            "purchaseInclTax": "16000",
            "saleInclTax": "18500",
            "taxRatePercent": "18"
        }],
        "businessDetails": {
            "name": "Apex Computers",
            "address": "Shop 14, Lamington Road, Mumbai 400004",
            "phone": "+91 98200 12345",
            "email": "sales@apexcomputers.in",
            "gstin": "27AAACA1234F1Z5",
            "logoRef": "apex-logo.png"
        },
        "notes": "",
        "terms": ""
    })
}

/// Echo the saved payload back as the persisted record, the way the real
/// backend responds to a create.
fn record_from_payload(payload: &Value, id: &str, number: &str) -> Value {
    json!({
        "id": id,
        "title": payload["title"],
        "quotationNumber": number,
        "date": payload["date"],
        "validUntil": payload["validUntil"],
        "status": payload["status"],
        "totalAmount": payload["totalAmount"],
        "revisionNumber": payload["revisionNumber"],
        "revisionOf": payload["revisionOf"],
        "party": payload["party"],
        "items": payload["items"],
        "businessDetails": payload["businessDetails"],
        "notes": payload["notes"],
        "terms": payload["terms"],
    })
}

#[tokio::test]
async fn save_posts_computed_totals_and_adopts_backend_identity() -> Result<()> {
    init_tracing();

    let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let captured_by_handler = Arc::clone(&captured);
    let router = Router::new().route(
        "/quotations",
        post(move |Json(payload): Json<Value>| {
            let captured = Arc::clone(&captured_by_handler);
            async move {
                let record = record_from_payload(&payload, "Q-100", "QTN-2025-0100");
                *captured.lock().unwrap() = Some(payload);
                Json(record)
            }
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let mut session = QuotationSession::new(today());
    session.select_party(party());
    session.add_item(draft());

    let record = client.quotations.save(&mut session, SaveOptions::default()).await?;

    assert_eq!(record.id, QuotationId("Q-100".to_string()));
    assert_eq!(session.current_id(), Some(&QuotationId("Q-100".to_string())));
    assert_eq!(session.quotation_number(), Some("QTN-2025-0100"));
    assert!(!session.revision().is_revision);

    let payload = captured.lock().unwrap().clone().expect("payload captured");
    assert_eq!(payload["title"], json!("Quotation for Sharma Traders"));
    assert_eq!(payload["totalAmount"], json!("37000"));
    assert_eq!(payload["totals"]["totalSale"], json!("37000"));
    assert_eq!(payload["totals"]["totalPurchase"], json!("32000"));
    assert_eq!(payload["totals"]["totalMargin"], json!("5000"));
    assert_eq!(payload["revisionNumber"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn save_preconditions_mention_party_before_items() -> Result<()> {
    let client = client_for("http://127.0.0.1:9", 3);

    let mut session = QuotationSession::new(today());
    let error = client
        .quotations
        .save(&mut session, SaveOptions::default())
        .await
        .expect_err("empty session must not save");

    let message = match error {
        ApiError::Validation(message) => message,
        other => panic!("expected validation error, got {other:?}"),
    };
    let party_at = message.find("party").expect("message should mention the party");
    let items_at = message.find("line items").expect("message should mention line items");
    assert!(party_at < items_at);

    session.select_party(party());
    let error = client
        .quotations
        .save(&mut session, SaveOptions::default())
        .await
        .expect_err("itemless session must not save");
    assert!(matches!(error, ApiError::Validation(ref m) if m.contains("line items")));

    Ok(())
}

#[tokio::test]
async fn concurrent_party_list_fetches_share_one_request() -> Result<()> {
    init_tracing();

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_by_handler = Arc::clone(&hits);
    let router = Router::new().route(
        "/quotations/party/{party_id}",
        get(move |Path(_party_id): Path<String>| {
            let hits = Arc::clone(&hits_by_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(100)).await;
                Json(Vec::<Value>::new())
            }
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let party_id = PartyId("P-1".to_string());
    let (first, second) = tokio::join!(
        client.quotations.list_for_party(&party_id),
        client.quotations.list_for_party(&party_id),
    );
    first?;
    second?;

    assert_eq!(hits.load(Ordering::SeqCst), 1, "overlapping fetches must share one request");

    // Once the first fetch has landed, later calls come from the cache.
    client.quotations.list_for_party(&party_id).await?;
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn catalog_falls_back_when_backend_returns_server_error() -> Result<()> {
    let router =
        Router::new().route("/components", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 1);

    let catalog = client.catalog.load().await?;

    let categories: std::collections::BTreeSet<_> =
        catalog.iter().map(|entry| entry.category.as_str()).collect();
    assert_eq!(categories.len(), 7);
    assert!(categories.contains("Processor"));
    assert!(categories.contains("Cabinet"));

    Ok(())
}

#[tokio::test]
async fn catalog_falls_back_when_backend_serves_html() -> Result<()> {
    let router = Router::new().route(
        "/components",
        get(|| async {
            ([(header::CONTENT_TYPE, "text/html")], "<html>gateway timeout</html>").into_response()
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let catalog = client.catalog.load().await?;
    assert!(!catalog.is_empty());

    Ok(())
}

#[tokio::test]
async fn create_revision_numbers_from_the_known_titles() -> Result<()> {
    init_tracing();

    let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let captured_by_handler = Arc::clone(&captured);
    let router = Router::new()
        .route(
            "/quotations/{id}",
            get(|Path(id): Path<String>| async move {
                Json(record_json(&id, "Quotation for Sharma Traders (1)", Some(1)))
            }),
        )
        .route(
            "/quotations/party/{party_id}",
            get(|Path(_party_id): Path<String>| async {
                Json(json!([
                    record_json("Q-4", "Quotation for Sharma Traders", None),
                    record_json("Q-5", "Quotation for Sharma Traders (1)", Some(1)),
                ]))
            }),
        )
        .route(
            "/quotations/{id}/revisions",
            post(move |Path(_id): Path<String>, Json(payload): Json<Value>| {
                let captured = Arc::clone(&captured_by_handler);
                async move {
                    let record = record_from_payload(&payload, "Q-9", "QTN-2025-0101");
                    *captured.lock().unwrap() = Some(payload);
                    Json(record)
                }
            }),
        );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let (session, record) =
        client.quotations.create_revision(&QuotationId("Q-5".to_string())).await?;

    let payload = captured.lock().unwrap().clone().expect("payload captured");
    assert_eq!(payload["title"], json!("Quotation for Sharma Traders (2)"));
    assert_eq!(payload["revisionNumber"], json!(2));
    assert_eq!(payload["revisionOf"], json!("Q-5"));

    assert_eq!(record.revision_number, Some(2));
    assert!(session.revision().is_revision);
    assert_eq!(session.revision().revision_number, Some(2));

    Ok(())
}

#[tokio::test]
async fn missing_party_record_surfaces_as_not_found() -> Result<()> {
    let router =
        Router::new().route("/parties/{id}", get(|| async { StatusCode::NOT_FOUND }));
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let error = client
        .parties
        .fetch(&PartyId("P-9".to_string()))
        .await
        .expect_err("deleted party should not resolve");

    assert!(matches!(error, ApiError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn transient_read_failures_are_retried_once_per_budget() -> Result<()> {
    init_tracing();

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_by_handler = Arc::clone(&hits);
    let router = Router::new().route(
        "/parties",
        get(move || {
            let hits = Arc::clone(&hits_by_handler);
            async move {
                if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                } else {
                    Json(json!([party_json()])).into_response()
                }
            }
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let parties = client.parties.list().await?;

    assert_eq!(parties.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 2, "one failure, one successful retry");

    Ok(())
}

#[tokio::test]
async fn writes_are_never_retried() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_by_handler = Arc::clone(&hits);
    let router = Router::new().route(
        "/quotations",
        post(move || {
            let hits = Arc::clone(&hits_by_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let mut session = QuotationSession::new(today());
    session.select_party(party());
    session.add_item(draft());

    let error = client
        .quotations
        .save(&mut session, SaveOptions::default())
        .await
        .expect_err("server error must propagate");

    assert!(matches!(error, ApiError::Server { status: 500 }));
    assert_eq!(hits.load(Ordering::SeqCst), 1, "a failed save must not be re-sent");
    assert!(session.current_id().is_none(), "no identity adopted from a failed save");

    Ok(())
}

#[tokio::test]
async fn load_decodes_a_persisted_record() -> Result<()> {
    let router = Router::new().route(
        "/quotations/{id}",
        get(|Path(id): Path<String>| async move {
            Json(record_json(&id, "Quotation for Sharma Traders", None))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url, 3);

    let record = client.quotations.load(&QuotationId("Q-7".to_string())).await?;
    assert_eq!(record.quotation_number, "QTN-2025-0042");
    assert_eq!(record.items.len(), 1);

    let session = QuotationSession::from_record(&record);
    assert_eq!(session.items().len(), 1);
    assert_eq!(session.items()[0].id.0, 1, "hydration assigns fresh local ids");

    Ok(())
}

#[tokio::test]
async fn health_probe_reports_connectivity() -> Result<()> {
    let router = Router::new().route("/health", get(|| async { StatusCode::OK }));
    let base_url = spawn_backend(router).await;

    let online = client_for(&base_url, 3);
    assert_eq!(online.health.check().await, Connectivity::Online);

    // Nothing listens here; the probe must degrade, not hang or error out.
    let offline = client_for("http://127.0.0.1:9", 3);
    assert_eq!(offline.health.check().await, Connectivity::Offline);

    Ok(())
}
