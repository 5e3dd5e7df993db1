//! # API REST
//!
//! REST API implementation for the NAMASTE terminology service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common wire types and `namaste-core` for the terminology table.

#![warn(rust_2018_idioms)]

use api_shared::{ErrorRes, HealthRes, HealthService, RootRes, SearchParams, TermRecord};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use fhir::{
    ClinicalMapping, ClinicalMappingDocument, CodeableConcept, Coding, Condition, ListEntry,
    Reference, TermSelection,
};
use namaste_core::{TerminologyEntry, TerminologyService};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
///
/// Holds the terminology service built once at startup. Handlers only read from it.
#[derive(Clone)]
pub struct AppState {
    terminology_service: TerminologyService,
}

impl AppState {
    pub fn new(terminology_service: TerminologyService) -> Self {
        Self {
            terminology_service,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(root, health, search_terms, generate_fhir),
    components(schemas(
        HealthRes,
        RootRes,
        ErrorRes,
        TermRecord,
        TermSelection,
        ClinicalMappingDocument,
        ListEntry,
        Reference,
        Condition,
        CodeableConcept,
        Coding,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with permissive CORS and Swagger UI mounted.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/search", get(search_terms))
        .route("/api/generate_fhir", post(generate_fhir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = RootRes)
    )
)]
#[axum::debug_handler(state = AppState)]
async fn root() -> Json<RootRes> {
    Json(RootRes {
        message: "NAMAST-E to ICD-11 Terminology Service is running!".into(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the terminology service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching terms in table order", body = [TermRecord])
    )
)]
/// Search NAMASTE terms by partial text
///
/// Performs a case-insensitive substring match against every term in the table. An empty or
/// missing `q` returns an empty array so the endpoint can back an autocomplete box. A repeated
/// `q` uses its last value.
///
/// # Returns
/// * `Json<Vec<TermRecord>>` - Every matching term with its full mapping
#[axum::debug_handler]
async fn search_terms(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<TermRecord>> {
    let params = SearchParams::from_pairs(pairs);
    let results = state
        .terminology_service
        .search(params.q.as_deref())
        .into_iter()
        .map(term_record)
        .collect();
    Json(results)
}

#[utoipa::path(
    post,
    path = "/api/generate_fhir",
    request_body = TermSelection,
    responses(
        (status = 200, description = "FHIR problem list", body = ClinicalMappingDocument),
        (status = 422, description = "Selection is missing required fields", body = ErrorRes)
    )
)]
/// Generate the FHIR problem list for a selected mapping
///
/// The selection is rendered as-is; codes are not checked against the terminology table.
///
/// # Errors
/// Returns `422 Unprocessable Entity` if:
/// - the body is not JSON,
/// - any of the six fields is missing or not a string.
#[axum::debug_handler(state = AppState)]
async fn generate_fhir(
    body: Bytes,
) -> Result<Json<ClinicalMappingDocument>, (StatusCode, Json<ErrorRes>)> {
    match ClinicalMapping::parse_selection(&body) {
        Ok(selection) => Ok(Json(ClinicalMapping::generate(&selection))),
        Err(e) => {
            tracing::warn!("Rejected generate request: {}", e);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorRes {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

// Helper function
fn term_record(entry: TerminologyEntry) -> TermRecord {
    TermRecord {
        namaste_term: entry.namaste_term,
        namaste_code: entry.namaste_code,
        tm2_code: entry.tm2_code,
        tm2_term: entry.tm2_term,
        bio_code: entry.bio_code,
        bio_term: entry.bio_term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use namaste_core::TerminologyTable;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn entry(term: &str, code: &str, tm2: &str, bio_code: &str, bio_term: &str) -> TerminologyEntry {
        TerminologyEntry {
            namaste_term: term.into(),
            namaste_code: code.into(),
            tm2_code: tm2.into(),
            tm2_term: format!("{term} pattern"),
            bio_code: bio_code.into(),
            bio_term: bio_term.into(),
        }
    }

    fn test_app() -> Router {
        let table = TerminologyTable::from_entries([
            entry("Jwara", "NAM001", "TM2-X", "MG30.0", "Fever"),
            entry("Kasa", "NAM002", "TM2-Y", "MD12", "Cough"),
            entry("Vataja Jwara", "NAM003", "TM2-Z", "MG30.1", "Fever, unspecified"),
        ]);
        router(AppState::new(TerminologyService::new(table)))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = app.oneshot(req).await.expect("request should complete");
        let status = res.status();
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        (status, bytes.to_vec())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).expect("valid request");
        let (status, bytes) = send(test_app(), req).await;
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    fn generate_request(body: &Value) -> Request<Body> {
        Request::post("/api/generate_fhir")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    fn jwara_body() -> Value {
        json!({
            "namaste_term": "Jwara",
            "namaste_code": "NAM001",
            "tm2_code": "TM2-X",
            "tm2_term": "Fever pattern",
            "bio_code": "MG30.0",
            "bio_term": "Fever"
        })
    }

    #[tokio::test]
    async fn root_reports_running() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "NAMAST-E to ICD-11 Terminology Service is running!"
        );
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn search_returns_full_records_in_table_order() {
        let (status, body) = get_json("/api/search?q=jwa").await;
        assert_eq!(status, StatusCode::OK);

        let results = body.as_array().expect("array body");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["namaste_term"], "Jwara");
        assert_eq!(results[0]["namaste_code"], "NAM001");
        assert_eq!(results[0]["tm2_code"], "TM2-X");
        assert_eq!(results[0]["tm2_term"], "Jwara pattern");
        assert_eq!(results[0]["bio_code"], "MG30.0");
        assert_eq!(results[0]["bio_term"], "Fever");
        assert_eq!(results[1]["namaste_term"], "Vataja Jwara");
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let (_, upper) = get_json("/api/search?q=KASA").await;
        let (_, lower) = get_json("/api/search?q=kasa").await;
        assert_eq!(upper, lower);
        assert_eq!(upper.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn search_without_query_is_empty() {
        let (status, body) = get_json("/api/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = get_json("/api/search?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn search_with_repeated_query_uses_last_value() {
        let (status, body) = get_json("/api/search?q=jwa&q=kasa").await;
        assert_eq!(status, StatusCode::OK);

        let results = body.as_array().expect("array body");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["namaste_term"], "Kasa");
    }

    #[tokio::test]
    async fn search_ignores_unrelated_query_keys() {
        let (status, body) = get_json("/api/search?limit=5&q=kasa").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn search_decodes_query_text() {
        let (_, body) = get_json("/api/search?q=vataja%20jw").await;
        let results = body.as_array().expect("array body");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["namaste_term"], "Vataja Jwara");
    }

    #[tokio::test]
    async fn generate_renders_problem_list() {
        let (status, bytes) = send(test_app(), generate_request(&jwara_body())).await;
        assert_eq!(status, StatusCode::OK);

        let doc: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(doc["resourceType"], "List");
        assert_eq!(doc["subject"]["reference"], "Patient/example");
        assert_eq!(doc["entry"][0]["item"]["reference"], "#condition-namaste");
        assert_eq!(doc["entry"][1]["item"]["display"], "Fever (ICD-11)");

        let source = &doc["contained"][0];
        assert_eq!(source["resourceType"], "Condition");
        assert_eq!(source["code"]["coding"][0]["code"], "NAM001");
        assert!(source["code"]["coding"][0]["system"]
            .as_str()
            .is_some_and(|s| s.ends_with("/namaste")));

        let target = &doc["contained"][1];
        assert_eq!(target["code"]["coding"][0]["code"], "TM2-X");
        assert_eq!(target["code"]["coding"][1]["code"], "MG30.0");
    }

    #[tokio::test]
    async fn generate_is_deterministic() {
        let (_, first) = send(test_app(), generate_request(&jwara_body())).await;
        let (_, second) = send(test_app(), generate_request(&jwara_body())).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn generate_accepts_codes_unknown_to_the_table() {
        let body = json!({
            "namaste_term": "Unlisted",
            "namaste_code": "NOPE",
            "tm2_code": "",
            "tm2_term": "",
            "bio_code": "ZZ99",
            "bio_term": "Nothing"
        });

        let (status, bytes) = send(test_app(), generate_request(&body)).await;
        assert_eq!(status, StatusCode::OK);

        let doc: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(doc["contained"][0]["code"]["coding"][0]["code"], "NOPE");
        assert_eq!(doc["contained"][1]["code"]["coding"][1]["code"], "ZZ99");
    }

    #[tokio::test]
    async fn generate_rejects_missing_field() {
        let mut body = jwara_body();
        body.as_object_mut()
            .expect("object body")
            .remove("bio_term");

        let (status, bytes) = send(test_app(), generate_request(&body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let err: Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(err["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("bio_term")));
    }

    #[tokio::test]
    async fn generate_rejects_malformed_json() {
        let req = Request::post("/api/generate_fhir")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("valid request");

        let (status, _) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let req = Request::get("/api/search?q=jwa")
            .header(header::ORIGIN, "http://127.0.0.1:5500")
            .body(Body::empty())
            .expect("valid request");

        let res = test_app().oneshot(req).await.expect("request should complete");
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[test]
    fn openapi_documents_both_operations() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/search"));
        assert!(doc.paths.paths.contains_key("/api/generate_fhir"));
    }

    #[test]
    fn openapi_generate_body_is_the_decoded_selection() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("openapi serializes");
        let body_ref = &doc["paths"]["/api/generate_fhir"]["post"]["requestBody"]["content"]
            ["application/json"]["schema"]["$ref"];
        assert_eq!(body_ref, "#/components/schemas/TermSelection");
        assert!(doc["components"]["schemas"]["TermSelection"].is_object());
    }
}
