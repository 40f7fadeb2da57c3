//! Operation handlers for `GET /runMutalyzer`, `GET /info` and
//! `GET /getTranscriptsAndInfo`.
//!
//! Each request goes through the same steps:
//!
//! 1. pick the operation's parameters from the query string (unknown ones are
//!    dropped, missing required ones are rejected);
//! 2. negotiate a representation from the `Accept` header;
//! 3. call the remote service;
//! 4. normalize and render through the [`Pipeline`](mutalyzer_ld::Pipeline).
//!
//! The response carries the negotiated media type as `content-type`.

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use mutalyzer_ld::{AcceptList, Operation, RequestParams};
use regex::Regex;

use crate::error::AppError;

use super::AppState;

type QueryMap = HashMap<String, String>;

/// `GET /runMutalyzer?variant=...`
pub async fn run_mutalyzer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<QueryMap>,
) -> Result<Response, AppError> {
    invoke(&state, Operation::RunMutalyzer, &headers, &query).await
}

/// `GET /info`
pub async fn info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<QueryMap>,
) -> Result<Response, AppError> {
    invoke(&state, Operation::Info, &headers, &query).await
}

/// `GET /getTranscriptsAndInfo?genomicReference=...[&geneName=...]`
pub async fn get_transcripts_and_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<QueryMap>,
) -> Result<Response, AppError> {
    invoke(&state, Operation::GetTranscriptsAndInfo, &headers, &query).await
}

async fn invoke(
    state: &AppState,
    operation: Operation,
    headers: &HeaderMap,
    query: &QueryMap,
) -> Result<Response, AppError> {
    let result = respond(state, operation, headers, query).await;
    if let Err(e) = &result {
        if state.config.log_errors {
            e.log(operation.name());
        }
    }
    result
}

async fn respond(
    state: &AppState,
    operation: Operation,
    headers: &HeaderMap,
    query: &QueryMap,
) -> Result<Response, AppError> {
    let params = pick_params(operation, query)?;
    let accepted = AcceptList::from_header(
        headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok()),
    );
    // Negotiate first so an unacceptable request never reaches the remote service.
    let representation = state.pipeline.negotiate(operation, &accepted)?;

    let raw = state.remote.call(operation.name(), &params).await?;
    let output = state.pipeline.produce(representation, &params, raw)?;
    tracing::debug!(
        operation = operation.name(),
        media_type = output.media_type,
        bytes = output.body.len(),
        "representation produced"
    );

    Ok(([(header::CONTENT_TYPE, output.media_type)], output.body).into_response())
}

/// Pick the operation's parameters from the query, in declaration order.
pub fn pick_params(operation: Operation, query: &QueryMap) -> Result<RequestParams, AppError> {
    let mut params = RequestParams::new();
    for param in operation.params() {
        match query.get(param.name).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => {
                check_format(param.name, value)?;
                params.insert(param.name, value);
            }
            _ if param.required => {
                return Err(AppError::BadRequest(format!(
                    "missing required parameter {:?}",
                    param.name
                )));
            }
            _ => {}
        }
    }
    Ok(params)
}

/// RefSeq / GenBank style accession with optional version, or an LRG / UD id.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{1,6}_?[A-Za-z0-9]+(\.[0-9]+)?$").expect("invalid reference regex")
});

/// HGNC-style gene symbol.
static GENE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("invalid gene regex"));

fn check_format(name: &str, value: &str) -> Result<(), AppError> {
    let re = match name {
        "genomicReference" => &REFERENCE_RE,
        "geneName" => &GENE_RE,
        _ => return Ok(()),
    };
    if re.is_match(value) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "parameter {name:?} has an invalid value: {value:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mutalyzer_ld::Pipeline;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::error::ErrorResponse;
    use crate::remote::canned::CannedRemote;
    use crate::router::build_router;

    fn config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            remote_url: "http://127.0.0.1:9".into(),
            remote_timeout_secs: 1,
            log_errors: false,
        }
    }

    fn canned() -> CannedRemote {
        CannedRemote::new()
            .with(
                "runMutalyzer",
                json!({ "runMutalyzerResult": {
                    "sourceId": "NM_003002.2",
                    "sourceAccession": "NM_003002",
                    "molecule": "n",
                    "errors": 0,
                    "messages": { "SoapMessage": [] }
                }}),
            )
            .with(
                "info",
                json!({ "infoResult": {
                    "version": "2.0.35",
                    "nomenclatureVersion": "15.11",
                    "versionParts": { "string": ["2", "0", "35"] }
                }}),
            )
            .with(
                "getTranscriptsAndInfo",
                json!({ "getTranscriptsAndInfoResult": {
                    "TranscriptInfo": { "TranscriptInfo": [
                        {
                            "name": "SDHD_v001",
                            "gTransStart": 5001,
                            "id": "NM_003002.2",
                            "gTransEnd": 13887,
                            "proteinTranscript": { "name": "SDHD_i001", "id": "NP_002993.1" }
                        }
                    ]}
                }}),
            )
    }

    fn build_app(remote: Arc<CannedRemote>) -> axum::Router {
        build_router(AppState {
            remote,
            pipeline: Pipeline::builtin().unwrap(),
            config: config(),
        })
    }

    async fn get(app: axum::Router, uri: &str, accept: Option<&str>) -> (StatusCode, String, String) {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(accept) = accept {
            req = req.header("accept", accept);
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn info_defaults_to_json() {
        let app = build_app(Arc::new(canned()));
        let (status, content_type, body) = get(app, "/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["versionParts"], json!(["2", "0", "35"]));
    }

    #[tokio::test]
    async fn run_mutalyzer_as_turtle() {
        let remote = Arc::new(canned());
        let app = build_app(Arc::clone(&remote));
        let (status, content_type, body) = get(
            app,
            "/runMutalyzer?variant=NM_003002.2:c.274G%3ET&unused=1",
            Some("text/turtle"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/turtle");
        assert!(body.contains("nuccore:NM_003002\\.2 rdf:type rsa:ReferenceSequence"));

        let calls = remote.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "runMutalyzer");
        assert_eq!(calls[0].1.get("variant"), Some("NM_003002.2:c.274G>T"));
        assert_eq!(calls[0].1.get("unused"), None);
    }

    #[tokio::test]
    async fn transcripts_as_graph() {
        let app = build_app(Arc::new(canned()));
        let (status, content_type, body) = get(
            app,
            "/getTranscriptsAndInfo?genomicReference=NC_000011.9&geneName=SDHD",
            Some("application/xml;q=0.9, text/turtle"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/turtle");
        assert!(body.contains("@prefix edam: <http://edamontology.org/>."));
        assert!(body.contains(
            "<http://www.ncbi.nlm.nih.gov/nuccore/NM_003002.2> rsa:isSubSequenceOf \
             <http://www.ncbi.nlm.nih.gov/nuccore/NC_000011.9>;"
        ));
        assert!(body.contains("rsa:start \"5001\";\n    rsa:end \"13887\"."));
    }

    #[tokio::test]
    async fn unsupported_media_type_is_406_without_remote_call() {
        let remote = Arc::new(canned());
        let app = build_app(Arc::clone(&remote));
        let (status, _, body) = get(app, "/info", Some("application/xml")).await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "not_acceptable");
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_required_parameter_is_400() {
        let app = build_app(Arc::new(canned()));
        let (status, _, body) = get(app, "/runMutalyzer", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "invalid_parameter");
    }

    #[tokio::test]
    async fn invalid_reference_is_400() {
        let app = build_app(Arc::new(canned()));
        let (status, _, _) = get(app, "/getTranscriptsAndInfo?genomicReference=NC%20000011", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remote_domain_error_is_422_with_remote_code() {
        let remote = CannedRemote::new().with(
            "runMutalyzer",
            json!({ "runMutalyzerResult": {
                "errors": 1,
                "messages": { "SoapMessage": [
                    { "errorcode": "EPARSE", "message": "Could not parse the given variant" }
                ]}
            }}),
        );
        let app = build_app(Arc::new(remote));
        let (status, _, body) = get(app, "/runMutalyzer?variant=garbage", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "EPARSE");
        assert_eq!(err.error, "Could not parse the given variant");
    }

    #[tokio::test]
    async fn malformed_remote_result_is_502() {
        let remote = CannedRemote::new().with("info", json!({ "a": {}, "b": {} }));
        let app = build_app(Arc::new(remote));
        let (status, _, body) = get(app, "/info", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "bad_gateway");
    }

    #[tokio::test]
    async fn unavailable_remote_is_502() {
        let app = build_app(Arc::new(CannedRemote::new()));
        let (status, _, _) = get(app, "/info", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn picks_params_in_declared_order() {
        let query: QueryMap = [
            ("geneName".to_string(), "SDHD".to_string()),
            ("genomicReference".to_string(), "NC_000011.9".to_string()),
            ("other".to_string(), "x".to_string()),
        ]
        .into_iter()
        .collect();
        let params = pick_params(Operation::GetTranscriptsAndInfo, &query).unwrap();
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["genomicReference", "geneName"]);
    }

    #[test]
    fn optional_params_may_be_absent() {
        let query: QueryMap = [("genomicReference".to_string(), "UD_139015208095".to_string())]
            .into_iter()
            .collect();
        let params = pick_params(Operation::GetTranscriptsAndInfo, &query).unwrap();
        assert_eq!(params.get("geneName"), None);
    }
}
