//! Provider fallback behavior against mock chat-completions endpoints.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fairwork_arbiter::{ArbiterError, ArbitrationRouter, CaseEvidence, ProviderConfig};
use fairwork_core::Recommendation;

fn case() -> CaseEvidence {
    CaseEvidence {
        job_description: "Build the analytics dashboard".to_string(),
        deliverable: "Dashboard without the reporting module".to_string(),
        client_evidence: "- signed scope document".to_string(),
        freelancer_evidence: "- chat log deferring the module".to_string(),
    }
}

fn chat_body(content: serde_json::Value) -> serde_json::Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

fn valid_analysis_content() -> String {
    json!({
        "recommendation": "CLIENT",
        "confidence": 85,
        "summary": "The deliverable omits the agreed reporting module.",
        "reasoning": ["Scope document includes the module", "Submission lacks it"]
    })
    .to_string()
}

async fn mount_success(server: &MockServer, content: String) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(content.into())))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_provider_serves_the_analysis() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer key-1"))
        .and(body_partial_json(json!({
            "model": "model-a",
            "temperature": 0.3,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_body(valid_analysis_content().into())),
        )
        .expect(1)
        .mount(&primary)
        .await;

    let router = ArbitrationRouter::new(vec![ProviderConfig::new(
        "primary",
        primary.uri(),
        "key-1",
        "model-a",
    )])
    .unwrap();

    let analysis = router.analyze(&case()).await.unwrap();
    assert_eq!(analysis.recommendation(), Recommendation::Client);
    assert_eq!(analysis.confidence(), 85);
}

#[tokio::test]
async fn http_error_falls_through_to_next_provider() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;

    let fallback = MockServer::start().await;
    mount_success(&fallback, valid_analysis_content()).await;

    let router = ArbitrationRouter::new(vec![
        ProviderConfig::new("primary", primary.uri(), "k1", "m1"),
        ProviderConfig::new("fallback", fallback.uri(), "k2", "m2"),
    ])
    .unwrap();

    let analysis = router.analyze(&case()).await.unwrap();
    assert_eq!(analysis.recommendation(), Recommendation::Client);
}

#[tokio::test]
async fn schema_invalid_response_counts_as_failure() {
    let primary = MockServer::start().await;
    // 200 OK, but the confidence field is missing
    mount_success(
        &primary,
        json!({
            "recommendation": "CLIENT",
            "summary": "looks client-favored",
            "reasoning": ["missing confidence"]
        })
        .to_string(),
    )
    .await;

    let fallback = MockServer::start().await;
    mount_success(&fallback, valid_analysis_content()).await;

    let router = ArbitrationRouter::new(vec![
        ProviderConfig::new("primary", primary.uri(), "k1", "m1"),
        ProviderConfig::new("fallback", fallback.uri(), "k2", "m2"),
    ])
    .unwrap();

    let analysis = router.analyze(&case()).await.unwrap();
    assert_eq!(analysis.confidence(), 85);
}

#[tokio::test]
async fn fenced_response_is_accepted() {
    let primary = MockServer::start().await;
    mount_success(
        &primary,
        format!("```json\n{}\n```", valid_analysis_content()),
    )
    .await;

    let router =
        ArbitrationRouter::new(vec![ProviderConfig::new("primary", primary.uri(), "k", "m")])
            .unwrap();

    let analysis = router.analyze(&case()).await.unwrap();
    assert_eq!(analysis.recommendation(), Recommendation::Client);
}

#[tokio::test]
async fn exhausted_chain_reports_every_attempt() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&primary)
        .await;

    let fallback = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .expect(1)
        .mount(&fallback)
        .await;

    let router = ArbitrationRouter::new(vec![
        ProviderConfig::new("primary", primary.uri(), "k1", "m1"),
        ProviderConfig::new("fallback", fallback.uri(), "k2", "m2"),
    ])
    .unwrap();

    let err = router.analyze(&case()).await.unwrap_err();
    let ArbiterError::Unavailable { attempts } = err else {
        panic!("expected Unavailable, got {err}");
    };
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].provider, "primary");
    assert!(attempts[0].reason.contains("503"));
    assert_eq!(attempts[1].provider, "fallback");
    assert!(attempts[1].reason.contains("no choices"));
}

#[tokio::test]
async fn out_of_range_confidence_is_rejected_not_clamped() {
    let primary = MockServer::start().await;
    mount_success(
        &primary,
        json!({
            "recommendation": "FREELANCER",
            "confidence": 140,
            "summary": "overconfident provider",
            "reasoning": ["nonsense score"]
        })
        .to_string(),
    )
    .await;

    let router =
        ArbitrationRouter::new(vec![ProviderConfig::new("primary", primary.uri(), "k", "m")])
            .unwrap();

    let err = router.analyze(&case()).await.unwrap_err();
    let ArbiterError::Unavailable { attempts } = err else {
        panic!("expected Unavailable, got {err}");
    };
    assert!(attempts[0].reason.contains("140"));
}
