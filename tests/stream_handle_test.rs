//! The orchestrator as a cancellable event stream.

mod support;

use std::time::Duration;

use augury::error::ErrorKind;
use augury::streaming::GenerationEvent;
use augury::types::GenerationRequest;
use futures::StreamExt;
use support::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn updates_then_completed() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(stream_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(cumulative_body(&["Mountain", "Mountain over lake"]), "application/json"),
        )
        .mount(&provider)
        .await;

    let orch = orchestrator(&provider);
    let handle = orch.stream(direct_settings(), GenerationRequest::new("p"));
    let events: Vec<_> = handle.stream.collect().await;

    assert_eq!(
        events,
        vec![
            Ok(GenerationEvent::Update("Mountain".into())),
            Ok(GenerationEvent::Update("Mountain over lake".into())),
            Ok(GenerationEvent::Completed("Mountain over lake".into())),
        ]
    );
}

#[tokio::test]
async fn failure_is_the_terminal_item() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&provider)
        .await;

    let orch = orchestrator(&provider);
    let handle = orch.stream(direct_settings(), GenerationRequest::new("p"));
    let events: Vec<_> = handle.stream.collect().await;

    assert_eq!(events.len(), 1);
    let err = events.into_iter().next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimited);
}

#[tokio::test]
async fn cancel_before_polling_yields_nothing() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidates_body("unused")))
        .mount(&provider)
        .await;

    let orch = orchestrator(&provider);
    let mut handle = orch.stream(direct_settings(), GenerationRequest::new("p"));
    handle.cancel.cancel();
    assert!(handle.stream.next().await.is_none());
}

#[tokio::test]
async fn cancel_aborts_in_flight_request() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidates_body("too late"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&provider)
        .await;

    let orch = orchestrator(&provider);
    let mut handle = orch.stream(direct_settings(), GenerationRequest::new("p"));
    let cancel = handle.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let next = tokio::time::timeout(Duration::from_secs(2), handle.stream.next())
        .await
        .expect("cancellation should end the stream promptly");
    assert!(next.is_none());
}
