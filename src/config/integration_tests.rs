// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{load_and_validate_config, Endpoints, RouterBuilder, RouterConfig};
use crate::errors::{BackendError, OrchestrationError};
use crate::model::{Backend, FeatureFlag, RequestContext, ScrapeOptions};

/// The shipped full-deployment config loads and builds.
#[test]
fn test_router_yaml_loading() {
    let config = load_and_validate_config("configs/router.yaml").unwrap();

    assert_eq!(config.default_timeout(), Some(Duration::from_secs(60)));
    assert_eq!(config.qualities.get(&Backend::FireEngineTlsClient), Some(&12));
    assert_eq!(config.weights.get(&FeatureFlag::ExplicitWait), Some(&2));
    assert_eq!(config.time_allowances[&Backend::Pdf].base_ms, 90_000);

    let orchestrator = RouterBuilder::from_config(&config, config.endpoints.clone()).unwrap();
    let registry = orchestrator.ranker().registry();
    assert_eq!(registry.len(), Backend::ALL.len() - 1);
    assert!(!registry.contains(Backend::FireEnginePlaywrightStealth));
    assert_eq!(orchestrator.adapters().len(), registry.len());
}

#[test]
fn test_router_local_toml_loading() {
    let config = load_and_validate_config("configs/router-local.toml").unwrap();
    let orchestrator = RouterBuilder::from_config(&config, config.endpoints.clone()).unwrap();

    assert_eq!(
        orchestrator.ranker().registry().backends(),
        vec![Backend::Playwright, Backend::Fetch]
    );
}

fn config_for(server: &MockServer) -> RouterConfig {
    RouterConfig {
        endpoints: Endpoints {
            playwright_url: Some(server.uri()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Playwright service fails, so the router falls back to fetching the page itself.
#[tokio::test]
async fn test_end_to_end_fallback_to_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_string("browser crashed"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>landing</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let orchestrator = RouterBuilder::from_config(&cfg, cfg.endpoints.clone()).unwrap();
    let request = RequestContext::new(ScrapeOptions::new(format!("{}/landing", server.uri()))).unwrap();

    let (result, trace) = orchestrator
        .execute_traced(&request, CancellationToken::new())
        .await;
    let outcome = result.unwrap();

    assert_eq!(outcome.backend, Backend::Fetch);
    assert_eq!(outcome.result.content, "<p>landing</p>");
    assert_eq!(trace.attempted(), vec![Backend::Playwright, Backend::Fetch]);
    assert!(matches!(
        trace.errors()[0].error,
        BackendError::Rejected { status: 500, .. }
    ));
}

#[tokio::test]
async fn test_end_to_end_screenshot_goes_to_playwright() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "<html>rendered</html>",
            "pageStatusCode": 200,
            "screenshot": "data:image/png;base64,AAAA",
        })))
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let orchestrator = RouterBuilder::from_config(&cfg, cfg.endpoints.clone()).unwrap();
    let mut options = ScrapeOptions::new("https://example.com/app");
    options.screenshot = true;
    let request = RequestContext::new(options).unwrap();

    let outcome = orchestrator
        .execute(&request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.backend, Backend::Playwright);
    assert_eq!(outcome.result.screenshot.as_deref(), Some("data:image/png;base64,AAAA"));
    assert!(outcome.unsupported_features.is_empty());
}

#[tokio::test]
async fn test_end_to_end_budget_exhaustion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({"content": "late", "pageStatusCode": 200})),
        )
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let orchestrator = RouterBuilder::from_config(&cfg, cfg.endpoints.clone()).unwrap();
    let mut options = ScrapeOptions::new("https://example.com/slow");
    options.timeout_ms = Some(300);
    let request = RequestContext::new(options).unwrap();

    let err = orchestrator
        .execute(&request, CancellationToken::new())
        .await
        .unwrap_err();

    let OrchestrationError::BudgetExhausted { attempts } = err else {
        panic!("expected BudgetExhausted, got {:?}", err);
    };
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].backend, Backend::Playwright);
    assert!(matches!(attempts[0].error, BackendError::Timeout(_)));
}
