//! Webhook handler tests

use actix_web::{
    http::StatusCode,
    test::{self, TestRequest},
    web::Data,
};
use pretty_assertions::assert_eq;
use trybot_ci_interface::MockCiService;
use trybot_config::Config;
use trybot_core::CoreModule;
use trybot_review_interface::MockReviewService;

use super::fixtures;
use crate::{
    events::{EventBus, EventStreams, TriggerEvent},
    metrics::build_metrics_handler,
    server::{build_actix_app, AppContext, WebhookContext},
    webhook::{
        issues::{parse_issue_comment_event, trigger_from_comment},
        ping::parse_ping_event,
        types::{
            GhIssue, GhIssueComment, GhIssueCommentAction, GhIssueCommentEvent,
            GhIssuePullRequest, GhPingEvent, GhRepository, GhUser,
        },
    },
    Result as ServerResult,
};

fn test_config() -> Config {
    let mut config = Config::from_env_no_version().unwrap();
    config.name = "trybot".into();
    config.trigger.phrase = "/try".into();
    config
}

fn comment_event(login: &str, body: &str) -> GhIssueCommentEvent {
    GhIssueCommentEvent {
        action: GhIssueCommentAction::Created,
        issue: GhIssue {
            number: 42,
            pull_request: Some(GhIssuePullRequest::default()),
        },
        comment: GhIssueComment {
            body: body.into(),
            user: GhUser {
                login: login.into(),
            },
        },
        repository: None,
    }
}

#[test]
fn test_ping_event_parsing() -> ServerResult<()> {
    assert_eq!(
        parse_ping_event(fixtures::PING_EVENT_DATA)?,
        GhPingEvent {
            zen: "Favor focus over features.".to_string(),
            hook_id: 12_345_678,
            repository: Some(GhRepository {
                full_name: "Example/test-repo".to_string(),
            }),
        }
    );

    Ok(())
}

#[test]
fn test_issue_comment_created_event_parsing() -> ServerResult<()> {
    assert_eq!(
        parse_issue_comment_event(fixtures::ISSUE_COMMENT_CREATED_DATA)?,
        GhIssueCommentEvent {
            action: GhIssueCommentAction::Created,
            issue: GhIssue {
                number: 42,
                pull_request: Some(GhIssuePullRequest {
                    url: "https://api.github.com/repos/Example/test-repo/pulls/42".to_string(),
                }),
            },
            comment: GhIssueComment {
                body: "Looks good, /try please".to_string(),
                user: GhUser {
                    login: "bob".to_string(),
                },
            },
            repository: Some(GhRepository {
                full_name: "Example/test-repo".to_string(),
            }),
        }
    );

    Ok(())
}

#[test]
fn test_invalid_event_parsing() {
    assert!(parse_ping_event("{").is_err());
}

#[test]
fn test_trigger_from_comment() {
    let config = test_config();

    assert_eq!(
        trigger_from_comment(&config, &comment_event("bob", "Please /TRY this")),
        Some(TriggerEvent {
            pull_request_id: 42
        })
    );
    assert_eq!(
        trigger_from_comment(&config, &comment_event("bob", "looks good")),
        None
    );
    // The bot quotes the phrase in its own comments.
    assert_eq!(
        trigger_from_comment(&config, &comment_event("TryBot", "/try")),
        None
    );
}

#[test]
fn test_trigger_only_on_new_pull_request_comments() {
    let config = test_config();

    let mut edited = comment_event("bob", "/try");
    edited.action = GhIssueCommentAction::Edited;
    assert_eq!(trigger_from_comment(&config, &edited), None);

    let mut issue = comment_event("bob", "/try");
    issue.issue.pull_request = None;
    assert_eq!(trigger_from_comment(&config, &issue), None);
}

#[test]
fn test_blank_phrase_never_triggers() {
    let mut config = test_config();
    config.trigger.phrase = "  ".into();

    assert_eq!(
        trigger_from_comment(&config, &comment_event("bob", "/try")),
        None
    );
}

fn build_test_contexts() -> (Data<AppContext>, Data<WebhookContext>, EventStreams) {
    build_test_contexts_with_capacity(8)
}

fn build_test_contexts_with_capacity(
    channel_capacity: usize,
) -> (Data<AppContext>, Data<WebhookContext>, EventStreams) {
    let (bus, streams) = EventBus::new(channel_capacity);
    let context = AppContext::new_with_adapters(
        test_config(),
        CoreModule::builder().build(),
        Box::new(MockReviewService::new()),
        Box::new(MockCiService::new()),
    );

    (
        Data::new(context),
        Data::new(WebhookContext::new(bus)),
        streams,
    )
}

#[actix_web::test]
async fn test_webhook_emits_trigger_once_per_delivery() {
    let (context, webhook, mut streams) = build_test_contexts();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/webhook")
            .insert_header(("X-GitHub-Event", "issue_comment"))
            .insert_header(("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958"))
            .set_payload(fixtures::ISSUE_COMMENT_CREATED_DATA)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    assert_eq!(
        streams.triggers.try_recv().ok(),
        Some(TriggerEvent {
            pull_request_id: 42
        })
    );
    assert!(streams.triggers.try_recv().is_err());
}

fn issue_comment_request(delivery: &str, payload: &'static str) -> actix_http::Request {
    TestRequest::post()
        .uri("/webhook")
        .insert_header(("X-GitHub-Event", "issue_comment"))
        .insert_header(("X-GitHub-Delivery", delivery.to_owned()))
        .set_payload(payload)
        .to_request()
}

#[actix_web::test]
async fn test_webhook_redelivery_after_full_channel() {
    let (context, webhook, mut streams) = build_test_contexts_with_capacity(1);
    let bus = webhook.bus.clone();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    assert!(bus.emit_trigger(TriggerEvent { pull_request_id: 1 }));

    let resp = test::call_service(
        &app,
        issue_comment_request("delivery-1", fixtures::ISSUE_COMMENT_CREATED_DATA),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    assert_eq!(
        streams.triggers.try_recv().ok(),
        Some(TriggerEvent { pull_request_id: 1 })
    );

    let resp = test::call_service(
        &app,
        issue_comment_request("delivery-1", fixtures::ISSUE_COMMENT_CREATED_DATA),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(test::read_body(resp).await, "Build triggered.");
    assert_eq!(
        streams.triggers.try_recv().ok(),
        Some(TriggerEvent {
            pull_request_id: 42
        })
    );
}

#[actix_web::test]
async fn test_webhook_redelivery_after_bad_payload() {
    let (context, webhook, mut streams) = build_test_contexts();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    let resp = test::call_service(
        &app,
        issue_comment_request("delivery-2", "{\"action\": \"created\"}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        issue_comment_request("delivery-2", fixtures::ISSUE_COMMENT_CREATED_DATA),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(streams.triggers.try_recv().is_ok());
}

#[actix_web::test]
async fn test_webhook_without_event_type() {
    let (context, webhook, _streams) = build_test_contexts();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    let req = TestRequest::post()
        .uri("/webhook")
        .set_payload(fixtures::PING_EVENT_DATA)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_webhook_ignores_unhandled_events() {
    let (context, webhook, mut streams) = build_test_contexts();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    let req = TestRequest::post()
        .uri("/webhook")
        .insert_header(("X-GitHub-Event", "pull_request"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(streams.triggers.try_recv().is_err());
}

#[actix_web::test]
async fn test_webhook_bad_payload() {
    let (context, webhook, _streams) = build_test_contexts();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    let req = TestRequest::post()
        .uri("/webhook")
        .insert_header(("X-GitHub-Event", "issue_comment"))
        .set_payload("{\"action\": \"created\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_reports_cache() {
    let (context, webhook, _streams) = build_test_contexts();
    let app = test::init_service(build_actix_app(
        context,
        webhook,
        build_metrics_handler().unwrap(),
    ))
    .await;

    let req = TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"]["entries"], 0);
}
