//! Issue webhook handlers.

use actix_web::HttpResponse;
use tracing::{debug, info};
use trybot_config::Config;

use super::{
    parse_event_type,
    types::{GhIssueCommentAction, GhIssueCommentEvent},
};
use crate::{
    event_type::EventType,
    events::{EventBus, TriggerEvent},
    metrics::TRIGGERS_RECEIVED,
    Result,
};

pub(crate) fn parse_issue_comment_event(body: &str) -> Result<GhIssueCommentEvent> {
    parse_event_type(EventType::IssueComment, body)
}

/// Extract a trigger from a new pull request comment containing the trigger
/// phrase, ignoring comments written by the bot itself.
pub(crate) fn trigger_from_comment(
    config: &Config,
    event: &GhIssueCommentEvent,
) -> Option<TriggerEvent> {
    let phrase = config.trigger.phrase.trim().to_lowercase();

    if event.action != GhIssueCommentAction::Created
        || event.issue.pull_request.is_none()
        || phrase.is_empty()
        || event.comment.user.login.eq_ignore_ascii_case(&config.name)
        || !event.comment.body.to_lowercase().contains(&phrase)
    {
        return None;
    }

    Some(TriggerEvent {
        pull_request_id: event.issue.number,
    })
}

pub(crate) fn issue_comment_event(
    config: &Config,
    bus: &EventBus,
    event: GhIssueCommentEvent,
) -> HttpResponse {
    match trigger_from_comment(config, &event) {
        Some(trigger) => {
            info!(
                pull_request_id = trigger.pull_request_id,
                commenter = %event.comment.user.login,
                message = "Trigger phrase found"
            );

            TRIGGERS_RECEIVED.inc();
            if bus.emit_trigger(trigger) {
                HttpResponse::Accepted().body("Build triggered.")
            } else {
                HttpResponse::ServiceUnavailable().body("Trigger dropped.")
            }
        }
        None => {
            debug!(
                issue_number = event.issue.number,
                action = ?event.action,
                message = "Comment ignored"
            );
            HttpResponse::Accepted().body("Issue comment.")
        }
    }
}
