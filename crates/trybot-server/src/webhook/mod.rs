//! Webhook handlers.

mod issues;
mod ping;
pub mod types;

#[cfg(test)]
mod tests;

use std::sync::PoisonError;

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use tracing::{debug, info};

use self::{
    issues::{issue_comment_event, parse_issue_comment_event},
    ping::{parse_ping_event, ping_event},
};
use crate::{
    constants::{GITHUB_DELIVERY_HEADER, GITHUB_EVENT_HEADER},
    event_type::EventType,
    server::{AppContext, WebhookContext},
    utils::convert_payload_to_string,
    Result, ServerError,
};

fn parse_event(
    ctx: &AppContext,
    webhook: &WebhookContext,
    event_type: EventType,
    body: &str,
) -> Result<HttpResponse> {
    match event_type {
        EventType::IssueComment => Ok(issue_comment_event(
            &ctx.config,
            &webhook.bus,
            parse_issue_comment_event(body)?,
        )),
        EventType::Ping => Ok(ping_event(parse_ping_event(body)?)),
    }
}

fn parse_event_type<'de, T>(event_type: EventType, body: &'de str) -> Result<T>
where
    T: Deserialize<'de>,
{
    serde_json::from_str(body).map_err(|e| ServerError::EventParseError {
        event_type,
        source: e,
    })
}

fn extract_header<'r>(req: &'r HttpRequest, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|x| x.to_str().ok())
}

/// Remember a delivery. Returns `false` when it was already handled.
fn register_delivery(webhook: &WebhookContext, delivery: &str) -> bool {
    webhook
        .deliveries
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(delivery.to_owned())
}

/// Forget a delivery that was not handled, so a redelivery is processed.
fn forget_delivery(webhook: &WebhookContext, delivery: &str) {
    webhook
        .deliveries
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(delivery);
}

#[tracing::instrument(skip_all)]
pub(crate) async fn event_handler(
    req: HttpRequest,
    mut payload: web::Payload,
    ctx: web::Data<AppContext>,
    webhook: web::Data<WebhookContext>,
) -> ActixResult<HttpResponse> {
    let event_type = match extract_header(&req, GITHUB_EVENT_HEADER) {
        Some(event_type) => event_type,
        None => {
            return Ok(
                HttpResponse::BadRequest().json(serde_json::json!({"error": "Missing event type."}))
            )
        }
    };

    let event_type = match EventType::try_from(event_type) {
        Ok(event_type) => event_type,
        Err(_) => return Ok(HttpResponse::Accepted().body("Unhandled event.")),
    };

    let delivery = extract_header(&req, GITHUB_DELIVERY_HEADER);
    if let Some(delivery) = delivery {
        if !register_delivery(&webhook, delivery) {
            info!(delivery = delivery, message = "Skipping redelivered event");
            return Ok(HttpResponse::Accepted().body("Already delivered."));
        }
    }

    let response = match convert_payload_to_string(&mut payload).await {
        Ok(body) => parse_event(&ctx, &webhook, event_type, &body),
        Err(_) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Bad payload for event '{}'.", event_type)
        }))),
    };

    // Only successfully handled deliveries are remembered.
    let handled = matches!(&response, Ok(r) if r.status().is_success());
    if let (false, Some(delivery)) = (handled, delivery) {
        debug!(delivery = delivery, message = "Delivery not handled, forgetting it");
        forget_delivery(&webhook, delivery);
    }

    response.map_err(Into::into)
}

/// Configure webhook handlers.
pub fn configure_webhook_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(event_handler)));
}
