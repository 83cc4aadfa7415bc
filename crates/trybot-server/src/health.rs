use actix_web::{web, HttpResponse, Responder};

use crate::server::AppContext;

pub async fn health_check_route(ctx: web::Data<AppContext>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "cache": {
            "entries": ctx.store.len(),
            "capacity": ctx.store.capacity(),
        },
    }))
}
