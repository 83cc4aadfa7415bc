//! Server module.

use std::sync::{Arc, Mutex};

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use actix_web_prom::PrometheusMetrics;
use sentry_actix::Sentry;
use tracing::info;
use trybot_ci_interface::CiService;
use trybot_config::Config;
use trybot_core::{CoreContext, CoreModule, CorrelationStore};
use trybot_review_interface::ReviewService;

use crate::{
    constants::DELIVERY_WINDOW_SIZE,
    events::EventBus,
    health::health_check_route,
    metrics::build_metrics_handler,
    utils::SeenWindow,
    webhook::configure_webhook_handlers,
    Result, ServerError,
};

/// App context.
pub struct AppContext {
    /// Config.
    pub config: Config,
    /// Core module.
    pub core_module: CoreModule,
    /// Review system adapter.
    pub review_service: Box<dyn ReviewService>,
    /// CI system adapter.
    pub ci_service: Box<dyn CiService>,
    /// Correlation store.
    pub store: CorrelationStore,
}

impl AppContext {
    /// Create new app context using adapters.
    pub fn new_with_adapters(
        config: Config,
        core_module: CoreModule,
        review_service: Box<dyn ReviewService>,
        ci_service: Box<dyn CiService>,
    ) -> Self {
        Self {
            store: CorrelationStore::from_config(&config.cache),
            config,
            core_module,
            review_service,
            ci_service,
        }
    }

    /// Convert the context for the core module.
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            review_service: self.review_service.as_ref(),
            ci_service: self.ci_service.as_ref(),
            store: &self.store,
        }
    }
}

/// Webhook state shared between workers.
pub struct WebhookContext {
    /// Where triggers are sent.
    pub bus: EventBus,
    pub(crate) deliveries: Mutex<SeenWindow<String>>,
}

impl WebhookContext {
    /// Create webhook state.
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            deliveries: Mutex::new(SeenWindow::new(DELIVERY_WINDOW_SIZE)),
        }
    }
}

/// Build Actix app.
pub fn build_actix_app(
    context: Data<AppContext>,
    webhook: Data<WebhookContext>,
    prometheus: PrometheusMetrics,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(context)
        .app_data(webhook)
        .wrap(prometheus)
        .wrap(Sentry::new())
        .wrap(Logger::default())
        .service(web::scope("/webhook").configure(configure_webhook_handlers))
        .route("/health", web::get().to(health_check_route))
        .route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({"message": "Welcome on trybot!" }))
            }),
        )
}

/// Run bot server.
pub async fn run_bot_server(context: Arc<AppContext>, bus: EventBus) -> Result<()> {
    let address = get_bind_address(&context.config);

    info!(
        version = context.config.version,
        address = %address,
        message = "Starting bot server",
    );

    run_bot_server_internal(address, context, bus).await
}

fn get_bind_address(config: &Config) -> String {
    format!("{}:{}", config.server.bind_ip, config.server.bind_port)
}

async fn run_bot_server_internal(
    ip_with_port: String,
    context: Arc<AppContext>,
    bus: EventBus,
) -> Result<()> {
    let workers_count = context.config.server.workers_count;
    let context = Data::from(context);
    let webhook = Data::new(WebhookContext::new(bus));
    let prometheus = build_metrics_handler()?;

    let mut server = HttpServer::new(move || {
        build_actix_app(context.clone(), webhook.clone(), prometheus.clone())
    });

    if let Some(workers) = workers_count {
        server = server.workers(workers as usize);
    }

    server
        .bind(ip_with_port)
        .map_err(|e| ServerError::IoError { source: e })?
        .run()
        .await
        .map_err(|e| ServerError::IoError { source: e })
}
