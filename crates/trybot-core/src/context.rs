use trybot_ci_interface::CiService;
use trybot_config::Config;
use trybot_review_interface::ReviewService;

use crate::{CoreModule, CorrelationStore};

pub struct CoreContext<'a> {
    pub config: &'a Config,
    pub core_module: &'a CoreModule,
    pub review_service: &'a (dyn ReviewService + 'a),
    pub ci_service: &'a (dyn CiService + 'a),
    pub store: &'a CorrelationStore,
}

#[cfg(any(test, feature = "testkit"))]
pub mod tests {
    use trybot_ci_interface::MockCiService;
    use trybot_config::Config;
    use trybot_review_interface::MockReviewService;

    use crate::{CoreContext, CoreModule, CorrelationStore};

    pub struct CoreContextTest {
        pub config: Config,
        pub core_module: CoreModule,
        pub review_service: MockReviewService,
        pub ci_service: MockCiService,
        pub store: CorrelationStore,
    }

    impl CoreContextTest {
        #[allow(clippy::new_without_default)]
        pub fn new() -> Self {
            let config = Config::from_env_no_version().unwrap();

            Self {
                store: CorrelationStore::new(config.cache.capacity),
                config,
                core_module: CoreModule::builder().build(),
                review_service: MockReviewService::new(),
                ci_service: MockCiService::new(),
            }
        }

        pub fn as_context(&self) -> CoreContext {
            CoreContext {
                config: &self.config,
                core_module: &self.core_module,
                review_service: &self.review_service,
                ci_service: &self.ci_service,
                store: &self.store,
            }
        }
    }
}
