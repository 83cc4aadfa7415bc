use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;
use tracing::info;
use trybot_ci_buildbot::BuildbotCiService;
use trybot_ci_interface::CiService;
use trybot_ci_null::NullCiService;
use trybot_config::{CiDriver, Config, ReviewDriver};
use trybot_core::{CoreModule, CorrelationStore};
use trybot_review_github::GithubReviewService;
use trybot_review_interface::ReviewService;
use trybot_review_null::NullReviewService;
use trybot_sentry::with_sentry_configuration;
use trybot_server::{ci::MetricsCiService, review::MetricsReviewService};

use crate::{
    commands::{Command, CommandContext, SubCommand},
    Result,
};

#[derive(Parser)]
#[command(about = None, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    cmd: SubCommand,
}

pub struct CommandExecutor;

impl CommandExecutor {
    pub fn parse_args(config: Config, args: Args) -> Result<()> {
        let sync = |config: Config, args: Args| async move {
            let review_service: Box<dyn ReviewService> = match config.review.driver {
                ReviewDriver::GitHub => {
                    info!("Using GitHub review driver");
                    Box::new(MetricsReviewService::new(Box::new(
                        GithubReviewService::new(config.clone()),
                    )))
                }
                ReviewDriver::Null => {
                    info!("Using null review driver");
                    Box::new(NullReviewService::new())
                }
            };

            let ci_service: Box<dyn CiService> = match config.ci.driver {
                CiDriver::Buildbot => {
                    info!("Using Buildbot CI driver");
                    Box::new(MetricsCiService::new(Box::new(BuildbotCiService::new(
                        config.clone(),
                    ))))
                }
                CiDriver::Null => {
                    info!("Using null CI driver");
                    Box::new(NullCiService::new())
                }
            };

            let ctx = CommandContext {
                store: CorrelationStore::from_config(&config.cache),
                config: config.clone(),
                core_module: CoreModule::builder().build(),
                review_service,
                ci_service,
                writer: Arc::new(RwLock::new(std::io::stdout())),
            };

            with_sentry_configuration(&config, || async {
                Self::parse_args_async(args, ctx).await
            })
            .await
        };

        actix_rt::System::with_tokio_rt(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("tokio runtime should build")
        })
        .block_on(sync(config, args))?;

        Ok(())
    }

    pub(crate) async fn parse_args_async(args: Args, ctx: CommandContext) -> Result<()> {
        args.cmd.execute(ctx).await
    }
}
