use std::{io::Write, sync::Arc};

use clap::Parser;
use tokio::sync::RwLock;
use trybot_ci_interface::MockCiService;
use trybot_config::Config;
use trybot_core::{CoreModule, CorrelationStore};
use trybot_review_interface::MockReviewService;

use crate::{
    args::{Args, CommandExecutor},
    commands::CommandContext,
};

pub(crate) struct CommandContextTest {
    pub config: Config,
    pub core_module: CoreModule,
    pub review_service: MockReviewService,
    pub ci_service: MockCiService,
}

impl CommandContextTest {
    pub fn new() -> Self {
        Self {
            config: Config::from_env_no_version().unwrap(),
            core_module: CoreModule::builder().build(),
            review_service: MockReviewService::new(),
            ci_service: MockCiService::new(),
        }
    }

    pub fn into_context(self, writer: Arc<RwLock<dyn Write + Send + Sync>>) -> CommandContext {
        CommandContext {
            store: CorrelationStore::from_config(&self.config.cache),
            config: self.config,
            core_module: self.core_module,
            review_service: Box::new(self.review_service),
            ci_service: Box::new(self.ci_service),
            writer,
        }
    }
}

pub(crate) async fn test_command(ctx: CommandContextTest, command_args: &[&str]) -> String {
    test_command_with(|writer| ctx.into_context(writer), command_args).await
}

pub(crate) async fn test_command_with<F>(build_context: F, command_args: &[&str]) -> String
where
    F: FnOnce(Arc<RwLock<dyn Write + Send + Sync>>) -> CommandContext,
{
    let buf = Arc::new(RwLock::new(Vec::<u8>::new()));

    {
        let command_args = {
            let mut tmp_args = vec!["bot"];
            tmp_args.extend(command_args);
            tmp_args
        };

        let writer: Arc<RwLock<dyn Write + Send + Sync>> = buf.clone();
        let args = Args::try_parse_from(command_args);
        match args {
            Ok(args) => CommandExecutor::parse_args_async(args, build_context(writer))
                .await
                .unwrap(),
            Err(e) => {
                eprintln!("{}", e);
                panic!("Parse error.")
            }
        }
    }

    let vec = buf.read().await.to_vec();
    std::str::from_utf8(&vec).unwrap().to_string()
}
