//! Commands.

use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use clap::Subcommand;
use tokio::sync::RwLock;
use trybot_ci_interface::CiService;
use trybot_config::Config;
use trybot_core::{CoreContext, CoreModule, CorrelationStore};
use trybot_review_interface::ReviewService;

use self::{server::ServerCommand, trigger::TriggerCommand};
use crate::Result;

mod server;
mod trigger;

pub(crate) struct CommandContext {
    pub config: Config,
    pub core_module: CoreModule,
    pub review_service: Box<dyn ReviewService>,
    pub ci_service: Box<dyn CiService>,
    pub store: CorrelationStore,
    pub writer: Arc<RwLock<dyn Write + Send + Sync>>,
}

impl CommandContext {
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

#[async_trait(?Send)]
pub(crate) trait Command {
    async fn execute(self, ctx: CommandContext) -> Result<()>;
}

/// Command
#[derive(Subcommand)]
pub(crate) enum SubCommand {
    Server(ServerCommand),
    Trigger(TriggerCommand),
}

#[async_trait(?Send)]
impl Command for SubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::Server(sub) => sub.execute(ctx).await,
            Self::Trigger(sub) => sub.execute(ctx).await,
        }
    }
}
