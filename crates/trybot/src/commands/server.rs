use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use trybot_server::{
    dispatcher::EventDispatcher,
    events::EventBus,
    poller::BuildPoller,
    server::{run_bot_server, AppContext},
};

use super::{Command, CommandContext};
use crate::Result;

/// Start server, CI poller and event dispatcher
#[derive(Parser)]
pub(crate) struct ServerCommand;

#[async_trait(?Send)]
impl Command for ServerCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let (bus, streams) = EventBus::new(ctx.config.server.channel_capacity);
        let context = Arc::new(AppContext::new_with_adapters(
            ctx.config,
            ctx.core_module,
            ctx.review_service,
            ctx.ci_service,
        ));

        EventDispatcher::new(context.clone()).start(streams);
        tokio::spawn(BuildPoller::new(context.clone(), bus.clone()).run());

        run_bot_server(context, bus).await?;
        Ok(())
    }
}
