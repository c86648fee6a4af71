//! Habit Webhook Lambda - Checks off habits in the Notion habits database.
//!
//! Receives Notion automation webhooks for a task, finds the daily record matching the
//! task's due date and sets the habit checkboxes from the task status.
//!
//! Paths:
//! - POST /gym - Updates the `Gym` checkbox
//! - POST /run - Updates the `Walk` checkbox
//! - POST /* - Updates every habit tagged in the task's `Habit` property

mod data_source;
mod dates;
mod handler;
mod routes;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use handler::HabitWebhook;
use lambda_http::{run, service_fn, Error, Request};
use shared::{resolve_notion_token, Config, NotionClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let token = resolve_notion_token(&config).await?;
    let notion = NotionClient::from_config(&config, token);

    info!(
        database_id = %config.habits_database_id,
        "Habit webhook ready"
    );

    let webhook = Arc::new(
        HabitWebhook::new(Arc::new(notion), config.habits_database_id.clone())
            .with_stage_prefix(config.stage_prefix.clone()),
    );

    run(service_fn(move |event: Request| {
        let webhook = Arc::clone(&webhook);
        async move { webhook.handle(&event).await }
    }))
    .await
}
