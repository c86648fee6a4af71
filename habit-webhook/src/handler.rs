//! Webhook pipeline: authorize, extract properties, derive habits, update the daily record.

use std::sync::Arc;

use lambda_http::http::{HeaderMap, Method};
use lambda_http::{Body, Request, Response};
use serde_json::{Map, Value};
use shared::{text_response, Checkbox, CheckboxProperties, DayFilter, NotionApi, Result};
use tracing::{error, info, warn};

use crate::data_source::DataSourceCache;
use crate::dates::normalize_due_date;
use crate::routes::{derive_habits, HabitUpdate};

/// User agent sent by the Notion automation.
const EXPECTED_USER_AGENT: &str = "NotionAutomation";

/// Date property identifying a daily record.
const DAY_PROPERTY: &str = "Day";

const MSG_UNAUTHORIZED: &str = "Invalid request method or user-agent.";
const MSG_MISSING_PROPERTIES: &str = "No properties found in the request body.";
const MSG_NO_HABITS: &str = "No habits to update.";
const MSG_NO_DAILY_RECORD: &str = "No page found for the given date.";
const MSG_INTERNAL_ERROR: &str = "Internal server error.";
const MSG_UPDATED: &str = "Habits updated.";

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unauthorized,
    MissingProperties,
    NoHabits,
    NoDailyRecord,
    Failed,
    Updated,
}

impl Outcome {
    fn status_and_message(self) -> (u16, &'static str) {
        match self {
            Outcome::Unauthorized => (400, MSG_UNAUTHORIZED),
            Outcome::MissingProperties => (400, MSG_MISSING_PROPERTIES),
            Outcome::NoHabits => (200, MSG_NO_HABITS),
            Outcome::NoDailyRecord => (404, MSG_NO_DAILY_RECORD),
            Outcome::Failed => (500, MSG_INTERNAL_ERROR),
            Outcome::Updated => (200, MSG_UPDATED),
        }
    }
}

/// Only `POST` from the Notion automation is accepted.
pub fn is_authorized(method: &Method, headers: &HeaderMap) -> bool {
    *method == Method::POST
        && headers
            .get("user-agent")
            .is_some_and(|agent| agent.as_bytes() == EXPECTED_USER_AGENT.as_bytes())
}

/// Request path with the API Gateway stage prefix removed.
///
/// REST APIs include the stage in the path (`/prod/gym`); function URLs and
/// HTTP APIs with the default stage do not.
pub fn route_path<'a>(raw_path: &'a str, stage_prefix: Option<&str>) -> &'a str {
    stage_prefix
        .and_then(|prefix| raw_path.strip_prefix(prefix))
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(raw_path)
}

/// `data.properties` of the body, when it is a JSON object.
pub fn extract_properties(body: &Value) -> Option<&Map<String, Value>> {
    body.get("data")?.get("properties")?.as_object()
}

/// Build the update payload, one checkbox per habit.
pub fn checkbox_properties(habits: &[HabitUpdate]) -> CheckboxProperties {
    habits
        .iter()
        .map(|habit| {
            (
                habit.property_name.clone(),
                Checkbox {
                    checkbox: habit.is_done,
                },
            )
        })
        .collect()
}

/// Handles habit webhooks against one habits database.
pub struct HabitWebhook {
    notion: Arc<dyn NotionApi>,
    habits_database_id: String,
    stage_prefix: Option<String>,
    data_sources: DataSourceCache,
}

impl HabitWebhook {
    pub fn new(notion: Arc<dyn NotionApi>, habits_database_id: impl Into<String>) -> Self {
        Self {
            notion,
            habits_database_id: habits_database_id.into(),
            stage_prefix: None,
            data_sources: DataSourceCache::new(),
        }
    }

    /// Strip this stage prefix from request paths before routing.
    pub fn with_stage_prefix(mut self, stage_prefix: Option<String>) -> Self {
        self.stage_prefix = stage_prefix;
        self
    }

    /// Handle one webhook request.
    pub async fn handle(
        &self,
        event: &Request,
    ) -> std::result::Result<Response<Body>, lambda_http::Error> {
        let (status, message) = self.process(event).await.status_and_message();
        text_response(status, message)
    }

    async fn process(&self, event: &Request) -> Outcome {
        let path = route_path(event.uri().path(), self.stage_prefix.as_deref());

        if !is_authorized(event.method(), event.headers()) {
            info!(method = %event.method(), path, "Invalid request method or user-agent");
            return Outcome::Unauthorized;
        }

        let body: Value = serde_json::from_slice(event.body().as_ref()).unwrap_or(Value::Null);
        let Some(properties) = extract_properties(&body) else {
            warn!(path, "No properties found in the request body");
            return Outcome::MissingProperties;
        };

        let habits = derive_habits(path, properties);
        if habits.is_empty() {
            info!(path, "No habits to update");
            return Outcome::NoHabits;
        }

        match self.update_daily_record(properties, &habits).await {
            Ok(Some(page_id)) => {
                info!(path, %page_id, count = habits.len(), "Habits updated");
                Outcome::Updated
            }
            Ok(None) => Outcome::NoDailyRecord,
            Err(e) => {
                error!(path, error = %e, "Failed to update habits");
                Outcome::Failed
            }
        }
    }

    /// Locate the daily record for the due date and write the habit checkboxes.
    ///
    /// Returns the updated page id, or `None` when no record exists for that day.
    async fn update_daily_record(
        &self,
        properties: &Map<String, Value>,
        habits: &[HabitUpdate],
    ) -> Result<Option<String>> {
        let day = normalize_due_date(properties)?;

        let data_source_id = self
            .data_sources
            .resolve(self.notion.as_ref(), &self.habits_database_id)
            .await?;

        let Some(page_id) = self.find_daily_record(&data_source_id, &day).await? else {
            info!(%day, "No page found for the given date");
            return Ok(None);
        };

        self.notion
            .update_page(&page_id, &checkbox_properties(habits))
            .await?;

        Ok(Some(page_id))
    }

    /// Id of the record whose `Day` equals `day`. The first result wins.
    async fn find_daily_record(&self, data_source_id: &str, day: &str) -> Result<Option<String>> {
        let filter = DayFilter::new(DAY_PROPERTY, day);
        let results = self
            .notion
            .query_data_source(data_source_id, &filter)
            .await?
            .results;

        if results.len() > 1 {
            warn!(
                day,
                matches = results.len(),
                "Multiple daily records found, using the first"
            );
        }

        Ok(results.into_iter().next().map(|page| page.id))
    }
}
