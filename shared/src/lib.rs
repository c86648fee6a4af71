//! Shared library for the habit tracker Lambda functions.
//!
//! This crate provides configuration, error types and the Notion API client used by the webhook.

pub mod config;
pub mod error;
pub mod http;
pub mod notion;
pub mod secrets;

pub use config::Config;
pub use error::{DateError, Error, Result};
pub use http::text_response;
pub use notion::{
    Checkbox, CheckboxProperties, DataSourceRef, Database, DayFilter, NotionApi, NotionClient,
    PageRef, QueryResults,
};
pub use secrets::{get_secret, resolve_notion_token, token_from_secret};
