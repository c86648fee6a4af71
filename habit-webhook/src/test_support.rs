//! In-memory Notion API double for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{CheckboxProperties, Database, DayFilter, Error, NotionApi, QueryResults, Result};

pub struct FakeNotion {
    database: Value,
    pages: Vec<String>,
    fail_retrieve: bool,
    fail_query: bool,
    fail_update: bool,
    retrieves: AtomicUsize,
    queries: Mutex<Vec<(String, DayFilter)>>,
    updates: Mutex<Vec<(String, CheckboxProperties)>>,
}

impl FakeNotion {
    /// A database with data source `ds-1` and one daily record `page-1`.
    pub fn new() -> Self {
        Self {
            database: json!({"id": "db-1", "data_sources": [{"id": "ds-1", "name": "Habits"}]}),
            pages: vec!["page-1".to_string()],
            fail_retrieve: false,
            fail_query: false,
            fail_update: false,
            retrieves: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn with_data_sources(mut self, data_sources: Value) -> Self {
        self.database = json!({"id": "db-1", "data_sources": data_sources});
        self
    }

    pub fn with_pages(mut self, pages: &[&str]) -> Self {
        self.pages = pages.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn failing_retrieve(mut self) -> Self {
        self.fail_retrieve = true;
        self
    }

    pub fn failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn retrieve_count(&self) -> usize {
        self.retrieves.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, DayFilter)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, CheckboxProperties)> {
        self.updates.lock().unwrap().clone()
    }
}

fn remote_error(status: u16, message: &str) -> Error {
    Error::Remote {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl NotionApi for FakeNotion {
    async fn retrieve_database(&self, _database_id: &str) -> Result<Database> {
        self.retrieves.fetch_add(1, Ordering::SeqCst);
        if self.fail_retrieve {
            return Err(remote_error(503, "service_unavailable"));
        }
        Ok(serde_json::from_value(self.database.clone())?)
    }

    async fn query_data_source(
        &self,
        data_source_id: &str,
        filter: &DayFilter,
    ) -> Result<QueryResults> {
        self.queries
            .lock()
            .unwrap()
            .push((data_source_id.to_string(), filter.clone()));
        if self.fail_query {
            return Err(remote_error(400, "validation_error: Day is not a property"));
        }
        let results: Vec<Value> = self.pages.iter().map(|id| json!({"id": id})).collect();
        Ok(serde_json::from_value(json!({ "results": results }))?)
    }

    async fn update_page(&self, page_id: &str, properties: &CheckboxProperties) -> Result<()> {
        if self.fail_update {
            return Err(remote_error(400, "validation_error: Gym is not a property"));
        }
        self.updates
            .lock()
            .unwrap()
            .push((page_id.to_string(), properties.clone()));
        Ok(())
    }
}
