//! This module provides a client to a backend table, exposed over a PostgREST-style REST API

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

use crate::event::{EventFields, EventId, EventRecord};
use crate::resource::Resource;
use crate::traits::{EventSource, SourceError};


/// An event source that fetches its data from a remote backend
pub struct Client {
    resource: Resource,
    table: String,
    order: Option<String>,
    http: reqwest::Client,
}

/// The part of a created row we are interested in
#[derive(Deserialize)]
struct CreatedRow {
    id: EventId,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString>(url: S, api_key: T) -> Result<Self, SourceError> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self::from_resource(Resource::new(url, api_key.to_string())))
    }

    /// Create a client that targets the table currently set in [`crate::config::TABLE_NAME`]
    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            table: crate::config::table_name(),
            order: None,
            http: reqwest::Client::new(),
        }
    }

    /// Target another table
    pub fn with_table<S: ToString>(mut self, table: S) -> Self {
        self.table = table.to_string();
        self
    }

    /// Ask the server to sort the list, using a PostgREST `order` expression (e.g. `date.asc`).
    /// By default, no order is requested and rows come in whatever order the server decides.
    pub fn with_order<S: ToString>(mut self, order: S) -> Self {
        self.order = Some(order.to_string());
        self
    }

    pub fn resource(&self) -> &Resource { &self.resource }
    pub fn table(&self) -> &str { &self.table }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.resource.api_key())
            .header(AUTHORIZATION, format!("Bearer {}", self.resource.api_key()))
    }

    fn list_url(&self) -> Url {
        let mut url = self.resource.table_url(&self.table);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(order) = &self.order {
                query.append_pair("order", order);
            }
        }
        url
    }
}

/// Turn a non-2xx response into an error that carries the status and the body
async fn check_status(response: Response, what: &str) -> Result<Response, SourceError> {
    if response.status().is_success() == false {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Unable to {}: unexpected HTTP status code {:?} ({})", what, status, body).into());
    }
    Ok(response)
}

#[async_trait]
impl EventSource for Client {
    async fn list(&self) -> Result<Vec<EventRecord>, SourceError> {
        let url = self.list_url();
        log::debug!("Fetching events from {}", url);

        let response = self.authenticated(self.http.get(url))
            .send()
            .await?;
        let response = check_status(response, "list events").await?;

        let events: Vec<EventRecord> = response.json().await?;
        log::debug!("Fetched {} events", events.len());
        Ok(events)
    }

    async fn create(&self, fields: EventFields) -> Result<EventId, SourceError> {
        let response = self.authenticated(self.http.post(self.resource.table_url(&self.table)))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(&fields)
            .send()
            .await?;
        let response = check_status(response, "create an event").await?;

        let rows: Vec<CreatedRow> = response.json().await?;
        match rows.into_iter().next() {
            None => Err("The server did not return the created event".into()),
            Some(row) => {
                log::debug!("Created event {}", row.id);
                Ok(row.id)
            },
        }
    }

    async fn update(&self, record: EventRecord) -> Result<(), SourceError> {
        let response = self.authenticated(self.http.patch(self.resource.row_url(&self.table, record.id())))
            .header(CONTENT_TYPE, "application/json")
            .json(&record)
            .send()
            .await?;
        check_status(response, &format!("update event {}", record.id())).await?;
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<(), SourceError> {
        let response = self.authenticated(self.http.delete(self.resource.row_url(&self.table, id)))
            .send()
            .await?;
        check_status(response, &format!("delete event {}", id)).await?;
        Ok(())
    }
}
