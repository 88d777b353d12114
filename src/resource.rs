use std::error::Error;

use url::Url;

use crate::event::EventId;

/// Just a wrapper around a base URL and an API key
#[derive(Clone)]
pub struct Resource {
    url: Url,
    api_key: String,
}

impl Resource {
    pub fn new(url: Url, api_key: String) -> Self {
        Self { url, api_key }
    }

    pub fn url(&self) -> &Url { &self.url }
    pub fn api_key(&self) -> &str { &self.api_key }

    /// Build the URL of a table, by keeping the same scheme and server from `self` but changing the path part
    pub fn table_url(&self, table: &str) -> Url {
        let mut built = self.url.clone();
        let base_path = built.path().trim_end_matches('/').to_string();
        let prefix = crate::config::rest_prefix();
        built.set_path(&format!("{}/{}/{}", base_path, prefix.trim_matches('/'), table));
        built.set_query(None);
        built
    }

    /// Build the URL that targets a single row of a table, using a PostgREST `eq` filter
    pub fn row_url(&self, table: &str, id: &EventId) -> Url {
        let mut built = self.table_url(table);
        built.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        built
    }

    /// Build a resource from the environment (see [`crate::config::ENV_URL`] and [`crate::config::ENV_KEY`])
    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let url = std::env::var(crate::config::ENV_URL)
            .map_err(|_| format!("Missing environment variable {}", crate::config::ENV_URL))?;
        let api_key = std::env::var(crate::config::ENV_KEY)
            .map_err(|_| format!("Missing environment variable {}", crate::config::ENV_KEY))?;
        let url = Url::parse(&url)?;
        Ok(Self::new(url, api_key))
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key
        f.debug_struct("Resource")
            .field("url", &self.url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_urls() {
        let res = Resource::new(Url::parse("https://abc.backend.example/").unwrap(), "key".to_string());
        assert_eq!(res.table_url("events").as_str(), "https://abc.backend.example/rest/v1/events");
        assert_eq!(res.row_url("events", &EventId::from(5)).as_str(), "https://abc.backend.example/rest/v1/events?id=eq.5");

        let nested = Resource::new(Url::parse("http://localhost:1234/project/?x=1").unwrap(), "key".to_string());
        assert_eq!(nested.table_url("events").as_str(), "http://localhost:1234/project/rest/v1/events");
    }
}
