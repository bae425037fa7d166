//! HTTP transport for the upstream entity-data endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::config::CrawlConfig;
use crate::crawl::FetchEntity;
use crate::error::Result;

/// reqwest-backed entity fetcher over the `{base}/{id}.json` URL template.
///
/// The client is built once with a fixed timeout and an identifying
/// User-Agent header; base URL, timeout and header all come from
/// configuration rather than ambient state.
pub struct EntityClient {
    client: Client,
    base_url: String,
}

impl EntityClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &CrawlConfig) -> Result<Self> {
        Self::new(
            &config.entity_data_base_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn entity_url(&self, id: &str) -> String {
        format!("{}/{}.json", self.base_url, id)
    }
}

impl FetchEntity for EntityClient {
    /// Non-2xx responses and malformed JSON bodies both surface as errors;
    /// the crawler treats every error the same way (skip the id).
    async fn fetch(&self, id: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.entity_url(id))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_url_template() {
        let client = EntityClient::new(
            "https://www.wikidata.org/wiki/Special:EntityData",
            "wikigraph-test/0.1",
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            client.entity_url("Q42"),
            "https://www.wikidata.org/wiki/Special:EntityData/Q42.json"
        );
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let client = EntityClient::new(
            "https://example.org/data/",
            "wikigraph-test/0.1",
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(client.entity_url("Q1"), "https://example.org/data/Q1.json");
    }
}
