use crate::{
    config::{AlbumConfig, DEFAULT_QUOTE_API_BASE},
    error::Result,
    net::{HttpClient, Transport, json, query::build_url},
    source::QuoteSource,
    types::{AnimeQuote, QueryParams},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Quote source for the Animechan API.
///
/// Reads `GET {base}/quotes/random`, whose payload nests the fields:
/// `{ data: { content, anime: { name }, character: { name } } }`.
pub struct AnimechanSource {
    client: HttpClient,
    api_base: String,
}

impl AnimechanSource {
    pub fn new() -> Self {
        Self::from_parts(&AlbumConfig::default(), DEFAULT_QUOTE_API_BASE.to_string())
    }

    pub fn with_config(config: &AlbumConfig) -> Result<Self> {
        Ok(Self::from_parts(config, config.quote_api_url()?.to_string()))
    }

    fn from_parts(config: &AlbumConfig, api_base: String) -> Self {
        Self {
            // The free tier is tightly limited; one request per second is plenty.
            client: HttpClient::new("animechan")
                .with_rate_limit(1000)
                .with_retry_policy(config.retry.clone()),
            api_base,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.client = self.client.with_transport(transport);
        self
    }

    fn parse_quote(payload: &Value) -> Result<AnimeQuote> {
        Ok(AnimeQuote {
            content: json::extract_as(payload, "data.content")?,
            anime: json::extract_as(payload, "data.anime.name")?,
            character: json::extract_as(payload, "data.character.name")?,
        })
    }
}

impl Default for AnimechanSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for AnimechanSource {
    async fn random_quote(&self) -> Result<AnimeQuote> {
        let url = build_url(&self.api_base, "quotes/random", &QueryParams::default())?;
        let payload: Value = self.client.get_json(&url).await?;
        Self::parse_quote(&payload)
    }
}
