/// TMDB (The Movie Database) v3 provider
///
/// Serves both catalog search and the browse listings. Every request carries
/// the API key as the `api_key` query parameter.
///
/// API Flow:
/// 1. Search: /search/movie?query=.. → paged `results` array
/// 2. Listings: /trending/all/week, /movie/popular, ... → same `results` shape
/// 3. Detail: /movie/{id} and /movie/{id}/videos
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Entry, MovieDetails, Video},
    services::providers::{CatalogBrowse, CatalogSearch, Listing},
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET against the API and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    /// Fetches a paged `results` endpoint and decodes the entries
    async fn get_results(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Vec<Entry>> {
        let page: serde_json::Value = self.get_json(path, params).await?;
        parse_results(&page)
    }
}

/// Decodes the `results` array of a paged response
///
/// Entries that fail to decode (e.g. missing `id`) are skipped instead of
/// failing the whole page.
pub(crate) fn parse_results(page: &serde_json::Value) -> AppResult<Vec<Entry>> {
    let results = page["results"]
        .as_array()
        .ok_or_else(|| AppError::ExternalApi("Invalid TMDB response format".to_string()))?;

    Ok(results
        .iter()
        .filter_map(|result| serde_json::from_value::<Entry>(result.clone()).ok())
        .collect())
}

#[async_trait::async_trait]
impl CatalogSearch for TmdbProvider {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn search(&self, query: &str) -> AppResult<Vec<Entry>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let entries = self.get_results("/search/movie", &[("query", query)]).await?;

        tracing::info!(
            query = %query,
            results = entries.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[async_trait::async_trait]
impl CatalogBrowse for TmdbProvider {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn listing(&self, listing: Listing) -> AppResult<Vec<Entry>> {
        let entries = self.get_results(listing.path(), &[]).await?;

        tracing::info!(
            listing = %listing,
            results = entries.len(),
            provider = "tmdb",
            "Listing fetched"
        );

        Ok(entries)
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn movie_details(&self, id: &str) -> AppResult<MovieDetails> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }

    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn movie_videos(&self, id: &str) -> AppResult<Vec<Video>> {
        #[derive(serde::Deserialize)]
        struct VideosResponse {
            #[serde(default)]
            results: Vec<Video>,
        }

        let response: VideosResponse = self.get_json(&format!("/movie/{}/videos", id), &[]).await?;
        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_provider() -> TmdbProvider {
        TmdbProvider::new("test_key".to_string(), "http://test.local/3/".to_string())
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = create_test_provider();
        assert_eq!(
            provider.endpoint("/search/movie"),
            "http://test.local/3/search/movie"
        );
    }

    #[test]
    fn test_parse_results_skips_malformed() {
        let page = json!({
            "page": 1,
            "results": [
                { "id": 27205, "title": "Inception", "poster_path": "/a.jpg" },
                { "title": "No id" },
                { "id": 1396, "name": "Breaking Bad" }
            ],
            "total_pages": 1
        });

        let entries = parse_results(&page).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Inception");
        assert_eq!(entries[1].title, "Breaking Bad");
    }

    #[test]
    fn test_parse_results_missing_array() {
        let page = json!({ "status_message": "Invalid API key" });
        let err = parse_results(&page).unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[tokio::test]
    async fn test_blank_search_rejected_without_request() {
        let provider = create_test_provider();
        let err = tokio_test::assert_err!(provider.search("   ").await);
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
