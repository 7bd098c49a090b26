use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Movie;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const NOT_AVAILABLE: &str = "N/A";

/// Why a lookup produced no movie.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not connect to the lookup service: {0}")]
    Connection(String),
    #[error("lookup service returned HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Service(String),
    #[error("unexpected lookup response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait MovieLookup: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Movie, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let user_agent = format!("movie-catalog/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to build OMDb HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// The lookup body as untyped JSON, for inspecting what the service sends.
    pub async fn fetch_raw(&self, query: &str) -> Result<Value, FetchError> {
        let text = self.get_text(query).await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Parse(format!("invalid JSON: {}", e)))
    }

    fn lookup_url(&self, query: &str) -> String {
        format!(
            "{}?apikey={}&t={}",
            self.base_url.trim_end_matches('?'),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        )
    }

    async fn get_text(&self, query: &str) -> Result<String, FetchError> {
        let res = self
            .client
            .get(self.lookup_url(query))
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.without_url().to_string()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.without_url().to_string()));
        if !status.is_success() {
            // OMDb rejects bad keys with a 401 that still carries an `Error` message.
            return Err(text
                .ok()
                .and_then(|body| service_message(&body))
                .map(FetchError::Service)
                .unwrap_or(FetchError::Status(status.as_u16())));
        }
        text
    }
}

#[async_trait]
impl MovieLookup for OmdbClient {
    async fn fetch(&self, query: &str) -> Result<Movie, FetchError> {
        info!("Looking up '{}' on OMDb", query);
        let text = self.get_text(query).await?;
        let result = parse_response(&text);
        match &result {
            Ok(movie) => debug!("OMDb matched '{}' ({})", movie.title, movie.year),
            Err(e) => warn!("OMDb lookup for '{}' failed: {}", query, e),
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Turn a lookup body into a `Movie`, normalizing year, rating and poster.
pub fn parse_response(text: &str) -> Result<Movie, FetchError> {
    let data: OmdbResponse = serde_json::from_str(text)
        .map_err(|e| FetchError::Parse(format!("invalid JSON: {}", e)))?;

    if data.response.as_deref() != Some("True") {
        return Err(FetchError::Service(
            data.error.unwrap_or_else(|| "Movie not found!".to_string()),
        ));
    }

    let title = data
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| FetchError::Parse("missing Title".to_string()))?;
    let year = parse_year(data.year.as_deref().unwrap_or_default())?;
    let rating = parse_rating(data.imdb_rating.as_deref())?;

    Ok(Movie {
        title,
        year,
        rating,
        poster: parse_poster(data.poster.as_deref()),
    })
}

fn service_message(body: &str) -> Option<String> {
    serde_json::from_str::<OmdbResponse>(body)
        .ok()?
        .error
        .filter(|msg| !msg.trim().is_empty())
}

/// First four characters of the service's year field ("2010", "2010–2015").
pub fn parse_year(raw: &str) -> Result<i32, FetchError> {
    let head: String = raw.trim().chars().take(4).collect();
    if head.chars().count() != 4 {
        return Err(FetchError::Parse(format!("malformed year '{}'", raw)));
    }
    head.parse()
        .map_err(|_| FetchError::Parse(format!("malformed year '{}'", raw)))
}

pub fn parse_rating(raw: Option<&str>) -> Result<f64, FetchError> {
    match raw.map(str::trim) {
        None | Some(NOT_AVAILABLE) => Ok(0.0),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| FetchError::Parse(format!("malformed rating '{}'", value))),
    }
}

pub fn parse_poster(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty() && *p != NOT_AVAILABLE)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_successful_lookup() {
        let body = r#"{"Title":"Inception","Year":"2010","imdbRating":"8.8",
            "Poster":"https://example.com/p.jpg","Response":"True"}"#;
        let movie = parse_response(body).unwrap();
        assert_eq!(
            movie,
            Movie::new("Inception", 2010, 8.8, Some("https://example.com/p.jpg".into()))
        );
    }

    #[test]
    fn missing_rating_and_poster_are_normalized() {
        let body = r#"{"Title":"Obscure","Year":"1971","imdbRating":"N/A",
            "Poster":"N/A","Response":"True"}"#;
        let movie = parse_response(body).unwrap();
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.poster, None);
    }

    #[test]
    fn negative_response_carries_service_message() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        match parse_response(body) {
            Err(FetchError::Service(msg)) => assert_eq!(msg, "Movie not found!"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn error_body_message_is_extracted() {
        let body = r#"{"Response":"False","Error":"Invalid API key!"}"#;
        assert_eq!(service_message(body).as_deref(), Some("Invalid API key!"));
        assert_eq!(service_message("Bad Gateway"), None);
        assert_eq!(service_message(r#"{"Response":"False"}"#), None);
    }

    #[test]
    fn year_uses_first_four_characters() {
        assert_eq!(parse_year("2010").unwrap(), 2010);
        assert_eq!(parse_year("2010–2015").unwrap(), 2010);
        assert!(matches!(parse_year("20"), Err(FetchError::Parse(_))));
        assert!(matches!(parse_year("N/A"), Err(FetchError::Parse(_))));
        assert!(matches!(parse_year(""), Err(FetchError::Parse(_))));
    }

    #[test]
    fn malformed_year_in_body_is_a_parse_error() {
        let body = r#"{"Title":"Odd","Year":"19x5","imdbRating":"5.0","Response":"True"}"#;
        assert!(matches!(parse_response(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn rating_parsing() {
        assert_eq!(parse_rating(Some("7.5")).unwrap(), 7.5);
        assert_eq!(parse_rating(Some("N/A")).unwrap(), 0.0);
        assert_eq!(parse_rating(None).unwrap(), 0.0);
        assert!(parse_rating(Some("great")).is_err());
    }

    #[test]
    fn lookup_url_encodes_query() {
        let client = OmdbClient::new("http://www.omdbapi.com/", "key").unwrap();
        assert_eq!(
            client.lookup_url("The Good, the Bad & the Ugly"),
            "http://www.omdbapi.com/?apikey=key&t=The%20Good%2C%20the%20Bad%20%26%20the%20Ugly"
        );
    }
}
