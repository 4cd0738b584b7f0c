//! HTTP client for IMDb pages

use crate::error::{ImdbError, Result};
use crate::ids::IdKind;
use crate::parse::{Credit, PageParser};
use costar_core::NodeId;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("costar/", env!("CARGO_PKG_VERSION"));

/// Title pages fetched at once when collecting descriptions
const DESCRIPTION_CONCURRENCY: usize = 4;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ImdbConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ImdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ImdbConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Plot summary of one movie in an actor's filmography
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDescription {
    pub id: NodeId,
    pub title: String,
    pub description: String,
}

/// Fetches and reads IMDb person and title pages
#[derive(Debug, Clone)]
pub struct ImdbClient {
    http: reqwest::Client,
    base_url: Url,
    parser: Arc<PageParser>,
}

impl ImdbClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ImdbConfig::default())
    }

    pub fn with_config(config: ImdbConfig) -> Result<Self> {
        // Page links are joined onto the base, which must end in a slash
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            parser: Arc::new(PageParser::new()?),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Page URL of a person or title id
    pub fn page_url(&self, id: &NodeId) -> Result<Url> {
        let kind = IdKind::of(id.as_str()).ok_or_else(|| ImdbError::InvalidId(id.to_string()))?;
        Ok(self.base_url.join(&format!("{}/{}/", kind.path(), id))?)
    }

    async fn fetch_page(&self, url: Url) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImdbError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Movies an actor appeared in, in filmography order
    pub async fn movies_of_actor(
        &self,
        actor: &NodeId,
        limit: Option<usize>,
    ) -> Result<Vec<Credit>> {
        let html = self.fetch_page(self.page_url(actor)?).await?;
        self.parser.movies(&html, limit)
    }

    /// Cast of a movie, in credits order
    pub async fn actors_of_movie(
        &self,
        movie: &NodeId,
        limit: Option<usize>,
    ) -> Result<Vec<Credit>> {
        let movie_url = self.page_url(movie)?;
        let html = self.fetch_page(movie_url.clone()).await?;

        let cast_url = match self.parser.full_cast_href(&html) {
            Some(href) => self.base_url.join(&href)?,
            None => {
                tracing::debug!("No full cast link on {}, using fullcredits", movie_url);
                movie_url.join("fullcredits")?
            }
        };

        let html = self.fetch_page(cast_url).await?;
        self.parser.cast(&html, limit)
    }

    /// Description of every movie an actor appeared in
    ///
    /// Movies whose page carries no plot summary are skipped.
    pub async fn movie_descriptions(&self, actor: &NodeId) -> Result<Vec<MovieDescription>> {
        let movies = self.movies_of_actor(actor, None).await?;

        let pages: Vec<(Credit, String)> = stream::iter(movies)
            .map(|movie| async move {
                tracing::info!("Getting description of {}", movie.name);
                let html = self.fetch_page(self.page_url(&movie.id)?).await?;
                Ok::<_, ImdbError>((movie, html))
            })
            .buffered(DESCRIPTION_CONCURRENCY)
            .try_collect()
            .await?;

        let descriptions = pages
            .into_iter()
            .filter_map(|(movie, html)| match self.parser.description(&html) {
                Some(description) => Some(MovieDescription {
                    id: movie.id,
                    title: movie.name,
                    description,
                }),
                None => {
                    tracing::warn!("Can't find description for {}", movie.name);
                    None
                }
            })
            .collect();

        Ok(descriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{serve, ACTOR_PAGE, CAST_PAGE, MOVIE_PAGE};

    fn client(base_url: &str) -> ImdbClient {
        ImdbClient::with_config(ImdbConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_page_urls() {
        let client = client("https://www.imdb.com");

        assert_eq!(
            client.page_url(&"nm0000158".into()).unwrap().as_str(),
            "https://www.imdb.com/name/nm0000158/"
        );
        assert_eq!(
            client.page_url(&"tt0111161".into()).unwrap().as_str(),
            "https://www.imdb.com/title/tt0111161/"
        );
        assert!(matches!(
            client.page_url(&"ch0000001".into()),
            Err(ImdbError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_movies_of_actor() {
        let server = serve(&[("/name/nm1/", 200, ACTOR_PAGE)]).await;
        let client = client(&server.uri());

        let movies = client.movies_of_actor(&"nm1".into(), Some(2)).await.unwrap();
        let ids: Vec<&str> = movies.iter().map(|m| m.id.as_str()).collect();

        assert_eq!(ids, vec!["tt1", "tt2"]);
    }

    #[tokio::test]
    async fn test_actors_of_movie_follows_cast_link() {
        let server = serve(&[
            ("/title/tt1/", 200, MOVIE_PAGE),
            ("/title/tt1/fullcredits/", 200, CAST_PAGE),
        ])
        .await;
        let client = client(&server.uri());

        let cast = client.actors_of_movie(&"tt1".into(), None).await.unwrap();

        assert_eq!(cast.len(), 3);
        assert_eq!(cast[0].id, NodeId::from("nm1"));
    }

    #[tokio::test]
    async fn test_actors_of_movie_falls_back_to_fullcredits() {
        let server = serve(&[
            ("/title/tt2/", 200, "<html><body><h1>No links</h1></body></html>"),
            ("/title/tt2/fullcredits", 200, CAST_PAGE),
        ])
        .await;
        let client = client(&server.uri());

        let cast = client.actors_of_movie(&"tt2".into(), Some(2)).await.unwrap();

        assert_eq!(cast.len(), 2);
    }

    #[tokio::test]
    async fn test_status_errors() {
        let server = serve(&[("/name/nm2/", 503, "busy")]).await;
        let client = client(&server.uri());

        let missing = client.movies_of_actor(&"nm404".into(), None).await.unwrap_err();
        assert!(missing.is_not_found());

        let busy = client.movies_of_actor(&"nm2".into(), None).await.unwrap_err();
        assert!(matches!(busy, ImdbError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_movie_descriptions_skip_missing_plots() {
        let server = serve(&[
            ("/name/nm1/", 200, ACTOR_PAGE),
            ("/title/tt1/", 200, MOVIE_PAGE),
            ("/title/tt2/", 200, CAST_PAGE),
            ("/title/tt6/", 200, MOVIE_PAGE),
        ])
        .await;
        let client = client(&server.uri());

        let descriptions = client.movie_descriptions(&"nm1".into()).await.unwrap();
        let titles: Vec<&str> = descriptions.iter().map(|d| d.title.as_str()).collect();

        assert_eq!(titles, vec!["First Movie", "Early Movie"]);
        assert_eq!(descriptions[0].description, "Two strangers meet on a train.");
    }
}
