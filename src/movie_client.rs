use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::TmdbConfig;
use crate::models::{genre, MovieDetails, MoviePage, VideoList};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("movie service returned status {0}")]
    Status(u16),
    #[error("movie service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Размер постера/кадра для ссылок на изображения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    W200,
    W300,
    #[default]
    W500,
    W780,
    Original,
}

impl ImageSize {
    fn as_str(self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

/// Минимальная длина поискового запроса.
pub const MIN_SEARCH_LEN: usize = 2;

/// Клиент каталога фильмов (TMDB v3). Только чтение, без повторов.
#[derive(Clone)]
pub struct MovieCatalogClient {
    http_client: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
}

impl MovieCatalogClient {
    pub fn from_config(config: &TmdbConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Movie service request: {}", endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Movie service error for {}: {}", endpoint, status);
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn upcoming(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.fetch("/movie/upcoming", &[("page", page.to_string())])
            .await
    }

    pub async fn details(&self, movie_id: u64) -> Result<MovieDetails, CatalogError> {
        self.fetch(&format!("/movie/{}", movie_id), &[]).await
    }

    pub async fn videos(&self, movie_id: u64) -> Result<VideoList, CatalogError> {
        self.fetch(&format!("/movie/{}/videos", movie_id), &[]).await
    }

    /// Короткие запросы не отправляем, отдаём пустую страницу.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Ok(MoviePage::empty(page));
        }
        self.fetch(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    pub async fn discover(
        &self,
        genre_id: Option<u32>,
        page: Option<u32>,
    ) -> Result<MoviePage, CatalogError> {
        let mut query = Vec::new();
        if let Some(genre_id) = genre_id {
            query.push(("with_genres", genre_id.to_string()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        self.fetch("/discover/movie", &query).await
    }

    /// Фильмы жанра по ярлыку из раздела поиска (первые 10).
    pub async fn genre_movies(&self, label: &str) -> Result<MoviePage, CatalogError> {
        let mut page = self
            .discover(Some(genre::genre_id_for_label(label)), None)
            .await?;
        page.results.truncate(genre::GENRE_RESULTS_LIMIT);
        Ok(page)
    }

    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        format!("{}/{}{}", self.image_base_url, size.as_str(), path)
    }

    pub fn youtube_thumbnail(video_key: &str) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MovieCatalogClient {
        MovieCatalogClient::from_config(&TmdbConfig {
            api_key: "key".to_string(),
            base_url: "https://api.themoviedb.org/3/".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn image_urls_use_size_segment() {
        let c = client();
        assert_eq!(
            c.image_url("/abc.jpg", ImageSize::default()),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            c.image_url("/abc.jpg", ImageSize::Original),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn youtube_thumbnail_url() {
        assert_eq!(
            MovieCatalogClient::youtube_thumbnail("dQw4w9WgXcQ"),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[tokio::test]
    async fn short_search_is_not_sent() {
        // base_url указывает на реальный сервис, но запроса быть не должно
        let page = client().search(" a ", 1).await.unwrap();
        assert!(page.results.is_empty());
        assert!(!page.has_more());
    }
}
