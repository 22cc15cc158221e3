use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::{catalog_error, validation_error, ApiResult};
use crate::{
    models::{genre, movie::find_trailer, Movie, MoviePage, Video},
    movie_client::{ImageSize, MovieCatalogClient},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/upcoming", get(upcoming_movies))
        .route("/movies/search", get(search_movies))
        .route("/movies/{movie_id}", get(movie_details))
        .route("/genres/{genre}/movies", get(genre_movies))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 500))]
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = 200))]
    pub query: String,
    #[validate(range(min = 1, max = 500))]
    pub page: Option<u32>,
}

/// Карточка фильма для списков.
#[derive(Debug, Serialize)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub poster_url: Option<String>,
    pub genres: Vec<&'static str>,
}

fn to_card(client: &MovieCatalogClient, movie: Movie) -> MovieCard {
    MovieCard {
        poster_url: movie
            .poster_path
            .as_deref()
            .map(|p| client.image_url(p, ImageSize::W500)),
        genres: movie.genre_ids.iter().map(|id| genre::genre_name(*id)).collect(),
        id: movie.id,
        title: movie.title,
        overview: movie.overview,
        release_date: movie.release_date,
        vote_average: movie.vote_average,
    }
}

fn page_response(client: &MovieCatalogClient, page: MoviePage) -> serde_json::Value {
    let has_more = page.has_more();
    let movies: Vec<MovieCard> = page
        .results
        .into_iter()
        .map(|m| to_card(client, m))
        .collect();
    json!({
        "success": true,
        "page": page.page,
        "total_pages": page.total_pages,
        "has_more": has_more,
        "count": movies.len(),
        "movies": movies,
    })
}

// GET /api/movies/upcoming
async fn upcoming_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    params.validate().map_err(validation_error)?;

    let page = state
        .movies
        .upcoming(params.page.unwrap_or(1))
        .await
        .map_err(catalog_error)?;

    Ok((StatusCode::OK, Json(page_response(&state.movies, page))))
}

// GET /api/movies/search
async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    params.validate().map_err(validation_error)?;

    let page = state
        .movies
        .search(&params.query, params.page.unwrap_or(1))
        .await
        .map_err(catalog_error)?;

    Ok((StatusCode::OK, Json(page_response(&state.movies, page))))
}

#[derive(Debug, Serialize)]
struct TrailerResponse {
    key: String,
    name: String,
    thumbnail_url: String,
}

impl From<&Video> for TrailerResponse {
    fn from(video: &Video) -> Self {
        TrailerResponse {
            key: video.key.clone(),
            name: video.name.clone(),
            thumbnail_url: MovieCatalogClient::youtube_thumbnail(&video.key),
        }
    }
}

// GET /api/movies/{movie_id}
async fn movie_details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    // Детали и видео грузим параллельно
    let (details, videos) = futures::future::try_join(
        state.movies.details(movie_id),
        state.movies.videos(movie_id),
    )
    .await
    .map_err(catalog_error)?;

    let trailer = find_trailer(&videos.results).map(TrailerResponse::from);
    let poster_url = details
        .poster_path
        .as_deref()
        .map(|p| state.movies.image_url(p, ImageSize::W500));
    let backdrop_url = details
        .backdrop_path
        .as_deref()
        .map(|p| state.movies.image_url(p, ImageSize::W780));

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "movie": details,
            "poster_url": poster_url,
            "backdrop_url": backdrop_url,
            "trailer": trailer,
        })),
    ))
}

// GET /api/genres/{genre}/movies
async fn genre_movies(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let page = state.movies.genre_movies(&label).await.map_err(catalog_error)?;

    let mut body = page_response(&state.movies, page);
    body["genre"] = json!(label);
    Ok((StatusCode::OK, Json(body)))
}
