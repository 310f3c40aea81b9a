use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use tracing::debug;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Decade, MovieParams, MovieQuery},
    templates::{self, FilterOptions, Listing},
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let martial_arts = state.catalog.fetch_martial_arts().await?;
    Ok(Html(templates::home_page(&martial_arts)))
}

pub async fn movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MovieParams>,
) -> AppResult<Html<String>> {
    let query = params.to_query();
    let current_page = params.page();
    let catalog = &state.catalog;

    let (page, martial_arts, genres, countries) = futures::try_join!(
        catalog.fetch_movies(&query, current_page, state.config.page_size),
        catalog.fetch_martial_arts(),
        catalog.fetch_genres(),
        catalog.fetch_countries(),
    )?;

    let today: jiff::civil::Date = jiff::Zoned::now().into();
    let filters =
        FilterOptions { martial_arts, genres, countries, decades: Decade::options(today.year()) };

    Ok(Html(templates::listing_page(&Listing {
        title: "All Martial Arts Movies",
        heading: "All movies",
        path: "/movies",
        params: &params,
        current_page,
        page: &page,
        filters: Some(&filters),
        image_base_url: &state.config.image_base_url,
    })))
}

/// Movies whose primary martial art is `slug`. Only sorting and paging apply.
pub async fn martial_art(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<MovieParams>,
) -> AppResult<Html<String>> {
    let query = MovieQuery {
        primary_martial_art: Some(slug.clone()),
        sort: Some(params.sort().key().to_string()),
        ..Default::default()
    };
    let current_page = params.page();
    let params = MovieParams { sort: params.sort.clone(), page: params.page.clone(), ..Default::default() };

    let (name, page) = futures::try_join!(
        state.catalog.fetch_martial_art(&slug),
        state.catalog.fetch_movies(&query, current_page, state.config.page_size),
    )?;

    let Some(name) = name else {
        debug!(slug, "unknown martial art");
        return Err(AppError::NotFound("Martial art".to_string()));
    };

    let title = format!("{} Movies", name.name);
    let heading = format!("{} movies", name.name);
    let path = format!("/martial-arts/{slug}");

    Ok(Html(templates::listing_page(&Listing {
        title: &title,
        heading: &heading,
        path: &path,
        params: &params,
        current_page,
        page: &page,
        filters: None,
        image_base_url: &state.config.image_base_url,
    })))
}

pub async fn movie(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Html<String>> {
    let Some(detail) = state.catalog.fetch_movie(&slug).await? else {
        return Err(AppError::NotFound("Movie".to_string()));
    };
    Ok(Html(templates::movie_page(&detail, &state.config.image_base_url)))
}

pub async fn sitemap(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let (martial_arts, movies) = futures::try_join!(
        state.catalog.fetch_martial_arts(),
        state.catalog.fetch_all_movie_slugs(),
    )?;

    let body = templates::sitemap_xml(&state.config.site_url, &martial_arts, &movies);
    Ok(([(header::CONTENT_TYPE, "application/xml")], body))
}
