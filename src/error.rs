use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;

/// A catalog query failed. Each variant names the dataset that could not be
/// loaded and keeps the store error as its source.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to fetch movies data")]
    Movies(#[source] DbErr),
    #[error("Failed to fetch movie data")]
    Movie(#[source] DbErr),
    #[error("Failed to fetch martial arts data")]
    MartialArts(#[source] DbErr),
    #[error("Failed to fetch martial art data")]
    MartialArt(#[source] DbErr),
    #[error("Failed to fetch genres data")]
    Genres(#[source] DbErr),
    #[error("Failed to fetch countries data")]
    Countries(#[source] DbErr),
    #[error("Failed to fetch movie slugs data")]
    MovieSlugs(#[source] DbErr),
}

impl DataError {
    pub fn cause(&self) -> &DbErr {
        match self {
            DataError::Movies(err)
            | DataError::Movie(err)
            | DataError::MartialArts(err)
            | DataError::MartialArt(err)
            | DataError::Genres(err)
            | DataError::Countries(err)
            | DataError::MovieSlugs(err) => err,
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Internal(anyhow::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Internal(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Html(crate::templates::not_found_page(&what))).into_response()
            }
            // The page only shows the top-level message; the cause chain was
            // already logged where the failure happened.
            AppError::Internal(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Html(crate::templates::error_page(err.to_string())))
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
