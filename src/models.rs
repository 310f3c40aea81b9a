use std::{fmt, str::FromStr};

use jiff::civil::{Date, date};
use sea_orm::{FromQueryResult, sea_query::Order};
use serde::Deserialize;

use crate::entities::{country, genre, martial_art, movie};

/// First decade with its own bucket; anything earlier falls under `pre-1950`.
pub const FIRST_DECADE: i16 = 1950;

const PRE_1950: &str = "pre-1950";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decade {
    Pre1950,
    /// Decade start year, e.g. `1980` for the 1980s.
    Starting(i16),
}

#[derive(Debug, thiserror::Error)]
#[error("invalid decade token: {0:?}")]
pub struct InvalidDecade(String);

impl Decade {
    /// Inclusive release date range covered by this decade. The lower bound is
    /// open for `pre-1950`.
    pub fn bounds(self) -> (Option<Date>, Date) {
        match self {
            Decade::Pre1950 => (None, date(FIRST_DECADE, 1, 1)),
            Decade::Starting(start) => (Some(date(start, 1, 1)), date(start + 9, 12, 31)),
        }
    }

    pub fn label(self) -> String {
        match self {
            Decade::Pre1950 => "Pre-1950".to_string(),
            Decade::Starting(start) => format!("{start}s"),
        }
    }

    /// `pre-1950` followed by every decade up to the one containing `current_year`.
    pub fn options(current_year: i16) -> Vec<Decade> {
        let last = current_year - current_year.rem_euclid(10);
        std::iter::once(Decade::Pre1950)
            .chain((FIRST_DECADE..=last).step_by(10).map(Decade::Starting))
            .collect()
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decade::Pre1950 => f.write_str(PRE_1950),
            Decade::Starting(start) => write!(f, "{start}"),
        }
    }
}

impl FromStr for Decade {
    type Err = InvalidDecade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PRE_1950 {
            return Ok(Decade::Pre1950);
        }
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDecade(s.to_string()));
        }
        let start: i16 = s.parse().map_err(|_| InvalidDecade(s.to_string()))?;
        if start < FIRST_DECADE || start % 10 != 0 {
            return Err(InvalidDecade(s.to_string()));
        }
        Ok(Decade::Starting(start))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOption {
    ReleaseAsc,
    #[default]
    ReleaseDesc,
    TitleAsc,
    TitleDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] =
        [SortOption::ReleaseDesc, SortOption::ReleaseAsc, SortOption::TitleAsc, SortOption::TitleDesc];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "release-asc" => Some(SortOption::ReleaseAsc),
            "release-desc" => Some(SortOption::ReleaseDesc),
            "title-asc" => Some(SortOption::TitleAsc),
            "title-desc" => Some(SortOption::TitleDesc),
            _ => None,
        }
    }

    /// Unknown or missing keys resolve to `release-desc`. Both the catalog and
    /// the templates go through here so they agree on the fallback.
    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(Self::from_key).unwrap_or_default()
    }

    pub fn key(self) -> &'static str {
        match self {
            SortOption::ReleaseAsc => "release-asc",
            SortOption::ReleaseDesc => "release-desc",
            SortOption::TitleAsc => "title-asc",
            SortOption::TitleDesc => "title-desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOption::ReleaseAsc => "Oldest",
            SortOption::ReleaseDesc => "Newest",
            SortOption::TitleAsc => "Title (A-Z)",
            SortOption::TitleDesc => "Title (Z-A)",
        }
    }

    pub fn order(self) -> (movie::Column, Order) {
        match self {
            SortOption::ReleaseAsc => (movie::Column::ReleaseDate, Order::Asc),
            SortOption::ReleaseDesc => (movie::Column::ReleaseDate, Order::Desc),
            SortOption::TitleAsc => (movie::Column::Title, Order::Asc),
            SortOption::TitleDesc => (movie::Column::Title, Order::Desc),
        }
    }
}

/// Validated movie listing query. `sort` stays the raw client value and is
/// resolved with [`SortOption::resolve`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MovieQuery {
    pub primary_martial_art: Option<String>,
    pub martial_art: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub year: Option<Decade>,
    pub sort: Option<String>,
}

/// Raw listing parameters as they arrive in the query string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieParams {
    pub sort: Option<String>,
    #[serde(rename = "martial-art")]
    pub martial_art: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub year: Option<String>,
    pub page: Option<String>,
}

impl MovieParams {
    pub fn to_query(&self) -> MovieQuery {
        let year = non_empty(&self.year).and_then(|raw| match raw.parse::<Decade>() {
            Ok(decade) => Some(decade),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring year filter");
                None
            }
        });

        MovieQuery {
            primary_martial_art: None,
            martial_art: non_empty(&self.martial_art).map(str::to_string),
            genre: non_empty(&self.genre).map(str::to_string),
            country: non_empty(&self.country).map(str::to_string),
            year,
            sort: non_empty(&self.sort).map(str::to_string),
        }
    }

    /// 1-based page number; anything unparseable or below 1 is page 1.
    pub fn page(&self) -> u64 {
        non_empty(&self.page).and_then(|p| p.parse::<u64>().ok()).filter(|&p| p >= 1).unwrap_or(1)
    }

    pub fn sort(&self) -> SortOption {
        SortOption::resolve(non_empty(&self.sort))
    }

    /// Non-empty parameters other than `page`, in a stable order for link building.
    pub fn retained(&self) -> Vec<(&'static str, &str)> {
        [
            ("martial-art", &self.martial_art),
            ("genre", &self.genre),
            ("country", &self.country),
            ("year", &self.year),
            ("sort", &self.sort),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_empty(value).map(|v| (key, v)))
        .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieSummary {
    pub movie: movie::Model,
    pub primary_martial_art: martial_art::Model,
    pub genres: Vec<genre::Model>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoviePage {
    pub movies: Vec<MovieSummary>,
    pub total_pages: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieDetail {
    pub movie: movie::Model,
    pub primary_martial_art: martial_art::Model,
    pub martial_arts: Vec<martial_art::Model>,
    pub genres: Vec<genre::Model>,
    pub countries: Vec<country::Model>,
}

impl MovieDetail {
    /// Every martial art on the movie except the primary one.
    pub fn secondary_martial_arts(&self) -> impl Iterator<Item = &martial_art::Model> {
        self.martial_arts.iter().filter(|art| art.id != self.primary_martial_art.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct MovieSlug {
    pub slug: String,
    pub updated_at: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct MartialArtName {
    pub name: String,
}
