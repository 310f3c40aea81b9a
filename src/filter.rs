use jiff::civil::Date;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait,
    sea_query::{Expr, Query, SimpleExpr},
};

use crate::{
    entities::{country, genre, martial_art, movie, movie_country, movie_genre, movie_martial_art},
    models::MovieQuery,
};

/// One predicate on the movie entity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MovieFilter {
    PrimaryMartialArt(String),
    MartialArt(String),
    Genre(String),
    Country(String),
    ReleasedOnOrBefore(Date),
    ReleasedBetween(Date, Date),
}

impl MovieFilter {
    pub fn to_expr(&self) -> SimpleExpr {
        match self {
            MovieFilter::PrimaryMartialArt(slug) => movie::Column::PrimaryMartialArtId.in_subquery(
                Query::select()
                    .column(martial_art::Column::Id)
                    .from(martial_art::Entity)
                    .and_where(martial_art::Column::Slug.eq(slug.as_str()))
                    .to_owned(),
            ),
            MovieFilter::MartialArt(slug) => linked_movie_ids::<movie_martial_art::Entity, martial_art::Entity>(
                movie_martial_art::Column::MovieId,
                movie_martial_art::Column::MartialArtId,
                martial_art::Column::Id,
                martial_art::Column::Slug,
                slug,
            ),
            MovieFilter::Genre(slug) => linked_movie_ids::<movie_genre::Entity, genre::Entity>(
                movie_genre::Column::MovieId,
                movie_genre::Column::GenreId,
                genre::Column::Id,
                genre::Column::Slug,
                slug,
            ),
            MovieFilter::Country(code) => linked_movie_ids::<movie_country::Entity, country::Entity>(
                movie_country::Column::MovieId,
                movie_country::Column::CountryId,
                country::Column::Id,
                country::Column::Code,
                code,
            ),
            MovieFilter::ReleasedOnOrBefore(end) => movie::Column::ReleaseDate.lte(end.to_string()),
            MovieFilter::ReleasedBetween(start, end) => {
                movie::Column::ReleaseDate.between(start.to_string(), end.to_string())
            }
        }
    }
}

/// `movie.id IN (SELECT join.movie_id FROM join INNER JOIN target ON ... WHERE target.key = value)`
fn linked_movie_ids<J, T>(
    join_movie: J::Column,
    join_target: J::Column,
    target_id: T::Column,
    target_key: T::Column,
    value: &str,
) -> SimpleExpr
where
    J: EntityTrait,
    T: EntityTrait,
{
    movie::Column::Id.in_subquery(
        Query::select()
            .column((J::default(), join_movie))
            .from(J::default())
            .inner_join(
                T::default(),
                Expr::col((T::default(), target_id)).equals((J::default(), join_target)),
            )
            .and_where(Expr::col((T::default(), target_key)).eq(value))
            .to_owned(),
    )
}

/// Ordered conjunction of movie predicates compiled from a [`MovieQuery`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MovieFilters(Vec<MovieFilter>);

impl MovieFilters {
    pub fn compile(query: &MovieQuery) -> Self {
        let mut clauses = Vec::new();

        if let Some(slug) = &query.primary_martial_art {
            clauses.push(MovieFilter::PrimaryMartialArt(slug.clone()));
        }
        if let Some(slug) = &query.martial_art {
            clauses.push(MovieFilter::MartialArt(slug.clone()));
        }
        if let Some(slug) = &query.genre {
            clauses.push(MovieFilter::Genre(slug.clone()));
        }
        if let Some(code) = &query.country {
            clauses.push(MovieFilter::Country(code.clone()));
        }
        if let Some(decade) = query.year {
            clauses.push(match decade.bounds() {
                (None, end) => MovieFilter::ReleasedOnOrBefore(end),
                (Some(start), end) => MovieFilter::ReleasedBetween(start, end),
            });
        }

        Self(clauses)
    }

    pub fn clauses(&self) -> &[MovieFilter] {
        &self.0
    }

    /// An empty set of clauses matches every movie.
    pub fn condition(&self) -> Condition {
        self.0.iter().fold(Condition::all(), |cond, clause| cond.add(clause.to_expr()))
    }
}
