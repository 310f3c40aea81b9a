use std::sync::Arc;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, LoaderTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Order, Query},
};
use tracing::{debug, error};

use crate::{
    entities::{country, genre, martial_art, movie, movie_country, movie_genre},
    error::DataError,
    filter::MovieFilters,
    models::{
        MartialArtName, MovieDetail, MoviePage, MovieQuery, MovieSlug, MovieSummary, SortOption,
    },
};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

const MAX_BOUND: u64 = i64::MAX as u64;

/// Read-only access to the movie catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    db: Arc<DatabaseConnection>,
}

impl Catalog {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// One page of movies matching `query`, plus the page count for the same
    /// filter. Pages past the end come back empty with the real page count.
    pub async fn fetch_movies(
        &self,
        query: &MovieQuery,
        page: u64,
        page_size: u64,
    ) -> Result<MoviePage, DataError> {
        // sqlx binds LIMIT and OFFSET as i64.
        let page_size = page_size.clamp(1, MAX_BOUND);
        let skip = page.saturating_sub(1).saturating_mul(page_size).min(MAX_BOUND);
        let sort = SortOption::resolve(query.sort.as_deref());
        let filters = MovieFilters::compile(query);
        let condition = filters.condition();

        debug!(
            clauses = filters.clauses().len(),
            sort = sort.key(),
            page,
            skip,
            page_size,
            "fetching movies"
        );

        let (column, order) = sort.order();
        let rows = movie::Entity::find()
            .find_also_linked(movie::PrimaryMartialArtLink)
            .filter(condition.clone())
            .order_by(column, order)
            .order_by(movie::Column::Id, Order::Asc)
            .offset(skip)
            .limit(page_size)
            .all(self.db.as_ref());
        let count = movie::Entity::find().filter(condition).count(self.db.as_ref());

        let (rows, total) = futures::try_join!(rows, count).map_err(log_failure(DataError::Movies))?;
        let movies = self.summarize(rows).await.map_err(log_failure(DataError::Movies))?;
        let total_pages = total.div_ceil(page_size);

        debug!(returned = movies.len(), total, total_pages, "fetched movies");

        Ok(MoviePage { movies, total_pages })
    }

    async fn summarize(
        &self,
        rows: Vec<(movie::Model, Option<martial_art::Model>)>,
    ) -> Result<Vec<MovieSummary>, DbErr> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let (movies, primaries): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let genres = movies
            .load_many_to_many(
                genre::Entity::find(),
                movie_genre::Entity,
                self.db.as_ref(),
            )
            .await?;

        movies
            .into_iter()
            .zip(primaries)
            .zip(genres)
            .map(|((movie, primary), mut genres)| {
                genres.sort_by(|a, b| a.name.cmp(&b.name));
                let primary_martial_art = primary.ok_or_else(|| missing_primary(&movie))?;
                Ok::<_, DbErr>(MovieSummary { movie, primary_martial_art, genres })
            })
            .collect()
    }

    /// Movie with all of its relations, or `None` when no movie has `slug`.
    pub async fn fetch_movie(&self, slug: &str) -> Result<Option<MovieDetail>, DataError> {
        let found = movie::Entity::find()
            .filter(movie::Column::Slug.eq(slug))
            .find_also_linked(movie::PrimaryMartialArtLink)
            .one(self.db.as_ref())
            .await
            .map_err(log_failure(DataError::Movie))?;

        let Some((movie, primary)) = found else {
            debug!(slug, "movie not found");
            return Ok(None);
        };

        let primary_martial_art = primary
            .ok_or_else(|| missing_primary(&movie))
            .map_err(log_failure(DataError::Movie))?;
        let (martial_arts, genres, countries) = futures::try_join!(
            movie.find_related(martial_art::Entity).order_by_asc(martial_art::Column::Name).all(self.db.as_ref()),
            movie.find_related(genre::Entity).order_by_asc(genre::Column::Name).all(self.db.as_ref()),
            movie.find_related(country::Entity).order_by_asc(country::Column::Name).all(self.db.as_ref()),
        )
        .map_err(log_failure(DataError::Movie))?;

        Ok(Some(MovieDetail { movie, primary_martial_art, martial_arts, genres, countries }))
    }

    /// Every movie slug with its last update, for link generation.
    pub async fn fetch_all_movie_slugs(&self) -> Result<Vec<MovieSlug>, DataError> {
        movie::Entity::find()
            .select_only()
            .columns([movie::Column::Slug, movie::Column::UpdatedAt])
            .order_by_asc(movie::Column::Id)
            .into_model::<MovieSlug>()
            .all(self.db.as_ref())
            .await
            .map_err(log_failure(DataError::MovieSlugs))
    }

    pub async fn fetch_martial_arts(&self) -> Result<Vec<martial_art::Model>, DataError> {
        martial_art::Entity::find()
            .order_by_asc(martial_art::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(log_failure(DataError::MartialArts))
    }

    pub async fn fetch_martial_art(&self, slug: &str) -> Result<Option<MartialArtName>, DataError> {
        martial_art::Entity::find()
            .select_only()
            .column(martial_art::Column::Name)
            .filter(martial_art::Column::Slug.eq(slug))
            .into_model::<MartialArtName>()
            .one(self.db.as_ref())
            .await
            .map_err(log_failure(DataError::MartialArt))
    }

    pub async fn fetch_genres(&self) -> Result<Vec<genre::Model>, DataError> {
        genre::Entity::find()
            .order_by_asc(genre::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(log_failure(DataError::Genres))
    }

    /// Countries with at least one movie.
    pub async fn fetch_countries(&self) -> Result<Vec<country::Model>, DataError> {
        country::Entity::find()
            .filter(
                country::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_country::Column::CountryId)
                        .from(movie_country::Entity)
                        .to_owned(),
                ),
            )
            .order_by_asc(country::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(log_failure(DataError::Countries))
    }
}

fn log_failure(wrap: fn(DbErr) -> DataError) -> impl FnOnce(DbErr) -> DataError {
    move |cause| {
        let err = wrap(cause);
        error!(error = %err, cause = %err.cause(), "catalog query failed");
        err
    }
}

fn missing_primary(movie: &movie::Model) -> DbErr {
    DbErr::RecordNotFound(format!(
        "primary martial art {} of movie {}",
        movie.primary_martial_art_id, movie.slug
    ))
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::{fixtures, models::Decade};

    fn titles(page: &MoviePage) -> Vec<&str> {
        page.movies.iter().map(|m| m.movie.title.as_str()).collect()
    }

    fn failing_catalog() -> Catalog {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([
                DbErr::Custom("DB connection failed".into()),
                DbErr::Custom("DB connection failed".into()),
            ])
            .into_connection();
        Catalog::new(Arc::new(db))
    }

    #[tokio::test]
    async fn default_query_lists_newest_first() {
        let catalog = fixtures::catalog().await;

        let page = catalog.fetch_movies(&MovieQuery::default(), 1, DEFAULT_PAGE_SIZE).await.unwrap();

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.movies.len(), 10);
        assert_eq!(
            titles(&page),
            [
                "Ip Man",
                "Kung Fu Hustle",
                "Ong-Bak",
                "The Karate Kid",
                "Drunken Master",
                "Rocky",
                "Enter the Dragon",
                "Boundary Bout",
                "Sanshiro Sugata",
                "Undated Fighter",
            ]
        );
    }

    #[tokio::test]
    async fn summaries_carry_primary_martial_art_and_genres() {
        let catalog = fixtures::catalog().await;

        let page = catalog.fetch_movies(&MovieQuery::default(), 1, 1).await.unwrap();
        let ip_man = &page.movies[0];

        assert_eq!(ip_man.movie.slug, "ip-man-2008");
        assert_eq!(ip_man.primary_martial_art.slug, "kung-fu");
        let genres: Vec<_> = ip_man.genres.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(genres, ["action", "drama"]);
    }

    #[tokio::test]
    async fn pages_are_offset_and_counted() {
        let catalog = fixtures::catalog().await;
        let query = MovieQuery::default();

        let second = catalog.fetch_movies(&query, 2, 3).await.unwrap();
        assert_eq!(second.total_pages, 4);
        assert_eq!(titles(&second), ["The Karate Kid", "Drunken Master", "Rocky"]);

        let last = catalog.fetch_movies(&query, 4, 3).await.unwrap();
        assert_eq!(titles(&last), ["Undated Fighter"]);

        let past_end = catalog.fetch_movies(&query, 5, 3).await.unwrap();
        assert!(past_end.movies.is_empty());
        assert_eq!(past_end.total_pages, 4);
    }

    #[tokio::test]
    async fn page_zero_and_size_zero_are_clamped() {
        let catalog = fixtures::catalog().await;

        let page = catalog.fetch_movies(&MovieQuery::default(), 0, 0).await.unwrap();
        assert_eq!(titles(&page), ["Ip Man"]);
        assert_eq!(page.total_pages, 10);
    }

    #[tokio::test]
    async fn huge_pages_stay_within_bind_range() {
        let catalog = fixtures::catalog().await;

        let far = catalog.fetch_movies(&MovieQuery::default(), u64::MAX, DEFAULT_PAGE_SIZE).await.unwrap();
        assert!(far.movies.is_empty());
        assert_eq!(far.total_pages, 1);

        let everything = catalog.fetch_movies(&MovieQuery::default(), 1, u64::MAX).await.unwrap();
        assert_eq!(everything.movies.len(), 10);
        assert_eq!(everything.total_pages, 1);
    }

    #[tokio::test]
    async fn summary_genres_match_detail_order() {
        let catalog = fixtures::catalog().await;

        let page = catalog.fetch_movies(&MovieQuery::default(), 1, DEFAULT_PAGE_SIZE).await.unwrap();
        for summary in &page.movies {
            let detail = catalog.fetch_movie(&summary.movie.slug).await.unwrap().unwrap();
            assert_eq!(summary.genres, detail.genres, "{}", summary.movie.slug);
        }
    }

    #[tokio::test]
    async fn total_pages_is_ceiling_of_count() {
        let catalog = fixtures::catalog().await;

        for page_size in 1..=11 {
            let page = catalog.fetch_movies(&MovieQuery::default(), 1, page_size).await.unwrap();
            assert_eq!(page.total_pages, 10_u64.div_ceil(page_size));
            assert!(page.movies.len() as u64 <= page_size);
        }
    }

    #[tokio::test]
    async fn sorts_by_title_and_release() {
        let catalog = fixtures::catalog().await;

        let by_title = MovieQuery { sort: Some("title-asc".into()), ..Default::default() };
        let page = catalog.fetch_movies(&by_title, 1, 3).await.unwrap();
        assert_eq!(titles(&page), ["Boundary Bout", "Drunken Master", "Enter the Dragon"]);

        let by_title_desc = MovieQuery { sort: Some("title-desc".into()), ..Default::default() };
        let page = catalog.fetch_movies(&by_title_desc, 1, 2).await.unwrap();
        assert_eq!(titles(&page), ["Undated Fighter", "The Karate Kid"]);

        // SQLite sorts NULL release dates first when ascending.
        let oldest = MovieQuery { sort: Some("release-asc".into()), ..Default::default() };
        let page = catalog.fetch_movies(&oldest, 1, 3).await.unwrap();
        assert_eq!(titles(&page), ["Undated Fighter", "Sanshiro Sugata", "Boundary Bout"]);

        let unknown = MovieQuery { sort: Some("popularity".into()), ..Default::default() };
        let page = catalog.fetch_movies(&unknown, 1, 1).await.unwrap();
        assert_eq!(titles(&page), ["Ip Man"]);
    }

    #[tokio::test]
    async fn filters_by_primary_and_any_martial_art() {
        let catalog = fixtures::catalog().await;
        let sorted = |mut t: Vec<&str>| {
            t.sort();
            t.into_iter().map(str::to_string).collect::<Vec<_>>()
        };

        let primary = MovieQuery { primary_martial_art: Some("karate".into()), ..Default::default() };
        let page = catalog.fetch_movies(&primary, 1, 20).await.unwrap();
        assert_eq!(sorted(titles(&page)), ["The Karate Kid", "Undated Fighter"]);

        let any = MovieQuery { martial_art: Some("karate".into()), ..Default::default() };
        let page = catalog.fetch_movies(&any, 1, 20).await.unwrap();
        assert_eq!(sorted(titles(&page)), ["Enter the Dragon", "The Karate Kid", "Undated Fighter"]);
    }

    #[tokio::test]
    async fn combined_filters_are_conjunctive() {
        let catalog = fixtures::catalog().await;

        let comedy = MovieQuery { genre: Some("comedy".into()), ..Default::default() };
        let page = catalog.fetch_movies(&comedy, 1, 20).await.unwrap();
        assert_eq!(titles(&page), ["Kung Fu Hustle", "Drunken Master"]);

        let comedy_in_china = MovieQuery { country: Some("CN".into()), ..comedy };
        let page = catalog.fetch_movies(&comedy_in_china, 1, 20).await.unwrap();
        assert_eq!(titles(&page), ["Kung Fu Hustle"]);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn filters_by_decade() {
        let catalog = fixtures::catalog().await;

        let eighties = MovieQuery { year: Some(Decade::Starting(1980)), ..Default::default() };
        let page = catalog.fetch_movies(&eighties, 1, 20).await.unwrap();
        assert_eq!(titles(&page), ["The Karate Kid"]);

        let seventies = MovieQuery { year: Some(Decade::Starting(1970)), ..Default::default() };
        let page = catalog.fetch_movies(&seventies, 1, 20).await.unwrap();
        assert_eq!(titles(&page), ["Drunken Master", "Rocky", "Enter the Dragon"]);

        let fifties = MovieQuery { year: Some(Decade::Starting(1950)), ..Default::default() };
        let page = catalog.fetch_movies(&fifties, 1, 20).await.unwrap();
        assert_eq!(titles(&page), ["Boundary Bout"]);

        // 1950-01-01 is on the boundary and belongs to both buckets.
        let early = MovieQuery { year: Some(Decade::Pre1950), ..Default::default() };
        let page = catalog.fetch_movies(&early, 1, 20).await.unwrap();
        assert_eq!(titles(&page), ["Boundary Bout", "Sanshiro Sugata"]);
    }

    #[tokio::test]
    async fn no_matches_means_no_pages() {
        let catalog = fixtures::catalog().await;

        let query = MovieQuery { country: Some("FR".into()), ..Default::default() };
        let page = catalog.fetch_movies(&query, 1, 20).await.unwrap();
        assert!(page.movies.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn fetch_movie_loads_relations() {
        let catalog = fixtures::catalog().await;

        let detail = catalog.fetch_movie("enter-the-dragon-1973").await.unwrap().unwrap();

        assert_eq!(detail.movie.title, "Enter the Dragon");
        assert_eq!(detail.primary_martial_art.name, "Kung Fu");
        let all: Vec<_> = detail.martial_arts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(all, ["Karate", "Kung Fu"]);
        let secondary: Vec<_> = detail.secondary_martial_arts().map(|a| a.name.as_str()).collect();
        assert_eq!(secondary, ["Karate"]);
        let countries: Vec<_> = detail.countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(countries, ["HK", "US"]);
        assert_eq!(detail.genres.len(), 1);
    }

    #[tokio::test]
    async fn fetch_movie_returns_none_for_unknown_slug() {
        let catalog = fixtures::catalog().await;
        assert!(catalog.fetch_movie("nonexistent-slug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn martial_art_name_lookup() {
        let catalog = fixtures::catalog().await;

        let found = catalog.fetch_martial_art("kung-fu").await.unwrap();
        assert_eq!(found, Some(MartialArtName { name: "Kung Fu".into() }));
        assert_eq!(catalog.fetch_martial_art("capoeira").await.unwrap(), None);
    }

    #[tokio::test]
    async fn reference_data_is_ordered_by_name() {
        let catalog = fixtures::catalog().await;

        let arts: Vec<_> =
            catalog.fetch_martial_arts().await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(arts, ["Boxing", "Judo", "Karate", "Kung Fu", "Muay Thai"]);

        let genres: Vec<_> =
            catalog.fetch_genres().await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(genres, ["Action", "Comedy", "Drama"]);
    }

    #[tokio::test]
    async fn countries_without_movies_are_hidden() {
        let catalog = fixtures::catalog().await;

        let codes: Vec<_> =
            catalog.fetch_countries().await.unwrap().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, ["CN", "HK", "JP", "TH", "US"]);
        assert!(!codes.contains(&"FR".to_string()));
    }

    #[tokio::test]
    async fn movie_slugs_cover_every_movie() {
        let catalog = fixtures::catalog().await;

        let slugs = catalog.fetch_all_movie_slugs().await.unwrap();
        assert_eq!(slugs.len(), 10);
        assert_eq!(
            slugs[0],
            MovieSlug { slug: "enter-the-dragon-1973".into(), updated_at: fixtures::UPDATED_AT }
        );
    }

    #[tokio::test]
    async fn store_failures_are_attributed_to_their_dataset() {
        let err = failing_catalog().fetch_movies(&MovieQuery::default(), 1, 20).await.unwrap_err();
        assert!(matches!(err, DataError::Movies(_)));
        assert_eq!(err.to_string(), "Failed to fetch movies data");

        let err = failing_catalog().fetch_movie("ip-man-2008").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch movie data");

        let err = failing_catalog().fetch_martial_arts().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch martial arts data");

        let err = failing_catalog().fetch_martial_art("karate").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch martial art data");

        let err = failing_catalog().fetch_genres().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch genres data");

        let err = failing_catalog().fetch_countries().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch countries data");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("Custom Error: DB connection failed")
        );

        let err = failing_catalog().fetch_all_movie_slugs().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch movie slugs data");
    }
}
