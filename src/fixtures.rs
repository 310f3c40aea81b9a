//! Small seeded catalog for tests, on an in-memory SQLite database.

use std::sync::Arc;

use sea_orm::{ActiveValue::NotSet, EntityTrait, Set};

use crate::{
    catalog::Catalog,
    db,
    entities::{country, genre, martial_art, movie, movie_country, movie_genre, movie_martial_art},
};

pub const UPDATED_AT: i64 = 1_735_689_600;

const MARTIAL_ARTS: &[(i32, &str, &str)] = &[
    (1, "Karate", "karate"),
    (2, "Kung Fu", "kung-fu"),
    (3, "Muay Thai", "muay-thai"),
    (4, "Boxing", "boxing"),
    (5, "Judo", "judo"),
];

const GENRES: &[(i32, &str, &str)] = &[(28, "Action", "action"), (18, "Drama", "drama"), (35, "Comedy", "comedy")];

const COUNTRIES: &[(i32, &str, &str)] = &[
    (1, "China", "CN"),
    (2, "Hong Kong", "HK"),
    (3, "Japan", "JP"),
    (4, "Thailand", "TH"),
    (5, "United States", "US"),
    (6, "France", "FR"),
];

struct FixtureMovie {
    title: &'static str,
    slug: &'static str,
    release_date: Option<&'static str>,
    primary: i32,
    martial_arts: &'static [i32],
    genres: &'static [i32],
    countries: &'static [i32],
}

// France (6) deliberately has no movies.
const MOVIES: &[FixtureMovie] = &[
    FixtureMovie {
        title: "Enter the Dragon",
        slug: "enter-the-dragon-1973",
        release_date: Some("1973-08-17"),
        primary: 2,
        martial_arts: &[2, 1],
        genres: &[28],
        countries: &[2, 5],
    },
    FixtureMovie {
        title: "Ip Man",
        slug: "ip-man-2008",
        release_date: Some("2008-12-12"),
        primary: 2,
        martial_arts: &[2],
        genres: &[28, 18],
        countries: &[2, 1],
    },
    FixtureMovie {
        title: "The Karate Kid",
        slug: "the-karate-kid-1984",
        release_date: Some("1984-06-22"),
        primary: 1,
        martial_arts: &[1],
        genres: &[18],
        countries: &[5],
    },
    FixtureMovie {
        title: "Ong-Bak",
        slug: "ong-bak-2003",
        release_date: Some("2003-01-21"),
        primary: 3,
        martial_arts: &[3],
        genres: &[28],
        countries: &[4],
    },
    FixtureMovie {
        title: "Sanshiro Sugata",
        slug: "sanshiro-sugata-1943",
        release_date: Some("1943-03-25"),
        primary: 5,
        martial_arts: &[5],
        genres: &[18],
        countries: &[3],
    },
    FixtureMovie {
        title: "Rocky",
        slug: "rocky-1976",
        release_date: Some("1976-11-21"),
        primary: 4,
        martial_arts: &[4],
        genres: &[18],
        countries: &[5],
    },
    FixtureMovie {
        title: "Kung Fu Hustle",
        slug: "kung-fu-hustle-2004",
        release_date: Some("2004-12-23"),
        primary: 2,
        martial_arts: &[2],
        genres: &[28, 35],
        countries: &[1, 2],
    },
    FixtureMovie {
        title: "Drunken Master",
        slug: "drunken-master-1978",
        release_date: Some("1978-10-05"),
        primary: 2,
        martial_arts: &[2],
        genres: &[28, 35],
        countries: &[2],
    },
    FixtureMovie {
        title: "Undated Fighter",
        slug: "undated-fighter",
        release_date: None,
        primary: 1,
        martial_arts: &[1, 4],
        genres: &[28],
        countries: &[5],
    },
    FixtureMovie {
        title: "Boundary Bout",
        slug: "boundary-bout-1950",
        release_date: Some("1950-01-01"),
        primary: 4,
        martial_arts: &[4],
        genres: &[18],
        countries: &[5],
    },
];

pub async fn catalog() -> Catalog {
    let db = db::connect_and_migrate("sqlite::memory:", 1).await.expect("in-memory database");

    martial_art::Entity::insert_many(MARTIAL_ARTS.iter().map(|&(id, name, slug)| {
        martial_art::ActiveModel { id: Set(id), name: Set(name.into()), slug: Set(slug.into()) }
    }))
    .exec_without_returning(&db)
    .await
    .expect("seed martial arts");

    genre::Entity::insert_many(GENRES.iter().map(|&(id, name, slug)| genre::ActiveModel {
        id: Set(id),
        name: Set(name.into()),
        slug: Set(slug.into()),
    }))
    .exec_without_returning(&db)
    .await
    .expect("seed genres");

    country::Entity::insert_many(COUNTRIES.iter().map(|&(id, name, code)| country::ActiveModel {
        id: Set(id),
        name: Set(name.into()),
        code: Set(code.into()),
    }))
    .exec_without_returning(&db)
    .await
    .expect("seed countries");

    for (index, fixture) in MOVIES.iter().enumerate() {
        let id = index as i32 + 1;
        movie::Entity::insert(movie::ActiveModel {
            id: Set(id),
            tmdb_id: Set(10_000 + id),
            title: Set(fixture.title.into()),
            slug: Set(fixture.slug.into()),
            overview: Set(format!("{} overview", fixture.title)),
            release_date: Set(fixture.release_date.map(str::to_string)),
            poster_path: Set(Some(format!("/{}.jpg", fixture.slug))),
            backdrop_path: NotSet,
            primary_martial_art_id: Set(fixture.primary),
            updated_at: Set(UPDATED_AT),
        })
        .exec_without_returning(&db)
        .await
        .expect("seed movie");

        movie_martial_art::Entity::insert_many(fixture.martial_arts.iter().map(|&art| {
            movie_martial_art::ActiveModel { movie_id: Set(id), martial_art_id: Set(art) }
        }))
        .exec_without_returning(&db)
        .await
        .expect("seed movie martial arts");

        movie_genre::Entity::insert_many(
            fixture
                .genres
                .iter()
                .map(|&genre| movie_genre::ActiveModel { movie_id: Set(id), genre_id: Set(genre) }),
        )
        .exec_without_returning(&db)
        .await
        .expect("seed movie genres");

        movie_country::Entity::insert_many(fixture.countries.iter().map(|&country| {
            movie_country::ActiveModel { movie_id: Set(id), country_id: Set(country) }
        }))
        .exec_without_returning(&db)
        .await
        .expect("seed movie countries");
    }

    Catalog::new(Arc::new(db))
}
