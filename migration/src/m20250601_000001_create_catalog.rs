use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MartialArt::Table)
                    .if_not_exists()
                    .col(pk_auto(MartialArt::Id))
                    .col(string_uniq(MartialArt::Name))
                    .col(string_uniq(MartialArt::Slug))
                    .to_owned(),
            )
            .await?;

        // Genre ids mirror the TMDB genre ids, so they are not generated here.
        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(integer(Genre::Id).primary_key())
                    .col(string_uniq(Genre::Name))
                    .col(string_uniq(Genre::Slug))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Country::Table)
                    .if_not_exists()
                    .col(pk_auto(Country::Id))
                    .col(string(Country::Name))
                    .col(string_uniq(Country::Code))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(integer_uniq(Movie::TmdbId))
                    .col(string(Movie::Title))
                    .col(string_uniq(Movie::Slug))
                    .col(text(Movie::Overview))
                    .col(string_null(Movie::ReleaseDate))
                    .col(string_null(Movie::PosterPath))
                    .col(string_null(Movie::BackdropPath))
                    .col(integer(Movie::PrimaryMartialArtId))
                    .col(big_integer(Movie::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_primary_martial_art")
                            .from(Movie::Table, Movie::PrimaryMartialArtId)
                            .to(MartialArt::Table, MartialArt::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_release_date")
                    .table(Movie::Table)
                    .col(Movie::ReleaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().name("idx_movie_title").table(Movie::Table).col(Movie::Title).to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieMartialArt::Table)
                    .if_not_exists()
                    .col(integer(MovieMartialArt::MovieId))
                    .col(integer(MovieMartialArt::MartialArtId))
                    .primary_key(
                        Index::create()
                            .col(MovieMartialArt::MovieId)
                            .col(MovieMartialArt::MartialArtId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_martial_art_movie")
                            .from(MovieMartialArt::Table, MovieMartialArt::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_martial_art_martial_art")
                            .from(MovieMartialArt::Table, MovieMartialArt::MartialArtId)
                            .to(MartialArt::Table, MartialArt::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_martial_art_martial_art")
                    .table(MovieMartialArt::Table)
                    .col(MovieMartialArt::MartialArtId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenre::Table)
                    .if_not_exists()
                    .col(integer(MovieGenre::MovieId))
                    .col(integer(MovieGenre::GenreId))
                    .primary_key(Index::create().col(MovieGenre::MovieId).col(MovieGenre::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_movie")
                            .from(MovieGenre::Table, MovieGenre::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_genre")
                            .from(MovieGenre::Table, MovieGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genre_genre")
                    .table(MovieGenre::Table)
                    .col(MovieGenre::GenreId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieCountry::Table)
                    .if_not_exists()
                    .col(integer(MovieCountry::MovieId))
                    .col(integer(MovieCountry::CountryId))
                    .primary_key(
                        Index::create().col(MovieCountry::MovieId).col(MovieCountry::CountryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_country_movie")
                            .from(MovieCountry::Table, MovieCountry::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_country_country")
                            .from(MovieCountry::Table, MovieCountry::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_country_country")
                    .table(MovieCountry::Table)
                    .col(MovieCountry::CountryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieCountry::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieMartialArt::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Country::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MartialArt::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MartialArt {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
enum Country {
    Table,
    Id,
    Name,
    Code,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    TmdbId,
    Title,
    Slug,
    Overview,
    ReleaseDate,
    PosterPath,
    BackdropPath,
    PrimaryMartialArtId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MovieMartialArt {
    Table,
    MovieId,
    MartialArtId,
}

#[derive(DeriveIden)]
enum MovieGenre {
    Table,
    MovieId,
    GenreId,
}

#[derive(DeriveIden)]
enum MovieCountry {
    Table,
    MovieId,
    CountryId,
}
