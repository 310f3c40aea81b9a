use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub tmdb_id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    /// ISO `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub primary_martial_art_id: i32,
    pub updated_at: i64,
}

impl Model {
    pub fn release_year(&self) -> Option<i16> {
        let date: jiff::civil::Date = self.release_date.as_deref()?.parse().ok()?;
        Some(date.year())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::martial_art::Entity",
        from = "Column::PrimaryMartialArtId",
        to = "super::martial_art::Column::Id"
    )]
    PrimaryMartialArt,
    #[sea_orm(has_many = "super::movie_martial_art::Entity")]
    MovieMartialArt,
    #[sea_orm(has_many = "super::movie_genre::Entity")]
    MovieGenre,
    #[sea_orm(has_many = "super::movie_country::Entity")]
    MovieCountry,
}

// `Related<martial_art::Entity>` is the full many-to-many set; the primary
// martial art goes through `PrimaryMartialArtLink` instead.
impl Related<super::martial_art::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_martial_art::Relation::MartialArt.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_martial_art::Relation::Movie.def().rev())
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genre::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genre::Relation::Movie.def().rev())
    }
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_country::Relation::Country.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_country::Relation::Movie.def().rev())
    }
}

#[derive(Debug)]
pub struct PrimaryMartialArtLink;

impl Linked for PrimaryMartialArtLink {
    type FromEntity = Entity;
    type ToEntity = super::martial_art::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::PrimaryMartialArt.def()]
    }
}

impl ActiveModelBehavior for ActiveModel {}
