use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "country")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// ISO 3166-1 alpha-2.
    #[sea_orm(unique)]
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_country::Entity")]
    MovieCountry,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_country::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_country::Relation::Country.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
