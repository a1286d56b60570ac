//! Article entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    #[serde(rename = "journalTitle")]
    pub journal_title: String,

    /// Business-unique key, stored trimmed of surrounding whitespace
    #[sea_orm(column_type = "Text", unique)]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    #[serde(rename = "coverImage")]
    pub cover_image: String,

    #[sea_orm(column_type = "Text")]
    pub volume: String,

    #[sea_orm(column_type = "Text")]
    pub part: String,

    pub date: Date,

    pub authors: Vec<String>,

    pub authors_university: Vec<String>,

    #[sea_orm(column_type = "Text")]
    pub link: String,

    pub highlight: Vec<String>,

    #[sea_orm(column_type = "Text")]
    pub introduction: String,

    #[sea_orm(column_type = "Text")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub issue_title: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub issue_author_details: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::reference::Entity")]
    Reference,

    #[sea_orm(has_one = "super::cited::Entity")]
    Cited,
}

impl Related<super::reference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reference.def()
    }
}

impl Related<super::cited::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cited.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
