//! SeaORM entity models
//!
//! Database entities for the Masthead catalog

mod admin;
mod article;
mod cited;
mod reference;

pub use admin::{
    Entity as AdminEntity,
    Model as Admin,
    ActiveModel as AdminActiveModel,
    Column as AdminColumn,
};

pub use article::{
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
};

pub use reference::{
    Entity as ReferenceEntity,
    Model as Reference,
    ActiveModel as ReferenceActiveModel,
    Column as ReferenceColumn,
};

pub use cited::{
    Entity as CitedEntity,
    Model as Cited,
    ActiveModel as CitedActiveModel,
    Column as CitedColumn,
};
