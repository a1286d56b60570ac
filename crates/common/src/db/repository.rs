//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling and transaction support.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, Set, SqlErr, Statement,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Scalar article fields, the unit handled by the article-only upsert.
/// The title is already trimmed.
#[derive(Debug, Clone)]
pub struct ArticleFields {
    pub title: String,
    pub journal_title: String,
    pub cover_image: String,
    pub volume: String,
    pub part: String,
    pub date: chrono::NaiveDate,
    pub authors: Vec<String>,
    pub authors_university: Vec<String>,
    pub link: String,
    pub highlight: Vec<String>,
    pub introduction: String,
    pub abstract_text: String,
    pub issue_title: Option<String>,
    pub issue_author_details: Option<String>,
}

/// A validated article submission: scalar article fields plus the
/// companion Reference and Cited fields.
#[derive(Debug, Clone)]
pub struct ArticleSubmission {
    pub article: ArticleFields,
    pub reference_author: String,
    pub reference_title: String,
    pub reference_host: String,
    pub cited_title: Option<String>,
    pub cited_host: Option<String>,
}

/// Result of a submission: the reconciled rows and whether the article
/// was newly created or updated in place.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub created: bool,
    pub article: Article,
    pub reference: Reference,
    pub cited: Cited,
}

/// An article together with its companion rows
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub article: Article,
    pub reference: Option<Reference>,
    pub cited: Option<Cited>,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Admin Operations
    // ========================================================================

    /// Find admin by username
    pub async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        AdminEntity::find()
            .filter(AdminColumn::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Create a new admin with an already-hashed password
    pub async fn create_admin(
        &self,
        name: String,
        username: String,
        password_hash: String,
    ) -> Result<Admin> {
        let now = chrono::Utc::now();

        let admin = AdminActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            username: Set(username),
            password_hash: Set(password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        admin.insert(self.conn()).await.map_err(|e| {
            // A concurrent registration can slip past the handler's
            // pre-check; the unique index on username has the last word
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Duplicate {
                    message: "Username already exists.".to_string(),
                },
                _ => e.into(),
            }
        })
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Find article by ID
    pub async fn find_article_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        ArticleEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Find article by its trimmed title
    pub async fn find_article_by_title(&self, title: &str) -> Result<Option<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::Title.eq(title))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Find article by ID together with its Reference and Cited rows
    pub async fn find_article_with_companions(&self, id: Uuid) -> Result<Option<ArticleRecord>> {
        let Some(article) = self.find_article_by_id(id).await? else {
            return Ok(None);
        };

        let reference = ReferenceEntity::find()
            .filter(ReferenceColumn::ArticleId.eq(id))
            .one(self.conn())
            .await?;

        let cited = CitedEntity::find()
            .filter(CitedColumn::ArticleId.eq(id))
            .one(self.conn())
            .await?;

        Ok(Some(ArticleRecord {
            article,
            reference,
            cited,
        }))
    }

    /// List all articles with companions, most recently updated first
    pub async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
        let articles = ArticleEntity::find()
            .order_by_desc(ArticleColumn::UpdatedAt)
            .order_by_desc(ArticleColumn::CreatedAt)
            .all(self.conn())
            .await?;

        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = articles.iter().map(|a| a.id).collect();

        let mut references: HashMap<Uuid, Reference> = ReferenceEntity::find()
            .filter(ReferenceColumn::ArticleId.is_in(ids.clone()))
            .all(self.conn())
            .await?
            .into_iter()
            .map(|r| (r.article_id, r))
            .collect();

        let mut citeds: HashMap<Uuid, Cited> = CitedEntity::find()
            .filter(CitedColumn::ArticleId.is_in(ids))
            .all(self.conn())
            .await?
            .into_iter()
            .map(|c| (c.article_id, c))
            .collect();

        Ok(articles
            .into_iter()
            .map(|article| ArticleRecord {
                reference: references.remove(&article.id),
                cited: citeds.remove(&article.id),
                article,
            })
            .collect())
    }

    /// Delete an article and its companion rows in one transaction.
    ///
    /// Returns whether an article row was actually removed.
    pub async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let txn = self.conn().begin().await?;

        ReferenceEntity::delete_many()
            .filter(ReferenceColumn::ArticleId.eq(id))
            .exec(&txn)
            .await?;

        CitedEntity::delete_many()
            .filter(CitedColumn::ArticleId.eq(id))
            .exec(&txn)
            .await?;

        let result = ArticleEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Article Submission
    // ========================================================================

    /// Create or update an article together with its Reference and Cited
    /// rows as one logical unit.
    ///
    /// The whole reconciliation runs inside a single transaction; the
    /// unique index on `articles.title` is the authoritative conflict
    /// detector. A submission that loses a concurrent race for creation
    /// lands on the `DO UPDATE` arm and proceeds as an update, so
    /// identical concurrent submissions converge on one article row with
    /// both callers succeeding.
    pub async fn submit_article(&self, submission: ArticleSubmission) -> Result<SubmissionOutcome> {
        let ArticleSubmission {
            article: fields,
            reference_author,
            reference_title,
            reference_host,
            cited_title,
            cited_host,
        } = submission;

        let txn = self.conn().begin().await?;

        let (article, created) = self.upsert_article_fields(&txn, fields).await?;

        let reference = self
            .upsert_reference(&txn, article.id, reference_author, reference_title, reference_host)
            .await?;

        let cited = self
            .upsert_cited(&txn, article.id, cited_title, cited_host)
            .await?;

        txn.commit().await?;

        Ok(SubmissionOutcome {
            created,
            article,
            reference,
            cited,
        })
    }

    /// Create or update the scalar article fields only, keyed by the
    /// trimmed title; no relation handling.
    ///
    /// Full scalar replace on conflict. `xmax = 0` discriminates a fresh
    /// insert from a conflict-update, so created-vs-updated is decided by
    /// the database rather than by a racy pre-read.
    async fn upsert_article_fields(
        &self,
        txn: &DatabaseTransaction,
        fields: ArticleFields,
    ) -> Result<(Article, bool)> {
        let now = chrono::Utc::now();

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO articles (
                id, journal_title, title, cover_image, volume, part, date,
                authors, authors_university, link, highlight, introduction,
                abstract_text, issue_title, issue_author_details,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (title) DO UPDATE SET
                journal_title = EXCLUDED.journal_title,
                cover_image = EXCLUDED.cover_image,
                volume = EXCLUDED.volume,
                part = EXCLUDED.part,
                date = EXCLUDED.date,
                authors = EXCLUDED.authors,
                authors_university = EXCLUDED.authors_university,
                link = EXCLUDED.link,
                highlight = EXCLUDED.highlight,
                introduction = EXCLUDED.introduction,
                abstract_text = EXCLUDED.abstract_text,
                issue_title = EXCLUDED.issue_title,
                issue_author_details = EXCLUDED.issue_author_details,
                updated_at = EXCLUDED.updated_at
            RETURNING *, (xmax = 0) AS inserted
            "#,
            vec![
                Uuid::new_v4().into(),
                fields.journal_title.into(),
                fields.title.into(),
                fields.cover_image.into(),
                fields.volume.into(),
                fields.part.into(),
                fields.date.into(),
                fields.authors.into(),
                fields.authors_university.into(),
                fields.link.into(),
                fields.highlight.into(),
                fields.introduction.into(),
                fields.abstract_text.into(),
                fields.issue_title.into(),
                fields.issue_author_details.into(),
                now.into(),
                now.into(),
            ],
        );

        let row = txn
            .query_one(stmt)
            .await?
            .ok_or_else(|| AppError::Internal {
                message: "Article upsert returned no row".to_string(),
            })?;

        let article = Article::from_query_result(&row, "")?;
        let created: bool = row.try_get("", "inserted")?;

        Ok((article, created))
    }

    /// Upsert the single Reference row for an article, full field replace
    async fn upsert_reference(
        &self,
        txn: &DatabaseTransaction,
        article_id: Uuid,
        reference_author: String,
        reference_title: String,
        reference_host: String,
    ) -> Result<Reference> {
        let now = chrono::Utc::now();

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO "references" (
                id, article_id, reference_author, reference_title,
                reference_host, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (article_id) DO UPDATE SET
                reference_author = EXCLUDED.reference_author,
                reference_title = EXCLUDED.reference_title,
                reference_host = EXCLUDED.reference_host,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
            vec![
                Uuid::new_v4().into(),
                article_id.into(),
                reference_author.into(),
                reference_title.into(),
                reference_host.into(),
                now.into(),
                now.into(),
            ],
        );

        let row = txn
            .query_one(stmt)
            .await?
            .ok_or_else(|| AppError::Internal {
                message: "Reference upsert returned no row".to_string(),
            })?;

        Reference::from_query_result(&row, "").map_err(Into::into)
    }

    /// Upsert the single Cited row for an article; fields may be NULL
    async fn upsert_cited(
        &self,
        txn: &DatabaseTransaction,
        article_id: Uuid,
        cited_title: Option<String>,
        cited_host: Option<String>,
    ) -> Result<Cited> {
        let now = chrono::Utc::now();

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO citeds (
                id, article_id, cited_title, cited_host, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (article_id) DO UPDATE SET
                cited_title = EXCLUDED.cited_title,
                cited_host = EXCLUDED.cited_host,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
            vec![
                Uuid::new_v4().into(),
                article_id.into(),
                cited_title.into(),
                cited_host.into(),
                now.into(),
                now.into(),
            ],
        );

        let row = txn
            .query_one(stmt)
            .await?
            .ok_or_else(|| AppError::Internal {
                message: "Cited upsert returned no row".to_string(),
            })?;

        Cited::from_query_result(&row, "").map_err(Into::into)
    }
}
