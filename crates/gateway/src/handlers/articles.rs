//! Article catalog handlers
//!
//! The submit path reconciles an Article and its Reference/Cited
//! companion rows as one unit; everything else is plain reads plus a
//! cascading delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_field, require_list};
use crate::AppState;
use masthead_common::{
    auth::AdminIdentity,
    db::{ArticleFields, ArticleRecord, ArticleSubmission, Repository},
    errors::{AppError, Result},
};
use masthead_common::db::models::{Article, Cited, Reference};

/// Article submission payload.
///
/// Every field is optional at the deserialization layer so that missing
/// required fields surface as a 400 with the offending field named,
/// before any persistence access.
#[derive(Debug, Deserialize)]
pub struct SubmitArticleRequest {
    #[serde(rename = "journalTitle")]
    pub journal_title: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<String>,
    pub volume: Option<String>,
    pub part: Option<String>,
    pub date: Option<String>,
    pub authors: Option<Vec<String>>,
    pub authors_university: Option<Vec<String>>,
    pub link: Option<String>,
    pub highlight: Option<Vec<String>>,
    pub introduction: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub issue_title: Option<String>,
    pub issue_author_details: Option<String>,
    pub reference_author: Option<String>,
    pub reference_title: Option<String>,
    pub reference_host: Option<String>,
    pub cited_title: Option<String>,
    pub cited_host: Option<String>,
}

impl SubmitArticleRequest {
    /// Validate required fields and produce a typed submission.
    ///
    /// The title is trimmed here; the trimmed value keys the rest of the
    /// submit operation.
    fn into_submission(self) -> Result<ArticleSubmission> {
        let title = require_field(self.title, "title")?;

        let date_raw = require_field(self.date, "date")?;
        let date = NaiveDate::parse_from_str(date_raw.trim(), "%Y-%m-%d").map_err(|_| {
            AppError::InvalidFormat {
                message: format!("date must be YYYY-MM-DD, got '{}'", date_raw),
            }
        })?;

        Ok(ArticleSubmission {
            article: ArticleFields {
                title: title.trim().to_string(),
                journal_title: require_field(self.journal_title, "journalTitle")?,
                cover_image: require_field(self.cover_image, "coverImage")?,
                volume: require_field(self.volume, "volume")?,
                part: require_field(self.part, "part")?,
                date,
                authors: require_list(self.authors, "authors")?,
                authors_university: require_list(self.authors_university, "authors_university")?,
                link: require_field(self.link, "link")?,
                highlight: require_list(self.highlight, "highlight")?,
                introduction: require_field(self.introduction, "introduction")?,
                abstract_text: require_field(self.abstract_text, "abstract")?,
                issue_title: self.issue_title,
                issue_author_details: self.issue_author_details,
            },
            reference_author: require_field(self.reference_author, "reference_author")?,
            reference_title: require_field(self.reference_title, "reference_title")?,
            reference_host: require_field(self.reference_host, "reference_host")?,
            cited_title: self.cited_title,
            cited_host: self.cited_host,
        })
    }
}

/// Response after submitting an article
#[derive(Serialize)]
pub struct SubmitArticleResponse {
    pub message: String,
    pub article: Article,
    pub reference: Reference,
    pub cited: Cited,
}

/// An article with its companion rows, as returned by read endpoints
#[derive(Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    pub reference: Option<Reference>,
    pub cited: Option<Cited>,
}

impl From<ArticleRecord> for ArticleView {
    fn from(record: ArticleRecord) -> Self {
        Self {
            article: record.article,
            reference: record.reference,
            cited: record.cited,
        }
    }
}

#[derive(Serialize)]
pub struct ListArticlesResponse {
    pub articles: Vec<ArticleView>,
}

#[derive(Serialize)]
pub struct GetArticleResponse {
    pub article: ArticleView,
}

#[derive(Serialize)]
pub struct DeleteArticleResponse {
    pub message: String,
}

/// Create or update an article with its Reference and Cited rows.
///
/// Returns 201 when the article was newly created for its trimmed title,
/// 200 when an existing article was updated in place.
pub async fn submit_article(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(request): Json<SubmitArticleRequest>,
) -> Result<(StatusCode, Json<SubmitArticleResponse>)> {
    let submission = request.into_submission()?;

    let repo = Repository::new(state.db.clone());
    let outcome = repo.submit_article(submission).await?;

    tracing::info!(
        article_id = %outcome.article.id,
        title = %outcome.article.title,
        admin = %admin.username,
        created = outcome.created,
        "Article submitted"
    );

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Article created successfully")
    } else {
        (StatusCode::OK, "Article updated successfully")
    };

    Ok((
        status,
        Json(SubmitArticleResponse {
            message: message.to_string(),
            article: outcome.article,
            reference: outcome.reference,
            cited: outcome.cited,
        }),
    ))
}

/// List all articles, most recently updated first
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<ListArticlesResponse>> {
    let repo = Repository::new(state.db.clone());
    let articles = repo.list_articles().await?;

    Ok(Json(ListArticlesResponse {
        articles: articles.into_iter().map(ArticleView::from).collect(),
    }))
}

/// Get an article by ID with its Reference and Cited rows
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<GetArticleResponse>> {
    let repo = Repository::new(state.db.clone());

    let record = repo
        .find_article_with_companions(article_id)
        .await?
        .ok_or_else(|| AppError::ArticleNotFound {
            id: article_id.to_string(),
        })?;

    Ok(Json(GetArticleResponse {
        article: record.into(),
    }))
}

/// Delete an article; its Reference and Cited rows go with it
pub async fn delete_article(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<DeleteArticleResponse>> {
    let repo = Repository::new(state.db.clone());

    let deleted = repo.delete_article(article_id).await?;
    if !deleted {
        return Err(AppError::ArticleNotFound {
            id: article_id.to_string(),
        });
    }

    tracing::info!(
        article_id = %article_id,
        admin = %admin.username,
        "Article deleted"
    );

    Ok(Json(DeleteArticleResponse {
        message: "Article deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SubmitArticleRequest {
        SubmitArticleRequest {
            journal_title: Some("Journal of Examples".to_string()),
            title: Some("  Study of X  ".to_string()),
            cover_image: Some("http://example.com/cover.png".to_string()),
            volume: Some("1".to_string()),
            part: Some("2".to_string()),
            date: Some("2024-01-01".to_string()),
            authors: Some(vec!["A".to_string()]),
            authors_university: Some(vec!["U".to_string()]),
            link: Some("http://example.com/x".to_string()),
            highlight: Some(vec!["h".to_string()]),
            introduction: Some("i".to_string()),
            abstract_text: Some("a".to_string()),
            issue_title: None,
            issue_author_details: None,
            reference_author: Some("R".to_string()),
            reference_title: Some("RT".to_string()),
            reference_host: Some("RH".to_string()),
            cited_title: None,
            cited_host: None,
        }
    }

    #[test]
    fn test_title_is_trimmed() {
        let submission = valid_request().into_submission().unwrap();
        assert_eq!(submission.article.title, "Study of X");
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut request = valid_request();
        request.reference_author = None;

        let err = request.into_submission().unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingField { ref field } if field == "reference_author"
        ));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut request = valid_request();
        request.introduction = Some("   ".to_string());

        let err = request.into_submission().unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingField { ref field } if field == "introduction"
        ));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let mut request = valid_request();
        request.date = Some("01/01/2024".to_string());

        let err = request.into_submission().unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat { .. }));
    }

    #[test]
    fn test_cited_fields_are_optional() {
        let submission = valid_request().into_submission().unwrap();
        assert_eq!(submission.cited_title, None);
        assert_eq!(submission.cited_host, None);

        let mut request = valid_request();
        request.cited_title = Some("CT".to_string());
        request.cited_host = Some("CH".to_string());
        let submission = request.into_submission().unwrap();
        assert_eq!(submission.cited_title.as_deref(), Some("CT"));
    }
}
