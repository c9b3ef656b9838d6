//! Taxonomy repository (categories, tags and series in one table)

use crate::domain::{StringUuid, Taxonomy, TaxonomyKind};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn create(&self, term: &Taxonomy) -> Result<Taxonomy>;
    async fn find_by_id(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        id: StringUuid,
    ) -> Result<Option<Taxonomy>>;
    async fn find_by_slug(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        slug: &str,
    ) -> Result<Option<Taxonomy>>;
    /// Terms of a kind matching `ids`; unknown ids are skipped
    async fn find_many(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        ids: &[StringUuid],
    ) -> Result<Vec<Taxonomy>>;
    async fn list(&self, blog_id: StringUuid, kind: TaxonomyKind) -> Result<Vec<Taxonomy>>;
    async fn update(&self, term: &Taxonomy) -> Result<Taxonomy>;
    async fn delete(&self, blog_id: StringUuid, kind: TaxonomyKind, id: StringUuid) -> Result<()>;
    async fn slug_exists(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        slug: &str,
        exclude_id: Option<StringUuid>,
    ) -> Result<bool>;
}

pub struct TaxonomyRepositoryImpl {
    pool: MySqlPool,
}

impl TaxonomyRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxonomyRepository for TaxonomyRepositoryImpl {
    async fn create(&self, term: &Taxonomy) -> Result<Taxonomy> {
        sqlx::query(
            r#"
            INSERT INTO taxonomies (id, blog_id, kind, name, slug, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(term.id)
        .bind(term.blog_id)
        .bind(term.kind)
        .bind(&term.name)
        .bind(&term.slug)
        .bind(&term.description)
        .execute(&self.pool)
        .await?;

        self.find_by_id(term.blog_id, term.kind, term.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create term")))
    }

    async fn find_by_id(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        id: StringUuid,
    ) -> Result<Option<Taxonomy>> {
        let term = sqlx::query_as::<_, Taxonomy>(
            r#"
            SELECT id, blog_id, kind, name, slug, description, created_at, updated_at
            FROM taxonomies
            WHERE blog_id = ? AND kind = ? AND id = ?
            "#,
        )
        .bind(blog_id)
        .bind(kind)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(term)
    }

    async fn find_by_slug(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        slug: &str,
    ) -> Result<Option<Taxonomy>> {
        let term = sqlx::query_as::<_, Taxonomy>(
            r#"
            SELECT id, blog_id, kind, name, slug, description, created_at, updated_at
            FROM taxonomies
            WHERE blog_id = ? AND kind = ? AND slug = ?
            "#,
        )
        .bind(blog_id)
        .bind(kind)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(term)
    }

    async fn find_many(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        ids: &[StringUuid],
    ) -> Result<Vec<Taxonomy>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT id, blog_id, kind, name, slug, description, created_at, updated_at \
             FROM taxonomies WHERE blog_id = ",
        );
        qb.push_bind(blog_id);
        qb.push(" AND kind = ");
        qb.push_bind(kind);
        qb.push(" AND id IN (");
        let mut list = qb.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        qb.push(") ORDER BY name");

        let terms = qb.build_query_as::<Taxonomy>().fetch_all(&self.pool).await?;
        Ok(terms)
    }

    async fn list(&self, blog_id: StringUuid, kind: TaxonomyKind) -> Result<Vec<Taxonomy>> {
        let terms = sqlx::query_as::<_, Taxonomy>(
            r#"
            SELECT id, blog_id, kind, name, slug, description, created_at, updated_at
            FROM taxonomies
            WHERE blog_id = ? AND kind = ?
            ORDER BY name
            "#,
        )
        .bind(blog_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(terms)
    }

    async fn update(&self, term: &Taxonomy) -> Result<Taxonomy> {
        let result = sqlx::query(
            r#"
            UPDATE taxonomies
            SET name = ?, slug = ?, description = ?, updated_at = NOW()
            WHERE id = ? AND blog_id = ? AND kind = ?
            "#,
        )
        .bind(&term.name)
        .bind(&term.slug)
        .bind(&term.description)
        .bind(term.id)
        .bind(term.blog_id)
        .bind(term.kind)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} {} not found",
                term.kind.label(),
                term.id
            )));
        }

        self.find_by_id(term.blog_id, term.kind, term.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update term")))
    }

    async fn delete(&self, blog_id: StringUuid, kind: TaxonomyKind, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM taxonomies WHERE id = ? AND blog_id = ? AND kind = ?")
            .bind(id)
            .bind(blog_id)
            .bind(kind)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} {} not found", kind.label(), id)));
        }

        Ok(())
    }

    async fn slug_exists(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        slug: &str,
        exclude_id: Option<StringUuid>,
    ) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM taxonomies
            WHERE blog_id = ? AND kind = ? AND slug = ? AND (? IS NULL OR id <> ?)
            "#,
        )
        .bind(blog_id)
        .bind(kind)
        .bind(slug)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }
}
