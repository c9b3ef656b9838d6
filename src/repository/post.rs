//! Post repository

use crate::domain::{Post, PostFilter, StringUuid, Taxonomy, TaxonomyKind};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use std::collections::HashMap;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post together with its tag links (`post.tags`)
    async fn create(&self, post: &Post) -> Result<Post>;
    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Post>>;
    async fn find_by_slug(&self, blog_id: StringUuid, slug: &str) -> Result<Option<Post>>;
    /// Newest first by publication date, then creation date
    async fn list(
        &self,
        blog_id: StringUuid,
        filter: &PostFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>>;
    async fn count(&self, blog_id: StringUuid, filter: &PostFilter) -> Result<i64>;
    /// Published posts of a series ordered by `series_order`
    async fn list_in_series(&self, blog_id: StringUuid, series_id: StringUuid)
        -> Result<Vec<Post>>;
    /// Replace every column and the tag links
    async fn update(&self, post: &Post) -> Result<Post>;
    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()>;
    async fn slug_exists(
        &self,
        blog_id: StringUuid,
        slug: &str,
        exclude_id: Option<StringUuid>,
    ) -> Result<bool>;
    /// Unlink a deleted term from every post of the blog
    async fn detach_term(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        term_id: StringUuid,
    ) -> Result<()>;
}

pub struct PostRepositoryImpl {
    pool: MySqlPool,
}

impl PostRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn attach_tags(&self, posts: &mut [Post]) -> Result<()> {
        if posts.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(
            r#"
            SELECT pt.post_id, t.id, t.blog_id, t.kind, t.name, t.slug, t.description,
                   t.created_at, t.updated_at
            FROM post_tags pt
            JOIN taxonomies t ON t.id = pt.term_id
            WHERE pt.post_id IN (
            "#,
        );
        let mut ids = qb.separated(", ");
        for post in posts.iter() {
            ids.push_bind(post.id);
        }
        qb.push(") ORDER BY t.name");

        let rows = qb
            .build_query_as::<PostTagRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_post: HashMap<StringUuid, Vec<Taxonomy>> = HashMap::new();
        for row in rows {
            by_post.entry(row.post_id).or_default().push(row.term);
        }
        for post in posts.iter_mut() {
            post.tags = by_post.remove(&post.id).unwrap_or_default();
        }

        Ok(())
    }

    async fn find_one(&self, blog_id: StringUuid, column: &str, value: String) -> Result<Option<Post>> {
        let sql = format!(
            "SELECT {} FROM posts p WHERE p.blog_id = ? AND p.{} = ?",
            POST_COLUMNS, column
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(blog_id)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        match post {
            Some(post) => {
                let mut posts = [post];
                self.attach_tags(&mut posts).await?;
                let [post] = posts;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }
}

#[derive(FromRow)]
struct PostTagRow {
    post_id: StringUuid,
    #[sqlx(flatten)]
    term: Taxonomy,
}

const POST_COLUMNS: &str = "p.id, p.blog_id, p.author_id, p.title, p.slug, p.excerpt, p.content, \
     p.cover_image_url, p.status, p.published_at, p.category_id, p.series_id, p.series_order, \
     p.created_at, p.updated_at";

fn push_filter(qb: &mut QueryBuilder<'_, MySql>, blog_id: StringUuid, filter: &PostFilter) {
    qb.push(" WHERE p.blog_id = ");
    qb.push_bind(blog_id);

    if let Some(status) = filter.status {
        qb.push(" AND p.status = ");
        qb.push_bind(status);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND p.category_id = ");
        qb.push_bind(category_id);
    }
    if let Some(series_id) = filter.series_id {
        qb.push(" AND p.series_id = ");
        qb.push_bind(series_id);
    }
    if let Some(tag_id) = filter.tag_id {
        qb.push(" AND EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.term_id = ");
        qb.push_bind(tag_id);
        qb.push(")");
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (p.title LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.content LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[async_trait]
impl PostRepository for PostRepositoryImpl {
    async fn create(&self, post: &Post) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, blog_id, author_id, title, slug, excerpt, content, cover_image_url,
                               status, published_at, category_id, series_id, series_order,
                               created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(post.id)
        .bind(post.blog_id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image_url)
        .bind(post.status)
        .bind(post.published_at)
        .bind(post.category_id)
        .bind(post.series_id)
        .bind(post.series_order)
        .execute(&mut *tx)
        .await?;

        for tag in &post.tags {
            sqlx::query("INSERT INTO post_tags (post_id, term_id) VALUES (?, ?)")
                .bind(post.id)
                .bind(tag.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.find_by_id(post.blog_id, post.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create post")))
    }

    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Post>> {
        self.find_one(blog_id, "id", id.to_string()).await
    }

    async fn find_by_slug(&self, blog_id: StringUuid, slug: &str) -> Result<Option<Post>> {
        self.find_one(blog_id, "slug", slug.to_string()).await
    }

    async fn list(
        &self,
        blog_id: StringUuid,
        filter: &PostFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let mut qb: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM posts p", POST_COLUMNS));
        push_filter(&mut qb, blog_id, filter);
        qb.push(" ORDER BY COALESCE(p.published_at, p.created_at) DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let mut posts = qb.build_query_as::<Post>().fetch_all(&self.pool).await?;
        self.attach_tags(&mut posts).await?;

        Ok(posts)
    }

    async fn count(&self, blog_id: StringUuid, filter: &PostFilter) -> Result<i64> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        push_filter(&mut qb, blog_id, filter);

        let row: (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    async fn list_in_series(
        &self,
        blog_id: StringUuid,
        series_id: StringUuid,
    ) -> Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {} FROM posts p
            WHERE p.blog_id = ? AND p.series_id = ? AND p.status = 'published'
            ORDER BY p.series_order IS NULL, p.series_order, p.published_at
            "#,
            POST_COLUMNS
        );
        let mut posts = sqlx::query_as::<_, Post>(&sql)
            .bind(blog_id)
            .bind(series_id)
            .fetch_all(&self.pool)
            .await?;
        self.attach_tags(&mut posts).await?;

        Ok(posts)
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, slug = ?, excerpt = ?, content = ?, cover_image_url = ?, status = ?,
                published_at = ?, category_id = ?, series_id = ?, series_order = ?,
                updated_at = NOW()
            WHERE id = ? AND blog_id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image_url)
        .bind(post.status)
        .bind(post.published_at)
        .bind(post.category_id)
        .bind(post.series_id)
        .bind(post.series_order)
        .bind(post.id)
        .bind(post.blog_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", post.id)));
        }

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post.id)
            .execute(&mut *tx)
            .await?;
        for tag in &post.tags {
            sqlx::query("INSERT INTO post_tags (post_id, term_id) VALUES (?, ?)")
                .bind(post.id)
                .bind(tag.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.find_by_id(post.blog_id, post.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update post")))
    }

    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND blog_id = ?")
            .bind(id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        Ok(())
    }

    async fn slug_exists(
        &self,
        blog_id: StringUuid,
        slug: &str,
        exclude_id: Option<StringUuid>,
    ) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE blog_id = ? AND slug = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(blog_id)
        .bind(slug)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }

    async fn detach_term(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        term_id: StringUuid,
    ) -> Result<()> {
        let sql = match kind {
            TaxonomyKind::Category => {
                "UPDATE posts SET category_id = NULL WHERE blog_id = ? AND category_id = ?"
            }
            TaxonomyKind::Series => {
                "UPDATE posts SET series_id = NULL, series_order = NULL WHERE blog_id = ? AND series_id = ?"
            }
            TaxonomyKind::Tag => {
                "DELETE pt FROM post_tags pt JOIN posts p ON p.id = pt.post_id WHERE p.blog_id = ? AND pt.term_id = ?"
            }
        };

        sqlx::query(sql)
            .bind(blog_id)
            .bind(term_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
