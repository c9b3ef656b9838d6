//! Post business logic

use super::resolve_slug;
use crate::domain::{
    CreatePostInput, Post, PostFilter, PublicPostQuery, PublishStatus, StringUuid, Taxonomy,
    TaxonomyKind, UpdatePostInput,
};
use crate::error::{AppError, Result};
use crate::repository::{PostRepository, TaxonomyRepository};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    terms: Arc<dyn TaxonomyRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, terms: Arc<dyn TaxonomyRepository>) -> Self {
        Self { posts, terms }
    }

    async fn slug_taken(
        &self,
        blog_id: StringUuid,
        slug: String,
        exclude: Option<StringUuid>,
    ) -> Result<bool> {
        self.posts.slug_exists(blog_id, &slug, exclude).await
    }

    /// Term id for a public filter slug. `Ok(None)` means the slug is unknown.
    async fn term_id(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        slug: &Option<String>,
    ) -> Result<Option<Option<StringUuid>>> {
        match slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Some(None)),
            Some(slug) => Ok(self
                .terms
                .find_by_slug(blog_id, kind, slug)
                .await?
                .map(|t| Some(t.id))),
        }
    }

    async fn check_term(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        id: Option<StringUuid>,
    ) -> Result<()> {
        if let Some(id) = id {
            if self.terms.find_by_id(blog_id, kind, id).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "{} {} does not exist",
                    kind.label(),
                    id
                )));
            }
        }
        Ok(())
    }

    async fn load_tags(&self, blog_id: StringUuid, ids: &[StringUuid]) -> Result<Vec<Taxonomy>> {
        let mut unique = ids.to_vec();
        unique.sort_by_key(|id| id.to_string());
        unique.dedup();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let tags = self.terms.find_many(blog_id, TaxonomyKind::Tag, &unique).await?;
        if tags.len() != unique.len() {
            return Err(AppError::BadRequest("Unknown tag id".to_string()));
        }
        Ok(tags)
    }

    /// Published posts for readers. A filter naming an unknown term
    /// yields an empty page.
    pub async fn list_public(
        &self,
        blog_id: StringUuid,
        query: &PublicPostQuery,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Post>, i64)> {
        let (Some(category_id), Some(tag_id), Some(series_id)) = (
            self.term_id(blog_id, TaxonomyKind::Category, &query.category).await?,
            self.term_id(blog_id, TaxonomyKind::Tag, &query.tag).await?,
            self.term_id(blog_id, TaxonomyKind::Series, &query.series).await?,
        ) else {
            return Ok((Vec::new(), 0));
        };

        let filter = PostFilter {
            status: Some(PublishStatus::Published),
            category_id,
            tag_id,
            series_id,
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        self.list(blog_id, &filter, offset, limit).await
    }

    pub async fn get_public(&self, blog_id: StringUuid, slug: &str) -> Result<Post> {
        self.posts
            .find_by_slug(blog_id, slug)
            .await?
            .filter(|p| p.is_published())
            .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", slug)))
    }

    pub async fn list(
        &self,
        blog_id: StringUuid,
        filter: &PostFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Post>, i64)> {
        let posts = self.posts.list(blog_id, filter, offset, limit).await?;
        let total = self.posts.count(blog_id, filter).await?;
        Ok((posts, total))
    }

    pub async fn get(&self, blog_id: StringUuid, id: StringUuid) -> Result<Post> {
        self.posts
            .find_by_id(blog_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    pub async fn create(
        &self,
        blog_id: StringUuid,
        author_id: StringUuid,
        input: CreatePostInput,
    ) -> Result<Post> {
        input.validate()?;
        self.check_term(blog_id, TaxonomyKind::Category, input.category_id)
            .await?;
        self.check_term(blog_id, TaxonomyKind::Series, input.series_id)
            .await?;
        let tags = self.load_tags(blog_id, &input.tag_ids).await?;

        let slug = resolve_slug(input.slug.as_deref(), &input.title, "post", |s| {
            self.slug_taken(blog_id, s, None)
        })
        .await?;

        let now = Utc::now();
        let post = Post {
            blog_id,
            author_id: Some(author_id),
            title: input.title,
            slug,
            excerpt: input.excerpt,
            content: input.content,
            cover_image_url: input.cover_image_url,
            status: input.status,
            published_at: (input.status == PublishStatus::Published).then_some(now),
            category_id: input.category_id,
            series_id: input.series_id,
            series_order: input.series_order,
            tags,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };

        let created = self.posts.create(&post).await?;
        tracing::info!(blog_id = %blog_id, post_id = %created.id, "Post created");
        Ok(created)
    }

    /// Merge an update. The slug only changes when one is given.
    pub async fn update(
        &self,
        blog_id: StringUuid,
        id: StringUuid,
        input: UpdatePostInput,
    ) -> Result<Post> {
        input.validate()?;
        let mut post = self.get(blog_id, id).await?;

        if let Some(slug) = input.slug.as_deref().filter(|s| *s != post.slug) {
            post.slug = resolve_slug(Some(slug), &post.title, "post", |s| {
                self.slug_taken(blog_id, s, Some(id))
            })
            .await?;
        }
        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(excerpt) = input.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(cover) = input.cover_image_url {
            post.cover_image_url = cover;
        }
        if let Some(category_id) = input.category_id {
            self.check_term(blog_id, TaxonomyKind::Category, category_id)
                .await?;
            post.category_id = category_id;
        }
        if let Some(series_id) = input.series_id {
            self.check_term(blog_id, TaxonomyKind::Series, series_id)
                .await?;
            post.series_id = series_id;
        }
        if let Some(order) = input.series_order {
            post.series_order = order;
        }
        if let Some(tag_ids) = input.tag_ids {
            post.tags = self.load_tags(blog_id, &tag_ids).await?;
        }
        if let Some(status) = input.status {
            post.status = status;
            if status == PublishStatus::Published && post.published_at.is_none() {
                post.published_at = Some(Utc::now());
            }
        }
        post.updated_at = Utc::now();

        self.posts.update(&post).await
    }

    pub async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        self.posts.delete(blog_id, id).await?;
        tracing::info!(blog_id = %blog_id, post_id = %id, "Post deleted");
        Ok(())
    }
}
