//! Categories, tags and series

use super::resolve_slug;
use crate::domain::{
    CreateTaxonomyInput, SeriesDetail, StringUuid, Taxonomy, TaxonomyKind, UpdateTaxonomyInput,
};
use crate::error::{AppError, Result};
use crate::repository::{PostRepository, TaxonomyRepository};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct TaxonomyService {
    terms: Arc<dyn TaxonomyRepository>,
    posts: Arc<dyn PostRepository>,
}

impl TaxonomyService {
    pub fn new(terms: Arc<dyn TaxonomyRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { terms, posts }
    }

    pub async fn list(&self, blog_id: StringUuid, kind: TaxonomyKind) -> Result<Vec<Taxonomy>> {
        self.terms.list(blog_id, kind).await
    }

    pub async fn get(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        id: StringUuid,
    ) -> Result<Taxonomy> {
        self.terms
            .find_by_id(blog_id, kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind.label(), id)))
    }

    /// Series by slug with its published posts in `series_order`
    pub async fn series_detail(&self, blog_id: StringUuid, slug: &str) -> Result<SeriesDetail> {
        let series = self
            .terms
            .find_by_slug(blog_id, TaxonomyKind::Series, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Series '{}' not found", slug)))?;
        let posts = self.posts.list_in_series(blog_id, series.id).await?;
        Ok(SeriesDetail { series, posts })
    }

    pub async fn create(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        input: CreateTaxonomyInput,
    ) -> Result<Taxonomy> {
        input.validate()?;
        let terms = &self.terms;
        let slug = resolve_slug(input.slug.as_deref(), &input.name, kind.as_str(), |s| async move {
            terms.slug_exists(blog_id, kind, &s, None).await
        })
        .await?;

        let mut term = Taxonomy::new(blog_id, kind, &input.name, &slug);
        term.description = input.description.filter(|d| !d.trim().is_empty());
        self.terms.create(&term).await
    }

    pub async fn update(
        &self,
        blog_id: StringUuid,
        kind: TaxonomyKind,
        id: StringUuid,
        input: UpdateTaxonomyInput,
    ) -> Result<Taxonomy> {
        input.validate()?;
        let mut term = self.get(blog_id, kind, id).await?;

        if let Some(slug) = input.slug.as_deref().filter(|s| *s != term.slug) {
            let terms = &self.terms;
            term.slug = resolve_slug(Some(slug), &term.name, kind.as_str(), |s| async move {
                terms.slug_exists(blog_id, kind, &s, Some(id)).await
            })
            .await?;
        }
        if let Some(name) = input.name {
            term.name = name;
        }
        if let Some(description) = input.description {
            term.description = description;
        }
        term.updated_at = Utc::now();

        self.terms.update(&term).await
    }

    /// Delete a term after unlinking it from every post
    pub async fn delete(&self, blog_id: StringUuid, kind: TaxonomyKind, id: StringUuid) -> Result<()> {
        self.get(blog_id, kind, id).await?;
        self.posts.detach_term(blog_id, kind, id).await?;
        self.terms.delete(blog_id, kind, id).await?;
        tracing::info!(blog_id = %blog_id, kind = %kind, term_id = %id, "Term deleted");
        Ok(())
    }
}
