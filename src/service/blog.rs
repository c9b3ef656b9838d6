//! Blog lookup and profile management

use crate::domain::{Blog, StringUuid, TenantKey, UpdateBlogInput};
use crate::error::{AppError, Result};
use crate::repository::BlogRepository;
use metrics::counter;
use std::sync::Arc;
use validator::Validate;

pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Look up the blog a request addresses. Suspended blogs are hidden.
    pub async fn resolve(&self, key: &TenantKey) -> Result<Blog> {
        let blog = match key {
            TenantKey::Subdomain(sub) => self.repo.find_by_subdomain(sub).await?,
            TenantKey::CustomDomain(domain) => self.repo.find_by_custom_domain(domain).await?,
        };

        match blog {
            Some(blog) if blog.is_active() => {
                counter!("taita_tenant_resolution_total", "result" => "found").increment(1);
                Ok(blog)
            }
            _ => {
                counter!("taita_tenant_resolution_total", "result" => "not_found").increment(1);
                Err(AppError::NotFound(format!("Blog not found for {}", key)))
            }
        }
    }

    pub async fn get(&self, id: StringUuid) -> Result<Blog> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog {} not found", id)))
    }

    pub async fn update_profile(&self, id: StringUuid, input: UpdateBlogInput) -> Result<Blog> {
        input.validate()?;
        let mut blog = self.get(id).await?;

        if let Some(name) = input.name {
            blog.name = name;
        }
        if let Some(description) = input.description {
            blog.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(domain) = input.custom_domain {
            let domain = domain
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
            if let Some(d) = &domain {
                if let Some(other) = self.repo.find_by_custom_domain(d).await? {
                    if other.id != blog.id {
                        return Err(AppError::Conflict(format!(
                            "Domain '{}' is already in use",
                            d
                        )));
                    }
                }
            }
            blog.custom_domain = domain;
        }

        self.repo.update(&blog).await
    }
}
