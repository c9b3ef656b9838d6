//! Per-blog settings stored as one JSON document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

fn default_theme() -> String {
    "default".to_string()
}

fn default_posts_per_page() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

/// Blog settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSettings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
    #[serde(default = "default_true")]
    pub comments_enabled: bool,
    /// Hold every comment for review, flagged or not
    #[serde(default)]
    pub moderate_all_comments: bool,
    /// Blog-specific words that mark a comment suspect
    #[serde(default)]
    pub comment_blocklist: Vec<String>,
    /// Network name → profile URL
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub footer_text: Option<String>,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            accent_color: None,
            posts_per_page: default_posts_per_page(),
            comments_enabled: true,
            moderate_all_comments: false,
            comment_blocklist: Vec::new(),
            social_links: BTreeMap::new(),
            seo_title: None,
            seo_description: None,
            footer_text: None,
        }
    }
}

/// Partial settings update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSettingsInput {
    #[validate(length(min = 1, max = 50))]
    pub theme: Option<String>,
    #[validate(length(max = 20))]
    pub accent_color: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub posts_per_page: Option<u32>,
    pub comments_enabled: Option<bool>,
    pub moderate_all_comments: Option<bool>,
    pub comment_blocklist: Option<Vec<String>>,
    pub social_links: Option<BTreeMap<String, String>>,
    #[validate(length(max = 255))]
    pub seo_title: Option<String>,
    #[validate(length(max = 500))]
    pub seo_description: Option<String>,
    #[validate(length(max = 1000))]
    pub footer_text: Option<String>,
}

impl BlogSettings {
    /// Apply a partial update
    pub fn merge(&mut self, input: UpdateSettingsInput) {
        if let Some(theme) = input.theme {
            self.theme = theme;
        }
        if let Some(color) = input.accent_color {
            self.accent_color = Some(color);
        }
        if let Some(n) = input.posts_per_page {
            self.posts_per_page = n;
        }
        if let Some(enabled) = input.comments_enabled {
            self.comments_enabled = enabled;
        }
        if let Some(moderate) = input.moderate_all_comments {
            self.moderate_all_comments = moderate;
        }
        if let Some(words) = input.comment_blocklist {
            self.comment_blocklist = words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
        }
        if let Some(links) = input.social_links {
            self.social_links = links;
        }
        if let Some(title) = input.seo_title {
            self.seo_title = Some(title);
        }
        if let Some(desc) = input.seo_description {
            self.seo_description = Some(desc);
        }
        if let Some(footer) = input.footer_text {
            self.footer_text = Some(footer);
        }
    }
}

/// Settings as exposed to readers (no blocklist)
#[derive(Debug, Clone, Serialize)]
pub struct PublicSettings {
    pub theme: String,
    pub accent_color: Option<String>,
    pub posts_per_page: u32,
    pub comments_enabled: bool,
    pub social_links: BTreeMap<String, String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub footer_text: Option<String>,
}

impl From<BlogSettings> for PublicSettings {
    fn from(s: BlogSettings) -> Self {
        Self {
            theme: s.theme,
            accent_color: s.accent_color,
            posts_per_page: s.posts_per_page,
            comments_enabled: s.comments_enabled,
            social_links: s.social_links,
            seo_title: s.seo_title,
            seo_description: s.seo_description,
            footer_text: s.footer_text,
        }
    }
}
