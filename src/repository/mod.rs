//! Data access layer (Repository pattern)
//!
//! Every repository holds a clone of the single `MySqlPool` created at
//! startup; none of them opens connections of its own.

pub mod blog;
pub mod comment;
pub mod media;
pub mod menu;
pub mod page;
pub mod post;
pub mod settings;
pub mod subscription;
pub mod taxonomy;
pub mod user;

pub use blog::BlogRepository;
pub use comment::CommentRepository;
pub use media::MediaRepository;
pub use menu::MenuRepository;
pub use page::PageRepository;
pub use post::PostRepository;
pub use settings::SettingsRepository;
pub use subscription::SubscriptionRepository;
pub use taxonomy::TaxonomyRepository;
pub use user::UserRepository;

/// True when a sqlx error is a unique-key violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
