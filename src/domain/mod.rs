//! Domain models for Taita Core

pub mod blog;
pub mod comment;
pub mod common;
pub mod email;
pub mod media;
pub mod menu;
pub mod otp;
pub mod page;
pub mod post;
pub mod settings;
pub mod subscription;
pub mod taxonomy;
pub mod user;

pub use blog::*;
pub use comment::*;
pub use common::{slugify, StringUuid};
pub use email::*;
pub use media::*;
pub use menu::*;
pub use otp::*;
pub use page::*;
pub use post::*;
pub use settings::*;
pub use subscription::*;
pub use taxonomy::*;
pub use user::*;
