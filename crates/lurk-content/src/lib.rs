//! lurk content model
//!
//! The parsed shape of forum pages: [`Post`]s made of rich-text
//! [`Fragment`]s, authored by [`User`]s. Site-specific page parsing
//! lives behind the [`PageExtractor`] trait so the thread cache can stay
//! generic over forum engines.

mod extract;
mod fragment;
mod post;

pub use extract::{ExtractError, PageExtractor};
pub use fragment::{Fragment, ImageRef};
pub use post::{post_list_size, Post, PostList, User, AVATAR_MAX_WIDTH};
