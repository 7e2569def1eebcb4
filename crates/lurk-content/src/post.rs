//! Posts and their authors

use crate::fragment::{Fragment, ImageRef};
use std::sync::Arc;

/// Widest an author avatar is rendered; larger images are scaled down
/// preserving aspect ratio
pub const AVATAR_MAX_WIDTH: u32 = 100;

/// Forum user as shown in the post sidebar
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub post_count: Option<u32>,
    pub registration_date: Option<String>,
    pub reputation: Option<i32>,
    pub city: Option<String>,
    pub signature: Option<String>,
    pub avatar: Option<ImageRef>,
}

impl User {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            post_count: None,
            registration_date: None,
            reputation: None,
            city: None,
            signature: None,
            avatar: None,
        }
    }

    pub fn approx_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.name.capacity()
            + self.registration_date.as_ref().map(|s| s.capacity()).unwrap_or(0)
            + self.city.as_ref().map(|s| s.capacity()).unwrap_or(0)
            + self.signature.as_ref().map(|s| s.capacity()).unwrap_or(0)
            + self.avatar.as_ref().map(|a| a.url.capacity()).unwrap_or(0)
    }
}

/// One forum post: an ordered fragment body plus metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Site-local post id, when the page exposes one
    pub id: Option<u64>,
    pub author: Arc<User>,
    pub fragments: Vec<Fragment>,
    pub timestamp: String,
    pub last_edit: Option<String>,
    pub like_count: u32,
}

impl Post {
    pub fn approx_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.author.approx_size()
            + self.fragments.iter().map(Fragment::approx_size).sum::<usize>()
            + self.timestamp.capacity()
            + self.last_edit.as_ref().map(|s| s.capacity()).unwrap_or(0)
    }

    /// Body as plain text, markup dropped
    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(Fragment::to_plain_text).collect()
    }
}

/// Posts of one page, in page order. `Arc` so cached pages and
/// aggregated whole-thread views share post storage.
pub type PostList = Vec<Arc<Post>>;

/// Approximate heap footprint of a post list
pub fn post_list_size(posts: &PostList) -> usize {
    posts.iter().map(|p| p.approx_size()).sum()
}
