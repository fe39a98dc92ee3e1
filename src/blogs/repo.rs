use async_trait::async_trait;

use crate::blogs::repo_types::{Blog, BlogPatch, DeleteOutcome, NewBlog};
use crate::error::StoreError;

/// Access to the blogs collection.
#[async_trait]
pub trait BlogRepo: Send + Sync {
    /// All blogs, in whatever order the store yields them.
    async fn find_all(&self) -> Result<Vec<Blog>, StoreError>;

    /// Blogs whose author exactly equals `author`.
    async fn find_by_author(&self, author: &str) -> Result<Vec<Blog>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError>;

    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError>;

    /// Apply `patch` and return the post-update document, or `None` for an
    /// unknown id.
    async fn update_by_id(&self, id: &str, patch: BlogPatch) -> Result<Option<Blog>, StoreError>;

    /// Delete the blog only if its stored author equals `author`.
    async fn delete_by_id_for_author(
        &self,
        id: &str,
        author: &str,
    ) -> Result<DeleteOutcome, StoreError>;
}
