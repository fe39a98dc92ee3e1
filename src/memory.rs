use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    blogs::{
        repo::BlogRepo,
        repo_types::{Blog, BlogPatch, DeleteOutcome, NewBlog},
    },
    error::StoreError,
};

/// Process-local store with the same uniqueness and update rules as
/// [`crate::db::MongoStore`].
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    blogs: RwLock<Vec<Blog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn blog_count(&self) -> usize {
        self.blogs.read().await.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate(format!("username {username}")));
        }
        let user = User {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BlogRepo for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
        Ok(self.blogs.read().await.clone())
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Blog>, StoreError> {
        let blogs = self.blogs.read().await;
        Ok(blogs.iter().filter(|b| b.author == author).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        let blogs = self.blogs.read().await;
        Ok(blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let blog = Blog {
            id: ObjectId::new().to_hex(),
            title: blog.title,
            content: blog.content,
            author: blog.author,
            category: blog.category,
            external_link: blog.external_link,
            created_at: OffsetDateTime::now_utc(),
        };
        self.blogs.write().await.push(blog.clone());
        Ok(blog)
    }

    async fn update_by_id(&self, id: &str, patch: BlogPatch) -> Result<Option<Blog>, StoreError> {
        let mut blogs = self.blogs.write().await;
        let Some(blog) = blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        patch.apply(blog);
        Ok(Some(blog.clone()))
    }

    async fn delete_by_id_for_author(
        &self,
        id: &str,
        author: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let mut blogs = self.blogs.write().await;
        let Some(pos) = blogs.iter().position(|b| b.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if blogs[pos].author != author {
            return Ok(DeleteOutcome::AuthorMismatch);
        }
        blogs.remove(pos);
        Ok(DeleteOutcome::Deleted)
    }
}
