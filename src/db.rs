use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    blogs::{
        repo::BlogRepo,
        repo_types::{Blog, BlogPatch, DeleteOutcome, NewBlog},
    },
    config::MongoConfig,
    error::StoreError,
};

const USERS: &str = "users";
const BLOGS: &str = "blogs";
const DUPLICATE_KEY: i32 = 11000;

/// Connect and ping, so a bad address fails at startup instead of on the
/// first request.
pub async fn connect(config: &MongoConfig) -> anyhow::Result<Client> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .context("parse MONGODB_URI")?;
    options.app_name = Some("myblog".into());
    let client = Client::with_options(options).context("build mongodb client")?;
    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .context("ping mongodb")?;
    info!(database = %config.database, "mongodb connected");
    Ok(client)
}

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    username: String,
    password: String, // hashed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    title: String,
    content: String,
    author: String,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    external_link: Option<String>,
    created_at: BsonDateTime,
}

impl BlogDocument {
    fn into_blog(self) -> Result<Blog, StoreError> {
        let id = self
            .id
            .ok_or_else(|| anyhow::anyhow!("blog document without _id"))?;
        Ok(Blog {
            id: id.to_hex(),
            title: self.title,
            content: self.content,
            author: self.author,
            category: self.category,
            external_link: self.external_link,
            created_at: to_offset_datetime(self.created_at)?,
        })
    }
}

fn to_offset_datetime(dt: BsonDateTime) -> Result<OffsetDateTime, StoreError> {
    let nanos = i128::from(dt.timestamp_millis()) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|e| StoreError::Backend(anyhow::anyhow!("createdAt out of range: {e}")))
}

/// `$set` body for the fields present in `patch`.
fn set_document(patch: &BlogPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(content) = &patch.content {
        set.insert("content", content.as_str());
    }
    if let Some(category) = &patch.category {
        set.insert("category", category.as_str());
    }
    match &patch.external_link {
        Some(Some(link)) => {
            set.insert("externalLink", link.as_str());
        }
        Some(None) => {
            set.insert("externalLink", Bson::Null);
        }
        None => {}
    }
    set
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

impl From<MongoError> for StoreError {
    fn from(err: MongoError) -> Self {
        if is_duplicate_key(&err) {
            StoreError::Duplicate(err.to_string())
        } else {
            StoreError::Backend(err.into())
        }
    }
}

/// Users and blogs collections of one MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<UserDocument>,
    blogs: Collection<BlogDocument>,
}

impl MongoStore {
    pub async fn new(db: &Database) -> anyhow::Result<Self> {
        let store = Self {
            users: db.collection(USERS),
            blogs: db.collection(BLOGS),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let unique_username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users
            .create_index(unique_username)
            .await
            .context("create unique index on users.username")?;

        let by_author = IndexModel::builder().keys(doc! { "author": 1 }).build();
        self.blogs
            .create_index(by_author)
            .await
            .context("create index on blogs.author")?;
        debug!("mongodb indexes ensured");
        Ok(())
    }

    async fn collect_blogs(&self, filter: Document) -> Result<Vec<Blog>, StoreError> {
        let docs: Vec<BlogDocument> = self.blogs.find(filter).await?.try_collect().await?;
        docs.into_iter().map(BlogDocument::into_blog).collect()
    }
}

#[async_trait]
impl UserRepo for MongoStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let found = self.users.find_one(doc! { "username": username }).await?;
        Ok(found.map(|d| User {
            username: d.username,
            password_hash: d.password,
        }))
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let doc = UserDocument {
            id: None,
            username: username.to_string(),
            password: password_hash.to_string(),
        };
        self.users.insert_one(&doc).await?;
        Ok(User {
            username: doc.username,
            password_hash: doc.password,
        })
    }
}

#[async_trait]
impl BlogRepo for MongoStore {
    async fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
        self.collect_blogs(doc! {}).await
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Blog>, StoreError> {
        self.collect_blogs(doc! { "author": author }).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        self.blogs
            .find_one(doc! { "_id": oid })
            .await?
            .map(BlogDocument::into_blog)
            .transpose()
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let mut doc = BlogDocument {
            id: None,
            title: blog.title,
            content: blog.content,
            author: blog.author,
            category: blog.category,
            external_link: blog.external_link,
            created_at: BsonDateTime::now(),
        };
        let result = self.blogs.insert_one(&doc).await?;
        doc.id = result.inserted_id.as_object_id();
        doc.into_blog()
    }

    async fn update_by_id(&self, id: &str, patch: BlogPatch) -> Result<Option<Blog>, StoreError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        self.blogs
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_document(&patch) })
            .return_document(ReturnDocument::After)
            .await?
            .map(BlogDocument::into_blog)
            .transpose()
    }

    async fn delete_by_id_for_author(
        &self,
        id: &str,
        author: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        let result = self
            .blogs
            .delete_one(doc! { "_id": oid, "author": author })
            .await?;
        if result.deleted_count > 0 {
            return Ok(DeleteOutcome::Deleted);
        }
        let exists = self.blogs.count_documents(doc! { "_id": oid }).await? > 0;
        Ok(if exists {
            DeleteOutcome::AuthorMismatch
        } else {
            DeleteOutcome::NotFound
        })
    }
}
