use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Blog post as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields supplied at creation; id and createdAt are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub external_link: Option<String>,
}

/// Partial overwrite of the editable fields. `None` leaves a field unchanged;
/// `external_link: Some(None)` clears the link.
#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub external_link: Option<Option<String>>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.external_link.is_none()
    }

    pub fn apply(self, blog: &mut Blog) {
        if let Some(title) = self.title {
            blog.title = title;
        }
        if let Some(content) = self.content {
            blog.content = content;
        }
        if let Some(category) = self.category {
            blog.category = category;
        }
        if let Some(link) = self.external_link {
            blog.external_link = link;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    AuthorMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Blog {
        Blog {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".into(),
            title: "Hello".into(),
            content: "First post".into(),
            author: "ada".into(),
            category: "tech".into(),
            external_link: None,
            created_at: datetime!(2024-01-12 10:30:00 UTC),
        }
    }

    #[test]
    fn serializes_with_client_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["_id"], "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(json["createdAt"], "2024-01-12T10:30:00Z");
        assert!(json.get("externalLink").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn patch_touches_only_present_fields() {
        let mut blog = sample();
        BlogPatch {
            title: Some("Hello again".into()),
            external_link: Some(Some("https://example.com".into())),
            ..Default::default()
        }
        .apply(&mut blog);
        assert_eq!(blog.title, "Hello again");
        assert_eq!(blog.content, "First post");
        assert_eq!(blog.category, "tech");
        assert_eq!(blog.external_link.as_deref(), Some("https://example.com"));
        assert_eq!(blog.author, "ada");
        assert_eq!(blog.created_at, datetime!(2024-01-12 10:30:00 UTC));
    }

    #[test]
    fn null_link_clears_it() {
        let mut blog = sample();
        blog.external_link = Some("https://example.com".into());
        BlogPatch {
            external_link: Some(None),
            ..Default::default()
        }
        .apply(&mut blog);
        assert!(blog.external_link.is_none());
        assert_eq!(blog.title, "Hello");
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(BlogPatch::default().is_empty());
        assert!(!BlogPatch {
            category: Some("misc".into()),
            ..Default::default()
        }
        .is_empty());
    }
}
