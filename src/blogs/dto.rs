use serde::{Deserialize, Deserializer, Serialize};

use crate::blogs::repo_types::{Blog, BlogPatch, NewBlog};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub external_link: Option<String>,
}

impl CreateBlogRequest {
    /// `None` when any required field is missing or empty.
    pub fn into_new_blog(self) -> Option<NewBlog> {
        fn required(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }
        Some(NewBlog {
            title: required(self.title)?,
            content: required(self.content)?,
            author: required(self.author)?,
            category: required(self.category)?,
            external_link: self.external_link,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    /// Absent leaves the link as is; `null` clears it.
    #[serde(deserialize_with = "present")]
    pub external_link: Option<Option<String>>,
}

/// Marks a key that was present in the body, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdateBlogRequest> for BlogPatch {
    fn from(r: UpdateBlogRequest) -> Self {
        Self {
            title: r.title,
            content: r.content,
            category: r.category,
            external_link: r.external_link,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteBlogRequest {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub message: &'static str,
    pub blog: Blog,
}

#[derive(Debug, Serialize)]
pub struct BlogsResponse {
    pub blogs: Vec<Blog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CreateBlogRequest {
        serde_json::from_str(body).expect("valid json")
    }

    #[test]
    fn create_request_with_all_fields() {
        let blog = parse(
            r#"{"title":"t","content":"c","author":"a","category":"k","externalLink":"https://x.io"}"#,
        )
        .into_new_blog()
        .expect("complete request");
        assert_eq!(blog.author, "a");
        assert_eq!(blog.external_link.as_deref(), Some("https://x.io"));
    }

    #[test]
    fn external_link_is_optional() {
        let blog = parse(r#"{"title":"t","content":"c","author":"a","category":"k"}"#)
            .into_new_blog()
            .expect("complete request");
        assert!(blog.external_link.is_none());
    }

    #[test]
    fn each_required_field_is_checked() {
        for missing in ["title", "content", "author", "category"] {
            let mut body = serde_json::json!({
                "title": "t", "content": "c", "author": "a", "category": "k"
            });
            body.as_object_mut().unwrap().remove(missing);
            let req: CreateBlogRequest = serde_json::from_value(body.clone()).unwrap();
            assert!(req.into_new_blog().is_none(), "missing {missing}");

            body[missing] = serde_json::json!("");
            let req: CreateBlogRequest = serde_json::from_value(body).unwrap();
            assert!(req.into_new_blog().is_none(), "empty {missing}");
        }
    }

    #[test]
    fn update_request_ignores_author() {
        let req: UpdateBlogRequest =
            serde_json::from_str(r#"{"title":"new","author":"mallory"}"#).unwrap();
        let patch = BlogPatch::from(req);
        assert_eq!(patch.title.as_deref(), Some("new"));
        assert!(patch.content.is_none());
        assert!(patch.external_link.is_none());
    }

    #[test]
    fn update_request_distinguishes_null_link_from_absent() {
        let req: UpdateBlogRequest = serde_json::from_str(r#"{"externalLink":null}"#).unwrap();
        assert_eq!(req.external_link, Some(None));

        let req: UpdateBlogRequest =
            serde_json::from_str(r#"{"externalLink":"https://x.io"}"#).unwrap();
        assert_eq!(req.external_link, Some(Some("https://x.io".to_string())));

        let req: UpdateBlogRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.external_link, None);
    }
}
