use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_AUTHOR: &str = "ConvertDocs Team";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BlogPostCreate {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 300))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub excerpt: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub image_url: Option<String>,
}

impl BlogPostCreate {
    pub fn into_post(self) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            category: self.category,
            author: DEFAULT_AUTHOR.to_string(),
            image_url: self.image_url,
            published_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ContactMessageCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 300))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
}

impl ContactMessageCreate {
    pub fn into_message(self) -> ContactMessage {
        ContactMessage {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_post_defaults() {
        let post = BlogPostCreate {
            title: "Merging PDFs".to_string(),
            slug: "merging-pdfs".to_string(),
            excerpt: "How to merge".to_string(),
            content: "<p>Merge</p>".to_string(),
            category: "How-To".to_string(),
            image_url: None,
        }
        .into_post();

        assert_eq!(post.author, DEFAULT_AUTHOR);
        assert_eq!(post.published_at, post.updated_at);
        assert!(Uuid::parse_str(&post.id).is_ok());
    }

    #[test]
    fn test_contact_email_validation() {
        let bad = ContactMessageCreate {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        };
        assert!(bad.validate().is_err());

        let good = ContactMessageCreate {
            email: "user@example.com".to_string(),
            ..bad
        };
        assert!(good.validate().is_ok());
    }
}
