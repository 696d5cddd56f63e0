use crate::AppState;
use crate::api::error::AppError;
use crate::models::{BlogPost, BlogPostCreate};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct BlogListQuery {
    /// Restrict results to one category
    pub category: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/blog",
    request_body = BlogPostCreate,
    responses(
        (status = 200, description = "Blog post created", body = BlogPost),
        (status = 400, description = "Invalid payload or duplicate slug")
    )
)]
pub async fn create_blog_post(
    State(state): State<AppState>,
    Json(req): Json<BlogPostCreate>,
) -> Result<Json<BlogPost>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let post = req.into_post();
    let result = sqlx::query(
        "INSERT INTO blog_posts \
         (id, title, slug, excerpt, content, category, author, image_url, published_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&post.id)
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(&post.category)
    .bind(&post.author)
    .bind(&post.image_url)
    .bind(post.published_at)
    .bind(post.updated_at)
    .execute(&state.db)
    .await;

    match result {
        Ok(_) => Ok(Json(post)),
        Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => Err(
            AppError::BadRequest(format!("slug already exists: {}", post.slug)),
        ),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/api/blog",
    params(BlogListQuery),
    responses(
        (status = 200, description = "Latest blog posts", body = [BlogPost])
    )
)]
pub async fn list_blog_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = match query.category {
        Some(category) => {
            sqlx::query_as::<_, BlogPost>(
                "SELECT * FROM blog_posts WHERE category = ? \
                 ORDER BY published_at DESC LIMIT 100",
            )
            .bind(category)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, BlogPost>(
                "SELECT * FROM blog_posts ORDER BY published_at DESC LIMIT 100",
            )
            .fetch_all(&state.db)
            .await?
        }
    };
    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/api/blog/{slug}",
    params(
        ("slug" = String, Path, description = "Blog post slug")
    ),
    responses(
        (status = 200, description = "Blog post", body = BlogPost),
        (status = 404, description = "Blog post not found")
    )
)]
pub async fn get_blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let post = sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE slug = ?")
        .bind(&slug)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;
    Ok(Json(post))
}
