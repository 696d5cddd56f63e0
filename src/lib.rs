pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::services::lifecycle::LifecycleTracker;
use crate::services::storage::UploadStore;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::root,
        api::handlers::blog::create_blog_post,
        api::handlers::blog::list_blog_posts,
        api::handlers::blog::get_blog_post,
        api::handlers::contact::create_contact_message,
        api::handlers::convert::pdf_to_word,
        api::handlers::convert::word_to_pdf,
        api::handlers::convert::image_to_pdf,
        api::handlers::convert::pdf_to_image,
        api::handlers::convert::image_to_text,
        api::handlers::convert::merge_pdf,
        api::handlers::convert::split_pdf,
        api::handlers::convert::compress_pdf,
        api::handlers::convert::rotate_pdf,
        api::handlers::convert::excel_to_pdf,
        api::handlers::convert::image_format,
    ),
    components(
        schemas(
            models::BlogPost,
            models::BlogPostCreate,
            models::ContactMessage,
            models::ContactMessageCreate,
            api::handlers::convert::OcrResponse,
        )
    ),
    tags(
        (name = "blog", description = "Blog content endpoints"),
        (name = "contact", description = "Contact form endpoint"),
        (name = "convert", description = "Document conversion endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub store: UploadStore,
    pub tracker: LifecycleTracker,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api = Router::new()
        .route("/", get(api::handlers::health::root))
        .route(
            "/blog",
            post(api::handlers::blog::create_blog_post).get(api::handlers::blog::list_blog_posts),
        )
        .route("/blog/:slug", get(api::handlers::blog::get_blog_post))
        .route(
            "/contact",
            post(api::handlers::contact::create_contact_message),
        )
        .route(
            "/convert/pdf-to-word",
            post(api::handlers::convert::pdf_to_word),
        )
        .route(
            "/convert/word-to-pdf",
            post(api::handlers::convert::word_to_pdf),
        )
        .route(
            "/convert/image-to-pdf",
            post(api::handlers::convert::image_to_pdf),
        )
        .route(
            "/convert/pdf-to-image",
            post(api::handlers::convert::pdf_to_image),
        )
        .route(
            "/convert/image-to-text",
            post(api::handlers::convert::image_to_text),
        )
        .route("/convert/merge-pdf", post(api::handlers::convert::merge_pdf))
        .route("/convert/split-pdf", post(api::handlers::convert::split_pdf))
        .route(
            "/convert/compress-pdf",
            post(api::handlers::convert::compress_pdf),
        )
        .route(
            "/convert/rotate-pdf",
            post(api::handlers::convert::rotate_pdf),
        )
        .route(
            "/convert/excel-to-pdf",
            post(api::handlers::convert::excel_to_pdf),
        )
        .route(
            "/convert/image-format",
            post(api::handlers::convert::image_format),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
