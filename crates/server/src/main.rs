//! Blogsmith Server
//!
//! Axum server exposing the blog generation pipeline over HTTP, plus a
//! small CLI for running the pipeline without the server.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use blogsmith_core::models::{LlmProvider, ModelConfig};
use blogsmith_core::pipeline::{
    Coordinator, PipelineConfig, PipelineEvent, PipelineEventKind,
};
use blogsmith_core::render::{DocumentRenderer, RenderedDocument};
use blogsmith_core::skills::create_crew;
use blogsmith_core::state::{BlogDb, BlogPost, PostManager};
use clap::{Parser, Subcommand};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::{
    net::TcpListener,
    sync::{broadcast, mpsc, RwLock},
};
use utoipa::{OpenApi, ToSchema};

/// Application state
struct AppState {
    /// Unified database for posts and prompts
    db: Arc<BlogDb>,
    /// Fan-out channel for pipeline events (SSE)
    event_tx: broadcast::Sender<PipelineEvent>,
    status: RwLock<GenerationStatus>,
}

type SharedState = Arc<AppState>;

#[derive(Default, Clone, Serialize, ToSchema)]
struct GenerationStatus {
    status: String,
    active_role: Option<String>,
}

// === API Types ===

#[derive(Deserialize, ToSchema)]
struct GeneratePostRequest {
    /// Post title; a missing field is treated as empty and rejected
    title: Option<String>,
    /// Free-text topic brief
    prompts: Option<String>,
    settings: Option<ApiSettings>,
}

#[derive(Deserialize, ToSchema)]
struct ApiSettings {
    provider: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    curator_model: Option<String>,
    include_editor: Option<bool>,
}

#[derive(Serialize, ToSchema)]
struct PostResponse {
    id: String,
    title: String,
    prompts: String,
    generated_content: String,
    markdown_content: String,
    created_at: String,
    updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdf_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize, ToSchema)]
struct ApiResponse {
    success: bool,
    message: String,
}

#[derive(Serialize, ToSchema)]
struct PromptListItem {
    slug: String,
    version: i32,
}

#[derive(Serialize, ToSchema)]
struct PromptListResponse {
    prompts: Vec<PromptListItem>,
}

#[derive(Serialize, ToSchema)]
struct PromptResponse {
    slug: String,
    content: String,
    version: i32,
}

#[derive(Deserialize, ToSchema)]
struct UpdatePromptRequest {
    content: String,
}

#[derive(Serialize, ToSchema)]
struct UpdatePromptResponse {
    success: bool,
    slug: String,
    new_version: i32,
}

#[derive(Serialize, ToSchema)]
struct ProviderInfo {
    id: String,
    name: String,
    default_model: String,
    supports_base_url: bool,
    env_var: String,
}

#[derive(Serialize, ToSchema)]
struct ProvidersResponse {
    providers: Vec<ProviderInfo>,
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blogsmith API",
        version = "1.0.0",
        description = "API for the Blogsmith agent-pipeline blog generator"
    ),
    paths(
        generate_post,
        list_posts,
        get_post,
        delete_post,
        get_status,
        list_prompts,
        get_prompt,
        update_prompt,
        get_providers
    ),
    components(
        schemas(
            GenerationStatus,
            GeneratePostRequest,
            ApiSettings,
            PostResponse,
            ErrorResponse,
            ApiResponse,
            PromptListResponse,
            PromptListItem,
            PromptResponse,
            UpdatePromptRequest,
            UpdatePromptResponse,
            ProvidersResponse,
            ProviderInfo
        )
    ),
    tags(
        (name = "posts", description = "Blog post generation and retrieval"),
        (name = "prompts", description = "Role prompt management"),
        (name = "providers", description = "LLM provider discovery")
    )
)]
struct ApiDoc;

// === Helpers ===

/// Pull the title and prompts out of a generation request, rejecting
/// blank or missing fields before any pipeline work starts.
fn validate_generate_request(req: &GeneratePostRequest) -> Result<(String, String), String> {
    let title = req.title.clone().unwrap_or_default();
    let prompts = req.prompts.clone().unwrap_or_default();
    if title.trim().is_empty() || prompts.trim().is_empty() {
        return Err("Title and prompts are required".to_string());
    }
    Ok((title, prompts))
}

fn pipeline_config_from(settings: &Option<ApiSettings>) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Some(settings) = settings {
        if let Some(ref p) = settings.provider {
            config.global_provider = match p.as_str() {
                "anthropic" => LlmProvider::Anthropic,
                "openai" => LlmProvider::OpenAI,
                "openrouter" => LlmProvider::OpenRouter,
                _ => LlmProvider::Anthropic, // fallback
            };
        }
        if let Some(ref m) = settings.model {
            config.global_model = Some(m.clone());
        }
        if let Some(ref url) = settings.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(ref m) = settings.curator_model {
            config.curator_model = Some(m.clone());
        }
        if let Some(include_editor) = settings.include_editor {
            config.include_editor = include_editor;
        }
    }
    config
}

fn post_response(post: &BlogPost, rendered: Option<RenderedDocument>) -> PostResponse {
    let (pdf_base64, html) = match rendered {
        Some(doc) => (Some(doc.pdf_base64), Some(doc.html)),
        None => (None, None),
    };
    PostResponse {
        id: post.id.clone(),
        title: post.title.clone(),
        prompts: post.prompts.clone(),
        generated_content: post.generated_content.clone(),
        markdown_content: post.markdown_content.clone(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
        pdf_base64,
        html,
    }
}

fn pdf_cache_path(id: &str) -> PathBuf {
    PathBuf::from(".blogsmith/pdfs").join(format!("{}.pdf", id))
}

/// Write the rendered PDF next to the database so DELETE has a file
/// to clean up. Failure here never fails the request.
fn cache_pdf(id: &str, doc: &RenderedDocument) {
    let path = pdf_cache_path(id);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match DocumentRenderer::decode_pdf(&doc.pdf_base64) {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(&path, bytes) {
                tracing::warn!("Failed to cache PDF for {}: {}", id, e);
            }
        }
        Err(e) => tracing::warn!("Failed to decode PDF for {}: {}", id, e),
    }
}

/// Best-effort regeneration of the PDF/HTML for a stored post.
/// Read paths never fail because rendering failed.
fn render_for_read(post: &BlogPost) -> Option<RenderedDocument> {
    match DocumentRenderer::render(&post.markdown_content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!("Error generating PDF for post {}: {}", post.id, e);
            None
        }
    }
}

// === API Handlers ===

/// Generate a new blog post
#[utoipa::path(
    post,
    path = "/api/v1/posts/generate",
    tag = "posts",
    request_body = GeneratePostRequest,
    responses(
        (status = 201, description = "Post generated", body = PostResponse),
        (status = 400, description = "Missing title or prompts", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
async fn generate_post(
    State(state): State<SharedState>,
    Json(req): Json<GeneratePostRequest>,
) -> Response {
    let (title, prompts) = match validate_generate_request(&req) {
        Ok(fields) => fields,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
        }
    };

    {
        let mut status = state.status.write().await;
        status.status = "running".to_string();
        status.active_role = None;
    }

    tracing::info!("Generating blog post: {}", title);

    // Bridge coordinator events into the broadcast channel and the
    // status line.
    let (tx, mut rx) = mpsc::channel::<PipelineEvent>(64);
    let forward_state = Arc::clone(&state);
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.kind {
                PipelineEventKind::StepStarted => {
                    let mut status = forward_state.status.write().await;
                    status.active_role = Some(event.role.clone());
                }
                PipelineEventKind::StepCompleted => {
                    let mut status = forward_state.status.write().await;
                    status.active_role = None;
                }
                _ => {}
            }
            let _ = forward_state.event_tx.send(event);
        }
    });

    let config = pipeline_config_from(&req.settings);
    let mut coordinator = Coordinator::new(config).with_event_channel(tx);

    let markdown = match coordinator.run(&title, &prompts).await {
        Ok(markdown) => markdown,
        Err(e) => {
            let mut status = state.status.write().await;
            status.status = "failed".to_string();
            status.active_role = None;
            tracing::error!("Error generating blog: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response();
        }
    };

    // Create the post only after successful content generation.
    let pm = PostManager::new(&state.db);
    let blog_post = match pm.create(&title, &prompts, &markdown) {
        Ok(post) => post,
        Err(e) => {
            let mut status = state.status.write().await;
            status.status = "failed".to_string();
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    {
        let mut status = state.status.write().await;
        status.status = "complete".to_string();
        status.active_role = None;
    }

    // If PDF conversion fails, still return the post without a PDF.
    match DocumentRenderer::render(&markdown) {
        Ok(doc) => {
            cache_pdf(&blog_post.id, &doc);
            (
                StatusCode::CREATED,
                Json(post_response(&blog_post, Some(doc))),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("PDF conversion failed for {}: {}", blog_post.id, e);
            (StatusCode::CREATED, Json(post_response(&blog_post, None))).into_response()
        }
    }
}

/// List all posts
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All stored posts", body = [PostResponse])
    )
)]
async fn list_posts(State(state): State<SharedState>) -> Json<Vec<PostResponse>> {
    let pm = PostManager::new(&state.db);
    match pm.list_all() {
        Ok(posts) => Json(
            posts
                .iter()
                .map(|post| post_response(post, render_for_read(post)))
                .collect(),
        ),
        Err(_) => Json(vec![]),
    }
}

/// Retrieve a post with a freshly rendered PDF
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "Unknown post", body = ErrorResponse)
    )
)]
async fn get_post(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let pm = PostManager::new(&state.db);
    match pm.load(&id) {
        Ok(post) => Json(post_response(&post, render_for_read(&post))).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Post {} not found", id),
            }),
        )
            .into_response(),
    }
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = ApiResponse)
    )
)]
async fn delete_post(State(state): State<SharedState>, Path(id): Path<String>) -> Json<ApiResponse> {
    // Clean up the cached PDF if it exists.
    let _ = std::fs::remove_file(pdf_cache_path(&id));

    let pm = PostManager::new(&state.db);
    match pm.delete(&id) {
        Ok(_) => Json(ApiResponse {
            success: true,
            message: format!("Post {} deleted", id),
        }),
        Err(e) => Json(ApiResponse {
            success: false,
            message: e.to_string(),
        }),
    }
}

/// Get pipeline status
#[utoipa::path(
    get,
    path = "/api/v1/posts/status",
    tag = "posts",
    responses(
        (status = 200, description = "Current generation status", body = GenerationStatus)
    )
)]
async fn get_status(State(state): State<SharedState>) -> Json<GenerationStatus> {
    let status = state.status.read().await;
    Json(status.clone())
}

/// SSE endpoint for real-time pipeline events with heartbeat
async fn events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    // Use timeout-based stream with heartbeat every 15 seconds
    let stream = stream::unfold(rx, |mut rx| async move {
        let timeout = tokio::time::timeout(std::time::Duration::from_secs(15), rx.recv()).await;

        match timeout {
            Ok(Ok(event)) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                Some((Ok(Event::default().data(json)), rx))
            }
            Ok(Err(broadcast::error::RecvError::Lagged(_))) => {
                Some((Ok(Event::default().comment("lagged")), rx))
            }
            Ok(Err(broadcast::error::RecvError::Closed)) => None,
            Err(_) => {
                // Timeout - send heartbeat comment
                Some((Ok(Event::default().comment("heartbeat")), rx))
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// === Prompt Handlers ===

/// List all role prompts
#[utoipa::path(
    get,
    path = "/api/v1/prompts",
    tag = "prompts",
    responses(
        (status = 200, description = "All role prompts", body = PromptListResponse)
    )
)]
async fn list_prompts(State(state): State<SharedState>) -> Json<PromptListResponse> {
    match state.db.list_prompts() {
        Ok(prompts) => Json(PromptListResponse {
            prompts: prompts
                .into_iter()
                .map(|(slug, version)| PromptListItem { slug, version })
                .collect(),
        }),
        Err(_) => Json(PromptListResponse { prompts: vec![] }),
    }
}

/// Get a role prompt
#[utoipa::path(
    get,
    path = "/api/v1/prompts/{slug}",
    tag = "prompts",
    params(("slug" = String, Path, description = "Prompt slug")),
    responses(
        (status = 200, description = "Prompt content", body = PromptResponse)
    )
)]
async fn get_prompt(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Json<PromptResponse> {
    match state.db.get_prompt_versioned(&slug) {
        Ok((content, version)) => Json(PromptResponse {
            slug,
            content,
            version,
        }),
        Err(_) => Json(PromptResponse {
            slug,
            content: "".to_string(),
            version: 0,
        }),
    }
}

/// Update a role prompt
#[utoipa::path(
    put,
    path = "/api/v1/prompts/{slug}",
    tag = "prompts",
    params(("slug" = String, Path, description = "Prompt slug")),
    request_body = UpdatePromptRequest,
    responses(
        (status = 200, description = "Prompt updated", body = UpdatePromptResponse)
    )
)]
async fn update_prompt(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdatePromptRequest>,
) -> Json<UpdatePromptResponse> {
    match state.db.set_prompt(&slug, &req.content) {
        Ok(new_version) => Json(UpdatePromptResponse {
            success: true,
            slug,
            new_version,
        }),
        Err(_) => Json(UpdatePromptResponse {
            success: false,
            slug,
            new_version: 0,
        }),
    }
}

/// List LLM providers
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "providers",
    responses(
        (status = 200, description = "Available LLM providers", body = ProvidersResponse)
    )
)]
async fn get_providers() -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: LlmProvider::all()
            .into_iter()
            .map(|p| ProviderInfo {
                id: serde_json::to_value(&p)
                    .ok()
                    .and_then(|v| v.as_str().map(|s| s.to_string()))
                    .unwrap_or_default(),
                name: p.display_name().to_string(),
                default_model: p.default_model().to_string(),
                supports_base_url: p.supports_base_url(),
                env_var: p.env_var().to_string(),
            })
            .collect(),
    })
}

async fn serve_openapi() -> Json<serde_json::Value> {
    Json(serde_json::to_value(ApiDoc::openapi()).unwrap_or_default())
}

/// A2A discovery card built from the crew roster
async fn serve_agent_card() -> Json<serde_json::Value> {
    let crew = create_crew(ModelConfig::default());
    Json(serde_json::json!({
        "name": "Blogsmith",
        "description": "Agent pipeline that researches, curates, outlines, writes and edits blog posts.",
        "version": env!("CARGO_PKG_VERSION"),
        "agent_count": crew.len(),
        "skills": [
            { "id": "research", "name": "Research Specialist" },
            { "id": "curate", "name": "Image Curator" },
            { "id": "organize", "name": "Content Organizer" },
            { "id": "write", "name": "Content Writer" },
            { "id": "edit", "name": "Content Editor" }
        ]
    }))
}

// === CLI ===

#[derive(Parser)]
#[command(name = "blogsmith", about = "Agent-pipeline blog generator")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start the HTTP server
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run the pipeline once and print the Markdown
    Generate {
        /// Post title
        title: String,
        /// Free-text topic brief
        #[arg(long)]
        prompts: String,
        /// Skip the editor step
        #[arg(long)]
        no_editor: bool,
    },
    /// Create the .blogsmith data directory and seed prompts
    Init,
}

async fn run_server(port: u16) -> anyhow::Result<()> {
    let db = Arc::new(BlogDb::open()?);
    if let Err(e) = db.seed_prompts() {
        tracing::warn!("Failed to seed prompts: {}", e);
    }

    let (event_tx, _) = broadcast::channel::<PipelineEvent>(256);

    let state: SharedState = Arc::new(AppState {
        db,
        event_tx,
        status: RwLock::new(GenerationStatus {
            status: "idle".to_string(),
            active_role: None,
        }),
    });

    let post_routes = Router::new()
        .route("/", get(list_posts))
        .route("/generate", post(generate_post))
        .route("/status", get(get_status))
        .route("/events", get(events))
        .route("/:id", get(get_post).delete(delete_post));

    let prompt_routes = Router::new()
        .route("/", get(list_prompts))
        .route("/:slug", get(get_prompt).put(update_prompt));

    let app = Router::new()
        .nest("/api/v1/posts", post_routes)
        .nest("/api/v1/prompts", prompt_routes)
        .route("/api/v1/providers", get(get_providers))
        .route("/api/v1/openapi.json", get(serve_openapi))
        // A2A Discovery endpoint
        .route("/.well-known/agent-card.json", get(serve_agent_card))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Blogsmith server running at http://{}", addr);
    println!("   Posts:     /api/v1/posts, /generate, /status, /events");
    println!("   Prompts:   /api/v1/prompts");
    println!("   Providers: /api/v1/providers");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_generate(title: &str, prompts: &str, no_editor: bool) -> anyhow::Result<()> {
    let config = PipelineConfig {
        include_editor: !no_editor,
        ..PipelineConfig::default()
    };
    let mut coordinator = Coordinator::new(config);
    let markdown = coordinator.run(title, prompts).await?;

    let db = BlogDb::open()?;
    let pm = PostManager::new(&db);
    let post = pm.create(title, prompts, &markdown)?;

    println!("{}", markdown);
    eprintln!("Saved post {}", post.id);
    Ok(())
}

fn run_init() -> anyhow::Result<()> {
    std::fs::create_dir_all(".blogsmith")?;
    std::fs::write(".blogsmith/.gitignore", "# Never commit secrets\n.env\n*.env\n*.db\n")?;
    let db = BlogDb::open()?;
    let seeded = db.seed_prompts()?;
    println!("Blogsmith initialized ({} prompts seeded)", seeded);
    println!("Run `blogsmith serve` to start the server");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Some(CliCommand::Generate {
            title,
            prompts,
            no_editor,
        }) => run_generate(&title, &prompts, no_editor).await,
        Some(CliCommand::Init) => run_init(),
        Some(CliCommand::Serve { port }) => run_server(port).await,
        None => run_server(8080).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: Option<&str>, prompts: Option<&str>) -> GeneratePostRequest {
        GeneratePostRequest {
            title: title.map(str::to_string),
            prompts: prompts.map(str::to_string),
            settings: None,
        }
    }

    #[test]
    fn test_missing_or_blank_fields_are_rejected() {
        // A pipeline must never start for blank input.
        for req in [
            request(None, Some("topics")),
            request(Some("Title"), None),
            request(Some(""), Some("topics")),
            request(Some("  "), Some(" ")),
        ] {
            let err = validate_generate_request(&req).unwrap_err();
            assert_eq!(err, "Title and prompts are required");
        }
    }

    #[test]
    fn test_valid_request_passes_through() {
        let (title, prompts) =
            validate_generate_request(&request(Some("Rust in 2026"), Some("adoption"))).unwrap();
        assert_eq!(title, "Rust in 2026");
        assert_eq!(prompts, "adoption");
    }

    #[test]
    fn test_pipeline_config_from_settings() {
        let settings = Some(ApiSettings {
            provider: Some("openai".to_string()),
            model: Some("gpt-4o".to_string()),
            base_url: None,
            curator_model: None,
            include_editor: Some(false),
        });
        let config = pipeline_config_from(&settings);
        assert_eq!(config.global_provider, LlmProvider::OpenAI);
        assert_eq!(config.global_model.as_deref(), Some("gpt-4o"));
        assert!(!config.include_editor);
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        let settings = Some(ApiSettings {
            provider: Some("mystery".to_string()),
            model: None,
            base_url: None,
            curator_model: None,
            include_editor: None,
        });
        let config = pipeline_config_from(&settings);
        assert_eq!(config.global_provider, LlmProvider::Anthropic);
    }

    #[test]
    fn test_pdf_cache_path() {
        let path = pdf_cache_path("p-20260101-000000000");
        assert!(path.ends_with("p-20260101-000000000.pdf"));
    }
}
