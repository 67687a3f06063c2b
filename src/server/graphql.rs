// GraphQL HTTP server for the library catalogue
// This serves the schema over axum, with a GraphiQL page and a health check

use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router, Server,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::engine::{
    graphql::{create_schema_with_library, LibrarySchema},
    library::Library,
    seed,
    storage::{InMemoryStorage, LibraryStorage},
};
use crate::{LibraryError, Result};

/// GraphQL server configuration
#[derive(Debug, Clone)]
pub struct GraphQLServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    /// Load the sample catalogue before serving
    pub seed: bool,
}

impl Default for GraphQLServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_enabled: true,
            seed: false,
        }
    }
}

/// Shared state handed to every handler
struct AppState {
    schema: LibrarySchema,
    backend: &'static str,
}

/// GraphQL server
pub struct GraphQLServer {
    config: GraphQLServerConfig,
    storage: Arc<dyn LibraryStorage>,
}

impl GraphQLServer {
    pub fn new() -> Self {
        Self {
            config: GraphQLServerConfig::default(),
            storage: Arc::new(InMemoryStorage::default()),
        }
    }

    pub fn with_config(mut self, config: GraphQLServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn LibraryStorage>) -> Self {
        self.storage = storage;
        self
    }

    /// Serve until the process receives Ctrl-C
    pub async fn run(self) -> Result<()> {
        let backend = self.storage.backend_name();
        let library = Library::new(self.storage);

        if self.config.seed {
            seed::seed(&library).await?;
        }

        info!("📚 Starting server with {} storage", backend);
        let app = build_router(
            create_schema_with_library(library),
            backend,
            self.config.cors_enabled,
        );

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| {
                LibraryError::Config(format!(
                    "Invalid listen address {}:{}: {}",
                    self.config.host, self.config.port, e
                ))
            })?;

        let server = Server::try_bind(&addr)
            .map_err(|e| LibraryError::Config(format!("Cannot listen on {}: {}", addr, e)))?
            .serve(app.into_make_service());

        info!("🚀 Server ready at http://{}", server.local_addr());
        info!("🔗 GraphQL endpoint: http://{}/graphql", server.local_addr());

        server
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| LibraryError::Internal(format!("Server error: {}", e)))?;

        info!("👋 Server stopped");
        Ok(())
    }
}

impl Default for GraphQLServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`GraphQLServer`]
pub struct GraphQLServerBuilder {
    server: GraphQLServer,
}

impl GraphQLServerBuilder {
    pub fn new() -> Self {
        Self {
            server: GraphQLServer::new(),
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn LibraryStorage>) -> Self {
        self.server = self.server.with_storage(storage);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.config.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server.config.port = port;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.server.config.cors_enabled = enabled;
        self
    }

    pub fn with_seed(mut self, seed: bool) -> Self {
        self.server.config.seed = seed;
        self
    }

    pub fn build(self) -> GraphQLServer {
        self.server
    }

    pub async fn build_and_run(self) -> Result<()> {
        self.server.run().await
    }
}

impl Default for GraphQLServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes: GraphiQL on `GET /`, queries on `POST /` and `POST /graphql`,
/// and `GET /health`
pub fn build_router(schema: LibrarySchema, backend: &'static str, cors_enabled: bool) -> Router {
    let state = Arc::new(AppState { schema, backend });

    let app = Router::new()
        .route("/", get(graphiql).post(graphql_handler))
        .route("/graphql", post(graphql_handler))
        .route("/health", get(health_check))
        .with_state(state);

    if cors_enabled {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

// GraphQL handler
async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

// GraphiQL interface
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!("Library GraphQL server is running ({} storage)", state.backend),
    )
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; keep serving
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::create_schema;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        let schema = create_schema(Arc::new(InMemoryStorage::default()));
        build_router(schema, "memory", true)
    }

    async fn post_query(app: Router, uri: &str, query: &str) -> Value {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_graphql_endpoint() {
        let body = post_query(router(), "/graphql", "{ bookCount authorCount }").await;
        assert_eq!(body, json!({ "data": { "bookCount": 0, "authorCount": 0 } }));
    }

    #[tokio::test]
    async fn test_root_accepts_queries() {
        let body = post_query(
            router(),
            "/",
            r#"mutation { addAuthor(name: "Sandi Metz") { name born } }"#,
        )
        .await;
        assert_eq!(
            body,
            json!({ "data": { "addAuthor": { "name": "Sandi Metz", "born": null } } })
        );
    }

    #[tokio::test]
    async fn test_health_check_names_backend() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("memory"));
    }

    #[tokio::test]
    async fn test_graphiql_page() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("graphiql"));
    }

    #[test]
    fn test_builder_applies_settings() {
        let server = GraphQLServerBuilder::new()
            .with_host("127.0.0.1")
            .with_port(4100)
            .with_cors(false)
            .with_seed(true)
            .build();

        assert_eq!(server.config.host, "127.0.0.1");
        assert_eq!(server.config.port, 4100);
        assert!(!server.config.cors_enabled);
        assert!(server.config.seed);
        assert_eq!(server.storage.backend_name(), "memory");
    }
}
