// Library server implementations
// This exposes the catalogue's GraphQL schema over HTTP

//! # Server Module
//!
//! The server layer sits on top of the engine layer and makes the schema
//! reachable over the network:
//! ```text
//! Client (browser, Apollo, curl)
//!        ↓ HTTP/GraphQL
//! Server Layer (this module) ← axum router, GraphiQL, health check
//!        ↓ Function calls
//! Engine Layer ← GraphQL schema, library service, storage
//! ```
//!
//! ## Rust Learning Notes:
//!
//! This module demonstrates:
//! - Builder pattern for server configuration
//! - Sharing state with axum handlers through `State<Arc<_>>`
//! - Testing a router in-process with `tower::ServiceExt::oneshot`

/// GraphQL HTTP server implementation
pub mod graphql;

pub use graphql::{build_router, GraphQLServer, GraphQLServerBuilder, GraphQLServerConfig};
