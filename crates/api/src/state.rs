use std::sync::Arc;

use visabuddy_ai::AiClient;
use visabuddy_core::country::CountryRegistry;
use visabuddy_core::visa_type::VisaTypeAliases;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The registry and alias tables are immutable values loaded
/// once at startup and injected here so tests can substitute fixtures.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: visabuddy_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Canonical country table with alias resolution.
    pub countries: Arc<CountryRegistry>,
    /// Per-country visa-type alias table.
    pub visa_aliases: Arc<VisaTypeAliases>,
    /// AI-fallback collaborator; `None` when not configured, in which
    /// case generation for keys without approved rules fails explicitly.
    pub ai: Option<Arc<AiClient>>,
}
