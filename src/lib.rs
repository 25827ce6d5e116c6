pub mod analytics;
pub mod api;
pub mod comparison;
pub mod config;
pub mod display;
pub mod utils;

// Re-export the main error types for convenience
pub use api::client::FetchError;
pub use comparison::session::SessionError;

// Re-export the backend boundary
pub use api::client::{CompareOutcome, CompareRequest, ComparisonBackend, HttpBackend, ProductUrl};

// Re-export the session core
pub use comparison::history::{HistoryCache, HistoryEntry, HISTORY_CAPACITY};
pub use comparison::models::{
    AiBreakdown, ComparisonResult, Marketplace, PriceDifference, Product, ProductSpecs, Review,
    Winner,
};
pub use comparison::session::{
    ComparisonSession, SessionPhase, SessionState, SubmitOutcome, VALIDATION_MESSAGE,
};

// Re-export analytics modules
pub use analytics::dashboard::{DashboardService, DashboardSnapshot, LocalStats};

// Re-export display helpers
pub use config::BackendConfig;
pub use display::reviews::{ReviewPaginationState, COLLAPSED_REVIEW_LIMIT};
pub use display::stars::{star_display, StarDisplay};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Test that the main modules are accessible
        assert!(std::any::type_name::<api::client::HttpBackend>().contains("HttpBackend"));
        assert!(std::any::type_name::<comparison::session::ComparisonSession>()
            .contains("ComparisonSession"));
    }

    #[test]
    fn test_public_api_availability() {
        // Test that key public types are available from the crate root
        let _: Option<ComparisonResult> = None;
        let _: Option<HistoryEntry> = None;
        let _: Option<DashboardSnapshot> = None;
        let _: Option<StarDisplay> = None;

        let stats = LocalStats::default();
        assert_eq!(stats.wins_for(Marketplace::Flipkart), 0);
        assert_eq!(HISTORY_CAPACITY, 20);
        assert_eq!(COLLAPSED_REVIEW_LIMIT, 3);
    }

    #[test]
    fn test_error_types_re_exported() {
        // Test that error types are available from the crate root
        let _session_error = SessionError::Validation(VALIDATION_MESSAGE.to_string());
        let _fetch_error = FetchError::Other(anyhow::anyhow!("test"));
    }
}
