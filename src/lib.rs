//! # Faultline
//!
//! Declarative exception-to-HTTP-response translation for Axum services.
//!
//! Faultline is a global exception filter: an ordered table of rules,
//! each mapping one concrete error type to a friendly message, an HTTP
//! status code and optional error metadata. When a request fails, the
//! first applicable rule (exact type match, optional guard predicate)
//! shapes the structured JSON error the client sees; with no applicable
//! rule the error either becomes a generic caught 500 or propagates
//! untouched, depending on configuration.
//!
//! ## Features
//!
//! - **Declarative rules**: per-error-type status, message and metadata,
//!   frozen at startup through a typed builder
//! - **Exact-type matching**: a rule for one error type never swallows
//!   other types, wrappers, or source chains
//! - **First-match-wins lookup**: ordered rules with optional guard
//!   predicates, short-circuiting on the first match
//! - **Stable wire contract**: `Message` / `ErrorCode` / `ErrorReference`
//!   payload with conditional field presence
//! - **Tower integration**: drop-in `Layer` for services whose error
//!   type converts into `Box<dyn Error + Send + Sync>`
//!
//! ## Quick Start
//!
//! ```rust
//! use axum::http::StatusCode;
//! use faultline::{
//!     ExceptionFilterLayer, ExceptionRule, ExceptionRuleSet, GlobalExceptionFilter,
//! };
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("order not found")]
//! struct OrderNotFound;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("invalid {field}")]
//! struct ValidationFailed {
//!     field: String,
//! }
//!
//! // 1. Declare the rules
//! let mut rules = ExceptionRuleSet::new();
//! rules.push(
//!     ExceptionRule::builder::<OrderNotFound>()
//!         .message("The requested order does not exist")
//!         .status(StatusCode::NOT_FOUND)
//!         .build(),
//! );
//! rules.push(
//!     ExceptionRule::builder::<ValidationFailed>()
//!         .message_fn(|e| format!("Invalid: {}", e.field))
//!         .status(StatusCode::BAD_REQUEST)
//!         .error_code("VAL001")
//!         .build(),
//! );
//!
//! // 2. Build the filter and its layer
//! let filter = GlobalExceptionFilter::new(rules, false);
//! let layer = ExceptionFilterLayer::new(filter);
//!
//! // 3. Install the layer on any tower service whose error type
//! //    converts into `Box<dyn Error + Send + Sync>`.
//! # let _ = layer;
//! ```
//!
//! Unmatched errors propagate out of the middleware unchanged (or, with
//! `catch_unfiltered` enabled, become a generic 500 carrying the error's
//! own message). Rules can only be declared for concrete error types;
//! a rule targeting the erased boxed error type itself does not compile.

pub mod error;
pub mod filter;
pub mod response;
pub mod rule;

// Re-export core types
pub use error::{BoxError, DynException};
pub use filter::layer::{ExceptionFilterLayer, ExceptionFilterMiddleware};
pub use filter::{ExceptionFilter, GlobalExceptionFilter, TranslationOutcome};
pub use response::{ErrorPayload, ErrorResponse};
pub use rule::set::ExceptionRuleSet;
pub use rule::{ExceptionRule, ExceptionRuleBuilder};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use faultline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{BoxError, DynException};
    pub use crate::filter::layer::{ExceptionFilterLayer, ExceptionFilterMiddleware};
    pub use crate::filter::{ExceptionFilter, GlobalExceptionFilter, TranslationOutcome};
    pub use crate::response::{ErrorPayload, ErrorResponse};
    pub use crate::rule::set::ExceptionRuleSet;
    pub use crate::rule::{ExceptionRule, ExceptionRuleBuilder};
    pub use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    };
}
