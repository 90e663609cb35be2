use axum::http::StatusCode;

use crate::error::DynException;
use crate::response::{ErrorPayload, ErrorResponse};
use crate::rule::set::ExceptionRuleSet;

pub mod layer;

/// Disposition of one intercepted exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Write this structured error to the client; the original exception
    /// stops propagating.
    Respond(ErrorResponse),
    /// No response was produced; the exception continues unchanged and
    /// the host's default handling applies.
    Propagate,
}

impl TranslationOutcome {
    pub fn is_respond(&self) -> bool {
        matches!(self, TranslationOutcome::Respond(_))
    }
}

/// The exception-translation hook.
///
/// Filters are invoked once per failed request, concurrently across
/// requests, against shared read-only configuration. Translation is a
/// bounded synchronous computation; there is nothing to await.
///
/// Handling is an explicit two-step pipeline: [`catch`](Self::catch)
/// computes the disposition, then [`finalize`](Self::finalize) runs
/// unconditionally, whatever the disposition was.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Translate an exception, or decline and let it propagate.
    fn catch(&self, error: &DynException) -> TranslationOutcome;

    /// Always-run post-processing step. Invoked after every `catch`,
    /// for both dispositions. The default implementation logs the
    /// disposition.
    fn finalize(&self, error: &DynException, outcome: &TranslationOutcome) {
        match outcome {
            TranslationOutcome::Respond(response) => {
                tracing::warn!(status = %response.status, %error, "exception translated");
            }
            TranslationOutcome::Propagate => {
                tracing::error!(%error, "exception propagated unfiltered");
            }
        }
    }
}

/// Rule-table-driven [`ExceptionFilter`].
///
/// Consults an ordered [`ExceptionRuleSet`]; on a match, responds with
/// the rule's status, friendly message and metadata. With no match the
/// behavior follows `catch_unfiltered`: either a generic 500 carrying
/// the error's own message, or propagation.
///
/// The filter holds no per-request state and both fields are frozen at
/// construction, so a single instance serves concurrent requests.
///
/// Panics inside caller-supplied message functions or guard predicates
/// are not caught here; they unwind through the filter.
#[derive(Debug)]
pub struct GlobalExceptionFilter {
    rules: ExceptionRuleSet,
    catch_unfiltered: bool,
}

impl GlobalExceptionFilter {
    pub fn new(rules: ExceptionRuleSet, catch_unfiltered: bool) -> Self {
        Self {
            rules,
            catch_unfiltered,
        }
    }

    pub fn rules(&self) -> &ExceptionRuleSet {
        &self.rules
    }

    pub fn catches_unfiltered(&self) -> bool {
        self.catch_unfiltered
    }
}

impl ExceptionFilter for GlobalExceptionFilter {
    fn catch(&self, error: &DynException) -> TranslationOutcome {
        match self.rules.find_match(error) {
            Some(rule) => TranslationOutcome::Respond(rule.to_response(error)),
            None if self.catch_unfiltered => TranslationOutcome::Respond(ErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                payload: ErrorPayload::new(error.to_string()),
            }),
            None => TranslationOutcome::Propagate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::rule::ExceptionRule;

    #[derive(Debug, thiserror::Error)]
    #[error("not found")]
    struct NotFoundError;

    #[derive(Debug, thiserror::Error)]
    #[error("validation failed")]
    struct ValidationError {
        field: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("custom error {code}")]
    struct CustomError {
        code: i32,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    fn filter_with(rules: Vec<ExceptionRule>, catch_unfiltered: bool) -> GlobalExceptionFilter {
        GlobalExceptionFilter::new(rules.into_iter().collect(), catch_unfiltered)
    }

    #[test]
    fn matched_rule_drives_status_and_message() {
        let filter = filter_with(
            vec![
                ExceptionRule::builder::<NotFoundError>()
                    .message("Resource missing")
                    .status(StatusCode::NOT_FOUND)
                    .build(),
            ],
            false,
        );

        let error: BoxError = Box::new(NotFoundError);
        let outcome = filter.catch(&*error);
        assert_eq!(
            outcome,
            TranslationOutcome::Respond(ErrorResponse {
                status: StatusCode::NOT_FOUND,
                payload: ErrorPayload::new("Resource missing"),
            })
        );
    }

    #[test]
    fn matched_rule_attaches_error_code() {
        let filter = filter_with(
            vec![
                ExceptionRule::builder::<ValidationError>()
                    .message_fn(|e| format!("Invalid: {}", e.field))
                    .status(StatusCode::BAD_REQUEST)
                    .error_code("VAL001")
                    .build(),
            ],
            false,
        );

        let error: BoxError = Box::new(ValidationError {
            field: "email".to_string(),
        });
        let TranslationOutcome::Respond(response) = filter.catch(&*error) else {
            panic!("expected a translated response");
        };
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.payload.message, "Invalid: email");
        assert_eq!(response.payload.error_code.as_deref(), Some("VAL001"));
        assert_eq!(response.payload.error_reference, None);
    }

    #[test]
    fn no_rules_and_no_unfiltered_catching_propagates() {
        let filter = filter_with(Vec::new(), false);
        let error: BoxError = Box::new(Boom);
        assert_eq!(filter.catch(&*error), TranslationOutcome::Propagate);
    }

    #[test]
    fn unfiltered_catching_produces_generic_500() {
        let filter = filter_with(Vec::new(), true);
        let error: BoxError = Box::new(Boom);
        assert_eq!(
            filter.catch(&*error),
            TranslationOutcome::Respond(ErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                payload: ErrorPayload::new("boom"),
            })
        );
    }

    #[test]
    fn declined_predicate_follows_the_unfiltered_flag() {
        let rule = || {
            ExceptionRule::builder::<CustomError>()
                .when(|e| e.code == 2)
                .status(StatusCode::BAD_REQUEST)
                .build()
        };

        let error: BoxError = Box::new(CustomError { code: 1 });

        let passthrough = filter_with(vec![rule()], false);
        assert_eq!(passthrough.catch(&*error), TranslationOutcome::Propagate);

        let catching = filter_with(vec![rule()], true);
        let TranslationOutcome::Respond(response) = catching.catch(&*error) else {
            panic!("expected a generic caught response");
        };
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.payload.message, "custom error 1");
        assert_eq!(response.payload.error_code, None);
    }

    #[test]
    fn catch_is_idempotent_for_identical_inputs() {
        let filter = filter_with(
            vec![
                ExceptionRule::builder::<NotFoundError>()
                    .message("Resource missing")
                    .status(StatusCode::NOT_FOUND)
                    .build(),
            ],
            true,
        );

        let error: BoxError = Box::new(NotFoundError);
        let outcome = filter.catch(&*error);
        assert!(outcome.is_respond());
        assert_eq!(outcome, filter.catch(&*error));
    }
}
