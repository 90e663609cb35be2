use std::any::type_name;
use std::error::Error;
use std::fmt;

use axum::http::StatusCode;

use crate::error::DynException;
use crate::response::{ErrorPayload, ErrorResponse};

pub mod set;

type MessageFn = Box<dyn Fn(&DynException) -> String + Send + Sync>;
type HandleFn = Box<dyn Fn(&DynException) -> bool + Send + Sync>;
type TypeMatchFn = Box<dyn Fn(&DynException) -> bool + Send + Sync>;

/// A single exception-translation rule.
///
/// A rule maps one concrete error type (matched by exact runtime type,
/// never by source-chain inspection) to a friendly message, an HTTP
/// status, and optional error metadata. Rules are immutable once built;
/// construct them through [`ExceptionRule::builder`] and freeze the
/// whole configuration before serving traffic.
///
/// # Example
/// ```
/// use axum::http::StatusCode;
/// use faultline::ExceptionRule;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("order not found")]
/// struct OrderNotFound;
///
/// let rule = ExceptionRule::builder::<OrderNotFound>()
///     .message("The requested order does not exist")
///     .status(StatusCode::NOT_FOUND)
///     .build();
/// assert_eq!(rule.status(), StatusCode::NOT_FOUND);
/// ```
pub struct ExceptionRule {
    exception_type: &'static str,
    matches_type: TypeMatchFn,
    friendly_message: MessageFn,
    handle: Option<HandleFn>,
    status: StatusCode,
    error_code: Option<String>,
    error_reference: Option<String>,
}

impl ExceptionRule {
    /// Start building a rule for the concrete error type `E`.
    ///
    /// Rules must target a concrete error type. The erased boxed error
    /// type does not implement `Error` itself, so a rule that would
    /// swallow every exception cannot be declared:
    ///
    /// ```compile_fail
    /// use faultline::{BoxError, ExceptionRule};
    ///
    /// let rule = ExceptionRule::builder::<BoxError>().build();
    /// ```
    pub fn builder<E>() -> ExceptionRuleBuilder<E>
    where
        E: Error + Send + Sync + 'static,
    {
        ExceptionRuleBuilder::new()
    }

    /// The name of the error type this rule matches. Diagnostic only.
    pub fn exception_type(&self) -> &'static str {
        self.exception_type
    }

    /// HTTP status reported when this rule matches.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn error_reference(&self) -> Option<&str> {
        self.error_reference.as_deref()
    }

    /// Whether this rule applies to the given error: the error's concrete
    /// type must equal the rule's declared type AND the guard predicate,
    /// if any, must pass.
    pub fn matches(&self, error: &DynException) -> bool {
        (self.matches_type)(error) && self.handle.as_ref().map_or(true, |handle| handle(error))
    }

    /// Render the translated response for a matched error.
    pub fn to_response(&self, error: &DynException) -> ErrorResponse {
        ErrorResponse {
            status: self.status,
            payload: ErrorPayload {
                message: (self.friendly_message)(error),
                error_code: self.error_code.clone(),
                error_reference: self.error_reference.clone(),
            },
        }
    }
}

impl fmt::Debug for ExceptionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionRule")
            .field("exception_type", &self.exception_type)
            .field("status", &self.status)
            .field("error_code", &self.error_code)
            .field("error_reference", &self.error_reference)
            .field("has_predicate", &self.handle.is_some())
            .finish()
    }
}

/// Builder for [`ExceptionRule`], typed on the error it will match.
///
/// The message source, guard predicate and metadata are all optional;
/// an unset message falls back to the error's own `Display` output,
/// and the status defaults to 500.
pub struct ExceptionRuleBuilder<E> {
    message: Option<Box<dyn Fn(&E) -> String + Send + Sync>>,
    handle: Option<Box<dyn Fn(&E) -> bool + Send + Sync>>,
    status: StatusCode,
    error_code: Option<String>,
    error_reference: Option<String>,
}

impl<E> ExceptionRuleBuilder<E>
where
    E: Error + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            message: None,
            handle: None,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: None,
            error_reference: None,
        }
    }

    /// Use a fixed friendly message for every matched error.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = Some(Box::new(move |_| message.clone()));
        self
    }

    /// Derive the friendly message from the matched error instance.
    pub fn message_fn(mut self, f: impl Fn(&E) -> String + Send + Sync + 'static) -> Self {
        self.message = Some(Box::new(f));
        self
    }

    /// Guard predicate: the rule matches only when this returns true.
    pub fn when(mut self, predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.handle = Some(Box::new(predicate));
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Opaque error code surfaced to clients as `ErrorCode`.
    pub fn error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Opaque reference surfaced to clients as `ErrorReference`.
    pub fn error_reference(mut self, reference: impl Into<String>) -> Self {
        self.error_reference = Some(reference.into());
        self
    }

    /// Finalize the rule.
    pub fn build(self) -> ExceptionRule {
        // Absent message source falls back to the error's own message.
        let friendly_message: MessageFn = match self.message {
            Some(f) => Box::new(move |error: &DynException| match error.downcast_ref::<E>() {
                Some(typed) => f(typed),
                None => error.to_string(),
            }),
            None => Box::new(|error: &DynException| error.to_string()),
        };

        let handle: Option<HandleFn> = self.handle.map(|predicate| -> HandleFn {
            Box::new(move |error: &DynException| {
                error.downcast_ref::<E>().is_some_and(|typed| predicate(typed))
            })
        });

        ExceptionRule {
            exception_type: type_name::<E>(),
            matches_type: Box::new(|error: &DynException| error.is::<E>()),
            friendly_message,
            handle,
            status: self.status,
            // Empty metadata is treated as absent so the payload's
            // conditional-presence contract holds.
            error_code: self.error_code.filter(|code| !code.is_empty()),
            error_reference: self.error_reference.filter(|reference| !reference.is_empty()),
        }
    }
}

impl<E> Default for ExceptionRuleBuilder<E>
where
    E: Error + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
