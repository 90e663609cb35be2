/// The runtime representation of "any exception" flowing out of a handler.
///
/// Rules are always declared for a concrete error type, never for this
/// boxed type itself; the boxed type does not implement
/// [`std::error::Error`], so a rule targeting it is rejected at compile
/// time.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Borrowed form of [`BoxError`], used wherever an exception is inspected
/// without being consumed.
pub type DynException = dyn std::error::Error + Send + Sync + 'static;
