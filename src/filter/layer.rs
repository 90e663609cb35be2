use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::error::BoxError;
use crate::filter::{ExceptionFilter, TranslationOutcome};

/// Tower `Layer` installing an [`ExceptionFilter`] around a service.
///
/// The wrapped service's error type must convert into [`BoxError`].
/// Successful responses pass through untouched; on an error the filter
/// runs `catch`, then `finalize` (always), then either writes the
/// translated response or re-propagates the original error. Because
/// propagation keeps the error type at `BoxError`, attaching this layer
/// directly to an axum `Router` requires the usual `HandleErrorLayer`
/// pairing for the propagate path.
pub struct ExceptionFilterLayer {
    filter: Arc<dyn ExceptionFilter>,
}

impl ExceptionFilterLayer {
    pub fn new(filter: impl ExceptionFilter) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }

    /// Share an already-constructed filter across layers.
    pub fn from_arc(filter: Arc<dyn ExceptionFilter>) -> Self {
        Self { filter }
    }
}

impl Clone for ExceptionFilterLayer {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
        }
    }
}

impl<S> Layer<S> for ExceptionFilterLayer {
    type Service = ExceptionFilterMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionFilterMiddleware {
            inner,
            filter: self.filter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionFilterMiddleware<S> {
    inner: S,
    filter: Arc<dyn ExceptionFilter>,
}

impl<S> Service<Request<Body>> for ExceptionFilterMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
{
    type Response = Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let filter = self.filter.clone();
        // Move the ready service into the future; keep a fresh clone here.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match inner.call(request).await {
                Ok(response) => Ok(response),
                Err(error) => {
                    let error: BoxError = error.into();
                    let outcome = filter.catch(&*error);
                    // Post-processing runs whatever the disposition was.
                    filter.finalize(&*error, &outcome);
                    match outcome {
                        TranslationOutcome::Respond(response) => Ok(response.into_response()),
                        TranslationOutcome::Propagate => Err(error),
                    }
                }
            }
        })
    }
}
