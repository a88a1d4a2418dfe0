/// Error detail exposure
///
/// [`ApiError`](crate::error::ApiError) responses never put diagnostic detail
/// in the body directly. Database, token and internal failures attach a
/// [`DetailedError`] extension instead, and this layer swaps it in as the body
/// (adding the `"error"` field) when the deployment allows it.
///
/// ```json
/// { "message": "Database error", "error": "duplicate key value violates unique constraint ..." }
/// ```
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use eventhub_api::middleware::errors::ErrorDetailLayer;
///
/// let app: Router = Router::new()
///     .layer(ErrorDetailLayer::new(true)); // false in production
/// ```

use crate::error::DetailedError;
use axum::{body::Body, extract::Request, http::header, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Error detail layer
#[derive(Clone)]
pub struct ErrorDetailLayer {
    expose: bool,
}

impl ErrorDetailLayer {
    /// Creates the layer; with `expose = false` detail is only stripped
    pub fn new(expose: bool) -> Self {
        Self { expose }
    }
}

impl<S> Layer<S> for ErrorDetailLayer {
    type Service = ErrorDetailMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorDetailMiddleware {
            inner,
            expose: self.expose,
        }
    }
}

/// Error detail middleware service
#[derive(Clone)]
pub struct ErrorDetailMiddleware<S> {
    inner: S,
    expose: bool,
}

impl<S> Service<Request> for ErrorDetailMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let future = self.inner.call(request);
        let expose = self.expose;

        Box::pin(async move {
            let mut response = future.await?;

            let Some(detailed) = response.extensions_mut().remove::<DetailedError>() else {
                return Ok(response);
            };
            if !expose {
                return Ok(response);
            }

            let (mut parts, body) = response.into_parts();
            match serde_json::to_vec(&detailed.0) {
                Ok(bytes) => {
                    parts.headers.remove(header::CONTENT_LENGTH);
                    Ok(Response::from_parts(parts, Body::from(bytes)))
                }
                Err(_) => Ok(Response::from_parts(parts, body)),
            }
        })
    }
}
