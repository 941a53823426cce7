use std::collections::HashMap;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::Json;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use tracing::warn;

use crate::application::errors::ErrorResponse;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

struct Buckets {
    by_ip: HashMap<IpAddr, Bucket>,
    last_sweep: Option<Instant>,
}

struct RateLimiter {
    buckets: Mutex<Buckets>,
    capacity: f64,
    refill_per_sec: f64,
    window: Duration,
}

impl RateLimiter {
    fn new(capacity: u32, window: Duration) -> Self {
        Self {
            buckets: Mutex::new(Buckets {
                by_ip: HashMap::new(),
                last_sweep: None,
            }),
            capacity: f64::from(capacity),
            refill_per_sec: f64::from(capacity) / window.as_secs_f64(),
            window,
        }
    }

    fn refilled(&self, bucket: &Bucket, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity)
    }

    /// Take a token for `ip`, or report how long until one is available.
    fn acquire(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // A full bucket is indistinguishable from a fresh one, so drop them
        // once per window.
        let sweep_due = buckets
            .last_sweep
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window);
        if sweep_due {
            buckets
                .by_ip
                .retain(|_, bucket| self.refilled(bucket, now) < self.capacity);
            buckets.last_sweep = Some(now);
        }

        let capacity = self.capacity;
        let bucket = buckets.by_ip.entry(ip).or_insert(Bucket {
            tokens: capacity,
            last_refill: now,
        });

        bucket.tokens = self.refilled(bucket, now);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - bucket.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_per_sec))
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .by_ip
            .len()
    }
}

/// Per-IP token bucket in front of the credential endpoints.
///
/// Requests without `ConnectInfo` are let through.
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<RateLimiter>,
}

impl RateLimitLayer {
    pub fn per_minute(requests: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::new(requests, Duration::from_secs(60))),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: Arc::clone(&self.limiter),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<RateLimiter>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let limiter = Arc::clone(&self.limiter);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ip = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip());

            if let Some(ip) = ip
                && let Err(wait) = limiter.acquire(ip, Instant::now())
            {
                warn!(%ip, uri = %request.uri(), "auth rate limit exceeded");
                return Ok(too_many_requests(wait));
            }

            inner.call(request).await
        })
    }
}

fn too_many_requests(wait: Duration) -> Response {
    let body = ErrorResponse {
        code: "rate_limited".to_string(),
        message: "too many requests, slow down".to_string(),
    };
    let retry_after = HeaderValue::from(wait.as_secs().max(1));
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after)],
        Json(body),
    )
        .into_response()
}
