use std::time::Duration;

use log::{debug, warn};

use crate::error::FetchError;
use crate::fetcher::AssetFetcher;

/// Raw content root of the SpriteCollab repository.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/PMDCollab/SpriteCollab/master";

const USER_AGENT: &str = concat!("sprite-extract/", env!("CARGO_PKG_VERSION"));

const BACKOFF_FACTOR: u32 = 2;

/// Status code and body of one HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_rate_limited(&self) -> bool {
        self.status == 403 || self.status == 429
    }
}

/// Blocking HTTP GET.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        (**self).get(url)
    }
}

impl HttpTransport for reqwest::blocking::Client {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let response = reqwest::blocking::Client::get(self, url)
            .send()
            .map_err(http_err)?;
        let status = response.status();
        let body = if status.is_success() {
            response.bytes().map_err(http_err)?.to_vec()
        } else {
            Vec::new()
        };
        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Waits between rate-limited attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How rate-limited requests are retried.
///
/// Every rate-limited attempt, including the last one, is followed by a wait
/// of `initial_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(5),
        }
    }
}

/// Fetches assets over HTTP from `<base>/<entity>/<file>`.
pub struct RemoteFetcher<T = reqwest::blocking::Client, S = ThreadSleeper> {
    base_url: String,
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl RemoteFetcher {
    /// Create a fetcher backed by a blocking reqwest client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_user_agent(base_url, USER_AGENT, timeout)
    }

    pub fn with_user_agent(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_transport(base_url, client, ThreadSleeper))
    }
}

impl<T: HttpTransport, S: Sleeper> RemoteFetcher<T, S> {
    pub fn with_transport(base_url: impl Into<String>, transport: T, sleeper: S) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            sleeper,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Build the retrieval URL, with exactly one `/` at each seam.
    pub fn url_for(&self, entity_path: &str, filename: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let entity = entity_path.trim_matches('/');
        if entity.is_empty() {
            format!("{base}/{filename}")
        } else {
            format!("{base}/{entity}/{filename}")
        }
    }
}

impl<T: HttpTransport, S: Sleeper> AssetFetcher for RemoteFetcher<T, S> {
    fn fetch(&self, entity_path: &str, filename: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let url = self.url_for(entity_path, filename);
        debug!("Downloading: {url}");

        let mut delay = self.policy.initial_delay;
        for attempt in 1..=self.policy.max_attempts {
            let response = self.transport.get(&url)?;
            if response.is_success() {
                return Ok(Some(response.body));
            }
            if !response.is_rate_limited() {
                debug!("Download failed: {url} (HTTP {})", response.status);
                return Ok(None);
            }
            warn!(
                "Rate limit hit on {url} (HTTP {}, attempt {attempt}/{}). Waiting {} seconds...",
                response.status,
                self.policy.max_attempts,
                delay.as_secs_f64()
            );
            self.sleeper.sleep(delay);
            delay = delay.saturating_mul(BACKOFF_FACTOR);
        }

        warn!(
            "Giving up on {url} after {} rate-limited attempts",
            self.policy.max_attempts
        );
        Ok(None)
    }
}
