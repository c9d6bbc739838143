//! Sprite asset retrieval from the remote content store or a local tree.

pub mod error;
pub mod fetcher;
pub mod local;
pub mod remote;

pub use error::FetchError;
pub use fetcher::{AssetFetcher, SpriteAsset};
pub use local::LocalFetcher;
pub use remote::{
    DEFAULT_BASE_URL, HttpResponse, HttpTransport, RemoteFetcher, RetryPolicy, Sleeper,
    ThreadSleeper,
};
