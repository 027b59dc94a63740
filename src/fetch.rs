#[path = "fetch/traits.rs"]
mod traits;

#[path = "fetch/http.rs"]
mod http;

pub use http::{HttpFetcher, HttpFetcherFactory};
pub use traits::{FetchedDocument, Fetcher, FetcherFactory};
