mod client;
mod cookies;
mod errors;
pub mod types;
pub mod user_agent;
pub use self::client::{Client, FetchConfig, RetryConfig, DEFAULT_BASE_URL};
pub use self::cookies::SessionCookieStore;
pub use self::errors::Error;
