//! Configuration sections of `rawpeek.toml`.
//!
//! | Section     | Purpose                                   |
//! |-------------|-------------------------------------------|
//! | `[api]`     | Repository API endpoints and client       |
//! | `[preview]` | Document surface and grace delay          |
//! | `[search]`  | Search debounce                           |
//! | `[listing]` | Directory listing extras                  |
//! | `[auth]`    | Credential store location                 |

mod api;
mod auth;
mod listing;
mod preview;
mod search;

pub use api::ApiConfig;
pub use auth::AuthConfig;
pub use listing::ListingConfig;
pub use preview::PreviewConfig;
pub use search::SearchConfig;
