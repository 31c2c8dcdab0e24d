//! Twitter/X API integration surface.
//!
//! [`TwitterClient`] is the seam the deleter is written against; [`TwitterApi`]
//! implements it over OAuth 1.0a-signed HTTP calls.
pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::TwitterApi;
pub use error::{TwitterError, TwitterResult};
pub use traits::TwitterClient;
pub use types::{FriendIds, Tweet};
