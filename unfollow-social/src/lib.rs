//! Social network clients used by unfollow.
//!
//! Only the Twitter/X v1.1 REST surface is implemented: listing and deleting
//! the account's own timeline entries, likes, and follow relationships.
pub mod twitter;
