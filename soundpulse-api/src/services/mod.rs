//! Service Layer
//!
//! Business logic that sits between the dispatcher and the provider.

mod artist_identity;

pub use artist_identity::{ArtistIdentityResolver, ResolvedArtist};
