//! # Repository Pattern Implementation
//!
//! Data access for the artist catalog.
//!
//! - Traits define the interface, SQLite implementations use sqlx
//! - Every repository instance acts for one [`RequestContext`](crate::request::RequestContext)
//! - Reads hide missing artists from callers that are not admins
//! - All operations return `Result<T>`

pub mod artist;
mod artist_row;

pub use artist::{
    get_index_key, role_filter, ArtistRepository, ArtistRepositoryOptions, SqliteArtistRepository,
};
