//! # Artist Catalog Module
//!
//! Owns the artist table of the media library database.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite schema and migrations for artists
//! - Per-role statistics and similar-artist references stored as JSON
//! - Alphabetical index browsing with configurable groups
//! - Word and MusicBrainz id search
//! - Visibility of missing artists by caller privilege

pub mod db;
pub mod error;
pub mod index_groups;
pub mod models;
pub mod query;
pub mod repositories;
pub mod request;
pub mod text;

pub use error::{LibraryError, Result};
pub use index_groups::IndexGroups;
pub use models::{Artist, ArtistIndex, ArtistRef, ArtistStats, Role, UnknownRole};
pub use query::{Filter, QueryOptions, SortOrder, SqlValue};
pub use repositories::{
    get_index_key, role_filter, ArtistRepository, ArtistRepositoryOptions, SqliteArtistRepository,
};
pub use request::{RequestContext, User};
