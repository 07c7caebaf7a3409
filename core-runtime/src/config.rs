//! # Core Configuration Module
//!
//! Provides configuration management for the media library server.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance holding every setting the library layer needs. Settings that used
//! to be process-wide (sort-tag preference, index groups, ignored articles)
//! live in [`LibraryConfig`] and are handed to repositories explicitly.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, LibraryConfig};
//!
//! let config = CoreConfig::builder()
//!     .database_path("/var/lib/media/library.db")
//!     .library(LibraryConfig::default().with_prefer_sort_tags(true))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use std::path::PathBuf;

/// Default alphabetical index groups. Letters map to themselves, `X`, `Y`
/// and `Z` collapse into one bucket and `[` is reported as `Unknown`.
pub const DEFAULT_INDEX_GROUPS: &str =
    "A B C D E F G H I J K L M N O P Q R S T U V W X-Z(XYZ) [Unknown]([)";

/// Leading articles ignored when deriving an artist's order name.
pub const DEFAULT_IGNORED_ARTICLES: &str = "The El La Los Las Le Les Os As O A";

/// Core configuration for the media library server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Library browsing and search settings
    pub library: LibraryConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Library browsing and search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Use the sort-artist tag (when present) instead of the derived order
    /// name for index keys and ordering
    pub prefer_sort_tags: bool,

    /// Index group definition, see [`DEFAULT_INDEX_GROUPS`]
    pub index_groups: String,

    /// Space separated articles stripped from the start of names
    pub ignored_articles: String,

    /// Match search tokens anywhere in a word instead of at word starts
    pub search_full_string: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            prefer_sort_tags: false,
            index_groups: DEFAULT_INDEX_GROUPS.to_string(),
            ignored_articles: DEFAULT_IGNORED_ARTICLES.to_string(),
            search_full_string: false,
        }
    }
}

impl LibraryConfig {
    pub fn with_prefer_sort_tags(mut self, prefer: bool) -> Self {
        self.prefer_sort_tags = prefer;
        self
    }

    pub fn with_index_groups(mut self, groups: impl Into<String>) -> Self {
        self.index_groups = groups.into();
        self
    }

    pub fn with_ignored_articles(mut self, articles: impl Into<String>) -> Self {
        self.ignored_articles = articles.into();
        self
    }

    pub fn with_search_full_string(mut self, full_string: bool) -> Self {
        self.search_full_string = full_string;
        self
    }

    /// Validates the library settings
    pub fn validate(&self) -> Result<()> {
        if self.index_groups.trim().is_empty() {
            return Err(Error::Config("Index groups cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Library settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        self.library.validate()
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) to validate and create the
/// final config.
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    library: Option<LibraryConfig>,
    logging: Option<LoggingConfig>,
}

impl CoreConfigBuilder {
    /// Sets the database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_path("/var/lib/media/library.db");
    /// ```
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the library settings. Defaults to [`LibraryConfig::default()`].
    pub fn library(mut self, library: LibraryConfig) -> Self {
        self.library = Some(library);
        self
    }

    /// Sets the logging settings. Defaults to [`LoggingConfig::default()`].
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the database path is missing or any
    /// setting fails validation.
    pub fn build(self) -> Result<CoreConfig> {
        let database_path = self.database_path.ok_or_else(|| {
            Error::Config("Database path is required. Use .database_path() to set it.".to_string())
        })?;

        let config = CoreConfig {
            database_path,
            library: self.library.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
