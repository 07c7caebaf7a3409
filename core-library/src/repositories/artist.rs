//! Artist repository trait and implementation

use super::artist_row::{post_map_args, to_column_args, DbArtist};
use crate::error::{LibraryError, Result};
use crate::index_groups::IndexGroups;
use crate::models::{Artist, ArtistIndex, Role};
use crate::query::{push_page, push_where, Filter, QueryOptions, SortOrder};
use crate::request::RequestContext;
use crate::text;
use async_trait::async_trait;
use core_runtime::config::LibraryConfig;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

const SELECT_ARTIST: &str = "SELECT artist.* FROM artist";
const COUNT_ARTIST: &str = "SELECT COUNT(*) FROM artist";

const ORDER_NAME: &str = "artist.order_artist_name";
const SORT_NAME: &str =
    "LOWER(COALESCE(NULLIF(artist.sort_artist_name, ''), artist.order_artist_name))";

/// Artist repository interface for data access operations
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// Count artists visible to the caller
    async fn count_all(&self) -> Result<i64>;

    /// Check whether a visible artist with this id exists
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Get an artist by id
    ///
    /// # Errors
    /// Returns `LibraryError::NotFound` if no visible artist has this id.
    async fn get(&self, id: &str) -> Result<Artist>;

    /// List artists with sorting, paging and filtering
    async fn get_all(&self, options: QueryOptions) -> Result<Vec<Artist>>;

    /// Insert or update an artist
    ///
    /// Fills in `order_artist_name` and the timestamps on the passed artist;
    /// `created_at` is the stored value when the artist already existed.
    /// Stored statistics are never changed, and empty sort names or
    /// MusicBrainz ids do not clear stored values.
    ///
    /// # Errors
    /// Returns `LibraryError::InvalidInput` if the id or name is empty.
    async fn put(&self, artist: &mut Artist) -> Result<()>;

    /// Search artists by name words or by MusicBrainz id
    ///
    /// # Arguments
    /// * `query` - Words to match, or an MBID for an exact match
    /// * `offset` - Rows to skip
    /// * `limit` - Maximum rows, 0 for no limit
    /// * `include_missing` - Also return missing artists (admins only)
    async fn search(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
        include_missing: bool,
    ) -> Result<Vec<Artist>>;

    /// Group artists into alphabetical index entries
    ///
    /// When `roles` is not empty, only artists with statistics for at least
    /// one of the named roles are returned. Unknown role names match nothing.
    async fn get_index(&self, include_missing: bool, roles: &[&str]) -> Result<Vec<ArtistIndex>>;
}

/// Settings that shape artist ordering, indexing and search
#[derive(Debug, Clone)]
pub struct ArtistRepositoryOptions {
    pub prefer_sort_tags: bool,
    pub search_full_string: bool,
    index_groups: Arc<IndexGroups>,
    ignored_articles: Arc<[String]>,
}

impl ArtistRepositoryOptions {
    /// Build options from the library settings
    ///
    /// # Errors
    /// Returns `LibraryError::InvalidInput` if the index groups are empty.
    pub fn from_config(config: &LibraryConfig) -> Result<Self> {
        Ok(Self {
            prefer_sort_tags: config.prefer_sort_tags,
            search_full_string: config.search_full_string,
            index_groups: Arc::new(IndexGroups::parse(&config.index_groups)?),
            ignored_articles: split_articles(&config.ignored_articles),
        })
    }

    pub fn with_prefer_sort_tags(mut self, prefer: bool) -> Self {
        self.prefer_sort_tags = prefer;
        self
    }

    pub fn with_search_full_string(mut self, full_string: bool) -> Self {
        self.search_full_string = full_string;
        self
    }

    pub fn index_groups(&self) -> &IndexGroups {
        &self.index_groups
    }

    pub fn ignored_articles(&self) -> &[String] {
        &self.ignored_articles
    }
}

impl Default for ArtistRepositoryOptions {
    fn default() -> Self {
        let config = LibraryConfig::default();
        Self {
            prefer_sort_tags: config.prefer_sort_tags,
            search_full_string: config.search_full_string,
            index_groups: Arc::new(IndexGroups::default()),
            ignored_articles: split_articles(&config.ignored_articles),
        }
    }
}

fn split_articles(articles: &str) -> Arc<[String]> {
    articles.split_whitespace().map(str::to_string).collect()
}

/// Index key of an artist: the group of its sort name when sort tags are
/// preferred and present, otherwise of its order name.
pub fn get_index_key(options: &ArtistRepositoryOptions, artist: &Artist) -> String {
    let source = if options.prefer_sort_tags && !artist.sort_artist_name.is_empty() {
        &artist.sort_artist_name
    } else {
        &artist.order_artist_name
    };
    options.index_groups.key_for(source).to_string()
}

/// Predicate selecting artists with statistics for the named role.
///
/// Only the known role names produce a column predicate; any other text,
/// whatever it contains, yields [`Filter::AlwaysFalse`].
pub fn role_filter(name: &str) -> Filter {
    match name.parse::<Role>() {
        Ok(role) => Filter::NotNull(role.stats_path()),
        Err(_) => Filter::AlwaysFalse,
    }
}

/// SQLite implementation of ArtistRepository
///
/// Each instance acts for one caller. Missing artists are only returned to
/// admins, and only where the operation allows them.
pub struct SqliteArtistRepository {
    pool: SqlitePool,
    ctx: RequestContext,
    options: ArtistRepositoryOptions,
}

impl SqliteArtistRepository {
    /// Create a new SqliteArtistRepository
    pub fn new(pool: SqlitePool, ctx: RequestContext, options: ArtistRepositoryOptions) -> Self {
        Self { pool, ctx, options }
    }

    /// Same store and options, acting for another caller
    pub fn with_context(&self, ctx: RequestContext) -> Self {
        Self {
            pool: self.pool.clone(),
            ctx,
            options: self.options.clone(),
        }
    }

    pub fn options(&self) -> &ArtistRepositoryOptions {
        &self.options
    }

    /// Visibility predicate, `None` when the caller may see every row
    fn missing_filter(&self, include_missing: bool) -> Option<Filter> {
        if include_missing && self.ctx.is_admin() {
            None
        } else {
            Some(Filter::eq("artist.missing", false))
        }
    }

    fn sort_expression(&self, sort: &str) -> &'static str {
        match sort {
            "name" => "artist.name",
            "order_artist_name" => ORDER_NAME,
            "sort_artist_name" => SORT_NAME,
            "song_count" => "artist.stats ->> '$.total.m'",
            "album_count" => "artist.stats ->> '$.total.a'",
            "size" => "artist.stats ->> '$.total.s'",
            "random" => "random()",
            "id" => "artist.id",
            _ if self.options.prefer_sort_tags => SORT_NAME,
            _ => ORDER_NAME,
        }
    }

    async fn select(
        &self,
        filters: Vec<Filter>,
        sort: &str,
        order: SortOrder,
        max: u32,
        offset: u32,
    ) -> Result<Vec<Artist>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_ARTIST);
        push_where(&mut qb, filters);
        qb.push(" ORDER BY ")
            .push(self.sort_expression(sort))
            .push(" ")
            .push(order.as_sql())
            .push(", artist.id ASC");
        push_page(&mut qb, max, offset);

        let rows = qb.build_query_as::<DbArtist>().fetch_all(&self.pool).await?;
        rows.into_iter().map(DbArtist::post_scan).collect()
    }

    async fn count(&self, filters: Vec<Filter>) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new(COUNT_ARTIST);
        push_where(&mut qb, filters);

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    fn search_filters(&self, query: &str) -> Vec<Filter> {
        if Uuid::parse_str(query).is_ok() {
            return vec![Filter::eq("artist.mbz_artist_id", query)];
        }

        text::search_tokens(query)
            .into_iter()
            .map(|token| {
                let pattern = if self.options.search_full_string {
                    format!("%{token}%")
                } else {
                    format!("% {token}%")
                };
                Filter::like("artist.full_text", pattern)
            })
            .collect()
    }
}

#[async_trait]
impl ArtistRepository for SqliteArtistRepository {
    #[instrument(skip(self))]
    async fn count_all(&self) -> Result<i64> {
        let count = self
            .count(self.missing_filter(true).into_iter().collect())
            .await?;
        debug!(count, "Counted artists");
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: &str) -> Result<bool> {
        let mut filters = vec![Filter::eq("artist.id", id)];
        filters.extend(self.missing_filter(true));

        let exists = self.count(filters).await? > 0;
        debug!(exists, "Checked artist");
        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Artist> {
        let mut filters = vec![Filter::eq("artist.id", id)];
        filters.extend(self.missing_filter(true));

        self.select(filters, "", SortOrder::Asc, 1, 0)
            .await?
            .pop()
            .ok_or_else(|| LibraryError::NotFound {
                entity_type: "Artist".to_string(),
                id: id.to_string(),
            })
    }

    #[instrument(skip(self, options), fields(sort = %options.sort))]
    async fn get_all(&self, options: QueryOptions) -> Result<Vec<Artist>> {
        let mut filters: Vec<Filter> = self.missing_filter(true).into_iter().collect();
        filters.extend(options.filters);

        let artists = self
            .select(filters, &options.sort, options.order, options.max, options.offset)
            .await?;
        debug!(count = artists.len(), "Loaded artists");
        Ok(artists)
    }

    #[instrument(skip(self, artist), fields(artist_id = %artist.id))]
    async fn put(&self, artist: &mut Artist) -> Result<()> {
        artist.validate().map_err(|e| LibraryError::InvalidInput {
            field: "Artist".to_string(),
            message: e,
        })?;

        if artist.order_artist_name.is_empty() {
            artist.order_artist_name = text::order_name(&artist.name, &self.options.ignored_articles);
        }

        let now = chrono::Utc::now().timestamp();
        artist.updated_at = now;

        let mut args = to_column_args(artist);
        if artist.created_at == 0 {
            args.insert("created_at", now.into());
        }
        post_map_args(artist, &mut args)?;

        let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO artist (");
        for (i, column) in args.keys().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column);
        }
        qb.push(") VALUES (");
        for (i, value) in args.values().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            value.push_bind(&mut qb);
        }
        qb.push(") ON CONFLICT(id) DO UPDATE SET ");
        let updated = args
            .keys()
            .filter(|column| !matches!(**column, "id" | "created_at"));
        for (i, column) in updated.enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column).push(" = excluded.").push(*column);
        }

        qb.push(" RETURNING created_at");

        artist.created_at = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        debug!(order_name = %artist.order_artist_name, "Artist saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
        include_missing: bool,
    ) -> Result<Vec<Artist>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut filters = self.search_filters(query);
        if filters.is_empty() {
            return Ok(Vec::new());
        }
        filters.extend(self.missing_filter(include_missing));

        let artists = self
            .select(filters, "order_artist_name", SortOrder::Asc, limit, offset)
            .await?;
        debug!(count = artists.len(), "Search complete");
        Ok(artists)
    }

    #[instrument(skip(self))]
    async fn get_index(&self, include_missing: bool, roles: &[&str]) -> Result<Vec<ArtistIndex>> {
        let mut filters: Vec<Filter> = self.missing_filter(include_missing).into_iter().collect();
        if !roles.is_empty() {
            filters.push(Filter::Or(roles.iter().map(|r| role_filter(r)).collect()));
        }

        let artists = self.select(filters, "", SortOrder::Asc, 0, 0).await?;

        let mut groups: BTreeMap<String, Vec<Artist>> = BTreeMap::new();
        for artist in artists {
            groups
                .entry(get_index_key(&self.options, &artist))
                .or_default()
                .push(artist);
        }

        debug!(groups = groups.len(), "Built artist index");
        Ok(groups
            .into_iter()
            .map(|(id, artists)| ArtistIndex { id, artists })
            .collect())
    }
}
