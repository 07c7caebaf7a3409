//! End-to-end use of the artist catalog through its public API

use core_library::db::{create_pool, DatabaseConfig};
use core_library::{
    Artist, ArtistRef, ArtistRepository, ArtistRepositoryOptions, Filter, QueryOptions,
    RequestContext, SortOrder, SqliteArtistRepository, User,
};
use core_runtime::config::{CoreConfig, LibraryConfig};

async fn open(ctx: RequestContext, library: LibraryConfig) -> Box<dyn ArtistRepository> {
    let config = CoreConfig::builder()
        .database_path("unused.db")
        .library(library)
        .build()
        .unwrap();

    let pool = create_pool(DatabaseConfig::in_memory().max_connections(1))
        .await
        .unwrap();
    let options = ArtistRepositoryOptions::from_config(&config.library).unwrap();

    Box::new(SqliteArtistRepository::new(pool, ctx, options))
}

fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_catalog_browse_and_search() {
    let repo = open(
        RequestContext::with_user(User::new("listener")),
        LibraryConfig::default(),
    )
    .await;

    for (id, name) in [
        ("1", "The Beatles"),
        ("2", "Kraftwerk"),
        ("3", "Yello"),
        ("4", "2Pac"),
        ("5", "Los Lobos"),
    ] {
        repo.put(&mut artist(id, name)).await.unwrap();
    }

    let mut eddie = artist("6", "Eddie Van Halen");
    eddie.sort_artist_name = "Van Halen, Eddie".to_string();
    eddie.similar_artists = vec![ArtistRef::new("2", "Kraftwerk"), ArtistRef::new("", "Rush")];
    repo.put(&mut eddie).await.unwrap();

    assert_eq!(repo.count_all().await.unwrap(), 6);

    let index = repo.get_index(false, &[]).await.unwrap();
    let keys: Vec<&str> = index.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(keys, vec!["#", "B", "E", "K", "L", "X-Z"]);

    let found = repo.search("halen", 0, 10, false).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].similar_artists.len(), 2);
    assert_eq!(found[0].similar_artists[1].name, "Rush");

    let lobos = repo.get("5").await.unwrap();
    assert_eq!(lobos.order_artist_name, "lobos");

    let page = repo
        .get_all(
            QueryOptions::default()
                .with_sort("name", SortOrder::Asc)
                .with_page(2, 1)
                .with_filter(Filter::not_eq("artist.id", "4")),
        )
        .await
        .unwrap();
    let names: Vec<&str> = page.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Kraftwerk", "Los Lobos"]);
}

#[tokio::test]
async fn test_catalog_prefers_sort_tags() {
    let library = LibraryConfig::default().with_prefer_sort_tags(true);
    let repo = open(RequestContext::with_user(User::admin("admin")), library).await;

    let mut eddie = artist("6", "Eddie Van Halen");
    eddie.sort_artist_name = "Van Halen, Eddie".to_string();
    repo.put(&mut eddie).await.unwrap();
    repo.put(&mut artist("2", "Kraftwerk")).await.unwrap();

    let index = repo.get_index(true, &[]).await.unwrap();
    let keys: Vec<&str> = index.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(keys, vec!["K", "V"]);

    let all = repo.get_all(QueryOptions::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "6"]);
}
