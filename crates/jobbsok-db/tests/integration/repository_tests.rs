//! Integration tests for JobPostRepository.
//!
//! These tests run the predicate SQL, the two-phase paged fetch, and
//! the reuse-or-create persistence against a real PostgreSQL database.

use chrono::{Duration, NaiveDate, Utc};

use jobbsok_core::filter::{JobPostOrder, Predicate};
use jobbsok_core::models::{DefinitionInput, JobPostFilter};
use jobbsok_core::traits::JobPostStore;
use jobbsok_core::{GeoTable, JobPostService};
use jobbsok_db::JobPostRepository;

use crate::integration::common::{sample_new_post, sample_post_in, setup_test_db};

const SECRET: &str = "test-secret";

fn service(repo: JobPostRepository) -> JobPostService<JobPostRepository> {
    JobPostService::new(repo, GeoTable::norwegian(), SECRET)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[tokio::test]
async fn test_insert_and_fetch_roundtrip() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo.clone());

    let mut post = sample_new_post("roundtrip");
    post.deadline = Some(today() + Duration::days(14));
    post.tags = vec!["Rust".to_string(), "SQL".to_string()];
    post.definitions = vec![DefinitionInput {
        key: "Sektor".to_string(),
        value: "Privat".to_string(),
    }];

    let created = service.create(vec![post], SECRET).await.expect("create should succeed");
    assert_eq!(created.len(), 1);

    let fetched = service
        .get_by_id(created[0])
        .await
        .expect("created post should be retrievable");
    assert_eq!(fetched.url.as_deref(), Some("https://example.no/jobs/roundtrip"));
    assert_eq!(fetched.title, "Stilling roundtrip");
    assert_eq!(fetched.deadline, Some(today() + Duration::days(14)));
    assert_eq!(fetched.tags.len(), 2);
    assert_eq!(fetched.definitions.len(), 1);
    assert_eq!(fetched.definitions[0].value, "Privat");
}

#[tokio::test]
async fn test_search_hides_posts_without_url_and_passed_deadlines() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool.clone());
    let service = service(repo);

    service
        .create(
            vec![
                sample_post_in("open", "Oslo", None),
                sample_post_in("future", "Oslo", Some(today() + Duration::days(5))),
                sample_post_in("passed", "Oslo", Some(today() - Duration::days(1))),
            ],
            SECRET,
        )
        .await
        .unwrap();

    // A persisted row without a url must stay invisible.
    sqlx::query("INSERT INTO job_posts (url, title) VALUES (NULL, 'hidden')")
        .execute(&pool)
        .await
        .unwrap();

    let page = service
        .search(&JobPostFilter::default(), 0, 10)
        .await
        .expect("search should succeed");

    assert_eq!(page.total, 2);
    let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
    assert!(titles.contains(&"Stilling open"));
    assert!(titles.contains(&"Stilling future"));
}

#[tokio::test]
async fn test_deadline_buckets_filter_and_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo);

    service
        .create(
            vec![
                sample_post_in("none", "Oslo", None),
                sample_post_in("soon", "Oslo", Some(today() + Duration::days(2))),
                sample_post_in("later", "Oslo", Some(today() + Duration::days(30))),
                sample_post_in("passed", "Oslo", Some(today() - Duration::days(3))),
            ],
            SECRET,
        )
        .await
        .unwrap();

    let nearest = service
        .search(
            &JobPostFilter {
                deadline: Some("nærmest".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    let titles: Vec<&str> = nearest.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Stilling soon", "Stilling later"], "ascending by deadline");

    let furthest = service
        .search(
            &JobPostFilter {
                deadline: Some("lengst unna".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    let titles: Vec<&str> = furthest.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Stilling later", "Stilling soon", "Stilling passed"],
        "descending by deadline, passed deadlines included"
    );

    let without = service
        .search(
            &JobPostFilter {
                deadline: Some("annet".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(without.total, 1);
    assert_eq!(without.items[0].title, "Stilling none");
}

#[tokio::test]
async fn test_municipality_filter_matches_expanded_cities() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo);

    service
        .create(
            vec![
                sample_post_in("oslo", "0150 Oslo", None),
                sample_post_in("bergen", "Bergen sentrum", None),
                sample_post_in("trondheim", "Trondheim", None),
            ],
            SECRET,
        )
        .await
        .unwrap();

    let page = service
        .search(
            &JobPostFilter {
                municipality: Some("oslo,vestland".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
    assert!(titles.contains(&"Stilling oslo"));
    assert!(titles.contains(&"Stilling bergen"));
}

#[tokio::test]
async fn test_text_query_and_sector_predicates() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo);

    let mut rust = sample_new_post("rust");
    rust.title = "Senior Rustutvikler".to_string();
    rust.definitions = vec![DefinitionInput {
        key: "Sektor".to_string(),
        value: "Offentlig".to_string(),
    }];
    let mut nurse = sample_new_post("nurse");
    nurse.title = "Sykepleier".to_string();
    nurse.description = "Helse og omsorg".to_string();
    service.create(vec![rust, nurse], SECRET).await.unwrap();

    let by_query = service
        .search(
            &JobPostFilter {
                query: Some("rustutvikler".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(by_query.total, 1);
    assert_eq!(by_query.items[0].title, "Senior Rustutvikler");

    // Sector is an exact, case-insensitive match.
    let by_sector = service
        .search(
            &JobPostFilter {
                sector: Some("OFFENTLIG".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(by_sector.total, 1);

    let no_partial = service
        .search(
            &JobPostFilter {
                sector: Some("Offent".to_string()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(no_partial.total, 0);
}

#[tokio::test]
async fn test_tag_and_definition_rows_are_reused_case_insensitively() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool.clone());
    let service = service(repo);

    let mut first = sample_new_post("first");
    first.tags = vec!["Java".to_string()];
    first.definitions = vec![DefinitionInput {
        key: "Sektor".to_string(),
        value: "Offentlig".to_string(),
    }];
    let mut second = sample_new_post("second");
    second.tags = vec!["java".to_string()];
    second.definitions = vec![DefinitionInput {
        key: "sektor".to_string(),
        value: "OFFENTLIG".to_string(),
    }];

    service.create(vec![first], SECRET).await.unwrap();
    service.create(vec![second], SECRET).await.unwrap();

    let tag_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tag_rows, 1, "second post reuses the existing tag row");

    let definition_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_definitions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(definition_rows, 1);

    let associations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_post_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(associations, 2, "both posts point at the shared tag");
}

#[tokio::test]
async fn test_create_skips_existing_url() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool.clone());
    let service = service(repo.clone());

    service
        .create(vec![sample_new_post("dup")], SECRET)
        .await
        .unwrap();
    let created = service
        .create(
            vec![sample_new_post("dup"), sample_new_post("fresh")],
            SECRET,
        )
        .await
        .expect("duplicate url must not fail the batch");

    assert_eq!(created.len(), 1);
    assert!(repo.exists_by_url("https://example.no/jobs/fresh").await.unwrap());

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_posts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn test_pagination_window_is_stable_under_equal_sort_keys() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo.clone());

    // Same deadline everywhere, so only the id tie-break orders them.
    let deadline = Some(today() + Duration::days(10));
    let batch: Vec<_> = (0..7)
        .map(|i| sample_post_in(&format!("p{i}"), "Oslo", deadline))
        .collect();
    service.create(batch, SECRET).await.unwrap();

    let filter = JobPostFilter {
        deadline: Some("nærmest".to_string()),
        ..Default::default()
    };
    let mut seen = Vec::new();
    for page in 0..3 {
        let result = service.search(&filter, page, 3).await.unwrap();
        assert_eq!(result.total, 7);
        seen.extend(result.items.iter().map(|p| p.id));
    }

    assert_eq!(seen.len(), 7, "no gaps");
    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 7, "no duplicates");
    assert_eq!(seen, sorted, "ascending id within equal deadlines");
}

#[tokio::test]
async fn test_fetch_by_ids_preserves_requested_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo.clone());

    let ids = service
        .create(
            vec![
                sample_new_post("a"),
                sample_new_post("b"),
                sample_new_post("c"),
            ],
            SECRET,
        )
        .await
        .unwrap();

    let reversed: Vec<i64> = ids.iter().rev().copied().collect();
    let fetched = repo.fetch_by_ids(&reversed).await.unwrap();
    let fetched_ids: Vec<i64> = fetched.iter().map(|p| p.id).collect();
    assert_eq!(fetched_ids, reversed);

    // Unknown ids are skipped, not errors.
    let with_ghost = vec![ids[0], 9999];
    let fetched = repo.fetch_by_ids(&with_ghost).await.unwrap();
    assert_eq!(fetched.len(), 1);
}

#[tokio::test]
async fn test_count_matches_predicate() {
    let (pool, _container) = setup_test_db().await;
    let repo = JobPostRepository::new(pool);
    let service = service(repo.clone());

    service
        .create(
            vec![
                sample_post_in("x", "Oslo", None),
                sample_post_in("y", "Bergen", None),
            ],
            SECRET,
        )
        .await
        .unwrap();

    let total = repo.count(&Predicate::UrlPresent).await.unwrap();
    assert_eq!(total, 2);

    let ids = repo
        .fetch_ids(&Predicate::UrlPresent, JobPostOrder::CreatedDesc, 1, 0)
        .await
        .unwrap();
    assert_eq!(ids.len(), 1);
}
