//! Test utilities for integration tests.
//!
//! Provides helper functions to set up an isolated PostgreSQL
//! container and seed job posts for each test.

use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

use jobbsok_core::models::{DefinitionInput, NewJobPost};

/// SQL migrations to initialize the test database schema.
/// Each statement must be executed separately due to sqlx limitations.
const MIGRATIONS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS job_posts (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        url TEXT UNIQUE,
        company_name TEXT,
        company_image_url TEXT,
        image_url TEXT,
        title TEXT NOT NULL,
        description TEXT,
        deadline DATE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_tags (
        id BIGSERIAL PRIMARY KEY,
        tag TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_definitions (
        id BIGSERIAL PRIMARY KEY,
        key TEXT NOT NULL,
        value TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_post_tags (
        job_post_id BIGINT NOT NULL REFERENCES job_posts(id),
        tag_id BIGINT NOT NULL REFERENCES job_tags(id),
        PRIMARY KEY (job_post_id, tag_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_post_definitions (
        job_post_id BIGINT NOT NULL REFERENCES job_posts(id),
        definition_id BIGINT NOT NULL REFERENCES job_definitions(id),
        PRIMARY KEY (job_post_id, definition_id)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_job_posts_deadline ON job_posts(deadline)",
    "CREATE INDEX IF NOT EXISTS idx_job_definitions_key ON job_definitions(LOWER(key))",
];

/// Sets up a PostgreSQL container and returns a connection pool.
///
/// Each call creates a fresh, isolated database container. The
/// container is automatically cleaned up when the returned
/// `ContainerAsync` is dropped, so keep it alive for the test
/// duration.
pub async fn setup_test_db() -> (PgPool, ContainerAsync<GenericImage>) {
    let container = GenericImage::new("postgres", "16-alpine")
        .with_exposed_port(ContainerPort::Tcp(5432))
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .with_env_var("POSTGRES_DB", "postgres")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");

    let connection_string = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

    // Retry while the container finishes starting up.
    const MAX_RETRIES: u32 = 30;
    let mut retries = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .connect(&connection_string)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retries += 1;
                if retries >= MAX_RETRIES {
                    panic!(
                        "Failed to connect to database after {} retries: {}",
                        MAX_RETRIES, e
                    );
                }
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        }
    };

    for migration in MIGRATIONS {
        sqlx::query(migration)
            .execute(&pool)
            .await
            .expect("Failed to run migration");
    }

    (pool, container)
}

/// Creates a sample creation payload for testing.
pub fn sample_new_post(slug: &str) -> NewJobPost {
    NewJobPost {
        url: format!("https://example.no/jobs/{slug}"),
        company_name: "Acme AS".to_string(),
        company_image_url: None,
        image_url: None,
        title: format!("Stilling {slug}"),
        description: format!("Beskrivelse for {slug}"),
        deadline: None,
        tags: Vec::new(),
        definitions: Vec::new(),
    }
}

/// A sample payload with a deadline and a location definition.
pub fn sample_post_in(slug: &str, city: &str, deadline: Option<NaiveDate>) -> NewJobPost {
    let mut post = sample_new_post(slug);
    post.deadline = deadline;
    post.definitions.push(DefinitionInput {
        key: "Sted".to_string(),
        value: city.to_string(),
    });
    post
}
