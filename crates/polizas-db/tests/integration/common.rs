//! Test utilities for integration tests.
//!
//! Provides helper functions to set up isolated PostgreSQL containers
//! with the `polizas` schema for each test.

use chrono::NaiveDate;
use polizas_core::models::{Company, NewPolicy, PolicyStatus, Section};
use polizas_db::PolicyRepository;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

/// Sets up a PostgreSQL container and returns a connection pool with the
/// schema already created.
///
/// Each call creates a fresh, isolated database container. The container is
/// automatically cleaned up when the returned `ContainerAsync` is dropped.
///
/// # Returns
///
/// A tuple of (PgPool, ContainerAsync) - keep the container alive for the test duration.
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

    // The server restarts once after initdb, so retry until it accepts connections
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

    PolicyRepository::new(pool.clone())
        .migrate()
        .await
        .expect("Failed to create schema");

    (pool, container)
}

/// Creates a sample NewPolicy for testing.
///
/// # Arguments
///
/// * `company` - The issuing company
/// * `issue_date` - `(year, month, day)` of issue
/// * `premium` - The premium amount
pub fn sample_new_policy(company: Company, issue_date: (i32, u32, u32), premium: i32) -> NewPolicy {
    NewPolicy {
        company_id: 1,
        company,
        policy_number: 10_000 + premium,
        issue_date: NaiveDate::from_ymd_opt(issue_date.0, issue_date.1, issue_date.2)
            .expect("valid date"),
        status: PolicyStatus::Active,
        premium,
        section: Section::Automotor,
    }
}
