//! Integration tests for PolicyRepository.

use crate::integration::common::{sample_new_policy, setup_test_db};
use chrono::NaiveDate;
use polizas_core::models::{Company, PolicyFilter, PolicyStatus, Section};
use polizas_db::PolicyRepository;

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_insert_and_get_round_trips_fields() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);

    let mut new_policy = sample_new_policy(Company::Compania4, (2024, 3, 15), 1200);
    new_policy.section = Section::ResponsabilidadCivil;
    new_policy.status = PolicyStatus::Inactive;

    let id = repo.insert(&new_policy).await.unwrap();
    let policy = repo.get(id).await.unwrap().expect("policy should exist");

    assert_eq!(policy.id, id);
    assert_eq!(policy.company, Company::Compania4);
    assert_eq!(policy.section, Section::ResponsabilidadCivil);
    assert_eq!(policy.status, PolicyStatus::Inactive);
    assert_eq!(policy.premium, 1200);
    assert_eq!(
        policy.issue_date,
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    );
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);

    assert!(repo.get(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_existing_and_missing() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);

    let id = repo
        .insert(&sample_new_policy(Company::Compania1, (2024, 1, 1), 100))
        .await
        .unwrap();
    repo.insert(&sample_new_policy(Company::Compania2, (2024, 1, 2), 200))
        .await
        .unwrap();

    assert!(!repo.delete(9999).await.unwrap());
    assert_eq!(repo.list(&PolicyFilter::default()).await.unwrap().len(), 2);

    assert!(repo.delete(id).await.unwrap());
    assert!(repo.get(id).await.unwrap().is_none());
    assert_eq!(repo.list(&PolicyFilter::default()).await.unwrap().len(), 1);
}

async fn raw_insert(
    pool: &sqlx::PgPool,
    company: &str,
    estado: i16,
    section: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO polizas
             (id_compania, nombre_compania, numero_poliza, fecha_emision, estado, prima, seccion)
         VALUES (1, $1, 1, '2024-01-01', $2, 100, $3)",
    )
    .bind(company)
    .bind(estado)
    .bind(section)
    .execute(pool)
    .await
    .map(|_| ())
}

fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|e| e.constraint())
        .map(str::to_string)
}

#[tokio::test]
async fn test_raw_insert_with_allowed_values_succeeds() {
    let (pool, _container) = setup_test_db().await;

    raw_insert(&pool, "Compañía1", 1, "automotor").await.unwrap();
}

#[tokio::test]
async fn test_check_constraint_rejects_unknown_company() {
    let (pool, _container) = setup_test_db().await;

    let err = raw_insert(&pool, "Compañía9", 1, "automotor")
        .await
        .unwrap_err();

    assert_eq!(violated_constraint(&err).as_deref(), Some("chk_compania"));
}

#[tokio::test]
async fn test_check_constraint_rejects_unknown_section() {
    let (pool, _container) = setup_test_db().await;

    let err = raw_insert(&pool, "Compañía1", 1, "vida").await.unwrap_err();

    assert_eq!(violated_constraint(&err).as_deref(), Some("chk_seccion"));
}

#[tokio::test]
async fn test_check_constraint_rejects_unknown_status() {
    let (pool, _container) = setup_test_db().await;

    let err = raw_insert(&pool, "Compañía1", 2, "automotor")
        .await
        .unwrap_err();

    assert_eq!(violated_constraint(&err).as_deref(), Some("chk_estado"));
}

// =============================================================================
// Filters
// =============================================================================

async fn seeded_repo(repo: &PolicyRepository) {
    repo.insert(&sample_new_policy(Company::Compania1, (2024, 1, 10), 1000))
        .await
        .unwrap();
    repo.insert(&sample_new_policy(Company::Compania1, (2024, 2, 5), 500))
        .await
        .unwrap();

    let mut robo = sample_new_policy(Company::Compania3, (2023, 12, 31), 250);
    robo.section = Section::Robo;
    repo.insert(&robo).await.unwrap();

    let mut inactive = sample_new_policy(Company::Compania2, (2024, 1, 20), 750);
    inactive.status = PolicyStatus::Inactive;
    repo.insert(&inactive).await.unwrap();
}

#[tokio::test]
async fn test_list_without_filter_returns_all_in_id_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);
    seeded_repo(&repo).await;

    let policies = repo.list(&PolicyFilter::default()).await.unwrap();

    assert_eq!(policies.len(), 4);
    assert!(policies.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_list_filters_by_company_and_status() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);
    seeded_repo(&repo).await;

    let by_company = PolicyFilter {
        company: Some(Company::Compania1),
        ..Default::default()
    };
    let policies = repo.list(&by_company).await.unwrap();
    assert_eq!(policies.len(), 2);
    assert!(policies.iter().all(|p| p.company == Company::Compania1));

    let inactive = PolicyFilter {
        status: Some(PolicyStatus::Inactive),
        ..Default::default()
    };
    let policies = repo.list(&inactive).await.unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].company, Company::Compania2);
}

#[tokio::test]
async fn test_list_filters_by_inclusive_date_range() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);
    seeded_repo(&repo).await;

    let january = PolicyFilter {
        issued_between: Some((
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )),
        ..Default::default()
    };
    let policies = repo.list(&january).await.unwrap();

    assert_eq!(policies.len(), 2);
}

#[tokio::test]
async fn test_list_combines_filters_with_and() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);
    seeded_repo(&repo).await;

    let filter = PolicyFilter {
        company: Some(Company::Compania3),
        section: Some(Section::Robo),
        ..Default::default()
    };
    assert_eq!(repo.list(&filter).await.unwrap().len(), 1);

    let filter = PolicyFilter {
        company: Some(Company::Compania1),
        section: Some(Section::Robo),
        ..Default::default()
    };
    assert!(repo.list(&filter).await.unwrap().is_empty());
}

// =============================================================================
// Aggregates
// =============================================================================

#[tokio::test]
async fn test_aggregates_on_empty_table() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);

    assert!(repo.count_by_company().await.unwrap().is_empty());
    assert_eq!(
        repo.count_with_status(PolicyStatus::Active).await.unwrap(),
        0
    );
    assert!(repo.premium_by_company().await.unwrap().is_empty());
    assert_eq!(repo.premium_total().await.unwrap(), 0);
    assert!(repo.monthly_distribution().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_aggregates_on_seeded_table() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);
    seeded_repo(&repo).await;

    let counts = repo.count_by_company().await.unwrap();
    let compania1 = counts.iter().find(|c| c.company == "Compañía1").unwrap();
    assert_eq!(compania1.count, 2);

    let active = repo.count_with_status(PolicyStatus::Active).await.unwrap();
    let inactive = repo.count_with_status(PolicyStatus::Inactive).await.unwrap();
    assert_eq!((active, inactive), (3, 1));

    let premiums = repo.premium_by_company().await.unwrap();
    let total = repo.premium_total().await.unwrap();
    assert_eq!(total, 2500);
    assert_eq!(premiums.iter().map(|p| p.total).sum::<i64>(), total);
}

#[tokio::test]
async fn test_monthly_distribution_is_chronological() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);
    seeded_repo(&repo).await;

    let buckets = repo.monthly_distribution().await.unwrap();
    let months: Vec<&str> = buckets.iter().map(|b| b.month.as_str()).collect();

    assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    assert_eq!(buckets[1].count, 2);
    assert_eq!(buckets[1].premium, 1750);
}

#[tokio::test]
async fn test_health_check() {
    let (pool, _container) = setup_test_db().await;
    let repo = PolicyRepository::new(pool);

    assert!(repo.health_check().await.is_ok());
}
