//! Policy repository for PostgreSQL.
//!
//! Each method issues one statement against the `polizas` table. Aggregate
//! queries are independent round trips and share no snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use polizas_core::error::AppError;
use polizas_core::models::{
    Company, CompanyCount, CompanyPremium, MonthlyBucket, NewPolicy, Policy, PolicyFilter,
    PolicyStatus, Section,
};
use sqlx::{PgPool, Pool, Postgres, QueryBuilder};
use tracing::debug;

/// Column list for SELECT queries. Must remain a const literal to ensure SQL safety
/// since format!() bypasses sqlx compile-time validation.
const POLICY_COLUMNS: &str = "id, id_compania, nombre_compania, numero_poliza, fecha_emision, \
                              estado, prima, seccion, created_at";

/// Statements creating the schema. Each statement must be executed
/// separately due to sqlx limitations.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS polizas (
        id SERIAL PRIMARY KEY,
        id_compania INTEGER NOT NULL,
        nombre_compania VARCHAR(100) NOT NULL,
        numero_poliza INTEGER NOT NULL,
        fecha_emision DATE NOT NULL,
        estado SMALLINT NOT NULL DEFAULT 1,
        prima INTEGER NOT NULL,
        seccion VARCHAR(50) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT chk_compania CHECK (nombre_compania IN (
            'Compañía1', 'Compañía2', 'Compañía3', 'Compañía4', 'Compañía5'
        )),
        CONSTRAINT chk_seccion CHECK (seccion IN (
            'automotor', 'robo', 'responsabilidad civil', 'combinado familiar',
            'integral para comercio'
        )),
        CONSTRAINT chk_estado CHECK (estado IN (0, 1))
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_polizas_compania ON polizas(nombre_compania)",
    "CREATE INDEX IF NOT EXISTS idx_polizas_fecha ON polizas(fecha_emision)",
];

/// Repository for policy persistence in PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use polizas_db::PolicyRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(5)
///     .connect("postgresql://localhost/polizas")
///     .await?;
///
/// let repo = PolicyRepository::new(pool);
/// repo.migrate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PolicyRepository {
    pool: Pool<Postgres>,
}

impl PolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the table and indexes if they do not exist.
    pub async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(AppError::DatabaseError)?;
        }
        Ok(())
    }

    /// Inserts a policy. Returns the id assigned by the database.
    pub async fn insert(&self, policy: &NewPolicy) -> Result<i32, AppError> {
        let rec: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO polizas (
                id_compania,
                nombre_compania,
                numero_poliza,
                fecha_emision,
                estado,
                prima,
                seccion
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(policy.company_id)
        .bind(policy.company.as_str())
        .bind(policy.policy_number)
        .bind(policy.issue_date)
        .bind(policy.status.as_i16())
        .bind(policy.premium)
        .bind(policy.section.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        debug!(id = rec.0, "Policy inserted");
        Ok(rec.0)
    }

    /// Lists policies matching every set filter, ordered by id.
    pub async fn list(&self, filter: &PolicyFilter) -> Result<Vec<Policy>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM polizas WHERE 1=1", POLICY_COLUMNS));

        if let Some(company) = filter.company {
            query.push(" AND nombre_compania = ").push_bind(company.as_str());
        }
        if let Some(status) = filter.status {
            query.push(" AND estado = ").push_bind(status.as_i16());
        }
        if let Some((from, to)) = filter.issued_between {
            query
                .push(" AND fecha_emision BETWEEN ")
                .push_bind(from)
                .push(" AND ")
                .push_bind(to);
        }
        if let Some(section) = filter.section {
            query.push(" AND seccion = ").push_bind(section.as_str());
        }
        query.push(" ORDER BY id ASC");

        let rows: Vec<PolicyRow> = query
            .build_query_as::<PolicyRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        rows.into_iter().map(Policy::try_from).collect()
    }

    /// Retrieves a policy by id.
    pub async fn get(&self, id: i32) -> Result<Option<Policy>, AppError> {
        let query = format!("SELECT {} FROM polizas WHERE id = $1", POLICY_COLUMNS);
        let row = sqlx::query_as::<_, PolicyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        row.map(Policy::try_from).transpose()
    }

    /// Deletes a policy. Returns true if a row was deleted.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM polizas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Aggregate queries
    // =========================================================================

    pub async fn count_by_company(&self) -> Result<Vec<CompanyCount>, AppError> {
        let rows: Vec<CompanyCountRow> = sqlx::query_as(
            r#"
            SELECT nombre_compania AS company, COUNT(*) AS count
            FROM polizas
            GROUP BY nombre_compania
            ORDER BY nombre_compania
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(rows
            .into_iter()
            .map(|r| CompanyCount {
                company: r.company,
                count: r.count,
            })
            .collect())
    }

    pub async fn count_with_status(&self, status: PolicyStatus) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM polizas WHERE estado = $1")
            .bind(status.as_i16())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rec.0)
    }

    pub async fn premium_by_company(&self) -> Result<Vec<CompanyPremium>, AppError> {
        let rows: Vec<CompanyPremiumRow> = sqlx::query_as(
            r#"
            SELECT nombre_compania AS company, SUM(prima)::BIGINT AS total
            FROM polizas
            GROUP BY nombre_compania
            ORDER BY nombre_compania
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(rows
            .into_iter()
            .map(|r| CompanyPremium {
                company: r.company,
                total: r.total,
            })
            .collect())
    }

    pub async fn premium_total(&self) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as("SELECT COALESCE(SUM(prima), 0)::BIGINT FROM polizas")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rec.0)
    }

    /// Counts and premium sums per `YYYY-MM` issue month, oldest first.
    pub async fn monthly_distribution(&self) -> Result<Vec<MonthlyBucket>, AppError> {
        let rows: Vec<MonthlyRow> = sqlx::query_as(
            r#"
            SELECT
                to_char(fecha_emision, 'YYYY-MM') AS month,
                COUNT(*) AS count,
                SUM(prima)::BIGINT AS premium
            FROM polizas
            GROUP BY to_char(fecha_emision, 'YYYY-MM')
            ORDER BY MIN(fecha_emision) ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(rows
            .into_iter()
            .map(|r| MonthlyBucket {
                month: r.month,
                count: r.count,
                premium: r.premium,
            })
            .collect())
    }

    /// Checks database connectivity by executing a simple query.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(())
    }
}

/// Raw `polizas` row. Converted into [`Policy`] after validating the
/// enumerated columns.
#[derive(sqlx::FromRow)]
struct PolicyRow {
    id: i32,
    id_compania: i32,
    nombre_compania: String,
    numero_poliza: i32,
    fecha_emision: NaiveDate,
    estado: i16,
    prima: i32,
    seccion: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PolicyRow> for Policy {
    type Error = AppError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        Ok(Policy {
            id: row.id,
            company_id: row.id_compania,
            company: row.nombre_compania.parse::<Company>()?,
            policy_number: row.numero_poliza,
            issue_date: row.fecha_emision,
            status: PolicyStatus::try_from(i64::from(row.estado))?,
            premium: row.prima,
            section: row.seccion.parse::<Section>()?,
            created_at: row.created_at,
        })
    }
}

/// Helper struct for deserializing per-company counts
#[derive(sqlx::FromRow)]
struct CompanyCountRow {
    company: String,
    count: i64,
}

/// Helper struct for deserializing per-company premium sums
#[derive(sqlx::FromRow)]
struct CompanyPremiumRow {
    company: String,
    total: i64,
}

/// Helper struct for deserializing monthly buckets
#[derive(sqlx::FromRow)]
struct MonthlyRow {
    month: String,
    count: i64,
    premium: i64,
}

// =============================================================================
// Trait Implementation: PolicyStore
// =============================================================================

impl polizas_core::traits::PolicyStore for PolicyRepository {
    async fn insert(&self, policy: &NewPolicy) -> Result<i32, AppError> {
        PolicyRepository::insert(self, policy).await
    }

    async fn list(&self, filter: &PolicyFilter) -> Result<Vec<Policy>, AppError> {
        PolicyRepository::list(self, filter).await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Policy>, AppError> {
        PolicyRepository::get(self, id).await
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        PolicyRepository::delete(self, id).await
    }

    async fn count_by_company(&self) -> Result<Vec<CompanyCount>, AppError> {
        PolicyRepository::count_by_company(self).await
    }

    async fn count_with_status(&self, status: PolicyStatus) -> Result<i64, AppError> {
        PolicyRepository::count_with_status(self, status).await
    }

    async fn premium_by_company(&self) -> Result<Vec<CompanyPremium>, AppError> {
        PolicyRepository::premium_by_company(self).await
    }

    async fn premium_total(&self) -> Result<i64, AppError> {
        PolicyRepository::premium_total(self).await
    }

    async fn monthly_distribution(&self) -> Result<Vec<MonthlyBucket>, AppError> {
        PolicyRepository::monthly_distribution(self).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        PolicyRepository::health_check(self).await
    }
}
