//! Request DTOs for API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use polizas_core::report::TABLE_SECTION;
use polizas_core::{
    AppError, Company, NewPolicy, PolicyFilter, PolicyStatus, ReportData, ReportRequest, Section,
    Series,
};

use crate::error::ApiError;

// =============================================================================
// Auth
// =============================================================================

/// Login credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@test.com")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
}

// =============================================================================
// Policies
// =============================================================================

/// Query parameters for listing policies.
///
/// The date range only applies when both `fechaInicio` and `fechaFin` are set.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PolicyQuery {
    /// Company name
    #[param(example = "Compañía1")]
    pub compania: Option<String>,

    /// Status: 1 active, 0 inactive
    #[param(example = "1")]
    pub estado: Option<String>,

    /// First issue date of the range (inclusive)
    #[serde(rename = "fechaInicio")]
    #[param(example = "2024-01-01")]
    pub fecha_inicio: Option<String>,

    /// Last issue date of the range (inclusive)
    #[serde(rename = "fechaFin")]
    #[param(example = "2024-12-31")]
    pub fecha_fin: Option<String>,

    /// Section name
    #[param(example = "automotor")]
    pub seccion: Option<String>,
}

/// Empty query parameters are treated as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    non_empty(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                ApiError::BadRequest(format!("Invalid {}: '{}', expected YYYY-MM-DD", name, s))
            })
        })
        .transpose()
}

impl TryFrom<PolicyQuery> for PolicyFilter {
    type Error = ApiError;

    fn try_from(query: PolicyQuery) -> Result<Self, Self::Error> {
        let company = non_empty(query.compania.as_deref())
            .map(str::parse::<Company>)
            .transpose()?;
        let status = non_empty(query.estado.as_deref())
            .map(|s| {
                s.parse::<PolicyStatus>()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid estado: '{}'", s)))
            })
            .transpose()?;
        let section = non_empty(query.seccion.as_deref())
            .map(str::parse::<Section>)
            .transpose()?;
        let from = parse_date("fechaInicio", query.fecha_inicio.as_deref())?;
        let to = parse_date("fechaFin", query.fecha_fin.as_deref())?;
        let issued_between = from.zip(to);

        Ok(PolicyFilter {
            company,
            status,
            issued_between,
            section,
        })
    }
}

/// Request body for creating a policy.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePolicyRequest {
    #[schema(example = 1)]
    pub id_compania: i32,

    #[schema(value_type = String, example = "Compañía1")]
    pub nombre_compania: Company,

    #[schema(example = 10001)]
    pub numero_poliza: i32,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub fecha_emision: NaiveDate,

    /// 1 active (default), 0 inactive
    #[serde(default)]
    #[schema(value_type = Option<i16>, example = 1)]
    pub estado: PolicyStatus,

    #[schema(example = 1500)]
    pub prima: i32,

    #[schema(value_type = String, example = "automotor")]
    pub seccion: Section,
}

impl From<CreatePolicyRequest> for NewPolicy {
    fn from(req: CreatePolicyRequest) -> Self {
        NewPolicy {
            company_id: req.id_compania,
            company: req.nombre_compania,
            policy_number: req.numero_poliza,
            issue_date: req.fecha_emision,
            status: req.estado,
            premium: req.prima,
            section: req.seccion,
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// One chart dataset. Extra chart fields (colors, borders) are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DatasetBody {
    #[serde(default)]
    #[schema(example = "Pólizas")]
    pub label: String,

    /// Numbers (or null) per label; for the `table` section, rows of cells
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
}

/// Request body for report downloads, shaped like the dashboard's chart data.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportRequestBody {
    /// Dashboard section; `table` renders literal rows
    #[serde(rename = "activeSection")]
    #[schema(example = "companies")]
    pub active_section: String,

    #[schema(example = "Pólizas por compañía")]
    pub title: String,

    pub labels: Vec<String>,

    pub datasets: Vec<DatasetBody>,
}

fn cell_text(value: &Value) -> Result<String, AppError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(AppError::InvalidReport(format!(
            "Table cell must be a scalar, got {}",
            other
        ))),
    }
}

fn series_value(value: &Value) -> Result<Option<f64>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| AppError::InvalidReport(format!("Unrepresentable number: {}", n))),
        other => Err(AppError::InvalidReport(format!(
            "Series value must be a number, got {}",
            other
        ))),
    }
}

impl TryFrom<ReportRequestBody> for ReportRequest {
    type Error = AppError;

    fn try_from(body: ReportRequestBody) -> Result<Self, Self::Error> {
        let data = if body.active_section == TABLE_SECTION {
            let dataset = body
                .datasets
                .first()
                .ok_or_else(|| AppError::InvalidReport("Table report without rows".to_string()))?;
            let rows = dataset
                .data
                .iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.iter().map(cell_text).collect(),
                    other => Err(AppError::InvalidReport(format!(
                        "Table row must be an array, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<Vec<String>>, AppError>>()?;
            ReportData::Table(rows)
        } else {
            let series = body
                .datasets
                .iter()
                .map(|dataset| {
                    let values = dataset
                        .data
                        .iter()
                        .map(series_value)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Series::new(dataset.label.clone(), values))
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            ReportData::Series(series)
        };

        Ok(ReportRequest::new(
            body.active_section,
            body.title,
            body.labels,
            data,
        ))
    }
}
