use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in the Polizas
/// backend. It uses the `thiserror` crate for ergonomic error handling and
/// automatic conversion from underlying library errors.
///
/// # Error Conversion
///
/// Most errors automatically convert from their source types using the `#[from]` attribute:
/// - `sqlx::Error` → `AppError::DatabaseError`
///
/// # Examples
///
/// ```no_run
/// use polizas_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::PolicyNotFound(42))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// This error wraps all errors from SQLx database operations, including
    /// connection failures, query errors, and constraint violations (for
    /// example a company name rejected by the table's CHECK constraint).
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Policy not found in the database.
    #[error("Policy not found: {0}")]
    PolicyNotFound(i32),

    /// Company name outside the closed set of insurers.
    #[error("Invalid company: {0}")]
    InvalidCompany(String),

    /// Section outside the closed set of policy categories.
    #[error("Invalid section: {0}")]
    InvalidSection(String),

    /// Status value other than 0 (inactive) or 1 (active).
    #[error("Invalid status: {0}")]
    InvalidStatus(i64),

    /// Report request that cannot be laid out.
    ///
    /// Raised when a table-shaped request carries no table dataset, or a
    /// dataset does not match the shape implied by its section tag.
    #[error("Invalid report request: {0}")]
    InvalidReport(String),

    /// Spreadsheet or PDF encoding failed.
    #[error("Report rendering failed: {0}")]
    RenderError(String),

    /// Configuration error.
    ///
    /// This error occurs when a configuration value is missing or unusable,
    /// such as an empty JWT secret.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the error was caused by a value outside one of the
    /// closed policy enumerations. These are answered with 400; everything
    /// else, including malformed report requests, is a server error.
    ///
    /// # Examples
    ///
    /// ```
    /// use polizas_core::error::AppError;
    ///
    /// assert!(AppError::InvalidCompany("Acme".to_string()).is_client_error());
    /// assert!(!AppError::RenderError("disk full".to_string()).is_client_error());
    /// ```
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCompany(_)
                | AppError::InvalidSection(_)
                | AppError::InvalidStatus(_)
        )
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::RenderError(err.to_string())
    }
}

impl From<printpdf::Error> for AppError {
    fn from(err: printpdf::Error) -> Self {
        AppError::RenderError(err.to_string())
    }
}
