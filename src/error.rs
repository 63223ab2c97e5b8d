//! Ledger error taxonomy.
//!
//! [`LedgerError`] is the single error type returned by every ledger
//! operation. The set of variants is closed; each carries a human-readable
//! message and maps to a stable numeric code so a host transport can render
//! it without inspecting the message text.

use serde::Serialize;

/// Convenience alias used throughout the crate.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Structured error body a host can serialize as-is.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "kind": "campaign_not_found",
///     "message": "campaign not found: Campaign with id=42 not found"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, kind tag and message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Snake-case variant tag.
    pub kind: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Failure kinds of the campaign ledger.
///
/// # Error Code Ranges
///
/// | Range     | Category             |
/// |-----------|----------------------|
/// | 1000–1999 | Validation           |
/// | 2000–2999 | Lookup               |
/// | 3000–3999 | Storage              |
/// | 4000–4999 | Contribution rules   |
/// | 5000–5999 | Authorization        |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// No campaign (or contribution list) exists for the requested id.
    #[error("campaign not found: {0}")]
    CampaignNotFound(String),

    /// Malformed input, an expired campaign, or an action the campaign's
    /// current state does not allow.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A contribution broke the goal ceiling or targeted a closed campaign.
    #[error("contribution error: {0}")]
    ContributionError(String),

    /// The caller is not the campaign owner.
    #[error("authorization error: {0}")]
    AuthorizationError(String),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    StorageError(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::ValidationError(_) => 1001,
            Self::CampaignNotFound(_) => 2001,
            Self::StorageError(_) => 3001,
            Self::ContributionError(_) => 4001,
            Self::AuthorizationError(_) => 5001,
        }
    }

    /// Returns the snake-case tag of this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CampaignNotFound(_) => "campaign_not_found",
            Self::ValidationError(_) => "validation_error",
            Self::ContributionError(_) => "contribution_error",
            Self::AuthorizationError(_) => "authorization_error",
            Self::StorageError(_) => "storage_error",
        }
    }

    /// Returns the message carried by this variant, without the prefix
    /// added by [`std::fmt::Display`].
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::CampaignNotFound(msg)
            | Self::ValidationError(msg)
            | Self::ContributionError(msg)
            | Self::AuthorizationError(msg)
            | Self::StorageError(msg) => msg,
        }
    }

    /// Folds the failure of an undo step into the error that triggered it.
    /// The original message comes first.
    #[must_use]
    pub fn with_failed_rollback(self, rollback: &Self) -> Self {
        Self::StorageError(format!(
            "{}; rollback failed: {}",
            self.message(),
            rollback.message()
        ))
    }

    /// Builds the serializable [`ErrorResponse`] for this error.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
                message: self.to_string(),
            },
        }
    }
}
