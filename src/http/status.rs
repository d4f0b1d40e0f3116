//! HTTP status registry.
//!
//! # Responsibilities
//! - Classify status codes into families
//! - Provide WebDAV status codes missing from the common set
//! - Resolve any numeric code to a status, synthesizing an unknown one
//!
//! # Design Decisions
//! - Standard codes come from the `http` crate's canonical reason phrases
//! - Unknown codes always land in `Family::Other`, whatever their range

use std::fmt;

use axum::http::StatusCode;

/// Reason phrase reported for codes with no known status.
pub const UNKNOWN_REASON_PHRASE: &str = "Unknown HTTP Status Code";

/// Class of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Informational,
    Successful,
    Redirection,
    ClientError,
    ServerError,
    Other,
}

impl Family {
    /// Family implied by the first digit of the code.
    pub fn of(code: u16) -> Self {
        match code / 100 {
            1 => Family::Informational,
            2 => Family::Successful,
            3 => Family::Redirection,
            4 => Family::ClientError,
            5 => Family::ServerError,
            _ => Family::Other,
        }
    }
}

/// Status code together with its reason phrase and family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub code: u16,
    pub reason: &'static str,
    pub family: Family,
}

impl StatusInfo {
    pub fn is_known(&self) -> bool {
        self.reason != UNKNOWN_REASON_PHRASE
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason)
    }
}

impl From<StatusCode> for StatusInfo {
    fn from(status: StatusCode) -> Self {
        from_code(status.as_u16())
    }
}

/// WebDAV statuses (RFC 4918) not part of the common registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedStatus {
    /// 207 Multi-Status
    MultiStatus,
    /// 422 Unprocessable Entity
    UnprocessableEntity,
    /// 423 Locked
    Locked,
    /// 424 Failed Dependency
    FailedDependency,
    /// 507 Insufficient Storage
    InsufficientStorage,
}

impl ExtendedStatus {
    pub const ALL: [ExtendedStatus; 5] = [
        ExtendedStatus::MultiStatus,
        ExtendedStatus::UnprocessableEntity,
        ExtendedStatus::Locked,
        ExtendedStatus::FailedDependency,
        ExtendedStatus::InsufficientStorage,
    ];

    pub const fn code(self) -> u16 {
        match self {
            ExtendedStatus::MultiStatus => 207,
            ExtendedStatus::UnprocessableEntity => 422,
            ExtendedStatus::Locked => 423,
            ExtendedStatus::FailedDependency => 424,
            ExtendedStatus::InsufficientStorage => 507,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            ExtendedStatus::MultiStatus => "Multi-Status",
            ExtendedStatus::UnprocessableEntity => "Unprocessable Entity",
            ExtendedStatus::Locked => "Locked",
            ExtendedStatus::FailedDependency => "Failed Dependency",
            ExtendedStatus::InsufficientStorage => "Insufficient Storage",
        }
    }

    pub fn family(self) -> Family {
        Family::of(self.code())
    }

    pub fn info(self) -> StatusInfo {
        StatusInfo {
            code: self.code(),
            reason: self.reason(),
            family: self.family(),
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl From<ExtendedStatus> for StatusInfo {
    fn from(status: ExtendedStatus) -> Self {
        status.info()
    }
}

impl From<ExtendedStatus> for StatusCode {
    fn from(status: ExtendedStatus) -> Self {
        // All extended codes are in 100..=999.
        StatusCode::from_u16(status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Resolve a numeric code to a status.
///
/// Looks in the standard registry first, then in [`ExtendedStatus`], and
/// otherwise returns a synthetic status with family [`Family::Other`].
pub fn from_code(code: u16) -> StatusInfo {
    let standard = StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason());

    if let Some(reason) = standard {
        return StatusInfo {
            code,
            reason,
            family: Family::of(code),
        };
    }

    match ExtendedStatus::from_code(code) {
        Some(extended) => extended.info(),
        None => StatusInfo {
            code,
            reason: UNKNOWN_REASON_PHRASE,
            family: Family::Other,
        },
    }
}

/// Whether the code is in the 2xx range.
pub fn is_successful(code: u16) -> bool {
    (200..=299).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup() {
        let s = from_code(404);
        assert_eq!(s.reason, "Not Found");
        assert_eq!(s.family, Family::ClientError);
        assert!(s.is_known());
    }

    #[test]
    fn test_extended_statuses() {
        for status in ExtendedStatus::ALL {
            let info = from_code(status.code());
            assert_eq!(info.code, status.code());
            assert_eq!(info.reason, status.reason());
        }
        assert_eq!(ExtendedStatus::Locked.family(), Family::ClientError);
        assert_eq!(ExtendedStatus::InsufficientStorage.family(), Family::ServerError);
    }

    #[test]
    fn test_unknown_code_is_other() {
        let s = from_code(299);
        assert_eq!(s.reason, UNKNOWN_REASON_PHRASE);
        assert_eq!(s.family, Family::Other);
        assert!(!s.is_known());
    }

    #[test]
    fn test_success_range() {
        assert!(is_successful(200));
        assert!(is_successful(299));
        assert!(!is_successful(199));
        assert!(!is_successful(300));
    }
}
