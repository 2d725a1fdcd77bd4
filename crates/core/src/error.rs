use clinic_types::TypeError;

/// Status code the gateway uses for a duplicate booking.
const CONFLICT_STATUS: u16 = 409;

/// The single error shape surfaced by every gateway call and controller action.
///
/// Remote-derived variants display as `"{status} - {detail}"`, which is also the text kept in
/// the store's error slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClinicError {
    #[error("{0}")]
    Validation(String),
    #[error("{status} - {detail}")]
    Remote { status: u16, detail: String },
    #[error("{status} - {detail}")]
    Conflict { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClinicError {
    /// Builds the error for a non-success gateway response.
    ///
    /// Duplicate-booking rejections come back as `409` with a "conflict" message; either marker
    /// is enough to report [`ClinicError::Conflict`]. The detail text is kept verbatim.
    pub fn remote(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if status == CONFLICT_STATUS || detail.to_ascii_lowercase().contains("conflict") {
            Self::Conflict { status, detail }
        } else {
            Self::Remote { status, detail }
        }
    }

    /// HTTP status carried by remote-derived errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::Conflict { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Detail text carried by remote-derived errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Remote { detail, .. } | Self::Conflict { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<TypeError> for ClinicError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
