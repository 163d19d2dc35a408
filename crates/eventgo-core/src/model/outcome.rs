use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Result of one redemption attempt.
///
/// Exactly one is produced per [`RedemptionRequest`](super::RedemptionRequest).
/// `AlreadyRedeemed` is not an error: the ticket is valid, the holder just
/// came through before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RedemptionOutcome {
    Success {
        order_id: u64,
        attendee_name: Option<String>,
    },
    AlreadyRedeemed {
        attendee_name: Option<String>,
        redeemed_at: Option<DateTime<Utc>>,
    },
    /// Malformed or rejected code (unpaid order, missing code, ...).
    InvalidCode { reason: Option<String> },
    /// No ticket matches the code for this event.
    NotFound,
    /// Credential missing, invalid or expired. Needs a fresh login.
    Unauthorized,
    /// Network failure, timeout or server error. Scanning again may succeed.
    TransientError { message: String },
}

/// Coarse grouping used by front ends to pick alert styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeCategory {
    Success,
    Duplicate,
    Error,
}

impl RedemptionOutcome {
    pub fn category(&self) -> OutcomeCategory {
        match self {
            Self::Success { .. } => OutcomeCategory::Success,
            Self::AlreadyRedeemed { .. } => OutcomeCategory::Duplicate,
            Self::InvalidCode { .. }
            | Self::NotFound
            | Self::Unauthorized
            | Self::TransientError { .. } => OutcomeCategory::Error,
        }
    }

    /// `true` when the operator has to log in again before scanning.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// `true` when presenting the same code again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientError { .. })
    }

    /// Short machine-friendly name (`success`, `already_redeemed`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::AlreadyRedeemed { .. } => "already_redeemed",
            Self::InvalidCode { .. } => "invalid_code",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::TransientError { .. } => "transient_error",
        }
    }
}

/// Operator-facing message.
impl fmt::Display for RedemptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success {
                order_id,
                attendee_name,
            } => {
                write!(f, "Checked in: order #{order_id}")?;
                if let Some(name) = attendee_name {
                    write!(f, " ({name})")?;
                }
                Ok(())
            }
            Self::AlreadyRedeemed {
                attendee_name,
                redeemed_at,
            } => {
                f.write_str("Ticket already checked in")?;
                if let Some(name) = attendee_name {
                    write!(f, " ({name})")?;
                }
                if let Some(at) = redeemed_at {
                    write!(f, " at {}", at.format("%Y-%m-%d %H:%M UTC"))?;
                }
                Ok(())
            }
            Self::InvalidCode { reason: Some(reason) } => write!(f, "Ticket rejected: {reason}"),
            Self::InvalidCode { reason: None } => f.write_str("Invalid ticket code"),
            Self::NotFound => f.write_str("No ticket with this code for this event"),
            Self::Unauthorized => {
                f.write_str("Access token invalid or expired; log in again to continue")
            }
            Self::TransientError { message } => {
                write!(f, "Check-in failed: {message}. Scan again to retry")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let success = RedemptionOutcome::Success {
            order_id: 77,
            attendee_name: None,
        };
        let dup = RedemptionOutcome::AlreadyRedeemed {
            attendee_name: None,
            redeemed_at: None,
        };
        assert_eq!(success.category(), OutcomeCategory::Success);
        assert_eq!(dup.category(), OutcomeCategory::Duplicate);
        assert_eq!(RedemptionOutcome::NotFound.category(), OutcomeCategory::Error);
        assert_eq!(OutcomeCategory::Duplicate.to_string(), "duplicate");
    }

    #[test]
    fn only_unauthorized_requires_reauth() {
        assert!(RedemptionOutcome::Unauthorized.requires_reauth());
        assert!(!RedemptionOutcome::NotFound.requires_reauth());
        assert!(!RedemptionOutcome::InvalidCode { reason: None }.requires_reauth());
    }

    #[test]
    fn only_transient_is_retryable() {
        let transient = RedemptionOutcome::TransientError {
            message: "timeout".into(),
        };
        assert!(transient.is_retryable());
        assert!(!RedemptionOutcome::Unauthorized.is_retryable());
    }

    #[test]
    fn display_messages() {
        let success = RedemptionOutcome::Success {
            order_id: 77,
            attendee_name: Some("Nguyen Van A".into()),
        };
        assert_eq!(success.to_string(), "Checked in: order #77 (Nguyen Van A)");

        let dup = RedemptionOutcome::AlreadyRedeemed {
            attendee_name: Some("Nguyen Van A".into()),
            redeemed_at: "2024-01-01T10:00:00Z".parse().ok(),
        };
        assert_eq!(
            dup.to_string(),
            "Ticket already checked in (Nguyen Van A) at 2024-01-01 10:00 UTC"
        );
    }

    #[test]
    fn serializes_with_tag() {
        let json = serde_json::to_value(RedemptionOutcome::NotFound)
            .unwrap_or_else(|e| panic!("serialize failed: {e}"));
        assert_eq!(json["outcome"], "not_found");
    }
}
