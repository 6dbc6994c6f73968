//! Idea submission rules.

use crate::error::CoreError;

/// Run credits consumed by one idea submission.
pub const RUNS_PER_IDEA: i32 = 1;

/// Reject a submission when the user has no run credits left.
///
/// This is the early, user-facing check. The decrement itself is guarded in
/// SQL so concurrent submissions cannot push the counter below zero.
pub fn ensure_runs_available(remaining_runs: i32) -> Result<(), CoreError> {
    if remaining_runs < RUNS_PER_IDEA {
        return Err(quota_exhausted());
    }
    Ok(())
}

/// The error reported when a submission finds no run credits.
pub fn quota_exhausted() -> CoreError {
    CoreError::QuotaExhausted(
        "You have no remaining runs. Upgrade your plan to submit more ideas.".into(),
    )
}

/// Treat a blank optional text field as absent.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_runs_is_exhausted() {
        assert!(matches!(
            ensure_runs_available(0),
            Err(CoreError::QuotaExhausted(_))
        ));
    }

    #[test]
    fn negative_runs_is_exhausted() {
        assert!(ensure_runs_available(-3).is_err());
    }

    #[test]
    fn one_run_is_enough() {
        assert!(ensure_runs_available(1).is_ok());
    }

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
        assert_eq!(
            normalize_optional(Some(" spreadsheets ".into())),
            Some("spreadsheets".into())
        );
    }
}
