//! Shared utilities for use cases.

use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested on an optional token.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_token_is_never_cancelled() {
        assert!(!is_cancelled(&None));
    }

    #[test]
    fn test_cancelled_token_detected() {
        let token = CancellationToken::new();
        assert!(!is_cancelled(&Some(token.clone())));
        token.cancel();
        assert!(is_cancelled(&Some(token)));
    }
}
