//! Best-effort helpers.

use std::future::Future;

use logsbot_core::Result;

/// Await `operation`, substituting `fallback` for any error.
///
/// The failure is logged at `warn` with `what` as context and never
/// propagated.
pub async fn try_or_default<T, F>(what: &str, operation: F, fallback: T) -> T
where
    F: Future<Output = Result<T>>,
{
    match operation.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "{what} failed; using fallback");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsbot_core::LogsbotError;

    #[tokio::test]
    async fn test_success_passes_through() {
        let value = try_or_default("lookup", async { Ok(7) }, 0).await;
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_error_yields_fallback() {
        let value = try_or_default(
            "lookup",
            async { Err::<i32, _>(LogsbotError::Lookup("down".to_string())) },
            -1,
        )
        .await;
        assert_eq!(value, -1);
    }
}
