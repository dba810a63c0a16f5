// service/side_effect.rs
use std::fmt::Display;
use std::future::Future;

/// Runs a non-essential side effect (object deletion, identity-group sync,
/// secondary notification). A failure is logged and swallowed; the primary
/// operation's outcome never depends on it.
pub async fn best_effort<T, E, F>(label: &str, fut: F) -> Option<T>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("best-effort {} failed: {}", label, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_value_on_success() {
        let out = best_effort("noop", async { Ok::<_, String>(7) }).await;
        assert_eq!(out, Some(7));
    }

    #[tokio::test]
    async fn swallows_failures() {
        let out =
            best_effort::<(), _, _>("failing", async { Err("boom".to_string()) }).await;
        assert_eq!(out, None);
    }
}
