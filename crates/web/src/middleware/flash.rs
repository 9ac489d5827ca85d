//! Session-backed flash queue.
//!
//! Handlers push notices before redirecting; the next rendered page drains
//! the queue.

use tower_sessions::Session;

use crate::models::{Flash, FlashLevel, session_keys};

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queue: Vec<Flash> = session.get(session_keys::FLASH).await?.unwrap_or_default();
    queue.push(Flash::new(level, message));
    session.insert(session_keys::FLASH, queue).await
}

/// Queue a notice, logging instead of failing if the session is unavailable.
pub async fn notify(session: &Session, level: FlashLevel, message: impl Into<String>) {
    if let Err(e) = push(session, level, message).await {
        tracing::warn!(error = %e, "Failed to queue flash notice");
    }
}

/// Drain every pending notice.
///
/// A session that cannot be read yields no notices.
pub async fn take(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(session_keys::FLASH).await {
        Ok(queue) => queue.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash notices");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_take_drains_in_order() {
        let session = session();
        push(&session, FlashLevel::Success, "first").await.unwrap();
        notify(&session, FlashLevel::Info, "second").await;

        let flashes = take(&session).await;
        assert_eq!(
            flashes,
            [
                Flash::new(FlashLevel::Success, "first"),
                Flash::new(FlashLevel::Info, "second"),
            ]
        );
        assert!(take(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_take_on_fresh_session_is_empty() {
        assert!(take(&session()).await.is_empty());
    }
}
