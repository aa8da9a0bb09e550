//! Session lifecycle notifications

/// Receives a notification when the session can no longer be recovered.
///
/// The host decides what to do with it, typically moving the user to the
/// sign-in screen.
pub trait SessionListener: Send + Sync {
    /// Called once per failed refresh, after the session was torn down.
    fn on_session_expired(&self);
}

impl<F> SessionListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_session_expired(&self) {
        self();
    }
}
