/// Hooks the transport calls for conditions the host UI has to react to.
///
/// The transport knows nothing about navigation or dialogs; a host implements this
/// trait to redirect to its sign-in entry point on `session_expired` and to show
/// notifications for the others. Every method may be called any number of times,
/// including back to back for the same condition.
///
/// The default bodies only log.
pub trait TransportEvents: Send + Sync {
    /// A response came back 401. Called once per such response.
    fn session_expired(&self) {
        log::warn!("Session expired, returning to the sign-in entry point");
    }

    /// A response came back 403.
    fn forbidden(&self, message: &str) {
        log::warn!("Forbidden: {}", message);
    }

    /// A request could not be constructed and was never sent.
    fn request_failed(&self, message: &str) {
        log::error!("Request error: {}", message);
    }
}

/// Event sink that only logs. Used when the host has nothing to subscribe.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEvents;

impl TransportEvents for LogEvents {}
