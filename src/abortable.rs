use crate::Error;

/// Process-level escalation hook.
///
/// Called when the coordination session is irrecoverably lost. Implementors
/// are expected to stop or restart the owning process; the watcher never
/// reconnects on its own.
pub trait Abortable: Send + Sync {
    fn abort(
        &self,
        why: &str,
        cause: Option<Error>,
    );
}

impl<F> Abortable for F
where
    F: Fn(&str, Option<Error>) + Send + Sync,
{
    fn abort(
        &self,
        why: &str,
        cause: Option<Error>,
    ) {
        self(why, cause)
    }
}
