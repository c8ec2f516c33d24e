/// Triggers a full reload of the hosting environment.
///
/// In a browser this navigates the page to itself, destroying the running
/// program. Native hosts typically restart the process or the embedding
/// view. The call has no observable result for the caller.
pub trait Reloader: Send + Sync {
    fn reload(&self);
}

impl<F> Reloader for F
where
    F: Fn() + Send + Sync,
{
    fn reload(&self) {
        self()
    }
}
