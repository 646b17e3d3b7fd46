use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::error;
use tracing::Instrument;

use crate::Result;

// Helper function to spawn tasks on the client's runtime and log their failure.
// The task stays inside the caller's span.
pub(crate) fn spawn_task<F, Fut>(
    runtime: &Handle,
    name: &str,
    task_fn: F,
) -> JoinHandle<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send + 'static,
{
    // Clone the name so it can be safely moved into the async block
    let name = name.to_string();
    runtime.spawn(
        async move {
            if let Err(e) = task_fn().await {
                error!("spawned task: {name} stopped or encountered an error: {:?}", e);
            }
        }
        .in_current_span(),
    )
}
