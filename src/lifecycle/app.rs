//! The capability every managed application implements.

use async_trait::async_trait;

use crate::lifecycle::context::Context;

/// Error type returned by applications.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An independently startable and stoppable unit of work.
///
/// `start` must not return `Ok` before the application is ready to do work.
/// `stop` must not return before every background activity the application
/// owns has ceased. Implementations should watch `ctx` to bound their own
/// shutdown time; the coordinator itself never interrupts a stop.
#[async_trait]
pub trait App: Send + Sync + 'static {
    /// Name used in logs and reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Bring the application into a running state.
    async fn start(&self) -> Result<(), BoxError>;

    /// Bring the application into a fully stopped state.
    async fn stop(&self, ctx: Context) -> Result<(), BoxError>;
}
