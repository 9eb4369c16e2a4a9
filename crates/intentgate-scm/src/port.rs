use async_trait::async_trait;

use crate::model::{Commit, Simulation};

/// SCM Port (§4.2). A real implementation shells out to the underlying VCS
/// from an isolated scratch area; never the live working tree.
#[async_trait]
pub trait ScmPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn simulate(&self, source: &str, target: &str) -> Result<Simulation, Self::Error>;

    async fn execute_merge(&self, source: &str, target: &str) -> Result<String, Self::Error>;

    async fn log_between(&self, base: &str, head: &str) -> Result<Vec<Commit>, Self::Error>;
}
