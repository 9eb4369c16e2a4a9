use serde::{Deserialize, Serialize};

/// Result of simulating a merge of `source` into `target` without mutating
/// the working tree (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub mergeable: bool,
    pub conflicts: Vec<String>,
    pub files_changed: Vec<String>,
    pub base_commit: String,
    pub head_commit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub author: String,
    pub message: String,
    pub files: Vec<String>,
}
