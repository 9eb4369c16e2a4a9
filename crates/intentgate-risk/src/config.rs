/// Configured core-path prefixes and core merge targets consulted by the
/// contextual-value and path-dependence signals (§4.6). Overridable per
/// deployment; these defaults mirror the spec's examples.
#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub core_path_prefixes: Vec<String>,
    pub core_targets: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            core_path_prefixes: ["src/", "lib/", "core/", "pkg/", "internal/", "app/"]
                .into_iter()
                .map(String::from)
                .collect(),
            core_targets: ["main", "master", "release", "production", "prod"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
