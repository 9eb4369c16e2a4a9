use async_trait::async_trait;
use intentgate_core::SecurityFinding;
use parking_lot::RwLock;

use crate::error::ScannerError;
use crate::port::{ScanOptions, ScannerPort};

/// In-memory scanner for tests: returns a scripted finding set (or none),
/// and can simulate an unavailable scanner.
pub struct MockScanner {
    name: String,
    available: RwLock<bool>,
    findings: RwLock<Vec<SecurityFinding>>,
}

impl MockScanner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: RwLock::new(true),
            findings: RwLock::new(Vec::new()),
        }
    }

    pub fn set_available(&self, available: bool) {
        *self.available.write() = available;
    }

    pub fn set_findings(&self, findings: Vec<SecurityFinding>) {
        *self.findings.write() = findings;
    }
}

#[async_trait]
impl ScannerPort for MockScanner {
    type Error = ScannerError;

    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        *self.available.read()
    }

    async fn scan(
        &self,
        _path: &str,
        opts: ScanOptions,
    ) -> Result<Vec<SecurityFinding>, Self::Error> {
        let mut findings = self.findings.read().clone();
        for finding in &mut findings {
            if finding.intent_id.is_none() {
                finding.intent_id = opts.intent_id.clone();
            }
            if finding.tenant_id.is_none() {
                finding.tenant_id = opts.tenant_id.clone();
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use intentgate_core::{FindingCategory, Severity};

    fn finding(id: &str, severity: Severity) -> SecurityFinding {
        SecurityFinding {
            id: id.to_string(),
            scanner: "mock-sast".into(),
            category: FindingCategory::Sast,
            severity,
            file: "src/lib.rs".into(),
            line: Some(10),
            rule: "no-unwrap".into(),
            evidence: "unwrap() on Option".into(),
            confidence: 0.8,
            intent_id: None,
            tenant_id: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unavailable_scanner_reports_unavailable() {
        let scanner = MockScanner::new("semgrep");
        scanner.set_available(false);
        assert!(!scanner.is_available().await);
    }

    #[tokio::test]
    async fn scan_stamps_intent_id_onto_findings() {
        let scanner = MockScanner::new("semgrep");
        scanner.set_findings(vec![finding("f1", Severity::High)]);
        let results = scanner
            .scan("/repo", ScanOptions { intent_id: Some("i1".into()), tenant_id: None })
            .await
            .unwrap();
        assert_eq!(results[0].intent_id.as_deref(), Some("i1"));
    }
}
