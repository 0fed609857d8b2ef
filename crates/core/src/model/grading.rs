use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one test case, as reported by the grading service.
///
/// `input`, `expected` and `actual` are opaque JSON values. For hidden tests
/// they may be present on the wire but must never be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub passed: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full response of `POST run`.
///
/// A set `error` is a global failure (syntax error, timeout, ...), which is a
/// domain outcome rather than a transport fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(default)]
    pub tests: Vec<TestResult>,
}

impl GradingResult {
    /// True when every test passed (vacuously true for an empty list).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.tests.iter().all(|test| test.passed)
    }

    /// Completion requires a successful run with at least one test, all passing.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.success && !self.tests.is_empty() && self.all_passed()
    }
}
