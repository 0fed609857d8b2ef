//! Display model for grading feedback.
//!
//! `render` is a pure transform from a `GradingResult` to a platform-neutral
//! list of blocks. Binding those blocks to a concrete UI is left to the caller.

use serde_json::Value;
use trainer_core::model::{GradingResult, TestResult};

pub const SUCCESS_BANNER: &str = "Congratulations! All tests passed!";
pub const HIDDEN_MISMATCH_HINT: &str = "The result does not match what was expected.";

/// Ordered blocks to display for one grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub blocks: Vec<FeedbackBlock>,
}

impl FeedbackView {
    #[must_use]
    pub fn error_block(&self) -> Option<&ErrorBlock> {
        self.blocks.iter().find_map(|block| match block {
            FeedbackBlock::Error(error) => Some(error),
            _ => None,
        })
    }

    pub fn test_rows(&self) -> impl Iterator<Item = &TestRow> {
        self.blocks.iter().filter_map(|block| match block {
            FeedbackBlock::Test(row) => Some(row),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_success_banner(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block, FeedbackBlock::SuccessBanner(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackBlock {
    SuccessBanner(String),
    Error(ErrorBlock),
    Test(TestRow),
}

/// Global failure (syntax error, timeout, ...). Replaces every test row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBlock {
    pub message: String,
    pub traceback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub passed: bool,
    pub heading: RowHeading,
    pub description: Option<String>,
    /// Always `None` for hidden tests.
    pub values: Option<TestValues>,
    pub note: Option<RowNote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHeading {
    /// 1-based position in the result list.
    Visible { position: usize },
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestValues {
    pub input: String,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowNote {
    /// Generic hint for a failed hidden test without an explicit error.
    Mismatch,
    Error(String),
}

impl RowNote {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            RowNote::Mismatch => HIDDEN_MISMATCH_HINT,
            RowNote::Error(message) => message,
        }
    }
}

#[must_use]
pub fn render(result: &GradingResult) -> FeedbackView {
    if let Some(message) = &result.error {
        return FeedbackView {
            blocks: vec![FeedbackBlock::Error(ErrorBlock {
                message: message.clone(),
                traceback: result.traceback.clone(),
            })],
        };
    }

    let mut blocks = Vec::with_capacity(result.tests.len() + 1);
    if result.success && result.all_passed() {
        blocks.push(FeedbackBlock::SuccessBanner(SUCCESS_BANNER.to_owned()));
    }
    blocks.extend(
        result
            .tests
            .iter()
            .enumerate()
            .map(|(index, test)| FeedbackBlock::Test(render_row(index, test))),
    );
    FeedbackView { blocks }
}

fn render_row(index: usize, test: &TestResult) -> TestRow {
    let error_note = test.error.clone().map(RowNote::Error);

    if test.hidden {
        let note = match error_note {
            Some(note) => Some(note),
            None if !test.passed => Some(RowNote::Mismatch),
            None => None,
        };
        return TestRow {
            passed: test.passed,
            heading: RowHeading::Hidden,
            description: test.description.clone(),
            values: None,
            note,
        };
    }

    TestRow {
        passed: test.passed,
        heading: RowHeading::Visible {
            position: index + 1,
        },
        description: test.description.clone(),
        values: Some(TestValues {
            input: format_value(test.input.as_ref()),
            expected: format_value(test.expected.as_ref()),
            actual: format_value(test.actual.as_ref()),
        }),
        note: error_note,
    }
}

/// Arrays become `[a, b, c]`; anything else is its compact JSON encoding.
/// A missing value renders as `null`.
#[must_use]
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None => "null".to_owned(),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .map(format_element)
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{joined}]")
        }
        Some(other) => other.to_string(),
    }
}

fn format_element(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
