use services::feedback::{FeedbackBlock, FeedbackView, RowHeading, TestRow, TestValues};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRowVm {
    pub passed: bool,
    pub class: &'static str,
    pub heading: String,
    pub description: Option<String>,
    pub values: Option<TestValues>,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackItemVm {
    Banner(String),
    Error {
        message: String,
        traceback: Option<String>,
    },
    Test(TestRowVm),
}

/// Results area, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub items: Vec<FeedbackItemVm>,
    /// "k of n tests passed"; absent when the run produced no test rows.
    pub summary: Option<String>,
}

#[must_use]
pub fn map_feedback(view: &FeedbackView) -> FeedbackVm {
    let items = view
        .blocks
        .iter()
        .map(|block| match block {
            FeedbackBlock::SuccessBanner(text) => FeedbackItemVm::Banner(text.clone()),
            FeedbackBlock::Error(error) => FeedbackItemVm::Error {
                message: error.message.clone(),
                traceback: error.traceback.clone(),
            },
            FeedbackBlock::Test(row) => FeedbackItemVm::Test(map_row(row)),
        })
        .collect();

    let total = view.test_rows().count();
    let passed = view.test_rows().filter(|row| row.passed).count();
    let summary = (total > 0).then(|| format!("{passed} of {total} tests passed"));

    FeedbackVm { items, summary }
}

fn map_row(row: &TestRow) -> TestRowVm {
    let heading = match row.heading {
        RowHeading::Visible { position } => format!("Test {position}"),
        RowHeading::Hidden => "Hidden test".to_owned(),
    };
    TestRowVm {
        passed: row.passed,
        class: if row.passed {
            "test-row test-row--pass"
        } else {
            "test-row test-row--fail"
        },
        heading,
        description: row.description.clone(),
        values: row.values.clone(),
        note: row.note.as_ref().map(|note| note.text().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use services::feedback::{HIDDEN_MISMATCH_HINT, render};
    use trainer_core::model::GradingResult;

    fn grading(value: serde_json::Value) -> GradingResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn rows_keep_order_and_hidden_rows_carry_only_the_hint() {
        let vm = map_feedback(&render(&grading(json!({
            "success": false,
            "tests": [
                {"passed": true, "input": [1, 2], "expected": 3, "actual": 3},
                {"passed": false, "hidden": true, "expected": 5, "actual": 4}
            ]
        }))));

        assert_eq!(vm.summary.as_deref(), Some("1 of 2 tests passed"));
        let [FeedbackItemVm::Test(first), FeedbackItemVm::Test(second)] = vm.items.as_slice()
        else {
            panic!("expected two test rows, got {:?}", vm.items);
        };
        assert_eq!(first.heading, "Test 1");
        assert_eq!(first.class, "test-row test-row--pass");
        assert!(first.values.is_some());
        assert_eq!(second.heading, "Hidden test");
        assert!(second.values.is_none());
        assert_eq!(second.note.as_deref(), Some(HIDDEN_MISMATCH_HINT));
    }

    #[test]
    fn global_error_has_no_summary() {
        let vm = map_feedback(&render(&grading(json!({
            "success": false,
            "error": "SyntaxError: invalid syntax",
            "traceback": "line 1",
            "tests": [{"passed": true}]
        }))));

        assert_eq!(vm.summary, None);
        assert_eq!(
            vm.items,
            vec![FeedbackItemVm::Error {
                message: "SyntaxError: invalid syntax".into(),
                traceback: Some("line 1".into()),
            }]
        );
    }

    #[test]
    fn banner_comes_first() {
        let vm = map_feedback(&render(&grading(json!({
            "success": true,
            "tests": [{"passed": true}]
        }))));
        assert!(matches!(vm.items.first(), Some(FeedbackItemVm::Banner(_))));
        assert_eq!(vm.summary.as_deref(), Some("1 of 1 tests passed"));
    }
}
