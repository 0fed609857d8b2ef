//! Plain-text rendering of a grading, for the one-shot `run` command.

use std::fmt::Write as _;

use services::ScoreBoard;
use services::feedback::{FeedbackBlock, FeedbackView, RowHeading, TestRow};

const INDENT: &str = "    ";

pub fn feedback(view: &FeedbackView) -> String {
    let mut out = String::new();
    for block in &view.blocks {
        match block {
            FeedbackBlock::SuccessBanner(text) => {
                let _ = writeln!(out, "*** {text} ***");
            }
            FeedbackBlock::Error(error) => {
                let _ = writeln!(out, "Error: {}", error.message);
                if let Some(traceback) = &error.traceback {
                    for line in traceback.lines() {
                        let _ = writeln!(out, "{INDENT}{line}");
                    }
                }
            }
            FeedbackBlock::Test(row) => test_row(&mut out, row),
        }
    }
    out
}

fn test_row(out: &mut String, row: &TestRow) {
    let mark = if row.passed { "PASS" } else { "FAIL" };
    let heading = match row.heading {
        RowHeading::Visible { position } => format!("Test {position}"),
        RowHeading::Hidden => "Hidden test".to_owned(),
    };
    let _ = write!(out, "[{mark}] {heading}");
    if let Some(description) = &row.description {
        let _ = write!(out, ": {description}");
    }
    out.push('\n');

    if let Some(values) = &row.values {
        let _ = writeln!(out, "{INDENT}input:    {}", values.input);
        let _ = writeln!(out, "{INDENT}expected: {}", values.expected);
        let _ = writeln!(out, "{INDENT}actual:   {}", values.actual);
    }
    if let Some(note) = &row.note {
        let _ = writeln!(out, "{INDENT}! {}", note.text());
    }
}

pub fn scores(board: &ScoreBoard) -> String {
    let mut out = format!("Exercise: {}% [{}]", board.exercise, board.status.label());
    if let Some(category) = &board.category {
        let _ = write!(
            out,
            " | {}: {}% ({}/{})",
            category.name, category.score, category.completed, category.total
        );
    }
    let _ = writeln!(out, " | Global: {}%", board.global);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use services::feedback::{HIDDEN_MISMATCH_HINT, render};
    use trainer_core::model::{GradingResult, TestResult};

    fn test(passed: bool, hidden: bool) -> TestResult {
        TestResult {
            passed,
            hidden,
            description: Some("sums two numbers".into()),
            input: Some(json!([1, 2])),
            expected: Some(json!(3)),
            actual: Some(json!(4)),
            error: None,
        }
    }

    #[test]
    fn feedback_lists_rows_in_order_with_values() {
        let view = render(&GradingResult {
            success: false,
            error: None,
            traceback: None,
            tests: vec![test(false, false), test(false, true)],
        });
        let text = feedback(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[FAIL] Test 1: sums two numbers");
        assert_eq!(lines[1], "    input:    [1, 2]");
        assert_eq!(lines[3], "    actual:   4");
        assert_eq!(lines[4], "[FAIL] Hidden test: sums two numbers");
        assert_eq!(lines[5], format!("    ! {HIDDEN_MISMATCH_HINT}"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn global_error_prints_message_and_traceback() {
        let view = render(&GradingResult {
            success: false,
            error: Some("SyntaxError: invalid syntax".into()),
            traceback: Some("File \"main.py\", line 1\ndef f(:".into()),
            tests: vec![],
        });
        assert_eq!(
            feedback(&view),
            "Error: SyntaxError: invalid syntax\n    File \"main.py\", line 1\n    def f(:\n"
        );
    }

    #[test]
    fn banner_is_printed_first() {
        let view = render(&GradingResult {
            success: true,
            error: None,
            traceback: None,
            tests: vec![test(true, false)],
        });
        assert!(feedback(&view).starts_with("*** Congratulations!"));
    }
}
