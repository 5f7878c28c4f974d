use serde::Serialize;
use std::fmt;

/// Verdict of a non-acceptance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict")]
pub enum CheckResult {
    /// No word of `length` symbols is rejected.
    #[serde(rename = "all_accepted")]
    AllAccepted { length: usize },
    /// `word` (symbol labels) has `length` symbols and is not accepted.
    #[serde(rename = "rejected")]
    Rejected { length: usize, word: Vec<String> },
}

impl CheckResult {
    pub fn length(&self) -> usize {
        match self {
            CheckResult::AllAccepted { length } | CheckResult::Rejected { length, .. } => *length,
        }
    }

    /// The rejected word, if one was found.
    pub fn word(&self) -> Option<&[String]> {
        match self {
            CheckResult::AllAccepted { .. } => None,
            CheckResult::Rejected { word, .. } => Some(word),
        }
    }

    /// Plain-text answer: `YES`, or `NO` with the witness on the next line.
    pub fn render_text(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::AllAccepted { .. } => write!(f, "YES"),
            CheckResult::Rejected { word, .. } => {
                writeln!(f, "NO")?;
                write!(f, "{}", word.join(" "))
            }
        }
    }
}

/// Size and timing figures of one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckStats {
    pub states: usize,
    pub symbols: usize,
    pub transitions: usize,
    pub variables: usize,
    pub solve_elapsed_ms: u64,
}

/// A verdict together with the figures of the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    #[serde(flatten)]
    pub result: CheckResult,
    pub stats: CheckStats,
}

impl CheckReport {
    pub fn render_text(&self) -> String {
        self.result.render_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_output_for_all_accepted() {
        let result = CheckResult::AllAccepted { length: 3 };
        assert_eq!(result.render_text(), "YES\n");
        assert_eq!(result.word(), None);
        assert_eq!(result.length(), 3);
    }

    #[test]
    fn text_output_for_rejected_word() {
        let result = CheckResult::Rejected {
            length: 2,
            word: vec!["a".into(), "b".into()],
        };
        assert_eq!(result.render_text(), "NO\na b\n");
    }

    #[test]
    fn empty_witness_leaves_an_empty_line() {
        let result = CheckResult::Rejected {
            length: 0,
            word: vec![],
        };
        assert_eq!(result.render_text(), "NO\n\n");
    }

    #[test]
    fn json_flattens_verdict_into_report() {
        let report = CheckReport {
            result: CheckResult::Rejected {
                length: 1,
                word: vec!["a".into()],
            },
            stats: CheckStats {
                states: 1,
                symbols: 1,
                transitions: 1,
                variables: 3,
                solve_elapsed_ms: 0,
            },
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["verdict"], "rejected");
        assert_eq!(value["length"], 1);
        assert_eq!(value["word"], serde_json::json!(["a"]));
        assert_eq!(value["stats"]["variables"], 3);

        let accepted = CheckReport {
            result: CheckResult::AllAccepted { length: 4 },
            stats: CheckStats::default(),
        };
        let value = serde_json::to_value(&accepted).unwrap();
        assert_eq!(value["verdict"], "all_accepted");
        assert!(value.get("word").is_none());
    }
}
