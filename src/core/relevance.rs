//! Code relevance classification.
//!
//! A file is relevant when it contains contextually confirmed coded data:
//! a code value on one line with its coding-system URI on the line directly
//! above or below. The one-line window filters out coincidental substring
//! hits (a code value in an unrelated field) while tolerating the adjacent
//! code/system lines that pretty-printed FHIR resources produce.

use indexmap::IndexSet;
use serde::Serialize;

use crate::core::codes::CodeEntry;

/// One confirmed code occurrence inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInstance {
    /// Code value that matched
    pub code: String,
    /// Coding-system URI confirmed in the proximity window
    pub system_uri: String,
    /// 1-based line number of the code occurrence
    pub line_number: usize,
}

/// All confirmed occurrences for a single file.
///
/// Only files with at least one instance appear in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInstance {
    /// File name (not the full path)
    pub file: String,
    /// Confirmed occurrences in line order
    pub instances: Vec<MatchInstance>,
}

/// Classify file content against the reference code set.
///
/// For each line containing a code value as a substring, the line directly
/// above and the line directly below are inspected for the code's system
/// URI; either neighbor confirms the occurrence. The window is exactly one
/// line in each direction; widening it changes classification results.
///
/// Runs in O(lines x code entries); reference sets are small enough that
/// this is not a concern.
pub fn classify(lines: &[&str], codes: &IndexSet<CodeEntry>) -> Vec<MatchInstance> {
    let mut instances = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        for entry in codes {
            if !line.contains(entry.code.as_str()) {
                continue;
            }

            let above = if index > 0 { lines[index - 1] } else { "" };
            let below = if index + 1 < lines.len() {
                lines[index + 1]
            } else {
                ""
            };

            if above.contains(entry.system_uri.as_str()) || below.contains(entry.system_uri.as_str())
            {
                instances.push(MatchInstance {
                    code: entry.code.clone(),
                    system_uri: entry.system_uri.clone(),
                    line_number: index + 1,
                });
            }
        }
    }

    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loinc_1234() -> IndexSet<CodeEntry> {
        let mut codes = IndexSet::new();
        codes.insert(CodeEntry::new("1234", "http://loinc.org"));
        codes
    }

    #[test]
    fn code_with_system_on_line_above_matches() {
        let lines = vec![
            "{",
            "  \"resource\": {",
            "    \"coding\": [{",
            "      \"system\": \"http://loinc.org\",",
            "      \"code\": \"1234\",",
            "    }]",
        ];

        let instances = classify(&lines, &loinc_1234());
        assert_eq!(
            instances,
            vec![MatchInstance {
                code: "1234".to_string(),
                system_uri: "http://loinc.org".to_string(),
                line_number: 5,
            }]
        );
    }

    #[test]
    fn code_with_system_on_line_below_matches() {
        let lines = vec!["\"code\": \"1234\",", "\"system\": \"http://loinc.org\""];

        let instances = classify(&lines, &loinc_1234());
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].line_number, 1);
    }

    #[test]
    fn system_two_lines_away_does_not_match() {
        let lines = vec![
            "\"system\": \"http://loinc.org\",",
            "\"display\": \"Blood pressure\",",
            "\"code\": \"1234\",",
            "\"other\": true,",
            "\"also\": \"http://loinc.org\"",
        ];

        let instances = classify(&lines, &loinc_1234());
        assert!(instances.is_empty());
    }

    #[test]
    fn code_without_system_context_does_not_match() {
        let lines = vec!["\"id\": \"1234\",", "\"status\": \"final\""];

        let instances = classify(&lines, &loinc_1234());
        assert!(instances.is_empty());
    }

    #[test]
    fn code_on_first_line_checks_only_below() {
        let lines = vec!["\"code\": \"1234\",", "\"system\": \"http://loinc.org\""];
        assert_eq!(classify(&lines, &loinc_1234()).len(), 1);

        let lines = vec!["\"code\": \"1234\""];
        assert!(classify(&lines, &loinc_1234()).is_empty());
    }

    #[test]
    fn multiple_pairs_can_match_the_same_line() {
        let mut codes = IndexSet::new();
        codes.insert(CodeEntry::new("1234", "http://loinc.org"));
        codes.insert(CodeEntry::new("34", "http://loinc.org"));

        let lines = vec!["\"system\": \"http://loinc.org\",", "\"code\": \"1234\""];

        let instances = classify(&lines, &codes);
        assert_eq!(instances.len(), 2);
        assert!(instances.iter().all(|i| i.line_number == 2));
    }

    #[test]
    fn empty_input_yields_no_instances() {
        assert!(classify(&[], &loinc_1234()).is_empty());

        let lines = vec!["\"code\": \"1234\""];
        assert!(classify(&lines, &IndexSet::new()).is_empty());
    }
}
