use crate::rules::{self, Rule, MAX_LINE_LENGTH};
use crate::types::Issue;

/// Upper bound on issues reported for one file.
pub const MAX_ISSUES: usize = 20;

/// Line-oriented checker behind the simulated backend.
///
/// This is not a Python parser. Every check looks at one physical line, so
/// results are approximate but deterministic for a given source.
pub struct Scanner {
    pub issues: Vec<Issue>,
    in_docstring: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            in_docstring: false,
        }
    }

    fn push(&mut self, rule: &Rule, line: usize, column: usize) {
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(rule.issue_at(line as u32, column as u32));
        }
    }

    fn is_full(&self) -> bool {
        self.issues.len() >= MAX_ISSUES
    }

    pub fn scan_source(&mut self, source: &str) {
        for (idx, line) in source.lines().enumerate() {
            if self.is_full() {
                return;
            }
            self.scan_line(line, idx + 1);
        }

        if !source.is_empty() && !source.ends_with('\n') {
            let last = source.lines().count().max(1);
            self.push(&rules::RULE_MISSING_FINAL_NEWLINE, last, 1);
        }
    }

    fn scan_line(&mut self, raw: &str, line_no: usize) {
        let line = raw.trim_end_matches('\r');

        // Layout checks apply everywhere, including comments and docstrings
        if line.chars().count() > MAX_LINE_LENGTH {
            self.push(&rules::RULE_LINE_TOO_LONG, line_no, MAX_LINE_LENGTH + 1);
        }
        let trimmed_end = line.trim_end();
        if trimmed_end.len() != line.len() && !trimmed_end.is_empty() {
            self.push(&rules::RULE_TRAILING_WHITESPACE, line_no, trimmed_end.chars().count() + 1);
        }
        if line.starts_with('\t') {
            self.push(&rules::RULE_TAB_INDENT, line_no, 1);
        }

        let code = line.trim_start();
        let indent = line.len() - code.len();
        let col = |offset: usize| indent + offset + 1;

        if self.in_docstring {
            if code.contains("\"\"\"") || code.contains("'''") {
                self.in_docstring = false;
            }
            return;
        }
        if code.starts_with("\"\"\"") || code.starts_with("'''") {
            let quote = &code[..3];
            // Single-line docstrings open and close on the same line
            if code.len() < 6 || !code[3..].contains(quote) {
                self.in_docstring = true;
            }
            return;
        }
        if code.is_empty() || code.starts_with('#') {
            return;
        }

        if code.starts_with("print ") || code.starts_with("print\"") || code.starts_with("print'") {
            self.push(&rules::RULE_PRINT_STATEMENT, line_no, col(0));
        }

        if code.starts_with("except") {
            let header = code.trim_end_matches(':');
            if header.trim() == "except" {
                self.push(&rules::RULE_BARE_EXCEPT, line_no, col(0));
            } else if header.contains(',') && !header.contains('(') && !header.contains(" as ") {
                self.push(&rules::RULE_OLD_EXCEPT_SYNTAX, line_no, col(0));
            }
        }

        if code.starts_with("def ") {
            let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
            if compact.contains("=[]") || compact.contains("={}") || compact.contains("=set()") {
                self.push(&rules::RULE_DANGEROUS_DEFAULT, line_no, col(0));
            }
        }

        if code.starts_with("from ") && code.trim_end().ends_with("import *") {
            self.push(&rules::RULE_WILDCARD_IMPORT, line_no, col(0));
        }

        if let Some(pos) = find_call(code, "eval(") {
            self.push(&rules::RULE_EVAL, line_no, col(pos));
        }

        if let Some(pos) = code.find("== None").or_else(|| code.find("!= None")) {
            self.push(&rules::RULE_SINGLETON_COMPARISON, line_no, col(pos));
        }
    }
}

/// Byte offset of a call to `name` that is not part of a longer identifier.
fn find_call(code: &str, name: &str) -> Option<usize> {
    code.match_indices(name)
        .map(|(pos, _)| pos)
        .find(|&pos| {
            code[..pos]
                .chars()
                .next_back()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '.'))
        })
}

pub fn scan(source: &str) -> Vec<Issue> {
    let mut scanner = Scanner::new();
    scanner.scan_source(source);
    scanner.issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn codes(source: &str) -> Vec<String> {
        scan(source).into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn clean_source_has_no_issues() {
        let src = "import os\n\n\ndef main():\n    return os.getcwd()\n";
        assert!(scan(src).is_empty());
    }

    #[test]
    fn detects_python2_constructs() {
        let src = "print \"hi\"\ntry:\n    x()\nexcept ValueError, e:\n    pass\n";
        assert_eq!(codes(src), vec!["E1601", "E0001"]);
    }

    #[test]
    fn bare_except_is_a_warning_with_location() {
        let issues = scan("try:\n    run()\n    except:\n        pass\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "W0702");
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!((issues[0].line, issues[0].column), (3, 5));
    }

    #[test]
    fn modern_except_forms_are_fine() {
        let src = "try:\n    x()\nexcept (A, B):\n    pass\nexcept C as err:\n    pass\n";
        assert!(scan(src).is_empty());
    }

    #[test]
    fn eval_inside_identifier_is_ignored() {
        assert!(scan("result = self.eval(x)\nretrieval(x)\n").is_empty());
        assert_eq!(codes("value = eval(text)\n"), vec!["W0123"]);
    }

    #[test]
    fn docstrings_and_comments_are_skipped() {
        let src = "\"\"\"\nprint \"in docstring\"\n\"\"\"\n# except:\nx = 1\n";
        assert!(scan(src).is_empty());
    }

    #[test]
    fn layout_rules() {
        let long = format!("x = '{}'\n", "a".repeat(120));
        assert_eq!(codes(&long), vec!["C0301"]);
        assert_eq!(codes("x = 1   \n"), vec!["C0303"]);
        assert_eq!(codes("x = 1"), vec!["C0304"]);
        assert_eq!(codes("if x == None:\n    pass\n"), vec!["C0121"]);
    }

    #[test]
    fn issue_count_is_capped() {
        let src = "except:\n".repeat(50);
        assert_eq!(scan(&src).len(), MAX_ISSUES);
    }

    #[test]
    fn all_lines_and_columns_are_one_based() {
        let src = "\tx = 1\nfrom os import *\ndef f(a=[]):\n    pass";
        for issue in scan(src) {
            assert!(issue.line >= 1);
            assert!(issue.column >= 1);
        }
    }
}
