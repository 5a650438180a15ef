use crate::types::{Issue, Severity};

/// A check the simulated analyzer knows how to run, with the teaching
/// material attached to every issue it raises.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub kind: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub explanation: &'static str,
    pub bad_example: &'static str,
    pub good_example: &'static str,
    pub fix: &'static str,
}

impl Rule {
    pub fn issue_at(&self, line: u32, column: u32) -> Issue {
        Issue {
            code: self.id.to_string(),
            message: self.message.to_string(),
            localized_explanation: self.explanation.to_string(),
            line,
            column,
            severity: self.severity,
            bad_example: self.bad_example.to_string(),
            good_example: self.good_example.to_string(),
            fix_suggestion: self.fix.to_string(),
        }
    }
}

pub const RULE_PRINT_STATEMENT: Rule = Rule {
    id: "E1601",
    kind: "print_statement",
    severity: Severity::Error,
    message: "print statement used",
    explanation: "Python 3 removed the print statement. This line is a syntax error on any current interpreter.",
    bad_example: "print \"total:\", total",
    good_example: "print(\"total:\", total)",
    fix: "Call print as a function and wrap its arguments in parentheses.",
};

pub const RULE_OLD_EXCEPT_SYNTAX: Rule = Rule {
    id: "E0001",
    kind: "old_except_syntax",
    severity: Severity::Error,
    message: "invalid syntax in except clause",
    explanation: "`except Error, name:` is Python 2 syntax and fails to parse in Python 3.",
    bad_example: "except ValueError, err:\n    log(err)",
    good_example: "except ValueError as err:\n    log(err)",
    fix: "Bind the exception with `as` instead of a comma.",
};

pub const RULE_BARE_EXCEPT: Rule = Rule {
    id: "W0702",
    kind: "bare_except",
    severity: Severity::Warning,
    message: "No exception type(s) specified",
    explanation: "A bare except also catches KeyboardInterrupt and SystemExit and hides real bugs.",
    bad_example: "try:\n    run()\nexcept:\n    pass",
    good_example: "try:\n    run()\nexcept RuntimeError:\n    pass",
    fix: "Catch the specific exception types you expect, or at least `Exception`.",
};

pub const RULE_DANGEROUS_DEFAULT: Rule = Rule {
    id: "W0102",
    kind: "dangerous_default",
    severity: Severity::Warning,
    message: "Dangerous default value as argument",
    explanation: "Mutable default arguments are created once and shared between calls.",
    bad_example: "def add(item, items=[]):\n    items.append(item)",
    good_example: "def add(item, items=None):\n    items = items or []\n    items.append(item)",
    fix: "Default to None and create the list or dict inside the function.",
};

pub const RULE_WILDCARD_IMPORT: Rule = Rule {
    id: "W0401",
    kind: "wildcard_import",
    severity: Severity::Warning,
    message: "Wildcard import",
    explanation: "`import *` pulls unknown names into the module and makes their origin unclear.",
    bad_example: "from os.path import *",
    good_example: "from os.path import join, exists",
    fix: "Import the names you use explicitly.",
};

pub const RULE_EVAL: Rule = Rule {
    id: "W0123",
    kind: "eval_used",
    severity: Severity::Warning,
    message: "Use of eval",
    explanation: "eval executes arbitrary code and is a common injection vector.",
    bad_example: "value = eval(user_input)",
    good_example: "value = ast.literal_eval(user_input)",
    fix: "Parse the input explicitly, e.g. with ast.literal_eval or int().",
};

pub const RULE_TAB_INDENT: Rule = Rule {
    id: "W0312",
    kind: "mixed_indentation",
    severity: Severity::Warning,
    message: "Found indentation with tabs instead of spaces",
    explanation: "Tabs and spaces render differently across editors and can break block structure.",
    bad_example: "def f():\n\treturn 1",
    good_example: "def f():\n    return 1",
    fix: "Indent with four spaces.",
};

pub const RULE_SINGLETON_COMPARISON: Rule = Rule {
    id: "C0121",
    kind: "singleton_comparison",
    severity: Severity::Info,
    message: "Comparison to None should use 'is' or 'is not'",
    explanation: "None is a singleton; identity comparison is both faster and cannot be overridden by __eq__.",
    bad_example: "if value == None:",
    good_example: "if value is None:",
    fix: "Replace `== None` with `is None` and `!= None` with `is not None`.",
};

pub const RULE_LINE_TOO_LONG: Rule = Rule {
    id: "C0301",
    kind: "line_too_long",
    severity: Severity::Info,
    message: "Line too long",
    explanation: "Long lines are hard to read and review side by side.",
    bad_example: "result = compute(first_argument, second_argument, third_argument, fourth_argument, fifth)",
    good_example: "result = compute(\n    first_argument,\n    second_argument,\n)",
    fix: "Break the line inside brackets or extract a variable.",
};

pub const RULE_TRAILING_WHITESPACE: Rule = Rule {
    id: "C0303",
    kind: "trailing_whitespace",
    severity: Severity::Info,
    message: "Trailing whitespace",
    explanation: "Invisible trailing spaces create noisy diffs.",
    bad_example: "x = 1   ",
    good_example: "x = 1",
    fix: "Strip whitespace at the end of the line; most editors can do this on save.",
};

pub const RULE_MISSING_FINAL_NEWLINE: Rule = Rule {
    id: "C0304",
    kind: "missing_final_newline",
    severity: Severity::Info,
    message: "Final newline missing",
    explanation: "Files should end with a newline so tools that concatenate or diff them behave.",
    bad_example: "x = 1<EOF>",
    good_example: "x = 1\n<EOF>",
    fix: "Add a newline at the end of the file.",
};

pub const MAX_LINE_LENGTH: usize = 100;

pub fn all_rules() -> &'static [Rule] {
    &[
        RULE_PRINT_STATEMENT,
        RULE_OLD_EXCEPT_SYNTAX,
        RULE_BARE_EXCEPT,
        RULE_DANGEROUS_DEFAULT,
        RULE_WILDCARD_IMPORT,
        RULE_EVAL,
        RULE_TAB_INDENT,
        RULE_SINGLETON_COMPARISON,
        RULE_LINE_TOO_LONG,
        RULE_TRAILING_WHITESPACE,
        RULE_MISSING_FINAL_NEWLINE,
    ]
}

pub fn find_rule(id: &str) -> Option<&'static Rule> {
    all_rules().iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rule_ids_are_unique() {
        let ids: HashSet<_> = all_rules().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), all_rules().len());
    }

    #[test]
    fn every_rule_carries_teaching_material() {
        for rule in all_rules() {
            assert!(!rule.explanation.is_empty(), "{}", rule.id);
            assert!(!rule.bad_example.is_empty(), "{}", rule.id);
            assert!(!rule.good_example.is_empty(), "{}", rule.id);
            assert!(!rule.fix.is_empty(), "{}", rule.id);
        }
    }

    #[test]
    fn issue_copies_rule_fields() {
        let issue = RULE_BARE_EXCEPT.issue_at(4, 1);
        assert_eq!(issue.code, "W0702");
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!((issue.line, issue.column), (4, 1));
        assert_eq!(issue.explanation(), RULE_BARE_EXCEPT.explanation);
        assert_eq!(find_rule("W0702").map(|r| r.kind), Some("bare_except"));
    }
}
