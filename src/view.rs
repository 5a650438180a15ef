//! Issue browsing state machine.
//!
//! A [`ReportView`] owns one [`Report`] and the [`ViewState`] describing how
//! its issues are presented. All navigation is local; nothing here fetches.
//!
//! Selection uses the issue's index in `Report::issues` as its identity, so two
//! issues with identical fields remain distinguishable.

use crate::types::{Issue, Report, ViewMode};
use std::sync::Arc;

/// Tab shown in the issue detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Explanation,
    Comparison,
    Fix,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Explanation, DetailTab::Comparison, DetailTab::Fix];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub mode: ViewMode,
    pub current_index: usize,
    /// Index into the report's issues; set only while the modal is open.
    pub selected: Option<usize>,
    pub modal_open: bool,
    pub tab: DetailTab,
}

#[derive(Debug, Clone)]
pub struct ReportView {
    report: Arc<Report>,
    state: ViewState,
}

impl ReportView {
    pub fn new(report: Arc<Report>) -> Self {
        Self {
            report,
            state: ViewState::default(),
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.state.mode
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn issue_count(&self) -> usize {
        self.report.issues.len()
    }

    /// Switch presentation mode. Always rewinds to the first issue; the modal is left alone.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.state.mode = mode;
        self.state.current_index = 0;
    }

    /// Open the detail modal for the issue at `index`.
    ///
    /// Only available in [`ViewMode::All`]; returns `false` and changes nothing otherwise
    /// or when `index` is out of range.
    pub fn select_issue(&mut self, index: usize) -> bool {
        if self.state.mode != ViewMode::All || index >= self.issue_count() {
            return false;
        }
        self.state.selected = Some(index);
        self.state.modal_open = true;
        self.state.tab = DetailTab::Explanation;
        true
    }

    pub fn close_modal(&mut self) {
        self.state.modal_open = false;
        self.state.selected = None;
        self.state.tab = DetailTab::Explanation;
    }

    /// Switch the modal tab. No-op while the modal is closed.
    pub fn set_tab(&mut self, tab: DetailTab) -> bool {
        if !self.state.modal_open {
            return false;
        }
        self.state.tab = tab;
        true
    }

    pub fn has_next(&self) -> bool {
        self.state.mode == ViewMode::Sequential && self.state.current_index + 1 < self.issue_count()
    }

    pub fn has_prev(&self) -> bool {
        self.state.current_index > 0
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.state.current_index += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.state.current_index -= 1;
        true
    }

    /// Issues to render under the current mode: all of them, or the current one.
    pub fn visible_issues(&self) -> &[Issue] {
        let issues = &self.report.issues;
        match self.state.mode {
            ViewMode::All => issues,
            ViewMode::Sequential => {
                let i = self.state.current_index;
                issues.get(i..=i).unwrap_or(&[])
            }
        }
    }

    pub fn selected_issue(&self) -> Option<(usize, &Issue)> {
        if !self.state.modal_open {
            return None;
        }
        let index = self.state.selected?;
        self.report.issues.get(index).map(|issue| (index, issue))
    }

    /// 1-based "k of n" position in sequential mode.
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.state.mode != ViewMode::Sequential || self.issue_count() == 0 {
            return None;
        }
        Some((self.state.current_index + 1, self.issue_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Grade, Language, QualityScore, ReportSummary, Severity};
    use chrono::Utc;

    fn issue(code: &str) -> Issue {
        Issue {
            code: code.to_string(),
            message: "msg".to_string(),
            localized_explanation: String::new(),
            line: 1,
            column: 1,
            severity: Severity::Warning,
            bad_example: String::new(),
            good_example: String::new(),
            fix_suggestion: String::new(),
        }
    }

    fn view_with(codes: &[&str]) -> ReportView {
        let issues: Vec<Issue> = codes.iter().map(|c| issue(c)).collect();
        let n = issues.len() as u32;
        ReportView::new(Arc::new(Report {
            submission_id: "abc123".to_string(),
            language: Language::Python,
            calculated_at: Utc::now(),
            summary: ReportSummary {
                errors: 0,
                warnings: n,
                infos: 0,
                total_issues: n,
                quality_score: QualityScore::Number(90.0),
                grade: Grade::A,
                evaluation_key: "excellent".to_string(),
            },
            issues,
        }))
    }

    #[test]
    fn initial_state() {
        let view = view_with(&["a", "b"]);
        assert_eq!(view.state(), ViewState::default());
        assert_eq!(view.mode(), ViewMode::All);
        assert_eq!(view.visible_issues().len(), 2);
        assert!(view.selected_issue().is_none());
    }

    #[test]
    fn next_is_a_no_op_outside_sequential_mode() {
        let mut view = view_with(&["a", "b", "c"]);
        assert!(!view.next());
        assert_eq!(view.current_index(), 0);
    }

    #[test]
    fn sequential_navigation_is_bounded() {
        let mut view = view_with(&["a", "b", "c"]);
        view.set_mode(ViewMode::Sequential);
        assert!(!view.prev());
        assert!(view.next());
        assert!(view.next());
        assert_eq!(view.current_index(), 2);
        let before = view.state();
        assert!(!view.next());
        assert_eq!(view.state(), before);
        assert_eq!(view.visible_issues()[0].code, "c");
        assert!(view.prev());
        assert_eq!(view.position(), Some((2, 3)));
    }

    #[test]
    fn arbitrary_walks_stay_in_range() {
        let mut view = view_with(&["a", "b", "c", "d"]);
        view.set_mode(ViewMode::Sequential);
        let steps = "nnpnnnnppppppnpnnnnnnp";
        for step in steps.chars() {
            match step {
                'n' => view.next(),
                _ => view.prev(),
            };
            assert!(view.current_index() < view.issue_count());
            assert_eq!(view.visible_issues().len(), 1);
        }
    }

    #[test]
    fn switching_mode_rewinds_but_keeps_modal() {
        let mut view = view_with(&["a", "b", "c"]);
        assert!(view.select_issue(1));
        view.set_mode(ViewMode::Sequential);
        assert_eq!(view.current_index(), 0);
        assert!(view.state().modal_open);
        assert_eq!(view.state().selected, Some(1));

        view.next();
        view.set_mode(ViewMode::All);
        assert_eq!(view.current_index(), 0);
        assert_eq!(view.state().selected, Some(1));
    }

    #[test]
    fn selection_is_rejected_in_sequential_mode() {
        let mut view = view_with(&["a", "b"]);
        view.set_mode(ViewMode::Sequential);
        assert!(!view.select_issue(0));
        assert!(!view.state().modal_open);
        assert_eq!(view.state().selected, None);
    }

    #[test]
    fn selection_uses_index_identity() {
        let mut view = view_with(&["dup", "dup"]);
        assert!(view.select_issue(1));
        let (index, issue) = view.selected_issue().unwrap();
        assert_eq!(index, 1);
        assert_eq!(issue.code, "dup");
        assert!(!view.select_issue(2));
        assert_eq!(view.state().selected, Some(1));
    }

    #[test]
    fn closing_the_modal_clears_selection_and_tab() {
        let mut view = view_with(&["a"]);
        assert!(!view.set_tab(DetailTab::Fix));
        view.select_issue(0);
        assert!(view.set_tab(DetailTab::Fix));
        assert_eq!(view.state().tab, DetailTab::Fix);
        view.close_modal();
        assert!(!view.state().modal_open);
        assert_eq!(view.state().selected, None);
        assert_eq!(view.state().tab, DetailTab::Explanation);
    }

    #[test]
    fn empty_report_in_sequential_mode_shows_nothing() {
        let mut view = view_with(&[]);
        view.set_mode(ViewMode::Sequential);
        assert!(view.visible_issues().is_empty());
        assert!(!view.next());
        assert!(!view.prev());
        assert_eq!(view.position(), None);
    }
}
