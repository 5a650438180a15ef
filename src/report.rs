use colored::*;
use quality_report::labels::{self, Locale};
use quality_report::types::{LanguageOption, ReportDigest};
use quality_report::view::{DetailTab, ReportView};
use quality_report::{
    AnalysisError, Grade, Issue, Language, Report, RetryAction, Severity, Submission, ViewMode,
};

/// Columns between the banner's side borders.
const BANNER_INNER: usize = 79;

fn banner_padding(title: &str) -> usize {
    BANNER_INNER.saturating_sub(2 + title.chars().count())
}

pub fn print_banner() {
    let title = format!("quality-report v{}", env!("CARGO_PKG_VERSION"));
    let border = "═".repeat(BANNER_INNER);
    println!("\n{}", format!("╔{}╗", border).bright_black());
    println!(
        "{}{}{}{}",
        "║  ".bright_black(),
        title.bold().cyan(),
        " ".repeat(banner_padding(&title)),
        "║".bright_black()
    );
    println!("{}", format!("╚{}╝", border).bright_black());
}

pub fn print_languages(options: &[LanguageOption]) {
    println!("\n{}", "SUPPORTED LANGUAGES".bold().white());
    println!("{}", "═".repeat(80).bright_black());
    for opt in options {
        let ext = format!(".{}", opt.language.extension());
        if opt.enabled {
            println!("  {} {:<12} {:<7} {}", "✔".green(), opt.language.display_name().bold(), ext, opt.language.tag().cyan());
        } else {
            println!(
                "  {} {:<12} {:<7} {}",
                "✖".bright_black(),
                opt.language.display_name().bright_black(),
                ext.bright_black(),
                "(coming soon)".bright_black()
            );
        }
    }
}

pub fn print_uploading(file_name: &str, language: Language, simulated: bool) {
    let source = if simulated { " (simulated)" } else { "" };
    println!("\n📤 Uploading {} as {}{}...", file_name.yellow(), language.display_name(), source.bright_black());
}

pub fn print_submission(submission: &Submission) {
    println!("{} {}", "✅".green(), submission.message.green().bold());
    println!("   File: {}", submission.file_name.bright_white());
    println!("   Lang: {}", submission.language.tag());
    println!("   ID:   {}", submission.id.cyan());
    println!("\n⏳ Waiting for the analysis report...");
}

pub fn print_failure(error: &AnalysisError, submission_id: Option<&str>) {
    println!("\n{} {}", "❌".red(), error.user_message().red().bold());
    match (error.retry_action(), submission_id) {
        (RetryAction::RetryPoll, Some(id)) => {
            println!("   Retry with: {} {}", "quality-report report".cyan(), id.cyan());
        }
        _ => println!("   Fix the problem and submit the file again."),
    }
}

/// Machine-readable failure for `--json` output.
pub fn failure_json(error: &AnalysisError, submission_id: Option<&str>) -> serde_json::Value {
    let retry = match error.retry_action() {
        RetryAction::RetryPoll => "poll",
        RetryAction::Resubmit => "resubmit",
    };
    serde_json::json!({
        "error": error.user_message(),
        "retry": retry,
        "submissionId": submission_id,
    })
}

pub fn print_summary(report: &Report, locale: Locale) {
    let summary = &report.summary;
    println!("\n{}", "═".repeat(80).bright_black());
    println!(
        "{} {}  {}",
        "REPORT:".bold().white(),
        report.submission_id.yellow().bold(),
        report.calculated_at.format("%Y-%m-%d %H:%M UTC").to_string().bright_black()
    );
    println!("{}\n", "═".repeat(80).bright_black());

    println!(
        "   Score: {}   Grade: {} ({})",
        summary.quality_score.to_string().bold(),
        grade_colored(summary.grade.to_string(), summary.grade),
        labels::grade_label(locale, summary.grade)
    );
    println!("   {}", labels::evaluation_label(locale, &summary.evaluation_key).italic());
    println!();

    for severity in Severity::ALL {
        println!(
            "   {} {:<10} {:>4}  {:>4}%",
            labels::severity_icon(severity),
            labels::severity_heading(locale, severity),
            summary.count(severity),
            summary.share(severity)
        );
    }
    println!("   📊 {:<10} {:>4}  {:>4}%", "Total", summary.total_issues, if summary.total_issues > 0 { 100 } else { 0 });
}

fn grade_colored(text: String, grade: Grade) -> ColoredString {
    match grade {
        Grade::A => text.green().bold(),
        Grade::B => text.blue().bold(),
        Grade::C => text.yellow().bold(),
        Grade::D => text.truecolor(249, 115, 22).bold(),
        Grade::F => text.red().bold(),
    }
}

fn severity_colored(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => text.red().bold(),
        Severity::Warning => text.yellow().bold(),
        Severity::Info => text.blue(),
    }
}

pub fn print_view(view: &ReportView, locale: Locale) {
    println!("\n{}", "═".repeat(80).bright_black());
    println!(
        "{} {}",
        "ISSUES".bold(),
        format!("[{}]", labels::view_mode_label(locale, view.mode())).bright_black()
    );
    println!("{}", "─".repeat(80).bright_black());

    if view.issue_count() == 0 {
        println!("{}", "✅ No issues found!".green().bold());
        return;
    }

    match view.mode() {
        ViewMode::All => {
            for (i, issue) in view.visible_issues().iter().enumerate() {
                let marker = if view.state().selected == Some(i) { "▶" } else { " " };
                print_issue_card(i + 1, issue, marker, locale);
            }
            println!("\n💡 {}", "Open an issue with `o <number>` to see its details.".bright_black());
        }
        ViewMode::Sequential => {
            print_navigation(view);
            for issue in view.visible_issues() {
                print_issue_expanded(issue, locale);
            }
        }
    }

    if let Some((index, issue)) = view.selected_issue() {
        print_detail(index, issue, view.state().tab, locale);
    }
}

fn print_issue_card(number: usize, issue: &Issue, marker: &str, locale: Locale) {
    println!(
        "\n{}{:>3}. {} {} {}  📍 Line {}:{}",
        marker.cyan(),
        number,
        labels::severity_icon(issue.severity),
        severity_colored(labels::severity_label(locale, issue.severity), issue.severity),
        issue.code.cyan(),
        issue.line,
        issue.column
    );
    println!("      {}", issue.explanation());
}

fn print_navigation(view: &ReportView) {
    let prev = if view.has_prev() { "← Prev".bold() } else { "← Prev".bright_black() };
    let next = if view.has_next() { "Next →".bold() } else { "Next →".bright_black() };
    let (current, total) = view.position().unwrap_or((0, 0));
    println!("   {}   {} / {}   {}", prev, current.to_string().bold(), total, next);
}

fn print_code_block(title: ColoredString, code: &str) {
    println!("   {}", title);
    for line in code.lines() {
        println!("      {}", line.bright_white());
    }
}

fn print_issue_expanded(issue: &Issue, locale: Locale) {
    println!(
        "\n   {} {} {}  📍 Line {}:{}",
        labels::severity_icon(issue.severity),
        severity_colored(labels::severity_label(locale, issue.severity), issue.severity),
        issue.code.cyan(),
        issue.line,
        issue.column
    );
    println!("\n   {}", format!("📝 {}", labels::tab_label(locale, DetailTab::Explanation)).bold());
    println!("      {}", issue.explanation());
    if !issue.bad_example.is_empty() || !issue.good_example.is_empty() {
        println!("\n   {}", format!("🔄 {}", labels::tab_label(locale, DetailTab::Comparison)).bold());
        print_code_block("❌".red(), &issue.bad_example);
        print_code_block("✅".green(), &issue.good_example);
    }
    if !issue.fix_suggestion.is_empty() {
        println!("\n   {}", format!("🔧 {}", labels::tab_label(locale, DetailTab::Fix)).bold());
        println!("      {}", issue.fix_suggestion);
    }
}

fn print_detail(index: usize, issue: &Issue, tab: DetailTab, locale: Locale) {
    println!("\n{}", "┌".to_string() + &"─".repeat(78));
    println!(
        "│ {} {} #{}  {}  📍 Line {}:{}",
        labels::severity_icon(issue.severity),
        severity_colored(&format!("{:?}", issue.severity).to_uppercase(), issue.severity),
        index + 1,
        issue.code.bold(),
        issue.line,
        issue.column
    );
    let tabs: Vec<String> = DetailTab::ALL
        .iter()
        .map(|t| {
            let label = labels::tab_label(locale, *t);
            if *t == tab {
                format!("[{}]", label).bold().to_string()
            } else {
                label.bright_black().to_string()
            }
        })
        .collect();
    println!("│ {}", tabs.join("  "));
    println!("{}", "├".to_string() + &"─".repeat(78));
    match tab {
        DetailTab::Explanation => {
            println!("│ {}", issue.explanation());
            if issue.explanation() != issue.message {
                println!("│ {}", issue.message.bright_black());
            }
        }
        DetailTab::Comparison => {
            for line in issue.bad_example.lines() {
                println!("│ {} {}", "-".red(), line.red());
            }
            for line in issue.good_example.lines() {
                println!("│ {} {}", "+".green(), line.green());
            }
        }
        DetailTab::Fix => println!("│ {}", issue.fix_suggestion),
    }
    println!("{}", "└".to_string() + &"─".repeat(78));
}

pub fn print_digests(digests: &[ReportDigest]) {
    println!("\n{}", "REPORTS".bold().white());
    println!("{}", "═".repeat(80).bright_black());
    if digests.is_empty() {
        println!("No reports yet.");
        return;
    }
    println!(
        "{:<38} {:>6} {:>8} {:>6} {:>7} {:>5}",
        "SUBMISSION", "ERRORS", "WARNINGS", "INFOS", "SCORE", "GRADE"
    );
    for d in digests {
        println!(
            "{:<38} {:>6} {:>8} {:>6} {:>7.1} {:>5}",
            d.submission_id.cyan(),
            d.errors,
            d.warnings,
            d.infos,
            d.code_quality_score,
            grade_colored(d.grade.to_string(), d.grade)
        );
    }
    println!("\nTotal reports: {}", digests.len());
}

pub fn print_browse_help() {
    println!(
        "\n{}",
        "n next · p prev · a all · s one-by-one · o <k> open · t <e|c|f> tab · c close · q quit".bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_title_row_matches_border_width() {
        for title in ["quality-report v0.1.0", "quality-report v10.20.30-beta.1"] {
            assert_eq!(2 + title.chars().count() + banner_padding(title), BANNER_INNER);
        }
    }

    #[test]
    fn timeout_failure_as_json_points_at_polling() {
        let value = failure_json(&AnalysisError::PollTimeout { attempts: 30 }, Some("abc123"));
        assert_eq!(value["retry"], "poll");
        assert_eq!(value["submissionId"], "abc123");
        assert!(value["error"].as_str().unwrap().contains("30 attempts"));
    }

    #[test]
    fn upload_failure_as_json_has_no_submission() {
        let value = failure_json(&AnalysisError::upload("File too large"), None);
        assert_eq!(value["error"], "File too large");
        assert_eq!(value["retry"], "resubmit");
        assert!(value["submissionId"].is_null());
    }
}
