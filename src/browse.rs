use crate::report;
use quality_report::labels::Locale;
use quality_report::view::{DetailTab, ReportView};
use quality_report::{UploadWorkflow, ViewMode};
use std::io::{self, BufRead, Write};

/// One line of input in the interactive browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Mode(ViewMode),
    /// 1-based issue number as typed by the user.
    Open(usize),
    Tab(DetailTab),
    Close,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<BrowseCommand> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let arg = parts.next();
    let cmd = match (head, arg) {
        ("n" | "next", None) => BrowseCommand::Next,
        ("p" | "prev", None) => BrowseCommand::Prev,
        ("a" | "all", None) => BrowseCommand::Mode(ViewMode::All),
        ("s" | "seq", None) => BrowseCommand::Mode(ViewMode::Sequential),
        ("o" | "open", Some(k)) => BrowseCommand::Open(k.parse().ok().filter(|&k| k > 0)?),
        ("t" | "tab", Some(t)) => BrowseCommand::Tab(match t {
            "e" | "explanation" => DetailTab::Explanation,
            "c" | "comparison" => DetailTab::Comparison,
            "f" | "fix" => DetailTab::Fix,
            _ => return None,
        }),
        ("c" | "close", None) => BrowseCommand::Close,
        ("h" | "help" | "?", None) => BrowseCommand::Help,
        ("q" | "quit", None) => BrowseCommand::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Apply `cmd` to the view. Returns whether anything changed.
pub fn apply(view: &mut ReportView, cmd: BrowseCommand) -> bool {
    match cmd {
        BrowseCommand::Next => view.next(),
        BrowseCommand::Prev => view.prev(),
        BrowseCommand::Mode(mode) => {
            view.set_mode(mode);
            true
        }
        BrowseCommand::Open(k) => view.select_issue(k - 1),
        BrowseCommand::Tab(tab) => view.set_tab(tab),
        BrowseCommand::Close => {
            let was_open = view.state().modal_open;
            view.close_modal();
            was_open
        }
        BrowseCommand::Help | BrowseCommand::Quit => false,
    }
}

/// Read commands from stdin until `q` or EOF, redrawing after every change.
pub fn run(workflow: &UploadWorkflow, locale: Locale) -> anyhow::Result<()> {
    workflow.with_view(|view| report::print_view(view, locale))?;
    report::print_browse_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let Some(cmd) = parse_command(&line) else {
            report::print_browse_help();
            continue;
        };
        match cmd {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => report::print_browse_help(),
            cmd => {
                let changed = workflow.with_view(|view| {
                    let changed = apply(view, cmd);
                    if changed {
                        report::print_view(view, locale);
                    }
                    changed
                })?;
                if !changed {
                    println!("(nothing to do)");
                }
            }
        }
    }
    workflow.close_report();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(parse_command("n"), Some(BrowseCommand::Next));
        assert_eq!(parse_command("  prev "), Some(BrowseCommand::Prev));
        assert_eq!(parse_command("s"), Some(BrowseCommand::Mode(ViewMode::Sequential)));
        assert_eq!(parse_command("o 3"), Some(BrowseCommand::Open(3)));
        assert_eq!(parse_command("t f"), Some(BrowseCommand::Tab(DetailTab::Fix)));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("o"), None);
        assert_eq!(parse_command("o 0"), None);
        assert_eq!(parse_command("o x"), None);
        assert_eq!(parse_command("t z"), None);
        assert_eq!(parse_command("n 2"), None);
    }
}
