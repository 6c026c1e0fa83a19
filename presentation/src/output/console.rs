//! Console output formatter for alignment outcomes

use colored::Colorize;
use toolalign_domain::{AlignedCall, AlignmentOutcome, Candidate, Rejection};

/// Formats alignment outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete outcome
    pub fn format(outcome: &AlignmentOutcome) -> String {
        match outcome {
            AlignmentOutcome::Aligned(call) => Self::format_aligned(call),
            AlignmentOutcome::Rejected(rejection) => Self::format_rejected(rejection),
        }
    }

    /// Format as JSON
    pub fn format_json(outcome: &AlignmentOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_aligned(call: &AlignedCall) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Aligned"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Tool:".cyan().bold(),
            call.tool_name.green().bold()
        ));
        if call.handle.as_str() != call.tool_name {
            output.push_str(&format!("{} {}\n", "Handle:".cyan().bold(), call.handle));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Match:".cyan().bold(),
            Self::candidate(&call.tool_match)
        ));

        output.push_str(&Self::section_header("Arguments"));
        if call.arguments.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for (name, value) in &call.arguments {
            output.push_str(&format!("  {} = {}\n", name.yellow(), value));
        }

        if !call.diagnostics.is_empty() {
            output.push_str(&Self::section_header("Corrections"));
            for diagnostic in &call.diagnostics {
                output.push_str(&format!("  * {}\n", diagnostic));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_rejected(rejection: &Rejection) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Rejected"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Reason:".red().bold(),
            rejection.reason.as_str().red()
        ));
        output.push_str(&format!("{} {}\n", "Stage:".cyan().bold(), rejection.stage));
        if let Some(tool) = &rejection.tool_match {
            output.push_str(&format!("{} {}\n", "Tool:".cyan().bold(), Self::candidate(tool)));
        }
        output.push_str(&format!("\n{}\n", rejection.message));

        if let Some(best) = &rejection.best_candidate {
            output.push_str(&format!(
                "\n{} {}\n",
                "Closest candidate:".dimmed(),
                Self::candidate(best)
            ));
        }

        if !rejection.parameters.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Parameters:".dimmed(),
                rejection.parameters.join(", ")
            ));
        }

        if !rejection.diagnostics.is_empty() {
            output.push_str(&Self::section_header("Diagnostics"));
            for diagnostic in &rejection.diagnostics {
                output.push_str(&format!("  * {}\n", diagnostic));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn candidate(candidate: &Candidate) -> String {
        format!(
            "{} {}",
            candidate.identifier.bold(),
            format!(
                "(combined {:.3}, lexical {:.3}, semantic {:.3})",
                candidate.combined(),
                candidate.lexical,
                candidate.semantic
            )
            .dimmed()
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
