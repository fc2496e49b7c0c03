//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;
use std::io::Write;

use colored::Colorize;
use itertools::Itertools;

use crate::domain::{Element, Step, StepKind};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

/// `[a, b, c]`, or `(empty)`.
pub fn items_line(items: &[Element]) -> String {
    if items.is_empty() {
        "(empty)".to_string()
    } else {
        format!("[{}]", items.iter().join(", "))
    }
}

/// One step as a single line: highlighted values yellow, sorted ones green.
pub fn step_line<T: Display>(step: &Step<T>) -> String {
    let values = step
        .array
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let s = v.to_string();
            if step.highlighted.contains(&i) {
                s.yellow().bold().to_string()
            } else if step.sorted.contains(&i) {
                s.green().to_string()
            } else {
                s
            }
        })
        .join(" ");
    let kind = match step.kind {
        StepKind::Compare => "compare",
        StepKind::Swap => "swap",
        StepKind::Write => "write",
        StepKind::MarkSorted => "sorted",
        StepKind::Complete => "done",
    };
    format!(
        "{values}  {} {:<7} cmp={} swp={}",
        "|".dimmed(),
        kind,
        step.comparisons,
        step.swaps
    )
}

/// Redraw the current terminal line with `step`.
pub fn redraw_step<T: Display>(step: &Step<T>) {
    print!("\r\x1b[2K{}", step_line(step));
    std::io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn given_empty_items_when_formatting_then_placeholder() {
        assert_eq!(items_line(&[]), "(empty)");
        assert_eq!(
            items_line(&[Element::from(1.0), Element::from("b")]),
            "[1, b]"
        );
    }

    #[test]
    fn given_step_when_formatting_then_counters_shown() {
        colored::control::set_override(false);
        let step = Step {
            kind: StepKind::Compare,
            array: vec![3, 1],
            highlighted: vec![0, 1],
            sorted: BTreeSet::new(),
            comparisons: 1,
            swaps: 0,
        };
        let line = step_line(&step);
        assert!(line.starts_with("3 1"));
        assert!(line.ends_with("cmp=1 swp=0"));
    }
}
