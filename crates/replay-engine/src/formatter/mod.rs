use crate::diagnostics::RunEvent;
use crate::executor::RunReport;

const MASK: &str = "********";

const SENSITIVE_KEYS: [&str; 10] = [
    "password",
    "passwd",
    "secret",
    "token",
    "cvv",
    "ssn",
    "card_number",
    "credit_card",
    "passport",
    "otp",
];

/// Whether a selector or variable name suggests the value is a credential.
pub fn is_sensitive(hint: &str) -> bool {
    let lower = hint.to_lowercase();
    SENSITIVE_KEYS.iter().any(|key| lower.contains(key))
}

/// Mask `value` when `hint` names something sensitive.
pub fn mask_sensitive(hint: &str, value: &str) -> String {
    if !value.is_empty() && is_sensitive(hint) {
        MASK.to_string()
    } else {
        value.to_string()
    }
}

pub fn format_event(event: &RunEvent) -> String {
    match event {
        RunEvent::RunStarted { commands } => format!("Running {} command(s)", commands),
        RunEvent::CommandStarted {
            index,
            command,
            target,
            value,
        } => {
            if value.is_empty() {
                format!("[{}] {} {}", index, command, target)
            } else {
                format!("[{}] {} {} | {}", index, command, target, value)
            }
        }
        RunEvent::SelectorFailed {
            index, selector, ..
        } => format!("[{}]   selector failed: {}", index, selector),
        RunEvent::CommandCompleted { index, command } => format!("[{}]   {} ok", index, command),
        RunEvent::CommandAbandoned {
            index,
            command,
            reason,
        } => format!("[{}]   {} abandoned: {}", index, command, reason),
        RunEvent::VariableStored { name, value } => format!("    ${{{}}} = {}", name, value),
        RunEvent::Paused { index } => format!("Paused before command {}", index),
        RunEvent::Resumed { index } => format!("Resumed at command {}", index),
        RunEvent::Navigating { url, dropped } => {
            format!("Navigating to {} ({} command(s) dropped)", url, dropped)
        }
        RunEvent::RunFinished { state, dispatched } => {
            format!("Run {} after {} command(s)", state, dispatched)
        }
    }
}

/// Render a run summary. Sensitive-looking variables are masked when `mask` is set.
pub fn format_report(report: &RunReport, mask: bool) -> String {
    let mut output = format!(
        "Run {}.\nDispatched: {} (ok: {}, abandoned: {}, no-op: {})",
        report.state, report.dispatched, report.succeeded, report.abandoned, report.skipped
    );

    if report.remaining > 0 {
        output.push_str(&format!("\nNot executed: {}", report.remaining));
    }

    if !report.variables.is_empty() {
        output.push_str("\n\nVariables:");
        for (name, value) in report.variables.iter() {
            let value = value.to_string();
            let shown = if mask {
                mask_sensitive(name, &value)
            } else {
                value
            };
            output.push_str(&format!("\n- {} = {}", name, shown));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::RunState;
    use crate::variables::VariableStore;

    #[test]
    fn masks_only_sensitive_hints() {
        assert_eq!(mask_sensitive("css=#Password", "hunter2"), MASK);
        assert_eq!(mask_sensitive("passport_no", "X123"), MASK);
        assert_eq!(mask_sensitive("css=#name", "hello"), "hello");
        assert_eq!(mask_sensitive("token", ""), "");
    }

    #[test]
    fn report_lists_variables() {
        let mut variables = VariableStore::new();
        variables.set("greeting", "hello");
        variables.set("api_token", "abc");
        let report = RunReport {
            state: RunState::Completed,
            dispatched: 3,
            succeeded: 2,
            abandoned: 0,
            skipped: 1,
            remaining: 0,
            variables,
        };
        let out = format_report(&report, true);
        assert!(out.starts_with("Run completed."));
        assert!(out.contains("- greeting = hello"));
        assert!(out.contains("- api_token = ********"));
        assert!(!out.contains("Not executed"));
    }

    #[test]
    fn report_masking_follows_flag() {
        let mut variables = VariableStore::new();
        variables.set("api_token", "abc");
        let report = RunReport {
            state: RunState::Completed,
            dispatched: 1,
            succeeded: 1,
            abandoned: 0,
            skipped: 0,
            remaining: 0,
            variables,
        };
        assert!(format_report(&report, true).contains("- api_token = ********"));
        assert!(format_report(&report, false).contains("- api_token = abc"));
    }

    #[test]
    fn navigation_report_mentions_dropped_commands() {
        let report = RunReport {
            state: RunState::Navigating {
                url: "https://example.com/".into(),
            },
            dispatched: 1,
            succeeded: 1,
            abandoned: 0,
            skipped: 0,
            remaining: 4,
            variables: VariableStore::new(),
        };
        let out = format_report(&report, true);
        assert!(out.contains("navigating to https://example.com/"));
        assert!(out.contains("Not executed: 4"));
    }
}
