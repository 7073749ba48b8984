//! `beforeShellExecution` hook: reject risky commands before they run.

use hookgate_core::{CommandCheck, DenyList, Verdict};
use tracing::{debug, instrument};

/// Join the hook's arguments into the proposed command line.
#[must_use]
pub fn command_line<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check a proposed command. The caller reports a blocked command and exits non-zero.
#[must_use]
#[instrument(skip(deny), fields(command_len = command.len()))]
pub fn process(command: &str, deny: &DenyList) -> CommandCheck {
    let check = deny.check(command);
    debug!(blocked = check.blocked, "command checked");
    check
}

#[must_use]
pub const fn verdict(check: &CommandCheck) -> Verdict {
    if check.blocked {
        Verdict::Reject
    } else {
        Verdict::Allow
    }
}

/// Message written to stderr for a blocked command.
#[must_use]
pub fn blocked_message(check: &CommandCheck) -> String {
    format!("Blocked command: {}", check.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookgate_core::DenyRule;

    fn gate(args: &[&str]) -> CommandCheck {
        process(&command_line(args), DenyList::builtin())
    }

    #[test]
    fn arguments_join_with_spaces() {
        assert_eq!(command_line(&["rm", "-rf", "../"]), "rm -rf ../");
        assert_eq!(command_line::<&str>(&[]), "");
    }

    #[test]
    fn split_arguments_still_match() {
        let check = gate(&["rm", "-rf", "./"]);
        assert_eq!(verdict(&check), Verdict::Reject);
        assert_eq!(blocked_message(&check), "Blocked command: rm -rf ./");
    }

    #[test]
    fn single_quoted_argument_matches() {
        let check = gate(&["cat .env"]);
        assert!(check.blocked);
    }

    #[test]
    fn every_forbidden_tool_is_rejected() {
        for tool in ["grep", "sed", "awk"] {
            let check = gate(&[tool, "pattern", "file.txt"]);
            assert_eq!(verdict(&check), Verdict::Reject, "{tool} should be rejected");
        }
    }

    #[test]
    fn safe_command_allowed() {
        let check = gate(&["cargo", "test", "--workspace"]);
        assert_eq!(verdict(&check), Verdict::Allow);
        assert!(check.matched_rule.is_none());
    }

    #[test]
    fn empty_command_allowed() {
        assert_eq!(verdict(&gate(&[])), Verdict::Allow);
    }

    #[test]
    fn custom_deny_list() {
        let deny = DenyList::new(vec![DenyRule::substring("curl")]);
        let check = process("curl https://example.com", &deny);
        assert!(check.blocked);
        assert!(!process("grep foo", &deny).blocked);
    }
}
