use crate::replica::local_state::Term;
use crate::replica::peers::ServerId;
use crate::replica::state_machine::{ApplyOutput, KvStateMachine};
use std::fmt;

/// Command is the operation a log entry carries to the key/value state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Get {
        key: String,
    },
    Put {
        key: String,
        value: i64,
    },
    /// Placeholder entry, e.g. a newly elected leader's first entry.
    NoOp,
    /// Membership record. It is stored in the log but not enacted.
    Config {
        config: Vec<ServerId>,
        new_config: Option<Vec<ServerId>>,
    },
}

impl Command {
    pub fn apply(&self, state_machine: &mut KvStateMachine) -> ApplyOutput {
        match self {
            Command::Get { key } => ApplyOutput::Value(state_machine.get(key)),
            Command::Put { key, value } => {
                state_machine.put(key.clone(), *value);
                ApplyOutput::NoOutput
            }
            Command::NoOp | Command::Config { .. } => ApplyOutput::NoOutput,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub term: Term,
    pub command: Command,
}

impl LogEntry {
    pub fn new(term: Term, command: Command) -> Self {
        LogEntry { term, command }
    }

    /// The entry at index 0 of every log.
    pub(crate) fn sentinel() -> Self {
        LogEntry::new(Term::new(0), Command::NoOp)
    }

    pub fn apply(&self, state_machine: &mut KvStateMachine) -> ApplyOutput {
        self.command.apply(state_machine)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command {
            Command::Get { key } => write!(f, "({}?,{})", key, self.term),
            Command::Put { key, value } => write!(f, "({}<-{},{})", key, value, self.term),
            Command::NoOp => write!(f, "(nop,{})", self.term),
            Command::Config {
                config,
                new_config: None,
            } => write!(f, "({}, {})", ServerList(config), self.term),
            Command::Config {
                config,
                new_config: Some(new_config),
            } => write!(f, "({};{}, {})", ServerList(config), ServerList(new_config), self.term),
        }
    }
}

struct ServerList<'a>(&'a [ServerId]);

impl fmt::Display for ServerList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<ServerId> {
        raw.iter().copied().map(ServerId::new).collect()
    }

    #[test]
    fn apply_dispatches_on_command() {
        let mut sm = KvStateMachine::new();
        let t = Term::new(1);

        let get = LogEntry::new(t, Command::Get { key: "x".into() });
        assert_eq!(get.apply(&mut sm), ApplyOutput::Value(None));

        let put = LogEntry::new(
            t,
            Command::Put {
                key: "x".into(),
                value: 7,
            },
        );
        assert_eq!(put.apply(&mut sm), ApplyOutput::NoOutput);
        assert_eq!(get.apply(&mut sm), ApplyOutput::Value(Some(7)));

        // Overwrites are unconditional.
        let put_again = LogEntry::new(
            t,
            Command::Put {
                key: "x".into(),
                value: -3,
            },
        );
        put_again.apply(&mut sm);
        assert_eq!(get.apply(&mut sm), ApplyOutput::Value(Some(-3)));

        let config = LogEntry::new(
            t,
            Command::Config {
                config: ids(&[0, 1, 2]),
                new_config: None,
            },
        );
        assert_eq!(config.apply(&mut sm), ApplyOutput::NoOutput);
        assert_eq!(LogEntry::sentinel().apply(&mut sm), ApplyOutput::NoOutput);
        assert_eq!(sm.len(), 1);
    }

    #[test]
    fn display() {
        let t = Term::new(3);
        assert_eq!(LogEntry::new(t, Command::Get { key: "k".into() }).to_string(), "(k?,3)");
        assert_eq!(
            LogEntry::new(
                t,
                Command::Put {
                    key: "k".into(),
                    value: 5
                }
            )
            .to_string(),
            "(k<-5,3)"
        );
        assert_eq!(LogEntry::new(t, Command::NoOp).to_string(), "(nop,3)");
        assert_eq!(
            LogEntry::new(
                t,
                Command::Config {
                    config: ids(&[0, 1]),
                    new_config: None
                }
            )
            .to_string(),
            "([0, 1], 3)"
        );
        assert_eq!(
            LogEntry::new(
                t,
                Command::Config {
                    config: ids(&[0, 1]),
                    new_config: Some(ids(&[0, 1, 2])),
                }
            )
            .to_string(),
            "([0, 1];[0, 1, 2], 3)"
        );
    }
}
