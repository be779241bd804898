//! Entity keys - the identity of a monitored process across snapshots.

use core::fmt;

/// A monitored process, keyed by process id and command name.
///
/// The pid alone is ambiguous once the kernel recycles it, so the command
/// name is part of the key. Two rows only land in the same column when both
/// parts match.
///
/// # Example
///
/// ```rust
/// use toplog_types::EntityId;
///
/// let id = EntityId::new(1234, "myproc");
/// assert_eq!(id.to_string(), "1234(myproc)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId {
    /// Numeric process id.
    pub pid: u32,
    /// Command name as printed in the last column of the process table.
    pub command: String,
}

impl EntityId {
    /// Create a new entity id.
    pub fn new(pid: u32, command: impl Into<String>) -> Self {
        Self {
            pid,
            command: command.into(),
        }
    }

    /// Column label used in table headers, `PID(COMMAND)`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.pid, self.command)
    }
}
