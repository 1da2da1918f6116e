//! Pending one-shot ability commands.
//!
//! A UI action sets a command; the behavior system consumes it on its next
//! tick. At most one command of each kind is ever pending: pushing the same
//! kind again before it is consumed overwrites rather than queues.

use serde::{Deserialize, Serialize};

/// Ability a host button can trigger for the autonomous character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Run to the player now
    Summon,
    /// Hop in place
    Jump,
}

impl Command {
    const COUNT: usize = 2;

    fn slot(&self) -> usize {
        match self {
            Command::Summon => 0,
            Command::Jump => 1,
        }
    }
}

/// One slot per command kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandQueue {
    slots: [bool; Command::COUNT],
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.slots[command.slot()] = true;
    }

    /// Consume a pending command of this kind
    pub fn take(&mut self, command: Command) -> bool {
        std::mem::replace(&mut self.slots[command.slot()], false)
    }

    pub fn is_pending(&self, command: Command) -> bool {
        self.slots[command.slot()]
    }

    pub fn clear(&mut self) {
        self.slots = [false; Command::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_push_does_not_queue() {
        let mut queue = CommandQueue::new();
        queue.push(Command::Summon);
        queue.push(Command::Summon);
        assert!(queue.take(Command::Summon));
        assert!(!queue.take(Command::Summon));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut queue = CommandQueue::new();
        queue.push(Command::Jump);
        assert!(!queue.is_pending(Command::Summon));
        assert!(queue.take(Command::Jump));
    }
}
