use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections for transaction fields arriving at the API boundary.
/// An invalid `Transaction` value is never constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sender must not be empty")]
    EmptySender,
    #[error("receiver must not be empty")]
    EmptyReceiver,
}

/// A transfer intent settled by the block that contains it.
/// Immutable once built; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
}

impl Transaction {
    /// Build a transaction, rejecting blank endpoints.
    pub fn new(sender: &str, receiver: &str, amount: u64) -> Result<Self, ValidationError> {
        let sender = sender.trim();
        let receiver = receiver.trim();
        if sender.is_empty() {
            return Err(ValidationError::EmptySender);
        }
        if receiver.is_empty() {
            return Err(ValidationError::EmptyReceiver);
        }
        Ok(Self {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Transaction, ValidationError};

    #[test]
    fn builds_with_trimmed_fields() {
        let tx = Transaction::new(" alice ", "bob", 5).unwrap();
        assert_eq!(tx.sender, "alice");
        assert_eq!(tx.receiver, "bob");
        assert_eq!(tx.amount, 5);
    }

    #[test]
    fn rejects_blank_endpoints() {
        assert_eq!(
            Transaction::new("", "bob", 1),
            Err(ValidationError::EmptySender)
        );
        assert_eq!(
            Transaction::new("alice", "   ", 1),
            Err(ValidationError::EmptyReceiver)
        );
    }

    #[test]
    fn equality_is_structural() {
        let a = Transaction::new("alice", "bob", 3).unwrap();
        let b = Transaction::new("alice", "bob", 3).unwrap();
        let c = Transaction::new("alice", "bob", 4).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
