//! # Operation Log
//!
//! Ordered transactions with a cursor `at` separating applied transactions
//! (indices `< at`) from redoable ones (indices `>= at`).
//!
//! ## Design
//!
//! - Recording a transaction while mid-history discards the redo tail
//! - The log never touches the document; the document moves the cursor
//!   only after a transaction has fully applied
//! - Optional level limit drops the oldest applied transactions
//!
//! ```text
//!   history: [T0, T1, T2, T3]
//!                     ^
//!                     at = 2   (T0, T1 applied; T2, T3 redoable)
//! ```

use crate::ops::Transaction;

#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    history: Vec<Transaction>,

    /// Boundary between applied and redoable transactions
    at: usize,

    /// Maximum number of transactions kept (0 = unlimited)
    max_levels: usize,
}

impl OperationLog {
    /// Unlimited log
    pub fn new() -> Self {
        Self::with_max_levels(0)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            history: Vec::new(),
            at: 0,
            max_levels,
        }
    }

    pub fn at(&self) -> usize {
        self.at
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn can_undo(&self) -> bool {
        self.at > 0
    }

    pub fn can_redo(&self) -> bool {
        self.at < self.history.len()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.history
    }

    /// Most recently applied transaction (the next one to undo)
    pub fn last_applied(&self) -> Option<&Transaction> {
        self.at.checked_sub(1).and_then(|i| self.history.get(i))
    }

    /// Next transaction to redo
    pub fn next_redo(&self) -> Option<&Transaction> {
        self.history.get(self.at)
    }

    /// Record an applied transaction: drop the redo tail, append, advance
    ///
    /// Returns how many redoable transactions were discarded.
    pub fn record(&mut self, transaction: Transaction) -> usize {
        let discarded = self.history.len() - self.at;
        self.history.truncate(self.at);
        self.history.push(transaction);
        self.at += 1;

        if self.max_levels > 0 && self.history.len() > self.max_levels {
            let overflow = self.history.len() - self.max_levels;
            self.history.drain(..overflow);
            self.at -= overflow;
        }

        discarded
    }

    /// Move the cursor past the next redoable transaction
    pub fn advance(&mut self) -> bool {
        if self.can_redo() {
            self.at += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor back before the last applied transaction
    pub fn retreat(&mut self) -> bool {
        if self.can_undo() {
            self.at -= 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.at = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Operation;

    fn tx(text: &str) -> Transaction {
        Transaction::single(Operation::insert_chars("c1", 0, text))
    }

    #[test]
    fn test_log_creation() {
        let log = OperationLog::new();
        assert_eq!(log.at(), 0);
        assert!(log.is_empty());
        assert!(!log.can_undo());
        assert!(!log.can_redo());
        assert!(log.last_applied().is_none());
        assert!(log.next_redo().is_none());
    }

    #[test]
    fn test_record_and_move_cursor() {
        let mut log = OperationLog::new();
        log.record(tx("a"));
        log.record(tx("b"));
        assert_eq!(log.at(), 2);
        assert_eq!(log.last_applied(), Some(&tx("b")));

        assert!(log.retreat());
        assert_eq!(log.at(), 1);
        assert_eq!(log.next_redo(), Some(&tx("b")));

        assert!(log.advance());
        assert!(!log.advance());
        assert_eq!(log.at(), 2);
    }

    #[test]
    fn test_retreat_at_origin_is_noop() {
        let mut log = OperationLog::new();
        assert!(!log.retreat());
        assert_eq!(log.at(), 0);
    }

    #[test]
    fn test_record_discards_redo_tail() {
        let mut log = OperationLog::new();
        log.record(tx("a"));
        log.record(tx("b"));
        log.record(tx("c"));
        log.retreat();
        log.retreat();

        let discarded = log.record(tx("d"));
        assert_eq!(discarded, 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.at(), 2);
        assert!(!log.can_redo());
        assert_eq!(log.transactions(), &[tx("a"), tx("d")]);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut log = OperationLog::with_max_levels(2);
        for text in ["a", "b", "c"] {
            log.record(tx(text));
        }

        assert_eq!(log.len(), 2);
        assert_eq!(log.at(), 2);
        assert_eq!(log.transactions(), &[tx("b"), tx("c")]);
    }

    #[test]
    fn test_clear() {
        let mut log = OperationLog::new();
        log.record(tx("a"));
        log.clear();
        assert_eq!(log.at(), 0);
        assert!(log.is_empty());
    }
}
