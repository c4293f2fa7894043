//! Table Interaction State
//!
//! Each table is in exactly one interaction mode. Modes are only entered from
//! `Idle` by an explicit user action, and every sheet or dialog closes back
//! to `Idle`.

/// Interaction mode of one table
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableMode<T> {
    #[default]
    Idle,
    Editing(T),
    Deleting(T),
    ReorderingAll,
}

impl<T> TableMode<T> {
    /// Open the edit sheet for `item`. Returns false if another mode is active.
    pub fn begin_edit(&mut self, item: T) -> bool {
        self.enter(TableMode::Editing(item))
    }

    /// Open the delete confirmation for `item`
    pub fn begin_delete(&mut self, item: T) -> bool {
        self.enter(TableMode::Deleting(item))
    }

    /// Open the reorder editor
    pub fn begin_reorder(&mut self) -> bool {
        self.enter(TableMode::ReorderingAll)
    }

    /// Close whatever is open
    pub fn close(&mut self) {
        *self = TableMode::Idle;
    }

    fn enter(&mut self, next: TableMode<T>) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = next;
        true
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TableMode::Idle)
    }

    pub fn editing(&self) -> Option<&T> {
        match self {
            TableMode::Editing(item) => Some(item),
            _ => None,
        }
    }

    pub fn deleting(&self) -> Option<&T> {
        match self {
            TableMode::Deleting(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_reordering(&self) -> bool {
        matches!(self, TableMode::ReorderingAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let mode: TableMode<u32> = TableMode::default();
        assert!(mode.is_idle());
        assert!(mode.editing().is_none());
        assert!(mode.deleting().is_none());
        assert!(!mode.is_reordering());
    }

    #[test]
    fn test_edit_then_close() {
        let mut mode = TableMode::Idle;
        assert!(mode.begin_edit(7u32));
        assert_eq!(mode.editing(), Some(&7));
        mode.close();
        assert!(mode.is_idle());
    }

    #[test]
    fn test_modes_are_exclusive() {
        let mut mode = TableMode::Idle;
        assert!(mode.begin_delete(3u32));
        assert!(!mode.begin_edit(4));
        assert!(!mode.begin_reorder());
        assert_eq!(mode, TableMode::Deleting(3));
    }

    #[test]
    fn test_reorder_blocks_delete() {
        let mut mode = TableMode::Idle;
        assert!(mode.begin_reorder());
        assert!(!mode.begin_delete(1u32));
        assert!(mode.is_reordering());
        mode.close();
        assert!(mode.begin_delete(1));
    }
}
