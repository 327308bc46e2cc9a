//! Read position over a token slice, with a checkpoint stack for backtracking.
//!
//! Grammar alternatives nest strictly, so every `restore`/`commit` pops the
//! most recent `mark`:
//!
//! ```text
//! mark()            push position
//!   take() ...      advance
//! restore()         pop, rewind    (alternative failed)
//! commit()          pop, keep      (alternative matched)
//! ```
//!
//! Over-reading and popping an empty checkpoint stack are programmer errors
//! and panic.

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'t, T> {
    items: &'t [T],
    position: usize,
    checkpoints: Vec<usize>,
}

impl<'t, T> Cursor<'t, T> {
    pub fn new(items: &'t [T]) -> Self {
        Cursor { items, position: 0, checkpoints: Vec::new() }
    }

    pub fn peek(&self) -> Option<&'t T> {
        self.items.get(self.position)
    }

    /// Item `offset` places ahead of the current one.
    pub fn peek_at(&self, offset: usize) -> Option<&'t T> {
        self.items.get(self.position + offset)
    }

    pub fn take(&mut self) -> &'t T {
        let item = self
            .items
            .get(self.position)
            .unwrap_or_else(|| panic!("cursor read past end of input ({} items)", self.items.len()));
        self.position += 1;
        item
    }

    pub fn discard(&mut self) {
        self.take();
    }

    pub fn at_eos(&self) -> bool {
        self.position >= self.items.len()
    }

    pub fn items_used(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'t [T] {
        &self.items[self.position.min(self.items.len())..]
    }

    pub fn mark(&mut self) {
        self.checkpoints.push(self.position);
    }

    pub fn restore(&mut self) {
        self.position = self.pop_checkpoint();
    }

    pub fn commit(&mut self) {
        self.pop_checkpoint();
    }

    fn pop_checkpoint(&mut self) -> usize {
        self.checkpoints.pop().unwrap_or_else(|| panic!("cursor restore without a matching mark"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_marks_restore_in_lifo_order() {
        let items = [1, 2, 3, 4];
        let mut cursor = Cursor::new(&items);
        cursor.mark();
        assert_eq!(*cursor.take(), 1);
        cursor.mark();
        cursor.discard();
        cursor.discard();
        assert_eq!(cursor.peek(), Some(&4));
        cursor.restore();
        assert_eq!(cursor.items_used(), 1);
        cursor.restore();
        assert_eq!(cursor.items_used(), 0);
        assert_eq!(cursor.peek_at(3), Some(&4));
        assert_eq!(cursor.peek_at(4), None);
    }

    #[test]
    fn commit_keeps_progress() {
        let items = ["a", "b"];
        let mut cursor = Cursor::new(&items);
        cursor.mark();
        cursor.take();
        cursor.commit();
        assert_eq!(cursor.remaining(), &["b"]);
        cursor.take();
        assert!(cursor.at_eos());
    }

    #[test]
    #[should_panic(expected = "without a matching mark")]
    fn restore_without_mark_panics() {
        let items = [0u8];
        Cursor::new(&items).restore();
    }

    #[test]
    #[should_panic(expected = "past end")]
    fn take_past_end_panics() {
        let items: [u8; 0] = [];
        Cursor::new(&items).take();
    }
}
