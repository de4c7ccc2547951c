//! Offset-addressed change sets.
//!
//! A [`ChangeSet`] is a batch of replacements expressed in **character offsets** (Unicode scalar
//! values) against the document a transaction starts from. All specs in one set address the
//! same "before" document, so callers may pass them in any order.

use ropey::Rope;

/// A single replacement of `from..to` with `insert`, in pre-change character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpec {
    /// Start character offset (inclusive).
    pub from: usize,
    /// End character offset (exclusive).
    pub to: usize,
    /// Replacement text (may be empty, may contain newlines).
    pub insert: String,
}

impl ChangeSpec {
    /// Replace `from..to` with `insert`.
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    /// Insert `text` at `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    /// Delete `from..to`.
    pub fn delete(from: usize, to: usize) -> Self {
        Self::new(from, to, String::new())
    }

    fn inserted_len(&self) -> usize {
        self.insert.chars().count()
    }
}

/// Which side a mapped position sticks to when the change touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay before text inserted at the position.
    Before,
    /// Move after text inserted at the position.
    After,
}

/// A normalized, non-overlapping batch of changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<ChangeSpec>,
    before_len: usize,
}

impl ChangeSet {
    /// An empty change set for a document of `doc_len` characters.
    pub fn empty(doc_len: usize) -> Self {
        Self {
            changes: Vec::new(),
            before_len: doc_len,
        }
    }

    /// Normalize `specs` against a document of `doc_len` characters.
    ///
    /// - offsets past the end clamp to `doc_len`
    /// - inverted ranges are swapped
    /// - specs are sorted by start offset (stable, so equal starts keep input order)
    /// - a range starting inside an earlier range is clipped to that range's end
    pub fn of(specs: impl IntoIterator<Item = ChangeSpec>, doc_len: usize) -> Self {
        let mut changes = specs
            .into_iter()
            .map(|spec| {
                let a = spec.from.min(doc_len);
                let b = spec.to.min(doc_len);
                ChangeSpec {
                    from: a.min(b),
                    to: a.max(b),
                    insert: spec.insert,
                }
            })
            .collect::<Vec<_>>();

        changes.sort_by_key(|change| change.from);

        let mut covered = 0;
        for change in &mut changes {
            if change.from < covered {
                change.from = covered;
                change.to = change.to.max(covered);
            }
            covered = change.to;
        }

        changes.retain(|change| change.from != change.to || !change.insert.is_empty());

        Self {
            changes,
            before_len: doc_len,
        }
    }

    /// Returns `true` if the set contains no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The normalized changes, sorted by start offset.
    pub fn changes(&self) -> &[ChangeSpec] {
        &self.changes
    }

    /// Document length (in chars) before the changes.
    pub fn before_len(&self) -> usize {
        self.before_len
    }

    /// Document length (in chars) after the changes.
    pub fn after_len(&self) -> usize {
        self.changes.iter().fold(self.before_len, |len, change| {
            len - (change.to - change.from) + change.inserted_len()
        })
    }

    /// Apply the changes to `rope` in place.
    ///
    /// Changes are applied from the end of the document towards the start so earlier offsets
    /// stay valid.
    pub fn apply_to(&self, rope: &mut Rope) {
        for change in self.changes.iter().rev() {
            if change.to > change.from {
                rope.remove(change.from..change.to);
            }
            if !change.insert.is_empty() {
                rope.insert(change.from, &change.insert);
            }
        }
    }

    /// Map a pre-change offset to the corresponding post-change offset.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut shift: isize = 0;

        for change in &self.changes {
            if pos < change.from {
                break;
            }

            let inserted = change.inserted_len() as isize;
            if pos > change.to {
                shift += inserted - (change.to - change.from) as isize;
                continue;
            }

            let start = (change.from as isize + shift) as usize;
            return match assoc {
                Assoc::Before if pos == change.to && change.from != change.to => {
                    start + inserted as usize
                }
                Assoc::Before => start,
                Assoc::After => start + inserted as usize,
            };
        }

        (pos as isize + shift).max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str, specs: Vec<ChangeSpec>) -> String {
        let mut rope = Rope::from_str(text);
        ChangeSet::of(specs, rope.len_chars()).apply_to(&mut rope);
        rope.to_string()
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![
            ChangeSpec::new(0, 7, "Updated"),
            ChangeSpec::new(8, 12, "content"),
        ];
        let backward = forward.iter().cloned().rev().collect();

        assert_eq!(apply("Initial text\n", forward), "Updated content\n");
        assert_eq!(apply("Initial text\n", backward), "Updated content\n");
    }

    #[test]
    fn test_clamps_and_swaps() {
        assert_eq!(apply("abc", vec![ChangeSpec::new(10, 1, "X")]), "aX");
    }

    #[test]
    fn test_overlapping_ranges_delete_once() {
        let set = ChangeSet::of(
            vec![ChangeSpec::new(0, 4, "A"), ChangeSpec::new(2, 6, "B")],
            8,
        );
        assert_eq!(set.changes()[1], ChangeSpec::new(4, 6, "B"));
        assert_eq!(
            apply(
                "01234567",
                vec![ChangeSpec::new(0, 4, "A"), ChangeSpec::new(2, 6, "B")]
            ),
            "AB67"
        );
    }

    #[test]
    fn test_map_pos() {
        let set = ChangeSet::of(vec![ChangeSpec::new(2, 4, "xyz")], 10);
        assert_eq!(set.map_pos(1, Assoc::After), 1);
        assert_eq!(set.map_pos(2, Assoc::Before), 2);
        assert_eq!(set.map_pos(3, Assoc::After), 5);
        assert_eq!(set.map_pos(6, Assoc::Before), 7);
        assert_eq!(set.after_len(), 11);

        let insert = ChangeSet::of(vec![ChangeSpec::insert(3, "ab")], 5);
        assert_eq!(insert.map_pos(3, Assoc::Before), 3);
        assert_eq!(insert.map_pos(3, Assoc::After), 5);
    }

    #[test]
    fn test_empty_changes_dropped() {
        let set = ChangeSet::of(vec![ChangeSpec::new(1, 1, "")], 3);
        assert!(set.is_empty());
    }
}
