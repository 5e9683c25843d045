//! Detached positions into a [`TreeMap`](super::TreeMap).
//!
//! A [`TreeIndex`] does not borrow the map. It records the root-to-node path
//! as a sequence of left/right steps plus the [`Version`] of the map it was
//! taken from, so it can be stored while the map is mutated and then
//! recognized as stale.
//!
//! Stepping needs the map again (`TreeMap::index_after`,
//! `TreeMap::index_before`): the path is replayed from the root, which costs
//! no key comparisons, and the successor or predecessor is derived from the
//! node's children and the cached spine lengths.

use std::cmp::Ordering;
use std::iter;
use std::sync::atomic::{self, AtomicU64};

use smallvec::SmallVec;

use super::node::{Direction, Node};

// =============================================================================
// Version Definition
// =============================================================================

/// Identity of one logical version of a map.
///
/// Versions are drawn from a process-wide counter, so two maps only share a
/// version when one is an unmodified clone of the other.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub(crate) struct Version(u64);

impl Version {
    /// Returns a version never handed out before.
    pub(crate) fn next() -> Self {
        static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_VERSION.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Root-to-node path. Depth of an LLRB tree stays below 2 log2(n + 1).
pub(crate) type Path = SmallVec<[Direction; 32]>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Position {
    At(Path),
    End,
}

// =============================================================================
// TreeIndex Definition
// =============================================================================

/// A position in a [`TreeMap`](super::TreeMap): either an entry or the
/// past-the-end position.
///
/// Indices are valid only for the exact version of the map that produced
/// them. Any mutating call on the map (including one that changes nothing,
/// such as removing an absent key) invalidates every index taken earlier.
/// Using a stale index, or comparing indices from different versions,
/// panics.
///
/// # Examples
///
/// ```rust
/// use llrb_treemap::tree::TreeMap;
///
/// let mut map = TreeMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
///
/// let mut index = map.start_index();
/// assert_eq!(map.entry_at(&index), (&"a", &1));
/// map.form_index_after(&mut index);
/// assert_eq!(map.entry_at(&index), (&"b", &2));
/// map.form_index_after(&mut index);
/// assert_eq!(index, map.end_index());
/// ```
#[derive(Clone, Debug)]
pub struct TreeIndex {
    version: Version,
    position: Position,
}

impl TreeIndex {
    /// Index of the minimum entry, or the end index for an empty tree.
    pub(crate) fn start<K, V>(root: Option<&Node<K, V>>, version: Version) -> Self {
        let position = root.map_or(Position::End, |root| {
            Position::At(iter::repeat_n(Direction::Left, root.left_spine).collect())
        });
        Self { version, position }
    }

    pub(crate) const fn end(version: Version) -> Self {
        Self {
            version,
            position: Position::End,
        }
    }

    pub(crate) const fn at(path: Path, version: Version) -> Self {
        Self {
            version,
            position: Position::At(path),
        }
    }

    /// Returns `true` if this is the past-the-end index.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self.position, Position::End)
    }

    pub(crate) const fn version(&self) -> Version {
        self.version
    }

    pub(crate) fn path(&self) -> Option<&[Direction]> {
        match &self.position {
            Position::At(path) => Some(path),
            Position::End => None,
        }
    }

    /// Replays the path from `root`. `None` for the end index.
    pub(crate) fn resolve<'a, K, V>(&self, root: Option<&'a Node<K, V>>) -> Option<&'a Node<K, V>> {
        let path = self.path()?;
        let mut node = root;
        for &direction in path {
            node = node.and_then(|node| node.child(direction));
        }
        assert!(node.is_some(), "TreeIndex does not address an entry of this tree");
        node
    }

    /// Moves to the in-order successor.
    ///
    /// # Panics
    ///
    /// Panics if this is the end index.
    pub(crate) fn step_forward<K, V>(&mut self, root: Option<&Node<K, V>>) {
        let Some(node) = self.resolve(root) else {
            panic!("cannot advance TreeIndex past the end");
        };
        let Position::At(path) = &mut self.position else {
            return;
        };

        if let Some(right) = node.right_node() {
            path.push(Direction::Right);
            path.extend(iter::repeat_n(Direction::Left, right.left_spine));
            return;
        }

        while path.last() == Some(&Direction::Right) {
            path.pop();
        }
        if path.pop().is_none() {
            self.position = Position::End;
        }
    }

    /// Moves to the in-order predecessor. The predecessor of the end index
    /// is the maximum.
    ///
    /// # Panics
    ///
    /// Panics if this is the start index.
    pub(crate) fn step_backward<K, V>(&mut self, root: Option<&Node<K, V>>) {
        let Some(node) = self.resolve(root) else {
            let Some(root) = root else {
                panic!("cannot step TreeIndex before the start of an empty tree");
            };
            self.position = Position::At(iter::repeat_n(Direction::Right, root.right_spine).collect());
            return;
        };
        let Position::At(path) = &mut self.position else {
            return;
        };

        if let Some(left) = node.left_node() {
            path.push(Direction::Left);
            path.extend(iter::repeat_n(Direction::Right, left.right_spine));
            return;
        }

        let mut probe = path.clone();
        while probe.last() == Some(&Direction::Left) {
            probe.pop();
        }
        assert!(
            probe.pop().is_some(),
            "cannot step TreeIndex before the start"
        );
        *path = probe;
    }

    fn compare_positions(&self, other: &Self) -> Ordering {
        match (&self.position, &other.position) {
            (Position::End, Position::End) => Ordering::Equal,
            (Position::End, Position::At(_)) => Ordering::Greater,
            (Position::At(_), Position::End) => Ordering::Less,
            (Position::At(left), Position::At(right)) => compare_paths(left, right),
        }
    }

    fn assert_same_version(&self, other: &Self) {
        assert!(
            self.version == other.version,
            "cannot compare TreeIndex values taken from different tree versions"
        );
    }
}

/// In-order comparison of two root-to-node paths.
fn compare_paths(left: &[Direction], right: &[Direction]) -> Ordering {
    for (left_step, right_step) in left.iter().zip(right) {
        match (left_step, right_step) {
            (Direction::Left, Direction::Right) => return Ordering::Less,
            (Direction::Right, Direction::Left) => return Ordering::Greater,
            _ => {}
        }
    }
    match left.len().cmp(&right.len()) {
        Ordering::Equal => Ordering::Equal,
        // `right` continues below `left`'s node
        Ordering::Less => match right[left.len()] {
            Direction::Left => Ordering::Greater,
            Direction::Right => Ordering::Less,
        },
        Ordering::Greater => match left[right.len()] {
            Direction::Left => Ordering::Less,
            Direction::Right => Ordering::Greater,
        },
    }
}

impl PartialEq for TreeIndex {
    /// # Panics
    ///
    /// Panics if the indices come from different tree versions.
    fn eq(&self, other: &Self) -> bool {
        self.assert_same_version(other);
        self.position == other.position
    }
}

impl Eq for TreeIndex {}

impl PartialOrd for TreeIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeIndex {
    /// # Panics
    ///
    /// Panics if the indices come from different tree versions.
    fn cmp(&self, other: &Self) -> Ordering {
        self.assert_same_version(other);
        self.compare_positions(other)
    }
}
