use std::{cell::Cell, collections::BTreeSet};

use smallvec::SmallVec;

use crate::{
    error::Error,
    fs::StorageFile,
    node::Node,
    repr::{Key, NodeOffset, ROOT_OFFSET},
};

/// One level of a root-to-leaf descent: where the node lives and the entry
/// index the search key landed on.
#[derive(Debug)]
pub struct ExtendedNode<const N: usize> {
    pub offset: NodeOffset,
    pub index: usize,
    pub node: Node<N>,
}

impl<const N: usize> ExtendedNode<N> {
    /// Whether the descent landed on an exact leaf match for `key`.
    #[inline]
    pub fn is_exact(&self, key: Key) -> bool {
        self.index < self.node.usage() && self.node.entry(self.index).offset.get() == key
    }
}

/// Root-to-leaf descent path, one entry per level.
pub type SearchPath<const N: usize> = SmallVec<ExtendedNode<N>, 4>;

/// Physical read/write counters, kept per store rather than process-global.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IoStats {
    pub reads: u64,
    pub writes: u64,
}

/// Maps logical node offsets to fixed-size slots of the backing stream and
/// tracks slot allocation: the append-only `end_offset` boundary plus the
/// set of freed offsets available for reuse.
#[derive(Debug)]
pub struct Store<F, const N: usize> {
    file: F,
    end_offset: NodeOffset,
    free_offsets: BTreeSet<NodeOffset>,
    stats: Cell<IoStats>,
}

impl<F, const N: usize> Store<F, N> {
    /// A store over a fresh stream with no allocated slots.
    pub fn new(file: F) -> Self {
        Self::attach(file, 0)
    }

    /// Re-attach to a stream already holding `node_count` node slots. Freed
    /// offsets are not recorded in the stream, so a re-attached store starts
    /// with an empty free set.
    pub fn attach(file: F, node_count: u64) -> Self {
        Self {
            file,
            end_offset: node_count,
            free_offsets: BTreeSet::new(),
            stats: Cell::new(IoStats::default()),
        }
    }

    /// First never-used slot; also the count of allocated slots.
    #[inline]
    pub fn node_count(&self) -> u64 {
        self.end_offset
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free_offsets.len()
    }

    #[inline]
    pub fn io_stats(&self) -> IoStats {
        self.stats.get()
    }

    #[inline]
    pub fn reset_io_stats(&self) {
        self.stats.set(IoStats::default());
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    pub fn into_file(self) -> F {
        self.file
    }

    #[inline]
    fn position(offset: NodeOffset) -> u64 {
        offset * Node::<N>::SIZE as u64
    }
}

impl<F: StorageFile, const N: usize> Store<F, N> {
    /// Read the live node at `offset`.
    pub fn open_node(&self, offset: NodeOffset) -> Result<Node<N>, Error> {
        if offset >= self.end_offset || self.free_offsets.contains(&offset) {
            return Err(Error::InvalidOffset(offset));
        }
        let mut node = Node::new();
        self.file
            .read_exact_at(node.as_bytes_mut(), Self::position(offset))?;
        let mut stats = self.stats.get();
        stats.reads += 1;
        self.stats.set(stats);
        Ok(node)
    }

    /// Persist `node` at `offset`. Writing at `end_offset` extends the
    /// store; writing below it requires `force` or a freed offset, so live
    /// nodes are never overwritten by accident.
    pub fn write_node(
        &mut self,
        offset: NodeOffset,
        node: &Node<N>,
        force: bool,
    ) -> Result<(), Error> {
        if offset > self.end_offset {
            return Err(Error::InvalidOffset(offset));
        }
        let at_end = offset == self.end_offset;
        if !at_end && !force && !self.free_offsets.contains(&offset) {
            return Err(Error::InvalidOffset(offset));
        }
        self.file
            .write_all_at(node.as_bytes(), Self::position(offset))?;
        if at_end {
            self.end_offset += 1;
        } else {
            self.free_offsets.remove(&offset);
        }
        let mut stats = self.stats.get();
        stats.writes += 1;
        self.stats.set(stats);
        Ok(())
    }

    /// Return `offset` to the free set. The slot content is left stale;
    /// callers must drop any pointer to it.
    pub fn delete_node(&mut self, offset: NodeOffset) -> Result<(), Error> {
        if offset >= self.end_offset || !self.free_offsets.insert(offset) {
            return Err(Error::InvalidOffset(offset));
        }
        Ok(())
    }

    /// Mark `offset` as taken without writing it yet.
    pub fn reserve_offset(&mut self, offset: NodeOffset) -> Result<(), Error> {
        if offset == self.end_offset {
            self.end_offset += 1;
            Ok(())
        } else if self.free_offsets.remove(&offset) {
            Ok(())
        } else {
            Err(Error::InvalidOffset(offset))
        }
    }

    /// The smallest reusable offset, or `end_offset` when none are free.
    /// `force_end` skips the free set, guaranteeing a never-used slot;
    /// `reserve` atomically reserves the returned offset.
    pub fn get_free_offset(&mut self, reserve: bool, force_end: bool) -> Result<NodeOffset, Error> {
        let offset = if force_end {
            self.end_offset
        } else {
            self.free_offsets
                .first()
                .copied()
                .unwrap_or(self.end_offset)
        };
        if reserve {
            self.reserve_offset(offset)?;
        }
        Ok(offset)
    }

    /// Descend from the root filling one path level per tree level. Branch
    /// levels follow the child the search index selects; the leaf-level
    /// index is the landing position for `key` (exact match or insertion
    /// point).
    pub fn find_node(&self, key: Key, height: u64) -> Result<SearchPath<N>, Error> {
        if height == 0 {
            return Err(Error::EmptyStorage);
        }
        let mut path = SearchPath::new();
        let mut offset = ROOT_OFFSET;
        for level in 0..height {
            let node = self.open_node(offset)?;
            let leaf = level + 1 == height;
            let index = node.search(key, leaf);
            let next_offset = if leaf { 0 } else { node.child(index) };
            path.push(ExtendedNode {
                offset,
                index,
                node,
            });
            offset = next_offset;
        }
        Ok(path)
    }
}
