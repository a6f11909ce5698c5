//! On-disk B+Tree index with fixed-size keys and values.
//!
//! boledb stores `u64` keys (0 is reserved) mapped to opaque 8-byte values
//! in a flat, page-addressed stream of fixed-size nodes. The root always
//! lives at offset 0, freed node slots are recycled before the file grows,
//! and leaves form an ascending linked list for in-order scans.
//!
//! The backing stream is anything implementing [StorageFile]: a real
//! [std::fs::File] or an in-memory [MemFile].
//!
//! ```
//! use boledb::Tree;
//!
//! let mut tree: Tree<boledb::MemFile, 8> = Tree::in_memory();
//! tree.insert(42, *b"TheLarch")?;
//! assert_eq!(tree.get(42)?, *b"TheLarch");
//! tree.update(42, *b"TheOak!!")?;
//! for record in tree.iter()? {
//!     let (key, value) = record?;
//!     assert_eq!((key, value), (42, *b"TheOak!!"));
//! }
//! tree.remove(42)?;
//! assert!(tree.is_empty());
//! # Ok::<(), boledb::Error>(())
//! ```
//!
//! Single-threaded and unsynchronized by design: one [Tree] instance owns
//! its stream exclusively, and there is no write-ahead logging. A crash in
//! the middle of a structural mutation can leave the file torn.

#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate log;

mod error;
mod fs;
mod node;
mod repr;
mod store;
mod tree;
mod utils;


pub use crate::{
    error::Error,
    fs::{MemFile, StorageFile},
    repr::{Key, NodeOffset, Value, NIL_KEY, VALUE_LEN},
    store::IoStats,
    tree::{OrderedIter, Tree},
};
