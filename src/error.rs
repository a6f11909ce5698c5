use std::io;

/// Error codes surfaced by tree and store operations.
///
/// `InvalidOffset` and `NotEnoughSpace` report a broken internal contract
/// rather than a user-facing condition; they are not expected to occur while
/// the tree maintenance algorithms hold their invariants. `Io` is the only
/// variant where retrying at a higher layer can make sense; the engine
/// itself never retries.
#[allow(missing_docs)]
#[derive(Debug, Display, Error)]
#[display("{:?}", self)]
#[non_exhaustive]
pub enum Error {
    /// Key 0 is the reserved invalid sentinel and never names a record.
    InvalidKey,
    RecordNotFound,
    RecordExists,
    /// The operation requires a populated tree.
    EmptyStorage,
    /// Offset out of range or not live.
    InvalidOffset(#[error(not(source))] u64),
    /// An entry shift would overflow a node.
    NotEnoughSpace,
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        let kind = match &value {
            Error::Io(i) => i.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, value)
    }
}
