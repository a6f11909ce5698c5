use std::{cell::RefCell, io};

use super::StorageFile;

/// Growable in-memory stream, interchangeable with a real file. The engine
/// is single-threaded by design, so interior mutability is enough.
#[derive(Debug, Default)]
pub struct MemFile {
    data: RefCell<Vec<u8>>,
}

impl MemFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> u64 {
        self.data.borrow().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Snapshot of the raw backing bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }
}

impl From<Vec<u8>> for MemFile {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: RefCell::new(data),
        }
    }
}

impl StorageFile for MemFile {
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let data = self.data.borrow();
        let offset = offset as usize;
        if offset + buf.len() > data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read past end of file",
            ));
        }
        buf.copy_from_slice(&data[offset..offset + buf.len()]);
        Ok(())
    }

    fn write_all_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        let mut data = self.data.borrow_mut();
        let offset = offset as usize;
        let end = offset + buf.len();
        if end > data.len() {
            data.resize(end, 0);
        }
        data[offset..end].copy_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_extend_and_reads_check_bounds() {
        let file = MemFile::new();
        file.write_all_at(b"abc", 4).unwrap();
        assert_eq!(file.len(), 7);

        let mut buf = [0u8; 3];
        file.read_exact_at(&mut buf, 4).unwrap();
        assert_eq!(&buf, b"abc");

        let mut buf = [0u8; 4];
        file.read_exact_at(&mut buf, 0).unwrap();
        assert_eq!(&buf, &[0; 4]);

        let err = file.read_exact_at(&mut buf, 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn from_vec_keeps_contents() {
        let file = MemFile::from(vec![1, 2, 3]);
        let mut buf = [0u8; 3];
        file.read_exact_at(&mut buf, 0).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(file.to_vec(), vec![1, 2, 3]);
    }
}
