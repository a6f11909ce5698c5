#![no_main]
use arbitrary::Arbitrary;
use boledb::{Error, MemFile, Tree, Value};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

// Keys are drawn from a narrow range so splits, compensation, squashes and
// root collapses all fire within short op sequences.
#[derive(Debug, Arbitrary)]
enum Op {
    Insert { key: u8, value: Value },
    Update { key: u8, value: Value },
    Remove { key: u8 },
    Get { key: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut tree: Tree<MemFile, 3> = Tree::in_memory();
    let mut model: BTreeMap<u64, Value> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert { key, value } => {
                let key = key as u64;
                match tree.insert(key, value) {
                    Ok(()) => assert!(model.insert(key, value).is_none()),
                    Err(Error::RecordExists) => assert!(model.contains_key(&key)),
                    Err(Error::InvalidKey) => assert_eq!(key, 0),
                    Err(e) => panic!("insert({key}): {e:?}"),
                }
            }
            Op::Update { key, value } => {
                let key = key as u64;
                match tree.update(key, value) {
                    Ok(()) => assert!(model.insert(key, value).is_some()),
                    Err(Error::RecordNotFound) => assert!(!model.contains_key(&key)),
                    Err(Error::EmptyStorage) => assert!(model.is_empty()),
                    Err(Error::InvalidKey) => assert_eq!(key, 0),
                    Err(e) => panic!("update({key}): {e:?}"),
                }
            }
            Op::Remove { key } => {
                let key = key as u64;
                match tree.remove(key) {
                    Ok(()) => assert!(model.remove(&key).is_some()),
                    Err(Error::RecordNotFound) => assert!(!model.contains_key(&key)),
                    Err(Error::InvalidKey) => assert_eq!(key, 0),
                    Err(e) => panic!("remove({key}): {e:?}"),
                }
            }
            Op::Get { key } => {
                let key = key as u64;
                match tree.get(key) {
                    Ok(value) => assert_eq!(model.get(&key), Some(&value)),
                    Err(Error::RecordNotFound) => assert!(!model.contains_key(&key)),
                    Err(Error::EmptyStorage) => assert!(model.is_empty()),
                    Err(Error::InvalidKey) => assert_eq!(key, 0),
                    Err(e) => panic!("get({key}): {e:?}"),
                }
            }
        }
    }
    let records: Vec<_> = tree.iter().unwrap().map(|r| r.unwrap()).collect();
    let expected: Vec<_> = model.into_iter().collect();
    assert_eq!(records, expected);
});
