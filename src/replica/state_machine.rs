use std::collections::HashMap;

/// KvStateMachine is the application state that committed log entries are applied to.
#[derive(Debug, Default)]
pub struct KvStateMachine {
    data: HashMap<String, i64>,
}

#[derive(Debug, PartialEq)]
pub enum ApplyOutput {
    /// Result of a read. `None` means the key was not found.
    Value(Option<i64>),
    NoOutput,
}

impl KvStateMachine {
    pub fn new() -> Self {
        KvStateMachine { data: HashMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.data.get(key).copied()
    }

    pub fn put(&mut self, key: String, value: i64) {
        self.data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
