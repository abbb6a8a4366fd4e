use std::fmt::Display;

use super::activation_record::Record;

/// Records of the calls in progress; the top is the current execution context.
#[derive(Debug, Default)]
pub struct CallStack {
    records: Vec<Record>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack::default()
    }

    pub fn push(&mut self, record: Record) {
        tracing::trace!(record = %record.name(), level = record.nesting_level(), "push");
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<Record> {
        let record = self.records.pop();
        if let Some(record) = &record {
            tracing::trace!(record = %record.name(), level = record.nesting_level(), "pop");
        }
        record
    }

    pub fn peek(&self) -> Option<&Record> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Display for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CALL STACK")?;
        for record in self.records.iter().rev() {
            writeln!(f, "{}", record)?;
        }
        writeln!(f)
    }
}
