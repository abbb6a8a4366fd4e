use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Display,
    rc::{Rc, Weak},
};

use crate::value::value::{ClassValue, FunctionValue, InstanceValue, Value, ValueData};

/// The runtime scope of one call, one instance or the whole program.
#[derive(Debug)]
pub struct ActivationRecord {
    pub name: String,
    pub nesting_level: u32,
    parent: Option<Weak<RefCell<ActivationRecord>>>,
    owner: Option<Rc<FunctionValue>>,
    instance_of: Option<Rc<ClassValue>>,
    members: HashMap<String, Value>,
}

/// Shared handle to an [`ActivationRecord`].
///
/// Reads that miss locally copy the value found in a parent into this
/// record, so later writes through the same name stay local. Writes to
/// a name that was never read here reach the parent binding.
#[derive(Debug, Clone)]
pub struct Record(Rc<RefCell<ActivationRecord>>);

impl From<Rc<RefCell<ActivationRecord>>> for Record {
    fn from(inner: Rc<RefCell<ActivationRecord>>) -> Self {
        Record(inner)
    }
}

impl Record {
    pub fn new(name: &str, nesting_level: u32, parent: Option<&Record>) -> Self {
        Record(Rc::new(RefCell::new(ActivationRecord {
            name: String::from(name),
            nesting_level,
            parent: parent.map(Record::downgrade),
            owner: None,
            instance_of: None,
            members: HashMap::new(),
        })))
    }

    /// A record for a call of `owner`, nested one level below `parent`.
    pub fn for_call(owner: Rc<FunctionValue>, parent: &Record) -> Self {
        let record = Record::new(owner.name(), parent.nesting_level() + 1, Some(parent));
        record.0.borrow_mut().owner = Some(owner);
        record
    }

    /// The member record of a new instance of `class`.
    pub fn for_instance(class: &Rc<ClassValue>) -> Self {
        let parent = class.defining_record();
        let nesting_level = parent.as_ref().map_or(1, |parent| parent.nesting_level() + 1);
        let record = Record::new(class.name(), nesting_level, parent.as_ref());
        record.0.borrow_mut().instance_of = Some(Rc::clone(class));
        record
    }

    pub fn downgrade(&self) -> Weak<RefCell<ActivationRecord>> {
        Rc::downgrade(&self.0)
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn nesting_level(&self) -> u32 {
        self.0.borrow().nesting_level
    }

    pub fn parent(&self) -> Option<Record> {
        self.0.borrow().parent.as_ref().and_then(Weak::upgrade).map(Record)
    }

    pub fn owner(&self) -> Option<Rc<FunctionValue>> {
        self.0.borrow().owner.clone()
    }

    /// The instance whose member record this is, or that the current call runs inside.
    pub fn self_value(&self) -> Option<Value> {
        let class = self.0.borrow().instance_of.clone();
        match class {
            Some(class) => Some(Value::named(
                "self",
                ValueData::Instance(InstanceValue {
                    class,
                    record: self.clone(),
                }),
            )),
            None => self.parent()?.self_value(),
        }
    }

    /// Reads `name`, copying a non-local hit into this record.
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == "self" {
            return self.self_value();
        }
        if let Some(value) = self.get_local(name) {
            return Some(value);
        }

        let value = self.parent()?.lookup(name)?.deep_copy();
        self.define(name, value.clone());
        Some(value)
    }

    /// Reads `name` from this record only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        if name == "self" {
            return self.self_value();
        }
        self.0.borrow().members.get(name).cloned()
    }

    /// Reads `name` from the nearest record binding it, without copying.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.0.borrow().members.get(name) {
            return Some(value.clone());
        }
        self.parent()?.lookup(name)
    }

    /// Finds the nearest record binding `name`, without copying.
    pub fn resolve(&self, name: &str) -> Option<(Value, Record)> {
        if let Some(value) = self.get_local(name) {
            return Some((value, self.clone()));
        }
        self.parent()?.resolve(name)
    }

    /// Binds `name` in this record.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().members.insert(String::from(name), value);
    }

    /// Rebinds the nearest existing `name`. Returns `false` when no record binds it.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        {
            let mut record = self.0.borrow_mut();
            if let Some(slot) = record.members.get_mut(name) {
                *slot = value;
                return true;
            }
        }

        match self.parent() {
            Some(parent) => parent.assign(name, value),
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().members.contains_key(name)
    }

    /// Member bindings sorted by name.
    pub fn members(&self) -> Vec<(String, Value)> {
        let mut members: Vec<(String, Value)> = self
            .0
            .borrow()
            .members
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        members.sort_by(|a, b| a.0.cmp(&b.0));
        members
    }

    /// A new record with the same parent and copies of every member.
    pub fn deep_copy(&self) -> Record {
        let record = self.0.borrow();
        let members = record
            .members
            .iter()
            .map(|(name, value)| (name.clone(), value.deep_copy()))
            .collect();

        Record(Rc::new(RefCell::new(ActivationRecord {
            name: record.name.clone(),
            nesting_level: record.nesting_level,
            parent: record.parent.clone(),
            owner: record.owner.clone(),
            instance_of: record.instance_of.clone(),
            members,
        })))
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.nesting_level(), self.name())?;
        for (name, value) in self.members() {
            writeln!(f, "   {}: {}", name, value)?;
        }
        Ok(())
    }
}
