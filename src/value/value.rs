use std::{
    cell::{Cell, RefCell},
    fmt::Display,
    rc::{Rc, Weak},
};

use crate::{
    ast::statements::{FunctionStmt, TypeDefinitionStmt},
    errors::errors::RuntimeError,
    interpreter::activation_record::{ActivationRecord, Record},
    types::{
        operators::{binary_result, unary_result, BinaryOperator, UnaryOperator},
        types::BuiltinKind,
    },
};

use super::builtins::NativeFunction;

/// A user function together with the give state of one call.
#[derive(Debug)]
pub struct FunctionValue {
    pub decl: Rc<FunctionStmt>,
    gave: Cell<bool>,
    give_value: RefCell<Option<Value>>,
}

impl FunctionValue {
    pub fn new(decl: Rc<FunctionStmt>) -> Self {
        FunctionValue {
            decl,
            gave: Cell::new(false),
            give_value: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn has_given(&self) -> bool {
        self.gave.get()
    }

    pub fn give(&self, value: Option<Value>) {
        self.gave.set(true);
        *self.give_value.borrow_mut() = value;
    }

    /// The same function with no give state, owned by a single call.
    pub fn activation(&self) -> Rc<FunctionValue> {
        Rc::new(FunctionValue::new(Rc::clone(&self.decl)))
    }

    pub fn take_give_value(&self) -> Option<Value> {
        self.gave.set(false);
        self.give_value.borrow_mut().take()
    }
}

/// A class declaration and the record it was declared in.
#[derive(Debug)]
pub struct ClassValue {
    pub decl: Rc<TypeDefinitionStmt>,
    defining_record: Weak<RefCell<ActivationRecord>>,
}

impl ClassValue {
    pub fn new(decl: Rc<TypeDefinitionStmt>, defining_record: &Record) -> Self {
        ClassValue {
            decl,
            defining_record: defining_record.downgrade(),
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn defining_record(&self) -> Option<Record> {
        self.defining_record.upgrade().map(Record::from)
    }
}

/// A native function, bound to the value it was reached through for built-in methods.
#[derive(Debug, Clone)]
pub struct NativeValue {
    pub function: &'static NativeFunction,
    pub receiver: Option<Box<Value>>,
}

#[derive(Debug, Clone)]
pub struct InstanceValue {
    pub class: Rc<ClassValue>,
    pub record: Record,
}

#[derive(Debug, Clone)]
pub enum ValueData {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
    Function(Rc<FunctionValue>),
    Native(NativeValue),
    Class(Rc<ClassValue>),
    Instance(InstanceValue),
    Package(Record),
    Library(Record),
}

/// A runtime value.
///
/// `Clone` shares functions, classes and records. Use [`Value::deep_copy`]
/// where the language has value semantics.
#[derive(Debug, Clone)]
pub struct Value {
    pub name: Option<Rc<str>>,
    pub data: ValueData,
}

impl From<ValueData> for Value {
    fn from(data: ValueData) -> Self {
        Value { name: None, data }
    }
}

impl Value {
    pub fn named(name: &str, data: ValueData) -> Self {
        Value {
            name: Some(Rc::from(name)),
            data,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Rc::from(name));
        self
    }

    /// The zero value of a declarable built-in kind.
    pub fn default_for(kind: BuiltinKind) -> Option<Value> {
        let data = match kind {
            BuiltinKind::Int => ValueData::Int(0),
            BuiltinKind::Float => ValueData::Float(0.0),
            BuiltinKind::Double => ValueData::Double(0.0),
            BuiltinKind::Bool => ValueData::Bool(false),
            BuiltinKind::String => ValueData::String(String::new()),
            BuiltinKind::Function | BuiltinKind::Package | BuiltinKind::Library => return None,
        };
        Some(Value::from(data))
    }

    /// The built-in kind of this value; `None` for classes and instances.
    pub fn kind(&self) -> Option<BuiltinKind> {
        match &self.data {
            ValueData::Int(_) => Some(BuiltinKind::Int),
            ValueData::Float(_) => Some(BuiltinKind::Float),
            ValueData::Double(_) => Some(BuiltinKind::Double),
            ValueData::Bool(_) => Some(BuiltinKind::Bool),
            ValueData::String(_) => Some(BuiltinKind::String),
            ValueData::Function(_) | ValueData::Native(_) => Some(BuiltinKind::Function),
            ValueData::Package(_) => Some(BuiltinKind::Package),
            ValueData::Library(_) => Some(BuiltinKind::Library),
            ValueData::Class(_) | ValueData::Instance(_) => None,
        }
    }

    pub fn type_name(&self) -> String {
        match &self.data {
            ValueData::Class(class) => class.name().to_string(),
            ValueData::Instance(instance) => instance.class.name().to_string(),
            _ => self.kind().map(|kind| kind.to_string()).unwrap_or_default(),
        }
    }

    /// Copies the value the way declarations, arguments and non-local reads do.
    ///
    /// Instances get a fresh record with copied fields and functions get
    /// fresh give state. Namespaces and classes stay shared.
    pub fn deep_copy(&self) -> Value {
        let data = match &self.data {
            ValueData::Function(function) => ValueData::Function(function.activation()),
            ValueData::Instance(instance) => ValueData::Instance(InstanceValue {
                class: Rc::clone(&instance.class),
                record: instance.record.deep_copy(),
            }),
            other => other.clone(),
        };

        Value {
            name: self.name.clone(),
            data,
        }
    }

    /// Converts a numeric value to a wider declared kind; anything else is returned unchanged.
    pub fn coerce(self, kind: BuiltinKind) -> Value {
        let data = match (&self.data, kind) {
            (ValueData::Int(value), BuiltinKind::Float) => ValueData::Float(*value as f32),
            (ValueData::Int(value), BuiltinKind::Double) => ValueData::Double(*value as f64),
            (ValueData::Float(value), BuiltinKind::Double) => ValueData::Double(*value as f64),
            _ => return self,
        };

        Value {
            name: self.name,
            data,
        }
    }

    /// Converts between numeric kinds in either direction, truncating towards zero for `int`.
    pub fn convert(&self, kind: BuiltinKind) -> Result<Value, RuntimeError> {
        let data = match (&self.data, kind) {
            (ValueData::Int(value), BuiltinKind::Int) => Some(ValueData::Int(*value)),
            (_, BuiltinKind::Int) => self.as_f64().map(|value| ValueData::Int(value as i32)),
            (_, BuiltinKind::Float) => self.as_f32().map(ValueData::Float),
            (_, BuiltinKind::Double) => self.as_f64().map(ValueData::Double),
            _ => None,
        }
        .ok_or_else(|| {
            RuntimeError::internal(format!("cannot convert '{}' to '{}'", self.type_name(), kind))
        })?;

        Ok(Value::from(data))
    }

    fn as_f32(&self) -> Option<f32> {
        match self.data {
            ValueData::Int(value) => Some(value as f32),
            ValueData::Float(value) => Some(value),
            ValueData::Double(value) => Some(value as f32),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self.data {
            ValueData::Int(value) => Some(value as f64),
            ValueData::Float(value) => Some(value as f64),
            ValueData::Double(value) => Some(value),
            _ => None,
        }
    }

    fn unsupported(&self, operator: BinaryOperator, other: &Value) -> RuntimeError {
        RuntimeError::UnsupportedOperation {
            operation: operator.name().to_string(),
            left: self.type_name(),
            right: other.type_name(),
        }
    }

    /// Applies `operator` after checking the operand kinds against the operator table.
    pub fn binary(&self, operator: BinaryOperator, other: &Value) -> Result<Value, RuntimeError> {
        use BinaryOperator::*;

        let (left_kind, right_kind) = match (self.kind(), other.kind()) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(self.unsupported(operator, other)),
        };
        let result = binary_result(left_kind, operator, right_kind)
            .ok_or_else(|| self.unsupported(operator, other))?;

        let data = match (&self.data, &other.data, result) {
            (ValueData::Int(left), ValueData::Int(right), BuiltinKind::Int) => match operator {
                Add => ValueData::Int(left.wrapping_add(*right)),
                Subtract => ValueData::Int(left.wrapping_sub(*right)),
                Multiply => ValueData::Int(left.wrapping_mul(*right)),
                _ => return Err(self.unsupported(operator, other)),
            },
            (_, _, BuiltinKind::Float) => {
                let (left, right) = self.as_f32().zip(other.as_f32()).ok_or_else(|| self.unsupported(operator, other))?;
                ValueData::Float(match operator {
                    Add => left + right,
                    Subtract => left - right,
                    Multiply => left * right,
                    Divide => left / right,
                    _ => return Err(self.unsupported(operator, other)),
                })
            }
            (ValueData::String(left), ValueData::String(right), _) => match operator {
                Add => ValueData::String(format!("{}{}", left, right)),
                EqualsEquals => ValueData::Bool(left == right),
                _ => return Err(self.unsupported(operator, other)),
            },
            (ValueData::Bool(left), ValueData::Bool(right), _) => match operator {
                And => ValueData::Bool(*left && *right),
                Or => ValueData::Bool(*left || *right),
                EqualsEquals => ValueData::Bool(left == right),
                _ => return Err(self.unsupported(operator, other)),
            },
            (_, _, BuiltinKind::Double) => {
                let (left, right) = self.as_f64().zip(other.as_f64()).ok_or_else(|| self.unsupported(operator, other))?;
                ValueData::Double(match operator {
                    Add => left + right,
                    Subtract => left - right,
                    Multiply => left * right,
                    Divide => left / right,
                    _ => return Err(self.unsupported(operator, other)),
                })
            }
            (_, _, BuiltinKind::Bool) => {
                let (left, right) = self.as_f64().zip(other.as_f64()).ok_or_else(|| self.unsupported(operator, other))?;
                ValueData::Bool(match operator {
                    Greater => left > right,
                    GreaterEquals => left >= right,
                    Less => left < right,
                    LessEquals => left <= right,
                    EqualsEquals => left == right,
                    _ => return Err(self.unsupported(operator, other)),
                })
            }
            _ => return Err(self.unsupported(operator, other)),
        };

        Ok(Value::from(data))
    }

    pub fn unary(&self, operator: UnaryOperator) -> Result<Value, RuntimeError> {
        let unsupported = || RuntimeError::UnsupportedUnaryOperation {
            operation: operator.name().to_string(),
            operand: self.type_name(),
        };

        self.kind()
            .and_then(|kind| unary_result(operator, kind))
            .ok_or_else(unsupported)?;

        let data = match (&self.data, operator) {
            (_, UnaryOperator::Positive) => self.data.clone(),
            (ValueData::Int(value), UnaryOperator::Negative) => ValueData::Int(value.wrapping_neg()),
            (ValueData::Float(value), UnaryOperator::Negative) => ValueData::Float(-value),
            (ValueData::Double(value), UnaryOperator::Negative) => ValueData::Double(-value),
            _ => return Err(unsupported()),
        };

        Ok(Value::from(data))
    }

    pub fn add(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Add, other)
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Subtract, other)
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Multiply, other)
    }

    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Divide, other)
    }

    pub fn and(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::And, other)
    }

    pub fn or(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Or, other)
    }

    pub fn greater(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Greater, other)
    }

    pub fn greater_equals(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::GreaterEquals, other)
    }

    pub fn less(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::Less, other)
    }

    pub fn less_equals(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::LessEquals, other)
    }

    pub fn equals_equals(&self, other: &Value) -> Result<Value, RuntimeError> {
        self.binary(BinaryOperator::EqualsEquals, other)
    }

    pub fn positive(&self) -> Result<Value, RuntimeError> {
        self.unary(UnaryOperator::Positive)
    }

    pub fn negative(&self) -> Result<Value, RuntimeError> {
        self.unary(UnaryOperator::Negative)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.data {
            ValueData::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.data {
            ValueData::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            ValueData::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ValueData::String(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            ValueData::Int(value) => write!(f, "{}", value),
            ValueData::Float(value) => write!(f, "{}", value),
            ValueData::Double(value) => write!(f, "{}", value),
            ValueData::Bool(value) => write!(f, "{}", value),
            ValueData::String(value) => write!(f, "{}", value),
            ValueData::Function(function) => write!(f, "<function {}>", function.name()),
            ValueData::Native(native) => write!(f, "<native function {}>", native.function.name),
            ValueData::Class(class) => write!(f, "<type {}>", class.name()),
            ValueData::Instance(instance) => write!(f, "<{} instance>", instance.class.name()),
            ValueData::Package(record) => write!(f, "<package {}>", record.name()),
            ValueData::Library(record) => write!(f, "<library {}>", record.name()),
        }
    }
}
