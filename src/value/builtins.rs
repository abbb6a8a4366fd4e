//! Native functions: methods of the built-in kinds and the standard libraries.
//!
//! Both tables are static. The analyzer turns them into member scopes and
//! the interpreter into records of bound [`NativeValue`]s.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    errors::errors::RuntimeError,
    interpreter::console::Console,
    types::types::BuiltinKind,
};

use super::value::{NativeValue, Value, ValueData};

pub type NativeCall =
    fn(&mut dyn Console, Option<&Value>, &[Value]) -> Result<Option<Value>, RuntimeError>;

pub struct NativeFunction {
    pub name: &'static str,
    pub parameters: &'static [BuiltinKind],
    pub give: Option<BuiltinKind>,
    call: NativeCall,
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("give", &self.give)
            .finish()
    }
}

impl NativeFunction {
    pub fn invoke(
        &self,
        console: &mut dyn Console,
        receiver: Option<&Value>,
        arguments: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        if arguments.len() != self.parameters.len() {
            return Err(RuntimeError::internal(format!(
                "native function '{}' takes {} arguments, received {}",
                self.name,
                self.parameters.len(),
                arguments.len()
            )));
        }
        (self.call)(console, receiver, arguments)
    }

    /// Wraps this function as a value, bound to `receiver` for built-in methods.
    pub fn bind(&'static self, receiver: Option<&Value>) -> Value {
        Value::named(
            self.name,
            ValueData::Native(NativeValue {
                function: self,
                receiver: receiver.map(|receiver| Box::new(receiver.clone())),
            }),
        )
    }
}

fn receiver(receiver: Option<&Value>) -> Result<&Value, RuntimeError> {
    receiver.ok_or_else(|| RuntimeError::internal("built-in method called without a receiver"))
}

fn string_argument(arguments: &[Value], index: usize) -> Result<&str, RuntimeError> {
    arguments
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| RuntimeError::internal(format!("argument {} is not a string", index)))
}

fn string(value: String) -> Result<Option<Value>, RuntimeError> {
    Ok(Some(Value::from(ValueData::String(value))))
}

fn to_string(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    string(receiver(this)?.to_string())
}

fn to_int(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    Ok(Some(receiver(this)?.convert(BuiltinKind::Int)?))
}

fn to_float(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    Ok(Some(receiver(this)?.convert(BuiltinKind::Float)?))
}

fn to_double(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    Ok(Some(receiver(this)?.convert(BuiltinKind::Double)?))
}

fn length(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    let text = receiver(this)?.as_str().unwrap_or_default();
    let length = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    Ok(Some(Value::from(ValueData::Int(length))))
}

fn to_upper(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    string(receiver(this)?.as_str().unwrap_or_default().to_uppercase())
}

fn to_lower(_: &mut dyn Console, this: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    string(receiver(this)?.as_str().unwrap_or_default().to_lowercase())
}

fn contains(_: &mut dyn Console, this: Option<&Value>, arguments: &[Value]) -> Result<Option<Value>, RuntimeError> {
    let text = receiver(this)?.as_str().unwrap_or_default();
    let needle = string_argument(arguments, 0)?;
    Ok(Some(Value::from(ValueData::Bool(text.contains(needle)))))
}

fn write_line(console: &mut dyn Console, _: Option<&Value>, arguments: &[Value]) -> Result<Option<Value>, RuntimeError> {
    console.write(string_argument(arguments, 0)?)?;
    console.write("\n")?;
    Ok(None)
}

fn write(console: &mut dyn Console, _: Option<&Value>, arguments: &[Value]) -> Result<Option<Value>, RuntimeError> {
    console.write(string_argument(arguments, 0)?)?;
    Ok(None)
}

fn read_line(console: &mut dyn Console, _: Option<&Value>, _: &[Value]) -> Result<Option<Value>, RuntimeError> {
    string(console.read_line()?)
}

macro_rules! native {
    ($name:literal, [$($param:ident),*], $give:expr, $call:expr) => {
        NativeFunction {
            name: $name,
            parameters: &[$(BuiltinKind::$param),*],
            give: $give,
            call: $call,
        }
    };
}

static INT_METHODS: &[NativeFunction] = &[
    native!("toString", [], Some(BuiltinKind::String), to_string),
    native!("toFloat", [], Some(BuiltinKind::Float), to_float),
    native!("toDouble", [], Some(BuiltinKind::Double), to_double),
];

static FLOAT_METHODS: &[NativeFunction] = &[
    native!("toString", [], Some(BuiltinKind::String), to_string),
    native!("toInt", [], Some(BuiltinKind::Int), to_int),
    native!("toDouble", [], Some(BuiltinKind::Double), to_double),
];

static DOUBLE_METHODS: &[NativeFunction] = &[
    native!("toString", [], Some(BuiltinKind::String), to_string),
    native!("toInt", [], Some(BuiltinKind::Int), to_int),
    native!("toFloat", [], Some(BuiltinKind::Float), to_float),
];

static BOOL_METHODS: &[NativeFunction] = &[
    native!("toString", [], Some(BuiltinKind::String), to_string),
];

static STRING_METHODS: &[NativeFunction] = &[
    native!("length", [], Some(BuiltinKind::Int), length),
    native!("toUpper", [], Some(BuiltinKind::String), to_upper),
    native!("toLower", [], Some(BuiltinKind::String), to_lower),
    native!("contains", [String], Some(BuiltinKind::Bool), contains),
];

static IO_LIBRARY: &[NativeFunction] = &[
    native!("writeLine", [String], None, write_line),
    native!("write", [String], None, write),
    native!("readLine", [], Some(BuiltinKind::String), read_line),
];

lazy_static! {
    /// Standard libraries by import name.
    pub static ref STANDARD_LIBRARIES: HashMap<&'static str, &'static [NativeFunction]> = {
        let mut libraries: HashMap<&'static str, &'static [NativeFunction]> = HashMap::new();
        libraries.insert("io", IO_LIBRARY);
        libraries
    };
}

/// Methods callable on a value of `kind`.
pub fn methods_for(kind: BuiltinKind) -> &'static [NativeFunction] {
    match kind {
        BuiltinKind::Int => INT_METHODS,
        BuiltinKind::Float => FLOAT_METHODS,
        BuiltinKind::Double => DOUBLE_METHODS,
        BuiltinKind::Bool => BOOL_METHODS,
        BuiltinKind::String => STRING_METHODS,
        BuiltinKind::Function | BuiltinKind::Package | BuiltinKind::Library => &[],
    }
}

pub fn standard_library(name: &str) -> Option<&'static [NativeFunction]> {
    STANDARD_LIBRARIES.get(name).copied()
}
