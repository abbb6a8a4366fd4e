use crate::{
    ast::{
        ast::{Expr, Reference},
        expressions::{CallExpr, LiteralValue, VariableExpr},
    },
    errors::errors::RuntimeError,
    value::value::{Value, ValueData},
};

use super::{activation_record::Record, interpreter::Interpreter};

fn required(value: Option<Value>, what: &str) -> Result<Value, RuntimeError> {
    value.ok_or_else(|| RuntimeError::internal(format!("{} produced no value", what)))
}

/// Evaluates `expr` in the current record. `None` means the expression gave nothing.
pub fn evaluate(interpreter: &mut Interpreter, expr: &Expr) -> Result<Option<Value>, RuntimeError> {
    match expr {
        Expr::Literal(literal) => {
            let data = match &literal.value {
                LiteralValue::Int(value) => ValueData::Int(*value),
                LiteralValue::Float(value) => ValueData::Float(*value),
                LiteralValue::Double(value) => ValueData::Double(*value),
                LiteralValue::Bool(value) => ValueData::Bool(*value),
                LiteralValue::String(value) => ValueData::String(value.clone()),
            };
            follow(interpreter, Some(Value::from(data)), literal.child.as_deref())
        }
        Expr::Binary(binary) => {
            let left = required(evaluate(interpreter, &binary.left)?, "left operand")?;
            let right = required(evaluate(interpreter, &binary.right)?, "right operand")?;
            left.binary(binary.operator, &right).map(Some)
        }
        Expr::Unary(unary) => {
            let operand = required(evaluate(interpreter, &unary.operand)?, "operand")?;
            operand.unary(unary.operator).map(Some)
        }
        Expr::Variable(variable) => evaluate_variable(interpreter, variable, None),
        Expr::Call(call) => evaluate_call(interpreter, call, None),
    }
}

/// Continues a member chain from `value`, if there is a next segment.
fn follow(
    interpreter: &mut Interpreter,
    value: Option<Value>,
    child: Option<&Reference>,
) -> Result<Option<Value>, RuntimeError> {
    let Some(child) = child else {
        return Ok(value);
    };

    let value = required(value, "member access target")?;
    let record = interpreter.member_record(&value)?;
    match child {
        Reference::Variable(variable) => evaluate_variable(interpreter, variable, Some(&record)),
        Reference::Call(call) => evaluate_call(interpreter, call, Some(&record)),
    }
}

fn evaluate_variable(
    interpreter: &mut Interpreter,
    variable: &VariableExpr,
    target: Option<&Record>,
) -> Result<Option<Value>, RuntimeError> {
    let value = match target {
        Some(record) => record.get_local(&variable.name),
        None => interpreter.current()?.get(&variable.name),
    }
    .ok_or_else(|| RuntimeError::internal(format!("'{}' is not defined", variable.name)))?;

    follow(interpreter, Some(value), variable.child.as_deref())
}

fn evaluate_call(
    interpreter: &mut Interpreter,
    call: &CallExpr,
    target: Option<&Record>,
) -> Result<Option<Value>, RuntimeError> {
    // The call runs nested under the record that binds the callee, not the caller
    let (callee, parent) = match target {
        Some(record) => (record.get_local(&call.name), record.clone()),
        None => match interpreter.current()?.resolve(&call.name) {
            Some((callee, record)) => (Some(callee), record),
            None => (None, interpreter.current()?),
        },
    };
    let callee = callee.ok_or_else(|| RuntimeError::internal(format!("'{}' is not defined", call.name)))?;

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
        arguments.push(required(evaluate(interpreter, argument)?, "argument")?);
    }

    let result = match &callee.data {
        ValueData::Function(function) => interpreter.call_function(function, &parent, arguments)?,
        ValueData::Native(native) => {
            let mut console = interpreter.console.borrow_mut();
            native
                .function
                .invoke(&mut *console, native.receiver.as_deref(), &arguments)?
        }
        ValueData::Class(class) => Some(interpreter.construct(class, arguments)?),
        _ => {
            return Err(RuntimeError::internal(format!(
                "'{}' is not callable",
                call.name
            )))
        }
    };

    follow(interpreter, result, call.child.as_deref())
}
