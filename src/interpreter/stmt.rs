use std::rc::Rc;

use crate::{
    ast::{
        ast::Stmt,
        statements::{DeclarationStmt, ImportStmt},
    },
    errors::errors::RuntimeError,
    value::value::{ClassValue, FunctionValue, Value, ValueData},
};

use super::{activation_record::Record, expr::evaluate, interpreter::Interpreter};

pub fn execute_stmt(interpreter: &mut Interpreter, stmt: &Stmt) -> Result<(), RuntimeError> {
    match stmt {
        Stmt::Declaration(declaration) => execute_declaration(interpreter, declaration),
        Stmt::Assignment(assignment) => {
            let value = evaluate(interpreter, &assignment.value)?
                .ok_or_else(|| RuntimeError::internal(format!("nothing assigned to '{}'", assignment.name)))?
                .deep_copy()
                .with_name(&assignment.name);

            let record = interpreter.current()?;
            let value = match record.lookup(&assignment.name).and_then(|current| current.kind()) {
                Some(kind) => value.coerce(kind),
                None => value,
            };
            if !record.assign(&assignment.name, value) {
                return Err(RuntimeError::internal(format!("'{}' is not defined", assignment.name)));
            }
            Ok(())
        }
        Stmt::Function(function) => {
            let value = Value::named(
                &function.name,
                ValueData::Function(Rc::new(FunctionValue::new(Rc::clone(function)))),
            );
            interpreter.current()?.define(&function.name, value);
            Ok(())
        }
        Stmt::If(if_stmt) => {
            let condition = evaluate(interpreter, &if_stmt.condition)?
                .and_then(|condition| condition.as_bool())
                .ok_or_else(|| RuntimeError::internal("if condition is not a bool"))?;

            if condition {
                interpreter.execute_block(&if_stmt.body)?;
            }
            Ok(())
        }
        Stmt::Give(give) => {
            let value = match &give.value {
                Some(value) => evaluate(interpreter, value)?,
                None => None,
            };
            let owner = interpreter
                .current()?
                .owner()
                .ok_or_else(|| RuntimeError::internal("give outside of a function call"))?;

            let value = match (value, owner.decl.give_type.as_ref().and_then(|ty| ty.builtin())) {
                (Some(value), Some(kind)) => Some(value.coerce(kind)),
                (value, _) => value,
            };
            owner.give(value);
            Ok(())
        }
        Stmt::Import(import) => execute_import(interpreter, import),
        Stmt::TypeDefinition(definition) => {
            let record = interpreter.current()?;
            let class = ClassValue::new(Rc::clone(definition), &record);
            record.define(
                &definition.name,
                Value::named(&definition.name, ValueData::Class(Rc::new(class))),
            );
            Ok(())
        }
        Stmt::Expression(stmt) => {
            evaluate(interpreter, &stmt.expression)?;
            Ok(())
        }
    }
}

fn execute_declaration(interpreter: &mut Interpreter, declaration: &DeclarationStmt) -> Result<(), RuntimeError> {
    let value = match &declaration.value {
        Some(value) => evaluate(interpreter, value)?
            .ok_or_else(|| RuntimeError::internal(format!("nothing to initialize '{}' with", declaration.name)))?
            .deep_copy(),
        None => default_value(interpreter, declaration)?,
    };

    let value = match declaration.type_name.builtin() {
        Some(kind) => value.coerce(kind),
        None => value,
    };

    interpreter
        .current()?
        .define(&declaration.name, value.with_name(&declaration.name));
    Ok(())
}

fn default_value(interpreter: &mut Interpreter, declaration: &DeclarationStmt) -> Result<Value, RuntimeError> {
    if let Some(kind) = declaration.type_name.builtin() {
        return Value::default_for(kind)
            .ok_or_else(|| RuntimeError::internal(format!("'{}' has no default value", kind)));
    }

    let class = match interpreter.current()?.get(&declaration.type_name.name) {
        Some(Value {
            data: ValueData::Class(class),
            ..
        }) => class,
        _ => {
            return Err(RuntimeError::internal(format!(
                "'{}' is not a type",
                declaration.type_name.name
            )))
        }
    };

    interpreter.instantiate(&class)
}

/// Adds the members of library record `from` into `into`, merging nested libraries.
fn merge_library(into: &Record, from: &Record) {
    for (name, value) in from.members() {
        if let (Some(ValueData::Library(existing)), ValueData::Library(incoming)) =
            (into.get_local(&name).map(|existing| existing.data), &value.data)
        {
            merge_library(&existing, incoming);
            continue;
        }
        into.define(&name, value);
    }
}

fn execute_import(interpreter: &mut Interpreter, import: &ImportStmt) -> Result<(), RuntimeError> {
    let root = import
        .hierarchy
        .first()
        .ok_or_else(|| RuntimeError::internal("empty import"))?;

    let value = interpreter.resolver.resolve_value(&import.hierarchy)?;
    let record = interpreter.current()?;

    tracing::debug!(import = %import.path(), "imported");

    if let (Some(ValueData::Library(existing)), ValueData::Library(incoming)) =
        (record.get_local(root).map(|existing| existing.data), &value.data)
    {
        merge_library(&existing, incoming);
        return Ok(());
    }
    record.define(root, value);
    Ok(())
}
