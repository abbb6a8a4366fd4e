use std::rc::Rc;

use crate::{
    ast::{ast::Program, ast::Stmt},
    errors::errors::RuntimeError,
    modules::resolver::ModuleResolver,
    value::{
        builtins::methods_for,
        value::{ClassValue, FunctionValue, InstanceValue, Value, ValueData},
    },
};

use super::{
    activation_record::Record, call_stack::CallStack, console::SharedConsole, stmt::execute_stmt,
};

pub struct Interpreter<'r> {
    pub call_stack: CallStack,
    pub resolver: &'r mut ModuleResolver,
    pub console: SharedConsole,
}

impl<'r> Interpreter<'r> {
    pub fn new(resolver: &'r mut ModuleResolver) -> Self {
        let console = resolver.console();
        Interpreter {
            call_stack: CallStack::new(),
            resolver,
            console,
        }
    }

    /// The record of the innermost call.
    pub fn current(&self) -> Result<Record, RuntimeError> {
        self.call_stack
            .peek()
            .cloned()
            .ok_or_else(|| RuntimeError::internal("the call stack is empty"))
    }

    /// Runs `statements` in the current record, stopping once its function has given.
    pub fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let owner = self.current()?.owner();

        for stmt in statements {
            execute_stmt(self, stmt)?;
            if owner.as_ref().is_some_and(|owner| owner.has_given()) {
                break;
            }
        }

        Ok(())
    }

    /// Creates an instance of `class` and runs the class body in its record.
    pub fn instantiate(&mut self, class: &Rc<ClassValue>) -> Result<Value, RuntimeError> {
        let record = Record::for_instance(class);

        self.call_stack.push(record.clone());
        let result = self.execute_block(&class.decl.body);
        self.call_stack.pop();
        result?;

        Ok(Value::from(ValueData::Instance(InstanceValue {
            class: Rc::clone(class),
            record,
        })))
    }

    /// Calls a user function in a new record nested under `parent`.
    ///
    /// Every call gets its own give state, so a call still running is not
    /// disturbed by a recursive call of the same function value.
    pub fn call_function(
        &mut self,
        function: &Rc<FunctionValue>,
        parent: &Record,
        arguments: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        let decl = Rc::clone(&function.decl);
        if decl.parameters.len() != arguments.len() {
            return Err(RuntimeError::internal(format!(
                "'{}' called with {} arguments instead of {}",
                decl.name,
                arguments.len(),
                decl.parameters.len()
            )));
        }

        let activation = function.activation();
        let record = Record::for_call(Rc::clone(&activation), parent);
        for (parameter, argument) in decl.parameters.iter().zip(arguments) {
            let argument = match parameter.type_name.builtin() {
                Some(kind) => argument.coerce(kind),
                None => argument,
            };
            record.define(&parameter.name, argument.deep_copy().with_name(&parameter.name));
        }

        tracing::debug!(function = %decl.name, level = record.nesting_level(), "enter");
        self.call_stack.push(record);
        let result = self.execute_block(&decl.body);
        tracing::debug!(function = %decl.name, "leave\n{}", self.call_stack);
        self.call_stack.pop();
        result?;

        Ok(activation.take_give_value())
    }

    /// Runs a constructor call: a fresh instance, then its `construct` method if it has one.
    pub fn construct(&mut self, class: &Rc<ClassValue>, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let instance = self.instantiate(class)?;

        if let ValueData::Instance(InstanceValue { record, .. }) = &instance.data {
            if let Some(Value {
                data: ValueData::Function(constructor),
                ..
            }) = record.get_local("construct")
            {
                self.call_function(&constructor, record, arguments)?;
            }
        }

        Ok(instance)
    }

    /// The record a `.` after `value` looks into.
    pub fn member_record(&mut self, value: &Value) -> Result<Record, RuntimeError> {
        match &value.data {
            ValueData::Package(record) | ValueData::Library(record) => Ok(record.clone()),
            ValueData::Instance(instance) => Ok(instance.record.clone()),
            ValueData::Class(class) => match self.instantiate(class)?.data {
                ValueData::Instance(instance) => Ok(instance.record),
                _ => Err(RuntimeError::internal("instantiation did not give an instance")),
            },
            _ => {
                let kind = value
                    .kind()
                    .ok_or_else(|| RuntimeError::internal("member access on a value without members"))?;
                let record = Record::new(kind.name(), 0, None);
                for method in methods_for(kind) {
                    record.define(method.name, method.bind(Some(value)));
                }
                Ok(record)
            }
        }
    }
}

/// Executes `program` and returns its root record.
#[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn interpret(program: &Program, resolver: &mut ModuleResolver) -> Result<Record, RuntimeError> {
    let mut interpreter = Interpreter::new(resolver);

    let root = Record::new(&program.name, 1, None);
    interpreter.call_stack.push(root);
    let result = interpreter.execute_block(&program.statements);
    let root = interpreter.call_stack.pop();
    result?;

    root.ok_or_else(|| RuntimeError::internal("the program record was popped early"))
}
