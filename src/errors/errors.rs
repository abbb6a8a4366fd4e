use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

use crate::Position;

use super::diagnostics::Diagnostics;

/// Coarse classification shared by every diagnostic.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ErrorKind {
    UnknownToken,
    UnexpectedToken,
    MultipleDefinition,
    UndefinedSymbol,
    IncompatibleTypes,
    ArgumentMismatch,
    NoGive,
    GiveNotAllowed,
    UnsupportedOperation,
    UnknownLibrary,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnknownToken { .. } => ErrorKind::UnknownToken,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::UnexpectedToken,
            ErrorImpl::MultipleDefinition { .. } => ErrorKind::MultipleDefinition,
            ErrorImpl::UndefinedSymbol { .. } | ErrorImpl::UndefinedMember { .. } => {
                ErrorKind::UndefinedSymbol
            }
            ErrorImpl::IncompatibleTypes { .. } | ErrorImpl::TypeUsedAsValue { .. } => {
                ErrorKind::IncompatibleTypes
            }
            ErrorImpl::ArgumentMismatch { .. } => ErrorKind::ArgumentMismatch,
            ErrorImpl::NoGive { .. } => ErrorKind::NoGive,
            ErrorImpl::GiveNotAllowed => ErrorKind::GiveNotAllowed,
            ErrorImpl::UnsupportedOperation { .. }
            | ErrorImpl::UnsupportedUnaryOperation { .. } => ErrorKind::UnsupportedOperation,
            ErrorImpl::UnknownLibrary { .. } | ErrorImpl::CyclicImport { .. } => {
                ErrorKind::UnknownLibrary
            }
        }
    }

    pub fn get_error_name(&self) -> &str {
        match self.kind() {
            ErrorKind::UnknownToken => "UnknownToken",
            ErrorKind::UnexpectedToken => "UnexpectedToken",
            ErrorKind::MultipleDefinition => "MultipleDefinition",
            ErrorKind::UndefinedSymbol => "UndefinedSymbol",
            ErrorKind::IncompatibleTypes => "IncompatibleTypes",
            ErrorKind::ArgumentMismatch => "ArgumentMismatch",
            ErrorKind::NoGive => "NoGive",
            ErrorKind::GiveNotAllowed => "GiveNotAllowed",
            ErrorKind::UnsupportedOperation => "UnsupportedOperation",
            ErrorKind::UnknownLibrary => "UnknownLibrary",
        }
    }

    /// The human readable message, without kind or position.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnknownToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you forget a newline or a closing `;`?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::MultipleDefinition { name } => {
                ErrorTip::Suggestion(format!("`{}` is already defined in this scope", name))
            }
            ErrorImpl::UndefinedSymbol { name } => ErrorTip::Suggestion(format!(
                "`{}` has to be declared or imported before it is used",
                name
            )),
            ErrorImpl::UndefinedMember { name, parent } => {
                ErrorTip::Suggestion(format!("`{}` has no member `{}`", parent, name))
            }
            ErrorImpl::IncompatibleTypes { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::TypeUsedAsValue { name } => ErrorTip::Suggestion(format!(
                "Call `{}(...)` or declare a `{}` variable instead",
                name, name
            )),
            ErrorImpl::ArgumentMismatch { expected, received, .. } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::NoGive { give_type, .. } => ErrorTip::Suggestion(format!(
                "Add a `give` statement with a `{}` value",
                give_type
            )),
            ErrorImpl::GiveNotAllowed => ErrorTip::Suggestion(String::from(
                "`give` can only be used inside a function body",
            )),
            ErrorImpl::UnsupportedOperation { .. }
            | ErrorImpl::UnsupportedUnaryOperation { .. } => ErrorTip::None,
            ErrorImpl::UnknownLibrary { name } => ErrorTip::Suggestion(format!(
                "No package, library or standard library named `{}` was found",
                name
            )),
            ErrorImpl::CyclicImport { .. } => ErrorTip::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

fn arity(expected: &usize, received: &usize) -> &'static str {
    if received > expected {
        "Too many arguments"
    } else {
        "Too few arguments"
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unknown token {token:?}")]
    UnknownToken { token: String },
    #[error("unexpected token {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token {token:?} ({message})")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("invalid number literal {token:?}")]
    NumberParseError { token: String },
    #[error("'{name}' is already defined in this scope")]
    MultipleDefinition { name: String },
    #[error("'{name}' is not defined")]
    UndefinedSymbol { name: String },
    #[error("'{name}' is not a member of '{parent}'")]
    UndefinedMember { name: String, parent: String },
    #[error("expected type '{expected}', received '{received}'")]
    IncompatibleTypes { expected: String, received: String },
    #[error("type '{name}' cannot be used as a value")]
    TypeUsedAsValue { name: String },
    #[error("{} for '{name}': expected {expected}, received {received}", arity(.expected, .received))]
    ArgumentMismatch {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("function '{name}' declares give type '{give_type}' but never gives")]
    NoGive { name: String, give_type: String },
    #[error("give is not allowed outside of a function")]
    GiveNotAllowed,
    #[error("operation '{operation}' is not supported between '{left}' and '{right}'")]
    UnsupportedOperation {
        operation: String,
        left: String,
        right: String,
    },
    #[error("operation '{operation}' is not supported for '{operand}'")]
    UnsupportedUnaryOperation { operation: String, operand: String },
    #[error("library or package '{name}' does not exist")]
    UnknownLibrary { name: String },
    #[error("package '{name}' is imported cyclically")]
    CyclicImport { name: String },
}

/// Faults raised while executing an already analyzed program.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("operation '{operation}' is not supported between '{left}' and '{right}'")]
    UnsupportedOperation {
        operation: String,
        left: String,
        right: String,
    },
    #[error("operation '{operation}' is not supported for '{operand}'")]
    UnsupportedUnaryOperation { operation: String, operand: String },
    #[error("internal interpreter error: {0}")]
    Internal(String),
    #[error("console error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn internal(message: impl Into<String>) -> Self {
        RuntimeError::Internal(message.into())
    }
}

/// Everything that can stop a whole run, from reading the file to executing it.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} error(s) found", .0.len())]
    Diagnostics(Diagnostics),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
