//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::{
    diagnostics::Diagnostics,
    errors::{Error, ErrorImpl, ErrorKind, ErrorTip},
};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.boink".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnknownToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnknownToken");
    assert_eq!(error.kind(), ErrorKind::UnknownToken);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(*error.get_position().1, "test.boink");
}

#[test]
fn test_front_end_errors_share_a_kind() {
    let detailed = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: ")".to_string(),
            message: "expected a type name".to_string(),
        },
        at(0),
    );
    let number = Error::new(
        ErrorImpl::NumberParseError {
            token: "99999999999".to_string(),
        },
        at(0),
    );

    assert_eq!(detailed.kind(), ErrorKind::UnexpectedToken);
    assert_eq!(number.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_member_and_cyclic_errors_map_to_kinds() {
    let member = Error::new(
        ErrorImpl::UndefinedMember {
            name: "nope".to_string(),
            parent: "io".to_string(),
        },
        at(0),
    );
    let cyclic = Error::new(
        ErrorImpl::CyclicImport {
            name: "a".to_string(),
        },
        at(0),
    );
    let type_as_value = Error::new(
        ErrorImpl::TypeUsedAsValue {
            name: "Point".to_string(),
        },
        at(0),
    );

    assert_eq!(member.kind(), ErrorKind::UndefinedSymbol);
    assert_eq!(cyclic.kind(), ErrorKind::UnknownLibrary);
    assert_eq!(type_as_value.kind(), ErrorKind::IncompatibleTypes);
}

#[test]
fn test_argument_mismatch_message() {
    let too_many = ErrorImpl::ArgumentMismatch {
        name: "add".to_string(),
        expected: 2,
        received: 3,
    };
    let too_few = ErrorImpl::ArgumentMismatch {
        name: "add".to_string(),
        expected: 2,
        received: 1,
    };

    assert_eq!(too_many.to_string(), "Too many arguments for 'add': expected 2, received 3");
    assert_eq!(too_few.to_string(), "Too few arguments for 'add': expected 2, received 1");
}

#[test]
fn test_error_tips() {
    let error = Error::new(
        ErrorImpl::IncompatibleTypes {
            expected: "int".to_string(),
            received: "string".to_string(),
        },
        at(0),
    );
    assert_eq!(
        error.get_tip(),
        ErrorTip::Suggestion(String::from("Expected type `int`, received `string`"))
    );

    let error = Error::new(
        ErrorImpl::UnsupportedOperation {
            operation: "add".to_string(),
            left: "bool".to_string(),
            right: "int".to_string(),
        },
        at(0),
    );
    assert_eq!(error.get_tip(), ErrorTip::None);
    assert_eq!(error.get_tip().to_string(), "");
}

#[test]
fn test_diagnostics_resolve_line_and_column() {
    let mut diagnostics = Diagnostics::new(Rc::from("int a = 1\nint b = c\n"));
    diagnostics.report(Error::new(
        ErrorImpl::UndefinedSymbol {
            name: "c".to_string(),
        },
        at(18),
    ));

    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.line, 2);
    assert_eq!(diagnostic.column, 9);
    assert_eq!(diagnostic.line_text, "int b = c\n");
    assert_eq!(
        diagnostic.to_string(),
        "UndefinedSymbol: 'c' is not defined. Error Position: (2, 9). File: 'test.boink'"
    );
}

#[test]
fn test_diagnostics_keep_order_and_count() {
    let mut diagnostics = Diagnostics::new(Rc::from("give 1\n"));
    diagnostics.report(Error::new(ErrorImpl::GiveNotAllowed, at(0)));
    diagnostics.report(Error::new(
        ErrorImpl::MultipleDefinition {
            name: "a".to_string(),
        },
        at(5),
    ));
    diagnostics.report(Error::new(ErrorImpl::GiveNotAllowed, at(0)));

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(
        diagnostics.kinds(),
        vec![ErrorKind::GiveNotAllowed, ErrorKind::MultipleDefinition, ErrorKind::GiveNotAllowed]
    );
    assert_eq!(diagnostics.count(ErrorKind::GiveNotAllowed), 2);
    assert_eq!(diagnostics.to_string().lines().count(), 3);
}

#[test]
fn test_diagnostics_extend_keeps_foreign_positions() {
    let mut package = Diagnostics::new(Rc::from("\n\nint a = b\n"));
    package.report(Error::new(
        ErrorImpl::UndefinedSymbol {
            name: "b".to_string(),
        },
        Position(10, Rc::new("shapes.boink".to_string())),
    ));

    let mut main = Diagnostics::new(Rc::from("import shapes\n"));
    main.extend(package);

    let diagnostic = main.iter().next().unwrap();
    assert_eq!(diagnostic.file(), "shapes.boink");
    assert_eq!((diagnostic.line, diagnostic.column), (3, 9));
}
