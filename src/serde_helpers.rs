//! Serde helpers for node JSON output
//!
//! oxc operator enums do not implement `Serialize`; they are written out as
//! their source spelling instead.

use oxc_syntax::operator::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};
use serde::Serializer;

/// Operators that have a fixed source spelling
pub trait OperatorText: Copy {
    fn text(self) -> &'static str;
}

impl OperatorText for AssignmentOperator {
    fn text(self) -> &'static str {
        self.as_str()
    }
}

impl OperatorText for BinaryOperator {
    fn text(self) -> &'static str {
        self.as_str()
    }
}

impl OperatorText for LogicalOperator {
    fn text(self) -> &'static str {
        self.as_str()
    }
}

impl OperatorText for UnaryOperator {
    fn text(self) -> &'static str {
        self.as_str()
    }
}

impl OperatorText for UpdateOperator {
    fn text(self) -> &'static str {
        self.as_str()
    }
}

/// Serialize an operator as its source spelling
pub fn serialize_operator<S, T>(operator: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: OperatorText,
{
    serializer.serialize_str(operator.text())
}

#[cfg(test)]
mod tests {
    use crate::ast::builders::{binary_expression, identifier, numeric_literal};
    use oxc_syntax::operator::BinaryOperator;

    #[test]
    fn test_operator_serializes_as_source_text() {
        let node = binary_expression(
            BinaryOperator::StrictInequality,
            identifier("a"),
            numeric_literal(1.0),
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["operator"], "!==");
        assert_eq!(json["type"], "BinaryExpression");
    }
}
