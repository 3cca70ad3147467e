//! Entry points tying the passes together.

use tracing::debug;

use crate::{
    ast::Expr,
    convert::convert_types,
    diagnostic::Diagnostic,
    lexer::Lexer,
    parser::{ParseError, Parser},
    types::FieldTypeDescriptor,
    validate::validate,
};

/// Converts literal types and validates `expr` against `fields`.
///
/// Returns the rebuilt tree together with every diagnostic found; the list is
/// empty iff the expression is well-typed. A root that does not resolve to a
/// boolean is rejected with a single diagnostic and returned untouched.
pub fn process(expr: Expr, fields: &dyn FieldTypeDescriptor) -> (Expr, Vec<Diagnostic>) {
    if !expr.is_logical() {
        let diagnostic = Diagnostic::at(
            &expr,
            format!(
                "expected logical expression but received expression of type {}",
                expr.kind_name()
            ),
        );
        debug!(kind = expr.kind_name(), "rejected non-logical root expression");
        return (expr, vec![diagnostic]);
    }

    // Validation must only ever see the converted tree
    let expr = convert_types(expr, fields);
    let diagnostics = validate(&expr, fields);

    debug!(diagnostics = diagnostics.len(), "processed expression");
    (expr, diagnostics)
}

/// Parses `query` and runs [`process`] on the result.
///
/// ```
/// use recsel::{FieldSchema, FieldType, analyze};
///
/// let fields = FieldSchema::new()
///     .with_field("name", FieldType::String)
///     .with_field("created", FieldType::Date);
///
/// let (_, diagnostics) = analyze(r#"name GLOB "a*.txt" AND created > "2021-06-01""#, &fields).unwrap();
/// assert!(diagnostics.is_empty());
///
/// let (_, diagnostics) = analyze(r#"size = 3"#, &fields).unwrap();
/// assert_eq!(diagnostics[0].to_string(), "1:1: invalid field: size");
/// ```
pub fn analyze(
    query: &str,
    fields: &dyn FieldTypeDescriptor,
) -> Result<(Expr, Vec<Diagnostic>), ParseError> {
    let expr = Parser::new(Lexer::new(query))?.parse()?;
    Ok(process(expr, fields))
}
