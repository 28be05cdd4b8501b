//! Compile-time type checks shared by every backend compiler.
//!
//! Without a schema only mismatches visible in the filter text itself are
//! reported. With a schema every column must be known and every literal must
//! be compatible with its column's type.

use crate::error::{CompileError, CompileResult};
use filter_syntax::{ComparisonOperator, Expression, ExpressionKind, Filter, Identifier, Literal};
use model::{DataType, Schema};
use tracing::trace;

const ORDERED_TYPE: &str = "an ordered type";

pub fn check_filter(filter: &Filter, schema: Option<&Schema>) -> CompileResult<()> {
    match filter.root() {
        Some(root) => check_expression(root, schema),
        None => Ok(()),
    }
}

pub fn check_expression(expr: &Expression, schema: Option<&Schema>) -> CompileResult<()> {
    match &expr.kind {
        ExpressionKind::Comparison {
            column,
            operator,
            value,
        } => check_comparison(column, *operator, value, schema),
        ExpressionKind::ColumnComparison {
            left,
            operator,
            right,
        } => check_column_comparison(left, *operator, right, schema),
        ExpressionKind::In { column, values } => check_in_list(column, values, schema),
        ExpressionKind::IsNull { column, .. } => resolve(column, schema).map(|_| ()),
        ExpressionKind::And { left, right } | ExpressionKind::Or { left, right } => {
            check_expression(left, schema)?;
            check_expression(right, schema)
        }
        ExpressionKind::Not { operand } => check_expression(operand, schema),
    }
}

/// Looks the column up in the schema; `Ok(None)` when there is no schema.
fn resolve(column: &Identifier, schema: Option<&Schema>) -> CompileResult<Option<DataType>> {
    let Some(schema) = schema else {
        return Ok(None);
    };
    schema
        .column_type(&column.name)
        .map(Some)
        .ok_or_else(|| CompileError::UnknownColumn {
            column: column.name.clone(),
            offset: column.span.start,
        })
}

fn literal_type(literal: &Literal) -> Option<DataType> {
    literal.to_value().data_type()
}

fn check_comparison(
    column: &Identifier,
    operator: ComparisonOperator,
    value: &Literal,
    schema: Option<&Schema>,
) -> CompileResult<()> {
    let column_type = resolve(column, schema)?;
    let offset = column.span.start;

    if operator == ComparisonOperator::Like {
        if let Some(ty) = column_type
            && ty != DataType::String
        {
            return Err(CompileError::type_mismatch(&column.name, "string", ty.name(), offset));
        }
        return Ok(());
    }

    // NULL literals compare false everywhere and carry no type
    let Some(ty) = literal_type(value) else {
        trace!(column = %column.name, "Comparison against NULL literal");
        return Ok(());
    };

    if operator.is_ordering() && !ty.is_ordered() {
        return Err(CompileError::type_mismatch(&column.name, ORDERED_TYPE, ty.name(), offset));
    }

    if let Some(column_type) = column_type {
        if operator.is_ordering() && !column_type.is_ordered() {
            return Err(CompileError::type_mismatch(
                &column.name,
                ORDERED_TYPE,
                column_type.name(),
                offset,
            ));
        }
        if !column_type.is_compatible(&ty) {
            return Err(CompileError::type_mismatch(
                &column.name,
                column_type.name(),
                ty.name(),
                offset,
            ));
        }
    }

    Ok(())
}

fn check_column_comparison(
    left: &Identifier,
    operator: ComparisonOperator,
    right: &Identifier,
    schema: Option<&Schema>,
) -> CompileResult<()> {
    let left_type = resolve(left, schema)?;
    let right_type = resolve(right, schema)?;

    if let (Some(lt), Some(rt)) = (left_type, right_type) {
        if !lt.is_compatible(&rt) {
            return Err(CompileError::type_mismatch(
                &right.name,
                lt.name(),
                rt.name(),
                right.span.start,
            ));
        }
        if operator.is_ordering() && !lt.is_ordered() {
            return Err(CompileError::type_mismatch(
                &left.name,
                ORDERED_TYPE,
                lt.name(),
                left.span.start,
            ));
        }
    }

    Ok(())
}

fn check_in_list(
    column: &Identifier,
    values: &[Literal],
    schema: Option<&Schema>,
) -> CompileResult<()> {
    let column_type = resolve(column, schema)?;
    let offset = column.span.start;

    let mut expected = column_type;
    for ty in values.iter().filter_map(literal_type) {
        match expected {
            Some(expected) if !expected.is_compatible(&ty) => {
                return Err(CompileError::type_mismatch(
                    &column.name,
                    expected.name(),
                    ty.name(),
                    offset,
                ));
            }
            Some(_) => {}
            None => expected = Some(ty),
        }
    }

    Ok(())
}
