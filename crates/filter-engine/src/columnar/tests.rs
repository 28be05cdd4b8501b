use super::*;
use filter_syntax::parse;
use model::Value;
use std::collections::HashMap;
use tracing_test::traced_test;

fn plan(input: &str) -> PushdownPlan {
    ColumnarCompiler::new()
        .compile(&parse(input).unwrap())
        .unwrap_or_else(|e| panic!("failed to compile {input:?}: {e}"))
}

fn row(fields: &[(&str, Value)]) -> HashMap<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Every combination of a few values for `a`, `b` and `name`, nulls included.
fn sample_rows() -> Vec<HashMap<String, Value>> {
    let numbers = [Value::Null, Value::Int(1), Value::Int(3), Value::Int(7)];
    let names = [Value::Null, Value::from("x"), Value::from("axa"), Value::from("b")];

    let mut rows = Vec::new();
    for a in &numbers {
        for b in &numbers {
            for name in &names {
                rows.push(row(&[("a", a.clone()), ("b", b.clone()), ("name", name.clone())]));
            }
        }
    }
    rows
}

#[test]
fn test_empty_filter_pushes_nothing() {
    let plan = plan("");
    assert!(plan.is_match_all());
    assert!(plan.matches(&row(&[])));
}

#[test]
fn test_fully_pushable_conjunction() {
    let plan = plan("age > 30 AND country = 'US'");

    assert!(plan.residual().is_none());
    assert_eq!(
        plan.pushdown().unwrap().to_string(),
        "[[('age', '>', 30), ('country', '=', 'US')]]"
    );
}

#[test]
fn test_dnf_rendering() {
    let plan = plan("a > 1 AND b <= 3 OR c = 'abc'");
    assert_eq!(
        plan.pushdown().unwrap().to_string(),
        "[[('a', '>', 1), ('b', '<=', 3)], [('c', '=', 'abc')]]"
    );
}

#[test]
fn test_like_is_split_into_residual() {
    let plan = plan("a > 1 AND name LIKE '%x%'");

    assert_eq!(plan.pushdown().unwrap().to_string(), "[[('a', '>', 1)]]");
    let residual = plan.residual().unwrap();
    assert!(residual.matches(&row(&[("name", "axa".into())])));
    assert!(!residual.matches(&row(&[("name", "b".into())])));
}

#[test]
fn test_mixed_clause_stays_residual_as_a_whole() {
    let plan = plan("a = 1 OR name LIKE 'x%'");
    assert!(plan.pushdown().is_none());
    assert!(plan.residual().is_some());
}

#[test]
fn test_split_is_equivalent_to_direct_evaluation() {
    let filters = [
        "name LIKE '%x%'",
        "a > 1 AND name LIKE '%x%'",
        "NOT (a < 5)",
        "NOT (a < 5 AND b IN (1, 3))",
        "a NOT IN (1, 7) OR b IS NULL",
        "NOT (a = 1 OR name LIKE 'a%')",
        "a = b AND b >= 3",
        "a = NULL OR NOT b != NULL",
        "(a = 1 OR b = 3) AND (a = 7 OR b = 1) AND name IS NOT NULL",
    ];
    let rows = sample_rows();

    for input in filters {
        let filter = parse(input).unwrap();
        let direct = MemoryCompiler::new().compile(&filter).unwrap();
        for max_terms in [1, 2, DEFAULT_MAX_DNF_TERMS] {
            let plan = ColumnarCompiler::new()
                .with_max_dnf_terms(max_terms)
                .compile(&filter)
                .unwrap();
            for r in &rows {
                assert_eq!(
                    plan.matches(r),
                    direct.matches(r),
                    "{input} (max {max_terms} terms) on {r:?}"
                );
            }
        }
    }
}

#[test]
fn test_apply_residual_after_scan() {
    let plan = plan("a >= 3 AND name LIKE '%x%'");
    let scanned: Vec<_> = sample_rows()
        .into_iter()
        .filter(|r| plan.pushdown().unwrap().matches(r))
        .collect();

    let kept = plan.apply_residual(scanned);
    assert!(!kept.is_empty());
    assert!(kept.iter().all(|r| plan.matches(r)));
    assert_eq!(
        kept.len(),
        sample_rows().iter().filter(|r| plan.matches(*r)).count()
    );
}

#[test]
fn test_reject_strategy_names_the_construct() {
    let compiler = ColumnarCompiler::new().with_strategy(PushdownStrategy::Reject);

    let err = compiler
        .compile(&parse("a = 1 AND x < y").unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedPredicate {
            backend: BackendKind::ColumnarPushdown,
            construct: "column-to-column comparison".into(),
        }
    );

    assert!(compiler.compile(&parse("a = 1 AND b IN (1, 2)").unwrap()).is_ok());
}

#[test]
#[traced_test]
fn test_clauses_beyond_term_cap_become_residual() {
    let plan = ColumnarCompiler::new()
        .with_max_dnf_terms(2)
        .compile(&parse("(a = 1 OR b = 2) AND (a = 3 OR b = 4)").unwrap())
        .unwrap();

    assert_eq!(
        plan.pushdown().unwrap().to_string(),
        "[[('a', '=', 1)], [('b', '=', 2)]]"
    );
    assert!(plan.residual().is_some());
    assert!(logs_contain("Pushdown filter too large"));
}

#[test]
fn test_schema_is_checked_before_pushdown() {
    let options = CompileOptions::default()
        .with_schema(Schema::new().with_column("a", model::DataType::Integer));
    let compiler = ColumnarCompiler::from_options(&options);

    assert!(matches!(
        compiler.compile(&parse("a = 'one'").unwrap()),
        Err(CompileError::TypeMismatch { .. })
    ));
}
