//! Coherence assertion grammar (§4.7, §9 "Replacing runtime subprocess
//! evaluation"): `result OP (baseline|literal)`, `OP ∈ {==, !=, <, <=, >,
//! >=}`, compounded with `AND` / `OR`. Deliberately not a general
//! expression evaluator — the same split-then-match shape as the teacher's
//! policy-condition DSL, generalized from `&&`/`||` to `AND`/`OR` tokens and
//! from a `{action, context}` environment to `{result, baseline}`.

use crate::error::CoherenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy)]
pub enum Rhs {
    Baseline,
    Literal(f64),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Cmp(Op, Rhs),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Parse one assertion string. Only `AND`-joined or only `OR`-joined
/// compounds are supported at the top level, matching the teacher's
/// single-connective split (no operator-precedence mixing).
pub fn parse(assertion: &str) -> Result<Expr, CoherenceError> {
    let and_parts: Vec<&str> = assertion.split(" AND ").collect();
    if and_parts.len() > 1 {
        return fold(and_parts, assertion, Expr::And);
    }
    let or_parts: Vec<&str> = assertion.split(" OR ").collect();
    if or_parts.len() > 1 {
        return fold(or_parts, assertion, Expr::Or);
    }
    parse_comparison(assertion.trim(), assertion)
}

fn fold(
    parts: Vec<&str>,
    original: &str,
    combine: fn(Box<Expr>, Box<Expr>) -> Expr,
) -> Result<Expr, CoherenceError> {
    let mut exprs = parts
        .into_iter()
        .map(|p| parse_comparison(p.trim(), original))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let first = exprs.next().expect("split always yields at least one part");
    Ok(exprs.fold(first, |acc, next| combine(Box::new(acc), Box::new(next))))
}

fn parse_comparison(expr: &str, original: &str) -> Result<Expr, CoherenceError> {
    const OPERATORS: [(&str, Op); 6] = [
        ("==", Op::Eq),
        ("!=", Op::Ne),
        (">=", Op::Ge),
        ("<=", Op::Le),
        (">", Op::Gt),
        ("<", Op::Lt),
    ];

    for (token, op) in OPERATORS {
        if let Some(idx) = expr.find(token) {
            let left = expr[..idx].trim();
            let right = expr[idx + token.len()..].trim();
            if left != "result" {
                return Err(CoherenceError::InvalidAssertion(
                    original.to_string(),
                    format!("left-hand side must be `result`, got {left:?}"),
                ));
            }
            let rhs = parse_rhs(right, original)?;
            return Ok(Expr::Cmp(op, rhs));
        }
    }
    Err(CoherenceError::InvalidAssertion(
        original.to_string(),
        format!("no comparison operator found in {expr:?}"),
    ))
}

fn parse_rhs(token: &str, original: &str) -> Result<Rhs, CoherenceError> {
    if token == "baseline" {
        return Ok(Rhs::Baseline);
    }
    token.parse::<f64>().map(Rhs::Literal).map_err(|_| {
        CoherenceError::InvalidAssertion(
            original.to_string(),
            format!("expected `baseline` or a numeric literal, got {token:?}"),
        )
    })
}

/// Evaluate a parsed assertion. A `baseline` comparison with no stored
/// baseline is permissive: the comparison passes (§4.7 "first-run
/// permissive").
pub fn evaluate(expr: &Expr, result: f64, baseline: Option<f64>) -> bool {
    match expr {
        Expr::Cmp(op, rhs) => {
            let rhs_value = match rhs {
                Rhs::Baseline => match baseline {
                    Some(v) => v,
                    None => return true,
                },
                Rhs::Literal(v) => *v,
            };
            compare(*op, result, rhs_value)
        }
        Expr::And(a, b) => evaluate(a, result, baseline) && evaluate(b, result, baseline),
        Expr::Or(a, b) => evaluate(a, result, baseline) || evaluate(b, result, baseline),
    }
}

fn compare(op: Op, a: f64, b: f64) -> bool {
    match op {
        Op::Eq => a == b,
        Op::Ne => a != b,
        Op::Lt => a < b,
        Op::Le => a <= b,
        Op::Gt => a > b,
        Op::Ge => a >= b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_comparison() {
        let expr = parse("result >= 90").unwrap();
        assert!(evaluate(&expr, 95.0, None));
        assert!(!evaluate(&expr, 80.0, None));
    }

    #[test]
    fn baseline_comparison_permissive_without_stored_baseline() {
        let expr = parse("result < baseline").unwrap();
        assert!(evaluate(&expr, 1000.0, None));
        assert!(!evaluate(&expr, 1000.0, Some(10.0)));
        assert!(evaluate(&expr, 5.0, Some(10.0)));
    }

    #[test]
    fn and_compound_requires_all() {
        let expr = parse("result >= 50 AND result <= 100").unwrap();
        assert!(evaluate(&expr, 75.0, None));
        assert!(!evaluate(&expr, 10.0, None));
    }

    #[test]
    fn or_compound_requires_any() {
        let expr = parse("result == 0 OR result == 1").unwrap();
        assert!(evaluate(&expr, 1.0, None));
        assert!(!evaluate(&expr, 2.0, None));
    }

    #[test]
    fn non_result_left_side_is_rejected() {
        assert!(parse("baseline >= 90").is_err());
    }
}
