//! Minimal path expressions over a JSON document.
//!
//! Grammar: segments separated by `.`, each a key optionally followed by
//! `[n]` indices, e.g. `category.name`, `photoUrls[0]`, `[0].id`,
//! `items[-1]`. Negative indices count from the end. An empty expression
//! (or `$`) selects the root.

use serde_json::Value;

#[derive(Debug, PartialEq, Eq)]
enum Step<'a> {
    Key(&'a str),
    Index(i64),
}

/// Resolve `expr` against `root`. Returns `None` for missing keys,
/// out-of-range indices, type mismatches, malformed expressions and JSON
/// `null`.
pub fn resolve<'v>(root: &'v Value, expr: &str) -> Option<&'v Value> {
    let steps = parse(expr)?;
    let mut current = root;
    for step in steps {
        current = match step {
            Step::Key(key) => current.as_object()?.get(key)?,
            Step::Index(index) => {
                let items = current.as_array()?;
                let position = if index < 0 {
                    items.len().checked_sub(index.unsigned_abs() as usize)?
                } else {
                    index as usize
                };
                items.get(position)?
            }
        };
    }
    (!current.is_null()).then_some(current)
}

fn parse(expr: &str) -> Option<Vec<Step<'_>>> {
    let expr = expr.trim();
    let expr = expr.strip_prefix('$').unwrap_or(expr);
    let expr = expr.strip_prefix('.').unwrap_or(expr);
    let mut steps = Vec::new();
    if expr.is_empty() {
        return Some(steps);
    }

    for segment in expr.split('.') {
        let (key, mut rest) = match segment.find('[') {
            Some(open) => segment.split_at(open),
            None => (segment, ""),
        };
        if !key.is_empty() {
            steps.push(Step::Key(key));
        } else if rest.is_empty() {
            return None;
        }
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let close = inner.find(']')?;
            steps.push(Step::Index(inner[..close].trim().parse().ok()?));
            rest = &inner[close + 1..];
        }
    }
    Some(steps)
}
