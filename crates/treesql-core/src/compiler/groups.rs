//! Keyword-delimited operand groups.
//!
//! Composite operators receive a flat operand list such as
//! `a b :from users :where (= id 5)`. A group specification names the
//! markers in the order they may appear and the arity of each group; the
//! parser partitions the list accordingly.
//!
//! The scan only looks for markers that come *later* in the specification,
//! so a marker appearing out of order is ordinary data. The flip side is
//! that a group's content must not itself start with a later group's marker.

use crate::ast::Expr;
use crate::error::{CompileError, Result};

/// One entry of a group specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// Marker name, without the colon.
    pub marker: &'static str,
    /// The marker may be absent.
    pub optional: bool,
    /// The group accepts more than one operand.
    pub repeatable: bool,
    /// The group accepts no operand at all (a flag).
    pub zero_arity: bool,
}

impl Group {
    /// A required group holding exactly one operand.
    #[must_use]
    pub const fn required(marker: &'static str) -> Self {
        Self {
            marker,
            optional: false,
            repeatable: false,
            zero_arity: false,
        }
    }

    /// An optional group holding exactly one operand.
    #[must_use]
    pub const fn optional(marker: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::required(marker)
        }
    }

    /// An optional marker with no operands.
    #[must_use]
    pub const fn flag(marker: &'static str) -> Self {
        Self {
            zero_arity: true,
            ..Self::optional(marker)
        }
    }

    /// Allows one or more operands.
    #[must_use]
    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    fn check_arity(&self, operator: &str, content: &[Expr]) -> Result<()> {
        let expected = if self.zero_arity {
            (!content.is_empty()).then_some("no")
        } else if content.is_empty() {
            Some("at least 1")
        } else if !self.repeatable && content.len() > 1 {
            Some("exactly 1")
        } else {
            None
        };
        match expected {
            Some(expected) => Err(CompileError::arity(
                format!("{operator} :{}", self.marker),
                expected,
                content.len(),
            )),
            None => Ok(()),
        }
    }
}

/// The groups bound by a successful parse, in specification order.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<'a> {
    bound: Vec<(&'static str, &'a [Expr])>,
}

impl<'a> Groups<'a> {
    /// Returns the operands of a group, if its marker was present.
    #[must_use]
    pub fn get(&self, marker: &str) -> Option<&'a [Expr]> {
        self.bound
            .iter()
            .find(|(m, _)| *m == marker)
            .map(|(_, content)| *content)
    }

    /// Returns true if the marker was present.
    #[must_use]
    pub fn has(&self, marker: &str) -> bool {
        self.get(marker).is_some()
    }

    /// Returns the single operand of a non-repeatable group.
    #[must_use]
    pub fn single(&self, marker: &str) -> Option<&'a Expr> {
        self.get(marker).and_then(<[Expr]>::first)
    }

    /// Iterates over the bound groups in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'a [Expr])> + '_ {
        self.bound.iter().copied()
    }
}

/// Splits an operand list that starts with a marker.
pub fn split_groups<'a>(operator: &str, spec: &[Group], operands: &'a [Expr]) -> Result<Groups<'a>> {
    if let Some(first) = operands.first() {
        let known = first
            .as_keyword()
            .is_some_and(|k| spec.iter().any(|g| g.marker == k));
        if !known {
            return Err(CompileError::group(
                operator,
                format!("expected a clause marker, found {first}"),
            ));
        }
    }
    split(operator, spec, operands, false)
}

/// Splits an operand list whose first group has no marker of its own.
///
/// The operands are read as if preceded by the first marker of `spec`, which
/// is how `select` takes its projected columns.
pub fn split_groups_after<'a>(
    operator: &str,
    spec: &[Group],
    operands: &'a [Expr],
) -> Result<Groups<'a>> {
    split(operator, spec, operands, true)
}

fn split<'a>(
    operator: &str,
    spec: &[Group],
    operands: &'a [Expr],
    implicit_first: bool,
) -> Result<Groups<'a>> {
    let mut bound = Vec::new();
    let mut pos = 0;
    for (i, group) in spec.iter().enumerate() {
        let implicit = implicit_first && i == 0;
        let present = implicit || operands.get(pos).is_some_and(|e| e.is_keyword(group.marker));
        if !present {
            if group.optional {
                continue;
            }
            return Err(CompileError::group(
                operator,
                format!("missing required :{}", group.marker),
            ));
        }
        let start = if implicit { pos } else { pos + 1 };
        let later = &spec[i + 1..];
        let end = operands[start..]
            .iter()
            .position(|e| {
                e.as_keyword()
                    .is_some_and(|k| later.iter().any(|g| g.marker == k))
            })
            .map_or(operands.len(), |offset| start + offset);
        let content = &operands[start..end];
        group.check_arity(operator, content)?;
        bound.push((group.marker, content));
        pos = end;
    }
    if let Some(extra) = operands.get(pos) {
        return Err(CompileError::group(
            operator,
            format!("{extra} is not valid here"),
        ));
    }
    Ok(Groups { bound })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ident, kw, lit, op};

    const SPEC: &[Group] = &[
        Group::required("on"),
        Group::optional("using"),
        Group::required("fields").repeatable(),
        Group::flag("concurrently"),
        Group::optional("where"),
    ];

    fn flatten(groups: &Groups<'_>) -> Vec<Expr> {
        groups
            .iter()
            .flat_map(|(marker, content)| std::iter::once(kw(marker)).chain(content.iter().cloned()))
            .collect()
    }

    #[test]
    fn test_splits_in_order() {
        let operands = vec![
            kw("on"),
            ident("users"),
            kw("fields"),
            ident("a"),
            ident("b"),
            kw("where"),
            op("=", [ident("a"), lit(1_i32)]),
        ];
        let groups = split_groups("create-index", SPEC, &operands).unwrap();
        assert_eq!(groups.single("on"), Some(&ident("users")));
        assert_eq!(groups.get("fields").map(<[Expr]>::len), Some(2));
        assert!(!groups.has("using"));
        assert!(!groups.has("concurrently"));
        assert!(groups.has("where"));
    }

    #[test]
    fn test_reparsing_a_partition_is_stable() {
        let operands = vec![
            kw("on"),
            ident("t"),
            kw("using"),
            ident("gin"),
            kw("fields"),
            ident("a"),
            kw("concurrently"),
        ];
        let groups = split_groups("create-index", SPEC, &operands).unwrap();
        let flat = flatten(&groups);
        assert_eq!(flat, operands);
        let again = split_groups("create-index", SPEC, &flat).unwrap();
        assert_eq!(flatten(&again), flat);
    }

    #[test]
    fn test_out_of_order_marker_is_data() {
        // :on is earlier in the specification than :fields, so here it is
        // just an operand of the :fields group.
        let operands = vec![kw("on"), ident("t"), kw("fields"), ident("a"), kw("on")];
        let groups = split_groups("create-index", SPEC, &operands).unwrap();
        assert_eq!(groups.get("fields"), Some(&[ident("a"), kw("on")][..]));
    }

    #[test]
    fn test_missing_required_marker() {
        let operands = vec![kw("on"), ident("t")];
        let err = split_groups("create-index", SPEC, &operands).unwrap_err();
        assert_eq!(
            err,
            CompileError::group("create-index", "missing required :fields")
        );
    }

    #[test]
    fn test_list_not_starting_with_a_marker() {
        let operands = vec![ident("t"), kw("fields"), ident("a")];
        let err = split_groups("create-index", SPEC, &operands).unwrap_err();
        assert!(matches!(err, CompileError::GroupParse { .. }));
    }

    #[test]
    fn test_marker_after_last_group_is_content() {
        let operands = vec![
            kw("on"),
            ident("t"),
            kw("fields"),
            ident("a"),
            kw("where"),
            ident("x"),
            kw("using"),
            ident("gin"),
        ];
        // :using after :where belongs to the :where group, which then holds
        // three operands.
        let err = split_groups("create-index", SPEC, &operands).unwrap_err();
        assert_eq!(err, CompileError::arity("create-index :where", "exactly 1", 3));
    }

    #[test]
    fn test_arity_violations() {
        let flag_with_operand = vec![
            kw("on"),
            ident("t"),
            kw("fields"),
            ident("a"),
            kw("concurrently"),
            lit(true),
        ];
        assert_eq!(
            split_groups("create-index", SPEC, &flag_with_operand).unwrap_err(),
            CompileError::arity("create-index :concurrently", "no", 1)
        );

        let empty_group = vec![kw("on"), kw("fields"), ident("a")];
        assert_eq!(
            split_groups("create-index", SPEC, &empty_group).unwrap_err(),
            CompileError::arity("create-index :on", "at least 1", 0)
        );

        let too_many = vec![kw("on"), ident("a"), ident("b"), kw("fields"), ident("a")];
        assert_eq!(
            split_groups("create-index", SPEC, &too_many).unwrap_err(),
            CompileError::arity("create-index :on", "exactly 1", 2)
        );
    }

    #[test]
    fn test_implicit_leading_group() {
        const SELECT: &[Group] = &[
            Group::required("columns").repeatable(),
            Group::optional("from").repeatable(),
        ];
        let operands = vec![ident("a"), ident("b"), kw("from"), ident("users")];
        let groups = split_groups_after("select", SELECT, &operands).unwrap();
        assert_eq!(groups.get("columns").map(<[Expr]>::len), Some(2));
        assert_eq!(groups.single("from"), Some(&ident("users")));

        let err = split_groups_after("select", SELECT, &[]).unwrap_err();
        assert_eq!(err, CompileError::arity("select :columns", "at least 1", 0));
    }
}
