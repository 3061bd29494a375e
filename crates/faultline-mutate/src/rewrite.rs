//! Type-expression rewriting rules
//!
//! The rewriter is a pure function from annotation shape to an optional
//! replacement expression; the only state it touches is the decision gate it
//! draws candidate picks from. Replacement nodes are synthesized with dummy
//! spans, while untouched subtrees keep their original spans, so rendering can
//! splice original text verbatim wherever nothing changed.

use crate::modifier::DecisionGate;
use faultline_pycst::{Identifier, Span, TypeExpr};

/// Plausible-but-wrong swaps for builtin type names. Unlisted names have no
/// candidates and cannot be swapped.
pub fn swap_candidates(name: &str) -> &'static [&'static str] {
    match name {
        "int" => &["str", "float", "bool"],
        "str" => &["int", "bytes", "list"],
        "float" => &["int", "str"],
        "bool" => &["int", "str"],
        "bytes" => &["str"],
        "list" => &["dict", "set", "tuple"],
        "dict" => &["list", "set"],
        "set" => &["list", "frozenset"],
        "tuple" => &["list"],
        _ => &[],
    }
}

/// Wrapper names whose single argument is the real type
fn is_wrapper(name: &str) -> bool {
    matches!(name, "Optional" | "Union")
}

/// Container names whose single argument is rewritten in place
fn is_container(name: &str) -> bool {
    matches!(name, "List" | "Set" | "Tuple")
}

/// Rewrite one annotation expression. Returns the replacement, or `None`
/// when no rule applies to this shape.
pub fn rewrite_type_expr(expr: &TypeExpr, gate: &mut DecisionGate) -> Option<TypeExpr> {
    match expr {
        TypeExpr::Name(id) => swap_name(&id.name, gate),
        // A qualified name collapses to a bare swapped name: the module
        // prefix stops being meaningful once the trailing type changes.
        TypeExpr::Attribute { parts, .. } => {
            let last = parts.last()?;
            swap_name(&last.name, gate)
        }
        TypeExpr::Parametric { base, args, .. } => rewrite_parametric(base, args, gate),
        TypeExpr::Opaque(_) => None,
    }
}

fn swap_name(name: &str, gate: &mut DecisionGate) -> Option<TypeExpr> {
    let pick = gate.choose(swap_candidates(name))?;
    Some(TypeExpr::Name(Identifier::new(
        (*pick).to_string(),
        Span::dummy(),
    )))
}

fn rewrite_parametric(
    base: &Identifier,
    args: &[TypeExpr],
    gate: &mut DecisionGate,
) -> Option<TypeExpr> {
    match args {
        [inner] if is_wrapper(&base.name) => Some(inner.clone()),
        [inner] if is_container(&base.name) => {
            let rewritten = rewrite_type_expr(inner, gate)?;
            Some(TypeExpr::Parametric {
                base: base.clone(),
                args: vec![rewritten],
                span: Span::dummy(),
            })
        }
        [_, _] if base.name == "Dict" => {
            // The coin picks a side before the recursion; a failed side does
            // not fall back to the other one.
            let index = if gate.coin() { 0 } else { 1 };
            let rewritten = rewrite_type_expr(&args[index], gate)?;
            let mut new_args = args.to_vec();
            new_args[index] = rewritten;
            Some(TypeExpr::Parametric {
                base: base.clone(),
                args: new_args,
                span: Span::dummy(),
            })
        }
        _ => None,
    }
}

/// Render a rewritten annotation. Subtrees that kept their original spans are
/// sliced verbatim from the source; synthesized nodes print canonically.
pub fn render_type_expr(expr: &TypeExpr, source: &str) -> String {
    match expr {
        TypeExpr::Name(id) => {
            if id.span.is_dummy() {
                id.name.clone()
            } else {
                id.span.slice(source).to_string()
            }
        }
        TypeExpr::Attribute { parts, span } => {
            if span.is_dummy() {
                let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
                names.join(".")
            } else {
                span.slice(source).to_string()
            }
        }
        TypeExpr::Parametric { base, args, span } => {
            if span.is_dummy() {
                let base_text = if base.span.is_dummy() {
                    base.name.clone()
                } else {
                    base.span.slice(source).to_string()
                };
                let arg_texts: Vec<String> =
                    args.iter().map(|a| render_type_expr(a, source)).collect();
                format!("{}[{}]", base_text, arg_texts.join(", "))
            } else {
                span.slice(source).to_string()
            }
        }
        TypeExpr::Opaque(span) => span.slice(source).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use faultline_pycst::parse_module;
    use faultline_pycst::Stmt;

    /// Parse `src`, which must start with an annotated assignment, and return
    /// its annotation expression along with the source.
    fn annotation_of(src: &str) -> TypeExpr {
        let module = parse_module(src).unwrap();
        match &module.body[0] {
            Stmt::AnnAssign(a) => a.annotation.clone(),
            other => panic!("expected ann-assign, got {other:?}"),
        }
    }

    fn gate(picks: &[usize], coins: &[bool]) -> DecisionGate {
        let script = ScriptedRandom::new()
            .with_picks(picks.iter().copied())
            .with_coins(coins.iter().copied());
        DecisionGate::with_source(1.0, Box::new(script))
    }

    fn rewrite(src: &str, picks: &[usize], coins: &[bool]) -> Option<String> {
        let expr = annotation_of(src);
        let mut g = gate(picks, coins);
        rewrite_type_expr(&expr, &mut g).map(|e| render_type_expr(&e, src))
    }

    #[test]
    fn name_swaps_follow_the_table() {
        assert_eq!(rewrite("x: int = 1\n", &[0], &[]).unwrap(), "str");
        assert_eq!(rewrite("x: int = 1\n", &[2], &[]).unwrap(), "bool");
        assert_eq!(rewrite("x: bytes = b''\n", &[0], &[]).unwrap(), "str");
        assert_eq!(rewrite("x: set = s\n", &[1], &[]).unwrap(), "frozenset");
    }

    #[test]
    fn unknown_names_have_no_rewrite() {
        assert!(rewrite("x: User = u\n", &[], &[]).is_none());
        assert!(rewrite("x: None = None\n", &[], &[]).is_none());
    }

    #[test]
    fn qualified_names_collapse_to_bare_swaps() {
        assert_eq!(rewrite("x: builtins.int = 1\n", &[1], &[]).unwrap(), "float");
        assert!(rewrite("x: typing.Any = 1\n", &[], &[]).is_none());
    }

    #[test]
    fn wrappers_unwrap_to_their_inner_text() {
        assert_eq!(rewrite("x: Optional[str] = None\n", &[], &[]).unwrap(), "str");
        assert_eq!(rewrite("x: Union[CustomThing] = c\n", &[], &[]).unwrap(), "CustomThing");
        // Two-argument unions are not a recognized shape.
        assert!(rewrite("x: Union[int, str] = 1\n", &[], &[]).is_none());
    }

    #[test]
    fn wrapper_inner_keeps_exotic_text_verbatim() {
        assert_eq!(
            rewrite("x: Optional['User'] = None\n", &[], &[]).unwrap(),
            "'User'"
        );
    }

    #[test]
    fn containers_rewrite_inner_and_keep_outer() {
        assert_eq!(rewrite("x: List[int] = []\n", &[0], &[]).unwrap(), "List[str]");
        assert_eq!(rewrite("x: Set[str] = s\n", &[1], &[]).unwrap(), "Set[bytes]");
        // Unswappable inner means the whole site has no rewrite.
        assert!(rewrite("x: List[User] = []\n", &[], &[]).is_none());
        // Multi-argument tuples are not single-argument containers.
        assert!(rewrite("x: Tuple[int, str] = t\n", &[], &[]).is_none());
    }

    #[test]
    fn nested_containers_rewrite_at_depth() {
        assert_eq!(
            rewrite("x: List[Optional[int]] = []\n", &[], &[]).unwrap(),
            "List[int]"
        );
        assert_eq!(
            rewrite("x: List[List[bool]] = []\n", &[1], &[]).unwrap(),
            "List[List[str]]"
        );
    }

    #[test]
    fn dict_coin_picks_one_side_with_no_fallback() {
        assert_eq!(
            rewrite("x: Dict[str, int] = {}\n", &[0], &[true]).unwrap(),
            "Dict[int, int]"
        );
        assert_eq!(
            rewrite("x: Dict[str, int] = {}\n", &[0], &[false]).unwrap(),
            "Dict[str, str]"
        );
        // Chosen side unswappable: no fallback to the other side.
        assert!(rewrite("x: Dict[User, int] = {}\n", &[], &[true]).is_none());
        assert_eq!(
            rewrite("x: Dict[User, int] = {}\n", &[0], &[false]).unwrap(),
            "Dict[User, str]"
        );
    }

    #[test]
    fn unparametrized_generics_are_left_alone() {
        assert!(rewrite("x: Optional = o\n", &[], &[]).is_none());
        assert!(rewrite("x: Callable[[int], str] = f\n", &[], &[]).is_none());
    }
}
