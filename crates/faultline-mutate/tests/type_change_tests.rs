//! Type-change strategy tests - swapping one annotation per pass

use faultline_mutate::{
    CodeProperty, CodeUnit, ProceduralModifier, ScriptedRandom, StrategyConfig,
    TypeChangeModifier,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn unit(src: &str) -> CodeUnit {
    CodeUnit::new(src)
        .with_property(CodeProperty::IsFunction)
        .with_complexity(5)
}

fn seeded(likelihood: f64, seed: u64) -> TypeChangeModifier {
    TypeChangeModifier::new(
        StrategyConfig::default()
            .with_likelihood(likelihood)
            .with_seed(seed),
    )
}

fn scripted(
    likelihood: f64,
    flips: &[f64],
    picks: &[usize],
    coins: &[bool],
) -> TypeChangeModifier {
    let script = ScriptedRandom::new()
        .with_flips(flips.iter().copied())
        .with_picks(picks.iter().copied())
        .with_coins(coins.iter().copied());
    TypeChangeModifier::with_source(likelihood, Box::new(script))
}

// === Full-Likelihood Behavior ===
//
// At likelihood 1.0 the first annotation site always wins; which candidate
// replaces it depends on the seed, so these cases accept any table entry.

#[rstest]
#[case::param_int(
    "def foo(x: int) -> int:\n    return x + 1\n",
    &[
        "def foo(x: str) -> int:\n    return x + 1\n",
        "def foo(x: float) -> int:\n    return x + 1\n",
        "def foo(x: bool) -> int:\n    return x + 1\n",
    ]
)]
#[case::return_str(
    "def bar(x) -> str:\n    return str(x)\n",
    &[
        "def bar(x) -> int:\n    return str(x)\n",
        "def bar(x) -> bytes:\n    return str(x)\n",
        "def bar(x) -> list:\n    return str(x)\n",
    ]
)]
#[case::list_inner(
    "def baz(items: List[int]) -> None:\n    pass\n",
    &[
        "def baz(items: List[str]) -> None:\n    pass\n",
        "def baz(items: List[float]) -> None:\n    pass\n",
        "def baz(items: List[bool]) -> None:\n    pass\n",
    ]
)]
#[case::optional_unwrap(
    "def qux(value: Optional[str]) -> None:\n    pass\n",
    &["def qux(value: str) -> None:\n    pass\n"]
)]
#[case::dict_either_side(
    "def process(data: Dict[str, int]) -> None:\n    pass\n",
    &[
        "def process(data: Dict[int, int]) -> None:\n    pass\n",
        "def process(data: Dict[bytes, int]) -> None:\n    pass\n",
        "def process(data: Dict[list, int]) -> None:\n    pass\n",
        "def process(data: Dict[str, str]) -> None:\n    pass\n",
        "def process(data: Dict[str, float]) -> None:\n    pass\n",
        "def process(data: Dict[str, bool]) -> None:\n    pass\n",
    ]
)]
#[case::var_annotation(
    "def foo():\n    x: int = 5\n    return x\n",
    &[
        "def foo():\n    x: str = 5\n    return x\n",
        "def foo():\n    x: float = 5\n    return x\n",
        "def foo():\n    x: bool = 5\n    return x\n",
    ]
)]
fn test_first_site_swapped_to_a_table_entry(#[case] src: &str, #[case] variants: &[&str]) {
    let bug = seeded(1.0, 42).modify(&unit(src)).unwrap();
    assert!(
        variants.contains(&bug.rewrite.as_str()),
        "got {:?}, expected one of {:?}",
        bug.rewrite,
        variants
    );
}

#[test]
fn test_unannotated_function_is_a_no_op() {
    let src = "def foo(x):\n    return x + 1\n";
    assert!(seeded(1.0, 42).modify(&unit(src)).is_none());
}

#[test]
fn test_zero_likelihood_never_mutates() {
    let src = "def foo(x: int, y: int, z: int) -> int:\n    return x + y + z\n";
    assert!(seeded(0.0, 42).modify(&unit(src)).is_none());
}

#[test]
fn test_nested_generic_produces_a_change() {
    let src = "def foo(items: List[Dict[str, int]]) -> Optional[str]:\n    return None\n";
    let bug = seeded(1.0, 42).modify(&unit(src)).unwrap();
    assert_ne!(bug.rewrite, src);
    assert!(bug.rewrite.starts_with("def foo(items: List[Dict["));
}

// === Inline Suites ===

#[test]
fn test_inline_body_swap_keeps_the_rest_of_the_line() {
    let src = "def foo(x: int) -> int: return x + 1";
    let bug = seeded(1.0, 42).modify(&unit(src)).unwrap();
    let variants = [
        "def foo(x: str) -> int: return x + 1",
        "def foo(x: float) -> int: return x + 1",
        "def foo(x: bool) -> int: return x + 1",
    ];
    assert!(
        variants.contains(&bug.rewrite.as_str()),
        "got {:?}",
        bug.rewrite
    );
}

#[test]
fn test_inline_optional_unwrap_is_exact() {
    let src = "def qux(value: Optional[str]) -> None: pass";
    let bug = seeded(1.0, 42).modify(&unit(src)).unwrap();
    assert_eq!(bug.rewrite, "def qux(value: str) -> None: pass");
}

// === Scripted Site Selection ===

#[test]
fn test_flips_steer_which_site_is_hit() {
    let src = "def f(a: int, b: str) -> bool:\n    pass\n";
    // Three sites: miss a, hit b, then the return draw still happens.
    let bug = scripted(0.5, &[0.9, 0.1, 0.9], &[0], &[])
        .modify(&unit(src))
        .unwrap();
    assert_eq!(bug.rewrite, "def f(a: int, b: int) -> bool:\n    pass\n");
}

#[test]
fn test_unswappable_site_defers_to_later_site() {
    let src = "def g(a: Spam, b: int) -> None:\n    pass\n";
    // All three sites fire; the first two shapes have no candidates.
    let bug = scripted(1.0, &[0.0, 0.0, 0.0], &[1], &[])
        .modify(&unit(src))
        .unwrap();
    assert_eq!(bug.rewrite, "def g(a: Spam, b: float) -> None:\n    pass\n");
}

#[test]
fn test_dict_coin_side_no_fallback() {
    let src = "def f(d: Dict[User, int]):\n    pass\n";
    // Key side chosen: User has no candidates and the value side is not
    // consulted, so the whole pass lands nowhere.
    assert!(scripted(1.0, &[0.0], &[], &[true])
        .modify(&unit(src))
        .is_none());

    let bug = scripted(1.0, &[0.0], &[0], &[false])
        .modify(&unit(src))
        .unwrap();
    assert_eq!(bug.rewrite, "def f(d: Dict[User, str]):\n    pass\n");
}

#[test]
fn test_qualified_name_collapses_to_bare_swap() {
    let src = "def f(x: builtins.int):\n    pass\n";
    let bug = scripted(1.0, &[0.0], &[0], &[]).modify(&unit(src)).unwrap();
    assert_eq!(bug.rewrite, "def f(x: str):\n    pass\n");
}

// === Caller Flow ===

#[test]
fn test_modify_produces_a_labeled_record() {
    let src = "def add(x: int, y: int) -> int:\n    return x + y\n";
    let mut modifier = seeded(1.0, 42);
    let candidate = unit(src);
    assert!(modifier.can_modify(&candidate));

    let bug = modifier.modify(&candidate).unwrap();
    assert_ne!(bug.rewrite, src);
    assert_eq!(
        bug.explanation,
        "The type annotations in the code are likely incorrect."
    );
    assert_eq!(bug.strategy, "func_pm_type_change");
}

#[test]
fn test_eligibility_gates_on_tags_and_complexity() {
    let modifier = seeded(1.0, 42);
    let src = "def f(x: int):\n    pass\n";

    assert!(modifier.can_modify(&unit(src)));
    assert!(!modifier.can_modify(
        &CodeUnit::new(src)
            .with_property(CodeProperty::IsFunction)
            .with_complexity(2)
    ));
    assert!(!modifier.can_modify(&CodeUnit::new(src).with_complexity(5)));
}

#[test]
fn test_unparseable_source_is_a_no_op() {
    let src = "def broken(:\n";
    assert!(seeded(1.0, 42).modify(&unit(src)).is_none());
}

#[test]
fn test_same_seed_reproduces_the_same_bug() {
    let src = "def f(a: int, b: str, c: float) -> bool:\n    return True\n";
    let config = StrategyConfig::default().with_likelihood(0.7).with_seed(99);
    let first = TypeChangeModifier::new(config).modify(&unit(src));
    let second = TypeChangeModifier::new(config).modify(&unit(src));
    assert_eq!(first, second);
}
