//! Behaviour-driven development (BDD) step definitions for rewriter scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{RewriteResult, Rewriter, SyntaxError};

// =============================================================================
// Test World
// =============================================================================

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    /// Source text to rewrite.
    source: Option<String>,
    /// Outcome of the rewrite.
    outcome: Option<Result<RewriteResult, SyntaxError>>,
}

impl TestWorld {
    fn result(&self) -> &RewriteResult {
        match self.outcome.as_ref().expect("rewrite should have run") {
            Ok(result) => result,
            Err(err) => panic!("rewrite failed: {err}"),
        }
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

/// Strips surrounding double quotes and expands `\n` escapes.
fn unquote(s: &str) -> String {
    s.trim_matches('"').replace("\\n", "\n")
}

// =============================================================================
// Steps
// =============================================================================

#[given("the Ruby source {source}")]
fn given_source(world: &RefCell<TestWorld>, source: String) {
    world.borrow_mut().source = Some(unquote(&source));
}

#[when("the source is rewritten")]
fn when_rewritten(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let source = w.source.clone().expect("source should be set");
    w.outcome = Some(Rewriter::new().and_then(|mut rewriter| rewriter.rewrite(&source)));
}

#[then("the output is {expected}")]
fn then_output_is(world: &RefCell<TestWorld>, expected: String) {
    let w = world.borrow();
    assert_eq!(w.result().output(), unquote(&expected));
}

#[then("{count} construct was converted")]
fn then_conversions(world: &RefCell<TestWorld>, count: usize) {
    let w = world.borrow();
    assert_eq!(w.result().conversions(), count);
}

#[then("the rewrite made no changes")]
fn then_unchanged(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let result = w.result();
    assert!(!result.has_changes(), "expected no changes");
    assert_eq!(Some(result.output()), w.source.as_deref());
}

#[then("the rewrite fails to parse")]
fn then_parse_failure(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let outcome = w.outcome.as_ref().expect("rewrite should have run");
    assert!(
        matches!(outcome, Err(SyntaxError::ParseFailure { .. })),
        "expected a parse failure, got {outcome:?}"
    );
}

// =============================================================================
// Scenario Bindings
// =============================================================================

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Stub with a method name becomes allow receive"
)]
fn stub_method_name(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Stub with a return value becomes a block"
)]
fn stub_return_value(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Multi-line stub keeps its layout"
)]
fn multiline_stub(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Expectation keeps its argument matcher"
)]
fn expectation_with_matcher(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Never negates the expectation"
)]
fn never_negates(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Returned stub becomes a double"
)]
fn returned_stub(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Bare stub literal becomes a double"
)]
fn bare_stub(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Sequential returns are left alone"
)]
fn sequential_returns(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Unrelated code passes through unchanged"
)]
fn unrelated_code(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rewriter.feature",
    name = "Invalid source is rejected"
)]
fn invalid_source(world: RefCell<TestWorld>) {
    drop(world);
}
