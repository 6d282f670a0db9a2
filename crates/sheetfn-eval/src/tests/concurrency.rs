//! Compiled criteria and the registry are shared across worker threads.

use crate::config::EvalContext;
use crate::criteria::{CriteriaPredicate, MatchPredicate};
use crate::function_registry::evaluate_named;
use crate::test_utils::{column, num, text};
use rayon::prelude::*;
use sheetfn_common::ValueEval;

#[test]
fn one_predicate_many_threads() {
    let pred = CriteriaPredicate::compile(&text("b*"), &EvalContext::default()).unwrap();
    let words: Vec<ValueEval> = (0..2_000)
        .map(|i| if i % 4 == 0 { text("banana") } else { text("apple") })
        .collect();
    let hits = words.par_iter().filter(|w| pred.matches(w)).count();
    assert_eq!(hits, 500);
}

#[test]
fn registry_lookups_race_with_first_load() {
    let results: Vec<ValueEval> = (0..256)
        .into_par_iter()
        .map(|i| {
            let range = column(vec![num(f64::from(i)), num(1.), num(2.)]);
            evaluate_named("countif", &[range, text(">=1")], &EvalContext::new(i as u32, 0))
        })
        .collect();
    for (i, v) in results.iter().enumerate() {
        let expected = if i == 0 { 2. } else { 3. };
        assert_eq!(v, &num(expected), "row {i}");
    }
}
