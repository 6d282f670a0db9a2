use crate::config::EvalContext;
use crate::function::Function;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use sheetfn_common::{ErrorEval, ValueEval};
use std::sync::Arc;

/// Upper-cased name or alias -> implementation.
static REG: Lazy<DashMap<String, Arc<dyn Function>>> = Lazy::new(DashMap::new);

fn key(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Register a function under its name and every alias. A later
/// registration for the same name replaces the earlier one.
pub fn register_function(f: Arc<dyn Function>) {
    for name in std::iter::once(f.name()).chain(f.aliases().iter().copied()) {
        REG.insert(key(name), Arc::clone(&f));
    }
}

/// Case-insensitive lookup by name or alias.
pub fn get(name: &str) -> Option<Arc<dyn Function>> {
    REG.get(&key(name)).map(|v| Arc::clone(v.value()))
}

/// Canonical names of everything registered, sorted.
pub fn registered_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REG.iter().map(|e| e.value().name()).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Make sure the built-in set is present. Safe to call repeatedly and
/// from several threads.
pub fn load_builtins() {
    crate::builtins::load_builtins();
}

/// Look a function up by name and dispatch it. Unknown names yield `#NAME?`.
pub fn evaluate_named(name: &str, args: &[ValueEval], ctx: &EvalContext) -> ValueEval {
    load_builtins();
    match get(name) {
        Some(f) => f.dispatch(args, ctx),
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!(name, "unknown function");
            ValueEval::Error(ErrorEval::NameInvalid)
        }
    }
}
