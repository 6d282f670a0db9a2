pub mod counting;
pub mod datetime;
pub mod info;
pub mod math;
pub mod reference;
pub mod stats;
pub mod text;
mod utils;

use std::sync::Once;

static LOADED: Once = Once::new();

pub fn load_builtins() {
    LOADED.call_once(|| {
        math::register_builtins();
        stats::register_builtins();
        counting::register_builtins();
        reference::register_builtins();
        info::register_builtins();
        text::register_builtins();
        datetime::register_builtins();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            count = crate::function_registry::registered_names().len(),
            "registered built-in functions"
        );
    });
}
