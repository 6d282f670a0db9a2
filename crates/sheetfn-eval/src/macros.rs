/// Implements `Function::caps` from a list of `FnCaps` flag names.
///
/// ```ignore
/// impl Function for SumFn {
///     func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! func_caps {
    ( $($cap:ident),+ $(,)? ) => {
        fn caps(&self) -> $crate::function::FnCaps {
            $crate::function::FnCaps::empty() $( | $crate::function::FnCaps::$cap )+
        }
    };
}

#[macro_export]
macro_rules! register_functions {
    ( $($fn:path),+ $(,)? ) => {{
        use std::sync::Arc;
        $(
            $crate::function_registry::register_function(Arc::new($fn));
        )+
    }};
}
