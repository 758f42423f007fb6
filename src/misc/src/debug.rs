/// Verbose tracing switch, read from `debug.displayd.<key>` in debug builds only.
#[macro_export]
macro_rules! debug_on {
    ($key: expr) => {{
        #[cfg(debug_assertions)]
        {
            $crate::props::prop_on(concat!("debug.displayd.", $key))
        }
        #[cfg(not(debug_assertions))]
        {
            false
        }
    }};
}
