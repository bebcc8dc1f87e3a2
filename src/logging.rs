//! Browser console logging.
//!
//! On `wasm32` the macros forward to `web_sys::console`. Everywhere else they
//! only type-check their arguments, so native tests never call into JS.

#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::debug_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format!($($arg)*);
    }};
}

#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format!($($arg)*);
    }};
}

#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::error_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format!($($arg)*);
    }};
}
