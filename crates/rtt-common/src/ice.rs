//! Internal compiler errors.
//!
//! Every failure inside the runtime-type passes is a defect in the compiler
//! itself or in an upstream phase. Nothing here is recoverable: the `ice!`
//! macro records a structured `tracing` event and aborts compilation.

/// Abort compilation with an internal-compiler-error diagnostic.
///
/// ```should_panic
/// use rtt_common::ice;
/// ice!("missing class identity for {}", "Foo");
/// ```
#[macro_export]
macro_rules! ice {
    ($($arg:tt)+) => {{
        let message = ::std::format!($($arg)+);
        $crate::tracing::error!(target: "rtt::ice", %message, "internal compiler error");
        ::std::panic!("internal compiler error: {}", message)
    }};
}
