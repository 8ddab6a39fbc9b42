//! Utility macros for the middle end.
//!
//! - `MK_ERROR!` - Builds an `Err(Error)` anchored at the start of a span
//!
//! Both passes report errors at many sites; the macro keeps those short.

/// Creates an `Err` holding an [`Error`](crate::errors::errors::Error).
///
/// # Arguments
///
/// * `$kind` - The ErrorImpl variant
/// * `$span` - The span of the offending node (its start is reported)
///
/// # Example
///
/// ```ignore
/// return MK_ERROR!(ErrorImpl::UnreachableCode, stmt.get_span());
/// ```
#[macro_export]
macro_rules! MK_ERROR {
    ($kind:expr, $span:expr) => {
        Err($crate::errors::errors::Error::new(
            $kind,
            $span.start.clone(),
        ))
    };
}
