//! Failure isolation for externally supplied callbacks.
//!
//! Controllers are host code. Whatever they do (return an error or panic)
//! must not leave the view half-updated, so every call into a controller goes
//! through [`guarded`], which logs the failure under a label and turns it
//! into `None`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::logging::targets;

/// Error type returned by controller callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by controller callbacks.
pub type CallbackResult<T> = Result<T, CallbackError>;

/// Runs `f`, returning its value or `None` if it failed.
///
/// Both `Err` returns and panics are caught and logged at `error` level with
/// the given `label`.
///
/// ```
/// use mirror_view_core::guard::guarded;
///
/// assert_eq!(guarded("double", || Ok(21 * 2)), Some(42));
/// assert_eq!(guarded::<i32>("broken", || Err("nope".into())), None);
/// ```
pub fn guarded<T>(label: &str, f: impl FnOnce() -> CallbackResult<T>) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            tracing::error!(target: targets::CALLBACK, label, error = %err, "callback failed");
            None
        }
        Err(payload) => {
            tracing::error!(
                target: targets::CALLBACK,
                label,
                panic = panic_message(payload.as_ref()),
                "callback panicked"
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_passes_value_through() {
        assert_eq!(guarded("ok", || Ok("value")), Some("value"));
    }

    #[test]
    fn test_guarded_swallows_error() {
        let result: Option<()> = guarded("err", || Err("controller exploded".into()));
        assert!(result.is_none());
    }

    #[test]
    fn test_guarded_swallows_panic() {
        let result: Option<u8> = guarded("panic", || panic!("boom"));
        assert!(result.is_none());
    }

    #[test]
    fn test_panic_message_formats() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(17_u32);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
