use core::fmt::{self, Write};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

/// Leveled sink for the capture entry points' own diagnostics.
pub trait LogSink: Send + Sync {
    fn debug(&self, args: fmt::Arguments<'_>);
    fn warn(&self, args: fmt::Arguments<'_>);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args)
    }
}

/// Default sink, forwarding to `tracing` under the `metric_capture` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "metric_capture", "{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(target: "metric_capture", "{}", args);
    }
}

/// `Debug` view of a captured value that renders an absent value as `null`.
///
/// Never reports a formatting error to the sink; a value whose `Debug` impl
/// fails or panics is rendered as `<unprintable>`.
pub(crate) struct Raw<'a, T: ?Sized>(pub(crate) Option<&'a T>);

impl<T: fmt::Debug + ?Sized> fmt::Debug for Raw<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = self.0 else {
            return f.write_str("null");
        };
        let rendered = catch_unwind(AssertUnwindSafe(|| {
            let mut out = String::new();
            write!(out, "{value:?}").map(|()| out)
        }));
        match rendered {
            Ok(Ok(out)) => f.write_str(&out),
            _ => f.write_str("<unprintable>"),
        }
    }
}
