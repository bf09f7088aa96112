use thiserror::Error;

/// Reasons a metric name could not be derived from a captured value.
///
/// None of these ever reach the caller of a capture entry point. They are
/// carried inside a [`Resolution`](crate::naming::Resolution) and turned into a
/// fallback suffix plus, for most variants, a warning on the log sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("no accessor `{method}` on {type_name}")]
    MethodNotFound {
        method: String,
        type_name: &'static str,
    },
    #[error("{type_name} reported an error while formatting")]
    Unprintable { type_name: &'static str },
    #[error("accessor `{method}` failed: {reason}")]
    Accessor { method: String, reason: String },
    #[error("no helper registered as `{0}`")]
    HelperNotFound(String),
    #[error("helper `{helper}` could not be constructed: {reason}")]
    HelperInstantiation { helper: String, reason: String },
    #[error("`{helper}` resolves to {type_name}, which is not a name helper")]
    NotAHelper {
        helper: String,
        type_name: &'static str,
    },
    #[error("{0}")]
    Naming(String),
    #[error("panicked: {0}")]
    Panicked(String),
}

impl CaptureError {
    /// Failure raised from inside an accessor or a helper's naming logic.
    pub fn naming(reason: impl std::fmt::Display) -> Self {
        Self::Naming(reason.to_string())
    }

    /// A registered entry that does not implement the helper capability is a
    /// configuration error; it shows up in the metric name only.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NotAHelper { .. })
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_owned()
        };
        Self::Panicked(reason)
    }
}
