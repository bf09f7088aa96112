use crate::error::CaptureError;

/// Zero-argument accessors on a value, callable by name.
///
/// Usually implemented with [`accessors!`](crate::accessors) next to the type,
/// which may list private methods as well as public ones.
pub trait Accessors {
    fn call_accessor(&self, method: &str) -> Result<String, CaptureError>;
}

/// Implement [`Accessors`] for a type from a list of its zero-argument methods.
///
/// A method suffixed with `?` returns a `Result`; its `Err` becomes
/// [`CaptureError::Accessor`].
///
/// ```
/// struct Response {
///     status: u16,
///     route: Option<&'static str>,
/// }
///
/// impl Response {
///     fn status(&self) -> u16 {
///         self.status
///     }
///
///     fn route(&self) -> Result<&str, String> {
///         self.route.ok_or_else(|| "unrouted".to_owned())
///     }
/// }
///
/// metric_capture_facade::accessors!(Response { status, route? });
///
/// use metric_capture_facade::Accessors;
/// let response = Response { status: 404, route: None };
/// assert_eq!(response.call_accessor("status").unwrap(), "404");
/// assert!(response.call_accessor("route").is_err());
/// ```
#[macro_export]
macro_rules! accessors {
    (@arms $self:ident, $requested:ident, $method:ident ? $(, $($rest:tt)*)?) => {
        if $requested == ::core::stringify!($method) {
            return match $self.$method() {
                ::core::result::Result::Ok(value) => $crate::naming::stringify(&value),
                ::core::result::Result::Err(e) => {
                    ::core::result::Result::Err($crate::CaptureError::Accessor {
                        method: ::std::string::ToString::to_string($requested),
                        reason: ::std::string::ToString::to_string(&e),
                    })
                }
            };
        }
        $crate::accessors!(@arms $self, $requested, $($($rest)*)?);
    };
    (@arms $self:ident, $requested:ident, $method:ident $(, $($rest:tt)*)?) => {
        if $requested == ::core::stringify!($method) {
            return $crate::naming::stringify(&$self.$method());
        }
        $crate::accessors!(@arms $self, $requested, $($($rest)*)?);
    };
    (@arms $self:ident, $requested:ident,) => {};
    ($type:ty { $($methods:tt)* }) => {
        impl $crate::Accessors for $type {
            fn call_accessor(
                &self,
                method: &str,
            ) -> ::core::result::Result<::std::string::String, $crate::CaptureError> {
                $crate::accessors!(@arms self, method, $($methods)*);
                ::core::result::Result::Err($crate::CaptureError::MethodNotFound {
                    method: ::std::string::ToString::to_string(method),
                    type_name: ::core::any::type_name::<Self>(),
                })
            }
        }
    };
}
