//! `define_port_error!`: error enums for driven ports.
//!
//! Every port error is a set of struct variants with a display message.
//! The macro derives `thiserror::Error`, adds one snake_case constructor per
//! variant taking `impl Into` arguments, and a `kind()` accessor that names
//! the variant for structured log fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Build a `" $variant "` error."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )*

                /// Variant name in snake case, for log fields.
                pub const fn kind(&self) -> &'static str {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for port error enums.
    define_port_error! {
        pub enum DeliveryPortError {
            Refused { message: String } => "refused: {message}",
            Status { status: u16 } => "status: {status}",
            Rejected { message: String, status: u16 } => "rejected: {message} ({status})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = DeliveryPortError::refused("connection reset");
        assert_eq!(err.to_string(), "refused: connection reset");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = DeliveryPortError::status(503_u16);
        assert_eq!(err.to_string(), "status: 503");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = DeliveryPortError::rejected("bad signature", 400_u16);
        assert_eq!(err.to_string(), "rejected: bad signature (400)");
        assert_eq!(err.kind(), "rejected");
    }
}
