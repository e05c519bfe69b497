//! Helper macro generating port error enums.
//!
//! Each variant gets a snake-case constructor whose `String` fields accept
//! anything convertible with `Into`, e.g. `UserPersistenceError::query("boom")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    define_port_error! {
        pub enum StoreError {
            Offline => "store offline",
            Query { message: String } => "query failed: {message}",
            Timeout { millis: u64 } => "timed out after {millis}ms",
            Conflict { key: String, attempts: u32 } => "conflict on {key} after {attempts} attempts",
        }
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(StoreError::offline(), StoreError::Offline);
        assert_eq!(StoreError::offline().to_string(), "store offline");
    }

    #[rstest]
    fn string_fields_accept_borrowed_input() {
        assert_eq!(StoreError::query("boom").to_string(), "query failed: boom");
    }

    #[rstest]
    fn numeric_fields_keep_their_type() {
        assert_eq!(StoreError::timeout(250_u64).to_string(), "timed out after 250ms");
    }

    #[rstest]
    fn mixed_fields_are_positional() {
        let err = StoreError::conflict("ada@example.com", 3_u32);
        assert_eq!(
            err.to_string(),
            "conflict on ada@example.com after 3 attempts"
        );
    }
}
