//! Macros for ergonomic state machine construction.

/// Generate a kind enum with the derives and [`StateKind`](crate::core::StateKind)
/// implementation a machine needs.
///
/// # Example
///
/// ```
/// use stance::state_kinds;
/// use stance::core::StateKind;
///
/// state_kinds! {
///     pub enum EntityStateKind {
///         Default,
///         Rolling,
///         Dead,
///     }
/// }
///
/// assert_eq!(EntityStateKind::Dead.name(), "Dead");
/// ```
#[macro_export]
macro_rules! state_kinds {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKind for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
