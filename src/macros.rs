//! Macros for ergonomic discriminant definitions.

/// Define a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// The enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and
/// `serde::Serialize`, so callers need `serde` as a dependency. Each
/// variant's name is its identifier.
///
/// # Example
///
/// ```
/// use tickstate::core::State;
/// use tickstate::state_enum;
///
/// state_enum! {
///     pub enum Stance {
///         Idle,
///         Running,
///         Paused,
///     }
/// }
///
/// assert_eq!(Stance::Running.name(), "Running");
/// ```
#[macro_export]
macro_rules! state_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
