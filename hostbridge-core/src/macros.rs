//! Declarative macros for defining beans and wire enums

/// Declares a bean: a struct whose fields are all `Option<T>`, together with
/// its JSON encoding, decoding and script rendering.
///
/// # Example
///
/// ```rust
/// use hostbridge_core::{bean, Bean};
///
/// bean! {
///     pub struct Point as "Point" {
///         x: i32 => "x",
///         y: i32 => "y",
///     }
/// }
///
/// let p = Point { x: Some(1), ..Default::default() };
/// assert_eq!(p.to_json(), r#"{ "x": 1, "y": null }"#);
/// ```
#[macro_export]
macro_rules! bean {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $wire:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: Option<$ty>,
            )*
        }

        impl $crate::WireValue for $name {
            #[allow(unused_mut)]
            fn write_json(&self, out: &mut String) {
                let mut writer = $crate::bean::ObjectWriter::begin(out);
                $( writer.field($key, &self.$field); )*
                writer.end();
            }

            #[allow(unused_variables)]
            fn read_json(value: &$crate::serde_json::Value) -> $crate::Result<Self> {
                let reader = $crate::bean::ObjectReader::new($wire, value)?;
                Ok($name {
                    $( $field: reader.field($key)?, )*
                })
            }
        }

        impl $crate::Bean for $name {
            const TYPE_NAME: &'static str = $wire;
        }

        impl $crate::ScriptValue for $name {
            fn to_script(&self, namespace: &str) -> String {
                $crate::script::bean_fragment(self, namespace)
            }
        }
    };
}

/// Declares a wire enum. An `Unknown` variant is appended and used as the
/// default and as the fallback for unrecognised names.
///
/// # Example
///
/// ```rust
/// use hostbridge_core::{wire_enum, WireEnum};
///
/// wire_enum! {
///     pub enum Mood as "IMood" {
///         Happy => "Happy",
///         Sad => "Sad",
///     }
/// }
///
/// assert_eq!(Mood::from_wire_or_unknown("Angry"), Mood::Unknown);
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $wire:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            #[default]
            Unknown,
        }

        impl $crate::WireEnum for $name {
            const TYPE_NAME: &'static str = $wire;
            const UNKNOWN: Self = $name::Unknown;

            fn as_wire(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )*
                    $name::Unknown => "Unknown",
                }
            }

            fn from_wire(name: &str) -> Option<Self> {
                match name {
                    $( $value => Some($name::$variant), )*
                    "Unknown" => Some($name::Unknown),
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::WireEnum::as_wire(self))
            }
        }

        impl $crate::WireValue for $name {
            fn write_json(&self, out: &mut String) {
                $crate::enums::write_enum(self, out);
            }

            fn read_json(value: &$crate::serde_json::Value) -> $crate::Result<Self> {
                $crate::enums::read_enum(value)
            }
        }

        impl $crate::ScriptValue for $name {
            fn to_script(&self, namespace: &str) -> String {
                $crate::script::enum_fragment(self, namespace)
            }
        }
    };
}
