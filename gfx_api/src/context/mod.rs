/// Context module - resource traits and the factory trait

// Boundary parsing for the closed enums: numeric discriminant or canonical name.
// Needs `ALL` (discriminant order) and `name()` on the type. Defined before the
// module declarations so texture.rs and buffer.rs can invoke it.
macro_rules! impl_closed_enum_parsing {
    ($ty:ty, $what:literal) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = $crate::error::Error;

            fn try_from(value: u32) -> $crate::error::Result<Self> {
                <$ty>::ALL.get(value as usize).copied().ok_or_else(|| {
                    $crate::error::Error::InvalidValue(format!(concat!("unrecognised ", $what, " {}"), value))
                })
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                <$ty>::ALL.into_iter().find(|v| v.name() == s).ok_or_else(|| {
                    $crate::error::Error::InvalidValue(format!(concat!("unrecognised ", $what, " '{}'"), s))
                })
            }
        }
    };
}

// Module declarations
#[allow(clippy::module_inception)]
pub mod context;
pub mod texture;
pub mod buffer;

// Re-export everything from context.rs
pub use context::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;

// Mock context for tests (no GPU required)
#[cfg(test)]
pub mod mock_context;
