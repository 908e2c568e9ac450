//! Macros for reducing builder boilerplate.

/// Generates a builder-style setter for an `Option` field.
///
/// # Usage
///
/// ```ignore
/// builder_option!(padx, u32);
/// // Generates: pub fn padx(mut self, value: u32) -> Self { self.padx = Some(value); self }
///
/// builder_option!(text, into String);
/// // Generates: pub fn text(mut self, value: impl Into<String>) -> Self { ... }
/// ```
macro_rules! builder_option {
    ($name:ident, into $type:ty) => {
        pub fn $name(mut self, value: impl Into<$type>) -> Self {
            self.$name = Some(value.into());
            self
        }
    };
    ($name:ident, $type:ty) => {
        pub fn $name(mut self, value: $type) -> Self {
            self.$name = Some(value);
            self
        }
    };
}
