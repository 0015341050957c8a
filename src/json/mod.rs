//! The canonical proto3 JSON mapping, driven by the same field specs as the
//! binary codec.

pub mod de;
pub mod ser;
pub mod well_known;

/// Options shared by both JSON directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonOptions {
    /// Key fields by their camelCase `jsonName` instead of the proto name.
    pub json_names: bool,
    /// Serialize enums by declared name instead of integer value. The
    /// parser accepts either form regardless.
    pub enum_names: bool,
    /// Elide fields holding their proto3 default.
    pub omit_default_values: bool,
}

impl Default for JsonOptions {
    fn default() -> JsonOptions {
        JsonOptions {
            json_names: true,
            enum_names: true,
            omit_default_values: true,
        }
    }
}

impl JsonOptions {
    /// Key fields by proto name rather than `jsonName`.
    pub fn proto_names(mut self) -> JsonOptions {
        self.json_names = false;
        self
    }

    /// Serialize enums as integers.
    pub fn enum_values(mut self) -> JsonOptions {
        self.enum_names = false;
        self
    }

    /// Emit every field, defaults included.
    pub fn emit_default_values(mut self) -> JsonOptions {
        self.omit_default_values = false;
        self
    }
}
