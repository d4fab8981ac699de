//! Brand / model / size / color lookup tables.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Brand,
    Model,
    Size,
    Color,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [Self::Brand, Self::Model, Self::Size, Self::Color];

    pub fn table(self) -> &'static str {
        match self {
            Self::Brand => "brands",
            Self::Model => "models",
            Self::Size => "sizes",
            Self::Color => "colors",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            Self::Brand => "brand_id",
            Self::Model => "model_id",
            Self::Size => "size_id",
            Self::Color => "color_id",
        }
    }

    pub fn name_column(self) -> &'static str {
        match self {
            Self::Brand => "brand_name",
            Self::Model => "model_name",
            Self::Size => "size_value",
            Self::Color => "color_name",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Model => "Model",
            Self::Size => "Size",
            Self::Color => "Color",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: i64,
    pub name: String,
}
