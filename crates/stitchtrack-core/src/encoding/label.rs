use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::BatchView;

/// The two human-readable lines printed under a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelText {
    pub barcode: String,
    pub header: String,
    pub detail: String,
}

impl LabelText {
    pub fn new(
        barcode: &str,
        brand: &str,
        model: &str,
        color: &str,
        quantity: u16,
        size: &str,
    ) -> Self {
        Self {
            barcode: barcode.to_string(),
            header: format!("Brand: {brand} | Model: {model}"),
            detail: format!("Color: {color} | Qty: {quantity} | Size: {size}"),
        }
    }

    /// Missing reference names print as `-`.
    pub fn from_view(view: &BatchView) -> Self {
        let name = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        Self::new(
            &view.barcode,
            &name(&view.brand_name),
            &name(&view.model_name),
            &name(&view.color_name),
            view.quantity,
            &name(&view.size_value),
        )
    }

    pub fn lines(&self) -> [&str; 2] {
        [self.header.as_str(), self.detail.as_str()]
    }
}

impl fmt::Display for LabelText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.barcode)?;
        writeln!(f, "{}", self.header)?;
        write!(f, "{}", self.detail)
    }
}

/// Label lines for every view, in order.
pub fn label_lines(views: &[BatchView]) -> Vec<LabelText> {
    views.iter().map(LabelText::from_view).collect()
}
