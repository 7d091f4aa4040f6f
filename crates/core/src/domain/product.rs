use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One catalog entry. Immutable once it is part of a loaded snapshot.
///
/// `brand` and `origin` are kept verbatim, including the literal `"nan"`
/// produced when the source sheet left the cell empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub market: String,
    pub segment: String,
    pub category: String,
    pub family: String,
    pub brand: String,
    pub origin: String,
    pub price: f64,
}

impl Product {
    /// Returns a copy with every string field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.trim().to_string(),
            market: self.market.trim().to_string(),
            segment: self.segment.trim().to_string(),
            category: self.category.trim().to_string(),
            family: self.family.trim().to_string(),
            brand: self.brand.trim().to_string(),
            origin: self.origin.trim().to_string(),
            price: self.price,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.0 == 0 {
            return Err(ValidationError::InvalidId);
        }

        let required = [
            ("name", &self.name),
            ("market", &self.market),
            ("segment", &self.segment),
            ("category", &self.category),
            ("family", &self.family),
            ("brand", &self.brand),
            ("origin", &self.origin),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::MissingField { id: self.id, field: (*field).to_string() });
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice { id: self.id, price: self.price });
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Product, ProductId};

    pub fn product(id: u64, family: &str, brand: &str, price: f64, name: &str) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            market: "Food".to_string(),
            segment: "Dairy".to_string(),
            category: "Milk".to_string(),
            family: family.to_string(),
            brand: brand.to_string(),
            origin: "local".to_string(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::ProductId;
    use crate::errors::ValidationError;

    #[test]
    fn validate_accepts_nan_brand_literal() {
        let mut item = product(1, "UHT", "nan", 4.5, "Milk 1L");
        item.origin = "nan".to_string();
        assert_eq!(item.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_required_field() {
        let mut item = product(7, "UHT", "Zuzu", 4.5, "Milk 1L");
        item.family = "   ".to_string();
        assert_eq!(
            item.validate(),
            Err(ValidationError::MissingField { id: ProductId(7), field: "family".to_string() })
        );
    }

    #[test]
    fn validate_rejects_zero_id_and_negative_price() {
        let item = product(0, "UHT", "Zuzu", 4.5, "Milk 1L");
        assert_eq!(item.validate(), Err(ValidationError::InvalidId));

        let item = product(3, "UHT", "Zuzu", -1.0, "Milk 1L");
        assert!(matches!(item.validate(), Err(ValidationError::InvalidPrice { .. })));
    }

    #[test]
    fn trimmed_strips_whitespace_from_text_fields() {
        let item = product(2, " UHT ", " Zuzu", 1.0, " Milk 1L ").trimmed();
        assert_eq!(item.family, "UHT");
        assert_eq!(item.brand, "Zuzu");
        assert_eq!(item.name, "Milk 1L");
    }
}
