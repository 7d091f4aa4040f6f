//! Joins nomenclature rows with sales rows into loadable products.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// Placeholder kept for brand/origin cells the source left empty.
pub const MISSING_TEXT: &str = "nan";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NomenclatureRow {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub market: Option<String>,
    pub segment: Option<String>,
    pub category: Option<String>,
    pub family: Option<String>,
    pub origin: Option<String>,
    pub brand: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub product_id: i64,
    pub price: Option<f64>,
}

/// Request body shape shared by the HTTP upload and the CLI catalog files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogUpload {
    pub nomenclature: Vec<NomenclatureRow>,
    #[serde(default)]
    pub sales: Vec<SalesRow>,
}

impl CatalogUpload {
    pub fn into_products(self) -> Vec<Product> {
        assemble_products(self.nomenclature, &self.sales)
    }
}

/// Rows without a positive id are dropped. Price is the mean of every
/// priced sales row for the id, `0.0` when there is none.
pub fn assemble_products(rows: Vec<NomenclatureRow>, sales: &[SalesRow]) -> Vec<Product> {
    let prices = average_prices(sales);

    rows.into_iter()
        .filter_map(|row| {
            let id = u64::try_from(row.id?).ok().filter(|id| *id > 0)?;
            Some(Product {
                id: ProductId(id),
                name: text(row.name),
                market: text(row.market),
                segment: text(row.segment),
                category: text(row.category),
                family: text(row.family),
                brand: text_or_missing(row.brand),
                origin: text_or_missing(row.origin),
                price: prices.get(&id).copied().unwrap_or(0.0),
            })
        })
        .collect()
}

fn average_prices(sales: &[SalesRow]) -> HashMap<u64, f64> {
    let mut sums: HashMap<u64, (f64, u32)> = HashMap::new();
    for row in sales {
        let (Ok(id), Some(price)) = (u64::try_from(row.product_id), row.price) else {
            continue;
        };
        if !price.is_finite() {
            continue;
        }
        let entry = sums.entry(id).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    sums.into_iter().map(|(id, (sum, count))| (id, sum / f64::from(count))).collect()
}

fn text(value: Option<String>) -> String {
    value.map(|value| value.trim().to_string()).unwrap_or_default()
}

fn text_or_missing(value: Option<String>) -> String {
    value.map(|value| value.trim().to_string()).unwrap_or_else(|| MISSING_TEXT.to_string())
}

#[cfg(test)]
mod tests {
    use super::{assemble_products, CatalogUpload, NomenclatureRow, SalesRow};
    use crate::domain::product::ProductId;

    fn row(id: Option<i64>) -> NomenclatureRow {
        NomenclatureRow {
            id,
            name: Some(" Lapte Zuzu 1L ".to_string()),
            market: Some("Food".to_string()),
            segment: Some("Dairy".to_string()),
            category: Some("Milk".to_string()),
            family: Some("UHT".to_string()),
            origin: Some("RO".to_string()),
            brand: Some("Zuzu".to_string()),
        }
    }

    #[test]
    fn price_is_mean_of_sales_rows() {
        let sales = vec![
            SalesRow { product_id: 1, price: Some(4.0) },
            SalesRow { product_id: 1, price: Some(6.0) },
            SalesRow { product_id: 1, price: None },
            SalesRow { product_id: 2, price: Some(9.0) },
        ];
        let products = assemble_products(vec![row(Some(1))], &sales);

        assert_eq!(products.len(), 1);
        assert!((products[0].price - 5.0).abs() < 1e-9);
        assert_eq!(products[0].name, "Lapte Zuzu 1L");
    }

    #[test]
    fn unsold_product_defaults_to_zero_price() {
        let products = assemble_products(vec![row(Some(3))], &[]);
        assert_eq!(products[0].price, 0.0);
    }

    #[test]
    fn rows_without_usable_id_are_dropped() {
        let products = assemble_products(vec![row(None), row(Some(-4)), row(Some(0)), row(Some(8))], &[]);
        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ProductId(8)]);
    }

    #[test]
    fn missing_brand_and_origin_become_nan_literal() {
        let mut incomplete = row(Some(5));
        incomplete.brand = None;
        incomplete.origin = None;
        incomplete.family = None;

        let products = assemble_products(vec![incomplete], &[]);
        assert_eq!(products[0].brand, "nan");
        assert_eq!(products[0].origin, "nan");
        assert_eq!(products[0].family, "");
    }

    #[test]
    fn upload_without_sales_section_deserializes() {
        let upload: CatalogUpload = serde_json::from_str(
            r#"{"nomenclature":[{"id":1,"name":"Lapte","market":"Food","segment":"Dairy",
                "category":"Milk","family":"UHT","origin":"RO","brand":"Zuzu"}]}"#,
        )
        .expect("valid upload");

        let products = upload.into_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, 0.0);
    }
}
