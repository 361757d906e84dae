//! Static fallback catalog
//!
//! Served when the ERP product master cannot be reached so product search
//! never surfaces a hard failure to the associate.

use storebridge_domain::Product;

/// Fixed product list used when the ERP is unreachable.
pub fn fallback_products() -> Vec<Product> {
    [
        ("29", "4006381333931", "Wireless Barcode Scanner", 89.99, "PCE"),
        ("30", "4006381333948", "Receipt Printer 80mm", 149.0, "PCE"),
        ("31", "4006381333955", "Cash Drawer Insert", 39.5, "PCE"),
        ("42", "4006381334006", "Customer Display 10\"", 199.0, "PCE"),
        ("57", "4006381334105", "Label Roll 57mm", 4.25, "PCE"),
    ]
    .into_iter()
    .map(|(id, ean, description, list_price, unit)| Product {
        id: id.to_string(),
        ean: Some(ean.to_string()),
        description: description.to_string(),
        list_price,
        unit: unit.to_string(),
        image: None,
        in_store_stock: 0.0,
        online_stock: 0.0,
        is_available: false,
    })
    .collect()
}

/// Case-insensitive filter applied to the fallback list, matching the same
/// fields the live search matches on (id, EAN, description).
pub fn filter_products(products: Vec<Product>, query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|product| {
            product.id.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
                || product.ean.as_deref().is_some_and(|ean| ean.contains(&needle))
        })
        .collect()
}
