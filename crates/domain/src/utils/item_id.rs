//! Backend item-id transformations
//!
//! The pricing backend identifies products by zero-padded 18-character item
//! ids (`"000000000000000029"`); the catalog uses the short form (`"29"`).
//! The two transforms are inverses for non-zero-padded ids of at most
//! [`ITEM_ID_WIDTH`](crate::constants::ITEM_ID_WIDTH) digits.

use crate::constants::ITEM_ID_WIDTH;

/// Derive the catalog product id from a backend item id by stripping leading
/// zeros. An all-zero id maps to `"0"`.
pub fn item_id_to_product_id(item_id: &str) -> String {
    let stripped = item_id.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Derive the backend item id from a catalog product id by left-padding with
/// zeros to the backend width. Ids already at or beyond the width pass
/// through unchanged.
pub fn product_id_to_item_id(product_id: &str) -> String {
    if product_id.len() >= ITEM_ID_WIDTH {
        return product_id.to_string();
    }
    format!("{:0>width$}", product_id, width = ITEM_ID_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_zeros() {
        assert_eq!(item_id_to_product_id("000000000000000029"), "29");
        assert_eq!(item_id_to_product_id("000000000000001000"), "1000");
        assert_eq!(item_id_to_product_id("29"), "29");
    }

    #[test]
    fn all_zero_id_maps_to_zero() {
        assert_eq!(item_id_to_product_id("000000000000000000"), "0");
    }

    #[test]
    fn pads_to_backend_width() {
        assert_eq!(product_id_to_item_id("29"), "000000000000000029");
        assert_eq!(product_id_to_item_id("29").len(), ITEM_ID_WIDTH);
    }

    #[test]
    fn round_trips_for_short_ids() {
        for id in ["1", "29", "1000", "999999999999999999"] {
            assert_eq!(item_id_to_product_id(&product_id_to_item_id(id)), id);
        }
    }

    #[test]
    fn oversized_ids_pass_through() {
        let long = "1234567890123456789";
        assert_eq!(product_id_to_item_id(long), long);
    }
}
