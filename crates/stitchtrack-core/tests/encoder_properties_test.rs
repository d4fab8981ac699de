//! Property-based tests for the barcode encoder.
//!
//! For every valid attribute set:
//! 1. decode(encode(a)) gives back every numeric field
//! 2. encode is deterministic
//! 3. the barcode is 23 uppercase ASCII characters in 7 segments

use proptest::prelude::*;

use stitchtrack_core::encoding::{fingerprint, BARCODE_LEN, SEGMENT_COUNT, SEPARATOR};
use stitchtrack_core::{decode, encode, BatchAttributes};

// =============================================================================
// Strategy helpers
// =============================================================================

fn attributes_strategy() -> impl Strategy<Value = BatchAttributes> {
    (
        1i64..=46655,
        "[A-Za-z0-9 -]{0,4}[A-Za-z0-9]{7,20}",
        1i64..=46655,
        1i64..=46655,
        1i64..=999,
        1i64..=99,
        1i64..=999,
    )
        .prop_map(
            |(brand_id, model_name, size_id, color_id, quantity, layers, serial)| BatchAttributes {
                brand_id,
                model_name,
                size_id,
                color_id,
                quantity,
                layers,
                serial,
            },
        )
}

proptest! {
    #[test]
    fn decode_recovers_encoded_fields(attrs in attributes_strategy()) {
        let code = encode(&attrs).unwrap();
        let seg = decode(code.as_str()).unwrap();
        prop_assert_eq!(seg.brand_id as i64, attrs.brand_id);
        prop_assert_eq!(seg.size_id as i64, attrs.size_id);
        prop_assert_eq!(seg.color_id as i64, attrs.color_id);
        prop_assert_eq!(i64::from(seg.quantity), attrs.quantity);
        prop_assert_eq!(i64::from(seg.layers), attrs.layers);
        prop_assert_eq!(i64::from(seg.serial), attrs.serial);
        prop_assert_eq!(seg.model_tag, fingerprint(&attrs.model()));
    }

    #[test]
    fn encode_is_deterministic(attrs in attributes_strategy()) {
        prop_assert_eq!(encode(&attrs).unwrap(), encode(&attrs.clone()).unwrap());
    }

    #[test]
    fn layout_is_fixed(attrs in attributes_strategy()) {
        let code = encode(&attrs).unwrap();
        let s = code.as_str();
        prop_assert_eq!(s.len(), BARCODE_LEN);
        let segments: Vec<&str> = s.split(SEPARATOR).collect();
        prop_assert_eq!(segments.len(), SEGMENT_COUNT);
        for segment in segments {
            prop_assert!(!segment.is_empty());
            prop_assert!(segment.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
        }
    }

    #[test]
    fn out_of_range_quantity_is_rejected(q in prop_oneof![i64::MIN..=0, 1000i64..=i64::MAX]) {
        let attrs = BatchAttributes {
            brand_id: 1,
            model_name: "ABCDEFG".to_string(),
            size_id: 1,
            color_id: 1,
            quantity: q,
            layers: 1,
            serial: 1,
        };
        prop_assert!(encode(&attrs).unwrap_err().has("quantity"));
    }

    #[test]
    fn decode_never_panics(s in "\\PC{0,40}") {
        let _ = decode(&s);
    }
}
