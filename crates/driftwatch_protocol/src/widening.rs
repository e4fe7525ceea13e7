//! Vendor-agnostic type widening rules.
//!
//! Vendor-specific type maps live inside each reader implementation. This
//! module only knows the canonical [`ColumnType`] enumeration.

use crate::types::ColumnType;

/// Whether changing `from` to `to` is a safe widening - a change that
/// cannot break a well-behaved consumer reading the old type.
///
/// Total over all ordered pairs; everything not listed is unsafe by
/// default. Identical types are not a "widening" and never reach this
/// function - the engine emits no type change for them at all.
pub fn is_safe_widening(from: ColumnType, to: ColumnType) -> bool {
    use ColumnType::*;
    matches!(
        (from, to),
        (Integer, BigInt)
            | (Integer, Float)
            | (Integer, Decimal)
            | (Float, Decimal)
            | (Varchar, Text)
    )
}

/// Extract the leading facet from a raw vendor type: `varchar(255)` -> 255,
/// `decimal(10,2)` -> 10. `None` when no parenthesized facet is present.
pub fn extract_length(raw_type: &str) -> Option<u32> {
    let open = raw_type.find('(')?;
    let close = raw_type[open..].find(')')? + open;
    raw_type[open + 1..close].split(',').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ColumnType::*;

    #[test]
    fn test_declared_widenings() {
        assert!(is_safe_widening(Integer, BigInt));
        assert!(is_safe_widening(Integer, Float));
        assert!(is_safe_widening(Integer, Decimal));
        assert!(is_safe_widening(Float, Decimal));
        assert!(is_safe_widening(Varchar, Text));
    }

    #[test]
    fn test_widening_is_one_directional() {
        let declared = [
            (Integer, BigInt),
            (Integer, Float),
            (Integer, Decimal),
            (Float, Decimal),
            (Varchar, Text),
        ];
        for (from, to) in declared {
            assert!(is_safe_widening(from, to));
            assert!(!is_safe_widening(to, from), "{to} -> {from} must not be safe");
        }
    }

    #[test]
    fn test_undeclared_pairs_default_unsafe() {
        assert!(!is_safe_widening(Varchar, Integer));
        assert!(!is_safe_widening(Integer, Varchar));
        assert!(!is_safe_widening(Boolean, Integer));
        assert!(!is_safe_widening(Timestamp, Varchar));
        assert!(!is_safe_widening(Json, Varchar));
        assert!(!is_safe_widening(Struct, Json));
        assert!(!is_safe_widening(Unknown, Unknown));
    }

    #[test]
    fn test_extract_length() {
        assert_eq!(extract_length("varchar(255)"), Some(255));
        assert_eq!(extract_length("decimal(10,2)"), Some(10));
        assert_eq!(extract_length("NUMERIC( 12 , 4 )"), Some(12));
        assert_eq!(extract_length("text"), None);
        assert_eq!(extract_length("varchar()"), None);
    }
}
