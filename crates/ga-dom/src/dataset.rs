//! data-* attribute naming
//!
//! Maps camelCase field names onto `data-<prefix>-<field>` attribute names.

/// Build the attribute name for a field under a data prefix.
///
/// The field part is lowercased without inserting dashes, so `orderId`
/// under prefix `ga` becomes `data-ga-orderid`. An empty prefix yields
/// `data-<field>`.
pub fn data_attribute_name(prefix: &str, field: &str) -> String {
    let prefix = prefix.trim_matches('-');
    let mut name = String::with_capacity(6 + prefix.len() + field.len());
    name.push_str("data-");
    if !prefix.is_empty() {
        name.push_str(&prefix.to_ascii_lowercase());
        name.push('-');
    }
    name.push_str(&field.to_ascii_lowercase());
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_attribute_name() {
        assert_eq!(data_attribute_name("ga", "category"), "data-ga-category");
        assert_eq!(data_attribute_name("ga", "nonInteraction"), "data-ga-noninteraction");
        assert_eq!(data_attribute_name("GA-", "orderId"), "data-ga-orderid");
        assert_eq!(data_attribute_name("", "label"), "data-label");
    }
}
