//! Detail page field validation.

use crate::records::InfoItem;

/// Label of the registry field holding a person's birth date
pub const BIRTHDAY_FIELD: &str = "дата рождения";

/// Lowercase and trim a label so it can be compared against a field name
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Check whether any item labeled `field` carries exactly `expected`.
///
/// Labels are compared after normalization, values verbatim. A page without
/// the field is simply not a match.
pub fn field_matches(items: &[InfoItem], field: &str, expected: &str) -> bool {
    let field = normalize_label(field);

    items.iter().any(|item| {
        let label_matches = item
            .label
            .as_deref()
            .is_some_and(|label| normalize_label(label) == field);

        label_matches && item.value.as_deref() == Some(expected)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_birthday() {
        let items = vec![
            InfoItem::new("ИНН", "123456789012"),
            InfoItem::new("Дата рождения", "02.02.1975"),
        ];
        assert!(field_matches(&items, BIRTHDAY_FIELD, "02.02.1975"));
    }

    #[test]
    fn test_label_is_trimmed_and_lowercased() {
        let items = vec![InfoItem::new("  ДАТА РОЖДЕНИЯ \n", "02.02.1975")];
        assert!(field_matches(&items, BIRTHDAY_FIELD, "02.02.1975"));
    }

    #[test]
    fn test_value_is_compared_verbatim() {
        let items = vec![InfoItem::new("Дата рождения", " 02.02.1975")];
        assert!(!field_matches(&items, BIRTHDAY_FIELD, "02.02.1975"));
    }

    #[test]
    fn test_mismatching_value() {
        let items = vec![InfoItem::new("дата рождения", "03.03.1975")];
        assert!(!field_matches(&items, BIRTHDAY_FIELD, "02.02.1975"));
    }

    #[test]
    fn test_missing_field() {
        let items = vec![InfoItem::new("Место рождения", "02.02.1975")];
        assert!(!field_matches(&items, BIRTHDAY_FIELD, "02.02.1975"));
        assert!(!field_matches(&[], BIRTHDAY_FIELD, "02.02.1975"));
    }

    #[test]
    fn test_item_without_text_is_ignored() {
        let items = vec![
            InfoItem::default(),
            InfoItem {
                label: Some("Дата рождения".to_string()),
                value: None,
            },
        ];
        assert!(!field_matches(&items, BIRTHDAY_FIELD, "02.02.1975"));
    }
}
