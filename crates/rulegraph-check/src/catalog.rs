//! The operator catalog: every LOGIC operator available to rule authors.
//!
//! The catalog is fetched from the backend and treated as ground truth for
//! LOGIC node shapes. Entries are keyed by `(category, operatorName)` and keep
//! the order the backend listed them in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use rulegraph_core::types::PortType;

/// One operator as described by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorEntry {
    pub operator_name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub input_types: Vec<PortType>,
    pub output_type: PortType,
}

/// Lookup table of operators. Serializes as the plain list the catalog service
/// returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<OperatorEntry>", into = "Vec<OperatorEntry>")]
pub struct OperatorCatalog {
    entries: IndexMap<(String, String), OperatorEntry>,
}

impl OperatorCatalog {
    pub fn new() -> Self {
        OperatorCatalog::default()
    }

    /// Adds an entry, replacing (and returning) any entry with the same key.
    pub fn insert(&mut self, entry: OperatorEntry) -> Option<OperatorEntry> {
        let key = (entry.category.clone(), entry.operator_name.clone());
        self.entries.insert(key, entry)
    }

    pub fn get(&self, category: &str, operator_name: &str) -> Option<&OperatorEntry> {
        self.entries
            .get(&(category.to_string(), operator_name.to_string()))
    }

    pub fn contains(&self, category: &str, operator_name: &str) -> bool {
        self.get(category, operator_name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatorEntry> + '_ {
        self.entries.values()
    }

    /// Distinct categories, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (category, _) in self.entries.keys() {
            if !seen.contains(&category.as_str()) {
                seen.push(category.as_str());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<OperatorEntry> for OperatorCatalog {
    fn from_iter<I: IntoIterator<Item = OperatorEntry>>(iter: I) -> Self {
        let mut catalog = OperatorCatalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

impl From<Vec<OperatorEntry>> for OperatorCatalog {
    fn from(entries: Vec<OperatorEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<OperatorCatalog> for Vec<OperatorEntry> {
    fn from(catalog: OperatorCatalog) -> Self {
        catalog.entries.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(category: &str, name: &str, inputs: Vec<PortType>) -> OperatorEntry {
        OperatorEntry {
            operator_name: name.into(),
            description: String::new(),
            category: category.into(),
            input_types: inputs,
            output_type: PortType::Boolean,
        }
    }

    #[test]
    fn parses_catalog_service_records() {
        let wire = json!([
            {
                "operatorName": "equals",
                "description": "Strict equality",
                "category": "comparison",
                "inputTypes": ["ANY", "ANY"],
                "outputType": "BOOLEAN"
            },
            {
                "operatorName": "before",
                "category": "date",
                "inputTypes": ["DATE", "DATE"],
                "outputType": "BOOLEAN"
            }
        ]);
        let catalog: OperatorCatalog = serde_json::from_value(wire).unwrap();
        assert_eq!(catalog.len(), 2);
        let before = catalog.get("date", "before").unwrap();
        assert_eq!(before.input_types, vec![PortType::Date, PortType::Date]);
        assert!(before.description.is_empty());
        assert!(!catalog.contains("comparison", "before"));
    }

    #[test]
    fn same_name_in_different_categories_are_distinct() {
        let catalog: OperatorCatalog = vec![
            entry("string", "contains", vec![PortType::String, PortType::String]),
            entry("array", "contains", vec![PortType::Array, PortType::Any]),
        ]
        .into();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("array", "contains").unwrap().input_types[0],
            PortType::Array
        );
        assert_eq!(catalog.categories(), vec!["string", "array"]);
    }

    #[test]
    fn later_entry_replaces_earlier() {
        let mut catalog = OperatorCatalog::new();
        assert!(catalog
            .insert(entry("logic", "not", vec![PortType::Boolean]))
            .is_none());
        let old = catalog.insert(entry("logic", "not", vec![PortType::Any]));
        assert!(old.is_some());
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("logic", "not").unwrap().input_types,
            vec![PortType::Any]
        );
    }

    #[test]
    fn serializes_back_to_a_list_in_order() {
        let catalog: OperatorCatalog = vec![
            entry("logic", "and", vec![PortType::Boolean, PortType::Boolean]),
            entry("logic", "or", vec![PortType::Boolean, PortType::Boolean]),
        ]
        .into();
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json[0]["operatorName"], "and");
        assert_eq!(json[1]["operatorName"], "or");
    }
}
