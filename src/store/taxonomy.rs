//! taxonomy.rs
//! Two-level partition of group labels into top-level categories.

use super::dataset::DatasetStore;
use crate::error::{NotFound, TaxonomyError};
use crate::selection::Hierarchy;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// One declared category and its ordered leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub leaves: Vec<String>,
}

impl CategoryDef {
    pub fn new<S: Into<String>>(name: S, leaves: impl IntoIterator<Item = S>) -> Self {
        Self { name: name.into(), leaves: leaves.into_iter().map(Into::into).collect() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupTaxonomy {
    categories: Vec<CategoryDef>,
    /// Leaf -> index into `categories`.
    owner: HashMap<String, usize>,
}

impl GroupTaxonomy {
    /// Validates the declaration against the dataset's label domain.
    pub fn new(categories: Vec<CategoryDef>, store: &DatasetStore) -> Result<Self, TaxonomyError> {
        let mut owner: HashMap<String, usize> = HashMap::new();

        for (i, cat) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.name == cat.name) {
                return Err(TaxonomyError::DuplicateCategory(cat.name.clone()));
            }
            if cat.leaves.is_empty() {
                return Err(TaxonomyError::EmptyCategory(cat.name.clone()));
            }
            for leaf in &cat.leaves {
                if !store.has_records(leaf) {
                    return Err(TaxonomyError::UnknownLeaf { category: cat.name.clone(), leaf: leaf.clone() });
                }
                if let Some(&prev) = owner.get(leaf) {
                    return Err(TaxonomyError::OverlappingLeaf {
                        leaf: leaf.clone(),
                        first: categories[prev].name.clone(),
                        second: cat.name.clone(),
                    });
                }
                owner.insert(leaf.clone(), i);
            }
        }

        Ok(Self { categories, owner })
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &str> { self.categories.iter().map(|c| c.name.as_str()) }

    pub fn leaves_of(&self, category: &str) -> Result<&[String], NotFound> {
        self.categories.iter()
            .find(|c| c.name == category)
            .map(|c| c.leaves.as_slice())
            .ok_or_else(|| NotFound::category(category))
    }

    pub fn category_of(&self, label: &str) -> Result<&str, NotFound> {
        self.owner.get(label)
            .map(|&i| self.categories[i].name.as_str())
            .ok_or_else(|| NotFound::label(label))
    }

    /// Every leaf, category by category.
    pub fn all_leaves(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().flat_map(|c| c.leaves.iter().map(String::as_str))
    }
}

impl Hierarchy for GroupTaxonomy {
    fn children_of(&self, parent_value: &str) -> &[String] {
        self.leaves_of(parent_value).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{Record, Subject};

    fn store(labels: &[&str]) -> DatasetStore {
        let subjects = labels.iter().enumerate()
            .map(|(i, l)| Subject { entity_id: format!("e{i}"), group_label: l.to_string(), weight: 20.0 })
            .collect();
        let records = labels.iter().enumerate()
            .map(|(i, l)| Record { entity_id: format!("e{i}"), group_label: l.to_string(), time_point: 0, value: 45.0, weight: 20.0 })
            .collect();
        DatasetStore::from_parts(subjects, records)
    }

    fn mouse_taxonomy() -> GroupTaxonomy {
        let s = store(&["Ramicane", "Capomulin", "Infubinol", "Ceftamin", "Placebo"]);
        GroupTaxonomy::new(vec![
            CategoryDef::new("Lightweight", ["Ramicane", "Capomulin"]),
            CategoryDef::new("Heavyweight", ["Infubinol", "Ceftamin"]),
            CategoryDef::new("Placebo", ["Placebo"]),
        ], &s).unwrap()
    }

    #[test]
    fn test_lookups() {
        let t = mouse_taxonomy();
        assert_eq!(t.leaves_of("Lightweight").unwrap(), ["Ramicane", "Capomulin"]);
        assert_eq!(t.category_of("Ceftamin"), Ok("Heavyweight"));
        assert_eq!(t.categories().collect::<Vec<_>>(), vec!["Lightweight", "Heavyweight", "Placebo"]);
        assert_eq!(t.all_leaves().count(), 5);
    }

    #[test]
    fn test_unknown_lookups_return_not_found() {
        let t = mouse_taxonomy();
        assert_eq!(t.leaves_of("Midweight").unwrap_err(), NotFound::category("Midweight"));
        assert_eq!(t.category_of("Ketapril").unwrap_err(), NotFound::label("Ketapril"));
        assert!(t.children_of("Midweight").is_empty());
    }

    #[test]
    fn test_rejects_leaf_without_records() {
        let s = store(&["A"]);
        let err = GroupTaxonomy::new(vec![CategoryDef::new("Cat1", ["A", "Ghost"])], &s).unwrap_err();
        assert_eq!(err, TaxonomyError::UnknownLeaf { category: "Cat1".into(), leaf: "Ghost".into() });
    }

    #[test]
    fn test_rejects_leaf_with_subjects_but_no_records() {
        let subjects = vec![
            Subject { entity_id: "a1".into(), group_label: "A".into(), weight: 20.0 },
            Subject { entity_id: "g1".into(), group_label: "Ghost".into(), weight: 22.0 },
        ];
        let records = vec![Record { entity_id: "a1".into(), group_label: "A".into(), time_point: 0, value: 45.0, weight: 20.0 }];
        let s = DatasetStore::from_parts(subjects, records);
        assert!(s.has_label("Ghost") && !s.has_records("Ghost"));

        let err = GroupTaxonomy::new(vec![CategoryDef::new("Cat1", ["A"]), CategoryDef::new("Cat2", ["Ghost"])], &s).unwrap_err();
        assert_eq!(err, TaxonomyError::UnknownLeaf { category: "Cat2".into(), leaf: "Ghost".into() });
    }

    #[test]
    fn test_rejects_overlap_duplicate_and_empty() {
        let s = store(&["A", "B"]);
        let overlap = GroupTaxonomy::new(vec![
            CategoryDef::new("Cat1", ["A"]),
            CategoryDef::new("Cat2", ["B", "A"]),
        ], &s).unwrap_err();
        assert!(matches!(overlap, TaxonomyError::OverlappingLeaf { ref first, ref second, .. } if first == "Cat1" && second == "Cat2"));

        let dup = GroupTaxonomy::new(vec![CategoryDef::new("Cat1", ["A"]), CategoryDef::new("Cat1", ["B"])], &s);
        assert_eq!(dup.unwrap_err(), TaxonomyError::DuplicateCategory("Cat1".into()));

        let empty = GroupTaxonomy::new(vec![CategoryDef { name: "Cat1".into(), leaves: vec![] }], &s);
        assert_eq!(empty.unwrap_err(), TaxonomyError::EmptyCategory("Cat1".into()));
    }
}
