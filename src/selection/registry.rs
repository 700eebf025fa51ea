use super::types::*;
use super::Hierarchy;
use crate::error::{GraphError, SelectionError};
use std::collections::HashMap;
use std::sync::Arc;

/// Owns every selection node. Ids are dense indices in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SelectionRegistry {
    nodes: Vec<SelectionNode>,
    used_names: HashMap<String, SelectionId>,
}

impl SelectionRegistry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.nodes.len() }

    pub fn add_independent(&mut self, name: &str, options: Vec<String>, cardinality: Cardinality) -> Result<SelectionId, GraphError> {
        self.push_node(name, SelectionKind::Independent, cardinality, options)
    }

    /// Children start with no options; the first cascade from the parent fills them.
    pub fn add_child(&mut self, name: &str, parent: SelectionId, hierarchy: Arc<dyn Hierarchy>) -> Result<SelectionId, GraphError> {
        self.push_node(name, SelectionKind::Child { parent, hierarchy }, Cardinality::Multi, Vec::new())
    }

    fn push_node(&mut self, name: &str, kind: SelectionKind, cardinality: Cardinality, options: Vec<String>) -> Result<SelectionId, GraphError> {
        if self.used_names.contains_key(name) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
        let id = SelectionId::new(self.nodes.len());
        let mut options = options;
        dedup_in_order(&mut options);

        self.used_names.insert(name.to_string(), id);
        self.nodes.push(SelectionNode { id, name: name.to_string(), kind, cardinality, options, values: Vec::new() });
        Ok(id)
    }

    pub fn id_of(&self, name: &str) -> Result<SelectionId, SelectionError> {
        self.used_names.get(name).copied().ok_or_else(|| SelectionError::UnknownNode(name.to_string()))
    }

    #[inline(always)]
    pub fn get(&self, id: SelectionId) -> &SelectionNode { &self.nodes[id.index()] }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionNode> { self.nodes.iter() }

    /// Validates `values` against the node's options and cardinality, then
    /// returns them de-duplicated in option order.
    pub fn normalize(&self, id: SelectionId, values: &[String]) -> Result<Vec<String>, SelectionError> {
        let node = self.get(id);
        if let Some(bad) = values.iter().find(|v| !node.options.contains(*v)) {
            return Err(SelectionError::UnknownOption { node: node.name.clone(), value: bad.clone() });
        }
        let normalized: Vec<String> = node.options.iter().filter(|o| values.contains(o)).cloned().collect();
        if node.cardinality == Cardinality::Single && normalized.len() > 1 {
            return Err(SelectionError::TooManyValues { node: node.name.clone(), count: normalized.len() });
        }
        Ok(normalized)
    }

    /// Overwrites the value set. Returns `false` when nothing changed.
    pub fn set_values(&mut self, id: SelectionId, values: Vec<String>) -> bool {
        let node = &mut self.nodes[id.index()];
        if node.values == values {
            return false;
        }
        node.values = values;
        true
    }

    /// Recomputes a child's options from its parent's current values and
    /// resets the child to select every option. No-op for independent nodes.
    pub fn cascade(&mut self, id: SelectionId) {
        let (parent, hierarchy) = match &self.nodes[id.index()].kind {
            SelectionKind::Child { parent, hierarchy } => (*parent, Arc::clone(hierarchy)),
            SelectionKind::Independent => return,
        };

        let mut options: Vec<String> = self.nodes[parent.index()].values.iter()
            .flat_map(|p| hierarchy.children_of(p).iter().cloned())
            .collect();
        dedup_in_order(&mut options);

        let node = &mut self.nodes[id.index()];
        node.values = options.clone();
        node.options = options;
    }
}

fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.retain(|item| seen.insert(item.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::OptionTree;

    fn strings(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn test_unique_name_enforcement() {
        let mut reg = SelectionRegistry::new();
        reg.add_independent("drugs", strings(&["A"]), Cardinality::Multi).unwrap();
        let err = reg.add_independent("drugs", strings(&["B"]), Cardinality::Multi).unwrap_err();
        assert_eq!(err, GraphError::DuplicateName("drugs".into()));
        assert_eq!(reg.id_of("missing"), Err(SelectionError::UnknownNode("missing".into())));
    }

    #[test]
    fn test_normalize_orders_and_dedups() {
        let mut reg = SelectionRegistry::new();
        let id = reg.add_independent("drugs", strings(&["A", "B", "C"]), Cardinality::Multi).unwrap();
        assert_eq!(reg.normalize(id, &strings(&["C", "A", "C"])).unwrap(), strings(&["A", "C"]));
        let err = reg.normalize(id, &strings(&["A", "Z"])).unwrap_err();
        assert_eq!(err, SelectionError::UnknownOption { node: "drugs".into(), value: "Z".into() });
    }

    #[test]
    fn test_single_cardinality() {
        let mut reg = SelectionRegistry::new();
        let id = reg.add_independent("radio", strings(&["A", "B"]), Cardinality::Single).unwrap();
        assert!(reg.normalize(id, &strings(&["B"])).is_ok());
        assert!(reg.normalize(id, &[]).unwrap().is_empty());
        assert!(matches!(reg.normalize(id, &strings(&["A", "B"])), Err(SelectionError::TooManyValues { count: 2, .. })));
    }

    #[test]
    fn test_cascade_union_in_parent_order() {
        let tree = Arc::new(OptionTree::new([("Cat1", vec!["A", "B"]), ("Cat2", vec!["C"]), ("Cat3", vec!["B", "D"])]));
        let mut reg = SelectionRegistry::new();
        let parent = reg.add_independent("main", strings(&["Cat1", "Cat2", "Cat3"]), Cardinality::Multi).unwrap();
        let child = reg.add_child("sub", parent, tree).unwrap();

        let vals = reg.normalize(parent, &strings(&["Cat3", "Cat1"])).unwrap();
        assert!(reg.set_values(parent, vals.clone()));
        assert!(!reg.set_values(parent, vals));
        reg.cascade(child);

        let node = reg.get(child);
        assert_eq!(node.available_options(), strings(&["A", "B", "D"]).as_slice());
        assert_eq!(node.current_values(), node.available_options());
    }
}
