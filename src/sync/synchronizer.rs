//! synchronizer.rs
//! Owns selection state and view caches; serializes every write.
//!
//! An event runs to completion before the next one is accepted:
//! validate -> write -> cascade to descendants -> dirty readers -> (eager) recompute.

use super::view::{RecomputePolicy, Resolve, ViewDefinition};
use crate::compute::{Engine, GroupedCountTable, Ledger, PipelineKind, ResolvedFilters, ViewResult};
use crate::display::chart::ChartOptions;
use crate::display::sink::RenderSink;
use crate::display::style::StyleTable;
use crate::error::{ConfigurationError, GraphError, NotFound, SelectionError, StartupError};
use crate::graph::{DependencyGraph, ViewId};
use crate::selection::{Cardinality, Hierarchy, SelectionEvent, SelectionId, SelectionNode, SelectionRegistry};
use crate::store::{DatasetStore, GroupTaxonomy};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct ViewMeta {
    name: String,
    resolve: Resolve,
    pipeline: PipelineKind,
    options: ChartOptions,
}

/// What an accepted event touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// The written node first, then cascaded descendants parent-first.
    pub changed: Vec<SelectionId>,
    pub dirtied: Vec<ViewId>,
}

impl ChangeReport {
    pub fn is_noop(&self) -> bool { self.changed.is_empty() }
}

pub struct SynchronizerBuilder {
    store: Arc<DatasetStore>,
    taxonomy: Arc<GroupTaxonomy>,
    styles: Arc<StyleTable>,
    selections: SelectionRegistry,
    graph: DependencyGraph,
    defaults: Vec<(SelectionId, Vec<String>)>,
    views: Vec<ViewMeta>,
    view_names: HashMap<String, ViewId>,
    policy: RecomputePolicy,
}

impl SynchronizerBuilder {
    pub fn new(store: Arc<DatasetStore>, taxonomy: Arc<GroupTaxonomy>, styles: Arc<StyleTable>) -> Self {
        Self {
            store,
            taxonomy,
            styles,
            selections: SelectionRegistry::new(),
            graph: DependencyGraph::new(),
            defaults: Vec::new(),
            views: Vec::new(),
            view_names: HashMap::new(),
            policy: RecomputePolicy::default(),
        }
    }

    pub fn policy(mut self, policy: RecomputePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A control with fixed options and an initial value set.
    pub fn independent(&mut self, name: &str, options: Vec<String>, cardinality: Cardinality, default: &[String]) -> Result<SelectionId, StartupError> {
        self.ensure_unique(name)?;
        let id = self.selections.add_independent(name, options, cardinality)?;
        self.graph.add_selection(id, None);

        let values = self.selections.normalize(id, default).map_err(|e| match e {
            SelectionError::UnknownOption { value, .. } => ConfigurationError::InvalidDefault { node: name.to_string(), value },
            other => ConfigurationError::InvalidDefault { node: name.to_string(), value: other.to_string() },
        })?;
        self.defaults.push((id, values));
        Ok(id)
    }

    /// A child whose options are the taxonomy leaves of the parent's categories.
    pub fn child(&mut self, name: &str, parent: &str) -> Result<SelectionId, StartupError> {
        let hierarchy: Arc<dyn Hierarchy> = self.taxonomy.clone();
        self.child_with(name, parent, hierarchy)
    }

    /// A child expanded through an arbitrary hierarchy (any depth).
    pub fn child_with(&mut self, name: &str, parent: &str, hierarchy: Arc<dyn Hierarchy>) -> Result<SelectionId, StartupError> {
        self.ensure_unique(name)?;
        let parent_id = self.selections.id_of(parent).map_err(|_| GraphError::UnknownParent {
            node: name.to_string(),
            parent: parent.to_string(),
        })?;
        let id = self.selections.add_child(name, parent_id, hierarchy)?;
        self.graph.add_selection(id, Some(parent_id));
        Ok(id)
    }

    pub fn view(&mut self, def: ViewDefinition) -> Result<ViewId, StartupError> {
        self.ensure_unique(&def.name)?;
        let mut reads = Vec::with_capacity(def.reads.len());
        for r in &def.reads {
            let id = self.selections.id_of(r).map_err(|_| ConfigurationError::UnknownSelection {
                view: def.name.clone(),
                node: r.clone(),
            })?;
            if def.resolve == Resolve::Categories {
                self.check_categories(&def.name, id)?;
            }
            reads.push(id);
        }

        let id = ViewId::new(self.views.len());
        self.graph.add_view(id, &reads);
        self.view_names.insert(def.name.clone(), id);
        self.views.push(ViewMeta { name: def.name, resolve: def.resolve, pipeline: def.pipeline, options: def.options });
        Ok(id)
    }

    pub fn build(mut self) -> Result<ViewSynchronizer, StartupError> {
        let selections = &self.selections;
        self.graph.seal_named(|id| selections.get(id).name.as_str())?;

        // Defaults, then the startup cascade. Parents are registered before
        // their children, so id order is a valid cascade order.
        for (id, values) in std::mem::take(&mut self.defaults) {
            self.selections.set_values(id, values);
        }
        for i in 0..self.selections.count() {
            self.selections.cascade(SelectionId::new(i));
        }

        let counts = Arc::new(GroupedCountTable::build(&self.store));
        let mut ledger = Ledger::new();
        ledger.ensure_capacity(self.views.len());

        info!(selections = self.selections.count(), views = self.views.len(), policy = ?self.policy, "Synchronizer ready");

        let mut sync = ViewSynchronizer {
            store: self.store,
            taxonomy: self.taxonomy,
            styles: self.styles,
            counts,
            selections: self.selections,
            graph: self.graph,
            pending: (0..self.views.len()).map(ViewId::new).collect(),
            hidden: BTreeSet::new(),
            views: self.views,
            view_names: self.view_names,
            ledger,
            policy: self.policy,
        };
        if sync.policy == RecomputePolicy::Eager {
            for i in 0..sync.views.len() {
                sync.output(ViewId::new(i));
            }
        }
        Ok(sync)
    }

    /// Selections and views share one namespace.
    fn ensure_unique(&self, name: &str) -> Result<(), GraphError> {
        if self.view_names.contains_key(name) || self.selections.id_of(name).is_ok() {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn check_categories(&self, view: &str, id: SelectionId) -> Result<(), ConfigurationError> {
        let node = self.selections.get(id);
        let bad = if node.is_child() {
            Some(node.name.clone())
        } else {
            node.available_options().iter().find(|o| self.taxonomy.leaves_of(o).is_err()).cloned()
        };
        match bad {
            None => Ok(()),
            Some(what) => Err(ConfigurationError::Invalid(format!(
                "view '{view}' expands '{}' as categories, but '{what}' is not a taxonomy category",
                node.name
            ))),
        }
    }
}

pub struct ViewSynchronizer {
    store: Arc<DatasetStore>,
    taxonomy: Arc<GroupTaxonomy>,
    styles: Arc<StyleTable>,
    counts: Arc<GroupedCountTable>,
    selections: SelectionRegistry,
    graph: DependencyGraph,
    views: Vec<ViewMeta>,
    view_names: HashMap<String, ViewId>,
    ledger: Ledger,
    /// Views whose output changed since they were last handed to a sink.
    pending: BTreeSet<ViewId>,
    hidden: BTreeSet<ViewId>,
    policy: RecomputePolicy,
}

impl ViewSynchronizer {
    /// Applies one user-selection event. A rejected event changes nothing;
    /// an event that leaves the value set as it was is a no-op.
    pub fn apply(&mut self, event: &SelectionEvent) -> Result<ChangeReport, SelectionError> {
        let id = self.selections.id_of(&event.node)?;
        let values = self.selections.normalize(id, &event.values)?;

        if !self.selections.set_values(id, values) {
            debug!(node = %event.node, "Selection unchanged");
            return Ok(ChangeReport::default());
        }

        let mut changed = vec![id];
        for child in self.graph.cascade_descendants(id) {
            self.selections.cascade(child);
            debug!(node = %self.selections.get(child).name, options = self.selections.get(child).available_options().len(), "Cascaded");
            changed.push(child);
        }

        let dirtied: Vec<ViewId> = self.graph.views_reading(&changed).into_iter().collect();
        self.ledger.invalidate(dirtied.iter().copied());
        self.pending.extend(dirtied.iter().copied());

        info!(node = %event.node, cascaded = changed.len() - 1, dirtied = dirtied.len(), "Selection applied");

        if self.policy == RecomputePolicy::Eager {
            for &v in &dirtied {
                self.output(v);
            }
        }
        Ok(ChangeReport { changed, dirtied })
    }

    /// Current output of `view`, recomputed first if dirty.
    pub fn output(&mut self, view: ViewId) -> &ViewResult {
        let meta = &self.views[view.index()];
        let engine = Engine::new(&self.store, &self.counts, &self.styles);
        let (selections, graph, taxonomy) = (&self.selections, &self.graph, &self.taxonomy);

        self.ledger.get_or_compute(view, || {
            let filters = resolve_filters(selections, graph, taxonomy, view, meta.resolve);
            debug!(view = %meta.name, labels = filters.labels.len(), "Recomputing view");
            engine.run(meta.pipeline, &filters, &meta.options)
        })
    }

    /// The cached output without triggering a recompute.
    pub fn last_output(&self, view: ViewId) -> Option<&ViewResult> { self.ledger.get(view) }

    /// Pushes every visible view whose output changed since its last push.
    /// Returns the number of views handed to the sink.
    pub fn render_pending(&mut self, sink: &mut dyn RenderSink) -> usize {
        let due: Vec<ViewId> = self.pending.iter().filter(|v| !self.hidden.contains(*v)).copied().collect();
        for &v in &due {
            self.pending.remove(&v);
            self.push(v, sink);
        }
        due.len()
    }

    /// Pushes every visible view regardless of pending state.
    pub fn render_all(&mut self, sink: &mut dyn RenderSink) -> usize {
        let visible: Vec<ViewId> = (0..self.views.len()).map(ViewId::new).filter(|v| !self.hidden.contains(v)).collect();
        for &v in &visible {
            self.pending.remove(&v);
            self.push(v, sink);
        }
        visible.len()
    }

    fn push(&mut self, view: ViewId, sink: &mut dyn RenderSink) {
        let name = self.views[view.index()].name.clone();
        match self.output(view) {
            Ok(out) => sink.render(&name, &out.chart),
            Err(e) => sink.report(&name, e),
        }
    }

    /// Hidden views are skipped by rendering, so under the lazy policy they
    /// stay dirty until shown again.
    pub fn set_visible(&mut self, view: ViewId, visible: bool) {
        if visible {
            self.hidden.remove(&view);
        } else {
            self.hidden.insert(view);
        }
    }

    /// Labels `view` would be filtered to under the current selection.
    pub fn resolve(&self, view: ViewId) -> ResolvedFilters {
        resolve_filters(&self.selections, &self.graph, &self.taxonomy, view, self.views[view.index()].resolve)
    }

    // --- Accessors ---

    pub fn view_id(&self, name: &str) -> Result<ViewId, NotFound> {
        self.view_names.get(name).copied().ok_or_else(|| NotFound { kind: "view", name: name.to_string() })
    }

    pub fn view_name(&self, view: ViewId) -> &str { &self.views[view.index()].name }
    pub fn view_count(&self) -> usize { self.views.len() }
    pub fn is_dirty(&self, view: ViewId) -> bool { self.ledger.is_dirty(view) }
    pub fn recompute_count(&self, view: ViewId) -> u64 { self.ledger.recompute_count(view) }
    pub fn is_pending(&self, view: ViewId) -> bool { self.pending.contains(&view) }

    /// Selection ids `view` declares it reads.
    pub fn dependency_set(&self, view: ViewId) -> &[SelectionId] { self.graph.reads_of(view) }

    pub fn selection(&self, name: &str) -> Result<&SelectionNode, SelectionError> {
        Ok(self.selections.get(self.selections.id_of(name)?))
    }

    pub fn selection_by_id(&self, id: SelectionId) -> &SelectionNode { self.selections.get(id) }
    pub fn selections(&self) -> impl Iterator<Item = &SelectionNode> { self.selections.iter() }
    pub fn graph(&self) -> &DependencyGraph { &self.graph }
}

/// Ordered union of the labels contributed by each read selection.
fn resolve_filters(
    selections: &SelectionRegistry,
    graph: &DependencyGraph,
    taxonomy: &GroupTaxonomy,
    view: ViewId,
    resolve: Resolve,
) -> ResolvedFilters {
    let mut labels: Vec<String> = Vec::new();
    for &read in graph.reads_of(view) {
        for value in selections.get(read).current_values() {
            let expanded: &[String] = match resolve {
                Resolve::Labels => std::slice::from_ref(value),
                // Category options were checked at build time.
                Resolve::Categories => taxonomy.leaves_of(value).unwrap_or(&[]),
            };
            for label in expanded {
                if !labels.contains(label) {
                    labels.push(label.clone());
                }
            }
        }
    }
    ResolvedFilters { labels }
}
