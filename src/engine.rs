use std::collections::{HashSet, VecDeque};

use egui::{Pos2, Rect};
use log::debug;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::{self, Incoming, Outgoing};

use crate::config::EngineConfig;
use crate::filter::{ActiveSet, ViewFilter};
use crate::graph::Graph;
use crate::modes::LayoutMode;
use crate::sim::{SimState, Simulation};
use crate::snapshot::{EdgeSnapshot, FrameSnapshot, NodeSnapshot};

#[cfg(feature = "events")]
use crate::events::{
    Event, EventSink, PayloadFilterApplied, PayloadModeChanged, PayloadNodeDragEnd,
    PayloadNodeDragStart, PayloadNodeExpandToggle, PayloadNodeHoverEnter, PayloadNodeHoverLeave,
    PayloadSettled,
};

/// Current hover-highlight state: the hovered node, every ancestor and
/// descendant reachable over hierarchy-kind edges, and the edges between
/// members.
#[derive(Debug, Clone, Default)]
struct Highlight {
    origin: Option<NodeIndex>,
    nodes: HashSet<NodeIndex>,
    edges: HashSet<EdgeIndex>,
}

impl Highlight {
    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn clear(&mut self) {
        self.origin = None;
        self.nodes.clear();
        self.edges.clear();
    }
}

/// The layout engine: owns the graph records, the active-subgraph
/// projection, the integrator and all interaction state.
///
/// The host drives it cooperatively, one [`Engine::tick`] per frame, and
/// pushes every state change through an explicit method (`set_filter`,
/// `set_mode`, drag/hover/expand handlers) rather than relying on reactive
/// re-renders. All work inside one tick is synchronous and bounded by the
/// active subgraph size; nothing here blocks or schedules frames.
pub struct Engine {
    g: Graph,
    cfg: EngineConfig,
    mode: LayoutMode,
    filter: ViewFilter,
    active: ActiveSet,
    sim: Simulation,
    canvas: Rect,

    highlight: Highlight,
    expanded: HashSet<NodeIndex>,
    /// Ticks until a cleared hover actually empties the highlight.
    hover_linger: Option<u32>,
    dragged: Option<NodeIndex>,
    stopped: bool,

    #[cfg(feature = "events")]
    sink: Option<Box<dyn EventSink>>,
}

impl Engine {
    pub fn new(graph: Graph, cfg: EngineConfig) -> Self {
        let filter = ViewFilter::default();
        let active = ActiveSet::project(&graph, &filter);
        let sim = Simulation::from_state(SimState {
            alpha: cfg.sim.alpha,
            ..SimState::default()
        });
        Self {
            g: graph,
            cfg,
            mode: LayoutMode::default(),
            filter,
            active,
            sim,
            canvas: Rect::from_min_max(Pos2::ZERO, Pos2::new(800., 600.)),
            highlight: Highlight::default(),
            expanded: HashSet::new(),
            hover_linger: None,
            dragged: None,
            stopped: false,
            #[cfg(feature = "events")]
            sink: None,
        }
    }

    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_canvas(mut self, canvas: Rect) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_filter(mut self, filter: ViewFilter) -> Self {
        self.filter = filter;
        self.active = ActiveSet::project(&self.g, &self.filter);
        self
    }

    #[cfg(feature = "events")]
    /// Supply a sink that will receive interaction and lifecycle events.
    /// Works with `crossbeam::channel::Sender<Event>`, closures `Fn(Event)`,
    /// or custom implementations.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.g
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Replaces the tuning knobs. Takes effect on the next tick; no reheat.
    pub fn set_config(&mut self, cfg: EngineConfig) {
        self.cfg = cfg;
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    pub fn is_settled(&self) -> bool {
        self.sim.is_settled(&self.cfg)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn alpha(&self) -> f32 {
        self.sim.alpha()
    }

    /// Re-projects the active subgraph for new toggles and reheats the
    /// integrator so the layout resettles instead of snapping. Toggles that
    /// match nothing still produce an equal projection and are harmless.
    pub fn set_filter(&mut self, filter: ViewFilter) {
        if self.stopped {
            return;
        }
        self.filter = filter;
        self.active = ActiveSet::project(&self.g, &self.filter);
        self.sim.reheat(self.cfg.sim.reheat_alpha);
        debug!(
            "filter applied: {} active nodes, {} active edges",
            self.active.nodes().len(),
            self.active.edges().len()
        );
        #[cfg(feature = "events")]
        self.publish(Event::FilterApplied(PayloadFilterApplied {
            active_nodes: self.active.nodes().len(),
            active_edges: self.active.edges().len(),
        }));
    }

    /// Discrete mode switch: re-registers the distance/strength/position
    /// functions and restarts integration at elevated alpha.
    pub fn set_mode(&mut self, mode: LayoutMode) {
        if self.stopped || mode == self.mode {
            return;
        }
        self.mode = mode;
        self.sim.reheat(self.cfg.sim.reheat_alpha);
        debug!("layout mode switched to {mode:?}");
        #[cfg(feature = "events")]
        self.publish(Event::ModeChanged(PayloadModeChanged { mode }));
    }

    /// Advances the simulation one tick and returns the frame snapshot, or
    /// `None` once the engine is stopped.
    pub fn tick(&mut self) -> Option<FrameSnapshot> {
        if self.stopped {
            return None;
        }

        if let Some(remaining) = self.hover_linger {
            if remaining == 0 {
                self.hover_linger = None;
                self.highlight.clear();
            } else {
                self.hover_linger = Some(remaining - 1);
            }
        }

        let was_settled = self.sim.is_settled(&self.cfg);
        self.sim
            .step(&mut self.g, &self.active, &self.cfg, self.mode, self.canvas);

        #[cfg(feature = "events")]
        if !was_settled && self.sim.is_settled(&self.cfg) {
            self.publish(Event::Settled(PayloadSettled {
                steps: self.sim.state().step_count,
            }));
        }
        #[cfg(not(feature = "events"))]
        let _ = was_settled;

        Some(self.snapshot())
    }

    /// Stops the engine permanently: no further ticks run, no node or edge
    /// state is mutated afterwards, and interaction resources are released.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.highlight.clear();
        self.hover_linger = None;
        self.dragged = None;
        #[cfg(feature = "events")]
        {
            self.sink = None;
        }
    }

    // ----- drag / pin -----

    /// Pins the node at its current location and keeps the simulation warm
    /// while the drag lasts.
    pub fn drag_start(&mut self, id: &str) {
        if self.stopped {
            return;
        }
        let Some(idx) = self.g.node_index(id) else {
            return;
        };
        self.dragged = Some(idx);
        if let Some(node) = self.g.node_mut(idx) {
            let loc = node.location();
            node.set_fixed(Some(loc));
        }
        let target = self.cfg.sim.interaction_alpha_target;
        self.sim.set_alpha_target(target);
        self.sim.reheat(target);
        #[cfg(feature = "events")]
        self.publish(Event::NodeDragStart(PayloadNodeDragStart {
            id: id.to_string(),
        }));
    }

    /// Moves the pin to the pointer location.
    pub fn drag_move(&mut self, id: &str, pos: Pos2) {
        if self.stopped {
            return;
        }
        let Some(idx) = self.g.node_index(id) else {
            return;
        };
        if let Some(node) = self.g.node_mut(idx) {
            node.set_fixed(Some(pos));
            node.set_location(pos);
        }
    }

    /// Releases the pin and lets the system cool naturally.
    pub fn drag_end(&mut self, id: &str) {
        if self.stopped {
            return;
        }
        let Some(idx) = self.g.node_index(id) else {
            return;
        };
        if let Some(node) = self.g.node_mut(idx) {
            node.set_fixed(None);
        }
        self.dragged = None;
        self.sim.set_alpha_target(0.);
        #[cfg(feature = "events")]
        self.publish(Event::NodeDragEnd(PayloadNodeDragEnd {
            id: id.to_string(),
        }));
    }

    pub fn dragged_node(&self) -> Option<&str> {
        self.dragged
            .and_then(|idx| self.g.node(idx))
            .map(crate::elements::Node::id)
    }

    // ----- hover highlight -----

    /// Computes the highlight for the hovered node. Re-hovering the node
    /// that is already current does not recompute and triggers no side
    /// effects beyond cancelling a pending clear.
    pub fn hover_enter(&mut self, id: &str) {
        if self.stopped {
            return;
        }
        let Some(idx) = self.g.node_index(id) else {
            return;
        };
        if self.highlight.origin == Some(idx) {
            self.hover_linger = None;
            return;
        }

        self.hover_linger = None;
        let mut nodes = self.traverse(idx, Outgoing);
        nodes.extend(self.traverse(idx, Incoming));

        let edges = self
            .g
            .edges_iter()
            .filter_map(|(edge_idx, _)| {
                let (s, t) = self.g.edge_endpoints(edge_idx)?;
                (nodes.contains(&s) && nodes.contains(&t)).then_some(edge_idx)
            })
            .collect();

        self.highlight = Highlight {
            origin: Some(idx),
            nodes,
            edges,
        };

        if self.cfg.hover.dynamic {
            self.sim.reheat(self.cfg.sim.interaction_alpha_target);
        }
        #[cfg(feature = "events")]
        self.publish(Event::NodeHoverEnter(PayloadNodeHoverEnter {
            id: id.to_string(),
        }));
    }

    /// Schedules the highlight to clear after the configured linger. Leaving
    /// a node that is not the current hover is a no-op.
    pub fn hover_leave(&mut self, id: &str) {
        if self.stopped {
            return;
        }
        let Some(idx) = self.g.node_index(id) else {
            return;
        };
        if self.highlight.origin != Some(idx) {
            return;
        }
        self.hover_linger = Some(self.cfg.hover.linger_ticks);
        #[cfg(feature = "events")]
        self.publish(Event::NodeHoverLeave(PayloadNodeHoverLeave {
            id: id.to_string(),
        }));
    }

    pub fn hovered_node(&self) -> Option<&str> {
        self.highlight
            .origin
            .and_then(|idx| self.g.node(idx))
            .map(crate::elements::Node::id)
    }

    /// Ids of currently highlighted nodes, sorted for stable output.
    pub fn highlighted_node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .highlight
            .nodes
            .iter()
            .filter_map(|&idx| self.g.node(idx))
            .map(|n| n.id().to_string())
            .collect();
        ids.sort();
        ids
    }

    /// Endpoint id pairs of currently highlighted edges, sorted.
    pub fn highlighted_edge_endpoints(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .highlight
            .edges
            .iter()
            .filter_map(|&edge_idx| {
                let (s, t) = self.g.edge_endpoints(edge_idx)?;
                Some((
                    self.g.node(s)?.id().to_string(),
                    self.g.node(t)?.id().to_string(),
                ))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// All nodes reachable forward from `id` over hierarchy-kind edges,
    /// including `id` itself. Sorted for stable output.
    pub fn downstream(&self, id: &str) -> Vec<String> {
        self.reachable(id, Outgoing)
    }

    /// All nodes reaching into `id` over hierarchy-kind edges, including
    /// `id` itself. Sorted for stable output.
    pub fn upstream(&self, id: &str) -> Vec<String> {
        self.reachable(id, Incoming)
    }

    fn reachable(&self, id: &str, dir: Direction) -> Vec<String> {
        let Some(idx) = self.g.node_index(id) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = self
            .traverse(idx, dir)
            .into_iter()
            .filter_map(|i| self.g.node(i))
            .map(|n| n.id().to_string())
            .collect();
        ids.sort();
        ids
    }

    /// BFS restricted to hierarchy-kind edges; cluster edges never extend a
    /// highlight.
    fn traverse(&self, start: NodeIndex, dir: Direction) -> HashSet<NodeIndex> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for edge in self.g.edges_directed(idx, dir) {
                if !edge.weight().kind().is_hierarchical() {
                    continue;
                }
                let next = match dir {
                    Outgoing => edge.target(),
                    Incoming => edge.source(),
                };
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    // ----- expand / collapse -----

    /// Toggles a node's membership in the expanded set (hierarchical mode
    /// only). Expanding kicks the node's children onto a ring around it with
    /// a one-time velocity impulse; collapsing applies no corrective force
    /// and lets the graph resettle on its own.
    pub fn toggle_expand(&mut self, id: &str) {
        if self.stopped || self.mode != LayoutMode::Hierarchical {
            return;
        }
        let Some(idx) = self.g.node_index(id) else {
            return;
        };

        let now_expanded = if self.expanded.contains(&idx) {
            self.expanded.remove(&idx);
            false
        } else {
            self.expanded.insert(idx);
            true
        };

        if now_expanded {
            self.apply_expand_impulse(idx);
            self.sim.reheat(self.cfg.sim.reheat_alpha);
        }
        #[cfg(feature = "events")]
        self.publish(Event::NodeExpandToggle(PayloadNodeExpandToggle {
            id: id.to_string(),
            expanded: now_expanded,
        }));
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.g
            .node_index(id)
            .is_some_and(|idx| self.expanded.contains(&idx))
    }

    fn apply_expand_impulse(&mut self, idx: NodeIndex) {
        let Some(center) = self.g.node(idx).map(crate::elements::Node::location) else {
            return;
        };
        let children: Vec<NodeIndex> = self
            .g
            .edges_directed(idx, Outgoing)
            .filter(|e| e.weight().kind().is_hierarchical())
            .map(|e| e.target())
            .collect();
        if children.is_empty() {
            return;
        }

        let params = &self.cfg.expand;
        let count = children.len() as f32;
        for (i, child_idx) in children.into_iter().enumerate() {
            let angle = std::f32::consts::TAU * (i as f32) / count;
            let target = Pos2::new(
                center.x + params.ring_radius * angle.cos(),
                center.y + params.ring_radius * angle.sin(),
            );
            if let Some(child) = self.g.node_mut(child_idx) {
                let dv = (target - child.location()) * params.impulse;
                child.add_velocity(dv);
            }
        }
    }

    // ----- snapshot -----

    fn snapshot(&self) -> FrameSnapshot {
        let dimming = !self.highlight.is_empty();
        let boost = if self.cfg.hover.dynamic {
            self.cfg.hover.boost
        } else {
            1.
        };

        let mut nodes = Vec::new();
        for &idx in self.active.nodes() {
            let Some(node) = self.g.node(idx) else {
                continue;
            };
            if node.is_helper() {
                continue;
            }
            let highlighted = self.highlight.nodes.contains(&idx);
            let radius = if highlighted {
                node.radius() * boost
            } else {
                node.radius()
            };
            nodes.push(NodeSnapshot {
                id: node.id().to_string(),
                label: node.label().to_string(),
                kind: node.kind(),
                x: node.location().x,
                y: node.location().y,
                radius,
                highlighted,
                dimmed: dimming && !highlighted,
            });
        }

        let mut edges = Vec::new();
        for &edge_idx in self.active.edges() {
            let Some((s, t)) = self.g.edge_endpoints(edge_idx) else {
                continue;
            };
            let (Some(source), Some(target)) = (self.g.node(s), self.g.node(t)) else {
                continue;
            };
            if source.is_helper() || target.is_helper() {
                continue;
            }
            let Some(edge) = self.g.edge(edge_idx) else {
                continue;
            };
            let highlighted = self.highlight.edges.contains(&edge_idx);
            edges.push(EdgeSnapshot {
                source: source.id().to_string(),
                target: target.id().to_string(),
                kind: edge.kind(),
                strength: edge.strength(),
                highlighted,
                dimmed: dimming && !highlighted,
            });
        }

        FrameSnapshot {
            nodes,
            edges,
            alpha: self.sim.alpha(),
            settled: self.is_settled(),
        }
    }

    #[cfg(feature = "events")]
    fn publish(&self, event: Event) {
        if let Some(sink) = &self.sink {
            sink.publish(event);
        }
    }
}
