// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::model::{NodeId, NodeKind, NodeMap, TreeEdge};
use crate::store::TreeStore;

/// Node footprint and separations, in output units (pixels or terminal cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub node_width: u32,
    pub node_height: u32,
    /// Horizontal gap between neighbours in a rank.
    pub node_sep: u32,
    /// Vertical gap between ranks.
    pub rank_sep: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { node_width: 200, node_height: 120, node_sep: 100, rank_sep: 80 }
    }
}

impl LayoutConfig {
    /// Character-cell footprint used by the terminal renderer.
    pub fn terminal() -> Self {
        Self { node_width: 26, node_height: 5, node_sep: 2, rank_sep: 3 }
    }

    fn column_step(&self) -> i64 {
        i64::from(self.node_width) + i64::from(self.node_sep)
    }

    fn rank_step(&self) -> u32 {
        self.node_height.saturating_add(self.rank_sep)
    }
}

/// Top-left corner of a node footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedNode {
    id: NodeId,
    kind: NodeKind,
    rank: usize,
    order: usize,
    position: Position,
    size: Size,
}

impl PositionedNode {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Depth in the layered layout (0 = top).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Index within the rank, left to right.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn center_x(&self) -> u32 {
        self.position.x.saturating_add(self.size.width / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePath {
    SmoothStep,
}

/// Visual styling shared by every tree edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    pub path: EdgePath,
    /// Arrowhead at the child end.
    pub directed: bool,
    pub animated: bool,
    pub stroke: &'static str,
    pub stroke_width: u32,
}

impl EdgeStyle {
    pub const TREE: Self = Self {
        path: EdgePath::SmoothStep,
        directed: true,
        animated: false,
        stroke: "#6b7280",
        stroke_width: 2,
    };
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::TREE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdge {
    id: String,
    source: NodeId,
    target: NodeId,
    style: EdgeStyle,
}

impl LayoutEdge {
    /// `<parent>-<child>`
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeLayout {
    config: LayoutConfig,
    nodes: BTreeMap<NodeId, PositionedNode>,
    ranks: Vec<Vec<NodeId>>,
    edges: Vec<LayoutEdge>,
    width: u32,
    height: u32,
}

impl TreeLayout {
    /// Footprint and separations this layout was computed with.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, PositionedNode> {
        &self.nodes
    }

    pub fn node(&self, node_id: &str) -> Option<&PositionedNode> {
        self.nodes.get(node_id)
    }

    /// Node ids per rank, each rank ordered left to right.
    pub fn ranks(&self) -> &[Vec<NodeId>] {
        &self.ranks
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids, rank by rank, left to right.
    pub fn layout_order(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.ranks.iter().flatten()
    }

    /// The node `offset` places away from `node_id` within its rank.
    pub fn rank_neighbor(&self, node_id: &str, offset: isize) -> Option<&NodeId> {
        let node = self.nodes.get(node_id)?;
        let rank = self.ranks.get(node.rank)?;
        let target = node.order.checked_add_signed(offset)?;
        rank.get(target)
    }
}

/// Lays out the store's current mapping.
pub fn layout_store(store: &TreeStore, config: &LayoutConfig) -> TreeLayout {
    layout_tree(store.nodes(), &store.edges(), config)
}

/// Deterministic layered layout, top to bottom.
///
/// - Orders nodes topologically (smallest id first); a stalled order, which only an inconsistent
///   import can produce, is broken by forcing the smallest remaining node.
/// - Assigns ranks by longest path over forward edges.
/// - Orders each rank with one downward barycenter sweep; siblings keep their `children` order.
/// - Places parents centred over their children (bottom-up), then carries each parent's shift
///   down to its children (top-down), keeping `node_sep` between neighbours throughout.
///
/// Edges naming unknown nodes, self-loops and repeated edges are dropped.
pub fn layout_tree(nodes: &NodeMap, edges: &[TreeEdge], config: &LayoutConfig) -> TreeLayout {
    let graph = Graph::new(nodes, edges);
    let topo = graph.topo_order(nodes);
    let rank_of = graph.assign_ranks(&topo);

    let rank_count = rank_of.values().copied().max().map_or(0, |max| max + 1);
    let mut ranks = vec![Vec::<&NodeId>::new(); rank_count];
    for node_id in nodes.keys() {
        let rank = rank_of.get(node_id).copied().unwrap_or(0);
        ranks[rank].push(node_id);
    }
    graph.order_ranks(&mut ranks);

    let columns = assign_columns(&ranks, &graph, &rank_of, config.column_step());
    let min_x = columns.values().copied().min().unwrap_or(0);

    let size = Size { width: config.node_width, height: config.node_height };
    let mut placed = BTreeMap::<NodeId, PositionedNode>::new();
    let mut width = 0u32;
    for (rank, rank_nodes) in ranks.iter().enumerate() {
        let y = u32::try_from(rank).unwrap_or(u32::MAX).saturating_mul(config.rank_step());
        for (order, node_id) in rank_nodes.iter().enumerate() {
            let Some(node) = nodes.get(*node_id) else {
                continue;
            };
            let column = columns.get(node_id).copied().unwrap_or(min_x) - min_x;
            let x = u32::try_from(column).unwrap_or(u32::MAX);
            width = width.max(x.saturating_add(config.node_width));
            placed.insert(
                (*node_id).clone(),
                PositionedNode {
                    id: (*node_id).clone(),
                    kind: node.kind(),
                    rank,
                    order,
                    position: Position { x, y },
                    size,
                },
            );
        }
    }

    let height = match u32::try_from(rank_count).unwrap_or(u32::MAX) {
        0 => 0,
        count => count
            .saturating_mul(config.node_height)
            .saturating_add((count - 1).saturating_mul(config.rank_sep)),
    };

    let edges = graph
        .edges
        .iter()
        .map(|(source, target)| LayoutEdge {
            id: format!("{source}-{target}"),
            source: (*source).clone(),
            target: (*target).clone(),
            style: EdgeStyle::TREE,
        })
        .collect::<Vec<_>>();

    debug!(nodes = placed.len(), edges = edges.len(), ranks = rank_count, "laid out tree");

    TreeLayout {
        config: *config,
        nodes: placed,
        ranks: ranks.into_iter().map(|rank| rank.into_iter().cloned().collect()).collect(),
        edges,
        width,
        height,
    }
}

/// Validated adjacency over the nodes of one layout run.
struct Graph<'a> {
    /// Kept edges in input order.
    edges: Vec<(&'a NodeId, &'a NodeId)>,
    outgoing: BTreeMap<&'a NodeId, Vec<&'a NodeId>>,
    incoming: BTreeMap<&'a NodeId, Vec<&'a NodeId>>,
}

impl<'a> Graph<'a> {
    fn new(nodes: &'a NodeMap, edges: &'a [TreeEdge]) -> Self {
        let mut seen = BTreeSet::<(&NodeId, &NodeId)>::new();
        let mut kept = Vec::new();
        let mut outgoing = BTreeMap::<&NodeId, Vec<&NodeId>>::new();
        let mut incoming = BTreeMap::<&NodeId, Vec<&NodeId>>::new();

        for edge in edges {
            let (parent, child) = (edge.parent(), edge.child());
            if !nodes.contains_key(parent) || !nodes.contains_key(child) {
                debug!(edge = %edge.edge_id(), "dropping edge to unknown node");
                continue;
            }
            if parent == child || !seen.insert((parent, child)) {
                debug!(edge = %edge.edge_id(), "dropping self-loop or repeated edge");
                continue;
            }
            kept.push((parent, child));
            outgoing.entry(parent).or_default().push(child);
            incoming.entry(child).or_default().push(parent);
        }

        Self { edges: kept, outgoing, incoming }
    }

    fn successors(&self, node_id: &NodeId) -> &[&'a NodeId] {
        self.outgoing.get(node_id).map_or(&[], Vec::as_slice)
    }

    fn predecessors(&self, node_id: &NodeId) -> &[&'a NodeId] {
        self.incoming.get(node_id).map_or(&[], Vec::as_slice)
    }

    fn topo_order(&self, nodes: &'a NodeMap) -> Vec<&'a NodeId> {
        let mut indegree = nodes
            .keys()
            .map(|node_id| (node_id, self.predecessors(node_id).len()))
            .collect::<BTreeMap<_, _>>();
        let mut ready = indegree
            .iter()
            .filter_map(|(node_id, degree)| (*degree == 0).then_some(*node_id))
            .collect::<BTreeSet<_>>();
        let mut done = BTreeSet::<&NodeId>::new();
        let mut topo = Vec::with_capacity(indegree.len());

        while topo.len() < indegree.len() {
            let next = match ready.pop_first() {
                Some(node_id) => node_id,
                None => {
                    let Some(forced) = indegree.keys().copied().find(|id| !done.contains(id)) else {
                        break;
                    };
                    warn!(node = %forced, "parent links form a cycle; breaking it for layout");
                    forced
                }
            };
            if !done.insert(next) {
                continue;
            }
            topo.push(next);

            for to in self.successors(next) {
                if done.contains(to) {
                    continue;
                }
                if let Some(degree) = indegree.get_mut(to) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        ready.insert(*to);
                    }
                }
            }
        }

        topo
    }

    /// Longest-path ranks over forward edges (edges that point later in `topo`).
    fn assign_ranks(&self, topo: &[&'a NodeId]) -> BTreeMap<&'a NodeId, usize> {
        let position =
            topo.iter().enumerate().map(|(idx, id)| (*id, idx)).collect::<BTreeMap<_, _>>();
        let mut ranks = topo.iter().map(|id| (*id, 0usize)).collect::<BTreeMap<_, _>>();

        for from in topo {
            let from_rank = ranks.get(from).copied().unwrap_or(0);
            let from_pos = position.get(from).copied().unwrap_or(0);
            for to in self.successors(from) {
                if position.get(to).copied().unwrap_or(0) <= from_pos {
                    continue;
                }
                let rank = ranks.entry(*to).or_insert(0);
                *rank = (*rank).max(from_rank + 1);
            }
        }

        ranks
    }

    /// One downward barycenter sweep. Ranks must start sorted by id.
    fn order_ranks(&self, ranks: &mut [Vec<&'a NodeId>]) {
        for rank_idx in 1..ranks.len() {
            let prev_positions = ranks[rank_idx - 1]
                .iter()
                .enumerate()
                .map(|(idx, id)| (*id, idx))
                .collect::<BTreeMap<_, _>>();

            let mut keyed = ranks[rank_idx]
                .iter()
                .map(|node_id| (self.order_key(node_id, &prev_positions), *node_id))
                .collect::<Vec<_>>();
            keyed.sort_by(|(key_a, id_a), (key_b, id_b)| {
                key_a.compare(key_b).then_with(|| id_a.cmp(id_b))
            });
            ranks[rank_idx] = keyed.into_iter().map(|(_, id)| id).collect();
        }
    }

    fn order_key(&self, node_id: &NodeId, prev_positions: &BTreeMap<&NodeId, usize>) -> OrderKey {
        let mut sum = 0usize;
        let mut count = 0usize;
        let mut leftmost: Option<(usize, &NodeId)> = None;
        for pred in self.predecessors(node_id) {
            let Some(pos) = prev_positions.get(pred).copied() else {
                continue;
            };
            sum += pos;
            count += 1;
            if leftmost.map_or(true, |(best, _)| pos < best) {
                leftmost = Some((pos, *pred));
            }
        }

        let child_index = leftmost
            .and_then(|(_, parent)| self.successors(parent).iter().position(|id| *id == node_id))
            .unwrap_or(usize::MAX);

        OrderKey { barycenter: (count > 0).then_some((sum, count)), child_index }
    }

    /// Layout children of `node_id`: successors placed exactly one rank below it.
    fn children_in_rank(
        &self,
        node_id: &NodeId,
        rank: usize,
        rank_of: &BTreeMap<&NodeId, usize>,
    ) -> Vec<&'a NodeId> {
        self.successors(node_id)
            .iter()
            .copied()
            .filter(|child| rank_of.get(child).copied() == Some(rank + 1))
            .collect()
    }

    /// Leftmost predecessor placed exactly one rank above `node_id`.
    fn parent_in_rank(
        &self,
        node_id: &NodeId,
        rank: usize,
        rank_of: &BTreeMap<&NodeId, usize>,
        order_of: &BTreeMap<&NodeId, usize>,
    ) -> Option<&'a NodeId> {
        let parent_rank = rank.checked_sub(1)?;
        self.predecessors(node_id)
            .iter()
            .copied()
            .filter(|pred| rank_of.get(pred).copied() == Some(parent_rank))
            .min_by_key(|pred| order_of.get(pred).copied().unwrap_or(usize::MAX))
    }
}

#[derive(Debug, Clone, Copy)]
struct OrderKey {
    /// `(sum, count)` of predecessor positions in the previous rank.
    barycenter: Option<(usize, usize)>,
    /// Position among the leftmost parent's children.
    child_index: usize,
}

impl OrderKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self.barycenter, other.barycenter) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
                // sum_a/count_a vs sum_b/count_b without floats.
                let left = (sum_a as u128) * (count_b as u128);
                let right = (sum_b as u128) * (count_a as u128);
                left.cmp(&right).then_with(|| self.child_index.cmp(&other.child_index))
            }
        }
    }
}

/// Horizontal positions (left edges), not yet shifted to start at 0.
fn assign_columns<'a>(
    ranks: &[Vec<&'a NodeId>],
    graph: &Graph<'a>,
    rank_of: &BTreeMap<&'a NodeId, usize>,
    step: i64,
) -> BTreeMap<&'a NodeId, i64> {
    let mut first_pass = BTreeMap::<&NodeId, i64>::new();
    let mut centred = BTreeMap::<&NodeId, i64>::new();

    for (rank, rank_nodes) in ranks.iter().enumerate().rev() {
        let mut next_free: Option<i64> = None;
        for node_id in rank_nodes {
            let (mut lo, mut hi) = (None::<i64>, None::<i64>);
            for child in graph.children_in_rank(node_id, rank, rank_of) {
                if let Some(x) = first_pass.get(child).copied() {
                    lo = Some(lo.map_or(x, |lo| lo.min(x)));
                    hi = Some(hi.map_or(x, |hi| hi.max(x)));
                }
            }
            let desired = lo.zip(hi).map(|(lo, hi)| lo + (hi - lo) / 2);
            if let Some(desired) = desired {
                centred.insert(*node_id, desired);
            }

            let x = match (desired, next_free) {
                (Some(desired), Some(free)) => desired.max(free),
                (Some(desired), None) => desired,
                (None, Some(free)) => free,
                (None, None) => 0,
            };
            first_pass.insert(*node_id, x);
            next_free = Some(x + step);
        }
    }

    let order_of = ranks
        .iter()
        .flat_map(|rank| rank.iter().enumerate().map(|(idx, id)| (*id, idx)))
        .collect::<BTreeMap<_, _>>();

    let mut columns = BTreeMap::<&NodeId, i64>::new();
    for (rank, rank_nodes) in ranks.iter().enumerate() {
        let mut next_free: Option<i64> = None;
        for node_id in rank_nodes {
            let base = first_pass.get(node_id).copied().unwrap_or(0);
            let inherited = graph
                .parent_in_rank(node_id, rank, rank_of, &order_of)
                .and_then(|parent| {
                    let final_x = columns.get(parent).copied()?;
                    let centre = centred.get(parent).copied()?;
                    Some(final_x - centre)
                })
                .unwrap_or(0);

            let wanted = base + inherited;
            let x = next_free.map_or(wanted, |free| wanted.max(free));
            columns.insert(*node_id, x);
            next_free = Some(x + step);
        }
    }

    columns
}
