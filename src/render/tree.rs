// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::text::{canvas_to_string_trimmed, spread, truncate_with_ellipsis};
use super::{Canvas, CanvasError};
use crate::layout::{layout_store, LayoutConfig, PositionedNode, TreeLayout};
use crate::model::{NodeId, NodeMap};
use crate::store::TreeStore;

const ID_SUFFIX_LEN: usize = 8;
const MIN_NODE_WIDTH: u32 = 4;
const MIN_NODE_HEIGHT: u32 = 3;
const MIN_RANK_SEP: u32 = 2;

/// Cell rectangle of one node box in the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    /// Rightmost column (inclusive).
    pub fn right(&self) -> usize {
        self.x + self.width.saturating_sub(1)
    }

    /// Bottom row (inclusive).
    pub fn bottom(&self) -> usize {
        self.y + self.height.saturating_sub(1)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedRender {
    text: String,
    node_boxes: BTreeMap<NodeId, CellRect>,
}

impl AnnotatedRender {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn node_boxes(&self) -> &BTreeMap<NodeId, CellRect> {
        &self.node_boxes
    }

    pub fn node_box(&self, node_id: &str) -> Option<CellRect> {
        self.node_boxes.get(node_id).copied()
    }

    /// Node whose box covers the cell `(x, y)`.
    pub fn node_at(&self, x: usize, y: usize) -> Option<&NodeId> {
        self.node_boxes.iter().find(|(_, rect)| rect.contains(x, y)).map(|(node_id, _)| node_id)
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    pub fn max_line_width(&self) -> usize {
        self.text.lines().map(|line| line.chars().count()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("node footprint {width}x{height} is too small to draw (minimum 4x3)")]
    NodeTooSmall { width: u32, height: u32 },
    #[error("rank separation {rank_sep} leaves no room for connectors (minimum 2)")]
    RankSeparation { rank_sep: u32 },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Renders the store as a Unicode box diagram using the terminal footprint.
pub fn render_tree_unicode(store: &TreeStore) -> Result<String, RenderError> {
    render_tree_annotated(store).map(AnnotatedRender::into_text)
}

pub fn render_tree_annotated(store: &TreeStore) -> Result<AnnotatedRender, RenderError> {
    let layout = layout_store(store, &LayoutConfig::terminal());
    render_layout_annotated(store.nodes(), &layout)
}

/// Draws `layout` in character cells: one box per node (kind and child count, label, id
/// suffix) and elbow connectors from each parent to the children one rank below it.
///
/// Edges that skip ranks or point upwards only exist in inconsistent trees and are not drawn.
pub fn render_layout_annotated(
    nodes: &NodeMap,
    layout: &TreeLayout,
) -> Result<AnnotatedRender, RenderError> {
    let config = layout.config();
    if config.node_width < MIN_NODE_WIDTH || config.node_height < MIN_NODE_HEIGHT {
        return Err(RenderError::NodeTooSmall {
            width: config.node_width,
            height: config.node_height,
        });
    }
    if config.rank_sep < MIN_RANK_SEP {
        return Err(RenderError::RankSeparation { rank_sep: config.rank_sep });
    }
    if layout.is_empty() {
        return Ok(AnnotatedRender::default());
    }

    let mut canvas = Canvas::new(cells(layout.width()), cells(layout.height()))?;
    let mut node_boxes = BTreeMap::new();
    for placed in layout.nodes().values() {
        let rect = cell_rect(placed);
        draw_node(&mut canvas, nodes, placed, rect)?;
        node_boxes.insert(placed.id().clone(), rect);
    }
    draw_connectors(&mut canvas, layout)?;

    debug!(width = canvas.width(), height = canvas.height(), "rendered tree");
    Ok(AnnotatedRender { text: canvas_to_string_trimmed(&canvas), node_boxes })
}

fn cells(units: u32) -> usize {
    usize::try_from(units).unwrap_or(usize::MAX)
}

fn cell_rect(placed: &PositionedNode) -> CellRect {
    CellRect {
        x: cells(placed.position().x),
        y: cells(placed.position().y),
        width: cells(placed.size().width),
        height: cells(placed.size().height),
    }
}

fn child_count_text(count: usize) -> String {
    if count == 1 {
        "1 child".to_owned()
    } else {
        format!("{count} children")
    }
}

fn draw_node(
    canvas: &mut Canvas,
    nodes: &NodeMap,
    placed: &PositionedNode,
    rect: CellRect,
) -> Result<(), CanvasError> {
    canvas.draw_box(rect.x, rect.y, rect.right(), rect.bottom())?;

    let inner = rect.width.saturating_sub(4);
    let kind = placed.kind().as_str().to_uppercase();
    let (label, child_count) = nodes
        .get(placed.id())
        .map_or(("", 0), |node| (node.label(), node.children().len()));

    let rows = [
        spread(&kind, &child_count_text(child_count), inner),
        truncate_with_ellipsis(label, inner),
        truncate_with_ellipsis(&format!("ID: {}", placed.id().suffix(ID_SUFFIX_LEN)), inner),
    ];
    for (offset, row) in rows.iter().enumerate().take(rect.height.saturating_sub(2)) {
        canvas.write_str(rect.x + 2, rect.y + 1 + offset, row)?;
    }
    Ok(())
}

fn draw_connectors(canvas: &mut Canvas, layout: &TreeLayout) -> Result<(), CanvasError> {
    let mut families = BTreeMap::<&NodeId, (&PositionedNode, Vec<&PositionedNode>)>::new();
    for edge in layout.edges() {
        let (Some(parent), Some(child)) =
            (layout.node(edge.source().as_str()), layout.node(edge.target().as_str()))
        else {
            continue;
        };
        if child.rank() != parent.rank() + 1 {
            continue;
        }
        families.entry(parent.id()).or_insert_with(|| (parent, Vec::new())).1.push(child);
    }

    for (parent, children) in families.values() {
        let Some(first) = children.first() else {
            continue;
        };
        let parent_rect = cell_rect(parent);
        let parent_x = cells(parent.center_x());
        let arrow_y = cell_rect(first).y.saturating_sub(1);
        let gap_top = parent_rect.bottom() + 1;
        let bar_y = gap_top + arrow_y.saturating_sub(gap_top) / 2;

        canvas.draw_vline(parent_x, parent_rect.bottom(), bar_y)?;

        let child_xs = children.iter().map(|child| cells(child.center_x())).collect::<Vec<_>>();
        let lo = child_xs.iter().copied().fold(parent_x, usize::min);
        let hi = child_xs.iter().copied().fold(parent_x, usize::max);
        canvas.draw_hline(lo, hi, bar_y)?;

        for child_x in child_xs {
            if arrow_y > bar_y {
                canvas.draw_vline(child_x, bar_y, arrow_y - 1)?;
            }
            canvas.set_arrow_down(child_x, arrow_y)?;
        }
    }
    Ok(())
}
