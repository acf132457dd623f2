//! Terminal layout of a rendered page.
//!
//! Walks a [`DocTree`] into styled ratatui lines and remembers which line each
//! element starts on, so the [`Viewport`] can bring a node into view.

use std::collections::HashMap;

use findmark_engine::RenderTree;
use findmark_engine::search::MarkerStyle;
use findmark_engine::tree::{
    DocTree, NodeData, NodeId, ScrollBlock, ScrollIntoView, ScrollOptions,
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

fn highlight_style() -> Style {
    Style::default().bg(Color::Yellow).fg(Color::Black)
}

fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Styled lines for one subtree plus the line each element starts on.
#[derive(Debug, Default, Clone)]
pub struct PageLayout {
    lines: Vec<Line<'static>>,
    node_lines: HashMap<NodeId, usize>,
}

impl PageLayout {
    pub fn build(tree: &DocTree, from: NodeId, marker: &MarkerStyle) -> Self {
        let mut builder = LayoutBuilder::new(tree, marker);
        builder.visit(from, Style::default());
        builder.flush();
        builder.finish()
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line on which `node` starts, if it was laid out.
    pub fn line_of(&self, node: NodeId) -> Option<usize> {
        self.node_lines.get(&node).copied()
    }
}

struct LayoutBuilder<'a> {
    tree: &'a DocTree,
    marker: &'a MarkerStyle,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    line_started: bool,
    quote_depth: usize,
    list_depth: usize,
    node_lines: HashMap<NodeId, usize>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(tree: &'a DocTree, marker: &'a MarkerStyle) -> Self {
        Self {
            tree,
            marker,
            lines: Vec::new(),
            current: Vec::new(),
            line_started: false,
            quote_depth: 0,
            list_depth: 0,
            node_lines: HashMap::new(),
        }
    }

    fn finish(mut self) -> PageLayout {
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        PageLayout {
            lines: self.lines,
            node_lines: self.node_lines,
        }
    }

    fn start_line(&mut self) {
        if self.line_started {
            return;
        }
        self.line_started = true;
        if self.quote_depth > 0 {
            self.current.push(Span::styled(
                "> ".repeat(self.quote_depth),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    fn push_span(&mut self, span: Span<'static>) {
        self.start_line();
        self.current.push(span);
    }

    fn flush(&mut self) {
        if self.line_started {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
            self.line_started = false;
        }
    }

    /// One empty separator line, never two in a row.
    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.start_line();
                self.flush();
            }
            if !piece.is_empty() {
                self.push_span(Span::styled(piece.to_string(), style));
            }
        }
    }

    fn visit_children(&mut self, node: NodeId, style: Style) {
        let tree = self.tree;
        for child in tree.children(node) {
            self.visit(child, style);
        }
    }

    fn visit(&mut self, node: NodeId, style: Style) {
        let tree = self.tree;
        let tag = match tree.data(node) {
            Some(NodeData::Text(text)) => {
                self.push_text(text, style);
                return;
            }
            Some(NodeData::Element { tag, .. }) => tag.as_str(),
            None => return,
        };

        if self.marker.is_marker(tree, node) {
            self.start_line();
            self.node_lines.insert(node, self.lines.len());
            self.visit_children(node, style.patch(highlight_style()));
            return;
        }

        if let Some(level) = heading_level(tag) {
            self.blank();
            self.node_lines.insert(node, self.lines.len());
            let bold = style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
            self.push_span(Span::styled(format!("{} ", "#".repeat(level)), bold));
            self.visit_children(node, bold);
            self.blank();
            return;
        }

        match tag {
            "p" => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                self.visit_children(node, style);
                if self.list_depth == 0 {
                    self.blank();
                } else {
                    self.flush();
                }
            }
            "pre" => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                self.visit_children(node, style.fg(Color::Green));
                self.blank();
            }
            "blockquote" => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                self.quote_depth += 1;
                self.visit_children(node, style.add_modifier(Modifier::ITALIC));
                self.flush();
                self.quote_depth -= 1;
                self.blank();
            }
            "ul" | "ol" => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                self.list_depth += 1;
                self.visit_children(node, style);
                self.list_depth -= 1;
                if self.list_depth == 0 {
                    self.blank();
                }
            }
            "li" => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.push_span(Span::styled(
                    format!("{indent}• "),
                    Style::default().fg(Color::DarkGray),
                ));
                self.visit_children(node, style);
                self.flush();
            }
            "hr" => {
                self.blank();
                self.push_span(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                ));
                self.blank();
            }
            "br" => {
                self.start_line();
                self.flush();
            }
            "tr" => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                self.visit_children(node, style);
                self.flush();
            }
            "td" => {
                if self.line_started {
                    self.push_span(Span::raw(" │ "));
                }
                self.node_lines.insert(node, self.lines.len());
                self.visit_children(node, style);
            }
            "em" => self.inline(node, style.add_modifier(Modifier::ITALIC)),
            "strong" => self.inline(node, style.add_modifier(Modifier::BOLD)),
            "del" => self.inline(node, style.add_modifier(Modifier::CROSSED_OUT)),
            "a" => self.inline(node, style.add_modifier(Modifier::UNDERLINED)),
            "code" => self.inline(node, style.fg(Color::Green)),
            "span" | "sup" => self.inline(node, style),
            _ => {
                self.flush();
                self.node_lines.insert(node, self.lines.len());
                self.visit_children(node, style);
                self.flush();
            }
        }
    }

    fn inline(&mut self, node: NodeId, style: Style) {
        self.start_line();
        self.node_lines.insert(node, self.lines.len());
        self.visit_children(node, style);
    }
}

/// Scroll state of the content pane.
#[derive(Debug, Default)]
pub struct Viewport {
    layout: PageLayout,
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: PageLayout) {
        self.layout = layout;
        self.clamp();
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    /// First visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self.offset.saturating_add_signed(delta);
        self.clamp();
    }

    fn max_offset(&self) -> usize {
        self.layout.len().saturating_sub(self.height)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

impl ScrollIntoView<NodeId> for Viewport {
    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) {
        let Some(line) = self.layout.line_of(node) else {
            log::trace!("{node:?} is not laid out, not scrolling");
            return;
        };
        let target = match options.block {
            ScrollBlock::Start => line,
            ScrollBlock::Center => line.saturating_sub(self.height / 2),
            ScrollBlock::End => line.saturating_sub(self.height.saturating_sub(1)),
        };
        self.offset = target.min(self.max_offset());
        log::debug!(
            "scrolled to line {line} (offset {}, {:?})",
            self.offset,
            options.behavior
        );
    }
}
