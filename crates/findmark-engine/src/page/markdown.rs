use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::tree::{DocTree, NodeId, RenderTree};

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Element tag and optional class for a container event.
fn element_for(tag: &Tag<'_>) -> (&'static str, Option<&'static str>) {
    match tag {
        Tag::Paragraph => ("p", None),
        Tag::Heading { level, .. } => (heading_tag(*level), None),
        Tag::BlockQuote(_) => ("blockquote", None),
        Tag::CodeBlock(CodeBlockKind::Fenced(_)) => ("pre", Some("fenced")),
        Tag::CodeBlock(CodeBlockKind::Indented) => ("pre", None),
        Tag::HtmlBlock => ("div", Some("raw-html")),
        Tag::List(Some(_)) => ("ol", None),
        Tag::List(None) => ("ul", None),
        Tag::Item => ("li", None),
        Tag::FootnoteDefinition(_) => ("div", Some("footnote")),
        Tag::Table(_) => ("table", None),
        Tag::TableHead => ("thead", None),
        Tag::TableRow => ("tr", None),
        Tag::TableCell => ("td", None),
        Tag::Emphasis => ("em", None),
        Tag::Strong => ("strong", None),
        Tag::Strikethrough => ("del", None),
        Tag::Link { .. } => ("a", None),
        Tag::Image { .. } => ("span", Some("image-alt")),
        _ => ("span", None),
    }
}

/// Builds render tree nodes from a markdown event stream.
struct TreeBuilder<'t> {
    tree: &'t mut DocTree,
    base: NodeId,
    stack: Vec<NodeId>,
}

impl<'t> TreeBuilder<'t> {
    fn new(tree: &'t mut DocTree, parent: NodeId) -> Self {
        Self {
            tree,
            base: parent,
            stack: Vec::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.base)
    }

    fn open(&mut self, tag: &str, classes: &[&str]) {
        let id = self.tree.append_element(self.current(), tag, classes);
        self.stack.push(id);
    }

    fn close(&mut self) {
        self.stack.pop();
    }

    /// Append text, extending the previous leaf if it is text too.
    fn text(&mut self, text: &str) {
        let parent = self.current();
        if let Some(&last) = self.tree.children(parent).last()
            && let Some(existing) = self.tree.text(last)
        {
            let joined = format!("{existing}{text}");
            self.tree.set_text(last, &joined);
            return;
        }
        self.tree.append_text(parent, text);
    }

    fn leaf_element(&mut self, tag: &str, classes: &[&str], text: &str) {
        let id = self.tree.append_element(self.current(), tag, classes);
        if !text.is_empty() {
            self.tree.append_text(id, text);
        }
    }

    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                let (name, class) = element_for(&tag);
                self.open(name, class.as_slice());
            }
            Event::End(_) => self.close(),
            Event::Text(text) | Event::Html(text) => self.text(&text),
            Event::Code(code) => self.leaf_element("code", &[], &code),
            Event::InlineHtml(html) => self.leaf_element("span", &["raw-html"], &html),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.leaf_element("span", &["math"], &math)
            }
            Event::FootnoteReference(label) => {
                self.leaf_element("sup", &["footnote-ref"], &format!("[{label}]"))
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.leaf_element("br", &[], ""),
            Event::Rule => self.leaf_element("hr", &[], ""),
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }),
        }
    }
}

/// Render `markdown` as children of `parent`.
pub fn append_markdown(tree: &mut DocTree, parent: NodeId, markdown: &str) {
    let mut builder = TreeBuilder::new(tree, parent);
    for event in Parser::new_ext(markdown, parser_options()) {
        builder.push(event);
    }
}

/// A fresh tree whose body holds `markdown`.
pub fn parse_page(markdown: &str) -> DocTree {
    let mut tree = DocTree::new();
    let root = tree.root();
    append_markdown(&mut tree, root, markdown);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeData;
    use pretty_assertions::assert_eq;

    fn tags(tree: &DocTree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .into_iter()
            .map(|id| match tree.data(id) {
                Some(NodeData::Element { tag, .. }) => tag.clone(),
                Some(NodeData::Text(text)) => format!("#{text}"),
                None => String::new(),
            })
            .collect()
    }

    #[test]
    fn blocks_become_elements() {
        let tree = parse_page("# Title\n\nSome *em* text\n\n- one\n- two\n");
        let root = tree.root();
        assert_eq!(tags(&tree, root), vec!["h1", "p", "ul"]);

        let p = tree.children(root)[1];
        assert_eq!(tags(&tree, p), vec!["#Some ", "em", "# text"]);
    }

    #[test]
    fn soft_breaks_join_into_one_leaf() {
        let tree = parse_page("first line\nsecond line");
        let p = tree.children(tree.root())[0];
        assert_eq!(tags(&tree, p), vec!["#first line second line"]);
    }

    #[test]
    fn split_text_events_are_coalesced() {
        // Brackets that do not form a link arrive as separate text events.
        let tree = parse_page("a [b] c");
        let p = tree.children(tree.root())[0];
        assert_eq!(tags(&tree, p), vec!["#a [b] c"]);
    }

    #[test]
    fn code_is_a_searchable_element() {
        let tree = parse_page("run `cargo test` now\n\n```\nfn main() {}\n```\n");
        let root = tree.root();
        let p = tree.children(root)[0];
        assert_eq!(tags(&tree, p), vec!["#run ", "code", "# now"]);

        let pre = tree.children(root)[1];
        assert!(tree.has_class(pre, "fenced"));
        assert_eq!(tree.text_content(pre), "fn main() {}\n");
    }

    #[test]
    fn text_content_matches_rendered_words() {
        let tree = parse_page("## Frontend **Projects**\n\nParty hard.");
        assert_eq!(tree.text_content(tree.root()), "Frontend ProjectsParty hard.");
    }

    #[test]
    fn rules_and_breaks_are_empty_elements() {
        let tree = parse_page("a  \nb\n\n---\n");
        let root = tree.root();
        assert_eq!(tags(&tree, root), vec!["p", "hr"]);
        let p = tree.children(root)[0];
        assert_eq!(tags(&tree, p), vec!["#a", "br", "#b"]);
    }

    #[test]
    fn empty_markdown_gives_empty_body() {
        assert!(parse_page("").is_empty());
    }
}
