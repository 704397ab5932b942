//! Wikitext document model.
//!
//! Only the constructs the bots care about are structured: templates, links,
//! comments and `<nowiki>` spans. Everything else is kept as text, so
//! serialising an untouched document reproduces the input byte for byte.

use std::fmt;

mod parse;
mod template;

pub use parse::{MAX_DEPTH, ParseError};
pub use template::{Parameter, Template};

/// A parsed run of wikitext.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wikicode {
    pub(crate) nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    /// Raw comment including its delimiters.
    Comment(String),
    /// Raw `<nowiki>` span including its tags.
    Nowiki(String),
    Template(Template),
    Link(Link),
}

/// An internal link `[[target|label]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub(crate) inner: Wikicode,
}

impl Link {
    /// Link target: everything before the first pipe, trimmed.
    pub fn target(&self) -> String {
        let raw = self.inner.to_string();
        raw.split('|').next().unwrap_or_default().trim().to_string()
    }
}

/// Handle to one template inside a [`Wikicode`] tree.
///
/// A structural path from the root. Stays valid while parameters are added
/// to templates; removing a node invalidates handles that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateRef {
    path: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Step {
    Node(usize),
    Param(usize),
}

impl Wikicode {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse::parse(text)
    }

    /// A fragment holding a single text node.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            nodes: vec![Node::Text(text)],
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// True when the fragment renders as nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.to_string().trim().is_empty()
    }

    /// Every template in document order, nested ones after their parent.
    pub fn templates(&self) -> Vec<(TemplateRef, &Template)> {
        let mut out = Vec::new();
        collect_templates(self, &mut Vec::new(), &mut out);
        out
    }

    pub fn template(&self, handle: &TemplateRef) -> Option<&Template> {
        let (last, prefix) = handle.path.split_last()?;
        let Step::Node(index) = *last else {
            return None;
        };
        match container(self, prefix)?.nodes.get(index)? {
            Node::Template(t) => Some(t),
            _ => None,
        }
    }

    pub fn template_mut(&mut self, handle: &TemplateRef) -> Option<&mut Template> {
        let (last, prefix) = handle.path.split_last()?;
        let Step::Node(index) = *last else {
            return None;
        };
        match container_mut(self, prefix)?.nodes.get_mut(index)? {
            Node::Template(t) => Some(t),
            _ => None,
        }
    }

    /// Detach a template from the tree and return it.
    pub fn remove_template(&mut self, handle: &TemplateRef) -> Option<Template> {
        let (last, prefix) = handle.path.split_last()?;
        let Step::Node(index) = *last else {
            return None;
        };
        let parent = container_mut(self, prefix)?;
        if !matches!(parent.nodes.get(index), Some(Node::Template(_))) {
            return None;
        }
        match parent.nodes.remove(index) {
            Node::Template(t) => Some(t),
            _ => None,
        }
    }

    /// Targets of every link in the fragment, including links nested in
    /// templates and link labels.
    pub fn links(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_links(self, &mut out);
        out
    }
}

impl fmt::Display for Wikicode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(s) | Node::Comment(s) | Node::Nowiki(s) => f.write_str(s),
            Node::Template(t) => write!(f, "{t}"),
            Node::Link(l) => write!(f, "[[{}]]", l.inner),
        }
    }
}

/// Normalise a page or template title the way MediaWiki compares them:
/// underscores are spaces, whitespace runs collapse, the first letter is
/// case-insensitive.
pub fn normalize_title(title: &str) -> String {
    let collapsed = title
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove `<!-- ... -->` comments from raw text.
pub(crate) fn strip_comments(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn collect_templates<'a>(
    code: &'a Wikicode,
    prefix: &mut Vec<Step>,
    out: &mut Vec<(TemplateRef, &'a Template)>,
) {
    for (i, node) in code.nodes.iter().enumerate() {
        prefix.push(Step::Node(i));
        match node {
            Node::Template(t) => {
                out.push((
                    TemplateRef {
                        path: prefix.clone(),
                    },
                    t,
                ));
                for (j, param) in t.params.iter().enumerate() {
                    prefix.push(Step::Param(j));
                    collect_templates(&param.value, prefix, out);
                    prefix.pop();
                }
            }
            Node::Link(l) => collect_templates(&l.inner, prefix, out),
            _ => {}
        }
        prefix.pop();
    }
}

fn collect_links(code: &Wikicode, out: &mut Vec<String>) {
    for node in &code.nodes {
        match node {
            Node::Link(l) => {
                out.push(l.target());
                collect_links(&l.inner, out);
            }
            Node::Template(t) => {
                for param in &t.params {
                    collect_links(&param.value, out);
                }
            }
            _ => {}
        }
    }
}

fn container<'a>(code: &'a Wikicode, steps: &[Step]) -> Option<&'a Wikicode> {
    match steps {
        [] => Some(code),
        [Step::Node(i), Step::Param(j), rest @ ..] => match code.nodes.get(*i)? {
            Node::Template(t) => container(&t.params.get(*j)?.value, rest),
            _ => None,
        },
        [Step::Node(i), rest @ ..] => match code.nodes.get(*i)? {
            Node::Link(l) => container(&l.inner, rest),
            _ => None,
        },
        _ => None,
    }
}

fn container_mut<'a>(code: &'a mut Wikicode, steps: &[Step]) -> Option<&'a mut Wikicode> {
    match steps {
        [] => Some(code),
        [Step::Node(i), Step::Param(j), rest @ ..] => match code.nodes.get_mut(*i)? {
            Node::Template(t) => container_mut(&mut t.params.get_mut(*j)?.value, rest),
            _ => None,
        },
        [Step::Node(i), rest @ ..] => match code.nodes.get_mut(*i)? {
            Node::Link(l) => container_mut(&mut l.inner, rest),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TALK: &str = "{{WikiProject banner shell|\n{{WikiProject Ships|class=stub}}\n}}\n\
        {{reqphoto}}\n== Heading ==\nSee [[Foo|the foo]] <!-- {{not a template}} -->\n";

    #[test]
    fn serialisation_is_byte_exact() {
        let doc = Wikicode::parse(TALK).unwrap();
        assert_eq!(doc.to_string(), TALK);
    }

    #[test]
    fn templates_listed_in_document_order() {
        let doc = Wikicode::parse(TALK).unwrap();
        let names: Vec<String> = doc.templates().iter().map(|(_, t)| t.name()).collect();
        assert_eq!(
            names,
            vec!["WikiProject banner shell", "WikiProject Ships", "reqphoto"]
        );
    }

    #[test]
    fn handles_reach_nested_templates() {
        let mut doc = Wikicode::parse(TALK).unwrap();
        let handle = doc.templates()[1].0.clone();
        doc.template_mut(&handle).unwrap().add("needs-photo", "yes");
        assert!(
            doc.to_string()
                .contains("{{WikiProject Ships|class=stub|needs-photo=yes}}")
        );
        assert_eq!(doc.template(&handle).unwrap().name(), "WikiProject Ships");
    }

    #[test]
    fn remove_template_detaches_only_that_node() {
        let mut doc = Wikicode::parse("a{{x}}b{{y}}c").unwrap();
        let handle = doc.templates()[0].0.clone();
        let removed = doc.remove_template(&handle).unwrap();
        assert_eq!(removed.name(), "x");
        assert_eq!(doc.to_string(), "ab{{y}}c");
    }

    #[test]
    fn templates_inside_links_are_found() {
        let doc = Wikicode::parse("[[File:A.jpg|thumb|{{caption}}]]").unwrap();
        let templates = doc.templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].1.name(), "caption");
        assert!(doc.template(&templates[0].0).is_some());
    }

    #[test]
    fn link_targets_ignore_labels() {
        let doc = Wikicode::parse("[[Travis County, Texas|Travis]] and [[Austin]]").unwrap();
        assert_eq!(doc.links(), vec!["Travis County, Texas", "Austin"]);
    }

    #[test]
    fn normalize_title_rules() {
        assert_eq!(normalize_title("image_requested"), "Image requested");
        assert_eq!(normalize_title("  Image   requested \n"), "Image requested");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn strip_comments_handles_unterminated() {
        assert_eq!(strip_comments("a<!-- b -->c"), "ac");
        assert_eq!(strip_comments("a<!-- b"), "a");
    }
}
