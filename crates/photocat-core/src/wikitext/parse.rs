use std::collections::HashSet;

use thiserror::Error;

use super::{Link, Node, Parameter, Template, Wikicode, strip_comments};

/// Deepest template/link nesting accepted before the page is rejected.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("markup nested deeper than {limit} levels at byte {offset}")]
    TooDeep { limit: usize, offset: usize },
}

pub(super) fn parse(text: &str) -> Result<Wikicode, ParseError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
        dead_opens: HashSet::new(),
    };
    let (nodes, _) = parser.parse_nodes(Context::Root)?;
    Ok(Wikicode { nodes })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Root,
    TemplateName,
    TemplateParam,
    LinkBody,
}

/// Why a run of nodes ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    End,
    Pipe,
    CloseTemplate,
    CloseLink,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    /// Offsets of `{{` and `[[` already found to be unclosed. Parsing from an
    /// offset always gives the same answer, so these are read as text on
    /// every later visit instead of being parsed again.
    dead_opens: HashSet<usize>,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn parse_nodes(&mut self, ctx: Context) -> Result<(Vec<Node>, Stop), ParseError> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        loop {
            let rest = self.rest();
            let Some(ch) = rest.chars().next() else {
                flush(&mut text, &mut nodes);
                return Ok((nodes, Stop::End));
            };

            let stop = match ctx {
                Context::TemplateName | Context::TemplateParam => {
                    if rest.starts_with("}}") {
                        Some((Stop::CloseTemplate, 2))
                    } else if ch == '|' {
                        Some((Stop::Pipe, 1))
                    } else {
                        None
                    }
                }
                Context::LinkBody => {
                    if rest.starts_with("]]") {
                        Some((Stop::CloseLink, 2))
                    } else if ch == '\n' {
                        // Links never span lines; leave the newline unconsumed.
                        Some((Stop::End, 0))
                    } else {
                        None
                    }
                }
                Context::Root => None,
            };
            if let Some((stop, width)) = stop {
                self.pos += width;
                flush(&mut text, &mut nodes);
                return Ok((nodes, stop));
            }

            if rest.starts_with("<!--") {
                let end = rest[4..].find("-->").map_or(rest.len(), |i| i + 7);
                flush(&mut text, &mut nodes);
                nodes.push(Node::Comment(rest[..end].to_string()));
                self.pos += end;
                continue;
            }

            if starts_with_ignore_case(rest, "<nowiki>") {
                if let Some(close) = find_ignore_case(rest, "</nowiki>") {
                    let end = close + "</nowiki>".len();
                    flush(&mut text, &mut nodes);
                    nodes.push(Node::Nowiki(rest[..end].to_string()));
                    self.pos += end;
                    continue;
                }
            }

            // Template arguments only have meaning in template space; keep them
            // verbatim so their braces do not close an enclosing template.
            if rest.starts_with("{{{") {
                if let Some(close) = rest[3..].find("}}}") {
                    let end = close + 6;
                    text.push_str(&rest[..end]);
                    self.pos += end;
                    continue;
                }
            }

            if (rest.starts_with("{{") || rest.starts_with("[[")) && self.dead_opens.contains(&self.pos) {
                text.push_str(&rest[..2]);
                self.pos += 2;
                continue;
            }

            if rest.starts_with("{{") {
                let start = self.pos;
                self.pos += 2;
                match self.parse_template()? {
                    Some(template) => {
                        flush(&mut text, &mut nodes);
                        nodes.push(Node::Template(template));
                    }
                    None => {
                        self.dead_opens.insert(start);
                        self.pos = start + 2;
                        text.push_str("{{");
                    }
                }
                continue;
            }

            if rest.starts_with("[[") {
                let start = self.pos;
                self.pos += 2;
                match self.parse_link()? {
                    Some(link) => {
                        flush(&mut text, &mut nodes);
                        nodes.push(Node::Link(link));
                    }
                    None => {
                        self.dead_opens.insert(start);
                        self.pos = start + 2;
                        text.push_str("[[");
                    }
                }
                continue;
            }

            text.push(ch);
            self.pos += ch.len_utf8();
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                offset: self.pos,
            });
        }
        Ok(())
    }

    /// Parse after an opening `{{`. `None` means the braces are literal text.
    fn parse_template(&mut self) -> Result<Option<Template>, ParseError> {
        self.enter()?;
        let result = self.template_body();
        self.depth -= 1;
        result
    }

    fn template_body(&mut self) -> Result<Option<Template>, ParseError> {
        let (name_nodes, mut stop) = self.parse_nodes(Context::TemplateName)?;
        if stop == Stop::End {
            return Ok(None);
        }
        if name_nodes
            .iter()
            .any(|n| !matches!(n, Node::Text(_) | Node::Comment(_)))
        {
            return Ok(None);
        }
        let name: String = name_nodes.iter().map(ToString::to_string).collect();
        if !is_valid_name(&name) {
            return Ok(None);
        }

        let mut params = Vec::new();
        while stop == Stop::Pipe {
            let (nodes, next) = self.parse_nodes(Context::TemplateParam)?;
            if next == Stop::End {
                return Ok(None);
            }
            params.push(Parameter::from_nodes(nodes));
            stop = next;
        }
        Ok(Some(Template { name, params }))
    }

    /// Parse after an opening `[[`. `None` means the brackets are literal text.
    fn parse_link(&mut self) -> Result<Option<Link>, ParseError> {
        self.enter()?;
        let result = self.parse_nodes(Context::LinkBody);
        self.depth -= 1;
        let (nodes, stop) = result?;
        if stop != Stop::CloseLink {
            return Ok(None);
        }
        Ok(Some(Link {
            inner: Wikicode { nodes },
        }))
    }
}

impl Parameter {
    /// Split a parameter body at its first top-level `=`.
    fn from_nodes(mut nodes: Vec<Node>) -> Self {
        let Some((index, eq)) = split_point(&nodes) else {
            return Parameter {
                key: None,
                value: Wikicode { nodes },
            };
        };

        let mut value = nodes.split_off(index);
        let mut key: String = nodes.iter().map(ToString::to_string).collect();
        let head = match value.first() {
            Some(Node::Text(t)) => t.clone(),
            _ => String::new(),
        };
        key.push_str(&head[..eq]);
        let after = &head[eq + 1..];
        if after.is_empty() {
            value.remove(0);
        } else {
            value[0] = Node::Text(after.to_string());
        }

        Parameter {
            key: Some(key),
            value: Wikicode { nodes: value },
        }
    }
}

/// Node index and byte offset of the `=` that names a parameter, if any.
/// Only text and comments may precede it.
fn split_point(nodes: &[Node]) -> Option<(usize, usize)> {
    for (i, node) in nodes.iter().enumerate() {
        match node {
            Node::Text(t) => {
                if let Some(eq) = t.find('=') {
                    return Some((i, eq));
                }
            }
            Node::Comment(_) => {}
            _ => return None,
        }
    }
    None
}

fn is_valid_name(raw: &str) -> bool {
    let name = strip_comments(raw);
    let name = name.trim();
    !name.is_empty()
        && !name
            .chars()
            .any(|c| matches!(c, '[' | ']' | '{' | '}' | '<' | '>' | '\n'))
}

fn flush(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}

fn starts_with_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .get(..needle.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(needle))
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}
