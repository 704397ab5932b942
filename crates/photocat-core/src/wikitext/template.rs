use std::fmt;

use super::{Wikicode, normalize_title, strip_comments};

/// A template invocation `{{name|positional|key=value}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Raw name, whitespace and comments included.
    pub(crate) name: String,
    pub(crate) params: Vec<Parameter>,
}

/// One `|`-separated template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Raw key before `=`; `None` for positional parameters.
    pub(crate) key: Option<String>,
    pub(crate) value: Wikicode,
}

impl Parameter {
    pub fn value(&self) -> &Wikicode {
        &self.value
    }

    pub fn is_positional(&self) -> bool {
        self.key.is_none()
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_blank()
    }

    /// Replace the value, keeping the old value's surrounding whitespace.
    fn set_value(&mut self, value: &str) {
        let raw = self.value.to_string();
        let trimmed = raw.trim_start();
        let (lead, trail) = if trimmed.is_empty() {
            ("", raw.as_str())
        } else {
            (
                &raw[..raw.len() - trimmed.len()],
                &raw[raw.trim_end().len()..],
            )
        };
        self.value = Wikicode::text(format!("{lead}{value}{trail}"));
    }
}

impl Template {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    /// The name as MediaWiki reads it: comments removed, trimmed.
    pub fn name(&self) -> String {
        strip_comments(&self.name).trim().to_string()
    }

    /// Rename, keeping any whitespace around the old name.
    pub fn set_name(&mut self, name: &str) {
        let lead = &self.name[..self.name.len() - self.name.trim_start().len()];
        let trail = &self.name[self.name.trim_end().len()..];
        self.name = if self.name.trim().is_empty() {
            name.to_string()
        } else {
            format!("{lead}{name}{trail}")
        };
    }

    /// Compare names under MediaWiki title rules.
    pub fn name_matches(&self, other: &str) -> bool {
        normalize_title(&self.name()) == normalize_title(other)
    }

    /// Parameters with their effective names; positional parameters are
    /// named by their 1-based ordinal.
    pub fn params(&self) -> impl Iterator<Item = (String, &Parameter)> + '_ {
        let mut ordinal = 0usize;
        self.params.iter().map(move |param| match &param.key {
            Some(key) => (strip_comments(key).trim().to_string(), param),
            None => {
                ordinal += 1;
                (ordinal.to_string(), param)
            }
        })
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// True when the parameter exists and its value is not blank.
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| !p.is_blank())
    }

    /// The last parameter with this name; later duplicates win.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.position(name).map(|i| &self.params[i])
    }

    /// Set a parameter, replacing an existing value in place or appending a
    /// new one.
    pub fn add(&mut self, name: &str, value: &str) {
        let name = name.trim();
        if let Some(index) = self.position(name) {
            self.params[index].set_value(value);
            return;
        }

        let next_slot = self.positional_count() + 1;
        let implicit = name.parse::<usize>().is_ok_and(|n| n == next_slot) && !value.contains('=');
        let trailing = self.trailing_newline();
        self.params.push(Parameter {
            key: (!implicit).then(|| name.to_string()),
            value: Wikicode::text(format!("{value}{trailing}")),
        });
    }

    /// Remove every parameter with this name. Returns whether any existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let doomed: Vec<usize> = self
            .params()
            .enumerate()
            .filter(|(_, (n, _))| n == name.trim())
            .map(|(i, _)| i)
            .collect();
        for index in doomed.iter().rev() {
            self.params.remove(*index);
        }
        !doomed.is_empty()
    }

    /// Drop blank positional parameters, e.g. the empty slot in
    /// `{{image requested||in=Ohio}}`. A blank slot followed by a non-blank
    /// positional stays, since removing it would renumber that value.
    pub fn remove_blank_positionals(&mut self) -> bool {
        let last_filled = self
            .params
            .iter()
            .rposition(|p| p.is_positional() && !p.is_blank());
        let before = self.params.len();
        let mut index = 0;
        self.params.retain(|p| {
            let keep = !(p.is_positional() && p.is_blank())
                || last_filled.is_some_and(|last| index < last);
            index += 1;
            keep
        });
        self.params.len() != before
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.params()
            .enumerate()
            .filter(|(_, (n, _))| n == name)
            .map(|(i, _)| i)
            .last()
    }

    fn positional_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_positional()).count()
    }

    /// Trailing newline run of the last element, repeated on an appended
    /// parameter so multi-line layouts stay multi-line.
    fn trailing_newline(&self) -> String {
        let raw = match self.params.last() {
            Some(last) => last.value.to_string(),
            None => self.name.clone(),
        };
        let tail = &raw[raw.trim_end().len()..];
        if tail.contains('\n') {
            tail.to_string()
        } else {
            String::new()
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}", self.name)?;
        for param in &self.params {
            match &param.key {
                Some(key) => write!(f, "|{key}={}", param.value)?,
                None => write!(f, "|{}", param.value)?,
            }
        }
        f.write_str("}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str) -> Template {
        let doc = Wikicode::parse(text).unwrap();
        doc.templates()[0].1.clone()
    }

    #[test]
    fn new_template_renders() {
        let mut t = Template::new("image requested");
        t.add("1", "ships");
        t.add("in", "Ohio");
        assert_eq!(t.to_string(), "{{image requested|ships|in=Ohio}}");
    }

    #[test]
    fn add_replaces_in_place_keeping_spacing() {
        let mut t = template("{{a| in = Ohio \n|b=c}}");
        t.add("in", "Texas");
        assert_eq!(t.to_string(), "{{a| in = Texas \n|b=c}}");
    }

    #[test]
    fn add_fills_blank_value() {
        let mut t = template("{{a|in=}}");
        t.add("in", "Texas");
        assert_eq!(t.to_string(), "{{a|in=Texas}}");
    }

    #[test]
    fn positional_append_is_implicit_only_for_next_slot() {
        let mut t = template("{{a|x}}");
        t.add("2", "y");
        t.add("4", "z");
        assert_eq!(t.to_string(), "{{a|x|y|4=z}}");
    }

    #[test]
    fn positional_value_with_equals_is_explicit() {
        let mut t = Template::new("a");
        t.add("1", "x=y");
        assert_eq!(t.to_string(), "{{a|1=x=y}}");
        assert_eq!(t.get("1").unwrap().value().to_string(), "x=y");
    }

    #[test]
    fn append_keeps_multiline_layout() {
        let mut t = template("{{WikiProject Birds\n|class=Stub\n}}");
        t.add("needs-photo", "yes");
        assert_eq!(
            t.to_string(),
            "{{WikiProject Birds\n|class=Stub\n|needs-photo=yes\n}}"
        );

        let mut bare = template("{{image requested\n}}");
        bare.add("in", "Ohio");
        assert_eq!(bare.to_string(), "{{image requested\n|in=Ohio\n}}");
    }

    #[test]
    fn explicit_numbered_key_counts_as_positional_name() {
        let t = template("{{a|1=ships}}");
        assert!(t.has("1"));
    }

    #[test]
    fn last_duplicate_wins() {
        let t = template("{{a|in=Ohio|in=Texas}}");
        assert_eq!(t.get("in").unwrap().value().to_string(), "Texas");
    }

    #[test]
    fn remove_renumbers_positionals() {
        let mut t = template("{{a||ships}}");
        assert!(t.remove("1"));
        assert_eq!(t.to_string(), "{{a|ships}}");
        assert_eq!(t.get("1").unwrap().value().to_string(), "ships");
        assert!(!t.remove("in"));
    }

    #[test]
    fn remove_blank_positionals_collapses_pipes() {
        let mut t = template("{{image requested|||in=Ohio}}");
        assert!(t.remove_blank_positionals());
        assert_eq!(t.to_string(), "{{image requested|in=Ohio}}");
    }

    #[test]
    fn blank_slot_before_a_value_is_kept() {
        let mut t = template("{{image requested||Lighthouse keeper||in=Ohio}}");
        assert!(t.remove_blank_positionals());
        assert_eq!(t.to_string(), "{{image requested||Lighthouse keeper|in=Ohio}}");
        assert_eq!(t.get("2").unwrap().value().to_string(), "Lighthouse keeper");
        assert!(!t.remove_blank_positionals());
    }

    #[test]
    fn rename_keeps_whitespace() {
        let mut t = template("{{ reqphoto \n|in=Ohio}}");
        t.set_name("image requested");
        assert_eq!(t.to_string(), "{{ image requested \n|in=Ohio}}");
    }

    #[test]
    fn name_matching_follows_title_rules() {
        let t = template("{{Image_requested}}");
        assert!(t.name_matches("image requested"));
        assert!(!t.name_matches("image request"));
    }

    #[test]
    fn has_value_ignores_blank() {
        let t = template("{{a|| in = }}");
        assert!(t.has("1"));
        assert!(!t.has_value("1"));
        assert!(t.has("in"));
        assert!(!t.has_value("in"));
    }
}
