//! Parsed tree of named nodes.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// A parsed entry: optional value, optional explicit type and named
/// children ordered by name.
///
/// The node returned by the parser is a nameless document root whose
/// children are the top-level lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, AstNode>,
}

impl AstNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_type(mut self, explicit_type: impl Into<String>) -> Self {
        self.explicit_type = Some(explicit_type.into());
        self
    }

    pub fn with_child(mut self, name: impl Into<String>, child: AstNode) -> Self {
        self.children.insert(name.into(), child);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AstNode> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AstNode> {
        self.children.get_mut(name)
    }

    /// Follow `path` one child name at a time.
    pub fn lookup<'p>(&self, path: impl IntoIterator<Item = &'p str>) -> Option<&AstNode> {
        path.into_iter().try_fold(self, |node, name| node.get(name))
    }

    /// Number of nodes below this one.
    pub fn node_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.node_count())
            .sum()
    }

    /// Fold `other` into this node. Values and types present in `other`
    /// win; children merge recursively.
    pub fn merge(&mut self, other: AstNode) {
        if other.value.is_some() {
            self.value = other.value;
        }
        if other.explicit_type.is_some() {
            self.explicit_type = other.explicit_type;
        }
        for (name, child) in other.children {
            self.children.entry(name).or_default().merge(child);
        }
    }

    /// Canonical indented form with four-space indentation.
    ///
    /// Only the children are rendered; a value or type on this node itself
    /// has no line to live on.
    pub fn to_text(&self) -> String {
        self.render("    ")
    }

    /// Canonical indented form using `indent` for each level.
    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        self.render_children(&mut out, indent, 0);
        out
    }

    fn render_children(&self, out: &mut String, indent: &str, level: usize) {
        for (name, child) in &self.children {
            for _ in 0..level {
                out.push_str(indent);
            }
            out.push_str(&render_name(name));
            if let Some(explicit_type) = &child.explicit_type {
                out.push_str(": ");
                out.push_str(&render_type(explicit_type));
            }
            if let Some(value) = &child.value {
                out.push_str(" >> ");
                out.push_str(&render_value(value));
            }
            out.push('\n');
            child.render_children(out, indent, level + 1);
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn render_name(name: &str) -> String {
    let bare = !name.is_empty()
        && !name.starts_with('"')
        && !name.contains(">>")
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '-' || c == ':');
    if bare {
        name.to_string()
    } else {
        quote(name)
    }
}

fn render_type(explicit_type: &str) -> String {
    let bare = !explicit_type.is_empty()
        && !explicit_type.starts_with('"')
        && !explicit_type.contains(">>")
        && !explicit_type
            .chars()
            .any(|c| c.is_whitespace() || c.is_control());
    if bare {
        explicit_type.to_string()
    } else {
        quote(explicit_type)
    }
}

fn render_value(value: &str) -> String {
    let bare = !value.is_empty()
        && !value.starts_with('"')
        && value.trim() == value
        && !value.chars().any(char::is_control);
    if bare {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Double-quote `text`, escaping what the lexer would not read back.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
