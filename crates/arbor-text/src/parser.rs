//! Lines to tree.

use std::path::Path;

use arbor_stream::{
    read_remaining, AlignableStream, FileReader, InputStream, SizedStream, Stream, StreamError,
};
use tracing::debug;

use crate::ast::AstNode;
use crate::config::ParserConfig;
use crate::error::{ParseError, ParseErrorKind, TextResult};
use crate::lexer::lex;

/// Indented-text parser with fixed lexical settings.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a parser, rejecting an invalid configuration.
    pub fn new(config: ParserConfig) -> TextResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `text` into a document root.
    ///
    /// A line one level deeper than its predecessor becomes a child of it;
    /// a line at the same or a shallower level attaches to the ancestor at
    /// that level. Repeated sibling names merge into one node, with later
    /// values and types overriding earlier ones.
    pub fn parse_str(&self, text: &str) -> Result<AstNode, ParseError> {
        let mut root = AstNode::default();
        let mut open: Vec<String> = Vec::new();

        for line in lex(text, &self.config) {
            let line = line?;
            if line.level > open.len() {
                return Err(ParseError::new(
                    line.number,
                    line.column,
                    ParseErrorKind::IndentJump {
                        expected_max: open.len(),
                        found: line.level,
                    },
                ));
            }
            open.truncate(line.level);

            let parent = open.iter().fold(&mut root, |node, name| {
                node.children.entry(name.clone()).or_default()
            });
            let node = parent.children.entry(line.name.clone()).or_default();
            if line.explicit_type.is_some() {
                node.explicit_type = line.explicit_type;
            }
            if line.value.is_some() {
                node.value = line.value;
            }
            open.push(line.name);
        }

        debug!(nodes = root.node_count(), "parsed text");
        Ok(root)
    }

    /// Parse everything left in `input`.
    pub fn parse_stream<I>(&self, input: &mut I) -> TextResult<AstNode>
    where
        I: InputStream + SizedStream + AlignableStream + ?Sized,
    {
        let bytes = read_remaining(input);
        if !input.valid() {
            return Err(StreamError::Invalid {
                offset: input.offset(),
            }
            .into());
        }
        let text = String::from_utf8(bytes)?;
        Ok(self.parse_str(&text)?)
    }

    pub fn parse_file(&self, path: &Path) -> TextResult<AstNode> {
        let mut reader = FileReader::open(path)?;
        self.parse_stream(&mut reader)
    }
}

/// [`Parser::parse_str`] with the default configuration.
pub fn parse_str(text: &str) -> Result<AstNode, ParseError> {
    Parser::default().parse_str(text)
}

/// [`Parser::parse_stream`] with the default configuration.
pub fn parse_stream<I>(input: &mut I) -> TextResult<AstNode>
where
    I: InputStream + SizedStream + AlignableStream + ?Sized,
{
    Parser::default().parse_stream(input)
}

/// [`Parser::parse_file`] with the default configuration.
pub fn parse_file(path: &Path) -> TextResult<AstNode> {
    Parser::default().parse_file(path)
}
