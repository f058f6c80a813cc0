use std::fmt;
use std::path::Path;

use arbor_build::{build, BuildReport, Source};
use arbor_key::{Family, StrFamily};
use arbor_store::{DedicatedStorage, Descriptor, Storage};
use arbor_text::{materialize, AstNode, MaterializeReport, Parser, ValueParsers};
use tracing::info;

use crate::config::ArborConfig;
use crate::error::ArborResult;

/// In-memory tree: a dedicated storage, a text parser and the value parsers
/// used to lower loaded text.
pub struct Arbor<F: Family = StrFamily> {
    storage: DedicatedStorage<F>,
    parser: Parser,
    parsers: ValueParsers<DedicatedStorage<F>>,
}

impl<F: Family> Arbor<F> {
    /// An empty tree with the default configuration.
    pub fn new() -> Self {
        Self {
            storage: DedicatedStorage::new(),
            parser: Parser::default(),
            parsers: ValueParsers::with_defaults(),
        }
    }

    pub fn with_config(config: ArborConfig) -> ArborResult<Self> {
        Ok(Self {
            storage: DedicatedStorage::new(),
            parser: Parser::new(config.parser)?,
            parsers: ValueParsers::defaults(config.fallback_to_text),
        })
    }

    pub fn storage(&self) -> &DedicatedStorage<F> {
        &self.storage
    }

    pub fn parsers(&self) -> &ValueParsers<DedicatedStorage<F>> {
        &self.parsers
    }

    /// Register custom value parsers here.
    pub fn parsers_mut(&mut self) -> &mut ValueParsers<DedicatedStorage<F>> {
        &mut self.parsers
    }

    pub fn root(&self) -> Descriptor<'_, DedicatedStorage<F>> {
        Descriptor::root(&self.storage)
    }

    /// Descriptor for a textual path such as `"server/port"`.
    pub fn at(&self, path: &str) -> ArborResult<Descriptor<'_, DedicatedStorage<F>>> {
        Ok(self.root().at(path)?)
    }

    /// Parse `text` without storing it.
    pub fn parse(&self, text: &str) -> ArborResult<AstNode> {
        Ok(self.parser.parse_str(text)?)
    }

    /// Parse `text` and write it below the root.
    pub fn load_str(&self, text: &str) -> ArborResult<MaterializeReport> {
        self.load_str_at(text, &self.root())
    }

    /// Parse `text` and write it below `target`.
    pub fn load_str_at(
        &self,
        text: &str,
        target: &Descriptor<'_, DedicatedStorage<F>>,
    ) -> ArborResult<MaterializeReport> {
        let ast = self.parser.parse_str(text)?;
        Ok(materialize(&ast, target, &self.parsers))
    }

    /// Parse the file at `path` and write it below the root.
    pub fn load_file(&self, path: &Path) -> ArborResult<MaterializeReport> {
        let ast = self.parser.parse_file(path)?;
        let report = materialize(&ast, &self.root(), &self.parsers);
        info!(
            path = %path.display(),
            written = report.values_written,
            skipped = report.values_skipped,
            "loaded tree file"
        );
        Ok(report)
    }

    /// Run the builder over `source` rooted at the tree root.
    pub fn build<T>(&self, source: &mut T) -> ArborResult<BuildReport>
    where
        T: Source<DedicatedStorage<F>> + ?Sized,
    {
        Ok(build(source, &self.root())?)
    }

    /// One `key = hex` line per entry, in key order.
    pub fn dump(&self) -> String {
        self.storage.dump()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn clear(&self) {
        self.storage.clear();
    }
}

impl<F: Family> Default for Arbor<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Family> fmt::Debug for Arbor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arbor")
            .field("storage", &self.storage)
            .field("parser", self.parser.config())
            .field("parsers", &self.parsers)
            .finish()
    }
}
