//! Filepath: src/parsers/python_parser.rs
//! ------------------------------------------------------------------
//! Python module parsing built on Tree-sitter 0.25.x.
//! Goals:
//!   - Parse once per file and hand the tree to every consumer.
//!   - Expose only the top level of the module (imports and
//!     assignments never count when nested).
//!   - Refuse to patch sources Tree-sitter could not parse
//!     cleanly; report the first error node instead.
//!
//! Notes:
//!   - We always pass the same byte slice that Parser parsed.
//!   - Rows are 0-based in Tree-sitter; every line number leaving
//!     this module is 1-based.
//! ------------------------------------------------------------------

use miette::SourceSpan;
use tree_sitter::{Language, Node, Parser, Tree};

/// Errors raised while turning source text into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError
{
    #[error("failed to load the Python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("tree-sitter produced no tree")]
    NoTree,

    #[error("invalid Python syntax at line {line}")]
    Syntax
    {
        /// 1-based line of the first error node.
        line: usize,
        /// Byte span of the first error node.
        span: SourceSpan,
    },
}

/// A parsed Python module: the source it came from plus its tree.
pub struct PythonModule<'src>
{
    source: &'src str,
    tree: Tree,
}

impl<'src> PythonModule<'src>
{
    /// Parse `source`, rejecting trees that contain ERROR or MISSING nodes.
    pub fn parse(source: &'src str) -> Result<Self, ParseError>
    {
        // Obtain the Tree-sitter language for Python.
        let language: Language = tree_sitter_python::LANGUAGE.into();

        let mut parser = Parser::new();
        parser.set_language(&language)?;

        let tree = parser
            .parse(source, None)
            .ok_or(ParseError::NoTree)?;

        if tree.root_node().has_error()
        {
            let bad = first_error_node(tree.root_node()).unwrap_or_else(|| tree.root_node());
            let start = bad.start_byte();
            let len = bad.end_byte().saturating_sub(start).max(1);
            return Err(ParseError::Syntax {
                line: bad.start_position().row + 1,
                span: (start.min(source.len().saturating_sub(1)), len).into(),
            });
        }

        Ok(Self { source, tree })
    }

    /// The text this module was parsed from.
    pub fn source(&self) -> &'src str
    {
        self.source
    }

    /// Bytes of the source, for `utf8_text` calls.
    pub fn bytes(&self) -> &'src [u8]
    {
        self.source.as_bytes()
    }

    /// Top-level statements in source order.
    pub fn top_level(&self) -> Vec<Node<'_>>
    {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect()
    }

    /// Text covered by `node`, or "" if it is not valid UTF-8.
    pub fn text(
        &self,
        node: Node<'_>,
    ) -> &'src str
    {
        node.utf8_text(self.bytes()).unwrap_or("")
    }
}

/// Inclusive 1-based line range of a node.
pub fn line_range_1based(node: Node) -> (usize, usize)
{
    (node.start_position().row + 1, node.end_position().row + 1)
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error_node(node: Node) -> Option<Node>
{
    if node.is_error() || node.is_missing()
    {
        return Some(node);
    }
    if !node.has_error()
    {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}
