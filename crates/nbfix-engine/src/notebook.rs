//! Notebook loading and serialization
//!
//! A [`Notebook`] keeps the parsed JSON object in source key order together with the
//! [`Layout`] of the text it came from. Serializing a notebook that was not modified
//! reproduces the input byte for byte for any file produced by a consistent JSON writer
//! (nbformat, JupyterLab, VS Code), so a repair only ever diffs on the removed keys.

use camino::Utf8Path;
use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use nbfix_utils::error::NbfixError;

/// Name used in errors for notebooks parsed from memory
const IN_MEMORY_SOURCE: &str = "<input>";

const UTF8_BOM: char = '\u{feff}';

/// Line terminator used between structural JSON tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Text layout of a serialized notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Indent unit; `None` means single-line (compact) output
    indent: Option<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
    byte_order_mark: bool,
}

impl Default for Layout {
    /// nbformat's canonical layout: one-space indent, LF, trailing newline.
    fn default() -> Self {
        Self {
            indent: Some(" ".to_string()),
            line_ending: LineEnding::Lf,
            trailing_newline: true,
            byte_order_mark: false,
        }
    }
}

impl Layout {
    /// Infer the layout the given text was written with.
    ///
    /// The indent unit is the leading whitespace of the first line after the opening brace.
    /// Text without interior line breaks is treated as compact.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let byte_order_mark = text.starts_with(UTF8_BOM);
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        let line_ending = match text.find('\n') {
            Some(pos) if pos > 0 && text.as_bytes()[pos - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        };
        let trailing_newline = text.ends_with('\n');
        let body = text.trim_end_matches(['\r', '\n']);

        let indent = match body.split_once('\n') {
            None => None,
            Some((_, rest)) => {
                let unit: String = rest
                    .chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .collect();
                if unit.is_empty() {
                    Layout::default().indent
                } else {
                    Some(unit)
                }
            }
        };

        Self {
            indent,
            line_ending,
            trailing_newline,
            byte_order_mark,
        }
    }

    /// Replace the indent unit with `width` spaces (`0` keeps line breaks with no indent).
    pub fn set_indent_width(&mut self, width: usize) {
        self.indent = Some(" ".repeat(width));
    }

    #[must_use]
    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    #[must_use]
    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }
}

/// A parsed notebook document.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    root: Map<String, Value>,
    layout: Layout,
}

impl Notebook {
    /// Read and parse the notebook at `path`.
    pub fn load(path: &Utf8Path) -> Result<Self, NbfixError> {
        let bytes = std::fs::read(path).map_err(|e| NbfixError::NotFound {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes, path.as_str())
    }

    /// Parse notebook bytes; `source` names the origin in errors.
    pub fn from_bytes(bytes: &[u8], source: &str) -> Result<Self, NbfixError> {
        let text = std::str::from_utf8(bytes).map_err(|e| NbfixError::Parse {
            path: source.to_string(),
            reason: format!("not UTF-8: {e}"),
        })?;
        Self::parse_named(text, source)
    }

    /// Parse notebook text held in memory.
    pub fn parse(text: &str) -> Result<Self, NbfixError> {
        Self::parse_named(text, IN_MEMORY_SOURCE)
    }

    fn parse_named(text: &str, source: &str) -> Result<Self, NbfixError> {
        let layout = Layout::detect(text);
        let json = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        let value: Value = serde_json::from_str(json).map_err(|e| NbfixError::Parse {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

        match value {
            Value::Object(root) => Ok(Self { root, layout }),
            other => Err(NbfixError::Parse {
                path: source.to_string(),
                reason: format!("top-level value is {}, expected an object", kind_of(&other)),
            }),
        }
    }

    /// Build a notebook from a JSON object with the default layout.
    #[must_use]
    pub fn from_root(root: Map<String, Value>) -> Self {
        Self {
            root,
            layout: Layout::default(),
        }
    }

    /// Serialize using the notebook's layout.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        let body = match &self.layout.indent {
            None => serde_json::to_string(&self.root)?,
            Some(indent) => {
                let mut buf = Vec::with_capacity(4096);
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = Serializer::with_formatter(&mut buf, formatter);
                self.root.serialize(&mut serializer)?;
                String::from_utf8(buf).map_err(serde_json::Error::custom)?
            }
        };

        let newline = self.layout.line_ending.as_str();
        let mut text = String::with_capacity(body.len() + body.len() / 16 + 4);
        if self.layout.byte_order_mark {
            text.push(UTF8_BOM);
        }
        // Raw newlines can only be structural: JSON strings escape them
        match self.layout.line_ending {
            LineEnding::Lf => text.push_str(&body),
            LineEnding::CrLf => text.push_str(&body.replace('\n', newline)),
        }
        if self.layout.trailing_newline {
            text.push_str(newline);
        }
        Ok(text)
    }

    #[must_use]
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Document-level `metadata` object, if present and an object
    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.root.get("metadata").and_then(Value::as_object)
    }

    pub fn metadata_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.root.get_mut("metadata").and_then(Value::as_object_mut)
    }

    /// The `cells` array; empty when absent or not an array
    #[must_use]
    pub fn cells(&self) -> &[Value] {
        self.root
            .get("cells")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cells_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.root.get_mut("cells").and_then(Value::as_array_mut)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
