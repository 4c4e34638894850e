//! Typed filter-graph intermediate representation.
//!
//! The compiler builds the tool's stream-processing graph as data
//! instead of pasting label strings together: nodes consume stream
//! references and produce named labels, and the graph only renders to
//! text at the very end. Label uniqueness and produced-before-consumed
//! wiring are enforced at insert time, so a rendered graph is valid by
//! construction and `-map` arguments never need bracket surgery.

use reelcut_common::{ReelcutError, ReelcutResult};

/// A reference to a stream somewhere in the graph: either a demuxed
/// input pad (`0:v`, `2:a`) or a label produced by an earlier filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRef {
    /// Video pad of the input at this index.
    InputVideo(usize),

    /// Audio pad of the input at this index.
    InputAudio(usize),

    /// A named label produced by a filter node.
    Label(String),
}

impl StreamRef {
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }

    /// Render for use inside filter-graph text (always bracketed).
    fn render_pad(&self) -> String {
        match self {
            Self::InputVideo(i) => format!("[{i}:v]"),
            Self::InputAudio(i) => format!("[{i}:a]"),
            Self::Label(name) => format!("[{name}]"),
        }
    }

    /// Render for use as a `-map` argument. Input pads are mapped bare;
    /// filter labels keep their brackets.
    pub fn render_map(&self) -> String {
        match self {
            Self::InputVideo(i) => format!("{i}:v"),
            Self::InputAudio(i) => format!("{i}:a"),
            Self::Label(name) => format!("[{name}]"),
        }
    }
}

/// One filter node: consumed streams, filter expression, produced labels.
#[derive(Debug, Clone)]
struct FilterNode {
    inputs: Vec<StreamRef>,
    expr: String,
    outputs: Vec<String>,
}

/// An ordered, label-checked filter graph.
#[derive(Debug, Clone, Default)]
pub struct FilterGraph {
    nodes: Vec<FilterNode>,
    produced: Vec<String>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and return a reference to its first output label.
    ///
    /// Fails if an input label has not been produced by an earlier node,
    /// or if an output label is already taken.
    pub fn add(
        &mut self,
        inputs: Vec<StreamRef>,
        expr: impl Into<String>,
        outputs: Vec<String>,
    ) -> ReelcutResult<StreamRef> {
        for input in &inputs {
            if let StreamRef::Label(name) = input {
                if !self.produced.contains(name) {
                    return Err(ReelcutError::job(format!(
                        "Filter label [{name}] consumed before it is produced"
                    )));
                }
            }
        }
        for output in &outputs {
            if self.produced.contains(output) {
                return Err(ReelcutError::job(format!(
                    "Duplicate filter label [{output}]"
                )));
            }
        }

        let first = outputs
            .first()
            .map(|name| StreamRef::Label(name.clone()))
            .ok_or_else(|| ReelcutError::job("Filter node must produce at least one label"))?;

        self.produced.extend(outputs.iter().cloned());
        self.nodes.push(FilterNode {
            inputs,
            expr: expr.into(),
            outputs,
        });
        Ok(first)
    }

    /// Render the graph as `-filter_complex` text.
    pub fn render(&self) -> String {
        self.nodes
            .iter()
            .map(|node| {
                let inputs: String = node.inputs.iter().map(|r| r.render_pad()).collect();
                let outputs: String = node
                    .outputs
                    .iter()
                    .map(|label| format!("[{label}]"))
                    .collect();
                format!("{inputs}{}{outputs}", node.expr)
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}
