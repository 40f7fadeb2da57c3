//! The fixed operation table and the per-call pipeline.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::PipelineError;
use crate::graph::build_graph;
use crate::negotiate::{select, AcceptList, Representation, RepresentationChoice, JSON, TURTLE};
use crate::normalize::{normalize, NormalizedResult};
use crate::template::TemplateRegistry;

/// A remote operation exposed by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RunMutalyzer,
    Info,
    GetTranscriptsAndInfo,
}

/// A query parameter an operation passes on to the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub required: bool,
}

const fn required(name: &'static str) -> Param {
    Param { name, required: true }
}

const fn optional(name: &'static str) -> Param {
    Param { name, required: false }
}

const RUN_MUTALYZER_PARAMS: &[Param] = &[required("variant")];
const TRANSCRIPTS_PARAMS: &[Param] = &[required("genomicReference"), optional("geneName")];

const PASS_THROUGH: Representation = Representation::new(JSON, RepresentationChoice::PassThrough);
const RUN_MUTALYZER_REPRESENTATIONS: &[Representation] = &[
    PASS_THROUGH,
    Representation::new(TURTLE, RepresentationChoice::Template("runMutalyzer")),
];
const INFO_REPRESENTATIONS: &[Representation] = &[
    PASS_THROUGH,
    Representation::new(TURTLE, RepresentationChoice::Template("info")),
];
const TRANSCRIPTS_REPRESENTATIONS: &[Representation] = &[
    PASS_THROUGH,
    Representation::new(TURTLE, RepresentationChoice::Graph("getTranscriptsAndInfo")),
];

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::RunMutalyzer,
        Operation::Info,
        Operation::GetTranscriptsAndInfo,
    ];

    /// Name used both for the route and for the remote call.
    pub fn name(self) -> &'static str {
        match self {
            Operation::RunMutalyzer => "runMutalyzer",
            Operation::Info => "info",
            Operation::GetTranscriptsAndInfo => "getTranscriptsAndInfo",
        }
    }

    /// Parameters picked from the request, in the order they are forwarded.
    pub fn params(self) -> &'static [Param] {
        match self {
            Operation::RunMutalyzer => RUN_MUTALYZER_PARAMS,
            Operation::Info => &[],
            Operation::GetTranscriptsAndInfo => TRANSCRIPTS_PARAMS,
        }
    }

    /// Representations in preference order for wildcard requests.
    pub fn representations(self) -> &'static [Representation] {
        match self {
            Operation::RunMutalyzer => RUN_MUTALYZER_REPRESENTATIONS,
            Operation::Info => INFO_REPRESENTATIONS,
            Operation::GetTranscriptsAndInfo => TRANSCRIPTS_REPRESENTATIONS,
        }
    }

    /// Template names this operation renders through.
    pub fn templates(self) -> impl Iterator<Item = &'static str> {
        self.representations().iter().filter_map(|r| match r.choice {
            RepresentationChoice::Template(name) => Some(name),
            _ => None,
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown operation: {s:?}"))
    }
}

/// Request parameters in forwarding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, replacing the value of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parameters first, then result fields; a result field with the same
    /// name overrides the parameter but keeps its position.
    pub fn merge(&self, result: &NormalizedResult) -> Map<String, Value> {
        let mut merged: Map<String, Value> = self
            .iter()
            .map(|(n, v)| (n.to_string(), Value::String(v.to_string())))
            .collect();
        for (key, value) in result.fields() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// A produced representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub media_type: &'static str,
    pub body: String,
}

/// Turns raw remote results into negotiated representations.
///
/// Holds the template registry; cheap to clone and safe to share.
#[derive(Clone)]
pub struct Pipeline {
    templates: Arc<TemplateRegistry>,
}

impl Pipeline {
    /// Wrap a compiled registry.
    ///
    /// Fails with [`PipelineError::TemplateNotFound`] if the registry lacks a
    /// template that some operation can negotiate.
    pub fn new(templates: Arc<TemplateRegistry>) -> Result<Self, PipelineError> {
        if let Some(missing) = Operation::ALL
            .into_iter()
            .flat_map(Operation::templates)
            .find(|name| !templates.contains(name))
        {
            return Err(PipelineError::TemplateNotFound(missing.to_string()));
        }
        Ok(Self { templates })
    }

    /// Compile the built-in templates for every operation in the table.
    pub fn builtin() -> Result<Self, PipelineError> {
        let required = Operation::ALL.into_iter().flat_map(Operation::templates);
        Self::new(Arc::new(TemplateRegistry::builtin(required)?))
    }

    /// Negotiate before the remote call so unacceptable requests fail early.
    pub fn negotiate(
        &self,
        operation: Operation,
        accepted: &AcceptList,
    ) -> Result<Representation, PipelineError> {
        select(accepted, operation.representations())
    }

    /// Normalize `raw` and produce the chosen representation.
    pub fn produce(
        &self,
        representation: Representation,
        params: &RequestParams,
        raw: Value,
    ) -> Result<Output, PipelineError> {
        let result = normalize(raw)?;
        let body = match representation.choice {
            RepresentationChoice::PassThrough => {
                serde_json::to_string(&Value::Object(result.into_fields()))?
            }
            RepresentationChoice::Template(name) => {
                self.templates.render(name, params.merge(&result))?
            }
            RepresentationChoice::Graph(_) => build_graph(&params.merge(&result)),
        };
        Ok(Output {
            media_type: representation.media_type,
            body,
        })
    }

    /// Negotiate, normalize and render in one step.
    pub fn respond(
        &self,
        operation: Operation,
        params: &RequestParams,
        accepted: &AcceptList,
        raw: Value,
    ) -> Result<Output, PipelineError> {
        let representation = self.negotiate(operation, accepted)?;
        self.produce(representation, params, raw)
    }
}
