//! Template-rendered Turtle representations.
//!
//! Templates are compiled once into a [`TemplateRegistry`] at startup and
//! shared read-only afterwards. Rendering never touches the filesystem.

use std::fmt;

use handlebars::Handlebars;
use serde_json::{Map, Value};

use crate::error::PipelineError;

/// Built-in template sources, keyed by template name.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("runMutalyzer", include_str!("../templates/runMutalyzer.ttl.hbs")),
    ("info", include_str!("../templates/info.ttl.hbs")),
];

/// Immutable set of compiled templates.
pub struct TemplateRegistry {
    engine: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Compile the given sources and check that every `required` name exists.
    ///
    /// Fails with [`PipelineError::Template`] on a compile error and with
    /// [`PipelineError::TemplateNotFound`] for a missing required template.
    pub fn new(
        sources: &[(&str, &str)],
        required: impl IntoIterator<Item = &'static str>,
    ) -> Result<Self, PipelineError> {
        let mut engine = Handlebars::new();
        // the output is Turtle, not HTML
        engine.register_escape_fn(handlebars::no_escape);
        for (name, source) in sources {
            engine
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }
        for name in required {
            if !engine.has_template(name) {
                return Err(PipelineError::TemplateNotFound(name.to_string()));
            }
        }
        Ok(Self { engine })
    }

    /// Compile [`BUILTIN_TEMPLATES`].
    pub fn builtin(
        required: impl IntoIterator<Item = &'static str>,
    ) -> Result<Self, PipelineError> {
        Self::new(BUILTIN_TEMPLATES, required)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engine.has_template(name)
    }

    /// Render `data` through the named template after escaping every dot in
    /// its string leaves.
    pub fn render(&self, name: &str, data: Map<String, Value>) -> Result<String, PipelineError> {
        if !self.engine.has_template(name) {
            return Err(PipelineError::TemplateNotFound(name.to_string()));
        }
        let data = escape_dots(Value::Object(data));
        Ok(self.engine.render(name, &data).map_err(Box::new)?)
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry").finish_non_exhaustive()
    }
}

/// Replace every `.` in every string leaf with `\.`, at any depth.
///
/// Turtle prefixed names need the escape for dots inside accessions such as
/// `NM_003002.2`. Non-string leaves are returned unchanged.
pub fn escape_dots(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.replace('.', "\\.")),
        Value::Array(items) => Value::Array(items.into_iter().map(escape_dots).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, escape_dots(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn escapes_nested_string_leaves_only() {
        let escaped = escape_dots(json!({
            "id": "NM_003002.2",
            "errors": 0,
            "ratio": 1.5,
            "list": ["a.b", 2, { "deep": "c.d.e" }]
        }));
        assert_eq!(
            escaped,
            json!({
                "id": "NM_003002\\.2",
                "errors": 0,
                "ratio": 1.5,
                "list": ["a\\.b", 2, { "deep": "c\\.d\\.e" }]
            })
        );
    }

    #[test]
    fn builtin_templates_compile() {
        let registry = TemplateRegistry::builtin(["runMutalyzer", "info"]).unwrap();
        assert!(registry.contains("runMutalyzer"));
        assert!(registry.contains("info"));
    }

    #[test]
    fn missing_required_template_fails_at_construction() {
        let err = TemplateRegistry::builtin(["getProtein"]).unwrap_err();
        assert!(matches!(err, PipelineError::TemplateNotFound(name) if name == "getProtein"));
    }

    #[test]
    fn broken_source_fails_at_construction() {
        let err = TemplateRegistry::new(&[("bad", "{{#if x}}open")], []).unwrap_err();
        assert!(matches!(err, PipelineError::Template(_)));
    }

    #[test]
    fn renders_escaped_accessions() {
        let registry = TemplateRegistry::builtin(["runMutalyzer"]).unwrap();
        let out = registry
            .render(
                "runMutalyzer",
                data(json!({
                    "variant": "NM_003002.2:c.274G>T",
                    "sourceId": "NM_003002.2",
                    "sourceAccession": "NM_003002",
                    "molecule": "n",
                    "errors": 0
                })),
            )
            .unwrap();
        assert!(out.contains("nuccore:NM_003002\\.2 rdf:type rsa:ReferenceSequence"));
        assert!(out.contains("rdfs:seeAlso refseq:NM_003002\\.2"));
        assert!(out.contains("rsa:moleculeType rsa:n"));
        assert!(!out.contains("NM_003002.2"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let registry = TemplateRegistry::builtin(["info"]).unwrap();
        let input = data(json!({ "version": "2.0.35", "nomenclatureVersion": "15.11" }));
        let first = registry.render("info", input.clone()).unwrap();
        let second = registry.render("info", input).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("dcterms:hasVersion release:2\\.0\\.35"));
        assert!(first.contains("dcterms:conformsTo hgvs:15\\.11"));
    }

    #[test]
    fn unknown_template_at_render_time() {
        let registry = TemplateRegistry::builtin([]).unwrap();
        assert!(matches!(
            registry.render("nope", Map::new()),
            Err(PipelineError::TemplateNotFound(_))
        ));
    }
}
