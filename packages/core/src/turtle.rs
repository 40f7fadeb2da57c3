//! Minimal Turtle serialization for triples built in code.

use std::fmt::Write as _;

/// Namespace prefixes declared in every emitted document, in output order.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rsa", "http://rdf.biosemantics.org/ontologies/rsa#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("so", "http://purl.obolibrary.org/obo/"),
    ("edam", "http://edamontology.org/"),
];

/// An RDF term as it appears in a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Absolute IRI, written as `<...>`.
    Iri(String),
    /// Prefixed name such as `rdf:type`; the prefix must be in [`PREFIXES`].
    Name(&'static str),
    /// Plain string literal.
    Literal(String),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Term::Literal(text.into())
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Term::Iri(iri) => {
                out.push('<');
                out.push_str(iri);
                out.push('>');
            }
            Term::Name(name) => out.push_str(name),
            Term::Literal(text) => {
                out.push('"');
                for c in text.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '"' => out.push_str("\\\""),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c => out.push(c),
                    }
                }
                out.push('"');
            }
        }
    }
}

/// A single subject–predicate–object statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

/// Serialize triples as Turtle.
///
/// Consecutive triples with the same subject share a statement (`;`), and
/// consecutive objects of the same predicate are listed with `,`. Triples
/// are written in the order given; duplicates are kept. No triples means
/// an empty document without prefix declarations.
pub fn write_turtle(triples: &[Triple]) -> String {
    if triples.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    for (prefix, iri) in PREFIXES {
        let _ = writeln!(out, "@prefix {prefix}: <{iri}>.");
    }
    out.push('\n');

    let mut previous: Option<&Triple> = None;
    for triple in triples {
        match previous {
            Some(p) if p.subject == triple.subject && p.predicate == triple.predicate => {
                out.push_str(", ");
            }
            Some(p) if p.subject == triple.subject => {
                out.push_str(";\n    ");
                triple.predicate.write_to(&mut out);
                out.push(' ');
            }
            _ => {
                if previous.is_some() {
                    out.push_str(".\n");
                }
                triple.subject.write_to(&mut out);
                out.push(' ');
                triple.predicate.write_to(&mut out);
                out.push(' ');
            }
        }
        triple.object.write_to(&mut out);
        previous = Some(triple);
    }
    out.push_str(".\n");
    out
}
