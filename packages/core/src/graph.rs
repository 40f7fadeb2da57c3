//! Triple graph for `getTranscriptsAndInfo` results.
//!
//! The remote result lists the transcripts annotated on one genomic
//! reference, but the fields that belong to a transcript are spread over a
//! nested structure. [`TranscriptScan`] walks that structure depth-first in
//! key order and folds the recognized fields into numbered
//! [`TranscriptEntry`] records; [`transcript_triples`] then maps them onto
//! the RSA / SO / EDAM vocabulary.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::turtle::{write_turtle, Term, Triple};

const NUCCORE: &str = "http://www.ncbi.nlm.nih.gov/nuccore/";
const PROTEIN: &str = "http://www.ncbi.nlm.nih.gov/protein/";
const IDENTIFIERS_REFSEQ: &str = "http://identifiers.org/refseq/";
const UNIPROT_REFSEQ: &str = "http://purl.uniprot.org/refseq/";
const ANNOTATION_HOST: &str = "https://mutalyzer.nl/nuccore/";

// --- scan --------------------------------------------------------------------

/// What a single key/value pair means to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<'a> {
    GenomicReference(&'a str),
    /// A transcript start, with its coordinate when the value is a scalar.
    TranscriptStart(Option<String>),
    TranscriptEnd(Option<String>),
    RnaAccession(&'a str),
    ProteinAccession(&'a str),
    /// An `id` that is neither an RNA nor a protein accession.
    UnrelatedIdentifier(&'a str),
    Ignored,
}

impl<'a> Field<'a> {
    /// Classify a key/value pair.
    ///
    /// Transcript coordinates always classify by key, so a null or nested
    /// start still opens a transcript. Other values of an unexpected shape
    /// are ignored.
    pub fn classify(key: &str, value: &'a Value) -> Self {
        match (key, value) {
            ("genomicReference", Value::String(s)) => Field::GenomicReference(s),
            ("gTransStart", v) => Field::TranscriptStart(coordinate(v)),
            ("gTransEnd", v) => Field::TranscriptEnd(coordinate(v)),
            ("id", Value::String(s)) if s.contains("NM") => Field::RnaAccession(s),
            ("id", Value::String(s)) if s.contains("NP") => Field::ProteinAccession(s),
            ("id", Value::String(s)) => Field::UnrelatedIdentifier(s),
            _ => Field::Ignored,
        }
    }
}

/// One transcript assembled from the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub index: i64,
    pub transcript_id: Option<String>,
    pub protein_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Accumulator advanced one key/value pair at a time by [`observe`].
///
/// Each transcript start opens a new entry under the next index; end
/// coordinates and accessions attach to the most recently opened index.
/// An identifier that is not an accession steps the index back by one.
///
/// [`observe`]: TranscriptScan::observe
#[derive(Debug, Clone, Default)]
pub struct TranscriptScan {
    genomic_reference: Option<String>,
    current: i64,
    entries: BTreeMap<i64, TranscriptEntry>,
}

impl TranscriptScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan an ordered mapping, descending into nested records and arrays.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let mut scan = Self::new();
        scan.walk_map(fields);
        scan
    }

    /// Apply a single key/value pair.
    pub fn observe(&mut self, key: &str, value: &Value) {
        match Field::classify(key, value) {
            Field::GenomicReference(reference) => {
                self.genomic_reference = Some(reference.to_string());
            }
            Field::TranscriptStart(start) => {
                self.current += 1;
                self.entries.insert(
                    self.current,
                    TranscriptEntry {
                        index: self.current,
                        start,
                        ..TranscriptEntry::default()
                    },
                );
            }
            Field::TranscriptEnd(end) => self.entry().end = end,
            Field::RnaAccession(id) => self.entry().transcript_id = Some(id.to_string()),
            Field::ProteinAccession(id) => self.entry().protein_id = Some(id.to_string()),
            Field::UnrelatedIdentifier(id) => {
                tracing::debug!(id, index = self.current, "identifier is not an accession, stepping back");
                self.current -= 1;
            }
            Field::Ignored => {}
        }
    }

    pub fn genomic_reference(&self) -> Option<&str> {
        self.genomic_reference.as_deref()
    }

    /// Number of transcripts according to the running index. Can be zero or
    /// negative after rollbacks.
    pub fn count(&self) -> i64 {
        self.current
    }

    /// Entries for indices `1..=count`, skipping indices never filled in.
    pub fn transcripts(&self) -> impl Iterator<Item = &TranscriptEntry> {
        (1..=self.current).filter_map(|i| self.entries.get(&i))
    }

    fn entry(&mut self) -> &mut TranscriptEntry {
        let index = self.current;
        self.entries.entry(index).or_insert_with(|| TranscriptEntry {
            index,
            ..TranscriptEntry::default()
        })
    }

    fn walk_map(&mut self, map: &Map<String, Value>) {
        for (key, value) in map {
            self.observe(key, value);
            self.walk(value);
        }
    }

    fn walk(&mut self, value: &Value) {
        match value {
            Value::Object(map) => self.walk_map(map),
            Value::Array(items) => items.iter().for_each(|v| self.walk(v)),
            _ => {}
        }
    }
}

// --- emission ----------------------------------------------------------------

/// Map a finished scan onto triples.
///
/// Produces nothing when the count is not positive or no genomic reference
/// was seen. Transcripts without an RNA accession are skipped; a missing
/// protein accession or coordinate drops only the triples that need it.
pub fn transcript_triples(scan: &TranscriptScan) -> Vec<Triple> {
    let mut triples = Vec::new();
    let Some(reference) = scan.genomic_reference().filter(|_| scan.count() > 0) else {
        return triples;
    };

    let mut add = |subject: &Term, predicate: &'static str, object: Term| {
        triples.push(Triple {
            subject: subject.clone(),
            predicate: Term::Name(predicate),
            object,
        });
    };

    let genomic = Term::iri(format!("{NUCCORE}{reference}"));
    add(&genomic, "rdf:type", Term::Name("rsa:GenomicReferenceSequence"));
    add(&genomic, "rdf:label", Term::literal(reference));
    add(&genomic, "dcterms:identifiers", Term::literal(reference));

    for entry in scan.transcripts() {
        let Some(accession) = entry.transcript_id.as_deref() else {
            tracing::debug!(index = entry.index, "transcript has no RNA accession, skipping");
            continue;
        };
        let base = accession.split('.').next().unwrap_or(accession);

        let transcript = Term::iri(format!("{NUCCORE}{accession}"));
        let base_iri = Term::iri(format!("{NUCCORE}{base}"));
        let annotation_iri = format!("{ANNOTATION_HOST}{accession}/annotation/1");
        let region = Term::iri(format!("{annotation_iri}/region/1"));
        let annotation = Term::iri(annotation_iri);

        add(&transcript, "rsa:isSubSequenceOf", genomic.clone());
        add(&transcript, "rdf:type", Term::Name("rsa:TranscriptReferenceSequence"));
        add(&transcript, "rdf:label", Term::literal(accession));
        add(&transcript, "dcterms:identifiers", Term::literal(accession));
        add(&transcript, "rsa:hasAnnotation", annotation.clone());
        add(&transcript, "rdfs:seeAlso", Term::iri(format!("{IDENTIFIERS_REFSEQ}{accession}")));
        add(&transcript, "rdfs:seeAlso", base_iri.clone());

        if let Some(protein_id) = entry.protein_id.as_deref() {
            let protein = Term::iri(format!("{PROTEIN}{protein_id}"));
            add(&protein, "so:so_associated_with", transcript.clone());
            add(&protein, "rdf:type", Term::Name("rsa:ProteinReferenceSequence"));
            add(&protein, "rdf:label", Term::literal(protein_id));
            add(&protein, "dcterms:identifiers", Term::literal(protein_id));
            add(&protein, "rdfs:seeAlso", Term::iri(format!("{UNIPROT_REFSEQ}{protein_id}")));
        }

        // edam:data_1093 is "Sequence accession"
        add(&base_iri, "rdf:type", Term::Name("edam:data_1093"));
        add(&base_iri, "rdf:label", Term::literal(base));
        add(&base_iri, "dcterms:identifiers", Term::literal(base));
        add(&base_iri, "rdfs:seeAlso", Term::iri(format!("{IDENTIFIERS_REFSEQ}{base}")));

        add(&annotation, "rdf:type", Term::Name("rsa:SequenceAnnotation"));
        add(&annotation, "rsa:mapsTo", region.clone());
        add(&region, "rdf:type", Term::Name("rsa:Region"));
        if let Some(start) = &entry.start {
            add(&region, "rsa:start", Term::literal(start.as_str()));
        }
        if let Some(end) = &entry.end {
            add(&region, "rsa:end", Term::literal(end.as_str()));
        }
    }

    triples
}

/// Scan the merged fields and serialize the resulting graph as Turtle.
///
/// Returns an empty string when no transcripts were found.
pub fn build_graph(fields: &Map<String, Value>) -> String {
    write_turtle(&transcript_triples(&TranscriptScan::from_fields(fields)))
}

fn coordinate(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// --- tests -------------------------------------------------------------------
