//! Full-text index over job listings.

use common::Job;
use std::fs;
use std::path::Path;
use tantivy::{
    Document, Index, IndexReader, ReloadPolicy,
    collector::TopDocs,
    query::QueryParser,
    schema::{Field, NumericOptions, STORED, Schema, TEXT},
};
use tracing::info;

use crate::error::Result;

/// Heap for the index writer (50MB)
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Field handles for the job schema
#[derive(Clone, Copy)]
struct JobFields {
    title: Field,
    company: Field,
    location: Field,
    description: Field,
    skills: Field,
    salary_min: Field,
    url: Field,
}

/// Builds the Tantivy schema for job indexing
fn build_schema() -> (Schema, JobFields) {
    let mut schema_builder = Schema::builder();

    // Searchable and stored (returned in offers)
    let title = schema_builder.add_text_field("title", TEXT | STORED);
    let company = schema_builder.add_text_field("company", TEXT | STORED);
    let skills = schema_builder.add_text_field("skills", TEXT | STORED);

    // Stored for the location filter, searchable as well
    let location = schema_builder.add_text_field("location", TEXT | STORED);

    // Searchable only (saves space, never sent back)
    let description = schema_builder.add_text_field("description", TEXT);
    let url = schema_builder.add_text_field("url", STORED);

    let int_options = NumericOptions::default().set_indexed().set_stored();
    let salary_min = schema_builder.add_i64_field("salary_min", int_options);

    let fields = JobFields {
        title,
        company,
        location,
        description,
        skills,
        salary_min,
        url,
    };

    (schema_builder.build(), fields)
}

/// Reduces user input to plain lowercase words so the query parser never
/// sees field prefixes, operators or brackets. Empty if nothing is left.
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub struct JobIndex {
    reader: IndexReader,
    query_parser: QueryParser,
    fields: JobFields,
}

impl JobIndex {
    /// Rebuilds the on-disk index at `path` from `jobs`.
    pub fn create_in_dir(path: &Path, jobs: &[Job]) -> Result<Self> {
        let (schema, fields) = build_schema();

        // Fresh re-index on every start, the schema may have changed
        if path.exists() {
            info!("Rebuilding index in {:?}", path);
            fs::remove_dir_all(path)?;
        } else {
            info!("Creating new index in {:?}", path);
        }
        fs::create_dir_all(path)?;

        let index = Index::create_in_dir(path, schema)?;
        Self::populate(index, fields, jobs)
    }

    pub fn create_in_ram(jobs: &[Job]) -> Result<Self> {
        let (schema, fields) = build_schema();
        let index = Index::create_in_ram(schema);
        Self::populate(index, fields, jobs)
    }

    fn populate(index: Index, fields: JobFields, jobs: &[Job]) -> Result<Self> {
        let mut index_writer = index.writer(WRITER_HEAP_BYTES)?;

        info!("Indexing {} jobs...", jobs.len());

        for job in jobs {
            let mut doc = Document::new();
            doc.add_text(fields.title, &job.title);
            doc.add_text(fields.company, &job.company);
            doc.add_text(fields.location, &job.location);
            doc.add_text(fields.description, &job.description);
            doc.add_text(fields.skills, &job.skills);
            doc.add_text(fields.url, &job.url);
            if let Some(salary) = job.salary_min {
                doc.add_i64(fields.salary_min, salary);
            }
            index_writer.add_document(doc)?;
        }

        index_writer.commit()?;
        info!("Indexing complete");

        // Built once, never written again
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        let query_parser = QueryParser::for_index(
            &index,
            vec![fields.title, fields.description, fields.skills],
        );

        Ok(Self {
            reader,
            query_parser,
            fields,
        })
    }

    /// Top `limit` jobs for `query`, best match first. Punctuation in
    /// `query` is treated as a word separator, never as query syntax.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Job>> {
        let query = sanitize_query(query);
        if query.is_empty() || limit == 0 {
            return Ok(vec![]);
        }

        let query = self.query_parser.parse_query(&query)?;
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut jobs = Vec::with_capacity(top_docs.len());
        for (_score, doc_address) in top_docs {
            let doc = searcher.doc(doc_address)?;
            jobs.push(self.to_job(&doc));
        }

        Ok(jobs)
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn to_job(&self, doc: &Document) -> Job {
        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_text())
                .unwrap_or_default()
                .to_string()
        };

        Job {
            title: text(self.fields.title),
            company: text(self.fields.company),
            location: text(self.fields.location),
            // Not stored
            description: String::new(),
            skills: text(self.fields.skills),
            salary_min: doc
                .get_first(self.fields.salary_min)
                .and_then(|v| v.as_i64()),
            url: text(self.fields.url),
        }
    }
}
