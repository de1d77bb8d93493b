//! Turns a [`SearchRequest`] into the offers streamed back to the client.

use common::{Job, Offer, SearchRequest};
use tracing::debug;

use crate::config::IndexSettings;
use crate::error::Result;
use crate::index::JobIndex;

/// Lowercased query terms, duplicates removed, in query order. Punctuation
/// around a term is dropped ("rust:" is "rust").
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in query
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|t| !t.is_empty())
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Percentage of query terms that appear in the job's skills.
///
/// A term matches a skill exactly or one word of a multi-word skill
/// ("machine learning").
pub fn match_percent(query: &str, job: &Job) -> u8 {
    let terms = query_terms(query);
    if terms.is_empty() {
        return 0;
    }

    let skills = job.skill_list();
    let hits = terms
        .iter()
        .filter(|term| {
            skills
                .iter()
                .any(|skill| skill == *term || skill.split_whitespace().any(|w| w == *term))
        })
        .count();

    ((hits as f64 / terms.len() as f64) * 100.0).round() as u8
}

/// Remote jobs match any location; otherwise a case-insensitive substring match.
pub fn location_matches(job_location: &str, wanted: &str) -> bool {
    let job_location = job_location.to_lowercase();
    job_location.contains("remote") || job_location.contains(&wanted.trim().to_lowercase())
}

pub fn to_offer(job: &Job, query: &str) -> Offer {
    Offer {
        title: job.title.clone(),
        company: job.company.clone(),
        skills: job.skills.clone(),
        salary_min: job.salary_min.map(|s| s as f64),
        match_percent: f64::from(match_percent(query, job)),
        url: job.url.clone(),
    }
}

/// Offers for `request`, in relevance order. The client does the salary sort.
pub fn find_offers(
    index: &JobIndex,
    request: &SearchRequest,
    settings: &IndexSettings,
) -> Result<Vec<Offer>> {
    let candidates = index.search(&request.query, settings.max_candidates)?;
    let total = candidates.len();

    let offers: Vec<Offer> = candidates
        .iter()
        .filter(|job| location_matches(&job.location, &request.location))
        .take(settings.max_results)
        .map(|job| to_offer(job, &request.query))
        .collect();

    debug!(
        query = %request.query,
        location = %request.location,
        candidates = total,
        offers = offers.len(),
        "Search finished"
    );

    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, location: &str, skills: &str) -> Job {
        Job {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: location.to_string(),
            description: String::new(),
            skills: skills.to_string(),
            salary_min: None,
            url: String::new(),
        }
    }

    #[test]
    fn test_query_terms_dedupes_and_lowercases() {
        assert_eq!(query_terms("Rust, rust  Tokio"), vec!["rust", "tokio"]);
        assert!(query_terms("  ").is_empty());
    }

    #[test]
    fn test_query_terms_drop_surrounding_punctuation() {
        assert_eq!(query_terms("rust: (async)"), vec!["rust", "async"]);
        assert_eq!(query_terms("node.js"), vec!["node.js"]);
        assert!(query_terms(":: ()").is_empty());
    }

    #[test]
    fn test_match_percent_full_and_partial() {
        let job = job("Backend", "London", "Rust, Tokio, PostgreSQL");
        assert_eq!(match_percent("rust tokio", &job), 100);
        assert_eq!(match_percent("rust python", &job), 50);
        assert_eq!(match_percent("rust python go", &job), 33);
        assert_eq!(match_percent("java", &job), 0);
        assert_eq!(match_percent("", &job), 0);
    }

    #[test]
    fn test_match_percent_multi_word_skill() {
        let job = job("ML", "London", "machine learning, python");
        assert_eq!(match_percent("learning", &job), 100);
    }

    #[test]
    fn test_location_matches() {
        assert!(location_matches("London, UK", "london"));
        assert!(location_matches("Anywhere (Remote)", "London"));
        assert!(!location_matches("Berlin", "London"));
    }

    #[test]
    fn test_match_percent_ignores_query_punctuation() {
        let job = job("Backend", "London", "rust, async");
        assert_eq!(match_percent("rust: async", &job), 100);
    }

    #[test]
    fn test_to_offer_keeps_missing_salary() {
        let offer = to_offer(&job("Backend", "London", "rust"), "rust");
        assert_eq!(offer.salary_min, None);
        assert_eq!(offer.match_percent, 100.0);
    }

    #[test]
    fn test_to_offer_carries_salary_and_url() {
        let job = Job {
            salary_min: Some(65000),
            url: "https://jobs.test/backend".to_string(),
            ..job("Backend", "London", "rust")
        };
        let offer = to_offer(&job, "rust");
        assert_eq!(offer.salary_min, Some(65000.0));
        assert_eq!(offer.url, "https://jobs.test/backend");
    }

    #[test]
    fn test_find_offers_filters_location_and_limits() {
        let index = JobIndex::create_in_ram(&[
            job("Rust Engineer London", "London", "rust"),
            job("Rust Engineer Berlin", "Berlin", "rust"),
            job("Rust Engineer Remote", "Remote", "rust"),
            job("Rust Engineer Leeds", "Leeds", "rust"),
        ])
        .unwrap();
        let mut settings = IndexSettings::default();

        let offers = find_offers(&index, &SearchRequest::new("rust", ""), &settings).unwrap();
        let mut titles: Vec<_> = offers.iter().map(|o| o.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Rust Engineer London", "Rust Engineer Remote"]);

        settings.max_results = 1;
        let offers = find_offers(&index, &SearchRequest::new("rust", "London"), &settings).unwrap();
        assert_eq!(offers.len(), 1);
    }
}
