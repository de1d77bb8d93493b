//! Search results presentation: loader state plus the salary-sorted card list.

use common::{Offer, SearchRequest};
use tracing::debug;

use crate::card::Card;
use crate::error::Result;
use crate::results::ResultSet;
use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Hidden,
    Visible,
}

pub struct ResultsView<V: View> {
    view: V,
    results: ResultSet,
    loader: Loader,
}

impl<V: View> ResultsView<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            results: ResultSet::new(),
            loader: Loader::Hidden,
        }
    }

    /// Begins a search cycle: drops previous results, shows the loader and
    /// returns the request to send.
    pub fn start_search(&mut self, query: &str, location: &str) -> SearchRequest {
        self.results.clear();
        self.view.clear();
        self.show_loader();

        SearchRequest::new(query, location)
    }

    /// Incorporates one raw server message.
    ///
    /// The loader is hidden before parsing. A malformed message leaves the
    /// result set untouched and returns the parse error.
    pub fn on_offer_received(&mut self, raw: &str) -> Result<Card> {
        self.hide_loader();

        let offer: Offer = serde_json::from_str(raw)?;
        let card = Card::render(&offer);
        debug!(title = %card.title, salary = card.salary, "Offer received");

        self.results.push(card.clone());
        self.sort_results();

        Ok(card)
    }

    /// Re-renders the whole set in descending salary order, followed by the
    /// salary summary when any offer advertises a salary.
    pub fn sort_results(&mut self) {
        self.results.sort();
        self.view.clear();
        for card in self.results.iter() {
            self.view.append_card(card);
        }
        if let Some(stats) = self.results.salary_stats() {
            self.view.show_summary(&stats);
        }
    }

    /// Hides the loader and surfaces `message`, for failed or stalled connections.
    pub fn report_error(&mut self, message: &str) {
        self.hide_loader();
        self.view.report_error(message);
    }

    pub fn loader(&self) -> Loader {
        self.loader
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    fn show_loader(&mut self) {
        self.loader = Loader::Visible;
        self.view.set_loading(true);
    }

    fn hide_loader(&mut self) {
        if self.loader == Loader::Visible {
            self.loader = Loader::Hidden;
            self.view.set_loading(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::SalaryStats;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Append(f64),
        Loading(bool),
        Error(String),
        Summary(SalaryStats),
    }

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<Call>,
    }

    impl View for RecordingView {
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn append_card(&mut self, card: &Card) {
            self.calls.push(Call::Append(card.salary));
        }

        fn set_loading(&mut self, loading: bool) {
            self.calls.push(Call::Loading(loading));
        }

        fn report_error(&mut self, message: &str) {
            self.calls.push(Call::Error(message.to_string()));
        }

        fn show_summary(&mut self, stats: &SalaryStats) {
            self.calls.push(Call::Summary(*stats));
        }
    }

    fn offer_json(title: &str, salary: Option<f64>) -> String {
        serde_json::json!({
            "title": title,
            "company": "Acme",
            "skills": "rust",
            "salary_min": salary,
            "match": 60,
        })
        .to_string()
    }

    /// Salaries of the cards appended after the last clear.
    fn rendered(view: &RecordingView) -> Vec<f64> {
        let start = view
            .calls
            .iter()
            .rposition(|c| *c == Call::Clear)
            .map_or(0, |i| i + 1);
        view.calls[start..]
            .iter()
            .filter_map(|c| match c {
                Call::Append(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_search_clears_and_shows_loader() {
        let mut results = ResultsView::new(RecordingView::default());
        let request = results.start_search("rust", "");

        assert_eq!(request, SearchRequest::new("rust", "London"));
        assert_eq!(results.loader(), Loader::Visible);
        assert_eq!(
            results.view().calls,
            vec![Call::Clear, Call::Loading(true)]
        );
    }

    #[test]
    fn test_loader_hidden_once_on_first_message() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "Leeds");
        results.on_offer_received(&offer_json("a", Some(1.0))).unwrap();
        assert_eq!(results.loader(), Loader::Hidden);
        results.on_offer_received(&offer_json("b", Some(2.0))).unwrap();
        results.on_offer_received(&offer_json("c", Some(3.0))).unwrap();

        let hides = results
            .view()
            .calls
            .iter()
            .filter(|c| **c == Call::Loading(false))
            .count();
        assert_eq!(hides, 1);
    }

    #[test]
    fn test_rendered_order_follows_salary() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        for salary in [30000.0, 50000.0, 10000.0] {
            results.on_offer_received(&offer_json("x", Some(salary))).unwrap();
        }
        assert_eq!(rendered(results.view()), vec![50000.0, 30000.0, 10000.0]);
    }

    #[test]
    fn test_decimal_salary_is_accepted() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        let card = results
            .on_offer_received(
                r#"{"title":"Dev","company":"Acme","skills":"rust","salary_min":45000.0,"match":60}"#,
            )
            .unwrap();
        assert_eq!(card.salary, 45000.0);
        results.on_offer_received(&offer_json("half", Some(45000.5))).unwrap();

        assert_eq!(results.results().len(), 2);
        assert_eq!(rendered(results.view()), vec![45000.5, 45000.0]);
    }

    #[test]
    fn test_each_offer_renders_the_set_once() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        results.view_mut().calls.clear();
        results.on_offer_received(&offer_json("a", Some(10.0))).unwrap();
        results.on_offer_received(&offer_json("b", Some(20.0))).unwrap();

        let clears = results
            .view()
            .calls
            .iter()
            .filter(|c| **c == Call::Clear)
            .count();
        assert_eq!(clears, 2);
        assert_eq!(rendered(results.view()), vec![20.0, 10.0]);
    }

    #[test]
    fn test_summary_follows_the_cards() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        results.on_offer_received(&offer_json("none", None)).unwrap();
        assert!(
            !results.view().calls.iter().any(|c| matches!(c, Call::Summary(_))),
            "no summary without an advertised salary"
        );

        results.on_offer_received(&offer_json("a", Some(30000.0))).unwrap();
        results.on_offer_received(&offer_json("b", Some(50000.0))).unwrap();
        assert_eq!(
            results.view().calls.last(),
            Some(&Call::Summary(SalaryStats {
                count: 2,
                mean: 40000,
                median: 40000,
                min: 30000.0,
                max: 50000.0,
            }))
        );
    }

    #[test]
    fn test_null_salary_sorts_as_zero() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        let card = results.on_offer_received(&offer_json("none", None)).unwrap();
        assert_eq!(card.salary, 0.0);
        results.on_offer_received(&offer_json("some", Some(1.0))).unwrap();
        assert_eq!(rendered(results.view()), vec![1.0, 0.0]);
    }

    #[test]
    fn test_new_search_clears_previous_offers() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        results.on_offer_received(&offer_json("old", Some(99000.0))).unwrap();

        results.start_search("go", "");
        assert!(results.results().is_empty());
        assert_eq!(rendered(results.view()), Vec::<f64>::new());

        results.on_offer_received(&offer_json("new", Some(1000.0))).unwrap();
        assert_eq!(rendered(results.view()), vec![1000.0]);
    }

    #[test]
    fn test_malformed_message_is_skipped() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        results.on_offer_received(&offer_json("ok", Some(5.0))).unwrap();

        assert!(results.on_offer_received("{not json").is_err());
        assert_eq!(results.results().len(), 1);

        results.on_offer_received(&offer_json("later", Some(7.0))).unwrap();
        assert_eq!(results.results().salaries(), vec![7.0, 5.0]);
    }

    #[test]
    fn test_report_error_hides_loader() {
        let mut results = ResultsView::new(RecordingView::default());
        results.start_search("rust", "");
        results.report_error("connection refused");
        assert_eq!(results.loader(), Loader::Hidden);
        assert_eq!(
            results.view().calls.last(),
            Some(&Call::Error("connection refused".into()))
        );
    }
}
