//! Rendering surface for search results.

use std::io::Write;

use tracing::warn;

use crate::card::Card;
use crate::results::SalaryStats;

/// Everything the results logic needs from a rendering surface.
pub trait View {
    /// Detach every rendered card.
    fn clear(&mut self);

    /// Attach `card` after the ones already shown.
    fn append_card(&mut self, card: &Card);

    fn set_loading(&mut self, loading: bool);

    /// Surface a connection-level problem to the user.
    fn report_error(&mut self, _message: &str) {}

    /// Salary figures for the cards currently shown.
    fn show_summary(&mut self, _stats: &SalaryStats) {}
}

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Plain text view over any writer, stdout in the CLI.
pub struct TerminalView<W: Write> {
    out: W,
    ansi: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self { out, ansi }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn clear(&mut self) {
        if self.ansi {
            self.write(CLEAR_SCREEN);
        } else {
            self.write("----\n");
        }
    }

    fn append_card(&mut self, card: &Card) {
        let indicator = format!("({:>4})", card.indicator());
        let indicator = if self.ansi {
            let colour = match card.class() {
                "high-match" => GREEN,
                _ => YELLOW,
            };
            format!("{colour}{indicator}{RESET}")
        } else {
            format!("{indicator} [{}]", card.class())
        };

        let [title, company, salary, skills] = card.text_block();
        let mut text = format!(
            "{indicator} {title}\n       {company}\n       {salary}\n       {skills}\n"
        );
        if !card.url.is_empty() {
            text.push_str(&format!("       {}\n", card.url));
        }
        text.push('\n');
        self.write(&text);
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.write("Searching...\n");
        }
    }

    fn report_error(&mut self, message: &str) {
        self.write(&format!("Error: {message}\n"));
    }

    fn show_summary(&mut self, stats: &SalaryStats) {
        self.write(&format!(
            "Salaries ({} offers): min {}, median {}, mean {}, max {}\n",
            stats.count, stats.min, stats.median, stats.mean, stats.max
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::MatchTier;

    fn card() -> Card {
        Card {
            salary: 0.0,
            tier: MatchTier::High,
            match_percent: 80,
            title: "Rust Developer".into(),
            company: "Ferris Ltd".into(),
            skills: "rust".into(),
            url: String::new(),
        }
    }

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_card_output() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.append_card(&card());
        let text = output(view);
        assert!(text.starts_with("( 80%) [high-match] Rust Developer\n"));
        assert!(text.contains("Salary: 0"));
        assert!(text.contains("Skills: rust"));
        assert!(text.ends_with("Skills: rust\n\n"));
    }

    #[test]
    fn test_card_url_line() {
        let mut view = TerminalView::new(Vec::new(), false);
        let card = Card {
            url: "https://jobs.test/rust".into(),
            ..card()
        };
        view.append_card(&card);
        assert!(output(view).ends_with("Skills: rust\n       https://jobs.test/rust\n\n"));
    }

    #[test]
    fn test_summary_line() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.show_summary(&SalaryStats {
            count: 3,
            mean: 30000,
            median: 30000,
            min: 10000.0,
            max: 50000.5,
        });
        assert_eq!(
            output(view),
            "Salaries (3 offers): min 10000, median 30000, mean 30000, max 50000.5\n"
        );
    }

    #[test]
    fn test_ansi_clear_and_colour() {
        let mut view = TerminalView::new(Vec::new(), true);
        view.clear();
        view.append_card(&card());
        let text = output(view);
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.contains(GREEN));
    }

    #[test]
    fn test_loading_and_error_lines() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.set_loading(true);
        view.set_loading(false);
        view.report_error("connection refused");
        assert_eq!(output(view), "Searching...\nError: connection refused\n");
    }
}
