//! Rendered form of an [`Offer`].

use common::Offer;

/// Match percentages above this get the `high-match` style.
pub const HIGH_MATCH_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    High,
    Low,
}

impl MatchTier {
    pub fn for_percent(percent: f64) -> Self {
        if percent > HIGH_MATCH_THRESHOLD {
            MatchTier::High
        } else {
            MatchTier::Low
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            MatchTier::High => "high-match",
            MatchTier::Low => "low-match",
        }
    }
}

/// A result card: the circular match indicator plus the text block.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Sort key, the offer's minimum salary with null read as 0.
    pub salary: f64,
    pub tier: MatchTier,
    pub match_percent: u8,
    pub title: String,
    pub company: String,
    pub skills: String,
    pub url: String,
}

impl Card {
    pub fn render(offer: &Offer) -> Self {
        let percent = offer.match_percent.clamp(0.0, 100.0);

        Self {
            salary: offer.salary(),
            tier: MatchTier::for_percent(percent),
            match_percent: percent.round() as u8,
            title: offer.title.clone(),
            company: offer.company.clone(),
            skills: offer.skills.clone(),
            url: offer.url.clone(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.tier.class()
    }

    /// Text shown inside the circular indicator.
    pub fn indicator(&self) -> String {
        format!("{}%", self.match_percent)
    }

    /// Lines of the text block, in display order. Whole salaries print
    /// without a fractional part.
    pub fn text_block(&self) -> [String; 4] {
        [
            self.title.clone(),
            self.company.clone(),
            format!("Salary: {}", self.salary),
            format!("Skills: {}", self.skills),
        ]
    }
}
