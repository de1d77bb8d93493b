use std::cmp::Ordering;

use crate::card::Card;

/// Rendered cards kept in descending salary order.
#[derive(Debug, Default)]
pub struct ResultSet {
    cards: Vec<Card>,
}

/// Higher salary first; equal salaries are tied.
fn by_salary_desc(a: &Card, b: &Card) -> Ordering {
    b.salary.total_cmp(&a.salary)
}

/// Salary figures over the offers that advertise one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryStats {
    pub count: usize,
    /// Truncated to a whole amount.
    pub mean: i64,
    /// Truncated to a whole amount; the two middle values are averaged first.
    pub median: i64,
    pub min: f64,
    pub max: f64,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `card` at the end. Call [`ResultSet::sort`] to restore order.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// `sort_by` is stable, so ties keep arrival order.
    pub fn sort(&mut self) {
        self.cards.sort_by(by_salary_desc);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn salaries(&self) -> Vec<f64> {
        self.cards.iter().map(|c| c.salary).collect()
    }

    /// Mean, median, min and max of the advertised salaries.
    ///
    /// Offers without a salary (read as 0) are left out. Returns `None` when
    /// no offer advertises one.
    pub fn salary_stats(&self) -> Option<SalaryStats> {
        let mut salaries: Vec<f64> = self
            .cards
            .iter()
            .map(|c| c.salary)
            .filter(|s| *s != 0.0)
            .collect();
        if salaries.is_empty() {
            return None;
        }
        salaries.sort_by(f64::total_cmp);

        let count = salaries.len();
        let mean = salaries.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (salaries[count / 2 - 1] + salaries[count / 2]) / 2.0
        } else {
            salaries[count / 2]
        };

        Some(SalaryStats {
            count,
            mean: mean.trunc() as i64,
            median: median.trunc() as i64,
            min: salaries[0],
            max: salaries[count - 1],
        })
    }
}
