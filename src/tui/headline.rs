use chrono::{Datelike, NaiveDate};

use crate::calendar::{month_name, Aggregates};

/// One piece of a headline line; numbers are rendered with an accent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Number(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub first: Vec<Segment>,
    pub second: Vec<Segment>,
    /// `"21.4% of 2026 left"`
    pub progress: String,
    /// The name prompt is shown whenever no name is stored.
    pub prompt_visible: bool,
}

impl Headline {
    pub fn first_line(&self) -> String {
        plain(&self.first)
    }

    pub fn second_line(&self) -> String {
        plain(&self.second)
    }
}

fn plain(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Text(t) => t.clone(),
            Segment::Number(n) => n.to_string(),
        })
        .collect()
}

/// Build the two headline lines. An empty or blank name counts as absent.
pub fn compose(name: Option<&str>, aggregates: &Aggregates, today: NaiveDate) -> Headline {
    let name = name.map(str::trim).filter(|n| !n.is_empty());

    let first = match name {
        Some(name) => vec![
            Segment::Text(format!("{name}, only ")),
            Segment::Number(aggregates.remaining_days_in_year),
            Segment::Text(" days remain".into()),
        ],
        None => vec![
            Segment::Text("Only ".into()),
            Segment::Number(aggregates.remaining_days_in_year),
            Segment::Text(" days remain".into()),
        ],
    };

    let second = vec![
        Segment::Text("Only ".into()),
        Segment::Number(aggregates.remaining_days_in_month),
        Segment::Text(format!(" days left in {}", month_name(today.month()))),
    ];

    Headline {
        first,
        second,
        progress: format!("{}% of {} left", aggregates.percent_remaining, today.year()),
        prompt_visible: name.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::aggregates;
    use pretty_assertions::assert_eq;

    fn oct_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn named_headline() {
        let today = oct_15();
        let h = compose(Some("Ada"), &aggregates(today), today);
        assert_eq!(h.first_line(), "Ada, only 78 days remain");
        assert_eq!(h.second_line(), "Only 17 days left in Oct");
        assert_eq!(h.progress, "21.4% of 2026 left");
        assert!(!h.prompt_visible);
    }

    #[test]
    fn anonymous_headline_asks_for_a_name() {
        let today = oct_15();
        let h = compose(None, &aggregates(today), today);
        assert_eq!(h.first_line(), "Only 78 days remain");
        assert!(h.prompt_visible);
    }

    #[test]
    fn blank_name_counts_as_absent() {
        let today = oct_15();
        let h = compose(Some("   "), &aggregates(today), today);
        assert_eq!(h.first_line(), "Only 78 days remain");
        assert!(h.prompt_visible);
    }

    #[test]
    fn numbers_are_separate_segments() {
        let today = oct_15();
        let h = compose(Some("Ada"), &aggregates(today), today);
        assert_eq!(h.first[1], Segment::Number(78));
        assert_eq!(h.second[1], Segment::Number(17));
    }
}
