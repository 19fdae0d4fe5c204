//! Summary stage: picks a summary tier and truncates the pitch to its word ceiling.

use serde::{Deserialize, Serialize};

use crate::fitting::actions::{FitAction, Stage};
use crate::layout::units::ContentUnitType;

const STANDARD_WORD_LIMIT: usize = 70;
const SHORT_WORD_LIMIT: usize = 40;
pub const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTier {
    Elevator,
    Standard,
    Short,
}

impl SummaryTier {
    /// Richest first.
    pub const ALL: [SummaryTier; 3] = [
        SummaryTier::Elevator,
        SummaryTier::Standard,
        SummaryTier::Short,
    ];

    pub const fn unit(self) -> ContentUnitType {
        match self {
            SummaryTier::Elevator => ContentUnitType::SummaryElevator,
            SummaryTier::Standard => ContentUnitType::SummaryStandard,
            SummaryTier::Short => ContentUnitType::SummaryShort,
        }
    }

    /// `None` means untruncated.
    pub const fn word_limit(self) -> Option<usize> {
        match self {
            SummaryTier::Elevator => None,
            SummaryTier::Standard => Some(STANDARD_WORD_LIMIT),
            SummaryTier::Short => Some(SHORT_WORD_LIMIT),
        }
    }

    pub const fn next_down(self) -> Option<SummaryTier> {
        match self {
            SummaryTier::Elevator => Some(SummaryTier::Standard),
            SummaryTier::Standard => Some(SummaryTier::Short),
            SummaryTier::Short => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SummaryTier::Elevator => "elevator",
            SummaryTier::Standard => "standard",
            SummaryTier::Short => "short",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedSummary {
    pub tier: SummaryTier,
    pub text: String,
}

impl FittedSummary {
    pub fn units(&self) -> u32 {
        self.tier.unit().height_units()
    }
}

/// Keeps at most `limit` whitespace-separated words. When words are cut the
/// result ends with an ellipsis. Returns `(text, words_kept, words_total)`.
pub fn truncate_words(text: &str, limit: usize) -> (String, usize, usize) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let total = words.len();
    if total <= limit {
        return (words.join(" "), total, total);
    }

    let mut truncated = words[..limit].join(" ");
    let trimmed_len = truncated
        .trim_end_matches([',', ';', ':', '.', '-'])
        .len();
    truncated.truncate(trimmed_len);
    truncated.push(ELLIPSIS);
    (truncated, limit, total)
}

/// Renders `text` at `tier`, recording a `SummaryShortened` action below elevator.
fn render(text: &str, tier: SummaryTier) -> (FittedSummary, Option<FitAction>) {
    match tier.word_limit() {
        None => (
            FittedSummary {
                tier,
                text: text.to_string(),
            },
            None,
        ),
        Some(limit) => {
            let (truncated, words_kept, words_total) = truncate_words(text, limit);
            let action = FitAction::SummaryShortened {
                tier,
                words_kept,
                words_total,
            };
            (
                FittedSummary {
                    tier,
                    text: truncated,
                },
                Some(action),
            )
        }
    }
}

/// Fits the summary into `capacity`. Missing text yields `None` with no action.
pub fn fit_summary(text: Option<&str>, capacity: u32) -> Stage<Option<FittedSummary>> {
    let Some(text) = text else {
        return Stage::clean(None);
    };

    match SummaryTier::ALL.into_iter().find(|t| t.unit().fits(capacity)) {
        Some(tier) => {
            let (summary, action) = render(text, tier);
            Stage::new(Some(summary), action.into_iter().collect())
        }
        None => Stage::new(None, vec![FitAction::SummaryDropped { capacity }]),
    }
}

/// One extra step down for the global overflow pass. Re-truncates from the
/// original text. Returns `None` when the summary cannot shrink further.
pub fn shrink_summary(text: &str, current: &FittedSummary) -> Option<Stage<FittedSummary>> {
    let next = current.tier.next_down()?;
    let (summary, _) = render(text, next);
    let action = FitAction::GlobalSummaryShrink {
        from: current.tier,
        to: next,
    };
    Some(Stage::new(summary, vec![action]))
}
