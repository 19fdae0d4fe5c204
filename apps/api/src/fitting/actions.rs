//! Fitting actions: the delta each pipeline stage reports alongside its output.
//!
//! The compression counter and the warning list of a `FittingResult` are both
//! derived from the ordered action log, never tracked separately.

use serde::{Deserialize, Serialize};

use crate::fitting::summary::SummaryTier;
use crate::layout::themes::ZoneName;
use crate::layout::units::{ContentUnitType, ExperienceFormat};

/// One decision taken by the engine while fitting content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FitAction {
    /// Header did not fit even at its leanest tier.
    HeaderOverCapacity { needed: u32, capacity: u32 },
    /// Summary placed below the elevator tier (text truncated).
    SummaryShortened {
        tier: SummaryTier,
        words_kept: usize,
        words_total: usize,
    },
    /// No summary tier fits the zone.
    SummaryDropped { capacity: u32 },
    /// Experience starts at a leaner tier because of its age.
    AgeCapped {
        label: String,
        age_years: u32,
        format: ExperienceFormat,
    },
    /// Experience stepped down exactly one tier.
    Degraded {
        label: String,
        from: ExperienceFormat,
        to: ExperienceFormat,
    },
    /// Experience removed entirely.
    Excluded { label: String },
    /// Retained experience finished below its starting tier.
    Condensed {
        label: String,
        format: ExperienceFormat,
    },
    NoExperiences,
    /// Flat list switched to its compact per-item unit.
    ListCompacted {
        zone: ZoneName,
        unit: ContentUnitType,
    },
    /// Flat list cut to the zone's item cap.
    ListTruncated {
        zone: ZoneName,
        kept: usize,
        dropped: usize,
    },
    /// Global pass moved the summary one tier down.
    GlobalSummaryShrink { from: SummaryTier, to: SummaryTier },
    /// Content spills onto additional pages.
    PageAdded { pages: u32 },
    /// Total still exceeds the budget after every remedy.
    Overflow { total: u32, budget: u32 },
}

impl FitAction {
    /// True if this action degraded or truncated content.
    pub fn is_compression(&self) -> bool {
        matches!(
            self,
            FitAction::SummaryShortened { .. }
                | FitAction::SummaryDropped { .. }
                | FitAction::Degraded { .. }
                | FitAction::Excluded { .. }
                | FitAction::ListCompacted { .. }
                | FitAction::ListTruncated { .. }
                | FitAction::GlobalSummaryShrink { .. }
        )
    }

    /// Human-readable explanation, `None` for silent bookkeeping actions.
    pub fn warning(&self) -> Option<String> {
        let message = match self {
            FitAction::HeaderOverCapacity { needed, capacity } => format!(
                "Header needs {needed} units but the header zone only allows {capacity}"
            ),
            FitAction::SummaryShortened {
                tier,
                words_kept,
                words_total,
            } if words_kept >= words_total => format!(
                "Summary moved to the smaller {} layout (full text kept)",
                tier.as_str()
            ),
            FitAction::SummaryShortened {
                tier,
                words_kept,
                words_total,
            } => format!(
                "Summary shortened to the {} version ({words_kept} of {words_total} words kept)",
                tier.as_str()
            ),
            FitAction::SummaryDropped { capacity } => format!(
                "Summary omitted: no summary format fits the {capacity} units available"
            ),
            FitAction::Condensed { label, format } => {
                format!("Experience '{label}' condensed to {} format", format.as_str())
            }
            FitAction::Excluded { label } => {
                format!("Experience '{label}' excluded: not enough space")
            }
            FitAction::NoExperiences => "No experiences available to fit".to_string(),
            FitAction::ListCompacted { zone, .. } => {
                format!("{} switched to compact display to save space", title(*zone))
            }
            FitAction::ListTruncated { zone, kept, dropped } => format!(
                "{}: {dropped} entr{} hidden ({kept} kept)",
                title(*zone),
                if *dropped == 1 { "y" } else { "ies" }
            ),
            FitAction::GlobalSummaryShrink { to, .. } => format!(
                "Summary reduced to the {} version to respect the page budget",
                to.as_str()
            ),
            FitAction::PageAdded { pages } => {
                format!("Content spans {pages} pages")
            }
            FitAction::Overflow { total, budget } => format!(
                "Content exceeds the page budget by {} units ({total} used, {budget} available)",
                total.saturating_sub(*budget)
            ),
            FitAction::AgeCapped { .. } | FitAction::Degraded { .. } => return None,
        };
        Some(message)
    }
}

fn title(zone: ZoneName) -> String {
    let name = zone.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Output of one pipeline stage: its value plus the actions it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage<T> {
    pub value: T,
    pub actions: Vec<FitAction>,
}

impl<T> Stage<T> {
    pub fn new(value: T, actions: Vec<FitAction>) -> Self {
        Stage { value, actions }
    }

    pub fn clean(value: T) -> Self {
        Stage {
            value,
            actions: Vec::new(),
        }
    }

    /// Moves this stage's actions into `log` and returns the value.
    pub fn record(self, log: &mut Vec<FitAction>) -> T {
        log.extend(self.actions);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrade_counts_but_is_silent() {
        let action = FitAction::Degraded {
            label: "Dev at Acme".to_string(),
            from: ExperienceFormat::Detailed,
            to: ExperienceFormat::Standard,
        };
        assert!(action.is_compression());
        assert_eq!(action.warning(), None);
    }

    #[test]
    fn test_exclusion_warning_names_role_and_employer() {
        let action = FitAction::Excluded {
            label: "Dev at Acme".to_string(),
        };
        assert!(action.is_compression());
        assert!(action.warning().unwrap().contains("Dev at Acme"));
    }

    #[test]
    fn test_informational_actions_do_not_count() {
        assert!(!FitAction::NoExperiences.is_compression());
        assert!(!FitAction::PageAdded { pages: 2 }.is_compression());
        assert!(!FitAction::Overflow { total: 110, budget: 96 }.is_compression());
        assert!(!FitAction::Condensed {
            label: "x".to_string(),
            format: ExperienceFormat::Compact
        }
        .is_compression());
    }

    #[test]
    fn test_overflow_warning_reports_overage() {
        let warning = FitAction::Overflow { total: 110, budget: 96 }.warning().unwrap();
        assert!(warning.contains("14 units"), "got: {warning}");
    }

    #[test]
    fn test_truncation_warning_pluralizes() {
        let one = FitAction::ListTruncated {
            zone: ZoneName::Skills,
            kept: 4,
            dropped: 1,
        };
        let many = FitAction::ListTruncated {
            zone: ZoneName::Clients,
            kept: 3,
            dropped: 5,
        };
        assert_eq!(one.warning().unwrap(), "Skills: 1 entry hidden (4 kept)");
        assert_eq!(many.warning().unwrap(), "Clients: 5 entries hidden (3 kept)");
    }

    #[test]
    fn test_summary_warning_distinguishes_layout_change_from_truncation() {
        let uncut = FitAction::SummaryShortened {
            tier: SummaryTier::Standard,
            words_kept: 60,
            words_total: 60,
        };
        assert!(uncut.is_compression());
        assert_eq!(
            uncut.warning().unwrap(),
            "Summary moved to the smaller standard layout (full text kept)"
        );

        let cut = FitAction::SummaryShortened {
            tier: SummaryTier::Short,
            words_kept: 40,
            words_total: 500,
        };
        assert_eq!(
            cut.warning().unwrap(),
            "Summary shortened to the short version (40 of 500 words kept)"
        );
    }

    #[test]
    fn test_stage_record_appends_in_order() {
        let mut log = vec![FitAction::NoExperiences];
        let stage = Stage::new(7, vec![FitAction::PageAdded { pages: 2 }]);
        let value = stage.record(&mut log);
        assert_eq!(value, 7);
        assert_eq!(log.len(), 2);
        assert_eq!(log[1], FitAction::PageAdded { pages: 2 });
    }
}
