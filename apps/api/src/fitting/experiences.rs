//! Experiences stage: greedy degradation of experience formats.
//!
//! # Algorithm
//! 1. Optimistic start: every entry starts `detailed`, except entries older than
//!    `compact_after_years`, which start `compact`. The first
//!    `min_detailed_experiences` entries always start `detailed`.
//! 2. While over capacity, degrade one tier at a time, scanning from the back
//!    (least relevant first). The leading `min_detailed_experiences` entries are
//!    skipped while still `detailed`; the protection is released only when
//!    nothing else can be degraded.
//! 3. If every entry is `minimal` and usage still exceeds capacity, drop entries
//!    from the back until it fits.
//!
//! Back-to-front order is the "protect the most relevant" policy: input order
//! is the upstream relevance ranking and is never re-sorted here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::fitting::actions::{FitAction, Stage};
use crate::fitting::summary::truncate_words;
use crate::layout::themes::AdaptiveRules;
use crate::layout::units::ExperienceFormat;
use crate::models::cv::{Achievement, Experience};

/// Maximum one-tier steps a single entry can take (`detailed` → `minimal`).
pub const MAX_DEGRADATION_STEPS_PER_ENTRY: usize = ExperienceFormat::ALL.len() - 1;

/// Word ceiling for the headline a `compact` entry keeps.
const COMPACT_HEADLINE_WORDS: usize = 15;

/// Upper bound on phase-2 iterations. Every step lowers exactly one entry by
/// one tier, so no run can take more steps than this.
pub const fn max_degradation_steps(entry_count: usize) -> usize {
    MAX_DEGRADATION_STEPS_PER_ENTRY * entry_count
}

/// An experience as it will be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedExperience {
    pub id: Uuid,
    pub role: String,
    pub employer: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub relevance_score: f64,
    pub format: ExperienceFormat,
    /// Kept for `detailed` and `standard` only.
    pub context: Option<String>,
    /// Selected bullets, highest impact first.
    pub achievements: Vec<String>,
    /// Single synthesized sentence for `compact` entries.
    pub headline: Option<String>,
}

impl FittedExperience {
    pub fn units(&self) -> u32 {
        self.format.cost()
    }
}

pub fn total_cost(formats: &[ExperienceFormat]) -> u32 {
    formats.iter().map(|f| f.cost()).sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Stage entry point
// ────────────────────────────────────────────────────────────────────────────

/// Fits `experiences` (already relevance-ordered) into `capacity` units.
pub fn fit_experiences(
    experiences: &[Experience],
    rules: &AdaptiveRules,
    capacity: u32,
    reference_date: NaiveDate,
) -> Stage<Vec<FittedExperience>> {
    if experiences.is_empty() {
        return Stage::new(Vec::new(), vec![FitAction::NoExperiences]);
    }

    let mut actions = Vec::new();
    let protected = rules.min_detailed_experiences;

    let start = initial_formats(experiences, rules, reference_date).record(&mut actions);
    let degraded = degrade_to_fit(experiences, &start, protected, capacity).record(&mut actions);
    let retained = exclude_to_fit(experiences, &degraded, capacity).record(&mut actions);

    for (i, experience) in experiences[..retained].iter().enumerate() {
        if degraded[i] > start[i] {
            actions.push(FitAction::Condensed {
                label: experience.label(),
                format: degraded[i],
            });
        }
    }

    let fitted: Vec<FittedExperience> = experiences[..retained]
        .iter()
        .zip(&degraded)
        .map(|(experience, format)| render_experience(experience, *format, rules))
        .collect();

    debug!(
        retained,
        total = experiences.len(),
        units = total_cost(&degraded[..retained]),
        capacity,
        "experiences fitted"
    );

    Stage::new(fitted, actions)
}

// ────────────────────────────────────────────────────────────────────────────
// Phases
// ────────────────────────────────────────────────────────────────────────────

/// Phase 1: optimistic starting formats with age-based capping.
pub fn initial_formats(
    experiences: &[Experience],
    rules: &AdaptiveRules,
    reference_date: NaiveDate,
) -> Stage<Vec<ExperienceFormat>> {
    let mut actions = Vec::new();
    let formats = experiences
        .iter()
        .enumerate()
        .map(|(i, experience)| {
            let age_years = experience.age_years(reference_date);
            if i >= rules.min_detailed_experiences && age_years > rules.compact_after_years {
                actions.push(FitAction::AgeCapped {
                    label: experience.label(),
                    age_years,
                    format: ExperienceFormat::Compact,
                });
                ExperienceFormat::Compact
            } else {
                ExperienceFormat::Detailed
            }
        })
        .collect();
    Stage::new(formats, actions)
}

/// Phase 2: one-tier degradations from the back until `capacity` holds or
/// nothing can be degraded.
pub fn degrade_to_fit(
    experiences: &[Experience],
    start: &[ExperienceFormat],
    protected: usize,
    capacity: u32,
) -> Stage<Vec<ExperienceFormat>> {
    let mut formats = start.to_vec();
    let mut actions = Vec::new();
    let max_steps = max_degradation_steps(formats.len());

    for _ in 0..max_steps {
        if total_cost(&formats) <= capacity {
            break;
        }
        let Some((i, next)) = degradation_candidate(&formats, protected) else {
            break;
        };
        actions.push(FitAction::Degraded {
            label: experiences[i].label(),
            from: formats[i],
            to: next,
        });
        formats[i] = next;
    }

    Stage::new(formats, actions)
}

/// Last degradable entry, skipping protected `detailed` leaders first.
fn degradation_candidate(
    formats: &[ExperienceFormat],
    protected: usize,
) -> Option<(usize, ExperienceFormat)> {
    let pick = |respect_floor: bool| {
        formats.iter().enumerate().rev().find_map(|(i, format)| {
            let is_protected = i < protected && *format == ExperienceFormat::Detailed;
            if respect_floor && is_protected {
                return None;
            }
            format.degrade().map(|next| (i, next))
        })
    };
    pick(true).or_else(|| pick(false))
}

/// Phase 3: drops entries from the back until the rest fits. Returns how many
/// leading entries are retained.
pub fn exclude_to_fit(
    experiences: &[Experience],
    formats: &[ExperienceFormat],
    capacity: u32,
) -> Stage<usize> {
    let mut retained = formats.len();
    let mut actions = Vec::new();

    while retained > 0 && total_cost(&formats[..retained]) > capacity {
        retained -= 1;
        actions.push(FitAction::Excluded {
            label: experiences[retained].label(),
        });
    }

    Stage::new(retained, actions)
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Achievements ranked by impact, highest first. Ties keep input order.
pub fn rank_achievements(achievements: &[Achievement]) -> Vec<&Achievement> {
    let mut ranked: Vec<&Achievement> = achievements.iter().collect();
    ranked.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
    ranked
}

/// Applies a format's transformation rule to one experience.
pub fn render_experience(
    experience: &Experience,
    format: ExperienceFormat,
    rules: &AdaptiveRules,
) -> FittedExperience {
    let ranked = rank_achievements(&experience.achievements);
    let keep = format.bullet_cap().min(rules.max_bullets_per_experience);

    let achievements = ranked
        .iter()
        .take(keep)
        .map(|a| a.text.clone())
        .collect();

    let headline = match format {
        ExperienceFormat::Compact => ranked
            .first()
            .map(|top| truncate_words(&top.text, COMPACT_HEADLINE_WORDS).0),
        _ => None,
    };

    let context = match format {
        ExperienceFormat::Detailed | ExperienceFormat::Standard => experience.context.clone(),
        ExperienceFormat::Compact | ExperienceFormat::Minimal => None,
    };

    FittedExperience {
        id: experience.stable_id(),
        role: experience.role.clone(),
        employer: experience.employer.clone(),
        start_date: experience.start_date,
        end_date: experience.end_date,
        relevance_score: experience.relevance_score,
        format,
        context,
        achievements,
        headline,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
