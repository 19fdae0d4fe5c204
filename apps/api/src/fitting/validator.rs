//! Post-hoc checks on a `FittingResult`. Never consulted by the engine itself.
//!
//! Hard errors make the result invalid:
//! - total usage above `total_capacity × pages`
//! - no experience retained
//! - reported zone usage that does not match the content tree
//!
//! Everything else is a soft warning.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fitting::result::FittingResult;
use crate::layout::themes::{Theme, ZoneName};
use crate::layout::units::ExperienceFormat;

/// Fewest achievements a `detailed` entry needs to justify its space.
const MIN_DETAILED_ACHIEVEMENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate(result: &FittingResult, theme: &Theme) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_capacity(result, theme, &mut errors);
    check_accounting(result, &mut errors);
    check_zones(result, theme, &mut warnings);
    check_experiences(result, theme, &mut errors, &mut warnings);

    debug!(
        theme = theme.id,
        errors = errors.len(),
        warnings = warnings.len(),
        "result validated"
    );

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn check_capacity(result: &FittingResult, theme: &Theme, errors: &mut Vec<String>) {
    let ceiling = theme.total_capacity * result.pages;
    if result.total_units_used > ceiling {
        errors.push(format!(
            "Total usage {} exceeds the {}-page ceiling of {} units",
            result.total_units_used, result.pages, ceiling
        ));
    }
}

/// Re-derives every zone from the content tree and the cost model.
fn check_accounting(result: &FittingResult, errors: &mut Vec<String>) {
    for zone in ZoneName::ALL {
        let derived = result.content.zone_units(zone);
        let reported = result.zone_usage.get(&zone).copied().unwrap_or(0);
        if derived != reported {
            errors.push(format!(
                "Zone '{}' reports {reported} units but its content costs {derived}",
                zone.as_str()
            ));
        }
    }

    let sum: u32 = result.zone_usage.values().sum();
    if sum != result.total_units_used {
        errors.push(format!(
            "Zone usage adds up to {sum} units but total_units_used is {}",
            result.total_units_used
        ));
    }

    if result.experience_formats != result.content.experience_formats() {
        errors.push("experience_formats does not match the fitted experiences".to_string());
    }
}

fn check_zones(result: &FittingResult, theme: &Theme, warnings: &mut Vec<String>) {
    for zone in theme.zones.iter().filter(|z| !z.name.is_reserved()) {
        let used = result.zone_usage.get(&zone.name).copied().unwrap_or(0);
        if used > zone.capacity_units {
            warnings.push(format!(
                "Zone '{}' uses {used} units, over its capacity of {}",
                zone.name.as_str(),
                zone.capacity_units
            ));
        }
        if zone.is_enabled() && used < zone.min_units {
            warnings.push(format!(
                "Zone '{}' uses {used} units, below its minimum of {}",
                zone.name.as_str(),
                zone.min_units
            ));
        }
    }
}

fn check_experiences(
    result: &FittingResult,
    theme: &Theme,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let experiences = &result.content.experiences;
    if experiences.is_empty() {
        errors.push("No experience retained".to_string());
        return;
    }

    let detailed = experiences
        .iter()
        .filter(|e| e.format == ExperienceFormat::Detailed)
        .count();
    let floor = theme.rules.min_detailed_experiences;
    if detailed < floor {
        warnings.push(format!(
            "Only {detailed} detailed experience(s), theme '{}' expects {floor}",
            theme.id
        ));
    }

    for (i, pair) in experiences.windows(2).enumerate() {
        if pair[0].relevance_score < pair[1].relevance_score {
            warnings.push(format!(
                "Relevance order broken at position {}: {:.2} before {:.2}",
                i + 1,
                pair[0].relevance_score,
                pair[1].relevance_score
            ));
        }
    }

    for experience in experiences
        .iter()
        .filter(|e| e.format == ExperienceFormat::Detailed)
    {
        let has_context = experience
            .context
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_context || experience.achievements.len() < MIN_DETAILED_ACHIEVEMENTS {
            warnings.push(format!(
                "Detailed experience '{} at {}' lacks context or achievements",
                experience.role, experience.employer
            ));
        }
    }
}
