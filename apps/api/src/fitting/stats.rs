//! Allocation statistics for reporting and A/B comparison between themes.
//!
//! Read-only over a finished `FittingResult`: nothing here feeds back into the
//! allocation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fitting::result::FittingResult;
use crate::layout::themes::{Theme, ZoneName};
use crate::layout::units::{best_format_for_remaining, ExperienceFormat};

// Composite score weights, summing to 1.
const DENSITY_WEIGHT: f64 = 0.4;
const DETAIL_WEIGHT: f64 = 0.4;
const COMPRESSION_WEIGHT: f64 = 0.2;

/// Unused space above this fraction of the page budget reads as a sparse page.
const WHITESPACE_TOLERANCE: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillVerdict {
    TooMuchWhitespace,
    Acceptable,
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStat {
    pub used: u32,
    pub capacity: u32,
    /// 0 for disabled zones.
    pub utilization_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationStats {
    pub theme_id: String,
    pub pages: u32,
    pub total_units_used: u32,
    /// `total_capacity × pages`.
    pub total_capacity: u32,
    pub utilization_pct: f64,
    pub fill: FillVerdict,
    pub zones: BTreeMap<ZoneName, ZoneStat>,
    pub format_histogram: BTreeMap<ExperienceFormat, usize>,
    /// 0 when no experience was retained.
    pub average_relevance: f64,
    pub detailed_ratio: f64,
    /// Richest format one more experience could take in the space left in the
    /// experiences zone; `None` when not even `minimal` fits.
    pub headroom_format: Option<ExperienceFormat>,
    pub excluded_count: usize,
    pub compression_level: u32,
    pub warning_count: usize,
    /// Composite in [0, 100]; higher is better.
    pub quality_score: f64,
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn compute_stats(result: &FittingResult, theme: &Theme) -> AllocationStats {
    let total_capacity = theme.total_capacity * result.pages;
    let utilization_pct = percent(result.total_units_used, total_capacity);

    let zones = theme
        .zones
        .iter()
        .map(|zone| {
            let used = result.zone_usage.get(&zone.name).copied().unwrap_or(0);
            let stat = ZoneStat {
                used,
                capacity: zone.capacity_units,
                utilization_pct: percent(used, zone.capacity_units),
            };
            (zone.name, stat)
        })
        .collect();

    let mut format_histogram: BTreeMap<ExperienceFormat, usize> =
        ExperienceFormat::ALL.iter().map(|f| (*f, 0)).collect();
    for format in &result.experience_formats {
        *format_histogram.entry(*format).or_default() += 1;
    }

    let experiences = &result.content.experiences;
    let retained = experiences.len();
    let average_relevance = if retained == 0 {
        0.0
    } else {
        experiences.iter().map(|e| e.relevance_score).sum::<f64>() / retained as f64
    };
    let detailed = format_histogram[&ExperienceFormat::Detailed];
    let detailed_ratio = if retained == 0 {
        0.0
    } else {
        detailed as f64 / retained as f64
    };

    let experiences_used = result.zone_usage.get(&ZoneName::Experiences).copied().unwrap_or(0);
    let headroom = theme.capacity(ZoneName::Experiences).saturating_sub(experiences_used);
    let headroom_format = best_format_for_remaining(headroom);

    let compression_level = result.compression_level_applied;
    let quality_score = quality_score(utilization_pct, detailed_ratio, compression_level);

    AllocationStats {
        theme_id: result.theme_id.clone(),
        pages: result.pages,
        total_units_used: result.total_units_used,
        total_capacity,
        utilization_pct,
        fill: fill_verdict(result.total_units_used, theme.page_budget() * result.pages),
        zones,
        format_histogram,
        average_relevance,
        detailed_ratio,
        headroom_format,
        excluded_count: result.excluded_count(),
        compression_level,
        warning_count: result.warnings.len(),
        quality_score,
    }
}

fn quality_score(utilization_pct: f64, detailed_ratio: f64, compression_level: u32) -> f64 {
    let density = utilization_pct.clamp(0.0, 100.0);
    let detail = detailed_ratio * 100.0;
    let compression = 100.0 / (1.0 + compression_level as f64);
    DENSITY_WEIGHT * density + DETAIL_WEIGHT * detail + COMPRESSION_WEIGHT * compression
}

fn fill_verdict(used: u32, budget: u32) -> FillVerdict {
    if used > budget {
        FillVerdict::Overflow
    } else if budget > 0 && (budget - used) as f64 / budget as f64 > WHITESPACE_TOLERANCE {
        FillVerdict::TooMuchWhitespace
    } else {
        FillVerdict::Acceptable
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Comparison
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preferred {
    A,
    B,
}

/// Deltas are `b − a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsComparison {
    pub theme_a: String,
    pub theme_b: String,
    pub utilization_delta: f64,
    pub detailed_ratio_delta: f64,
    pub average_relevance_delta: f64,
    pub excluded_delta: i64,
    pub compression_delta: i64,
    pub warning_delta: i64,
    pub quality_delta: f64,
    pub preferred: Preferred,
    pub preferred_theme: String,
}

/// Prefers the higher quality score, then fewer excluded items, then `a`.
pub fn compare_stats(a: &AllocationStats, b: &AllocationStats) -> StatsComparison {
    let by_quality = b.quality_score.total_cmp(&a.quality_score);
    let by_exclusions = a.excluded_count.cmp(&b.excluded_count);
    let preferred = match by_quality.then(by_exclusions) {
        Ordering::Greater => Preferred::B,
        Ordering::Less | Ordering::Equal => Preferred::A,
    };
    let preferred_theme = match preferred {
        Preferred::A => a.theme_id.clone(),
        Preferred::B => b.theme_id.clone(),
    };

    StatsComparison {
        theme_a: a.theme_id.clone(),
        theme_b: b.theme_id.clone(),
        utilization_delta: b.utilization_pct - a.utilization_pct,
        detailed_ratio_delta: b.detailed_ratio - a.detailed_ratio,
        average_relevance_delta: b.average_relevance - a.average_relevance,
        excluded_delta: b.excluded_count as i64 - a.excluded_count as i64,
        compression_delta: b.compression_level as i64 - a.compression_level as i64,
        warning_delta: b.warning_count as i64 - a.warning_count as i64,
        quality_delta: b.quality_score - a.quality_score,
        preferred,
        preferred_theme,
    }
}
