//! Fitting output: the fitted content tree and the `FittingResult` value object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fitting::actions::FitAction;
use crate::fitting::experiences::FittedExperience;
use crate::fitting::header::FittedHeader;
use crate::fitting::lists::FittedList;
use crate::fitting::summary::FittedSummary;
use crate::layout::themes::ZoneName;
use crate::layout::units::ExperienceFormat;
use crate::models::cv::{Certification, Client, Formation, Language, Skill};

/// Content retained after fitting, with the format chosen for each part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedContent {
    pub header: FittedHeader,
    pub summary: Option<FittedSummary>,
    pub experiences: Vec<FittedExperience>,
    pub skills: FittedList<Skill>,
    pub formations: FittedList<Formation>,
    pub certifications: FittedList<Certification>,
    pub languages: FittedList<Language>,
    pub clients: FittedList<Client>,
    pub interests: FittedList<String>,
}

impl FittedContent {
    /// Units consumed by the entries retained in `zone`.
    pub fn zone_units(&self, zone: ZoneName) -> u32 {
        match zone {
            ZoneName::Header => self.header.units(),
            ZoneName::Summary => self.summary.as_ref().map_or(0, FittedSummary::units),
            ZoneName::Experiences => self.experiences.iter().map(FittedExperience::units).sum(),
            ZoneName::Skills => self.skills.units(),
            ZoneName::Formation => self.formations.units(),
            ZoneName::Certifications => self.certifications.units(),
            ZoneName::Languages => self.languages.units(),
            ZoneName::Clients => self.clients.units(),
            ZoneName::Interests => self.interests.units(),
            ZoneName::Footer | ZoneName::Margins => 0,
        }
    }

    /// Usage for every zone, re-derived from the content and the cost model.
    pub fn zone_usage(&self) -> BTreeMap<ZoneName, u32> {
        ZoneName::ALL
            .iter()
            .map(|zone| (*zone, self.zone_units(*zone)))
            .collect()
    }

    pub fn total_units(&self) -> u32 {
        ZoneName::ALL.iter().map(|zone| self.zone_units(*zone)).sum()
    }

    pub fn experience_formats(&self) -> Vec<ExperienceFormat> {
        self.experiences.iter().map(|e| e.format).collect()
    }
}

/// Output of one fitting run. Built once by the engine, never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingResult {
    /// Theme actually used (after fallback).
    pub theme_id: String,
    /// True when the requested theme id was unknown.
    pub theme_fallback: bool,
    pub content: FittedContent,
    pub experience_formats: Vec<ExperienceFormat>,
    pub zone_usage: BTreeMap<ZoneName, u32>,
    pub total_units_used: u32,
    pub pages: u32,
    pub compression_level_applied: u32,
    pub warnings: Vec<String>,
    pub actions: Vec<FitAction>,
}

impl FittingResult {
    /// Derives every bookkeeping field from the content and the action log.
    pub fn assemble(
        theme_id: &str,
        theme_fallback: bool,
        content: FittedContent,
        pages: u32,
        actions: Vec<FitAction>,
    ) -> Self {
        let zone_usage = content.zone_usage();
        let total_units_used = zone_usage.values().sum();
        let compression_level_applied = actions.iter().filter(|a| a.is_compression()).count() as u32;
        let warnings = actions.iter().filter_map(FitAction::warning).collect();

        FittingResult {
            theme_id: theme_id.to_string(),
            theme_fallback,
            experience_formats: content.experience_formats(),
            content,
            zone_usage,
            total_units_used,
            pages,
            compression_level_applied,
            warnings,
            actions,
        }
    }

    pub fn excluded_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, FitAction::Excluded { .. }))
            .count()
    }
}
