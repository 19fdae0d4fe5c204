//! Flat list zones: skills, formation, certifications, languages, clients, interests.
//!
//! No per-item tiers: a zone keeps `floor(capacity / per_item_cost)` entries in
//! input order (upstream already sorted them by priority). Some zones may first
//! switch to a cheaper per-item unit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fitting::actions::{FitAction, Stage};
use crate::layout::themes::{OverflowStrategy, SkillsDisplayMode, ZoneName};
use crate::layout::units::{max_items_in_capacity, ContentUnitType};
use crate::models::cv::{Client, Experience, Formation, Skill};

/// Entries retained in one flat zone, all rendered with the same unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedList<T> {
    pub unit: ContentUnitType,
    pub items: Vec<T>,
}

impl<T> FittedList<T> {
    pub fn empty(unit: ContentUnitType) -> Self {
        FittedList {
            unit,
            items: Vec::new(),
        }
    }

    pub fn units(&self) -> u32 {
        self.items.len() as u32 * self.unit.height_units()
    }
}

/// Truncates `items` to the zone's item cap. When `compact_unit` is given and
/// the full list does not fit at `unit`, switches to the cheaper unit first.
pub fn fit_list<T: Clone>(
    items: &[T],
    zone: ZoneName,
    unit: ContentUnitType,
    compact_unit: Option<ContentUnitType>,
    capacity: u32,
) -> Stage<FittedList<T>> {
    let mut actions = Vec::new();
    let mut unit = unit;

    if let Some(compact) = compact_unit {
        let full_cap = max_items_in_capacity(unit, capacity);
        if items.len() > full_cap && max_items_in_capacity(compact, capacity) > full_cap {
            actions.push(FitAction::ListCompacted {
                zone,
                unit: compact,
            });
            unit = compact;
        }
    }

    let kept = items.len().min(max_items_in_capacity(unit, capacity));
    if kept < items.len() {
        actions.push(FitAction::ListTruncated {
            zone,
            kept,
            dropped: items.len() - kept,
        });
    }

    Stage::new(
        FittedList {
            unit,
            items: items[..kept].to_vec(),
        },
        actions,
    )
}

pub fn fit_skills(
    skills: &[Skill],
    mode: SkillsDisplayMode,
    capacity: u32,
) -> Stage<FittedList<Skill>> {
    let zone = ZoneName::Skills;
    match mode {
        SkillsDisplayMode::Full => fit_list(skills, zone, ContentUnitType::SkillLine, None, capacity),
        SkillsDisplayMode::Compact => {
            fit_list(skills, zone, ContentUnitType::SkillCompact, None, capacity)
        }
        SkillsDisplayMode::Auto => fit_list(
            skills,
            zone,
            ContentUnitType::SkillLine,
            Some(ContentUnitType::SkillCompact),
            capacity,
        ),
    }
}

/// Formation switches to `formation_minimal` only under the `compact` strategy.
pub fn fit_formations(
    formations: &[Formation],
    strategy: OverflowStrategy,
    capacity: u32,
) -> Stage<FittedList<Formation>> {
    let compact_unit = match strategy {
        OverflowStrategy::Compact => Some(ContentUnitType::FormationMinimal),
        OverflowStrategy::Hide | OverflowStrategy::SplitPage => None,
    };
    fit_list(
        formations,
        ZoneName::Formation,
        ContentUnitType::Formation,
        compact_unit,
        capacity,
    )
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Drops clients that are the candidate's own employers, unless that would
/// leave nothing, then truncates.
pub fn fit_clients(
    clients: &[Client],
    experiences: &[Experience],
    include: bool,
    capacity: u32,
) -> Stage<FittedList<Client>> {
    if !include {
        return Stage::clean(FittedList::empty(ContentUnitType::Client));
    }

    let employers: HashSet<String> = experiences.iter().map(|e| normalize(&e.employer)).collect();
    let filtered: Vec<Client> = clients
        .iter()
        .filter(|c| !employers.contains(&normalize(&c.name)))
        .cloned()
        .collect();

    let pool = if filtered.is_empty() && !clients.is_empty() {
        debug!("every client is an own employer; keeping the unfiltered list");
        clients.to_vec()
    } else {
        if filtered.len() < clients.len() {
            debug!(
                removed = clients.len() - filtered.len(),
                "removed clients matching own employers"
            );
        }
        filtered
    };

    fit_list(&pool, ZoneName::Clients, ContentUnitType::Client, None, capacity)
}

pub fn fit_interests(interests: &[String], include: bool, capacity: u32) -> Stage<FittedList<String>> {
    if !include {
        return Stage::clean(FittedList::empty(ContentUnitType::Interest));
    }
    fit_list(
        interests,
        ZoneName::Interests,
        ContentUnitType::Interest,
        None,
        capacity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_skills(n: usize) -> Vec<Skill> {
        (0..n)
            .map(|i| Skill {
                name: format!("skill-{i}"),
                category: None,
            })
            .collect()
    }

    fn make_formations(n: usize) -> Vec<Formation> {
        (0..n)
            .map(|i| Formation {
                degree: format!("Degree {i}"),
                school: "School".to_string(),
                year: Some(2000 + i as i32),
            })
            .collect()
    }

    fn make_client(name: &str) -> Client {
        Client {
            name: name.to_string(),
            sector: None,
        }
    }

    fn make_employer(name: &str) -> Experience {
        Experience {
            id: None,
            role: "Consultant".to_string(),
            employer: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: None,
            context: None,
            relevance_score: 1.0,
            achievements: vec![],
        }
    }

    #[test]
    fn test_list_within_capacity_untouched() {
        let stage = fit_list(&[1, 2, 3], ZoneName::Languages, ContentUnitType::Language, None, 3);
        assert_eq!(stage.value.items, vec![1, 2, 3]);
        assert_eq!(stage.value.units(), 3);
        assert!(stage.actions.is_empty());
    }

    #[test]
    fn test_list_truncated_preserving_order() {
        let stage = fit_list(
            &["a", "b", "c", "d"],
            ZoneName::Certifications,
            ContentUnitType::Certification,
            None,
            5,
        );
        assert_eq!(stage.value.items, vec!["a", "b"]);
        assert_eq!(
            stage.actions,
            vec![FitAction::ListTruncated {
                zone: ZoneName::Certifications,
                kept: 2,
                dropped: 2
            }]
        );
    }

    #[test]
    fn test_disabled_zone_hides_everything() {
        let stage = fit_list(&["x"], ZoneName::Clients, ContentUnitType::Client, None, 0);
        assert!(stage.value.items.is_empty());
        assert_eq!(stage.value.units(), 0);
        assert_eq!(stage.actions.len(), 1);
    }

    #[test]
    fn test_skills_auto_full_when_all_fit() {
        let stage = fit_skills(&make_skills(5), SkillsDisplayMode::Auto, 10);
        assert_eq!(stage.value.unit, ContentUnitType::SkillLine);
        assert_eq!(stage.value.items.len(), 5);
        assert!(stage.actions.is_empty());
    }

    #[test]
    fn test_skills_auto_switches_to_compact() {
        let stage = fit_skills(&make_skills(8), SkillsDisplayMode::Auto, 10);
        assert_eq!(stage.value.unit, ContentUnitType::SkillCompact);
        assert_eq!(stage.value.items.len(), 8);
        assert_eq!(stage.value.units(), 8);
        assert_eq!(stage.actions.len(), 1);
        assert!(stage.actions[0].is_compression());
    }

    #[test]
    fn test_skills_auto_compact_then_truncate() {
        let stage = fit_skills(&make_skills(14), SkillsDisplayMode::Auto, 10);
        assert_eq!(stage.value.unit, ContentUnitType::SkillCompact);
        assert_eq!(stage.value.items.len(), 10);
        assert_eq!(stage.actions.len(), 2);
    }

    #[test]
    fn test_skills_full_mode_never_compacts() {
        let stage = fit_skills(&make_skills(8), SkillsDisplayMode::Full, 10);
        assert_eq!(stage.value.unit, ContentUnitType::SkillLine);
        assert_eq!(stage.value.items.len(), 5);
    }

    #[test]
    fn test_formation_compact_strategy_uses_minimal_unit() {
        let stage = fit_formations(&make_formations(3), OverflowStrategy::Compact, 8);
        assert_eq!(stage.value.unit, ContentUnitType::FormationMinimal);
        assert_eq!(stage.value.items.len(), 3);
        assert_eq!(stage.value.units(), 6);
    }

    #[test]
    fn test_formation_hide_strategy_truncates() {
        let stage = fit_formations(&make_formations(3), OverflowStrategy::Hide, 8);
        assert_eq!(stage.value.unit, ContentUnitType::Formation);
        assert_eq!(stage.value.items.len(), 2);
    }

    #[test]
    fn test_clients_exclude_own_employers() {
        let clients = vec![make_client("Acme"), make_client(" globex "), make_client("Initech")];
        let exps = vec![make_employer("ACME"), make_employer("Globex")];
        let stage = fit_clients(&clients, &exps, true, 3);
        let names: Vec<&str> = stage.value.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Initech"]);
        assert!(stage.actions.is_empty(), "self-reference removal is not a compression");
    }

    #[test]
    fn test_clients_fallback_when_filter_empties_list() {
        let clients = vec![make_client("Acme"), make_client("Globex")];
        let exps = vec![make_employer("Acme"), make_employer("Globex")];
        let stage = fit_clients(&clients, &exps, true, 1);
        assert_eq!(stage.value.items, vec![make_client("Acme")]);
        assert_eq!(stage.actions.len(), 1, "truncated from 2 to 1");
    }

    #[test]
    fn test_clients_excluded_by_preference() {
        let stage = fit_clients(&[make_client("Initech")], &[], false, 5);
        assert!(stage.value.items.is_empty());
        assert!(stage.actions.is_empty());
    }

    #[test]
    fn test_interests_excluded_by_preference() {
        let stage = fit_interests(&["chess".to_string()], false, 5);
        assert!(stage.value.items.is_empty());
        let stage = fit_interests(&["chess".to_string()], true, 5);
        assert_eq!(stage.value.items, vec!["chess".to_string()]);
    }
}
