// Adaptive content fitting: decides which résumé content is kept and at which
// format so it fits a theme's unit budget. Pure and synchronous; the HTTP layer
// runs it inside tokio::task::spawn_blocking.

pub mod actions;
pub mod experiences;
pub mod handlers;
pub mod header;
pub mod lists;
pub mod overflow;
pub mod result;
pub mod stats;
pub mod summary;
pub mod validator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fitting::actions::FitAction;
use crate::fitting::experiences::fit_experiences;
use crate::fitting::header::fit_header;
use crate::fitting::lists::{fit_clients, fit_formations, fit_interests, fit_list, fit_skills};
use crate::fitting::overflow::apply_global_pass;
use crate::fitting::result::{FittedContent, FittingResult};
use crate::fitting::summary::fit_summary;
use crate::layout::themes::{resolve_theme, Theme, ZoneName};
use crate::layout::units::ContentUnitType;
use crate::models::cv::CvContent;

/// User-controlled switches. Absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitPreferences {
    pub include_photo: bool,
    pub include_clients: bool,
    pub include_interests: bool,
}

impl Default for FitPreferences {
    fn default() -> Self {
        FitPreferences {
            include_photo: true,
            include_clients: true,
            include_interests: true,
        }
    }
}

/// Resolves `theme_id` (falling back to the default theme) and fits `content`.
pub fn fit(
    content: &CvContent,
    theme_id: &str,
    prefs: &FitPreferences,
    reference_date: NaiveDate,
) -> FittingResult {
    let (theme, fell_back) = resolve_theme(theme_id);
    fit_content(content, theme, fell_back, prefs, reference_date)
}

/// Runs every stage in order and assembles the result from the action log.
pub fn fit_content(
    content: &CvContent,
    theme: &Theme,
    theme_fallback: bool,
    prefs: &FitPreferences,
    reference_date: NaiveDate,
) -> FittingResult {
    let mut log: Vec<FitAction> = Vec::new();
    let rules = &theme.rules;
    let capacity = |zone: ZoneName| theme.capacity(zone);
    let summary_text = content.profile.summary_text();

    let header = fit_header(&content.profile, prefs, capacity(ZoneName::Header)).record(&mut log);
    let summary = fit_summary(summary_text, capacity(ZoneName::Summary)).record(&mut log);
    let experiences = fit_experiences(
        &content.experiences,
        rules,
        capacity(ZoneName::Experiences),
        reference_date,
    )
    .record(&mut log);
    let skills = fit_skills(
        &content.skills,
        rules.skills_display_mode,
        capacity(ZoneName::Skills),
    )
    .record(&mut log);
    let formations = fit_formations(
        &content.formations,
        theme.zone(ZoneName::Formation).overflow_strategy,
        capacity(ZoneName::Formation),
    )
    .record(&mut log);
    let certifications = fit_list(
        &content.certifications,
        ZoneName::Certifications,
        ContentUnitType::Certification,
        None,
        capacity(ZoneName::Certifications),
    )
    .record(&mut log);
    let languages = fit_list(
        &content.languages,
        ZoneName::Languages,
        ContentUnitType::Language,
        None,
        capacity(ZoneName::Languages),
    )
    .record(&mut log);
    let clients = fit_clients(
        &content.clients,
        &content.experiences,
        prefs.include_clients,
        capacity(ZoneName::Clients),
    )
    .record(&mut log);
    let interests = fit_interests(
        &content.interests,
        prefs.include_interests,
        capacity(ZoneName::Interests),
    )
    .record(&mut log);

    let fitted = FittedContent {
        header,
        summary,
        experiences,
        skills,
        formations,
        certifications,
        languages,
        clients,
        interests,
    };

    let paged = apply_global_pass(fitted, summary_text, theme).record(&mut log);
    let result = FittingResult::assemble(theme.id, theme_fallback, paged.content, paged.pages, log);

    info!(
        theme = theme.id,
        total = result.total_units_used,
        pages = result.pages,
        compression = result.compression_level_applied,
        warnings = result.warnings.len(),
        "content fitted"
    );

    result
}


#[cfg(test)]
mod tests {
    use super::test_support::{make_content, reference_date, words};
    use super::*;
    use crate::fitting::header::HeaderFormat;
    use crate::fitting::summary::SummaryTier;
    use crate::fitting::validator::validate;
    use crate::layout::themes::{all_themes, get_theme};
    use crate::layout::units::ExperienceFormat;
    use crate::models::cv::{Certification, Client, Formation, Language, Skill};

    fn run(content: &CvContent, theme_id: &str) -> FittingResult {
        fit(content, theme_id, &FitPreferences::default(), reference_date())
    }

    #[test]
    fn test_small_cv_on_classic_only_shortens_summary() {
        let result = run(&make_content(2), "classic");
        assert_eq!(result.theme_id, "classic");
        assert!(!result.theme_fallback);
        assert_eq!(result.pages, 1);
        // The classic summary zone is too small for the elevator pitch.
        assert_eq!(result.compression_level_applied, 1, "actions: {:?}", result.actions);
        assert!(matches!(
            result.actions[..],
            [FitAction::SummaryShortened {
                tier: SummaryTier::Standard,
                ..
            }]
        ));
        assert_eq!(
            result.experience_formats,
            vec![ExperienceFormat::Detailed, ExperienceFormat::Detailed]
        );
        assert_eq!(result.content.header.format, HeaderFormat::WithPhoto);
        assert_eq!(result.total_units_used, 69);
    }

    #[test]
    fn test_modern_without_clients_needs_no_compression() {
        let prefs = FitPreferences {
            include_clients: false,
            ..FitPreferences::default()
        };
        let result = fit(&make_content(2), "modern", &prefs, reference_date());
        assert_eq!(result.compression_level_applied, 0, "actions: {:?}", result.actions);
        assert!(result.warnings.is_empty());
        assert_eq!(result.content.header.format, HeaderFormat::WithContacts);
        assert_eq!(
            result.content.summary.as_ref().map(|s| s.tier),
            Some(SummaryTier::Elevator)
        );
    }

    #[test]
    fn test_zone_usage_sums_to_total() {
        for theme in all_themes() {
            let result = run(&make_content(6), theme.id);
            let sum: u32 = result.zone_usage.values().sum();
            assert_eq!(sum, result.total_units_used, "theme {}", theme.id);
            assert_eq!(result.zone_usage, result.content.zone_usage());
            assert_eq!(result.zone_usage[&ZoneName::Margins], 0);
            assert_eq!(result.zone_usage.len(), ZoneName::COUNT);
        }
    }

    #[test]
    fn test_capacity_invariant_holds_or_is_reported() {
        for theme in all_themes() {
            for n in [0, 1, 3, 8, 20] {
                let result = run(&make_content(n), theme.id);
                let ceiling = theme.total_capacity * result.pages;
                let reported = result
                    .actions
                    .iter()
                    .any(|a| matches!(a, FitAction::Overflow { .. }));
                assert!(
                    result.total_units_used <= ceiling || reported,
                    "theme {} with {n} experiences: {} > {ceiling} unreported",
                    theme.id,
                    result.total_units_used
                );
            }
        }
    }

    #[test]
    fn test_identical_inputs_identical_results() {
        let content = make_content(9);
        let a = run(&content, "dense");
        let b = run(&content, "dense");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_unknown_theme_falls_back_and_is_recorded() {
        let result = run(&make_content(2), "no-such-theme");
        assert_eq!(result.theme_id, "classic");
        assert!(result.theme_fallback);
    }

    #[test]
    fn test_empty_experiences_warns_not_crash() {
        let result = run(&make_content(0), "classic");
        assert!(result.content.experiences.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w == "No experiences available to fit"));
    }

    #[test]
    fn test_min_detailed_floor_in_full_pipeline() {
        let result = run(&make_content(5), "classic");
        assert_eq!(get_theme("classic").rules.min_detailed_experiences, 2);
        assert_eq!(result.experience_formats[0], ExperienceFormat::Detailed);
        assert_eq!(result.experience_formats[1], ExperienceFormat::Detailed);
    }

    #[test]
    fn test_global_pass_shrinks_summary_when_over_budget() {
        // Classic zones add up to 98 content units against a 96-unit page budget.
        let mut content = make_content(3);
        content.profile.summary = Some(words(150));
        content.skills = (0..20)
            .map(|i| Skill {
                name: format!("s{i}"),
                category: None,
            })
            .collect();
        content.formations = (0..2)
            .map(|i| Formation {
                degree: format!("D{i}"),
                school: "S".to_string(),
                year: None,
            })
            .collect();
        content.certifications = (0..2)
            .map(|i| Certification {
                name: format!("C{i}"),
                issuer: None,
                year: None,
            })
            .collect();
        content.languages = (0..3)
            .map(|i| Language {
                name: format!("L{i}"),
                level: None,
            })
            .collect();
        content.clients = (0..3)
            .map(|i| Client {
                name: format!("Client {i}"),
                sector: None,
            })
            .collect();
        content.interests = vec!["a".to_string(), "b".to_string()];

        let result = run(&content, "classic");
        assert!(result
            .actions
            .iter()
            .any(|a| matches!(a, FitAction::GlobalSummaryShrink { .. })));
        let summary = result.content.summary.as_ref().unwrap();
        assert_ne!(summary.tier, SummaryTier::Elevator);
    }

    #[test]
    fn test_executive_spills_onto_second_page() {
        let result = run(&make_content(6), "executive");
        assert_eq!(result.pages, 2);
        assert!(result
            .actions
            .iter()
            .any(|a| matches!(a, FitAction::PageAdded { pages: 2 })));
        let report = validate(&result, get_theme("executive"));
        assert!(report.valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn test_compression_counter_matches_compressing_actions() {
        let result = run(&make_content(12), "dense");
        let counted = result.actions.iter().filter(|a| a.is_compression()).count() as u32;
        assert_eq!(result.compression_level_applied, counted);
        assert!(result.compression_level_applied > 0);
    }

    #[test]
    fn test_clients_skip_own_employer() {
        let result = run(&make_content(2), "classic");
        let names: Vec<&str> = result
            .content
            .clients
            .items
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Initech"]);
    }

    #[test]
    fn test_preferences_default_when_fields_missing() {
        let prefs: FitPreferences = serde_json::from_str(r#"{"include_photo": false}"#).unwrap();
        assert!(!prefs.include_photo);
        assert!(prefs.include_clients);
        assert!(prefs.include_interests);
    }
}
