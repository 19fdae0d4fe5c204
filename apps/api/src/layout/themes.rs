//! Theme/zone schema: static registry of presentation profiles.
//!
//! Each theme carries a page budget, one `Zone` per `ZoneName` (always all of
//! them; capacity 0 disables a zone) and the adaptive rules the fitting engine
//! applies. Themes are `static` data, never mutated after build.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Zones
// ────────────────────────────────────────────────────────────────────────────

/// Closed set of page regions. The discriminant indexes `Theme::zones`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneName {
    Header,
    Summary,
    Experiences,
    Skills,
    Formation,
    Certifications,
    Languages,
    Clients,
    Interests,
    Footer,
    Margins,
}

impl ZoneName {
    pub const COUNT: usize = 11;

    pub const ALL: [ZoneName; ZoneName::COUNT] = [
        ZoneName::Header,
        ZoneName::Summary,
        ZoneName::Experiences,
        ZoneName::Skills,
        ZoneName::Formation,
        ZoneName::Certifications,
        ZoneName::Languages,
        ZoneName::Clients,
        ZoneName::Interests,
        ZoneName::Footer,
        ZoneName::Margins,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ZoneName::Header => "header",
            ZoneName::Summary => "summary",
            ZoneName::Experiences => "experiences",
            ZoneName::Skills => "skills",
            ZoneName::Formation => "formation",
            ZoneName::Certifications => "certifications",
            ZoneName::Languages => "languages",
            ZoneName::Clients => "clients",
            ZoneName::Interests => "interests",
            ZoneName::Footer => "footer",
            ZoneName::Margins => "margins",
        }
    }

    /// Zones that reserve space but never hold content.
    pub const fn is_reserved(self) -> bool {
        matches!(self, ZoneName::Footer | ZoneName::Margins)
    }
}

/// What a renderer should do with content that does not fit a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    Hide,
    Compact,
    SplitPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub name: ZoneName,
    /// Hard ceiling. 0 disables the zone.
    pub capacity_units: u32,
    /// Soft floor; falling short is a validator warning.
    pub min_units: u32,
    /// Informational: the engine does not redistribute capacity between zones.
    pub flex: bool,
    pub flex_priority: u8,
    pub overflow_strategy: OverflowStrategy,
}

impl Zone {
    pub const fn is_enabled(&self) -> bool {
        self.capacity_units > 0
    }
}

const fn zone(
    name: ZoneName,
    capacity_units: u32,
    min_units: u32,
    flex: bool,
    flex_priority: u8,
    overflow_strategy: OverflowStrategy,
) -> Zone {
    Zone {
        name,
        capacity_units,
        min_units,
        flex,
        flex_priority,
        overflow_strategy,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Theme
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillsDisplayMode {
    /// Full lines when everything fits, compact tags otherwise.
    Auto,
    Full,
    Compact,
}

/// Per-theme policies applied on top of raw zone capacities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdaptiveRules {
    pub min_detailed_experiences: usize,
    /// Experiences that ended more than this many years ago start compact.
    pub compact_after_years: u32,
    pub max_bullets_per_experience: usize,
    pub skills_display_mode: SkillsDisplayMode,
}

/// Multi-page policy. `max_pages == 1` means single page only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PagePolicy {
    pub max_pages: u32,
    /// Overage fraction of one page budget beyond which content spills onto
    /// another page instead of being reported as overflow.
    pub overflow_threshold: f32,
}

impl PagePolicy {
    pub const fn supports_multi_page(&self) -> bool {
        self.max_pages > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub total_capacity: u32,
    pub pages: PagePolicy,
    pub zones: [Zone; ZoneName::COUNT],
    pub rules: AdaptiveRules,
}

impl Theme {
    pub fn zone(&self, name: ZoneName) -> &Zone {
        &self.zones[name as usize]
    }

    pub fn capacity(&self, name: ZoneName) -> u32 {
        self.zone(name).capacity_units
    }

    /// Units available for content on one page once margins are reserved.
    pub fn page_budget(&self) -> u32 {
        self.total_capacity
            .saturating_sub(self.capacity(ZoneName::Margins))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_THEME_ID: &str = "classic";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown theme id '{0}'")]
pub struct UnknownThemeId(pub String);

use OverflowStrategy::{Compact, Hide, SplitPage};
use ZoneName as Z;

static THEMES: [Theme; 4] = [
    Theme {
        id: "classic",
        name: "Classic",
        total_capacity: 100,
        pages: PagePolicy {
            max_pages: 1,
            overflow_threshold: 0.0,
        },
        #[rustfmt::skip]
        zones: [
            zone(Z::Header,         12,  6, false, 0, Compact),
            zone(Z::Summary,         8,  4, true,  3, Compact),
            zone(Z::Experiences,    48, 24, true,  1, Compact),
            zone(Z::Skills,         10,  4, true,  2, Compact),
            zone(Z::Formation,       8,  4, true,  4, Compact),
            zone(Z::Certifications,  4,  0, true,  5, Hide),
            zone(Z::Languages,       3,  1, false, 6, Hide),
            zone(Z::Clients,         3,  0, true,  7, Hide),
            zone(Z::Interests,       2,  0, true,  8, Hide),
            zone(Z::Footer,          0,  0, false, 0, Hide),
            zone(Z::Margins,         4,  4, false, 0, Hide),
        ],
        rules: AdaptiveRules {
            min_detailed_experiences: 2,
            compact_after_years: 10,
            max_bullets_per_experience: 5,
            skills_display_mode: SkillsDisplayMode::Auto,
        },
    },
    Theme {
        id: "modern",
        name: "Modern",
        total_capacity: 100,
        pages: PagePolicy {
            max_pages: 1,
            overflow_threshold: 0.0,
        },
        #[rustfmt::skip]
        zones: [
            zone(Z::Header,          9,  6, false, 0, Compact),
            zone(Z::Summary,        10,  4, true,  3, Compact),
            zone(Z::Experiences,    52, 30, true,  1, Compact),
            zone(Z::Skills,          8,  4, true,  2, Compact),
            zone(Z::Formation,       6,  2, true,  4, Compact),
            zone(Z::Certifications,  4,  0, true,  5, Hide),
            zone(Z::Languages,       2,  1, false, 6, Hide),
            zone(Z::Clients,         0,  0, false, 0, Hide),
            zone(Z::Interests,       3,  0, true,  7, Hide),
            zone(Z::Footer,          0,  0, false, 0, Hide),
            zone(Z::Margins,         4,  4, false, 0, Hide),
        ],
        rules: AdaptiveRules {
            min_detailed_experiences: 1,
            compact_after_years: 8,
            max_bullets_per_experience: 4,
            skills_display_mode: SkillsDisplayMode::Compact,
        },
    },
    Theme {
        id: "dense",
        name: "Dense",
        total_capacity: 110,
        pages: PagePolicy {
            max_pages: 1,
            overflow_threshold: 0.0,
        },
        #[rustfmt::skip]
        zones: [
            zone(Z::Header,          6,  6, false, 0, Hide),
            zone(Z::Summary,         4,  0, true,  4, Compact),
            zone(Z::Experiences,    64, 40, true,  1, Compact),
            zone(Z::Skills,         12,  4, true,  2, Compact),
            zone(Z::Formation,       8,  2, true,  3, Compact),
            zone(Z::Certifications,  6,  0, true,  5, Hide),
            zone(Z::Languages,       3,  1, false, 6, Hide),
            zone(Z::Clients,         4,  0, true,  7, Hide),
            zone(Z::Interests,       0,  0, false, 0, Hide),
            zone(Z::Footer,          0,  0, false, 0, Hide),
            zone(Z::Margins,         3,  3, false, 0, Hide),
        ],
        rules: AdaptiveRules {
            min_detailed_experiences: 1,
            compact_after_years: 6,
            max_bullets_per_experience: 3,
            skills_display_mode: SkillsDisplayMode::Compact,
        },
    },
    Theme {
        id: "executive",
        name: "Executive",
        total_capacity: 100,
        pages: PagePolicy {
            max_pages: 2,
            overflow_threshold: 0.15,
        },
        #[rustfmt::skip]
        zones: [
            zone(Z::Header,         12,  9, false, 0, Compact),
            zone(Z::Summary,        10,  7, true,  2, Compact),
            zone(Z::Experiences,    80, 40, true,  1, SplitPage),
            zone(Z::Skills,         10,  4, true,  3, SplitPage),
            zone(Z::Formation,       8,  4, true,  4, SplitPage),
            zone(Z::Certifications,  6,  0, true,  5, SplitPage),
            zone(Z::Languages,       3,  1, false, 6, Hide),
            zone(Z::Clients,         6,  0, true,  7, SplitPage),
            zone(Z::Interests,       0,  0, false, 0, Hide),
            zone(Z::Footer,          0,  0, false, 0, Hide),
            zone(Z::Margins,         5,  5, false, 0, Hide),
        ],
        rules: AdaptiveRules {
            min_detailed_experiences: 3,
            compact_after_years: 15,
            max_bullets_per_experience: 5,
            skills_display_mode: SkillsDisplayMode::Full,
        },
    },
];

/// Every registered theme, default first.
pub fn all_themes() -> &'static [Theme] {
    &THEMES
}

/// Explicit lookup. Matching ignores case and surrounding whitespace.
pub fn lookup_theme(id: &str) -> Result<&'static Theme, UnknownThemeId> {
    let wanted = id.trim();
    THEMES
        .iter()
        .find(|theme| theme.id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| UnknownThemeId(id.to_string()))
}

pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

/// Resolves a user-supplied id, falling back to the default theme.
/// The second element is `true` when the fallback was taken.
pub fn resolve_theme(id: &str) -> (&'static Theme, bool) {
    match lookup_theme(id) {
        Ok(theme) => (theme, false),
        Err(err) => {
            debug!("{err}; falling back to '{DEFAULT_THEME_ID}'");
            (default_theme(), true)
        }
    }
}

/// Total lookup: unknown ids resolve to the default theme.
pub fn get_theme(id: &str) -> &'static Theme {
    resolve_theme(id).0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_indexes_zones_by_name() {
        for theme in all_themes() {
            for (i, zone) in theme.zones.iter().enumerate() {
                assert_eq!(
                    zone.name as usize, i,
                    "theme '{}' has zone {:?} at slot {i}",
                    theme.id, zone.name
                );
            }
        }
    }

    #[test]
    fn test_zone_names_all_matches_discriminants() {
        for (i, name) in ZoneName::ALL.iter().enumerate() {
            assert_eq!(*name as usize, i);
        }
    }

    #[test]
    fn test_theme_ids_unique() {
        let themes = all_themes();
        for (i, a) in themes.iter().enumerate() {
            for b in &themes[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_default_theme_is_first_and_classic() {
        assert_eq!(default_theme().id, DEFAULT_THEME_ID);
        assert_eq!(all_themes()[0].id, DEFAULT_THEME_ID);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        assert_eq!(lookup_theme("  Modern ").map(|t| t.id), Ok("modern"));
        assert_eq!(lookup_theme("EXECUTIVE").map(|t| t.id), Ok("executive"));
    }

    #[test]
    fn test_lookup_unknown_id_is_error() {
        let err = lookup_theme("neon-pink").unwrap_err();
        assert_eq!(err, UnknownThemeId("neon-pink".to_string()));
        assert!(err.to_string().contains("neon-pink"));
    }

    #[test]
    fn test_get_theme_falls_back_to_default() {
        assert_eq!(get_theme("does-not-exist").id, DEFAULT_THEME_ID);
        assert_eq!(get_theme("").id, DEFAULT_THEME_ID);
        let (theme, fell_back) = resolve_theme("dense");
        assert_eq!(theme.id, "dense");
        assert!(!fell_back);
        assert!(resolve_theme("nope").1);
    }

    #[test]
    fn test_page_budget_subtracts_margins() {
        let classic = get_theme("classic");
        assert_eq!(classic.page_budget(), 96);
    }

    #[test]
    fn test_reserved_zones_are_footer_and_margins() {
        let reserved: Vec<_> = ZoneName::ALL
            .iter()
            .filter(|z| z.is_reserved())
            .collect();
        assert_eq!(reserved, vec![&ZoneName::Footer, &ZoneName::Margins]);
    }

    #[test]
    fn test_min_units_never_exceed_capacity() {
        for theme in all_themes() {
            for zone in &theme.zones {
                assert!(
                    zone.min_units <= zone.capacity_units,
                    "theme '{}' zone {:?}: min {} > capacity {}",
                    theme.id,
                    zone.name,
                    zone.min_units,
                    zone.capacity_units
                );
            }
        }
    }

    #[test]
    fn test_only_executive_is_multi_page() {
        for theme in all_themes() {
            assert_eq!(
                theme.pages.supports_multi_page(),
                theme.id == "executive",
                "theme '{}'",
                theme.id
            );
        }
    }

    #[test]
    fn test_modern_disables_clients() {
        let modern = get_theme("modern");
        assert!(!modern.zone(ZoneName::Clients).is_enabled());
        assert_eq!(modern.zones.len(), ZoneName::COUNT);
    }
}
