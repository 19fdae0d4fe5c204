//! Unit cost model: fixed height costs for every renderable content unit.
//!
//! Costs are abstract, dimensionless "content units" (roughly one text line each).
//! The table is total and fixed at build time; unknown unit types cannot exist
//! because `ContentUnitType` is a closed enum.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Unit types
// ────────────────────────────────────────────────────────────────────────────

/// Every renderable unit variant the engine can place on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentUnitType {
    HeaderWithPhoto,
    HeaderWithContacts,
    HeaderMinimal,
    SummaryElevator,
    SummaryStandard,
    SummaryShort,
    ExperienceDetailed,
    ExperienceStandard,
    ExperienceCompact,
    ExperienceMinimal,
    SkillLine,
    SkillCompact,
    Formation,
    FormationMinimal,
    Certification,
    Language,
    Client,
    Interest,
}

impl ContentUnitType {
    /// Height cost of one unit of this type.
    pub const fn height_units(self) -> u32 {
        match self {
            ContentUnitType::HeaderWithPhoto => 12,
            ContentUnitType::HeaderWithContacts => 9,
            ContentUnitType::HeaderMinimal => 6,
            ContentUnitType::SummaryElevator => 10,
            ContentUnitType::SummaryStandard => 7,
            ContentUnitType::SummaryShort => 4,
            ContentUnitType::ExperienceDetailed => 16,
            ContentUnitType::ExperienceStandard => 11,
            ContentUnitType::ExperienceCompact => 6,
            ContentUnitType::ExperienceMinimal => 3,
            ContentUnitType::SkillLine => 2,
            ContentUnitType::SkillCompact => 1,
            ContentUnitType::Formation => 4,
            ContentUnitType::FormationMinimal => 2,
            ContentUnitType::Certification => 2,
            ContentUnitType::Language => 1,
            ContentUnitType::Client => 1,
            ContentUnitType::Interest => 1,
        }
    }

    /// True if one unit of this type fits in `remaining` units.
    pub const fn fits(self, remaining: u32) -> bool {
        self.height_units() <= remaining
    }
}

/// Cost lookup, total over all unit types.
pub const fn cost(unit: ContentUnitType) -> u32 {
    unit.height_units()
}

/// `floor(capacity / cost(unit))`: how many items of one type a flat list zone holds.
pub const fn max_items_in_capacity(unit: ContentUnitType, capacity: u32) -> usize {
    (capacity / cost(unit)) as usize
}

// ────────────────────────────────────────────────────────────────────────────
// Experience formats
// ────────────────────────────────────────────────────────────────────────────

/// Rendering tier of an experience entry. Declared from richest to leanest;
/// the derived `Ord` follows that order, so `Detailed < Minimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceFormat {
    Detailed,
    Standard,
    Compact,
    Minimal,
}

impl ExperienceFormat {
    /// All tiers in strictly descending cost order.
    pub const ALL: [ExperienceFormat; 4] = [
        ExperienceFormat::Detailed,
        ExperienceFormat::Standard,
        ExperienceFormat::Compact,
        ExperienceFormat::Minimal,
    ];

    pub const fn unit(self) -> ContentUnitType {
        match self {
            ExperienceFormat::Detailed => ContentUnitType::ExperienceDetailed,
            ExperienceFormat::Standard => ContentUnitType::ExperienceStandard,
            ExperienceFormat::Compact => ContentUnitType::ExperienceCompact,
            ExperienceFormat::Minimal => ContentUnitType::ExperienceMinimal,
        }
    }

    pub const fn cost(self) -> u32 {
        self.unit().height_units()
    }

    /// The next tier down, or `None` when already minimal.
    pub const fn degrade(self) -> Option<ExperienceFormat> {
        match self {
            ExperienceFormat::Detailed => Some(ExperienceFormat::Standard),
            ExperienceFormat::Standard => Some(ExperienceFormat::Compact),
            ExperienceFormat::Compact => Some(ExperienceFormat::Minimal),
            ExperienceFormat::Minimal => None,
        }
    }

    /// Number of achievement bullets kept verbatim. Compact synthesizes a
    /// headline instead of keeping bullets.
    pub const fn bullet_cap(self) -> usize {
        match self {
            ExperienceFormat::Detailed => 5,
            ExperienceFormat::Standard => 3,
            ExperienceFormat::Compact | ExperienceFormat::Minimal => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ExperienceFormat::Detailed => "detailed",
            ExperienceFormat::Standard => "standard",
            ExperienceFormat::Compact => "compact",
            ExperienceFormat::Minimal => "minimal",
        }
    }
}

/// Most detailed experience format whose cost fits `remaining`, or `None`
/// when even `minimal` does not fit.
pub fn best_format_for_remaining(remaining: u32) -> Option<ExperienceFormat> {
    ExperienceFormat::ALL
        .into_iter()
        .find(|format| format.unit().fits(remaining))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
