//! Header stage: picks one of three fixed header tiers.

use serde::{Deserialize, Serialize};

use crate::fitting::actions::{FitAction, Stage};
use crate::fitting::FitPreferences;
use crate::layout::units::ContentUnitType;
use crate::models::cv::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFormat {
    WithPhoto,
    WithContacts,
    Minimal,
}

impl HeaderFormat {
    /// Richest first.
    pub const ALL: [HeaderFormat; 3] = [
        HeaderFormat::WithPhoto,
        HeaderFormat::WithContacts,
        HeaderFormat::Minimal,
    ];

    pub const fn unit(self) -> ContentUnitType {
        match self {
            HeaderFormat::WithPhoto => ContentUnitType::HeaderWithPhoto,
            HeaderFormat::WithContacts => ContentUnitType::HeaderWithContacts,
            HeaderFormat::Minimal => ContentUnitType::HeaderMinimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedHeader {
    pub format: HeaderFormat,
    pub full_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
}

impl FittedHeader {
    pub fn units(&self) -> u32 {
        self.format.unit().height_units()
    }
}

fn is_eligible(format: HeaderFormat, profile: &Profile, prefs: &FitPreferences) -> bool {
    match format {
        HeaderFormat::WithPhoto => prefs.include_photo && profile.has_photo(),
        HeaderFormat::WithContacts => profile.has_contacts(),
        HeaderFormat::Minimal => true,
    }
}

/// Chooses the richest header whose inputs exist and whose cost fits `capacity`.
/// Falls back to `Minimal` (with a warning) when nothing fits.
pub fn fit_header(profile: &Profile, prefs: &FitPreferences, capacity: u32) -> Stage<FittedHeader> {
    let chosen = HeaderFormat::ALL
        .into_iter()
        .find(|f| is_eligible(*f, profile, prefs) && f.unit().fits(capacity));

    let mut actions = Vec::new();
    let format = chosen.unwrap_or_else(|| {
        actions.push(FitAction::HeaderOverCapacity {
            needed: HeaderFormat::Minimal.unit().height_units(),
            capacity,
        });
        HeaderFormat::Minimal
    });

    let with_contacts = format != HeaderFormat::Minimal;
    let header = FittedHeader {
        format,
        full_name: profile.full_name.clone(),
        title: profile.title.clone(),
        email: profile.email.clone().filter(|_| with_contacts),
        phone: profile.phone.clone().filter(|_| with_contacts),
        location: profile.location.clone().filter(|_| with_contacts),
        photo_url: profile
            .photo_url
            .clone()
            .filter(|_| format == HeaderFormat::WithPhoto),
    };

    Stage::new(header, actions)
}
