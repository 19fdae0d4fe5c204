use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity block and free-text pitch of the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Profile {
    pub fn has_photo(&self) -> bool {
        is_present(&self.photo_url)
    }

    pub fn has_contacts(&self) -> bool {
        is_present(&self.email) || is_present(&self.phone) || is_present(&self.location)
    }

    /// Summary text with surrounding whitespace removed, `None` when blank.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A single "realisation" bullet under an experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub text: String,
    /// Pre-computed impact, higher is stronger. Used to rank bullets.
    #[serde(default)]
    pub impact_score: f64,
}

/// A work experience, already ranked upstream by relevance or recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// Optional upstream id. See `Experience::stable_id`.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub role: String,
    pub employer: String,
    pub start_date: NaiveDate,
    /// `None` for the current position.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Experience {
    /// Whole years elapsed between the end of this experience and `reference`.
    /// Current positions and future end dates have age 0.
    pub fn age_years(&self, reference: NaiveDate) -> u32 {
        let end = self.end_date.unwrap_or(reference);
        reference.years_since(end).unwrap_or(0)
    }

    /// The upstream id when given, otherwise a name-based (v5) id derived from
    /// role, employer and start date. Identical input always yields the same id.
    pub fn stable_id(&self) -> Uuid {
        self.id.unwrap_or_else(|| {
            let key = format!("{}\u{1f}{}\u{1f}{}", self.role, self.employer, self.start_date);
            Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
        })
    }

    /// "role at employer", used in human-readable warnings.
    pub fn label(&self) -> String {
        format!("{} at {}", self.role, self.employer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
}

/// The full, deduplicated résumé content handed to the fitting engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvContent {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub formations: Vec<Formation>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub interests: Vec<String>,
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_experience(end: Option<NaiveDate>) -> Experience {
        Experience {
            id: None,
            role: "Engineer".to_string(),
            employer: "Acme".to_string(),
            start_date: date(2010, 1, 1),
            end_date: end,
            context: None,
            relevance_score: 0.5,
            achievements: vec![],
        }
    }

    #[test]
    fn test_age_years_for_current_position_is_zero() {
        let exp = make_experience(None);
        assert_eq!(exp.age_years(date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_age_years_counts_whole_years() {
        let exp = make_experience(Some(date(2014, 6, 1)));
        assert_eq!(exp.age_years(date(2024, 5, 31)), 9);
        assert_eq!(exp.age_years(date(2024, 6, 1)), 10);
    }

    #[test]
    fn test_age_years_future_end_date_is_zero() {
        let exp = make_experience(Some(date(2030, 1, 1)));
        assert_eq!(exp.age_years(date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_blank_fields_are_not_present() {
        let profile = Profile {
            full_name: "Ada".to_string(),
            email: Some("   ".to_string()),
            photo_url: Some(String::new()),
            summary: Some("  \n ".to_string()),
            ..Profile::default()
        };
        assert!(!profile.has_contacts());
        assert!(!profile.has_photo());
        assert_eq!(profile.summary_text(), None);
    }

    #[test]
    fn test_content_deserializes_with_defaults() {
        let content: CvContent = serde_json::from_str(
            r#"{"experiences":[{"role":"Dev","employer":"Acme","start_date":"2020-01-01"}]}"#,
        )
        .unwrap();
        assert_eq!(content.experiences.len(), 1);
        assert!(content.experiences[0].achievements.is_empty());
        assert!(content.skills.is_empty());
    }

    #[test]
    fn test_stable_id_is_deterministic_without_upstream_id() {
        let a = make_experience(None);
        let b = make_experience(None);
        assert_eq!(a.stable_id(), b.stable_id());
        assert_eq!(a.stable_id().get_version_num(), 5);

        let mut other = make_experience(None);
        other.employer = "Globex".to_string();
        assert_ne!(a.stable_id(), other.stable_id());
    }

    #[test]
    fn test_stable_id_prefers_upstream_id() {
        let mut exp = make_experience(None);
        let id = Uuid::from_u128(42);
        exp.id = Some(id);
        assert_eq!(exp.stable_id(), id);
    }
}
