// src/models/profile.rs
use serde::{Deserialize, Deserializer, Serialize};

use crate::dtos::dashboard_dtos::DashboardUpdate;

/// The single portfolio document. Every field falls back to an empty value
/// when missing from the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub hero: Hero,
    pub experience: Vec<Experience>,
    pub services: Vec<Service>,
    pub skills: Vec<String>,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    pub title: String,
    pub name: String,
    pub description: String,
    /// Public path or absolute URL of the avatar.
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub date: String,
    pub location: String,
    #[serde(deserialize_with = "one_or_many")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub title: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub location: String,
    pub whatsapp_link: String,
    pub instagram_link: String,
}

impl Experience {
    /// True when every field is empty, as in the form's trailing blank row.
    pub fn is_blank(&self) -> bool {
        [&self.title, &self.date, &self.location]
            .iter()
            .all(|f| f.trim().is_empty())
            && self.description.iter().all(|d| d.trim().is_empty())
    }
}

impl Service {
    pub fn is_blank(&self) -> bool {
        [&self.title, &self.icon, &self.description]
            .iter()
            .all(|f| f.trim().is_empty())
    }
}

impl Profile {
    /// Applies a dashboard submission in place.
    ///
    /// Hero text and contact fields are replaced unconditionally. The array
    /// sections are replaced only when the submission carried them, and the
    /// hero image only when a new upload was stored.
    pub fn apply_update(&mut self, update: DashboardUpdate, image_path: Option<String>) {
        self.hero.title = update.hero_title;
        self.hero.name = update.hero_name;
        self.hero.description = update.hero_description;
        if let Some(path) = image_path {
            self.hero.image = path;
        }

        if let Some(experience) = update.experience {
            self.experience = experience;
        }
        if let Some(services) = update.services {
            self.services = services;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }

        self.contact = Contact {
            phone: update.contact_phone,
            email: update.contact_email,
            location: update.contact_location,
            whatsapp_link: update.contact_whatsapp,
            instagram_link: update.contact_instagram,
        };
    }
}

/// Accepts either a single string or a list of strings.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}

/// Like [`one_or_many`] but keeps "absent" distinct from "empty".
pub fn optional_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    one_or_many(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_update() -> DashboardUpdate {
        DashboardUpdate {
            hero_title: "Engineer".to_string(),
            hero_name: "Jane".to_string(),
            hero_description: "Builds things".to_string(),
            contact_email: "a@b.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let profile: Profile = serde_json::from_str(r#"{"hero":{"name":"Jane"}}"#).unwrap();
        assert_eq!(profile.hero.name, "Jane");
        assert_eq!(profile.hero.image, "");
        assert!(profile.experience.is_empty());
        assert!(profile.skills.is_empty());
        assert_eq!(profile.contact, Contact::default());
    }

    #[test]
    fn experience_description_accepts_single_string() {
        let profile: Profile = serde_json::from_str(
            r#"{"experience":[{"title":"Dev","description":"Wrote code"}]}"#,
        )
        .unwrap();
        assert_eq!(profile.experience[0].description, vec!["Wrote code"]);
    }

    #[test]
    fn update_keeps_image_without_upload() {
        let mut profile = Profile::default();
        profile.hero.image = "/uploads/old.png".to_string();

        profile.apply_update(sample_update(), None);

        assert_eq!(profile.hero.image, "/uploads/old.png");
        assert_eq!(profile.hero.title, "Engineer");
        assert_eq!(profile.contact.email, "a@b.com");
    }

    #[test]
    fn update_replaces_image_with_upload() {
        let mut profile = Profile::default();
        profile.hero.image = "/uploads/old.png".to_string();

        profile.apply_update(sample_update(), Some("/uploads/new.png".to_string()));

        assert_eq!(profile.hero.image, "/uploads/new.png");
    }

    #[test]
    fn omitted_sections_are_left_alone() {
        let mut profile = Profile::default();
        profile.skills = vec!["Rust".to_string()];
        profile.experience = vec![Experience {
            title: "Dev".to_string(),
            ..Default::default()
        }];

        profile.apply_update(sample_update(), None);

        assert_eq!(profile.skills, vec!["Rust"]);
        assert_eq!(profile.experience.len(), 1);
    }

    #[test]
    fn submitted_sections_replace_wholesale() {
        let mut profile = Profile::default();
        profile.skills = vec!["Rust".to_string(), "Go".to_string()];
        profile.services = vec![Service::default(), Service::default()];

        let update = DashboardUpdate {
            skills: Some(vec!["Design".to_string()]),
            services: Some(Vec::new()),
            ..sample_update()
        };
        profile.apply_update(update, None);

        assert_eq!(profile.skills, vec!["Design"]);
        assert!(profile.services.is_empty());
    }

    #[test]
    fn contact_is_overwritten_even_when_blank() {
        let mut profile = Profile::default();
        profile.contact.phone = "123".to_string();

        profile.apply_update(sample_update(), None);

        assert_eq!(profile.contact.phone, "");
    }
}
