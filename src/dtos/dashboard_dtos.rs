// src/dtos/dashboard_dtos.rs
use serde::Deserialize;

use crate::dtos::nested_form::{self, FormError};
use crate::models::profile::{optional_one_or_many, Experience, Service};

/// Text part of a dashboard submission.
///
/// Hero and contact fields default to empty strings when missing. The array
/// sections stay `None` unless the form carried at least one field for them,
/// which is how "leave unchanged" is told apart from "clear".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardUpdate {
    pub hero_title: String,
    pub hero_name: String,
    pub hero_description: String,
    pub experience: Option<Vec<Experience>>,
    pub services: Option<Vec<Service>>,
    #[serde(deserialize_with = "optional_one_or_many")]
    pub skills: Option<Vec<String>>,
    pub contact_phone: String,
    pub contact_email: String,
    pub contact_location: String,
    pub contact_whatsapp: String,
    pub contact_instagram: String,
}

impl DashboardUpdate {
    /// Builds the update from flat multipart text fields.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let value = nested_form::decode(pairs)?;
        let mut update: Self = serde_json::from_value(value)?;
        update.drop_blank_entries();
        Ok(update)
    }

    /// The dashboard always renders one empty row per section for adding
    /// items; untouched rows and empty lines are discarded here.
    fn drop_blank_entries(&mut self) {
        if let Some(experience) = &mut self.experience {
            for job in experience.iter_mut() {
                job.description.retain(|line| !line.trim().is_empty());
            }
            experience.retain(|job| !job.is_blank());
        }
        if let Some(services) = &mut self.services {
            services.retain(|service| !service.is_blank());
        }
        if let Some(skills) = &mut self.skills {
            skills.retain(|skill| !skill.trim().is_empty());
        }
    }
}
