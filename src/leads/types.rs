use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::category::{Budget, CompanySize, ProjectType, Source, Status, Timeline};
use crate::scoring::{calculate_score, priority, Priority, ScoreInputs, MAX_SCORE};

/// A prospective client.
///
/// `id` and `created_at` never change. `score` is computed once by
/// [`create_lead`] and is not recomputed when status or notes change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub company: String,
    pub project_type: ProjectType,
    pub budget: Budget,
    pub timeline: Timeline,
    pub company_size: CompanySize,
    pub status: Status,
    /// 0-100. Stored values above 100 load as 100.
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub notes: String,
    pub source: Source,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read a stored score of any size, capped at [`MAX_SCORE`]
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u64::deserialize(deserializer)?;
    Ok(raw.min(u64::from(MAX_SCORE)) as u8)
}

impl Lead {
    pub fn score_inputs(&self) -> ScoreInputs<'_> {
        ScoreInputs {
            budget: &self.budget,
            timeline: &self.timeline,
            project_type: &self.project_type,
            company_size: &self.company_size,
        }
    }

    pub fn priority(&self) -> Priority {
        priority(self.score)
    }

    /// Time since the last status or notes change
    pub fn since_update(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.updated_at
    }

    /// Refresh `updated_at`. Every mutation calls this explicitly.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Fields collected when a lead is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub project_type: ProjectType,
    pub budget: Budget,
    pub timeline: Timeline,
    pub company_size: CompanySize,
    pub source: Source,
    pub notes: String,
}

impl Default for NewLead {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            project_type: ProjectType::WebsiteRedesign,
            budget: Budget::Medium,
            timeline: Timeline::Soon,
            company_size: CompanySize::Medium,
            source: Source::Website,
            notes: String::new(),
        }
    }
}

impl NewLead {
    pub fn score_inputs(&self) -> ScoreInputs<'_> {
        ScoreInputs {
            budget: &self.budget,
            timeline: &self.timeline,
            project_type: &self.project_type,
            company_size: &self.company_size,
        }
    }
}

/// Build a lead from form input: fresh id, status `new`, both timestamps set
/// to `now`, and the score computed from the four scored attributes.
pub fn create_lead(form: NewLead, now: DateTime<Utc>) -> Lead {
    let score = calculate_score(&form.score_inputs());
    Lead {
        id: Uuid::new_v4().to_string(),
        name: form.name,
        email: form.email,
        phone: form.phone,
        company: form.company,
        project_type: form.project_type,
        budget: form.budget,
        timeline: form.timeline,
        company_size: form.company_size,
        status: Status::New,
        score,
        notes: form.notes,
        source: form.source,
        created_at: now,
        updated_at: now,
    }
}
