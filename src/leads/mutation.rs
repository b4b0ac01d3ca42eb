use chrono::{DateTime, Utc};
use thiserror::Error;

use super::category::Status;
use super::types::{create_lead, Lead, NewLead};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeadError {
    #[error("no lead matches id '{0}'")]
    NotFound(String),

    #[error("id prefix '{prefix}' matches {count} leads; use more characters")]
    Ambiguous { prefix: String, count: usize },
}

/// Resolve an id or unique id prefix to a position in the collection.
///
/// An exact match always wins, so a full id never collides with a longer id
/// that happens to start with it.
pub fn find_lead(leads: &[Lead], id: &str) -> Result<usize, LeadError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(LeadError::NotFound(id.to_string()));
    }

    if let Some(pos) = leads.iter().position(|lead| lead.id == id) {
        return Ok(pos);
    }

    let matches: Vec<usize> = leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| lead.id.starts_with(id))
        .map(|(pos, _)| pos)
        .collect();

    match matches.as_slice() {
        [] => Err(LeadError::NotFound(id.to_string())),
        [pos] => Ok(*pos),
        _ => Err(LeadError::Ambiguous {
            prefix: id.to_string(),
            count: matches.len(),
        }),
    }
}

/// Append a newly created lead and return it.
pub fn add_lead(leads: &mut Vec<Lead>, form: NewLead, now: DateTime<Utc>) -> &Lead {
    leads.push(create_lead(form, now));
    let last = leads.len() - 1;
    &leads[last]
}

/// Move a lead to another pipeline stage. The score is left untouched.
pub fn change_status<'a>(
    leads: &'a mut [Lead],
    id: &str,
    status: Status,
    now: DateTime<Utc>,
) -> Result<&'a Lead, LeadError> {
    let pos = find_lead(leads, id)?;
    let lead = &mut leads[pos];
    lead.status = status;
    lead.touch(now);
    Ok(lead)
}

/// Replace a lead's notes. The score is left untouched.
pub fn update_notes<'a>(
    leads: &'a mut [Lead],
    id: &str,
    notes: String,
    now: DateTime<Utc>,
) -> Result<&'a Lead, LeadError> {
    let pos = find_lead(leads, id)?;
    let lead = &mut leads[pos];
    lead.notes = notes;
    lead.touch(now);
    Ok(lead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::category::{Budget, CompanySize, ProjectType, Timeline};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn lead_with_id(id: &str) -> Lead {
        let mut lead = create_lead(NewLead::default(), t0());
        lead.id = id.to_string();
        lead
    }

    #[test]
    fn test_find_lead_exact_and_prefix() {
        let leads = vec![lead_with_id("abc123"), lead_with_id("abd456")];
        assert_eq!(find_lead(&leads, "abc123"), Ok(0));
        assert_eq!(find_lead(&leads, "abd"), Ok(1));
    }

    #[test]
    fn test_find_lead_exact_beats_prefix() {
        let leads = vec![lead_with_id("ab12"), lead_with_id("ab1")];
        assert_eq!(find_lead(&leads, "ab1"), Ok(1));
    }

    #[test]
    fn test_find_lead_ambiguous_prefix() {
        let leads = vec![lead_with_id("abc123"), lead_with_id("abd456")];
        assert_eq!(
            find_lead(&leads, "ab"),
            Err(LeadError::Ambiguous {
                prefix: "ab".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn test_find_lead_missing_and_empty() {
        let leads = vec![lead_with_id("abc123")];
        assert_eq!(
            find_lead(&leads, "zzz"),
            Err(LeadError::NotFound("zzz".to_string()))
        );
        assert!(find_lead(&leads, "  ").is_err());
    }

    #[test]
    fn test_add_lead_appends() {
        let mut leads = vec![lead_with_id("first")];
        let form = NewLead {
            name: "Priya Natarajan".to_string(),
            budget: Budget::Low,
            timeline: Timeline::Future,
            project_type: ProjectType::Maintenance,
            company_size: CompanySize::Small,
            ..NewLead::default()
        };

        let added = add_lead(&mut leads, form, t0());
        assert_eq!(added.name, "Priya Natarajan");
        assert_eq!(added.score, 45);
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].id, "first");
    }

    #[test]
    fn test_change_status_touches_but_keeps_score() {
        let mut leads = vec![lead_with_id("a"), lead_with_id("b")];
        let score_before = leads[1].score;
        let later = t0() + Duration::days(2);

        let updated = change_status(&mut leads, "b", Status::Won, later).unwrap();
        assert_eq!(updated.status, Status::Won);
        assert_eq!(updated.score, score_before);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, t0());

        // The other lead is untouched
        assert_eq!(leads[0].status, Status::New);
        assert_eq!(leads[0].updated_at, t0());
    }

    #[test]
    fn test_change_status_any_to_any() {
        let mut leads = vec![lead_with_id("a")];
        change_status(&mut leads, "a", Status::Lost, t0()).unwrap();
        change_status(&mut leads, "a", Status::New, t0()).unwrap();
        change_status(&mut leads, "a", Status::Proposal, t0()).unwrap();
        assert_eq!(leads[0].status, Status::Proposal);
    }

    #[test]
    fn test_update_notes_touches_but_keeps_score() {
        let mut leads = vec![lead_with_id("a")];
        let later = t0() + Duration::minutes(5);

        let updated =
            update_notes(&mut leads, "a", "Call back Tuesday".to_string(), later).unwrap();
        assert_eq!(updated.notes, "Call back Tuesday");
        assert_eq!(updated.score, 75);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_mutation_on_missing_lead_changes_nothing() {
        let mut leads = vec![lead_with_id("a")];
        let before = leads.clone();
        assert!(change_status(&mut leads, "nope", Status::Won, t0()).is_err());
        assert!(update_notes(&mut leads, "nope", "x".to_string(), t0()).is_err());
        assert_eq!(leads, before);
    }
}
