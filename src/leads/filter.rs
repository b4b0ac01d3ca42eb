use std::fmt;
use std::str::FromStr;

use super::category::{ParseCategoryError, Status};
use super::types::Lead;
use crate::scoring::{ParsePriorityError, Priority};

/// Status predicate: `all` or one exact stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

/// Priority predicate: `all` or one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl StatusFilter {
    pub fn matches(&self, status: &Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// Step through all, then each known stage, then back to all
    pub fn cycle(&self) -> Self {
        let stages = Status::ALL;
        match self {
            StatusFilter::All => StatusFilter::Only(stages[0].clone()),
            StatusFilter::Only(current) => match stages.iter().position(|s| s == current) {
                Some(i) if i + 1 < stages.len() => StatusFilter::Only(stages[i + 1].clone()),
                _ => StatusFilter::All,
            },
        }
    }
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => *wanted == priority,
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::Hot),
            PriorityFilter::Only(Priority::Hot) => PriorityFilter::Only(Priority::Warm),
            PriorityFilter::Only(Priority::Warm) => PriorityFilter::Only(Priority::Cold),
            PriorityFilter::Only(Priority::Cold) => PriorityFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(priority) => write!(f, "{}", priority),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PriorityFilter::All)
        } else {
            s.parse().map(PriorityFilter::Only)
        }
    }
}

/// Search text plus the two categorical filters. The default matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl LeadQuery {
    /// True when any predicate narrows the result
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
            || self.status != StatusFilter::All
            || self.priority != PriorityFilter::All
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        self.matches_with_needle(lead, &self.search.to_lowercase())
    }

    /// `matches` with the search text already lowercased, so a scan over
    /// many leads lowercases it once.
    fn matches_with_needle(&self, lead: &Lead, needle: &str) -> bool {
        matches_search(lead, needle)
            && self.status.matches(&lead.status)
            && self.priority.matches(lead.priority())
    }
}

/// Case-insensitive substring match on name, company, or email.
/// `needle` must already be lowercase.
fn matches_search(lead: &Lead, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    lead.name.to_lowercase().contains(needle)
        || lead.company.to_lowercase().contains(needle)
        || lead.email.to_lowercase().contains(needle)
}

/// Positions of the matching leads, highest score first. Equal scores keep
/// their collection order.
pub fn filter_and_sort_indices(leads: &[Lead], query: &LeadQuery) -> Vec<usize> {
    let needle = query.search.to_lowercase();
    let mut positions: Vec<usize> = leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| query.matches_with_needle(lead, &needle))
        .map(|(pos, _)| pos)
        .collect();

    // sort_by is stable
    positions.sort_by(|a, b| leads[*b].score.cmp(&leads[*a].score));
    positions
}

/// The list view: leads matching `query`, highest score first.
pub fn filter_and_sort<'a>(leads: &'a [Lead], query: &LeadQuery) -> Vec<&'a Lead> {
    filter_and_sort_indices(leads, query)
        .into_iter()
        .map(|pos| &leads[pos])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::types::{create_lead, NewLead};
    use chrono::Utc;

    fn create_test_lead(name: &str, company: &str, email: &str, score: u8, status: Status) -> Lead {
        let mut lead = create_lead(
            NewLead {
                name: name.to_string(),
                company: company.to_string(),
                email: email.to_string(),
                ..NewLead::default()
            },
            Utc::now(),
        );
        lead.score = score;
        lead.status = status;
        lead
    }

    fn sample_leads() -> Vec<Lead> {
        vec![
            create_test_lead("Ana Ruiz", "Mission Bakery", "ana@missionbakery.example", 45, Status::New),
            create_test_lead("Ben Cho", "Cho Dental", "ben@chodental.example", 100, Status::Won),
            create_test_lead("Cara Diaz", "Diaz Law", "cara@diazlaw.example", 70, Status::Qualified),
            create_test_lead("Dev Patel", "Patel Motors", "dev@patelmotors.example", 70, Status::Contacted),
            create_test_lead("Eli Stone", "Stoneworks", "eli@stoneworks.example", 80, Status::Lost),
        ]
    }

    fn names(leads: &[&Lead]) -> Vec<String> {
        leads.iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn test_no_filters_returns_all_sorted_desc_stable() {
        let leads = sample_leads();
        let result = filter_and_sort(&leads, &LeadQuery::default());
        assert_eq!(
            names(&result),
            vec!["Ben Cho", "Eli Stone", "Cara Diaz", "Dev Patel", "Ana Ruiz"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let leads = sample_leads();

        let by_name = LeadQuery { search: "CARA".to_string(), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &by_name)), vec!["Cara Diaz"]);

        let by_company = LeadQuery { search: "motors".to_string(), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &by_company)), vec!["Dev Patel"]);

        let by_email = LeadQuery { search: "@chodental".to_string(), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &by_email)), vec!["Ben Cho"]);
    }

    #[test]
    fn test_search_ignores_other_fields() {
        let mut leads = sample_leads();
        leads[0].notes = "mentioned stoneworks".to_string();
        leads[0].phone = "555-0100".to_string();

        let query = LeadQuery { search: "555".to_string(), ..LeadQuery::default() };
        assert!(filter_and_sort(&leads, &query).is_empty());

        let query = LeadQuery { search: "stoneworks".to_string(), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &query)), vec!["Eli Stone"]);
    }

    #[test]
    fn test_status_filter_exact() {
        let leads = sample_leads();
        let query = LeadQuery {
            status: StatusFilter::Only(Status::Won),
            ..LeadQuery::default()
        };
        assert_eq!(names(&filter_and_sort(&leads, &query)), vec!["Ben Cho"]);
    }

    #[test]
    fn test_priority_filter_uses_score_tiers() {
        let leads = sample_leads();

        let hot = LeadQuery { priority: PriorityFilter::Only(Priority::Hot), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &hot)), vec!["Ben Cho", "Eli Stone"]);

        let warm = LeadQuery { priority: PriorityFilter::Only(Priority::Warm), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &warm)), vec!["Cara Diaz", "Dev Patel"]);

        let cold = LeadQuery { priority: PriorityFilter::Only(Priority::Cold), ..LeadQuery::default() };
        assert_eq!(names(&filter_and_sort(&leads, &cold)), vec!["Ana Ruiz"]);
    }

    #[test]
    fn test_predicates_are_anded() {
        let leads = sample_leads();
        let query = LeadQuery {
            search: "e".to_string(),
            status: StatusFilter::Only(Status::Lost),
            priority: PriorityFilter::Only(Priority::Hot),
        };
        assert_eq!(names(&filter_and_sort(&leads, &query)), vec!["Eli Stone"]);

        let none = LeadQuery {
            search: "ben".to_string(),
            status: StatusFilter::Only(Status::New),
            priority: PriorityFilter::All,
        };
        assert!(filter_and_sort(&leads, &none).is_empty());
    }

    #[test]
    fn test_indices_point_into_collection() {
        let leads = sample_leads();
        let positions = filter_and_sort_indices(&leads, &LeadQuery::default());
        assert_eq!(positions, vec![1, 4, 2, 3, 0]);
    }

    #[test]
    fn test_empty_collection() {
        let leads: Vec<Lead> = vec![];
        assert!(filter_and_sort(&leads, &LeadQuery::default()).is_empty());
    }

    #[test]
    fn test_query_matches_single_lead() {
        let leads = sample_leads();
        let query = LeadQuery { search: "diaz".to_string(), ..LeadQuery::default() };
        assert!(query.matches(&leads[2]));
        assert!(!query.matches(&leads[1]));
    }

    #[test]
    fn test_matches_agrees_with_list_pipeline() {
        let leads = sample_leads();
        let queries = [
            LeadQuery { search: "DIAZ".to_string(), ..LeadQuery::default() },
            LeadQuery {
                search: "Example".to_string(),
                status: StatusFilter::Only(Status::Qualified),
                priority: PriorityFilter::Only(Priority::Warm),
            },
            LeadQuery { priority: PriorityFilter::Only(Priority::Hot), ..LeadQuery::default() },
        ];

        for query in &queries {
            let listed = filter_and_sort_indices(&leads, query);
            for (pos, lead) in leads.iter().enumerate() {
                assert_eq!(query.matches(lead), listed.contains(&pos), "{:?} / {}", query, lead.name);
            }
        }
    }

    #[test]
    fn test_is_filtered() {
        assert!(!LeadQuery::default().is_filtered());
        assert!(LeadQuery { search: "x".to_string(), ..LeadQuery::default() }.is_filtered());
        assert!(LeadQuery { priority: PriorityFilter::Only(Priority::Cold), ..LeadQuery::default() }.is_filtered());
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("ALL".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert_eq!(
            "proposal".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::Proposal)
        );
        assert_eq!(
            "warm".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::Warm)
        );
        assert!("everything".parse::<StatusFilter>().is_err());
        assert!("tepid".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn test_status_filter_cycles_through_all_stages() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..Status::ALL.len() {
            filter = filter.cycle();
            seen.push(filter.to_string());
        }
        assert_eq!(seen, vec!["new", "qualified", "contacted", "proposal", "won", "lost"]);
        assert_eq!(filter.cycle(), StatusFilter::All);
    }

    #[test]
    fn test_priority_filter_cycle() {
        let filter = PriorityFilter::All.cycle().cycle().cycle();
        assert_eq!(filter, PriorityFilter::Only(Priority::Cold));
        assert_eq!(filter.cycle(), PriorityFilter::All);
    }
}
