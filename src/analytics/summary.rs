use serde::Serialize;

use super::groups::GroupCounts;
use crate::leads::{Lead, Status};
use crate::scoring::Priority;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Hot => self.hot,
            Priority::Warm => self.warm,
            Priority::Cold => self.cold,
        }
    }
}

/// Aggregate statistics over a lead collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub by_priority: PriorityCounts,
    /// Leads in qualified, contacted, proposal, or won
    pub qualified_count: usize,
    pub won_count: usize,
    /// Percent of leads won, one decimal place
    pub conversion_rate: f64,
    /// Mean score, one decimal place
    pub average_score: f64,
    pub by_source: GroupCounts,
    pub by_project_type: GroupCounts,
    pub by_budget: GroupCounts,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute every statistic in one pass over `leads`.
///
/// Rates and averages are 0 for an empty collection.
pub fn summarize(leads: &[Lead]) -> Summary {
    let mut summary = Summary::default();
    let mut score_sum: u64 = 0;

    for lead in leads {
        summary.total += 1;
        score_sum += u64::from(lead.score);

        match lead.priority() {
            Priority::Hot => summary.by_priority.hot += 1,
            Priority::Warm => summary.by_priority.warm += 1,
            Priority::Cold => summary.by_priority.cold += 1,
        }

        if lead.status.is_qualified() {
            summary.qualified_count += 1;
        }
        if lead.status == Status::Won {
            summary.won_count += 1;
        }

        summary.by_source.increment(lead.source.as_str());
        summary.by_project_type.increment(lead.project_type.as_str());
        summary.by_budget.increment(lead.budget.as_str());
    }

    if summary.total > 0 {
        let total = summary.total as f64;
        summary.conversion_rate = round_one_decimal(summary.won_count as f64 / total * 100.0);
        summary.average_score = round_one_decimal(score_sum as f64 / total);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{create_lead, Budget, NewLead, ProjectType, Source};
    use chrono::Utc;

    fn sample_lead(score: u8, status: Status, source: Source, budget: Budget) -> Lead {
        let mut lead = create_lead(
            NewLead {
                source,
                budget,
                ..NewLead::default()
            },
            Utc::now(),
        );
        lead.score = score;
        lead.status = status;
        lead
    }

    #[test]
    fn test_empty_collection() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.conversion_rate, 0.0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.by_priority, PriorityCounts::default());
        assert!(summary.by_source.is_empty());
        assert!(summary.by_project_type.is_empty());
        assert!(summary.by_budget.is_empty());
    }

    #[test]
    fn test_counts_and_rates() {
        let leads = vec![
            sample_lead(100, Status::Won, Source::Referral, Budget::High),
            sample_lead(80, Status::Proposal, Source::Website, Budget::Enterprise),
            sample_lead(65, Status::New, Source::Referral, Budget::Medium),
            sample_lead(45, Status::Lost, Source::ColdOutreach, Budget::Low),
            sample_lead(59, Status::Contacted, Source::Referral, Budget::Medium),
            sample_lead(60, Status::Qualified, Source::Website, Budget::Medium),
        ];

        let summary = summarize(&leads);
        assert_eq!(summary.total, 6);
        assert_eq!(
            summary.by_priority,
            PriorityCounts {
                hot: 2,
                warm: 2,
                cold: 2
            }
        );
        assert_eq!(summary.qualified_count, 4);
        assert_eq!(summary.won_count, 1);
        // 1 / 6 = 16.666..
        assert_eq!(summary.conversion_rate, 16.7);
        // 409 / 6 = 68.166..
        assert_eq!(summary.average_score, 68.2);
    }

    #[test]
    fn test_groups_only_observed_keys() {
        let leads = vec![
            sample_lead(70, Status::New, Source::Referral, Budget::High),
            sample_lead(70, Status::New, Source::Website, Budget::High),
            sample_lead(70, Status::New, Source::Referral, Budget::Low),
        ];

        let summary = summarize(&leads);
        let sources: Vec<_> = summary.by_source.iter().collect();
        assert_eq!(sources, vec![("referral", 2), ("website", 1)]);
        let budgets: Vec<_> = summary.by_budget.iter().collect();
        assert_eq!(budgets, vec![("high", 2), ("low", 1)]);
        let projects: Vec<_> = summary.by_project_type.iter().collect();
        assert_eq!(projects, vec![(ProjectType::WebsiteRedesign.as_str(), 3)]);
        assert_eq!(summary.by_source.get("social-media"), 0);
    }

    #[test]
    fn test_unknown_tags_grouped_verbatim() {
        let leads = vec![sample_lead(
            10,
            Status::New,
            Source::Unknown("trade-show".to_string()),
            Budget::Low,
        )];
        let summary = summarize(&leads);
        assert_eq!(summary.by_source.get("trade-show"), 1);
    }

    #[test]
    fn test_all_won_is_full_conversion() {
        let leads = vec![
            sample_lead(90, Status::Won, Source::Website, Budget::High),
            sample_lead(50, Status::Won, Source::Website, Budget::Low),
        ];
        let summary = summarize(&leads);
        assert_eq!(summary.conversion_rate, 100.0);
        assert_eq!(summary.average_score, 70.0);
        assert_eq!(summary.qualified_count, 2);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(summarize(&[])).unwrap();
        assert!(value.get("conversionRate").is_some());
        assert!(value.get("byProjectType").is_some());
        assert_eq!(value["byPriority"]["hot"], 0);
    }
}
