use crate::leads::category::{Budget, CompanySize, ProjectType, Timeline};

/// Scores are clamped to this ceiling.
pub const MAX_SCORE: u8 = 100;

/// The four attributes a lead is scored on.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub budget: &'a Budget,
    pub timeline: &'a Timeline,
    pub project_type: &'a ProjectType,
    pub company_size: &'a CompanySize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: &'static str, // e.g. "Budget", "Timeline"
    pub value: String,       // tag as stored, e.g. "enterprise"
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
    /// Sum of all factors before the ceiling is applied
    pub raw_total: u32,
    pub score: u8,
}

impl ScoreBreakdown {
    /// True when the ceiling cut points off the raw sum
    pub fn clamped(&self) -> bool {
        self.raw_total > u32::from(self.score)
    }
}

// Unrecognized tags score zero for their dimension; scoring never fails.

fn budget_points(budget: &Budget) -> u32 {
    match budget {
        Budget::Enterprise => 35,
        Budget::High => 30,
        Budget::Medium => 20,
        Budget::Low => 10,
        Budget::Unknown(_) => 0,
    }
}

fn timeline_points(timeline: &Timeline) -> u32 {
    match timeline {
        Timeline::Urgent => 25,
        Timeline::Soon => 20,
        Timeline::Future => 10,
        Timeline::Unknown(_) => 0,
    }
}

fn project_type_points(project_type: &ProjectType) -> u32 {
    match project_type {
        ProjectType::CustomDevelopment => 25,
        ProjectType::Ecommerce => 23,
        ProjectType::MobileApp => 22,
        ProjectType::WebsiteRedesign => 20,
        ProjectType::Maintenance => 15,
        ProjectType::Unknown(_) => 0,
    }
}

fn company_size_points(company_size: &CompanySize) -> u32 {
    match company_size {
        CompanySize::Enterprise => 20,
        CompanySize::Medium => 15,
        CompanySize::Small => 10,
        CompanySize::Unknown(_) => 0,
    }
}

/// Per-dimension points for a lead, in the order they are summed.
pub fn score_breakdown(inputs: &ScoreInputs<'_>) -> ScoreBreakdown {
    let factors = vec![
        FactorContribution {
            label: "Budget",
            value: inputs.budget.to_string(),
            points: budget_points(inputs.budget),
        },
        FactorContribution {
            label: "Timeline",
            value: inputs.timeline.to_string(),
            points: timeline_points(inputs.timeline),
        },
        FactorContribution {
            label: "Project type",
            value: inputs.project_type.to_string(),
            points: project_type_points(inputs.project_type),
        },
        FactorContribution {
            label: "Company size",
            value: inputs.company_size.to_string(),
            points: company_size_points(inputs.company_size),
        },
    ];

    let raw_total: u32 = factors.iter().map(|f| f.points).sum();
    let score = raw_total.min(u32::from(MAX_SCORE)) as u8;

    ScoreBreakdown {
        factors,
        raw_total,
        score,
    }
}

/// Score a lead from 0 to 100: the four table lookups summed, then capped.
pub fn calculate_score(inputs: &ScoreInputs<'_>) -> u8 {
    score_breakdown(inputs).score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_of(
        budget: Budget,
        timeline: Timeline,
        project_type: ProjectType,
        company_size: CompanySize,
    ) -> u8 {
        calculate_score(&ScoreInputs {
            budget: &budget,
            timeline: &timeline,
            project_type: &project_type,
            company_size: &company_size,
        })
    }

    #[test]
    fn test_top_combination_reaches_exactly_100() {
        // 30 + 25 + 25 + 20 = 100, the ceiling leaves it alone
        let score = score_of(
            Budget::High,
            Timeline::Urgent,
            ProjectType::CustomDevelopment,
            CompanySize::Enterprise,
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn test_sum_above_100_is_clamped() {
        // 35 + 25 + 25 + 20 = 105
        let budget = Budget::Enterprise;
        let inputs = ScoreInputs {
            budget: &budget,
            timeline: &Timeline::Urgent,
            project_type: &ProjectType::CustomDevelopment,
            company_size: &CompanySize::Enterprise,
        };
        let breakdown = score_breakdown(&inputs);
        assert_eq!(breakdown.raw_total, 105);
        assert_eq!(breakdown.score, 100);
        assert!(breakdown.clamped());
    }

    #[test]
    fn test_low_combination() {
        // 10 + 10 + 15 + 10 = 45
        let score = score_of(
            Budget::Low,
            Timeline::Future,
            ProjectType::Maintenance,
            CompanySize::Small,
        );
        assert_eq!(score, 45);
    }

    #[test]
    fn test_sum_below_100_is_unaffected() {
        // 20 + 20 + 23 + 15 = 78
        let inputs = ScoreInputs {
            budget: &Budget::Medium,
            timeline: &Timeline::Soon,
            project_type: &ProjectType::Ecommerce,
            company_size: &CompanySize::Medium,
        };
        let breakdown = score_breakdown(&inputs);
        assert_eq!(breakdown.raw_total, 78);
        assert_eq!(breakdown.score, 78);
        assert!(!breakdown.clamped());
    }

    #[test]
    fn test_unknown_categories_score_zero() {
        let score = score_of(
            Budget::Unknown("huge".to_string()),
            Timeline::Urgent,
            ProjectType::Unknown("blockchain".to_string()),
            CompanySize::Small,
        );
        assert_eq!(score, 35); // only timeline(25) + size(10)
    }

    #[test]
    fn test_all_unknown_scores_zero() {
        let score = score_of(
            Budget::Unknown(String::new()),
            Timeline::Unknown(String::new()),
            ProjectType::Unknown(String::new()),
            CompanySize::Unknown(String::new()),
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn test_every_combination_in_range_and_deterministic() {
        for budget in Budget::ALL {
            for timeline in Timeline::ALL {
                for project_type in ProjectType::ALL {
                    for company_size in CompanySize::ALL {
                        let inputs = ScoreInputs {
                            budget,
                            timeline,
                            project_type,
                            company_size,
                        };
                        let first = calculate_score(&inputs);
                        assert!(first <= MAX_SCORE);
                        assert_eq!(first, calculate_score(&inputs));

                        let breakdown = score_breakdown(&inputs);
                        assert_eq!(breakdown.score, first);
                        assert_eq!(
                            u32::from(first),
                            breakdown.raw_total.min(100),
                            "{:?}",
                            breakdown
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_breakdown_lists_factors_in_order() {
        let inputs = ScoreInputs {
            budget: &Budget::High,
            timeline: &Timeline::Soon,
            project_type: &ProjectType::MobileApp,
            company_size: &CompanySize::Small,
        };
        let breakdown = score_breakdown(&inputs);
        let labels: Vec<_> = breakdown.factors.iter().map(|f| f.label).collect();
        assert_eq!(labels, vec!["Budget", "Timeline", "Project type", "Company size"]);
        let points: Vec<_> = breakdown.factors.iter().map(|f| f.points).collect();
        assert_eq!(points, vec![30, 20, 22, 10]);
        assert_eq!(breakdown.factors[2].value, "mobile-app");
    }
}
