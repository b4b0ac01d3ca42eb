use chrono::{DateTime, Duration, Utc};

use super::category::{Budget, CompanySize, ProjectType, Source, Status, Timeline};
use super::types::{create_lead, Lead, NewLead};

struct Seed {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    project_type: ProjectType,
    budget: Budget,
    timeline: Timeline,
    company_size: CompanySize,
    source: Source,
    status: Status,
    notes: &'static str,
    days_ago: i64,
}

fn seeds() -> Vec<Seed> {
    vec![
        Seed {
            name: "Maria Gonzalez",
            email: "maria@sunsetdental.example",
            phone: "(415) 555-0142",
            company: "Sunset Dental Group",
            project_type: ProjectType::WebsiteRedesign,
            budget: Budget::High,
            timeline: Timeline::Urgent,
            company_size: CompanySize::Medium,
            source: Source::Referral,
            status: Status::Qualified,
            notes: "Current site is from 2012 and not mobile friendly. Wants online booking.",
            days_ago: 6,
        },
        Seed {
            name: "James Chen",
            email: "james@peninsulalogistics.example",
            phone: "(650) 555-0187",
            company: "Peninsula Logistics",
            project_type: ProjectType::CustomDevelopment,
            budget: Budget::Enterprise,
            timeline: Timeline::Soon,
            company_size: CompanySize::Enterprise,
            source: Source::ColdOutreach,
            status: Status::Proposal,
            notes: "Needs a dispatch portal integrated with their fleet tracking.",
            days_ago: 14,
        },
        Seed {
            name: "Aisha Thompson",
            email: "aisha@oaklandthreads.example",
            phone: "",
            company: "Oakland Threads",
            project_type: ProjectType::Ecommerce,
            budget: Budget::Medium,
            timeline: Timeline::Soon,
            company_size: CompanySize::Small,
            source: Source::SocialMedia,
            status: Status::New,
            notes: "Sells at weekend markets, wants a Shopify alternative.",
            days_ago: 2,
        },
        Seed {
            name: "Robert Kim",
            email: "rkim@missionfitness.example",
            phone: "(415) 555-0119",
            company: "Mission Fitness Studio",
            project_type: ProjectType::MobileApp,
            budget: Budget::High,
            timeline: Timeline::Future,
            company_size: CompanySize::Small,
            source: Source::Website,
            status: Status::Contacted,
            notes: "Class booking app. Budget approval expected next quarter.",
            days_ago: 21,
        },
        Seed {
            name: "Linda Park",
            email: "linda@parkandsons.example",
            phone: "(408) 555-0164",
            company: "Park & Sons Hardware",
            project_type: ProjectType::Maintenance,
            budget: Budget::Low,
            timeline: Timeline::Future,
            company_size: CompanySize::Small,
            source: Source::Other,
            status: Status::Lost,
            notes: "Found via a business park flyer. Went with a nephew's WordPress setup.",
            days_ago: 45,
        },
        Seed {
            name: "David Okafor",
            email: "david@baytechstartup.example",
            phone: "(510) 555-0133",
            company: "BayTech Labs",
            project_type: ProjectType::CustomDevelopment,
            budget: Budget::High,
            timeline: Timeline::Urgent,
            company_size: CompanySize::Enterprise,
            source: Source::Referral,
            status: Status::Won,
            notes: "Signed for an MVP build. Kickoff scheduled.",
            days_ago: 30,
        },
    ]
}

/// Fixed starter collection used when no leads are stored yet.
///
/// Every lead goes through [`create_lead`], so scores follow the normal
/// table. Creation times are spread over the weeks before `now`.
pub fn sample_leads(now: DateTime<Utc>) -> Vec<Lead> {
    seeds()
        .into_iter()
        .map(|seed| {
            let created = now - Duration::days(seed.days_ago);
            let mut lead = create_lead(
                NewLead {
                    name: seed.name.to_string(),
                    email: seed.email.to_string(),
                    phone: seed.phone.to_string(),
                    company: seed.company.to_string(),
                    project_type: seed.project_type,
                    budget: seed.budget,
                    timeline: seed.timeline,
                    company_size: seed.company_size,
                    source: seed.source,
                    notes: seed.notes.to_string(),
                },
                created,
            );
            lead.status = seed.status;
            lead
        })
        .collect()
}
