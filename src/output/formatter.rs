use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::analytics::{GroupCounts, Summary};
use crate::leads::{Budget, Lead, ProjectType, Status, Timeline};
use crate::scoring::{Priority, ScoreBreakdown};

/// Characters of the id shown in tables; enough to address a lead by prefix
pub const SHORT_ID_LEN: usize = 8;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Turn a kebab-case tag into words: "custom-development" -> "Custom Development"
pub fn format_tag(tag: &str) -> String {
    tag.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_project_type(project_type: &ProjectType) -> String {
    format_tag(project_type.as_str())
}

/// Budget bracket in dollars
pub fn format_budget(budget: &Budget) -> String {
    match budget {
        Budget::Low => "Under $5K".to_string(),
        Budget::Medium => "$5K - $15K".to_string(),
        Budget::High => "$15K - $50K".to_string(),
        Budget::Enterprise => "$50K+".to_string(),
        Budget::Unknown(raw) => raw.clone(),
    }
}

pub fn format_timeline(timeline: &Timeline) -> String {
    match timeline {
        Timeline::Urgent => "ASAP (< 1 month)".to_string(),
        Timeline::Soon => "1-3 months".to_string(),
        Timeline::Future => "3+ months".to_string(),
        Timeline::Unknown(raw) => raw.clone(),
    }
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn paint_priority(text: &str, priority: Priority, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match priority {
        Priority::Hot => text.red().bold().to_string(),
        Priority::Warm => text.yellow().to_string(),
        Priority::Cold => text.blue().to_string(),
    }
}

fn paint_status(text: &str, status: &Status, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match status {
        Status::New => text.magenta().to_string(),
        Status::Qualified => text.blue().to_string(),
        Status::Contacted => text.yellow().to_string(),
        Status::Proposal => text.bright_red().to_string(),
        Status::Won => text.green().to_string(),
        Status::Lost => text.red().to_string(),
        Status::Unknown(_) => text.dimmed().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format leads as a table with columns: Index, Score, Priority, Status, Name (Company), Id
/// No headers, one lead per line.
pub fn format_lead_table(leads: &[&Lead], use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads match your filters.".to_string();
    }

    let term_width = get_terminal_width();

    // Index 4 + score 4 + priority 5 + status 10 + id 8 + separators
    let fixed_width = 4 + 4 + 5 + 10 + SHORT_ID_LEN + 2 * 5;

    leads
        .iter()
        .enumerate()
        .map(|(idx, lead)| {
            let index_str = format!("{:>3}.", idx + 1);
            let score_str = format!("{:>4}", lead.score);
            let priority = lead.priority();
            let priority_str = format!("{:<5}", priority.as_str().to_uppercase());
            let status_str = format!("{:<10}", lead.status.as_str());

            let who = if lead.company.is_empty() {
                lead.name.clone()
            } else {
                format!("{} ({})", lead.name, lead.company)
            };
            let who = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_text(&who, width - fixed_width),
                Some(_) => truncate_text(&who, 20),
                None => who,
            };

            let id = short_id(&lead.id);

            if use_colors {
                format!(
                    "{} {}  {}  {}  {}  {}",
                    index_str.dimmed(),
                    score_str.bold(),
                    paint_priority(&priority_str, priority, true),
                    paint_status(&status_str, &lead.status, true),
                    who,
                    id.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}  {}",
                    index_str, score_str, priority_str, status_str, who, id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format leads as tab-separated values for scripting
/// Columns: score, priority, status, name, company, email, id (no headers, no colors)
pub fn format_tsv(leads: &[&Lead]) -> String {
    leads
        .iter()
        .map(|lead| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                lead.score,
                lead.priority(),
                lead.status,
                lead.name,
                lead.company,
                lead.email,
                lead.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// "Showing N of M leads", flagged when a filter is active
pub fn format_results_line(shown: usize, total: usize, filtered: bool) -> String {
    if filtered {
        format!("Showing {} of {} leads (filtered)", shown, total)
    } else {
        format!("Showing {} of {} leads", shown, total)
    }
}

/// One-line header: total, hot, and qualified counts
pub fn format_quick_stats(summary: &Summary, use_colors: bool) -> String {
    let hot = format!("{} hot", summary.by_priority.hot);
    let qualified = format!("{} qualified", summary.qualified_count);
    if use_colors {
        format!(
            "{} leads | {} | {}",
            summary.total.bold(),
            hot.red(),
            qualified.green()
        )
    } else {
        format!("{} leads | {} | {}", summary.total, hot, qualified)
    }
}

/// Multi-line detail view of a single lead
pub fn format_lead_detail(lead: &Lead, now: DateTime<Utc>, use_colors: bool) -> String {
    let priority = lead.priority();
    let badge = format!("{} PRIORITY ({}/100)", priority.as_str().to_uppercase(), lead.score);
    let status = lead.status.as_str().replace('-', " ").to_uppercase();

    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!("{}", lead.name.bold()));
        lines.push(format!(
            "  {}  {}",
            paint_priority(&badge, priority, true),
            paint_status(&status, &lead.status, true)
        ));
    } else {
        lines.push(lead.name.clone());
        lines.push(format!("  {}  {}", badge, status));
    }

    lines.push(format!("  Id: {}", lead.id));
    lines.push(format!("  Company: {}", lead.company));
    lines.push(format!("  Email: {}", lead.email));
    if !lead.phone.is_empty() {
        lines.push(format!("  Phone: {}", lead.phone));
    }
    lines.push(format!("  Project: {}", format_project_type(&lead.project_type)));
    lines.push(format!("  Budget: {}", format_budget(&lead.budget)));
    lines.push(format!("  Timeline: {}", format_timeline(&lead.timeline)));
    lines.push(format!(
        "  Company size: {}",
        format_tag(lead.company_size.as_str())
    ));
    lines.push(format!("  Source: {}", format_tag(lead.source.as_str())));
    lines.push(format!(
        "  Created: {}",
        lead.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(format!(
        "  Updated: {} ({} ago)",
        lead.updated_at.format("%Y-%m-%d %H:%M UTC"),
        format_age(lead.since_update(now))
    ));
    if lead.notes.is_empty() {
        lines.push("  Notes: (none)".to_string());
    } else {
        lines.push("  Notes:".to_string());
        for line in lead.notes.lines() {
            lines.push(format!("    {}", line));
        }
    }

    lines.join("\n")
}

/// Per-dimension score table, one factor per line
pub fn format_score_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut lines: Vec<String> = breakdown
        .factors
        .iter()
        .map(|factor| {
            format!(
                "  {:<13} {:<20} {:>+4}",
                factor.label,
                factor.value,
                factor.points as i64
            )
        })
        .collect();

    if breakdown.clamped() {
        lines.push(format!(
            "  {:<34} {:>4} (capped from {})",
            "Score", breakdown.score, breakdown.raw_total
        ));
    } else {
        lines.push(format!("  {:<34} {:>4}", "Score", breakdown.score));
    }
    lines.join("\n")
}

/// Horizontal bar scaled against the largest count
fn count_bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = ((count as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

fn format_group(title: &str, groups: &GroupCounts, label: impl Fn(&str) -> String) -> Vec<String> {
    let mut lines = vec![format!("{}:", title)];
    if groups.is_empty() {
        lines.push("  (none)".to_string());
        return lines;
    }
    let max = groups.max_count();
    for (key, count) in groups.iter() {
        lines.push(format!(
            "  {:<20} {:>4}  {}",
            label(key),
            count,
            count_bar(count, max, 20)
        ));
    }
    lines
}

/// Full analytics report
pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let heading = |text: &str| {
        if use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    lines.push(heading("Key metrics"));
    lines.push(format!(
        "  Total leads:     {} ({} qualified)",
        summary.total, summary.qualified_count
    ));
    lines.push(format!(
        "  Conversion rate: {:.1}% ({} won)",
        summary.conversion_rate, summary.won_count
    ));
    lines.push(format!(
        "  Average score:   {:.1} / 100",
        summary.average_score
    ));
    lines.push(String::new());

    lines.push(heading("Priority distribution"));
    for priority in Priority::ALL {
        let label = format!("{:<5}", format_tag(priority.as_str()));
        lines.push(format!(
            "  {} {:>4}",
            paint_priority(&label, priority, use_colors),
            summary.by_priority.get(priority)
        ));
    }
    lines.push(String::new());

    lines.extend(format_group("Lead sources", &summary.by_source, format_tag));
    lines.push(String::new());
    lines.extend(format_group(
        "Project types",
        &summary.by_project_type,
        format_tag,
    ));
    lines.push(String::new());
    lines.extend(format_group("Budgets", &summary.by_budget, |key| {
        format_budget(&Budget::from(key.to_string()))
    }));

    lines.join("\n")
}
