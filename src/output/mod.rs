pub mod formatter;

pub use formatter::{
    format_age, format_budget, format_lead_detail, format_lead_table, format_project_type,
    format_quick_stats, format_results_line, format_score_breakdown, format_summary, format_tag,
    format_timeline, format_tsv, short_id, should_use_colors,
};
