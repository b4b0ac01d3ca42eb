use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};

use crate::analytics::GroupCounts;
use crate::leads::{Lead, Status};
use crate::output::{
    format_age, format_budget, format_project_type, format_tag, format_timeline, short_id,
};
use crate::scoring::{score_breakdown, Priority, MAX_SCORE};
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::ThemeColors;

const SCORE_BAR_WIDTH: usize = 10;
const GROUP_BAR_WIDTH: usize = 24;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Length(1), // Filter line
        Constraint::Fill(1),   // Body
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_filter_line(frame, chunks[2], app);
    match app.current_view {
        View::Leads => render_table(frame, chunks[3], app),
        View::Analytics => render_analytics(frame, chunks[3], app),
    }
    render_status_bar(frame, chunks[4], app);

    match app.input_mode {
        InputMode::StatusPicker => render_status_popup(frame, app),
        InputMode::Notes => render_notes_popup(frame, app),
        InputMode::Details => render_details_popup(frame, app),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::Normal | InputMode::Search => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title = "Lead Desk";
    let stats = format!(
        "{} leads | {} hot | {} qualified",
        app.summary.total, app.summary.by_priority.hot, app.summary.qualified_count
    );
    let padding = (area.width as usize).saturating_sub(title.len() + stats.len());

    let line = Line::from(vec![
        Span::styled(title, Style::default().fg(theme.title_color).bold()),
        Span::raw(" ".repeat(padding)),
        Span::styled(stats, Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = match app.current_view {
        View::Leads => 0,
        View::Analytics => 1,
    };

    let tabs = Tabs::new(vec!["Leads", "Analytics"])
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_filter_line(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let key = Style::default().fg(theme.status_key_color);
    let muted = Style::default().fg(theme.muted);

    let search = if app.input_mode == InputMode::Search {
        format!("{}|", app.query.search)
    } else if app.query.search.is_empty() {
        "-".to_string()
    } else {
        app.query.search.clone()
    };

    let mut spans = vec![
        Span::styled("Search: ", key),
        Span::raw(search),
        Span::raw("  "),
        Span::styled("Status: ", key),
        Span::raw(app.query.status.to_string()),
        Span::raw("  "),
        Span::styled("Priority: ", key),
        Span::raw(app.query.priority.to_string()),
    ];

    if app.query.is_filtered() {
        spans.push(Span::styled(
            format!("  Showing {} of {}", app.visible.len(), app.leads.len()),
            muted,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.visible.is_empty() {
        let msg = if app.leads.is_empty() {
            "No leads yet. Add one with `lead-desk add`."
        } else {
            "No leads match your filters."
        };
        let empty_msg = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted));
        frame.render_widget(empty_msg, area);
        return;
    }

    let now = Utc::now();
    let theme = &app.theme;

    let rows: Vec<Row> = app
        .visible_leads()
        .enumerate()
        .map(|(idx, lead)| {
            let priority = lead.priority();
            let mut score_spans = vec![Span::styled(
                format!("{:>3} ", lead.score),
                Style::default().fg(theme.priority_color(priority)),
            )];
            score_spans.extend(score_bar(lead.score, priority, theme).spans);

            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(priority.as_str().to_uppercase())
                    .style(Style::default().fg(theme.priority_color(priority)).bold()),
                Cell::from(format_tag(lead.status.as_str()))
                    .style(Style::default().fg(theme.status_color(&lead.status))),
                Cell::from(lead.name.clone()),
                Cell::from(lead.company.clone()),
                Cell::from(format_project_type(&lead.project_type)),
                Cell::from(format_age(lead.since_update(now)))
                    .style(Style::default().fg(theme.muted)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(15), // Score + bar: "100 ██████████"
        Constraint::Length(5),  // Priority
        Constraint::Length(10), // Status
        Constraint::Fill(2),    // Name
        Constraint::Fill(2),    // Company
        Constraint::Fill(1),    // Project type
        Constraint::Length(7),  // Updated
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                "#", "Score", "Prio", "Status", "Name", "Company", "Project", "Updated",
            ])
            .style(theme.header_style)
            .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn score_bar(score: u8, priority: Priority, theme: &ThemeColors) -> Line<'static> {
    let ratio = f64::from(score.min(MAX_SCORE)) / f64::from(MAX_SCORE);
    let filled = (ratio * SCORE_BAR_WIDTH as f64).round() as usize;
    let empty = SCORE_BAR_WIDTH.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.priority_color(priority)),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme.bar_empty),
        ));
    }
    Line::from(spans)
}

fn render_analytics(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let summary = &app.summary;
    let label = Style::default().fg(theme.muted);

    if summary.total == 0 {
        let msg = Paragraph::new("No leads to analyze")
            .alignment(Alignment::Center)
            .style(label);
        frame.render_widget(msg, area);
        return;
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Total leads     ", label),
            Span::raw(summary.total.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Priority        ", label),
            Span::styled(
                format!("{} hot", summary.by_priority.hot),
                Style::default().fg(theme.hot),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} warm", summary.by_priority.warm),
                Style::default().fg(theme.warm),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} cold", summary.by_priority.cold),
                Style::default().fg(theme.cold),
            ),
        ]),
        Line::from(vec![
            Span::styled("Qualified       ", label),
            Span::raw(summary.qualified_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Won             ", label),
            Span::styled(
                summary.won_count.to_string(),
                Style::default().fg(theme.status_won),
            ),
        ]),
        Line::from(vec![
            Span::styled("Conversion rate ", label),
            Span::raw(format!("{:.1}%", summary.conversion_rate)),
        ]),
        Line::from(vec![
            Span::styled("Average score   ", label),
            Span::raw(format!("{:.1}", summary.average_score)),
        ]),
    ];

    group_section(&mut lines, "By source", &summary.by_source, theme);
    group_section(&mut lines, "By project type", &summary.by_project_type, theme);
    group_section(&mut lines, "By budget", &summary.by_budget, theme);

    let block = Block::default().padding(ratatui::widgets::Padding::horizontal(1));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Append a titled block of proportional bars, one per observed category
fn group_section(lines: &mut Vec<Line<'static>>, title: &str, groups: &GroupCounts, theme: &ThemeColors) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.title_color).bold(),
    )));

    let max = groups.max_count().max(1);
    let label_width = groups
        .iter()
        .map(|(key, _)| format_tag(key).chars().count())
        .max()
        .unwrap_or(0);

    for (key, count) in groups.iter() {
        let filled = (count * GROUP_BAR_WIDTH).div_ceil(max);
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<width$}  ", format_tag(key), width = label_width)),
            Span::styled("█".repeat(filled), Style::default().fg(theme.bar_filled)),
            Span::styled(
                "░".repeat(GROUP_BAR_WIDTH - filled),
                Style::default().fg(theme.bar_empty),
            ),
            Span::raw(format!(" {}", count)),
        ]));
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match (app.current_view, app.input_mode) {
            (_, InputMode::Search) => &[("Enter", ":keep "), ("Esc", ":clear")],
            (View::Leads, _) => &[
                ("j/k", ":nav "),
                ("/", ":search "),
                ("f", ":status "),
                ("p", ":priority "),
                ("s", ":set status "),
                ("n", ":notes "),
                ("Enter", ":details "),
                ("Tab", ":analytics "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            (View::Analytics, _) => &[
                ("r", ":reload "),
                ("Tab", ":leads "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

fn popup_block<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::bordered()
        .title(title)
        .title_style(theme.popup_title)
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg))
}

fn render_status_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(30, Status::ALL.len() as u16 + 4, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Set Status ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Status::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let marker = if i == app.status_cursor { "> " } else { "  " };
            let mut style = Style::default().fg(theme.status_color(status));
            if i == app.status_cursor {
                style = style.bold().reversed();
            }
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{} ", i + 1), Style::default().fg(theme.status_key_color)),
                Span::styled(format_tag(status.as_str()), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "1-6/Enter: set | Esc: cancel",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_notes_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(60, 8, frame.area());
    frame.render_widget(Clear, popup_area);

    let title = match app.selected_lead() {
        Some(lead) => format!(" Notes: {} ", lead.name),
        None => " Notes ".to_string(),
    };
    let block = popup_block(&title, theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(inner);

    let input = Paragraph::new(format!("{}|", app.notes_input)).wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new("Enter: save | Esc: cancel").style(Style::default().fg(theme.muted));
    frame.render_widget(help, chunks[1]);
}

fn detail_line<'a>(label: &'a str, value: String, theme: &ThemeColors) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(theme.muted)),
        Span::raw(value),
    ])
}

fn render_details_popup(frame: &mut Frame, app: &App) {
    let Some(lead) = app.selected_lead() else {
        return;
    };
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(64, 20, frame.area());
    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", lead.name);
    let block = popup_block(&title, theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    frame.render_widget(
        Paragraph::new(detail_lines(lead, theme)).wrap(Wrap { trim: false }),
        inner,
    );
}

fn detail_lines<'a>(lead: &'a Lead, theme: &ThemeColors) -> Vec<Line<'a>> {
    let now = Utc::now();
    let priority = lead.priority();
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    vec![
        Line::from(vec![
            Span::styled(format!("{:<13}", "Score"), Style::default().fg(theme.muted)),
            Span::styled(
                format!("{} ({})", lead.score, priority.as_str().to_uppercase()),
                Style::default().fg(theme.priority_color(priority)).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<13}", "Status"), Style::default().fg(theme.muted)),
            Span::styled(
                format_tag(lead.status.as_str()),
                Style::default().fg(theme.status_color(&lead.status)),
            ),
        ]),
        detail_line("Email", lead.email.clone(), theme),
        detail_line("Phone", or_dash(&lead.phone), theme),
        detail_line("Company", or_dash(&lead.company), theme),
        detail_line("Project", format_project_type(&lead.project_type), theme),
        detail_line("Budget", format_budget(&lead.budget), theme),
        detail_line("Timeline", format_timeline(&lead.timeline), theme),
        detail_line("Company size", format_tag(lead.company_size.as_str()), theme),
        detail_line("Source", format_tag(lead.source.as_str()), theme),
        detail_line(
            "Created",
            lead.created_at.format("%Y-%m-%d %H:%M").to_string(),
            theme,
        ),
        detail_line(
            "Updated",
            format!("{} ago", format_age(lead.since_update(now))),
            theme,
        ),
        detail_line("ID", short_id(&lead.id).to_string(), theme),
        Line::from(""),
        Line::from(Span::styled("Notes", Style::default().fg(theme.muted))),
        Line::from(or_dash(&lead.notes)),
    ]
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(lead) = app.selected_lead() else {
        return;
    };
    let theme = &app.theme;
    let breakdown = score_breakdown(&lead.score_inputs());

    let popup_area = centered_rect_fixed(50, breakdown.factors.len() as u16 + 7, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Score Breakdown ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = breakdown
        .factors
        .iter()
        .map(|factor| {
            Line::from(vec![
                Span::styled(format!("{:<14}", factor.label), Style::default().fg(theme.muted)),
                Span::raw(format!("{:<20}", format_tag(&factor.value))),
                Span::styled(
                    format!("{:>4}", format!("+{}", factor.points)),
                    Style::default().fg(theme.bar_filled),
                ),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let mut total = vec![
        Span::styled(format!("{:<34}", "Score"), Style::default().bold()),
        Span::styled(
            format!("{:>4}", breakdown.score),
            Style::default().fg(theme.priority_color(lead.priority())).bold(),
        ),
    ];
    if breakdown.clamped() {
        total.push(Span::styled(
            format!("  (capped from {})", breakdown.raw_total),
            Style::default().fg(theme.muted),
        ));
    }
    lines.push(Line::from(total));
    if breakdown.score != lead.score {
        lines.push(Line::from(Span::styled(
            format!("Stored score is {}", lead.score),
            Style::default().fg(theme.flash_error),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let bindings = [
        ("j / Down", "Move down"),
        ("k / Up", "Move up"),
        ("/", "Search name, email, company"),
        ("f", "Cycle status filter"),
        ("p", "Cycle priority filter"),
        ("c", "Clear search and filters"),
        ("s", "Set status"),
        ("1-6", "Set status directly"),
        ("n", "Edit notes"),
        ("Enter", "Lead details"),
        ("b", "Score breakdown"),
        ("z", "Undo last change"),
        ("r", "Reload from disk"),
        ("Tab", "Toggle Leads/Analytics"),
        ("?", "Show/hide this help"),
        ("q / Ctrl-c", "Quit"),
    ];

    let popup_area = centered_rect_fixed(50, bindings.len() as u16 + 4, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Keyboard Shortcuts ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = bindings
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<14}", key),
                    Style::default().fg(theme.status_key_color).bold(),
                ),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{sample_leads, LeadQuery};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn sample_app() -> App {
        App::new(
            sample_leads(Utc::now()),
            std::env::temp_dir().join("lead-desk-ui-test.json"),
            LeadQuery::default(),
            ThemeColors::dark(),
        )
    }

    #[test]
    fn test_centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(40, 5, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 5);
        assert_eq!(rect.y, 2);
    }

    #[test]
    fn test_score_bar_fill() {
        let theme = ThemeColors::dark();
        let full: usize = score_bar(100, Priority::Hot, &theme)
            .spans
            .iter()
            .filter(|s| s.content.contains('█'))
            .map(|s| s.content.chars().count())
            .sum();
        assert_eq!(full, SCORE_BAR_WIDTH);

        let partial = score_bar(70, Priority::Warm, &theme);
        assert_eq!(partial.spans[0].content.chars().count(), 7);
        assert_eq!(partial.spans[1].content.chars().count(), 3);
    }

    #[test]
    fn test_leads_view_renders_rows() {
        let mut app = sample_app();
        let screen = render(&mut app);
        assert!(screen.contains("Lead Desk"));
        assert!(screen.contains("James Chen"));
        assert!(screen.contains("6 leads"));
    }

    #[test]
    fn test_analytics_view_renders_groups() {
        let mut app = sample_app();
        app.toggle_view();
        let screen = render(&mut app);
        assert!(screen.contains("Conversion rate"));
        assert!(screen.contains("By source"));
    }

    #[test]
    fn test_filtered_empty_message() {
        let mut app = sample_app();
        app.query.search = "nobody-matches-this".to_string();
        app.refresh_view();
        let screen = render(&mut app);
        assert!(screen.contains("No leads match your filters."));
        assert!(screen.contains("Showing 0 of 6"));
    }

    #[test]
    fn test_tiny_terminal() {
        let mut app = sample_app();
        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Terminal too small"));
    }
}
