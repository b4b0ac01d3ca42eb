use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_desk::analytics::summarize;
use lead_desk::leads::{
    self, Budget, CompanySize, Lead, LeadQuery, NewLead, PriorityFilter, ProjectType, Source,
    Status, StatusFilter, Timeline,
};
use lead_desk::output;
use lead_desk::scoring::score_breakdown;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive dashboard (default if no subcommand)
    Tui,
    /// List leads sorted by score
    List {
        /// Case-insensitive match on name, email, or company
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter: all, new, qualified, contacted, proposal, won, lost
        #[arg(long)]
        status: Option<StatusFilter>,

        /// Priority filter: all, hot, warm, cold
        #[arg(short, long)]
        priority: Option<PriorityFilter>,

        /// Tab-separated output for scripts
        #[arg(long)]
        tsv: bool,
    },
    /// Show one lead with its score breakdown
    Show {
        /// Lead id or a unique prefix of it
        id: String,
    },
    /// Add a new lead
    Add(AddArgs),
    /// Move a lead to another pipeline stage
    Status {
        /// Lead id or a unique prefix of it
        id: String,
        status: Status,
    },
    /// Replace a lead's notes
    Notes {
        /// Lead id or a unique prefix of it
        id: String,
        notes: String,
    },
    /// Aggregate statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the sample lead collection
    Sample {
        /// Replace existing leads
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    company: String,

    #[arg(long, default_value_t = ProjectType::WebsiteRedesign)]
    project_type: ProjectType,

    #[arg(long, default_value_t = Budget::Medium)]
    budget: Budget,

    #[arg(long, default_value_t = Timeline::Soon)]
    timeline: Timeline,

    #[arg(long, default_value_t = CompanySize::Medium)]
    company_size: CompanySize,

    #[arg(long, default_value_t = Source::Website)]
    source: Source,

    #[arg(long, default_value = "")]
    notes: String,
}

impl From<AddArgs> for NewLead {
    fn from(args: AddArgs) -> Self {
        NewLead {
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: args.company,
            project_type: args.project_type,
            budget: args.budget,
            timeline: args.timeline,
            company_size: args.company_size,
            source: args.source,
            notes: args.notes,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lead-desk")]
#[command(about = "Score, filter, and track prospective client leads", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-desk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "lead_desk=debug"
    } else {
        "lead_desk=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(lead_desk::stderr_buffer::BufferedStderr),
        )
        .init();
}

fn save_or_exit(path: &Path, leads: &[Lead]) {
    if let Err(e) = leads::save_leads(path, leads) {
        eprintln!("Failed to save leads: {:#}", e);
        std::process::exit(EXIT_INPUT);
    }
}

fn find_or_exit(leads: &[Lead], id: &str) -> usize {
    match leads::find_lead(leads, id) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    init_tracing(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match lead_desk::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = lead_desk::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let leads_path = config.leads_path();
    tracing::debug!("Using lead file {}", leads_path.display());

    let now = Utc::now();
    // First run: seed the store so the dashboard has something to show
    let seed = config.sample_on_empty && !matches!(command, Commands::Sample { .. });
    let mut all_leads = match leads::open_leads(&leads_path, seed, now) {
        Ok(leads) => leads,
        Err(e) => {
            eprintln!("Failed to open leads: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let use_colors = output::should_use_colors();

    match command {
        Commands::Tui => {
            // Detect the palette before the terminal enters raw mode
            let theme = lead_desk::tui::resolve_theme(config.theme);
            let app = lead_desk::tui::App::new(
                all_leads,
                leads_path,
                config.default_query(),
                theme,
            );
            if let Err(e) = lead_desk::tui::run_tui(app).await {
                eprintln!("Dashboard error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        }
        Commands::List {
            search,
            status,
            priority,
            tsv,
        } => {
            let defaults = config.default_query();
            let query = LeadQuery {
                search: search.unwrap_or(defaults.search),
                status: status.unwrap_or(defaults.status),
                priority: priority.unwrap_or(defaults.priority),
            };
            let shown = leads::filter_and_sort(&all_leads, &query);

            if tsv {
                print!("{}", output::format_tsv(&shown));
            } else {
                println!(
                    "{}",
                    output::format_quick_stats(&summarize(&all_leads), use_colors)
                );
                println!();
                println!("{}", output::format_lead_table(&shown, use_colors));
                println!();
                println!(
                    "{}",
                    output::format_results_line(shown.len(), all_leads.len(), query.is_filtered())
                );
            }
        }
        Commands::Show { id } => {
            let index = find_or_exit(&all_leads, &id);
            let lead = &all_leads[index];
            println!("{}", output::format_lead_detail(lead, now, use_colors));
            println!();
            println!(
                "{}",
                output::format_score_breakdown(&score_breakdown(&lead.score_inputs()))
            );
        }
        Commands::Add(args) => {
            let form = NewLead::from(args);
            if form.name.trim().is_empty() || form.email.trim().is_empty() {
                eprintln!("Name and email are required.");
                std::process::exit(EXIT_INPUT);
            }

            let lead = leads::add_lead(&mut all_leads, form, now).clone();
            save_or_exit(&leads_path, &all_leads);
            println!(
                "Added {} ({}): score {} {}",
                lead.name,
                output::short_id(&lead.id),
                lead.score,
                lead.priority().as_str().to_uppercase()
            );
        }
        Commands::Status { id, status } => {
            let lead = match leads::change_status(&mut all_leads, &id, status, now) {
                Ok(lead) => lead.clone(),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            save_or_exit(&leads_path, &all_leads);
            println!("{} is now {}", lead.name, lead.status);
        }
        Commands::Notes { id, notes } => {
            let lead = match leads::update_notes(&mut all_leads, &id, notes, now) {
                Ok(lead) => lead.clone(),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            save_or_exit(&leads_path, &all_leads);
            println!("Updated notes for {}", lead.name);
        }
        Commands::Stats { json } => {
            let summary = summarize(&all_leads);
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Failed to serialize statistics: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else {
                println!("{}", output::format_summary(&summary, use_colors));
            }
        }
        Commands::Sample { force } => {
            if !all_leads.is_empty() && !force {
                eprintln!(
                    "{} already holds {} leads. Use --force to replace them.",
                    leads_path.display(),
                    all_leads.len()
                );
                std::process::exit(EXIT_INPUT);
            }
            let samples = leads::sample_leads(now);
            save_or_exit(&leads_path, &samples);
            println!(
                "Loaded {} sample leads into {}",
                samples.len(),
                leads_path.display()
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
