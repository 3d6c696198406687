//! Calendar Engine - Main entry point
//!
//! Prints month grids and runs scripted picker sessions.

use std::path::PathBuf;

use chrono::Weekday;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use calendar_engine::calendar::{DatePicker, PickerOptions};
use calendar_engine::display;
use calendar_engine::script::{parse_script, ScriptSession};
use calendar_engine::{CalendarDate, Config, Error, Result, SelectionMode};

#[derive(Parser)]
#[command(name = "calendar-engine")]
#[command(author, version, about = "Date-selection engine for calendar pickers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CALENDAR_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the day grid of a month
    Grid {
        /// Month to show (YYYY-MM or YYYY-MM-DD, default: this month)
        month: Option<String>,

        /// Day to mark as selected
        #[arg(long)]
        selected: Option<CalendarDate>,

        /// First column of the grid (default from config)
        #[arg(long)]
        week_start: Option<Weekday>,
    },

    /// Run a scripted picker session and print the result as JSON
    Pick {
        /// Script file (reads stdin when absent)
        script: Option<PathBuf>,

        /// Pick a range instead of a single day
        #[arg(long)]
        range: bool,

        /// Initial day, or range start
        #[arg(long)]
        start: Option<CalendarDate>,

        /// Initial range end
        #[arg(long)]
        end: Option<CalendarDate>,

        /// Earliest selectable day
        #[arg(long)]
        min: Option<CalendarDate>,

        /// Latest selectable day
        #[arg(long)]
        max: Option<CalendarDate>,

        /// Longest range a second click may close
        #[arg(long)]
        max_days: Option<u32>,

        /// Day used when no initial selection is given
        #[arg(long)]
        today: Option<CalendarDate>,

        /// Transition animation length, e.g. "250ms"
        #[arg(long)]
        transition: Option<String>,

        /// Fallback timer slack, e.g. "100ms"
        #[arg(long)]
        margin: Option<String>,

        /// First column of the grid (default from config)
        #[arg(long)]
        week_start: Option<Weekday>,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    // Initialize logging; stdout is reserved for results
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.general.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Grid {
            month,
            selected,
            week_start,
        }) => run_grid(&config, month.as_deref(), selected, week_start),

        Some(Commands::Pick {
            script,
            range,
            start,
            end,
            min,
            max,
            max_days,
            today,
            transition,
            margin,
            week_start,
        }) => {
            let mode = if range {
                SelectionMode::Range
            } else {
                SelectionMode::Single
            };
            let mut options = PickerOptions::from_config(mode, &config.calendar);
            options.start = start;
            options.end = end;
            options.min_date = min;
            options.max_date = max;
            if let Some(days) = max_days {
                options = options.with_max_selectable_days(days);
            }
            if let Some(today) = today {
                options = options.with_today(today);
            }
            if let Some(week_start) = week_start {
                options = options.with_week_start(week_start);
            }
            if let Some(ref text) = transition {
                options.timing.animation = humantime::parse_duration(text)?;
            }
            if let Some(ref text) = margin {
                options.timing.margin = humantime::parse_duration(text)?;
            }
            run_pick(&options, script).await
        }

        Some(Commands::Config { show, init }) => {
            if init {
                let path = Config::default().save()?;
                println!("Created default configuration at {}", path.display());
            } else if show {
                println!("{}", config.to_toml()?);
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }

        None => {
            // Default: show this month
            run_grid(&config, None, None, None)
        }
    }
}

/// Accept `YYYY-MM` as well as a full date.
fn parse_month(text: &str) -> Result<CalendarDate> {
    if text.len() == 7 {
        format!("{text}-01").parse()
    } else {
        text.parse()
    }
}

fn run_grid(
    config: &Config,
    month: Option<&str>,
    selected: Option<CalendarDate>,
    week_start: Option<Weekday>,
) -> Result<()> {
    let options = grid_options(config, month, selected, week_start)?;
    let session = ScriptSession::new(&options);
    print_picker(session.picker());
    Ok(())
}

/// Options for `grid`; the shown day must fall in the requested month and
/// inside the configured bounds.
fn grid_options(
    config: &Config,
    month: Option<&str>,
    selected: Option<CalendarDate>,
    week_start: Option<Weekday>,
) -> Result<PickerOptions> {
    let shown = month.map(parse_month).transpose()?;
    let day = selected.or(shown).unwrap_or_else(CalendarDate::today);

    let mut options = PickerOptions::from_config(SelectionMode::Single, &config.calendar);
    options.start = Some(day);
    if let Some(week_start) = week_start {
        options = options.with_week_start(week_start);
    }

    if let Some(month) = shown.filter(|m| !m.same_month(day)) {
        return Err(Error::other(format!(
            "selected day {day} is not in {}",
            month.format("%B %Y")
        )));
    }
    let bounds = options.bounds();
    if !bounds.contains(day) {
        return Err(Error::other(format!(
            "{} is outside the selectable range {bounds}",
            day.format("%B %Y")
        )));
    }
    Ok(options)
}

async fn run_pick(options: &PickerOptions, script: Option<PathBuf>) -> Result<()> {
    let text = match script {
        Some(path) => tokio::fs::read_to_string(&path).await?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    let commands = parse_script(&text)?;

    let mut session = ScriptSession::new(options);
    let result = session.run(&commands, print_picker);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn print_picker(picker: &dyn DatePicker) {
    let nav = picker.navigation();
    display::print_section_simple(&display::navigation_line(&nav));
    for line in display::render_panels(&picker.panels()) {
        println!("{line}");
    }
    if let Some(transition) = picker.transition() {
        println!(
            "(transition {} {:?} to {})",
            transition.id, transition.direction, transition.target_month
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2021-11").unwrap(), date("2021-11-01"));
        assert_eq!(parse_month("2021-11-09").unwrap(), date("2021-11-09"));
        assert!(parse_month("2021-13").is_err());
    }

    #[test]
    fn test_grid_options_month_and_selection() {
        let config = Config::default();
        let options = grid_options(&config, Some("2021-11"), Some(date("2021-11-09")), None).unwrap();
        assert_eq!(options.start, Some(date("2021-11-09")));

        let err = grid_options(&config, Some("2021-11"), Some(date("2021-12-01")), None).unwrap_err();
        assert!(err.to_string().contains("not in November 2021"));
    }

    #[test]
    fn test_grid_options_reject_month_outside_bounds() {
        let config = Config::default();
        let err = grid_options(&config, Some("1850-01"), None, None).unwrap_err();
        assert!(err.to_string().contains("January 1850 is outside the selectable range"));

        let err = grid_options(&config, None, Some(date("2100-01-01")), None).unwrap_err();
        assert!(err.to_string().contains("outside the selectable range"));

        assert!(grid_options(&config, Some("1900-01"), None, None).is_ok());
    }
}
