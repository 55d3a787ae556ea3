//! Colorful console output for solve runs.
//!
//! Provides a custom `tracing` layer that formats engine events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end)
//! - **WARN**: Conflicting constraints, empty results
//! - **DEBUG**: One line per sampling round

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVE: &str = "rosterforge_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides the default `rosterforge_solver=info` filter. If another global
/// subscriber is already installed it is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RosterConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats engine events with colors.
pub struct RosterConsoleLayer;

impl<S: Subscriber> Layer<S> for RosterConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with("rosterforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    conflict: Option<String>,
    players: Option<u64>,
    teams: Option<u64>,
    team_size: Option<u64>,
    seed: Option<u64>,
    max_samples: Option<u64>,
    round: Option<u64>,
    samples: Option<u64>,
    samples_drawn: Option<u64>,
    valid_candidates: Option<u64>,
    new_splits: Option<u64>,
    selected: Option<u64>,
    combinations: Option<u64>,
    rounds: Option<u64>,
    elapsed_ms: Option<u64>,
    best_score: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "conflict" => self.conflict = Some(s.trim_matches('"').to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "players" => &mut self.players,
            "teams" => &mut self.teams,
            "team_size" => &mut self.team_size,
            "seed" => &mut self.seed,
            "max_samples" => &mut self.max_samples,
            "round" => &mut self.round,
            "samples" => &mut self.samples,
            "samples_drawn" => &mut self.samples_drawn,
            "valid_candidates" => &mut self.valid_candidates,
            "new_splits" => &mut self.new_splits,
            "selected" => &mut self.selected,
            "combinations" => &mut self.combinations,
            "rounds" => &mut self.rounds,
            "elapsed_ms" => &mut self.elapsed_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "best_score" {
            self.best_score = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "conflict" => self.conflict = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "sampling_round" => format_sampling_round(v),
        "splits_exhausted" => format_exhausted(v),
        "constraint_conflict" => format_conflict(v),
        "no_valid_combination" => format_no_result(v),
        "solve_end" => format_solve_end(v),
        _ => String::new(),
    }
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    let teams = v.teams.unwrap_or(0);
    let size = v.team_size.unwrap_or(0);

    let mut output = format!(
        "{} Balancing │ {} players │ {} teams of {} │ {} splits │ up to {} samples",
        "▶".bright_green().bold(),
        count(v.players).bright_yellow(),
        teams.to_string().bright_yellow(),
        size.to_string().bright_yellow(),
        partition_space(teams, size).bright_magenta(),
        count(v.max_samples).bright_yellow(),
    );
    if let Some(seed) = v.seed {
        output.push_str(&format!(" │ seed {}", seed.bright_black()));
    }
    output
}

fn format_sampling_round(v: &EventVisitor) -> String {
    format!(
        "  {} Round {:>2} │ {} drawn │ {} valid │ {} new │ {} selected",
        "↻".bright_blue(),
        v.round.unwrap_or(0),
        count(v.samples_drawn).white(),
        count(v.valid_candidates).bright_magenta(),
        count(v.new_splits).bright_magenta(),
        count(v.selected).bright_cyan(),
    )
}

fn format_exhausted(v: &EventVisitor) -> String {
    format!(
        "  {} Round {} found no new splits, stopping early",
        "↻".bright_blue(),
        v.round.unwrap_or(0),
    )
}

fn format_conflict(v: &EventVisitor) -> String {
    format!(
        "{} Constraints cannot be met: {}",
        "✗".bright_red().bold(),
        v.conflict.as_deref().unwrap_or("unknown conflict").bright_red(),
    )
}

fn format_no_result(v: &EventVisitor) -> String {
    format!(
        "{} No valid combination in {} samples; loosen constraints or raise the sample budget",
        "!".yellow().bold(),
        count(v.samples_drawn).yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v
        .best_score
        .map(|s| format!("{s:.3}"))
        .unwrap_or_else(|| "N/A".to_string());
    let score = if v.best_score == Some(0.0) {
        score.bright_green().to_string()
    } else {
        score.white().to_string()
    };

    format!(
        "{} Done │ {} combinations │ best score {} │ {} rounds │ {} samples │ {}",
        "■".bright_cyan().bold(),
        count(v.combinations).bright_yellow(),
        score,
        count(v.rounds).white(),
        count(v.samples_drawn).white(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow(),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

// Number of unlabeled splits of teams*size players into equal teams:
// (teams*size)! / (size!^teams * teams!), as mantissa x 10^exp.
fn partition_space(teams: u64, size: u64) -> String {
    if teams == 0 || size == 0 {
        return "0".to_string();
    }
    let log10_factorial = |n: u64| (2..=n).map(|k| (k as f64).log10()).sum::<f64>();
    let log_scale = log10_factorial(teams * size)
        - teams as f64 * log10_factorial(size)
        - log10_factorial(teams);
    if log_scale < 6.0 {
        return (10f64.powf(log_scale).round() as u64).to_formatted_string(&Locale::en);
    }
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}
