//! Headless workforce simulation
//!
//! Hires a team with rolled traits, runs them through a project for a number
//! of days and prints how traits and arcs shaped their output.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use studio_traits::arcs::ArcEvent;
use studio_traits::core::types::{Day, EmployeeId};
use studio_traits::traits::{EmployeeConditionContext, GeneratedTraits, ProjectPhase, Stat};
use studio_traits::{EngineConfig, Result, TraitSystem};

/// Headless workforce simulation
#[derive(Parser, Debug)]
#[command(name = "workforce_sim")]
#[command(about = "Simulate a studio team and report trait and arc effects")]
struct Args {
    /// Number of employees to hire
    #[arg(long, default_value_t = 8)]
    employees: usize,

    /// Days to simulate
    #[arg(long, default_value_t = 60)]
    days: Day,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Directory with traits.toml / arcs.toml / synergies.toml (built-in pack if omitted)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Engine config TOML (defaults if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final arc states as JSON to this file
    #[arg(long)]
    dump_arcs: Option<PathBuf>,

    /// Print every arc transition
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Day-to-day state the simulation keeps per employee
struct Employee {
    id: EmployeeId,
    traits: GeneratedTraits,
    morale: f32,
    stress: f32,
    energy: f32,
    tenure_days: u32,
    crunch_days: u32,
    output: f32,
    arc_days: u32,
    top_stat: Option<(Stat, f32)>,
}

impl Employee {
    fn context(&self, phase: ProjectPhase, progress: f32, team_size: u32) -> EmployeeConditionContext {
        EmployeeConditionContext {
            morale: self.morale,
            stress: self.stress,
            energy: self.energy,
            deadline_remaining: (1.0 - progress).max(0.0),
            project_progress: progress,
            project_phase: phase,
            team_size,
            tenure_days: self.tenure_days,
            crunch_days: self.crunch_days,
            ..Default::default()
        }
    }
}

fn phase_for(progress: f32) -> ProjectPhase {
    match progress {
        p if p < 0.15 => ProjectPhase::Planning,
        p if p < 0.70 => ProjectPhase::Development,
        p if p < 0.90 => ProjectPhase::Crunch,
        p if p < 1.0 => ProjectPhase::Polish,
        _ => ProjectPhase::Release,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::random());
    tracing::info!("Starting workforce simulation (seed {})", seed);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut system = match &args.content {
        Some(dir) => TraitSystem::from_content_dir(dir, config, seed)?,
        None => TraitSystem::with_builtin_content(config, seed)?,
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut team = Vec::with_capacity(args.employees);
    for _ in 0..args.employees {
        team.push(Employee {
            id: EmployeeId::new(),
            traits: system.generate_traits()?,
            morale: rng.gen_range(0.4..0.8),
            stress: rng.gen_range(0.1..0.4),
            energy: 1.0,
            tenure_days: rng.gen_range(0..400),
            crunch_days: 0,
            output: 0.0,
            arc_days: 0,
            top_stat: None,
        });
    }
    let team_size = team.len() as u32;

    for _ in 0..args.days {
        let day = system.advance_day();
        let progress = day as f32 / args.days.max(1) as f32;
        let phase = phase_for(progress);

        for employee in team.iter_mut() {
            if phase == ProjectPhase::Crunch {
                employee.crunch_days += 1;
            } else {
                employee.crunch_days = 0;
            }
            let ctx = employee.context(phase, progress, team_size);

            let events = system.process_daily_arcs(employee.id, employee.traits.major.as_str(), &ctx);
            if args.verbose {
                for event in &events {
                    print_event(day, employee, event);
                }
            }

            let stats = system.evaluate_employee_traits(
                employee.id,
                employee.traits.major.as_str(),
                employee.traits.minors.as_slice(),
                &ctx,
            );
            let stat = |s: Stat| stats.get(&s).copied().unwrap_or(0.0);

            let variance = system.roll_productivity_variance(&stats);
            let fatigue = if employee.energy < 0.3 { 0.7 } else { 1.0 };
            employee.output += (1.0 + stat(Stat::Productivity)).max(0.0) * variance * fatigue;

            let crunch_load = if phase == ProjectPhase::Crunch { 0.04 } else { -0.02 };
            let stress_delta = crunch_load * (1.0 + stat(Stat::StressGain)) - 0.01 * stat(Stat::BurnoutResistance);
            employee.stress = (employee.stress + stress_delta + rng.gen_range(-0.02..0.02)).clamp(0.0, 1.0);
            employee.energy = (employee.energy - employee.stress * 0.05 + 0.03).clamp(0.0, 1.0);
            let morale_delta = 0.01 * stat(Stat::MoraleGain) - 0.01 * stat(Stat::MoraleDecay)
                - (employee.stress - 0.5) * 0.02;
            employee.morale = (employee.morale + morale_delta).clamp(0.0, 1.0);
            employee.tenure_days += 1;
            employee.top_stat = stats
                .iter()
                .map(|(s, v)| (*s, *v))
                .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()));

            if system.arcs().active_arc(employee.id).is_some() {
                employee.arc_days += 1;
            }
        }
    }

    print_summary(&system, &team, args.days);

    if let Some(path) = &args.dump_arcs {
        fs::write(path, system.export_arc_states_json()?)?;
        tracing::info!("Wrote arc states to {}", path.display());
    }

    Ok(())
}

fn print_event(day: Day, employee: &Employee, event: &ArcEvent) {
    let who = &employee.traits.major;
    match event {
        ArcEvent::Started { arc_id } => println!("day {:>3}  {:<18} starts {}", day, who, arc_id),
        ArcEvent::StageAdvanced { arc_id, stage_index } => {
            println!("day {:>3}  {:<18} {} -> stage {}", day, who, arc_id, stage_index)
        }
        ArcEvent::Completed { arc_id } => println!("day {:>3}  {:<18} finished {}", day, who, arc_id),
    }
}

fn print_summary(system: &TraitSystem, team: &[Employee], days: Day) {
    println!();
    println!(
        "{:<18} {:<38} {:>8} {:>7} {:>7} {:>9}  {}",
        "major", "minors", "avg out", "stress", "morale", "arc days", "strongest stat"
    );
    for employee in team {
        let minors: Vec<&str> = employee.traits.minors.iter().map(|m| m.as_str()).collect();
        let top = match employee.top_stat {
            Some((stat, value)) => format!("{} {:+.2}", stat.name(), value),
            None => "-".to_string(),
        };
        println!(
            "{:<18} {:<38} {:>8.3} {:>7.2} {:>7.2} {:>9}  {}",
            employee.traits.major,
            minors.join(", "),
            employee.output / days.max(1) as f32,
            employee.stress,
            employee.morale,
            employee.arc_days,
            top
        );
    }

    println!();
    for arc in system.catalog().arcs() {
        let completions: u32 = team
            .iter()
            .filter_map(|e| system.arcs().history(e.id))
            .filter(|h| h.arc_id == arc.id)
            .map(|h| h.completions)
            .sum();
        println!(
            "{:<24} up to {:>3} days, {} completed",
            arc.name,
            arc.max_length_days(),
            completions
        );
    }
    println!(
        "{} arcs running at day {}, {} employees with arc state",
        system.arcs().active_count(),
        system.current_day(),
        system.arcs().tracked_count()
    );
}
