use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clean_energy::{aggregate, filter, selection};
use clean_energy::series::Series;
use clean_energy::storage;
use clean_energy::view::{CountryView, WORLD_METRICS};
use clean_energy::{ClickEvent, Context, EnergyType, Metric, PanelRow, SelectionState, render};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cedash",
    version,
    about = "Select, filter & aggregate a clean-energy country/year panel"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time series for one country, picked by name or by a map click payload.
    Country(CountryArgs),
    /// Top producers of one energy type in a region for a year.
    Region(RegionArgs),
    /// Per-region and per-year aggregates over the whole panel.
    World(WorldArgs),
    /// Print the full view model for a selection as JSON.
    Render(RenderArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Energy {
    Hydro,
    Nuclear,
    Renewable,
    Solar,
}

impl From<Energy> for EnergyType {
    fn from(e: Energy) -> Self {
        match e {
            Energy::Hydro => EnergyType::Hydro,
            Energy::Nuclear => EnergyType::Nuclear,
            Energy::Renewable => EnergyType::Renewable,
            Energy::Solar => EnergyType::Solar,
        }
    }
}

#[derive(Args, Debug)]
struct Common {
    /// Panel CSV (Country, Year, Region, pop, hydro_ej, ...).
    #[arg(long)]
    data: PathBuf,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Locale for number formatting (e.g. en, de).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct CountryArgs {
    #[command(flatten)]
    common: Common,
    /// Country name as spelled on the map (ADMIN field).
    #[arg(long, conflicts_with = "click")]
    name: Option<String>,
    /// Map click payload as JSON; `-` reads it from stdin.
    #[arg(long)]
    click: Option<String>,
    /// Energy types to overlay (up to 4), comma separated.
    #[arg(long, value_enum, value_delimiter = ',')]
    mix: Vec<Energy>,
    /// Also print per-metric summary statistics.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct RegionArgs {
    #[command(flatten)]
    common: Common,
    #[arg(long)]
    region: String,
    #[arg(long)]
    year: i32,
    #[arg(long, value_enum, default_value = "hydro")]
    energy: Energy,
}

#[derive(Args, Debug)]
struct WorldArgs {
    #[command(flatten)]
    common: Common,
    /// Year for the per-region totals (default: first year in the data).
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: Common,
    /// Map click payload as JSON; `-` reads it from stdin.
    #[arg(long)]
    click: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long, value_enum)]
    energy: Option<Energy>,
    #[arg(long, value_enum, value_delimiter = ',')]
    mix: Vec<Energy>,
}

/// Map a user-provided locale tag to a num-format Locale and decimal separator.
fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

fn fmt_opt(v: Option<f64>, locale: &str) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let (loc, dec) = map_locale(locale);
            // Up to 4 decimals, trailing zeros trimmed.
            let s = format!("{:.4}", x.abs());
            let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), ""));
            let Ok(int) = int.parse::<u128>() else {
                // too large to group
                return format!("{}", x);
            };
            let frac = frac.trim_end_matches('0');
            let sign = if x < 0.0 && (int != 0 || !frac.is_empty()) { "-" } else { "" };
            if frac.is_empty() {
                format!("{}{}", sign, int.to_formatted_string(loc))
            } else {
                format!("{}{}{}{}", sign, int.to_formatted_string(loc), dec, frac)
            }
        }
        _ => "NA".to_string(),
    }
}

fn read_click(raw: &str) -> Result<String> {
    if raw == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read click payload from stdin")?;
        Ok(s)
    } else {
        Ok(raw.to_string())
    }
}

fn load(common: &Common) -> Result<Context> {
    let rows = storage::load_panel_csv(&common.data)
        .with_context(|| format!("load {}", common.data.display()))?;
    Ok(Context::from_normalized(rows))
}

fn out_format(common: &Common) -> Option<(PathBuf, OutFormat)> {
    let path = common.out.clone()?;
    let fmt = common.format.unwrap_or_else(|| {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => OutFormat::Json,
            _ => OutFormat::Csv,
        }
    });
    Some((path, fmt))
}

/// Write a row table as CSV or JSON, if `--out` was given.
fn save_rows(common: &Common, rows: &[PanelRow]) -> Result<()> {
    if let Some((path, fmt)) = out_format(common) {
        match fmt {
            OutFormat::Csv => storage::save_csv(rows, &path)?,
            OutFormat::Json => storage::save_json(rows, &path)?,
        }
        eprintln!("Saved {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}

/// Write an aggregate as JSON, if `--out` was given.
fn save_value<T: Serialize>(common: &Common, value: &T) -> Result<()> {
    if let Some((path, fmt)) = out_format(common) {
        if let OutFormat::Csv = fmt {
            bail!(
                "csv export only supports row tables; write {} as .json or pass --format json",
                path.display()
            );
        }
        storage::save_json(value, &path)?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_series(s: &Series, locale: &str) {
    let points: Vec<String> = s
        .points
        .iter()
        .map(|p| format!("{}={}", p.x, fmt_opt(p.y, locale)))
        .collect();
    println!("{}: {}", s.name, points.join(" "));
    if let Some(l) = s.latest {
        println!("  latest: {} = {}", l.x, fmt_opt(l.y, locale));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Country(args) => cmd_country(args),
        Command::Region(args) => cmd_region(args),
        Command::World(args) => cmd_world(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_country(args: CountryArgs) -> Result<()> {
    let ctx = load(&args.common)?;
    let click = match (&args.name, &args.click) {
        (Some(name), _) => Some(ClickEvent::clicked(name)),
        (None, Some(raw)) => selection::parse_event(&read_click(raw)?),
        (None, None) => None,
    };
    let state = SelectionState {
        click,
        mix: args.mix.iter().copied().map(EnergyType::from).collect(),
        ..Default::default()
    };
    let view = render(&ctx, &state);
    println!("{}", view.country.message());

    if let CountryView::Data {
        country,
        population,
        energy_mix,
    } = &view.country
    {
        let loc = args.common.locale.as_str();
        print_series(population, loc);
        for s in energy_mix {
            print_series(s, loc);
        }
        let rows = filter::by_country(ctx.rows(), country);
        if args.stats {
            for m in Metric::ALL {
                for s in aggregate::summary_by_country(&rows, m) {
                    println!(
                        "{}  count={} missing={}  min={} max={} mean={} median={}",
                        m,
                        s.count,
                        s.missing,
                        fmt_opt(s.min, loc),
                        fmt_opt(s.max, loc),
                        fmt_opt(s.mean, loc),
                        fmt_opt(s.median, loc)
                    );
                }
            }
        }
        save_rows(&args.common, &rows)?;
    }
    Ok(())
}

fn cmd_region(args: RegionArgs) -> Result<()> {
    let ctx = load(&args.common)?;
    let state = SelectionState {
        region: Some(args.region),
        year: Some(args.year),
        energy: Some(args.energy.into()),
        ..Default::default()
    };
    let Some(region) = render(&ctx, &state).region else {
        bail!("dataset has no regions");
    };
    println!("{}", region.title);
    if region.top.is_empty() {
        println!("No data for {} in {}", region.region, region.year);
    }
    for (rank, (country, value)) in region.chart.points.iter().enumerate() {
        println!(
            "{:>2}. {}  {}",
            rank + 1,
            country,
            fmt_opt(*value, &args.common.locale)
        );
    }
    save_rows(&args.common, &region.top)
}

fn cmd_world(args: WorldArgs) -> Result<()> {
    let ctx = load(&args.common)?;
    let state = SelectionState {
        year: args.year,
        ..Default::default()
    };
    let world = render(&ctx, &state).world;
    let loc = args.common.locale.as_str();

    println!("Average population per region");
    for m in &world.population_means {
        println!("  {}  {}", m.region, fmt_opt(m.mean, loc));
    }
    let header: Vec<&str> = WORLD_METRICS.iter().map(|m| m.column()).collect();
    println!("Clean energy production by region  [{}]", header.join(", "));
    for g in &world.region_totals {
        let vals: Vec<String> = g.totals.iter().map(|(_, v)| fmt_opt(Some(*v), loc)).collect();
        println!("  {}  {}", g.key, vals.join("  "));
    }
    println!("Clean energy production over time  [{}]", header.join(", "));
    for g in &world.yearly_totals {
        let vals: Vec<String> = g.totals.iter().map(|(_, v)| fmt_opt(Some(*v), loc)).collect();
        println!("  {}  {}", g.key, vals.join("  "));
    }
    save_value(&args.common, &world)
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let ctx = load(&args.common)?;
    let click = match &args.click {
        Some(raw) => selection::parse_event(&read_click(raw)?),
        None => None,
    };
    let state = SelectionState {
        click,
        region: args.region.clone(),
        year: args.year,
        energy: args.energy.map(EnergyType::from),
        mix: args.mix.iter().copied().map(EnergyType::from).collect(),
    };
    let view = render(&ctx, &state);
    if args.common.out.is_some() {
        save_value(&args.common, &view)
    } else {
        println!("{}", serde_json::to_string_pretty(&view)?);
        Ok(())
    }
}
