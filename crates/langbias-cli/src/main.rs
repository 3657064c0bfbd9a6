use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use langbias::content;
use langbias::platform::cli::viewport::ManualIntersectionSource;
use langbias::scene::html;
use langbias::style::STYLESHEET;
use langbias::view::PAGE_TITLE;
use langbias::{Action, IntersectionSource, Page, PageConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "langbias")]
#[command(about = "Render, check and simulate the language-bias page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Page config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pre-render the page with every region revealed
    Render {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Render with the reference list open
        #[arg(long)]
        show_references: bool,
    },

    /// Check the built-in content for integrity issues
    Check,

    /// Drive the page with a manual viewport and print its state
    Simulate {
        /// Report a visible fraction for a region, e.g. `sources=0.5`
        #[arg(long = "intersect", value_name = "REGION=FRACTION", value_parser = parse_intersection)]
        intersections: Vec<Intersection>,

        /// Press the reference list button this many times
        #[arg(long, default_value = "0")]
        toggle: u32,

        /// Detach a region before any intersection is reported
        #[arg(long = "detach", value_name = "REGION")]
        detached: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
struct Intersection {
    region: String,
    fraction: f64,
}

fn parse_intersection(raw: &str) -> Result<Intersection, String> {
    let (region, fraction) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected REGION=FRACTION, got `{raw}`"))?;
    let region = region.trim();
    if region.is_empty() {
        return Err("empty region name".to_string());
    }
    let fraction: f64 = fraction
        .trim()
        .parse()
        .map_err(|_| format!("invalid fraction `{fraction}`"))?;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(format!("fraction {fraction} is outside 0..=1"));
    }
    Ok(Intersection {
        region: region.to_string(),
        fraction,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            format,
            out,
            show_references,
        } => {
            let output = render(config, format, show_references)?;
            match out {
                Some(path) => {
                    fs::write(&path, output)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    log::info!("wrote {}", path.display());
                }
                None => print!("{output}"),
            }
        }

        Commands::Check => check()?,

        Commands::Simulate {
            intersections,
            toggle,
            detached,
        } => {
            print!("{}", simulate(config, &intersections, toggle, &detached)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    match path {
        Some(path) => Ok(PageConfig::load(path)?),
        None => Ok(PageConfig::default()),
    }
}

/// Static render, as if the whole page had been scrolled through.
fn render(config: PageConfig, format: Format, show_references: bool) -> Result<String> {
    let page = Page::new(config);
    let viewport = Rc::new(ManualIntersectionSource::new());
    let source: Rc<dyn IntersectionSource> = viewport.clone();
    let _attachment = page.attach(Some(source));
    let revealed = viewport.emit_all(1.0);
    log::debug!("revealed {revealed} regions");
    if show_references {
        page.dispatch(Action::ToggleReferences);
    }

    let tree = page.render();
    let output = match format {
        Format::Html => html::document(PAGE_TITLE, STYLESHEET, &tree)
            .context("failed to render the HTML document")?,
        Format::Json => {
            let mut json =
                serde_json::to_string_pretty(&tree).context("failed to serialize the page tree")?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn check() -> Result<()> {
    match content::validate() {
        Ok(()) => {
            let cards: usize = content::card_lists()
                .iter()
                .map(|(_, cards)| cards.len())
                .sum();
            println!("content ok: {cards} cards, {} sources", content::SOURCES.len());
            Ok(())
        }
        Err(error) => {
            for issue in &error.issues {
                eprintln!("  {issue}");
            }
            Err(error.into())
        }
    }
}

fn simulate(
    config: PageConfig,
    intersections: &[Intersection],
    toggles: u32,
    detached: &[String],
) -> Result<String> {
    let page = Page::new(config);
    let viewport = Rc::new(ManualIntersectionSource::new());
    let source: Rc<dyn IntersectionSource> = viewport.clone();
    let mut attachment = page.attach(Some(source));

    for region in detached {
        if page.controller(region).is_none() {
            bail!("unknown region `{region}`");
        }
        attachment.detach_region(region);
    }

    for Intersection { region, fraction } in intersections {
        if page.controller(region).is_none() {
            bail!("unknown region `{region}`");
        }
        if !viewport.emit(region, *fraction) {
            log::info!("region `{region}` is not observed, ignoring fraction {fraction}");
        }
    }

    for _ in 0..toggles {
        page.dispatch(Action::ToggleReferences);
    }

    Ok(report(&page, &viewport))
}

fn report(page: &Page, viewport: &ManualIntersectionSource) -> String {
    let width = page
        .regions()
        .iter()
        .map(|region| region.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for region in page.regions() {
        let region = region.as_str();
        let state = if page.reveal_state(region).is_some_and(|state| state.visible) {
            "visible"
        } else if viewport.is_observed(region) {
            "hidden"
        } else {
            "hidden (detached)"
        };
        out.push_str(&format!("{region:<width$}  {state}\n"));
    }
    let references = if page.references().shown { "shown" } else { "hidden" };
    out.push_str(&format!("references: {references}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn line<'a>(report: &'a str, region: &str) -> &'a str {
        report
            .lines()
            .find(|line| line.split_whitespace().next() == Some(region))
            .unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_simulate_arguments() {
        let cli = Cli::try_parse_from([
            "langbias",
            "simulate",
            "--intersect",
            "video=0.5",
            "--intersect",
            "sources=1",
            "--toggle",
            "3",
            "--detach",
            "glossary",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Simulate {
            intersections,
            toggle,
            detached,
        } = cli.command
        else {
            panic!("expected simulate");
        };
        assert_eq!(intersections.len(), 2);
        assert_eq!(intersections[1].region, "sources");
        assert_eq!(toggle, 3);
        assert_eq!(detached, vec!["glossary".to_string()]);
    }

    #[test]
    fn rejects_bad_intersections() {
        assert!(parse_intersection("video").is_err());
        assert!(parse_intersection("=0.4").is_err());
        assert!(parse_intersection("video=lots").is_err());
        assert!(parse_intersection("video=1.5").is_err());
        assert!(parse_intersection("video=NaN").is_err());
        assert_eq!(
            parse_intersection(" video = 0.25 "),
            Ok(Intersection {
                region: "video".to_string(),
                fraction: 0.25
            })
        );
    }

    #[test]
    fn simulate_applies_threshold_and_toggles() {
        let intersections = [
            parse_intersection("video=0.1").unwrap(),
            parse_intersection("examples=0.2").unwrap(),
            parse_intersection("glossary=1").unwrap(),
        ];
        let report = simulate(
            PageConfig::default(),
            &intersections,
            1,
            &["glossary".to_string()],
        )
        .unwrap();

        assert!(line(&report, "video").ends_with("  hidden"));
        assert!(line(&report, "examples").ends_with("visible"));
        assert!(line(&report, "glossary").ends_with("hidden (detached)"));
        assert!(line(&report, "glossary/0").ends_with("  hidden"));
        assert!(report.ends_with("references: shown\n"));
        assert_eq!(report.lines().count(), 21);
    }

    #[test]
    fn simulate_rejects_unknown_regions() {
        let error = simulate(PageConfig::default(), &[], 0, &["footer".to_string()]).unwrap_err();
        assert_eq!(error.to_string(), "unknown region `footer`");
    }

    #[test]
    fn static_render_reveals_everything() {
        let output = render(PageConfig::default(), Format::Html, false).unwrap();
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(!output.contains("class=\"section reveal\""));
        assert!(output.contains("class=\"section reveal is-visible\""));
        assert!(!output.contains("id=\"reference-list\""));

        let open = render(PageConfig::default(), Format::Html, true).unwrap();
        assert!(open.contains("id=\"reference-list\""));
    }

    #[test]
    fn json_render_is_the_scene_tree() {
        let output = render(PageConfig::default(), Format::Json, true).unwrap();
        let tree: langbias::scene::Node = serde_json::from_str(&output).unwrap();

        let page = Page::new(PageConfig::default());
        let _attachment = page.attach(None);
        page.dispatch(Action::ToggleReferences);
        assert_eq!(tree, page.render());
    }
}
