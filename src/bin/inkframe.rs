use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use inkframe::assets::font::DEFAULT_FONT_PATH;
use inkframe::content::weather::StyleCatalog;
use inkframe::content::{Connectivity, ResolveMode, SystemClock};
use inkframe::net::{
    HttpCalendarProvider, HttpDocumentSource, HttpResourceStore, OpenMeteoProvider, check_internet,
};
use inkframe::sync::{DesignFetcher, DesignOrigin, DocumentSource};
use inkframe::{Canvas, Design, DirResourceStore, PixelFormat, RenderContext, Viewport, render};

#[derive(Parser)]
#[command(name = "inkframe", version, about = "Render e-ink signage designs to panel frames")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a local design file with live data sources.
    Render {
        /// Design document (JSON).
        #[arg(long = "in")]
        input: PathBuf,
        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Mono)]
        format: FormatArg,
        #[arg(long, default_value = "fonts")]
        fonts_dir: PathBuf,
        #[arg(long, default_value = "images")]
        images_dir: PathBuf,
        /// Directory of extra weather style templates.
        #[arg(long)]
        styles_dir: Option<PathBuf>,
        /// Default font file used when a module names no font.
        #[arg(long)]
        default_font: Option<PathBuf>,
        /// Render the document's full surface instead of the 7.5" panel
        /// window.
        #[arg(long)]
        full_surface: bool,
        /// Skip all network fetches and render baked module content only.
        #[arg(long)]
        offline: bool,
    },
    /// Fetch the active design from a signage server and render it the way an
    /// edge panel would, offline fallbacks included.
    Sync {
        /// Base URL of the signage server.
        #[arg(long)]
        base_url: String,
        /// Fetch a specific design by name instead of the active one.
        #[arg(long)]
        design: Option<String>,
        /// Cached copy of the last fetched design.
        #[arg(long, default_value = "design-cache.json")]
        cache: PathBuf,
        /// Directory for cached fonts and images.
        #[arg(long)]
        resource_cache: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Mono)]
        format: FormatArg,
        #[arg(long)]
        default_font: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Mono,
    Rgb,
}

impl From<FormatArg> for PixelFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Mono => PixelFormat::Mono,
            FormatArg::Rgb => PixelFormat::Rgb,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkframe=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            input,
            out,
            format,
            fonts_dir,
            images_dir,
            styles_dir,
            default_font,
            full_surface,
            offline,
        } => {
            let design = Design::from_path(&input)
                .with_context(|| format!("loading design '{}'", input.display()))?;
            let viewport = if full_surface {
                Viewport::new(design.resolution.0, design.resolution.1)
            } else {
                Viewport::panel_7in5()
            };
            let styles = match styles_dir {
                Some(dir) => StyleCatalog::from_dir(&dir)
                    .with_context(|| format!("loading styles from '{}'", dir.display()))?,
                None => StyleCatalog::default(),
            };
            let resources = DirResourceStore::new(fonts_dir, images_dir);
            let weather = OpenMeteoProvider::new()?;
            let calendar = HttpCalendarProvider::new()?;
            let mode = if offline {
                ResolveMode::Replica(Connectivity::offline())
            } else {
                ResolveMode::Authoritative
            };
            let ctx = RenderContext {
                viewport,
                format: format.into(),
                mode,
                resources: &resources,
                weather: &weather,
                calendar: &calendar,
                styles: &styles,
                clock: &SystemClock,
                default_font_path: Some(
                    default_font.unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH)),
                ),
            };
            let canvas = render(&design, &ctx)?;
            write_frame(&canvas, &out)
        }
        Command::Sync {
            base_url,
            design,
            cache,
            resource_cache,
            out,
            format,
            default_font,
        } => {
            let source = HttpDocumentSource::new(base_url.clone())?;
            let (design, origin) = match design {
                Some(name) => {
                    let design = source
                        .load_by_name(&name)
                        .with_context(|| format!("fetching design '{name}'"))?;
                    (design, DesignOrigin::Live)
                }
                None => {
                    let fetcher = DesignFetcher::new(&source, &cache);
                    fetcher.load().context("fetching design")?
                }
            };

            let connectivity = Connectivity {
                source_reachable: origin == DesignOrigin::Live,
                internet_reachable: check_internet(Duration::from_secs(3)),
            };
            tracing::info!(?origin, ?connectivity, "rendering as edge panel");

            let resources = HttpResourceStore::new(base_url, resource_cache)?;
            let weather = OpenMeteoProvider::new()?;
            let calendar = HttpCalendarProvider::new()?;
            let styles = StyleCatalog::default();
            let ctx = RenderContext {
                viewport: Viewport::panel_7in5(),
                format: format.into(),
                mode: ResolveMode::Replica(connectivity),
                resources: &resources,
                weather: &weather,
                calendar: &calendar,
                styles: &styles,
                clock: &SystemClock,
                default_font_path: Some(
                    default_font.unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH)),
                ),
            };
            let canvas = render(&design, &ctx)?;
            write_frame(&canvas, &out)
        }
    }
}

fn write_frame(canvas: &Canvas, out: &PathBuf) -> anyhow::Result<()> {
    canvas
        .save_png(out)
        .with_context(|| format!("writing frame '{}'", out.display()))?;
    eprintln!("wrote {} ({}x{})", out.display(), canvas.width, canvas.height);
    Ok(())
}
