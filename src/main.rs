use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use playkit::designer::serialization;
use playkit::{
    init_logging, Config, DesignerState, DirectorySink, EventBus, ExportFormat, Exporter,
    FormationLibrary, FormationSource, ManualClock, PlaybackEngine, Side, SvgRenderer, Theme,
};
use playkit::designer::svg_renderer::RenderOptions;

#[derive(Debug, Parser)]
#[command(name = "playkit", version, about = "Football play diagram designer")]
struct Cli {
    /// Configuration file (JSON or TOML). Defaults to the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the built-in formations
    Formations {
        #[arg(long, value_enum)]
        side: Option<SideArg>,
    },
    /// Create a new play file
    New {
        /// Play name
        #[arg(long)]
        name: String,
        /// Offensive formation id
        #[arg(long)]
        offense: Option<String>,
        /// Defensive formation id
        #[arg(long)]
        defense: Option<String>,
        /// Output file. Defaults to `<slug>.json` in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a play file as JSON, SVG or PNG
    Export {
        /// Play file
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = FormatArg::Svg)]
        format: FormatArg,
        /// Output directory. Defaults to the configured export directory.
        #[arg(long = "out")]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Play a diagram back and write one SVG frame per step
    Animate {
        /// Play file
        input: PathBuf,
        /// Playback speed multiplier
        #[arg(long)]
        speed: Option<f64>,
        /// Output directory. Defaults to the configured export directory.
        #[arg(long = "out")]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Check that a play file loads cleanly
    Validate {
        /// Play file
        input: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct ViewArgs {
    /// Mirror the field vertically
    #[arg(long)]
    flipped: bool,
    /// Leave defensive players out
    #[arg(long)]
    hide_defense: bool,
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Offense,
    Defense,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Offense => Side::Offense,
            SideArg::Defense => Side::Defense,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Svg,
    Png,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Svg => ExportFormat::Svg,
            FormatArg::Png => ExportFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Field,
    Whiteboard,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Field => Theme::Field,
            ThemeArg::Whiteboard => Theme::Whiteboard,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;
    tracing::debug!("playkit {} (built {})", playkit::VERSION, playkit::BUILD_DATE);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Formations { side } => list_formations(side.map(Side::from)),
        Command::New {
            name,
            offense,
            defense,
            output,
        } => new_play(&config, &name, offense.as_deref(), defense.as_deref(), output),
        Command::Export {
            input,
            format,
            out_dir,
            view,
        } => export_play(&config, &input, format.into(), out_dir, &view),
        Command::Animate {
            input,
            speed,
            out_dir,
            view,
        } => animate_play(&config, &input, speed, out_dir, &view),
        Command::Validate { input } => validate_play(&input),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::load_or_default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn list_formations(side: Option<Side>) -> anyhow::Result<()> {
    let library = FormationLibrary::new();
    let sides = match side {
        Some(side) => vec![side],
        None => vec![Side::Offense, Side::Defense],
    };
    for side in sides {
        println!("{}:", side);
        for formation in library.formations(side) {
            println!("  {:<12} {}", formation.id, formation.name);
        }
    }
    Ok(())
}

fn new_play(
    config: &Config,
    name: &str,
    offense: Option<&str>,
    defense: Option<&str>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let library = FormationLibrary::new();
    let mut state = DesignerState::new().with_settings(&config.designer);
    state.set_name(name);
    if let Some(id) = offense {
        state.load_formation_from(&library, Side::Offense, id)?;
    }
    if let Some(id) = defense {
        state.load_formation_from(&library, Side::Defense, id)?;
    }

    let path = output.unwrap_or_else(|| ExportFormat::Json.file_name(state.diagram()).into());
    state.save_to_file(&path)?;
    println!("{}", path.display());
    Ok(())
}

fn export_play(
    config: &Config,
    input: &Path,
    format: ExportFormat,
    out_dir: Option<PathBuf>,
    view: &ViewArgs,
) -> anyhow::Result<()> {
    let diagram = serialization::load_from_file(input)?;
    let renderer = SvgRenderer::new(Default::default(), render_options(config, view));
    let exporter = Exporter::new(renderer)
        .with_png_size(config.export.png_width, config.export.png_height);

    let dir = out_dir.unwrap_or_else(|| config.export.output_directory.clone());
    let mut sink = DirectorySink::new(dir);
    if !exporter.export_to_sink(&diagram, format, &mut sink, &EventBus::new()) {
        bail!("{} export of {} failed", format, input.display());
    }
    for path in sink.delivered() {
        println!("{}", path.display());
    }
    Ok(())
}

fn animate_play(
    config: &Config,
    input: &Path,
    speed: Option<f64>,
    out_dir: Option<PathBuf>,
    view: &ViewArgs,
) -> anyhow::Result<()> {
    let diagram = serialization::load_from_file(input)?;
    let slug = playkit::designer::slugify(&diagram.name);
    let options = render_options(config, view);
    let renderer = SvgRenderer::new(Default::default(), options);

    let clock = ManualClock::new();
    let mut engine = PlaybackEngine::new(diagram, clock.clone()).with_settings(&config.playback);
    if let Some(speed) = speed {
        engine.set_speed(speed);
    }
    if !options.show_defense {
        engine.toggle_defense();
    }

    let dir = out_dir.unwrap_or_else(|| config.export.output_directory.clone());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let write_frame = |engine: &PlaybackEngine<ManualClock>| -> anyhow::Result<()> {
        let path = dir.join(format!("{}-step-{}.svg", slug, engine.current_step()));
        std::fs::write(&path, renderer.render_frame(&engine.frame()))
            .with_context(|| format!("Failed to write frame: {}", path.display()))?;
        println!("{}", path.display());
        Ok(())
    };

    write_frame(&engine)?;
    engine.handle_play_pause();
    while let Some(due) = engine.next_wake_at() {
        clock.set(due);
        if engine.poll() > 0 {
            write_frame(&engine)?;
        }
    }
    tracing::info!(
        "Animated {} steps at {}x",
        engine.total_steps(),
        engine.speed()
    );
    Ok(())
}

fn validate_play(input: &Path) -> anyhow::Result<()> {
    let diagram = serialization::load_from_file(input)?;
    println!(
        "{}: ok ({} offense, {} defense, {} steps)",
        diagram.name,
        diagram.players.offense.len(),
        diagram.players.defense.len(),
        diagram.total_steps()
    );
    Ok(())
}

fn render_options(config: &Config, view: &ViewArgs) -> RenderOptions {
    RenderOptions {
        flipped: view.flipped || config.ui.flipped,
        show_defense: !view.hide_defense && config.ui.show_defense,
        theme: view.theme.map(Theme::from).unwrap_or(config.ui.theme),
    }
}
