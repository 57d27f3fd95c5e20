use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, warn};
use winshift::actions::{self, Placement};
use winshift::common::config::{self, Config, config_file};
use winshift::common::log;
use winshift::model::{BarHeight, Direction, Layout};
use winshift::sys::{self, Actual};
use winshift::ui::icons::render_layout_icons;

#[derive(Parser)]
#[command(name = "winshift")]
#[command(about = "Snap the focused X11 window into named screen layouts")]
struct Cli {
    /// Path to the user config file.
    #[arg(long, global = true, env = "WINSHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log output. Repeat for more.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured layouts
    ListLayouts {
        #[arg(long)]
        direction: Option<Direction>,
    },
    /// Move the focused window into a layout
    ChangeLayout {
        layout: String,
        /// Use this screen instead of the one under the window
        #[arg(long)]
        screen_name: Option<String>,
        /// Compute the geometry without moving the window
        #[arg(long)]
        dry_run: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a layout to the user config
    AddLayout {
        name: String,
        /// Four expressions, e.g. "0,0,{width}/2,{height}"
        layout: String,
        #[arg(long)]
        direction: Direction,
    },
    /// List the reserved margins per screen
    ListBarHeights,
    /// Save reserved margins for a screen to the user config
    AddBarHeight {
        screen_name: String,
        #[arg(long, default_value_t = 0)]
        top: i32,
        #[arg(long, default_value_t = 0)]
        bottom: i32,
        #[arg(long, default_value_t = 0)]
        left: i32,
        #[arg(long, default_value_t = 0)]
        right: i32,
        #[arg(long, default_value_t = 0)]
        gap: i32,
    },
    /// List the active screens
    ListScreens {
        /// Print the screens as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a PNG preview of every layout
    RenderIcons {
        #[arg(long, default_value = "icons")]
        output_dir: PathBuf,
    },
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = Config::load(path)?;
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            warn!("config: {issue}");
        }
        let fixes = config.auto_fix_values();
        warn!("applied {fixes} config fixes");
    }
    Ok(config)
}

fn print_placement(placement: &Placement, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(placement)?);
        return Ok(());
    }
    println!("screen: {}", placement.screen);
    println!("layout: {} ({})", placement.layout.name, placement.layout.layout);
    println!("{}: {}", if placement.applied { "moved to" } else { "would move to" }, placement.geometry);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.config.unwrap_or_else(config_file);
    debug!(path = %path.display(), "using config");

    match cli.command {
        Commands::ListLayouts { direction } => {
            print!("{}", actions::layout_listing(&load_config(&path)?, direction));
        }
        Commands::ChangeLayout { layout, screen_name, dry_run, json } => {
            sys::check_dependencies(sys::DEPENDENCIES)?;
            let config = load_config(&path)?;
            let placement =
                actions::change_layout(&Actual, &config, &layout, screen_name.as_deref(), dry_run)?;
            print_placement(&placement, json)?;
        }
        Commands::AddLayout { name, layout, direction } => {
            config::add_layout(&path, Layout::new(&name, layout, direction))
                .with_context(|| format!("adding layout {name}"))?;
            println!("saved {direction} layout {name} to {}", path.display());
        }
        Commands::ListBarHeights => {
            print!("{}", actions::bar_height_listing(&load_config(&path)?));
        }
        Commands::AddBarHeight { screen_name, top, bottom, left, right, gap } => {
            let bar = BarHeight { screen_name, top, bottom, left, right, gap };
            let screen = bar.screen_name.clone();
            config::add_bar_height(&path, bar)
                .with_context(|| format!("adding bar height for {screen}"))?;
            println!("saved bar height for {screen} to {}", path.display());
        }
        Commands::ListScreens { json } => {
            sys::check_dependencies(&["xrandr"])?;
            let screens = sys::screen::list_screens(&Actual)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&screens)?);
            } else {
                print!("{}", actions::screen_listing(&screens));
            }
        }
        Commands::RenderIcons { output_dir } => {
            let written = render_layout_icons(&load_config(&path)?, &output_dir)?;
            println!("rendered {} icons into {}", written.len(), output_dir.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    log::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        eprintln!();
        let _ = Cli::command().write_help(&mut std::io::stderr());
        process::exit(1);
    }
}
