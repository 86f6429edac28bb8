//! Tern - render Mastodon-flavored HTML to a styled terminal page
#![allow(clippy::uninlined_format_args)]

use std::io::Read;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tern::widget::Size;
use tern::{RenderConfig, Theme};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Render { path, width } => render_html(path.as_deref(), width),
        Command::Themes => {
            for name in Theme::all() {
                println!("{}", Theme::from(*name).slug());
            }
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            println!("tern {}", tern::VERSION);
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Render {
        path: Option<String>,
        width: Option<usize>,
    },
    Themes,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    let mut path = None;
    let mut width = None;
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(Command::Help),
            "-v" | "--version" | "version" => return Ok(Command::Version),
            "themes" => return Ok(Command::Themes),
            "-w" | "--width" => {
                let value = rest
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing value after {arg}"))?;
                width = Some(value.parse().context("--width expects a number")?);
            }
            other if path.is_none() && !other.starts_with('-') => {
                path = Some(other.to_string());
            }
            other => anyhow::bail!("Unknown argument: {other}"),
        }
    }

    Ok(Command::Render { path, width })
}

/// Read HTML from a file (or stdin), translate and print it with ANSI
/// styling.
fn render_html(path: Option<&str>, width: Option<usize>) -> Result<()> {
    let html = match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let config = RenderConfig::load().unwrap_or_default();
    let cols = width.unwrap_or(config.text_width);
    let colors = config.theme.colors();

    let widgets = tern::html::translate(&html)?;
    for widget in &widgets {
        let canvas = widget.render(Size::Flow { cols }, false);
        print!("{}", canvas.to_ansi(&colors));
    }
    Ok(())
}

fn print_help() {
    println!(
        "tern {} - render Mastodon-flavored HTML to a styled terminal page

USAGE:
    tern [FILE] [-w COLS]    render FILE (or stdin) at COLS columns
    tern themes              list available theme slugs
    tern --version           print the version

Reads configuration from the tern/config.toml in the platform config
directory; RUST_LOG controls log verbosity.",
        tern::VERSION
    );
}
