// SPDX-License-Identifier: GPL-3.0-only

//! Extra-keys layout inspector
//!
//! Loads the user's extra-keys settings (or a layout given on the command
//! line), prints the resulting button matrix with its display labels, and
//! optionally resolves a macro into the key events it would dispatch.
//!
//! ```bash
//! extrakeys --layout "[['ESC', 'CTRL', {key: '-', popup: '|'}, 'UP']]" --style arrows-all
//! extrakeys --macro "CTRL ALT DEL"
//! ```

use clap::Parser;
use extrakeys::Settings;
use extrakeys::input::{DispatchAction, resolve_macro};
use extrakeys::layout::{ConfigError, DisplayMap, LoadedLayout, load_layout};
use std::process::ExitCode;

/// Inspect an extra-keys layout.
#[derive(Debug, Parser)]
#[command(
    name = "extrakeys",
    version,
    about = "Print an extra-keys layout and resolve macros"
)]
struct Args {
    #[arg(
        long,
        value_name = "PATH",
        help = "Settings file (default: $EXTRAKEYS_CONFIG or ~/.config/extrakeys/config.toml)"
    )]
    config: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Layout text, overriding the settings")]
    layout: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Display style: default, arrows-only, arrows-all, all, none"
    )]
    style: Option<String>,

    #[arg(
        long = "macro",
        value_name = "TOKENS",
        help = "Resolve a macro and print its dispatch events"
    )]
    macro_keys: Option<String>,

    #[arg(long, help = "Print the effective settings as TOML")]
    dump_config: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "extrakeys=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ConfigError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load(),
    };
    if let Some(layout) = args.layout {
        settings.extra_keys = layout;
    }
    if let Some(style) = args.style {
        settings.extra_keys_style = style;
    }

    if args.dump_config {
        match toml::to_string_pretty(&settings) {
            Ok(text) => print!("{}", text),
            Err(e) => tracing::warn!("Failed to serialize settings: {}", e),
        }
        return Ok(());
    }

    let (_, mut diagnostics) = settings.special_buttons();
    let loaded = load_layout(
        &settings.extra_keys,
        &settings.extra_keys_style,
        DisplayMap::aliases(),
    )?;

    print_layout(&loaded);
    diagnostics.extend(loaded.diagnostics);
    for diagnostic in &diagnostics {
        println!("warning: {}", diagnostic);
    }

    if let Some(macro_keys) = &args.macro_keys {
        print_macro(macro_keys);
    }
    Ok(())
}

fn print_layout(loaded: &LoadedLayout) {
    let matrix = &loaded.matrix;
    println!(
        "{} row(s), {} column(s), style {}{}",
        matrix.row_count(),
        matrix.column_count(),
        loaded.style,
        if loaded.used_fallback {
            " (default layout)"
        } else {
            ""
        }
    );

    for (index, row) in matrix.rows().iter().enumerate() {
        let labels: Vec<String> = row
            .iter()
            .map(|spec| match spec.popup() {
                Some(popup) => format!("{}^{}", spec.display(), popup.display()),
                None => spec.display().to_string(),
            })
            .collect();
        println!("  {}: {}", index, labels.join(" | "));
    }
}

fn print_macro(macro_keys: &str) {
    let events = resolve_macro(macro_keys.split_whitespace());
    if events.is_empty() {
        println!("macro {:?}: no events", macro_keys);
        return;
    }

    println!("macro {:?}:", macro_keys);
    for event in &events {
        let action = match event.action() {
            DispatchAction::Soft(action) => format!("soft {:?}", action),
            DispatchAction::Key(code) => format!("key {}", code),
            DispatchAction::CodePoints(points) => {
                format!("text {:?}", points.iter().collect::<String>())
            }
        };
        let m = event.modifiers;
        println!(
            "  {:<12} ctrl={} alt={} shift={} fn={}",
            action, m.ctrl, m.alt, m.shift, m.fn_key
        );
    }
}
