//! webpack-parts CLI
//!
//! Entry point for the `webpack-parts` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use webpack_parts::settings::DEFAULT_SETTINGS_FILE;
use webpack_parts::{Assembler, AssemblyEnv, AssemblyReport, EffectiveSettings, Fragment, Profile};

#[derive(Parser)]
#[command(name = "webpack-parts")]
#[command(about = "Assemble bundler configurations from small parts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Development,
    Production,
    Library,
}

impl Target {
    fn as_str(&self) -> &'static str {
        match self {
            Target::Development => "development",
            Target::Production => "production",
            Target::Library => "library",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print an assembled configuration as JSON
    Print {
        /// Profile to assemble (default: from NODE_ENV)
        #[arg(long, short = 'p', value_enum)]
        profile: Option<Target>,

        /// Path to settings file (default: ./webpack-parts.toml if present)
        #[arg(long, short = 's')]
        settings: Option<PathBuf>,

        /// Override the dev server port
        #[arg(long)]
        port: Option<u16>,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Show where an assembled configuration came from
    Explain {
        /// Profile to assemble (default: from NODE_ENV)
        #[arg(long, short = 'p', value_enum)]
        profile: Option<Target>,

        /// Path to settings file (default: ./webpack-parts.toml if present)
        #[arg(long, short = 's')]
        settings: Option<PathBuf>,
    },

    /// Apply a demo string transform
    Transform {
        #[arg(value_enum)]
        kind: Transform,

        text: String,
    },

    /// Print the demo page lines
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transform {
    HackerCase,
    Hangman,
}

fn main() {
    webpack_parts::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Print {
            profile,
            settings,
            port,
            out,
            compact,
        } => {
            run_print(profile, settings, port, out, compact);
        }
        Commands::Explain { profile, settings } => {
            run_explain(profile, settings);
        }
        Commands::Transform { kind, text } => {
            run_transform(kind, &text);
        }
        Commands::Demo => {
            run_demo();
        }
    }
}

fn run_print(
    profile: Option<Target>,
    settings_path: Option<PathBuf>,
    port: Option<u16>,
    out: Option<PathBuf>,
    compact: bool,
) {
    let cli_overrides = port.map(|port| json!({ "dev_server": { "port": port } }));
    let effective = load_settings(settings_path, cli_overrides);
    let env = AssemblyEnv::from_env();
    let target = profile.unwrap_or_else(|| default_target(&env));

    let config = assemble_or_exit(&effective, env, target);

    let rendered = if compact {
        serde_json::to_string(&config)
    } else {
        config.to_json()
    };
    let rendered = match rendered {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    };

    match out {
        Some(path) => {
            if let Err(e) = fs::write(&path, format!("{}\n", rendered)) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Wrote {} configuration to {}", target.as_str(), path.display());
        }
        None => println!("{}", rendered),
    }
}

fn run_explain(profile: Option<Target>, settings_path: Option<PathBuf>) {
    let effective = load_settings(settings_path, None);
    let env = AssemblyEnv::from_env();
    let target = profile.unwrap_or_else(|| default_target(&env));

    let config = assemble_or_exit(&effective, env, target);

    let report = match AssemblyReport::new(target.as_str(), &config, effective.sources.clone()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error building report: {}", e);
            process::exit(1);
        }
    };

    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_transform(kind: Transform, text: &str) {
    let output = match kind {
        Transform::HackerCase => string_tricks::hacker_case(text),
        Transform::Hangman => string_tricks::hangman(text),
    };
    println!("{}", output);
}

fn run_demo() {
    for line in string_tricks::demo_lines("Hello world") {
        println!("{}", line);
    }
}

fn default_target(env: &AssemblyEnv) -> Target {
    match env.profile() {
        Profile::Development => Target::Development,
        Profile::Production => Target::Production,
    }
}

/// Load settings, picking up the default file from the working directory.
fn load_settings(
    settings_path: Option<PathBuf>,
    cli_overrides: Option<serde_json::Value>,
) -> EffectiveSettings {
    let path = settings_path.or_else(|| {
        let default = PathBuf::from(DEFAULT_SETTINGS_FILE);
        default.exists().then_some(default)
    });

    match EffectiveSettings::build(path.as_deref(), cli_overrides) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    }
}

fn assemble_or_exit(effective: &EffectiveSettings, env: AssemblyEnv, target: Target) -> Fragment {
    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(_) => Path::new(".").to_path_buf(),
    };
    let assembler = Assembler::new(&effective.settings, &root, env);

    let result = match target {
        Target::Development => assembler.assemble(Profile::Development),
        Target::Production => assembler.assemble(Profile::Production),
        Target::Library => assembler.library(),
    };

    match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error assembling {}: {}", target.as_str(), e);
            process::exit(1);
        }
    }
}
