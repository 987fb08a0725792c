use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serpmark::{Config, Mode};

#[derive(Parser)]
#[command(name = "serpmark")]
#[command(about = "Convert generated SEO copy into HTML")]
struct Cli {
    /// Config file (defaults to serpmark.toml in the current directory)
    #[arg(short, long, global = true, default_value = "serpmark.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a section of copy to HTML blocks
    Render {
        /// Input text file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strip inline markup instead of converting it
        #[arg(long)]
        plain: bool,
    },
    /// Render a sources section (headings and numbered references)
    Sources {
        /// Input text file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Insert product links from the config into a markdown file
    Link {
        /// Input markdown file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (input, output, converted) = match cli.command {
        Command::Render {
            input,
            output,
            plain,
        } => {
            let mode = if plain {
                Mode::PlainDocument
            } else {
                config.render.mode
            };
            let text = read_input(&input);
            let html = serpmark::render_with_config(&text, mode, &config);
            (input, output, html)
        }
        Command::Sources { input, output } => {
            let text = read_input(&input);
            let html = serpmark::render_sources_section_with_config(&text, &config);
            (input, output, html)
        }
        Command::Link { input, output } => {
            let text = read_input(&input);
            let insertion = serpmark::insert_product_links(&text, &config.product_links);
            eprintln!("Added {} product links", insertion.added.len());
            (input, output, insertion.content)
        }
    };

    match output {
        Some(output) => {
            if let Err(e) = fs::write(&output, converted) {
                eprintln!("Error writing {}: {}", output.display(), e);
                std::process::exit(1);
            }
            log::info!("converted {} -> {}", input.display(), output.display());
        }
        None => println!("{converted}"),
    }
}

fn read_input(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
