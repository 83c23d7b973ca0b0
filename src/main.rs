use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:8787";

#[derive(Parser, Debug)]
#[command(
    name = "po-translator-rust",
    version,
    about = "Translate gettext PO catalogs with the VARCO MT service"
)]
struct Cli {
    /// PO file to translate (reads stdin when omitted)
    file: Option<String>,

    /// Output path (default: <input>.translated.po)
    #[arg(short = 'o', long = "out")]
    out: Option<String>,

    /// Target language code
    #[arg(short = 'l', long = "lang")]
    lang: Option<String>,

    /// Source language code
    #[arg(short = 'L', long = "source-lang")]
    source_lang: Option<String>,

    /// Translation mode (server or personal)
    #[arg(long = "mode")]
    mode: Option<String>,

    /// VARCO API key for personal mode
    #[arg(short = 'k', long = "key")]
    key: Option<String>,

    /// Game code forwarded to the translation service
    #[arg(short = 'g', long = "game-code")]
    game_code: Option<String>,

    /// Relay base URL
    #[arg(long = "relay-url")]
    relay_url: Option<String>,

    /// Run the relay server on ADDR instead of translating
    #[arg(
        long = "serve",
        value_name = "ADDR",
        num_args = 0..=1,
        default_missing_value = DEFAULT_SERVE_ADDR
    )]
    serve: Option<String>,

    /// Show supported language codes and exit
    #[arg(long = "show-languages")]
    show_languages: bool,

    /// Show catalog statistics and exit
    #[arg(long = "show-stats")]
    show_stats: bool,

    /// Persist the effective settings and exit
    #[arg(long = "save-settings")]
    save_settings: bool,

    /// Delete saved settings and exit
    #[arg(long = "clear-settings")]
    clear_settings: bool,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    po_translator_rust::logging::init(cli.verbose)?;

    let config = po_translator_rust::Config {
        lang: cli.lang,
        source_lang: cli.source_lang,
        mode: cli.mode,
        key: cli.key,
        game_code: cli.game_code,
        relay_url: cli.relay_url,
        show_languages: cli.show_languages,
        show_stats: cli.show_stats,
        save_settings: cli.save_settings,
        clear_settings: cli.clear_settings,
    };

    if let Some(addr) = cli.serve {
        let mut settings = po_translator_rust::settings::load_settings();
        po_translator_rust::apply_overrides(&mut settings, &config)?;
        println!("relay listening on http://{}", addr);
        return po_translator_rust::run_server(settings, addr).await;
    }

    let needs_input = !(cli.show_languages || cli.save_settings || cli.clear_settings);
    let input = if needs_input {
        read_input(cli.file.as_deref())?
    } else {
        None
    };

    let writes_file = !(cli.show_languages
        || cli.show_stats
        || cli.save_settings
        || cli.clear_settings);
    let output = po_translator_rust::run(config, input).await?;

    if !writes_file {
        println!("{}", output);
        return Ok(());
    }

    let out_path = resolve_out_path(cli.out.as_deref(), cli.file.as_deref());
    std::fs::write(&out_path, output)
        .with_context(|| format!("failed to write output file: {}", out_path.display()))?;
    println!("{}", out_path.display());
    Ok(())
}

fn read_input(file: Option<&str>) -> Result<Option<String>> {
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file: {}", path))?;
        return Ok(Some(content));
    }
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

fn resolve_out_path(out: Option<&str>, file: Option<&str>) -> PathBuf {
    if let Some(out) = out {
        return PathBuf::from(out);
    }
    match file {
        Some(file) => {
            let path = Path::new(file);
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("translated");
            path.with_file_name(format!("{}.translated.po", stem))
        }
        None => PathBuf::from("translated.po"),
    }
}
