use crate::config::load_config;
use crate::layout::layout_labels_default;
use crate::request::parse_request;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "endlabel",
    version,
    about = "Overlap-free endpoint label layout for line and slope charts"
)]
pub struct Args {
    /// Layout request (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (theme + layout constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Pretty-print the resulting layout
    #[arg(short = 'p', long = "pretty", default_value_t = false)]
    pub pretty: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let request = parse_request(&input)?;

    let rendered = layout_labels_default(
        &request.series,
        &request.scale,
        &config.theme,
        &config.layout,
        &request.options,
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&rendered)?
    } else {
        serde_json::to_string(&rendered)?
    };
    write_output(&json, args.output.as_deref())?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        None => Err(anyhow::anyhow!(
            "No input given; pass -i <request.json> or -i - for stdin"
        )),
        Some(path) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, json)?;
            Ok(())
        }
    }
}
