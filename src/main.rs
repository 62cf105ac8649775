mod error;
mod input;
mod linebreak;
mod parser;
mod segment;
mod serialiser;
mod timestamp;

use crate::segment::{Format, RenderOpts, WrapConfig};

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(about = "Write transcribed speech segments as WebVTT or SRT subtitles")]
struct Cli {
    #[arg(
        required = true,
        value_name = "FILE",
        help = "Segment files to convert: transcription JSON, SRT or WebVTT. Use '-' (at most once) to read standard input and write to standard output."
    )]
    input: Vec<String>,
    #[arg(
        long,
        value_enum,
        default_value_t = Format::Vtt,
        help = "The subtitle format to output."
    )]
    format: Format,
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Directory to save the outputs."
    )]
    output_dir: PathBuf,
    #[arg(
        long,
        value_name = "N",
        default_value_t = 0,
        help = "Break lines into a bottom-heavy pyramid shape if a line exceeds N characters. 0 disables line breaking."
    )]
    break_lines: usize,
    #[arg(long, help = "Print debug messages.")]
    verbose: bool,
}

impl Cli {
    fn render_opts(&self) -> RenderOpts {
        RenderOpts {
            format: self.format,
            wrap: WrapConfig::new(self.break_lines),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "subwrap=debug" } else { "subwrap=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if !cli.output_dir.is_dir() {
        bail!("output_dir {} is not a directory", cli.output_dir.display());
    }

    check_inputs(&cli.input)?;

    let opts = cli.render_opts();
    for input in &cli.input {
        convert(input, &cli.output_dir, opts)?;
    }

    Ok(())
}

/// Standard input can only be read once.
fn check_inputs(inputs: &[String]) -> Result<()> {
    if inputs.iter().filter(|input| *input == "-").count() > 1 {
        bail!("'-' (standard input) can only be given once");
    }
    Ok(())
}

fn convert(input: &str, output_dir: &Path, opts: RenderOpts) -> Result<()> {
    let data = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .context(format!("Failed to open input file: '{}'", input))?
    };

    let segments = input::load_segments(&data)
        .context(format!("Failed to load segments from '{}'", input))?;
    info!(
        input,
        segments = segments.len(),
        "Generating subtitles..."
    );

    if input == "-" {
        serialiser::serialise(&segments, opts, io::stdout().lock())
            .context("Failed to write to standard output.")?;
        return Ok(());
    }

    let path = output_path(Path::new(input), output_dir, opts.format)?;
    let dst = std::fs::File::create(&path)
        .context(format!("Failed to create file: '{}'", path.display()))?;
    serialiser::serialise(&segments, opts, dst)
        .context(format!("Failed to write to output file: '{}'", path.display()))?;

    let shown = path.canonicalize().unwrap_or_else(|_| path.clone());
    info!("Saved {} to {}", opts.format.name(), shown.display());
    Ok(())
}

/// `dir/name.json` becomes `<output_dir>/name.<ext>`.
fn output_path(input: &Path, output_dir: &Path, format: Format) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .context(format!("Input has no file name: '{}'", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(format.extension());
    Ok(output_dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_named_after_input_stem() {
        let path = output_path(Path::new("audio/talk.v2.json"), Path::new("out"), Format::Srt).unwrap();
        assert_eq!(path, Path::new("out").join("talk.v2.srt"));

        let path = output_path(Path::new("talk"), Path::new("."), Format::Vtt).unwrap();
        assert_eq!(path, Path::new(".").join("talk.vtt"));
    }

    #[test]
    fn output_needs_a_file_name() {
        assert!(output_path(Path::new(".."), Path::new("out"), Format::Vtt).is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["subwrap", "talk.json"]).unwrap();
        assert_eq!(cli.input, vec!["talk.json"]);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert!(!cli.verbose);
        assert_eq!(
            cli.render_opts(),
            RenderOpts {
                format: Format::Vtt,
                wrap: WrapConfig::disabled(),
            }
        );
    }

    #[test]
    fn cli_options() {
        let cli = Cli::try_parse_from([
            "subwrap",
            "--format",
            "srt",
            "-o",
            "subs",
            "--break-lines",
            "42",
            "a.json",
            "b.srt",
        ])
        .unwrap();
        assert_eq!(cli.input, vec!["a.json", "b.srt"]);
        assert_eq!(cli.output_dir, PathBuf::from("subs"));
        assert_eq!(
            cli.render_opts(),
            RenderOpts {
                format: Format::Srt,
                wrap: WrapConfig::new(42),
            }
        );
    }

    #[test]
    fn cli_needs_input() {
        assert!(Cli::try_parse_from(["subwrap"]).is_err());
        assert!(Cli::try_parse_from(["subwrap", "--format", "ass", "a.json"]).is_err());
    }

    #[test]
    fn stdin_only_once() {
        let inputs = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(check_inputs(&inputs(&["-", "a.json"])).is_ok());
        assert!(check_inputs(&inputs(&["a.json", "b.srt"])).is_ok());
        assert!(check_inputs(&inputs(&["-", "a.json", "-"])).is_err());
    }

    #[test]
    fn converts_file_into_output_dir() {
        let dir = std::env::temp_dir().join(format!("subwrap-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("talk.json");
        std::fs::write(
            &input,
            r#"{"segments": [{"start": 0.0, "end": 1.2, "text": " Hello world"}, {"start": 1.2, "end": 2.5, "text": " Goodbye"}]}"#,
        )
        .unwrap();

        let opts = RenderOpts {
            format: Format::Srt,
            wrap: WrapConfig::disabled(),
        };
        convert(input.to_str().unwrap(), &dir, opts).unwrap();

        let written = std::fs::read_to_string(dir.join("talk.srt")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(
            written,
            "1\n00:00:00,000 --> 00:00:01,200\nHello world\n\n\
             2\n00:00:01,200 --> 00:00:02,500\nGoodbye\n\n"
        );
    }
}
