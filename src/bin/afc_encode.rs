use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;

use afc_encoder::logging::{init_logging, Verbosity};
use afc_encoder::settings::LoopSettings;
use afc_encoder::wav::read_wav;
use afc_encoder::{write_afc_file, EncodeFormat, EncodeSettings};

const USAGE: &str = "\
usage: afc-encode <input.wav> <output.afc> [options]

options:
  -f, --format <pcm16|adpcm4>   output encoding (default adpcm4)
  -l, --loop <start> [end]      loop region in samples; end defaults to the input length
  -s, --settings <file.json>    read options from a JSON file, flags override it
  -q, --quiet                   only print warnings and errors
  -v, --verbose                 print debug output
  -h, --help                    show this message";

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: PathBuf,
    output: PathBuf,
    format: Option<EncodeFormat>,
    loop_points: Option<LoopSettings>,
    settings: Option<PathBuf>,
    verbosity: Verbosity,
    help: bool,
}

fn parse_sample_index(value: Option<String>, what: &str) -> anyhow::Result<u32> {
    let value = value.with_context(|| format!("missing {}", what))?;
    value
        .parse()
        .with_context(|| format!("invalid {} '{}'", what, value))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut args = args.into_iter().peekable();
    let mut parsed = Args::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-q" | "--quiet" => parsed.verbosity = Verbosity::Quiet,
            "-v" | "--verbose" => parsed.verbosity = Verbosity::Verbose,
            "-f" | "--format" => {
                let value = args.next().context("missing value for --format")?;
                parsed.format = Some(value.parse()?);
            }
            "-s" | "--settings" => {
                let value = args.next().context("missing value for --settings")?;
                parsed.settings = Some(PathBuf::from(value));
            }
            "-l" | "--loop" => {
                let start = parse_sample_index(args.next(), "loop start")?;
                let end = match args.peek() {
                    Some(next) if !next.starts_with('-') && next.parse::<u32>().is_ok() => {
                        Some(parse_sample_index(args.next(), "loop end")?)
                    }
                    _ => None,
                };
                parsed.loop_points = Some(LoopSettings { start, end });
            }
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown option '{}'", flag),
            _ => positional.push(PathBuf::from(&arg)),
        }
    }

    if parsed.help {
        return Ok(parsed);
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(input), Some(output), None) => {
            parsed.input = input;
            parsed.output = output;
        }
        (_, _, Some(extra)) => bail!("unexpected argument '{}'", extra.display()),
        _ => bail!("expected an input and an output path\n\n{}", USAGE),
    }

    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    init_logging(args.verbosity);

    let mut settings = match &args.settings {
        Some(path) => EncodeSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => EncodeSettings::default(),
    };
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(loop_points) = args.loop_points {
        settings.loop_points = Some(loop_points);
    }

    let source = read_wav(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let source = settings.apply(source);

    info!(
        "encoding {} ({} samples @ {} Hz) as {}",
        args.input.display(),
        source.sample_count(),
        source.sample_rate(),
        source.format()
    );

    let report = write_afc_file(&source, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    match report.plan.loop_start {
        Some(start) => info!(
            "wrote {} bytes to {} ({} samples, loop at {})",
            report.bytes_written,
            args.output.display(),
            report.plan.sample_count,
            start
        ),
        None => info!(
            "wrote {} bytes to {} ({} samples)",
            report.bytes_written,
            args.output.display(),
            report.plan.sample_count
        ),
    }

    Ok(())
}
