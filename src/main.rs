//! CLI for converting MIDI files to pitch-set sequences and back
//!
//! Usage:
//!   midiseq preprocess <midi_dir> <out_dir> [settings.json] [trace.jsonl]
//!   midiseq render <input.seq> <output.mid> [settings.json]

use midiseq::pipeline::{BatchRunner, PipelineError, PreprocessSettings, Preprocessor, TraceWriter};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const USAGE: &str = "Usage:
  midiseq preprocess <midi_dir> <out_dir> [settings.json] [trace.jsonl]
  midiseq render <input.seq> <output.mid> [settings.json]

Commands:
  preprocess    Convert every MIDI file in <midi_dir> into <out_dir>/<name>.seq
  render        Turn a .seq file back into a playable MIDI file
                (integer offsets only: files written with keep_rhythm
                and fractional offsets are rejected)

Arguments:
  settings.json   Pipeline settings (optional, defaults apply)
  trace.jsonl     Append one JSON line per converted file (optional)

Examples:
  midiseq preprocess midi seqs
  midiseq preprocess midi seqs_transposed transpose_c.json run.jsonl
  midiseq render seqs/song.seq song.mid
";

fn load_settings(path: Option<&String>) -> Result<PreprocessSettings, PipelineError> {
    match path {
        Some(path) => PreprocessSettings::from_json_file(Path::new(path)),
        None => Ok(PreprocessSettings::default()),
    }
}

fn preprocess(args: &[String]) -> Result<(), PipelineError> {
    let settings = load_settings(args.get(2))?;
    let mut runner = BatchRunner::new(Preprocessor::new(settings));

    if let Some(trace_path) = args.get(3) {
        runner = runner.with_trace(TraceWriter::new(PathBuf::from(trace_path)));
    }

    let report = runner.run(Path::new(&args[0]), Path::new(&args[1]))?;

    println!(
        "Preprocessed {} files with {} errors",
        report.total,
        report.failed()
    );
    Ok(())
}

fn render(args: &[String]) -> Result<(), PipelineError> {
    let settings = load_settings(args.get(2))?;
    let preprocessor = Preprocessor::new(settings);

    let text = fs::read_to_string(&args[0])?;
    let bytes = preprocessor.decode_seq_str(&text)?;
    fs::write(&args[1], bytes)?;

    log::info!("Wrote {}", args[1]);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "preprocess" => preprocess(&args[2..]),
        "render" => render(&args[2..]),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
