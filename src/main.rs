use staff_omr::{Clef, OcrResult, OmrDetector, OmrParams};
use std::env;
use std::path::PathBuf;

struct CliArgs {
    input: PathBuf,
    clef: Clef,
    threshold: Option<f32>,
    json: bool,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args(env::args().skip(1))?;
    let params = OmrParams {
        clef: args.clef,
        threshold: args.threshold,
        ..Default::default()
    };
    let detector = OmrDetector::new(params);
    let result = detector
        .recognize_path(&args.input)
        .map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        println!("{json}");
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn usage() -> String {
    "Usage: staff-omr <image> [--clef treble|bass] [--threshold T] [--json]".to_string()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut input = None;
    let mut clef = Clef::default();
    let mut threshold = None;
    let mut json = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--clef" => {
                let value = args.next().ok_or_else(usage)?;
                clef = value.parse()?;
            }
            "--threshold" => {
                let value = args.next().ok_or_else(usage)?;
                let t: f32 = value
                    .parse()
                    .map_err(|e| format!("Invalid threshold '{value}': {e}"))?;
                threshold = Some(t);
            }
            "--json" => json = true,
            "-h" | "--help" => return Err(usage()),
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{other}'\n{}", usage()))
            }
            other => input = Some(PathBuf::from(other)),
        }
    }
    Ok(CliArgs {
        input: input.ok_or_else(usage)?,
        clef,
        threshold,
        json,
    })
}

fn print_summary(result: &OcrResult) {
    println!("Recognition summary");
    println!("  staves: {}", result.detected_staffs.len());
    println!("  notes: {}", result.detected_notes.len());
    println!("  confidence: {:.3}", result.confidence);
    for (i, staff) in result.detected_staffs.iter().enumerate() {
        let lines: Vec<String> = staff.lines.iter().map(|y| format!("{y:.1}")).collect();
        println!(
            "  staff {i}: lines=[{}] spacing={:.2}",
            lines.join(", "),
            staff.spacing
        );
    }
    for note in &result.detected_notes {
        println!(
            "  {:<4} x={:.1} y={:.1} conf={:.3} staff={}",
            note.name(),
            note.position.x,
            note.position.y,
            note.confidence,
            note.staff_index
        );
    }
}
