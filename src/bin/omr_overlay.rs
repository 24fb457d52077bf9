use staff_omr::config::load_config;
use staff_omr::diagnostics::DetectionReport;
use staff_omr::image::io::{save_rgb, write_json_file};
use staff_omr::image::PixelBuffer;
use staff_omr::overlay::render_overlay;
use staff_omr::OmrDetector;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: omr_overlay <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let page = image::open(&config.input_path)
        .map_err(|e| format!("Failed to open {}: {e}", config.input_path.display()))?;
    let rgb = page.to_rgb8();
    let pixels = PixelBuffer::from_dynamic(page).map_err(|e| e.to_string())?;

    let detector = OmrDetector::new(config.params.clone());
    let report = detector
        .recognize_with_diagnostics(pixels)
        .map_err(|e| e.to_string())?;
    print_summary(&report);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.overlay_out {
        save_rgb(&render_overlay(&rgb, &report.result), path)?;
        println!("Overlay written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &DetectionReport) {
    let res = &report.result;
    let trace = &report.trace;
    println!("Detection summary");
    println!(
        "  input: {}x{} channels={}",
        trace.input.width, trace.input.height, trace.input.channels
    );
    if let Some(norm) = &trace.normalize {
        println!(
            "  processing: {}x{} scale=({:.3}, {:.3})",
            norm.width, norm.height, norm.mapping.scale_x, norm.mapping.scale_y
        );
    }
    if let Some(bin) = &trace.binarize {
        println!(
            "  threshold: {:.4} ({:?}) ink={:.3}",
            bin.threshold.value, bin.threshold.source, bin.ink_fraction
        );
    }
    if let Some(staff) = &trace.staff {
        println!(
            "  staff: raw_peaks={} merged={} windows={} accepted={}",
            staff.raw_peaks.len(),
            staff.merged_peaks.len(),
            staff.candidates.len(),
            staff.accepted
        );
    }
    for stage in &trace.notes {
        println!(
            "  notes[staff {}]: kernel={} nms={} rows={}..{} found={} clamped={}",
            stage.staff_index,
            stage.kernel_side,
            stage.nms_half_window,
            stage.region_y0,
            stage.region_y0 + stage.region_height,
            stage.candidates,
            stage.clamped
        );
    }
    for note in &res.detected_notes {
        println!(
            "  {:<4} ({:.1}, {:.1}) conf={:.3}",
            note.name(),
            note.position.x,
            note.position.y,
            note.confidence
        );
    }
    let stages: Vec<String> = trace
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "Timings (ms): {} total={:.3}",
        stages.join(" "),
        trace.timings.total_ms
    );
    println!("  confidence: {:.3}", res.confidence);
}
