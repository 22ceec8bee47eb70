use anyhow::Context;
use chrono::Local;
use kerfcraft::demos::{square_test_cut, test_board};
use kerfcraft::{
    init_logging, validate_board, Config, DxfExporter, KicadExporter, SvgExporter, VERSION,
};
use std::path::PathBuf;
use tracing::{info, warn};

fn load_config() -> anyhow::Result<Config> {
    match Config::default_path() {
        Ok(path) => Config::load_or_default(&path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        Err(e) => {
            warn!("{}; using default configuration", e);
            Ok(Config::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("KerfCraft {}", VERSION);

    let config = load_config()?;
    let out_dir = &config.output.directory;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let timestamp = Local::now()
        .format(&config.output.timestamp_format)
        .to_string();
    let output = |suffix: &str| -> PathBuf { out_dir.join(format!("{}_{}", timestamp, suffix)) };

    let square = square_test_cut(&config).context("Failed to build the square test cut")?;
    SvgExporter::write_file(&square, &config.svg_options(), output("square.svg"))?;
    DxfExporter::write_pattern(&square, &config.dxf_options(), output("square.dxf"))?;

    let board = test_board(&config).context("Failed to build the test board")?;
    let report = validate_board(&board);
    if !report.is_clean() {
        warn!("Test board has {} validation findings", report.findings.len());
    }
    KicadExporter::write_file(&board, &config.kicad_options(), output("test_pcb.kicad_pcb"))?;
    DxfExporter::write_pcb(
        &board,
        &config.pcb_dxf_options(),
        output("test_pcb.cut.dxf"),
        output("test_pcb.etch.dxf"),
    )?;

    info!("Wrote outputs with prefix {} to {}", timestamp, out_dir.display());
    Ok(())
}
