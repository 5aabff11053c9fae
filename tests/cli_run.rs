use clap::Parser;
use millsurf::cli::{run, Cli};
use millsurf::Config;
use tempfile::TempDir;

const PROGRAM: &str = "\
(square pocket)
G21 G90
G0 X0 Y0 Z2
G1 Z-1 F300
X8
Y4
X0
Y0
G0 Z5
M30
";

fn setup() -> (TempDir, String, String) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pocket.nc");
    std::fs::write(&input, PROGRAM).unwrap();
    let config = dir.path().join("config.toml");
    Config::new().save_to_file(&config).unwrap();
    (
        dir,
        input.display().to_string(),
        config.display().to_string(),
    )
}

#[test]
fn test_default_output_is_jpeg_next_to_input() {
    let (dir, input, config) = setup();
    let cli = Cli::try_parse_from(["millsurf", &input, "-c", &config]).unwrap();

    let output = run(&cli).unwrap();

    assert_eq!(output, dir.path().join("pocket.jpg"));
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_png_with_overrides_and_saved_config() {
    let (dir, input, config) = setup();
    let output = dir.path().join("out.png");
    let saved = dir.path().join("effective.json");
    let cli = Cli::try_parse_from([
        "millsurf",
        &input,
        "-c",
        &config,
        "-o",
        &output.display().to_string(),
        "--tool-diameter",
        "2",
        "--grid",
        "--parallel",
        "--save-config",
        &saved.display().to_string(),
    ])
    .unwrap();

    run(&cli).unwrap();

    assert!(output.exists());
    let effective = Config::load_from_file(&saved).unwrap();
    assert_eq!(effective.simulation.tool_diameter_mm, 2.0);
    assert!(effective.output.grid.is_some());
}

#[test]
fn test_bad_program_reports_line() {
    let (dir, _, config) = setup();
    let input = dir.path().join("broken.nc");
    std::fs::write(&input, "G0 Z1\nG1 X1.2.3\n").unwrap();
    let cli = Cli::try_parse_from(["millsurf", &input.display().to_string(), "-c", &config])
        .unwrap();

    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("line 2"));
    assert!(!dir.path().join("broken.jpg").exists());
}

#[test]
fn test_invalid_override_is_rejected() {
    let (_dir, input, config) = setup();
    let cli = Cli::try_parse_from(["millsurf", &input, "-c", &config, "--step", "0"]).unwrap();
    assert!(run(&cli).is_err());
}
