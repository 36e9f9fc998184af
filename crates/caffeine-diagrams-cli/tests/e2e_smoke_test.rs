use std::{fs, process::Command};

use tempfile::tempdir;

use caffeine_diagrams_cli::{Args, MANIFEST_FILE, run_with_output};

const FILES: [&str; 4] = [
    "caffeine_architecture.png",
    "caffeine_deployment.png",
    "caffeine_ml_pipeline.png",
    "caffeine_data_flow.png",
];

fn args_for(dir: &std::path::Path) -> Args {
    Args {
        output_dir: Some(dir.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        ..Default::default()
    }
}

#[test]
fn e2e_writes_four_images_and_reports_them() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("nested").join("diagrams");

    let mut console: Vec<u8> = Vec::new();
    run_with_output(&args_for(&out_dir), &mut console).expect("Run should succeed");

    let mut written: Vec<_> = fs::read_dir(&out_dir)
        .expect("Output directory should exist")
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    written.sort();
    let mut expected: Vec<_> = FILES.iter().map(|f| f.to_string()).collect();
    expected.sort();
    assert_eq!(written, expected);

    for file in FILES {
        let bytes = fs::read(out_dir.join(file)).unwrap();
        assert_eq!(&bytes[1..4], b"PNG", "{file} should be a PNG image");
    }

    let console = String::from_utf8(console).unwrap();
    let mut lines: Vec<String> = FILES
        .iter()
        .map(|file| format!("✅ Generated: {}", out_dir.join(file).display()))
        .collect();
    lines.push(String::new());
    lines.push("🎉 All diagrams generated successfully!".to_string());
    lines.push(format!("📁 Output directory: {}", out_dir.display()));
    assert_eq!(console.lines().collect::<Vec<_>>(), lines);
}

#[test]
fn e2e_reuses_existing_directory() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args_for(temp_dir.path());

    run_with_output(&args, &mut Vec::<u8>::new()).expect("First run should succeed");
    run_with_output(&args, &mut Vec::<u8>::new()).expect("Second run should succeed");

    for file in FILES {
        assert!(temp_dir.path().join(file).is_file());
    }
}

#[test]
fn e2e_svg_format_and_manifest() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        formats: vec!["svg".parse().unwrap()],
        manifest: true,
        ..args_for(temp_dir.path())
    };

    run_with_output(&args, &mut Vec::<u8>::new()).expect("Run should succeed");

    let svg = fs::read_to_string(temp_dir.path().join("caffeine_data_flow.svg")).unwrap();
    assert!(svg.contains("Caffeine Data Flow"));

    let manifest = fs::read_to_string(temp_dir.path().join(MANIFEST_FILE)).unwrap();
    assert!(manifest.contains("\"data_flow\""));
    assert!(manifest.contains("caffeine_data_flow.svg"));
}

#[test]
fn e2e_unwritable_directory_fails_without_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let blocker = temp_dir.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let mut console: Vec<u8> = Vec::new();
    let result = run_with_output(&args_for(&blocker.join("diagrams")), &mut console);
    assert!(result.is_err());
    assert!(console.is_empty());
}

#[test]
fn e2e_failure_is_reported_with_logging_off() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let blocker = temp_dir.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_caffeine-diagrams"))
        .arg("--log-level")
        .arg("off")
        .arg("--output-dir")
        .arg(blocker.join("diagrams"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Binary should start");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("caffeine::"), "stderr was: {stderr}");
}
