use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn run_rt_bench(root: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rt-bench"))
        .arg("--project-root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("rt-bench command should run")
}

fn write_ppm(path: &Path) {
    let mut bytes = b"P6\n1 1\n255\n".to_vec();
    bytes.extend_from_slice(&[10, 20, 30]);
    fs::write(path, bytes).expect("ppm should write");
}

#[test]
fn convert_discovers_dumps_in_output_dir() {
    let root = tempdir().expect("tempdir should create");
    let output = root.path().join("output");
    fs::create_dir_all(&output).unwrap();
    write_ppm(&output.join("test_1spp_20240101_000000.ppm"));

    let out = run_rt_bench(root.path(), &["convert"]);

    assert!(out.status.success(), "convert should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Converting 1 PPM files..."));
    assert!(stdout.contains("Conversion finished: 1 of 1 succeeded"));
    assert!(output.join("test_1spp_20240101_000000.png").is_file());
}

#[test]
fn convert_with_nothing_to_do_writes_nothing() {
    let root = tempdir().expect("tempdir should create");

    let out = run_rt_bench(root.path(), &["convert"]);

    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No PPM files found"));
    assert!(!root.path().join("output").exists());
}

#[test]
fn convert_reports_missing_and_corrupt_files_without_failing() {
    let root = tempdir().expect("tempdir should create");
    let broken = root.path().join("broken.ppm");
    fs::write(&broken, b"not a pixel dump").unwrap();
    let missing = root.path().join("missing.ppm");

    let out = run_rt_bench(
        root.path(),
        &["convert", broken.to_str().unwrap(), missing.to_str().unwrap()],
    );

    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error converting"));
    assert!(stderr.contains("File not found"));
    assert!(!root.path().join("output").join("broken.png").exists());
}

#[test]
fn unknown_project_root_is_an_error() {
    let root = tempdir().expect("tempdir should create");
    let out = run_rt_bench(&root.path().join("missing"), &["convert"]);
    assert!(!out.status.success());
}

#[cfg(unix)]
#[test]
fn bench_runs_single_level_and_prints_summary() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempdir().expect("tempdir should create");
    let build = root.path().join("build");
    fs::create_dir_all(&build).unwrap();
    let renderer = build.join("raytracer");
    fs::write(
        &renderer,
        "#!/bin/sh\nprintf 'P3\\n1 1\\n255\\n0 0 0\\n' > \"$1\"\n",
    )
    .unwrap();
    fs::set_permissions(&renderer, fs::Permissions::from_mode(0o755)).unwrap();

    let out = run_rt_bench(root.path(), &["bench", "2"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Results summary:"));
    assert!(stdout.contains("Samples | Time (s) | File"));
    let rows: Vec<&str> = stdout
        .lines()
        .filter(|line| line.trim_start().starts_with("2 |"))
        .collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contains("test_2spp_"));

    let dumps = fs::read_dir(root.path().join("output")).unwrap().count();
    assert_eq!(dumps, 1);
}

#[cfg(unix)]
#[test]
fn bench_without_renderer_reports_build_failure_and_exits_normally() {
    let root = tempdir().expect("tempdir should create");

    // CMakeLists.txt が無いので cmake があっても構成段階で失敗する
    let out = run_rt_bench(root.path(), &["bench", "1"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("Results summary:"));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("build the project"));
    assert!(!root.path().join("output").exists());
}
