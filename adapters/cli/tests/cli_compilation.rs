use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "hexgrid"])
        .status()
        .expect("failed to invoke cargo check for hexgrid CLI binary");

    assert!(status.success(), "cargo check --bin hexgrid should succeed");
}

#[test]
fn render_writes_svg_document() {
    let output = Command::new(env!("CARGO_BIN_EXE_hexgrid"))
        .args(["render", "--width", "320", "--height", "240", "--click", "160,120"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run hexgrid render");

    assert!(output.status.success(), "render should exit cleanly");
    let document = String::from_utf8(output.stdout).expect("svg output is utf-8");
    assert!(document.starts_with("<svg"), "stdout should carry the document");
    assert!(document.trim_end().ends_with("</svg>"));
}

#[test]
fn render_reports_invalid_settings() {
    let path = std::env::temp_dir().join(format!("hexgrid-invalid-{}.toml", std::process::id()));
    std::fs::write(&path, "[grid]\nskew = 2.0\n").expect("temp file is writable");

    let output = Command::new(env!("CARGO_BIN_EXE_hexgrid"))
        .arg("render")
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to run hexgrid render");
    let _ = std::fs::remove_file(&path);

    assert!(!output.status.success(), "invalid skew must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skew"), "error should name the setting: {stderr}");
}
