//! End-to-end tests against the compiled `docchat` binary, covering the
//! credential-free commands and the missing-credential failure path.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn docchat_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("docchat");
    path
}

/// Minimal valid single-page PDF containing `text`, with a correct xref
/// table so pdf-extract can parse it.
fn minimal_pdf(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let stream = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET\n", text);
    let o4 = out.len();
    out.extend_from_slice(format!("4 0 obj << /Length {} >> stream\n", stream.len()).as_bytes());
    out.extend_from_slice(stream.as_bytes());
    out.extend_from_slice(b"endstream endobj\n");
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in [o1, o2, o3, o4, o5] {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    fs::write(
        root.join("alpha.pdf"),
        minimal_pdf("Hello world. This is page one."),
    )
    .unwrap();
    fs::write(
        root.join("beta.pdf"),
        minimal_pdf("The beta document covers shipping policies."),
    )
    .unwrap();
    fs::write(root.join("corrupt.pdf"), b"this is not a pdf").unwrap();

    let config_path = root.join("docchat.toml");
    fs::write(
        &config_path,
        r#"[chunking]
max_chars = 40
overlap_chars = 0

[retrieval]
top_k = 2
"#,
    )
    .unwrap();

    (tmp, config_path)
}

fn run_docchat(dir: &Path, config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = docchat_binary();
    let output = Command::new(&binary)
        .current_dir(dir)
        .env_remove("GOOGLE_API_KEY")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run docchat binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn extract_prints_document_text() {
    let (tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run_docchat(tmp.path(), &config, &["extract", "alpha.pdf"]);
    assert!(success, "extract failed: {stderr}");
    assert!(stdout.contains("Hello world. This is page one."));
}

#[test]
fn extract_continues_past_a_corrupt_document() {
    let (tmp, config) = setup_test_env();
    let (stdout, stderr, success) =
        run_docchat(tmp.path(), &config, &["extract", "alpha.pdf", "corrupt.pdf"]);
    assert!(success, "extract failed: {stderr}");
    assert!(stdout.contains("Hello world. This is page one."));
    assert!(stderr.contains("corrupt.pdf"));
}

#[test]
fn extract_fails_when_no_document_has_text() {
    let (tmp, config) = setup_test_env();
    let (_, stderr, success) = run_docchat(tmp.path(), &config, &["extract", "corrupt.pdf"]);
    assert!(!success);
    assert!(stderr.contains("no extractable text"));
}

#[test]
fn chunks_respects_the_configured_max_size() {
    let (tmp, config) = setup_test_env();
    let (stdout, stderr, success) =
        run_docchat(tmp.path(), &config, &["chunks", "alpha.pdf", "beta.pdf"]);
    assert!(success, "chunks failed: {stderr}");
    // max_chars = 40 forces more than one chunk for two documents.
    let header = stdout.lines().next().unwrap();
    assert!(header.contains("chunks from"), "unexpected header: {header}");
    let count: usize = header.split_whitespace().next().unwrap().parse().unwrap();
    assert!(count > 1, "expected multiple chunks, got {count}");
}

#[test]
fn ask_without_credential_fails_with_a_clear_message() {
    let (tmp, config) = setup_test_env();
    let (_, stderr, success) = run_docchat(
        tmp.path(),
        &config,
        &["ask", "alpha.pdf", "--question", "What is on page one?"],
    );
    assert!(!success);
    assert!(stderr.contains("GOOGLE_API_KEY"));
}

#[test]
fn missing_files_are_reported() {
    let (tmp, config) = setup_test_env();
    let (_, stderr, success) = run_docchat(tmp.path(), &config, &["extract", "missing.pdf"]);
    assert!(!success);
    assert!(stderr.contains("missing.pdf"));
}
