//! Test fixtures: small media blobs and a scripted ffprobe.

use axum_test::multipart::{MultipartForm, Part};
use std::path::Path;

/// Minimal valid 1x1 PNG bytes.
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Bytes standing in for an mp4; the scripted prober never reads them.
pub fn fake_mp4(seed: u8) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.extend(std::iter::repeat(seed).take(4096));
    data
}

/// Single-part form with the given field name and part content type.
pub fn form(field: &str, data: Vec<u8>, file_name: &str, content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(data)
            .file_name(file_name)
            .mime_type(content_type),
    )
}

/// Write an executable shell script with `body` and return its path.
#[cfg(unix)]
fn fake_ffprobe_script(dir: &Path, body: &str) -> String {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffprobe");
    let mut file = std::fs::File::create(&path).expect("Failed to create fake ffprobe");
    writeln!(file, "#!/bin/sh\n{}", body).expect("Failed to write fake ffprobe");
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark fake ffprobe executable");
    path.to_string_lossy().into_owned()
}

/// Fake ffprobe printing a JSON document that reports `width`x`height`.
#[cfg(unix)]
pub fn fake_ffprobe(dir: &Path, width: u32, height: u32) -> String {
    fake_ffprobe_script(
        dir,
        &format!(
            "echo '{{\"streams\":[{{\"codec_type\":\"video\",\"width\":{},\"height\":{}}}]}}'",
            width, height
        ),
    )
}

/// Fake ffprobe that exits 1 without printing anything.
#[cfg(unix)]
pub fn failing_ffprobe(dir: &Path) -> String {
    fake_ffprobe_script(dir, "exit 1")
}

/// Non-unix runs have no scripted prober; video tests are unix-only.
#[cfg(not(unix))]
pub fn fake_ffprobe(_dir: &Path, _width: u32, _height: u32) -> String {
    "ffprobe".to_string()
}

#[cfg(not(unix))]
pub fn failing_ffprobe(_dir: &Path) -> String {
    "ffprobe".to_string()
}
