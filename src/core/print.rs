//! Print surface
//!
//! Produces a standalone HTML document sized to the persisted page
//! settings, the image embedded as a data URI, with an onload hook that
//! opens the platform print dialog. The document is written to disk and
//! handed to the platform opener; actual printing stays with the OS.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use base64::Engine;

use crate::api::GenerationResult;
use crate::core::config::{Orientation, PageSize};

pub fn data_uri(result: &GenerationResult) -> String {
    format!("data:{};base64,{}", result.mime_type, result.image_base64)
}

/// Body dimensions matching the `@page` size, so the image scales to the
/// physical sheet.
fn body_dimensions(page_size: PageSize, orientation: Orientation) -> &'static str {
    match (page_size, orientation) {
        (PageSize::Letter, Orientation::Landscape) => "width: 11in; height: 8.5in;",
        (PageSize::Letter, Orientation::Portrait) => "width: 8.5in; height: 11in;",
        (PageSize::A4, Orientation::Landscape) => "width: 297mm; height: 210mm;",
        (PageSize::A4, Orientation::Portrait) => "width: 210mm; height: 297mm;",
        (PageSize::Poster, Orientation::Landscape) => "width: 24in; height: 18in;",
        (PageSize::Poster, Orientation::Portrait) => "width: 18in; height: 24in;",
    }
}

/// Render the print document around an image source (normally a data URI).
pub fn print_document(image_src: &str, page_size: PageSize, orientation: Orientation) -> String {
    format!(
        r#"<html>
    <head>
        <title>Crayonbox - Coloring Page</title>
        <style>
            @page {{
                margin: 0;
                size: {page} {orientation};
            }}
            body {{
                margin: 0;
                padding: 0;
                display: flex;
                justify-content: center;
                align-items: center;
                {dimensions}
            }}
            img {{
                max-width: 100%;
                max-height: 100%;
                display: block;
            }}
        </style>
    </head>
    <body onload="window.focus(); window.print();">
        <img src="{image_src}" alt="Coloring Page">
    </body>
</html>
"#,
        page = page_size.id(),
        orientation = orientation.id(),
        dimensions = body_dimensions(page_size, orientation),
    )
}

/// Write the print document for a generation result next to `path`.
pub fn write_print_document(
    result: &GenerationResult,
    page_size: PageSize,
    orientation: Orientation,
    path: &Path,
) -> io::Result<()> {
    let document = print_document(&data_uri(result), page_size, orientation);
    fs::write(path, document)
}

/// Wrap an already-saved image file in a print document beside it.
pub fn print_document_for_file(
    image_path: &Path,
    page_size: PageSize,
    orientation: Orientation,
) -> io::Result<PathBuf> {
    let bytes = fs::read(image_path)?;
    let result = GenerationResult {
        image_base64: base64::prelude::BASE64_STANDARD.encode(&bytes),
        mime_type: mime_type_for(image_path).to_string(),
    };

    let html_path = image_path.with_extension("print.html");
    write_print_document(&result, page_size, orientation, &html_path)?;
    Ok(html_path)
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Hand a document to the platform opener, which routes it to the default
/// browser where the onload hook triggers the print dialog.
pub fn open_document(path: &Path) -> Result<(), String> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(path);
        c
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    match command
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => Err(format!("Opener exited with failure for {}", path.display())),
        Err(_) => Err("No platform opener available".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> GenerationResult {
        GenerationResult {
            image_base64: "QUJD".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn data_uri_carries_mime_type_and_payload() {
        assert_eq!(data_uri(&sample_result()), "data:image/png;base64,QUJD");
    }

    #[test]
    fn document_embeds_page_geometry_and_image() {
        let doc = print_document(
            &data_uri(&sample_result()),
            PageSize::A4,
            Orientation::Portrait,
        );
        assert!(doc.contains("size: a4 portrait;"));
        assert!(doc.contains("width: 210mm; height: 297mm;"));
        assert!(doc.contains("data:image/png;base64,QUJD"));
        assert!(doc.contains("window.print()"));
    }

    #[test]
    fn landscape_letter_swaps_the_dimensions() {
        let doc = print_document("img.png", PageSize::Letter, Orientation::Landscape);
        assert!(doc.contains("width: 11in; height: 8.5in;"));
    }

    #[test]
    fn file_wrapper_writes_the_document_beside_the_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let image_path = dir.path().join("page.png");
        fs::write(&image_path, b"ABC").unwrap();

        let html_path = print_document_for_file(
            &image_path,
            PageSize::A4,
            Orientation::Landscape,
        )
        .unwrap();

        assert_eq!(html_path, dir.path().join("page.print.html"));
        let contents = fs::read_to_string(html_path).unwrap();
        assert!(contents.contains("data:image/png;base64,QUJD"));
    }
}
