use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;

use crate::api::{GenerationResult, HttpAdapterFactory};
use crate::core::config::SettingsStore;
use crate::core::print;
use crate::core::session::{GenerateOutcome, SessionController};

pub async fn run_generate(
    store: &SettingsStore,
    description: &str,
    output: Option<PathBuf>,
    print_after: bool,
) -> Result<(), Box<dyn Error>> {
    let mut session = SessionController::new(store.clone(), HttpAdapterFactory::new());

    match session.generate(description).await {
        GenerateOutcome::Completed => {
            let result = session
                .last_result()
                .expect("completed generation retains a result");
            let path = save_image(result, output)?;
            println!("✅ Saved coloring page to {}", path.display());

            if print_after {
                let config = store.load()?;
                let html_path = print::print_document_for_file(
                    &path,
                    config.effective_page_size(),
                    config.effective_orientation(),
                )?;
                print::open_document(&html_path)?;
                println!("🖨️  Sent {} to the printer dialog", html_path.display());
            }
            Ok(())
        }
        GenerateOutcome::Failed(message) => {
            if store.load()?.api_keys.is_empty() {
                eprintln!(
                    "Welcome! Crayonbox needs an API key before it can draw anything.\n\
                     Store one with `crayonbox keys set google <key>` or import a\n\
                     shared link with `crayonbox keys import <link>`."
                );
            }
            Err(message.into())
        }
        GenerateOutcome::Ignored => Err("A generation is already in progress".into()),
    }
}

pub fn run_print(store: &SettingsStore, image: &Path) -> Result<(), Box<dyn Error>> {
    let config = store.load()?;
    let html_path = print::print_document_for_file(
        image,
        config.effective_page_size(),
        config.effective_orientation(),
    )?;
    print::open_document(&html_path)?;
    println!("🖨️  Sent {} to the printer dialog", html_path.display());
    Ok(())
}

fn save_image(
    result: &GenerationResult,
    output: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn Error>> {
    let bytes = base64::prelude::BASE64_STANDARD
        .decode(result.image_base64.as_bytes())
        .map_err(|_| "Provider returned invalid image data")?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!("coloring-page.{}", extension_for(&result.mime_type)))
    });
    fs::write(&path, bytes)?;
    Ok(path)
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_image_decodes_and_names_by_mime_type() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.png");
        let result = GenerationResult {
            image_base64: "QUJD".to_string(),
            mime_type: "image/png".to_string(),
        };

        let written = save_image(&result, Some(path.clone())).unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read(path).unwrap(), b"ABC");
    }

    #[test]
    fn save_image_rejects_bad_base64() {
        let result = GenerationResult {
            image_base64: "not base64!!!".to_string(),
            mime_type: "image/png".to_string(),
        };
        assert!(save_image(&result, None).is_err());
    }

    #[test]
    fn extension_follows_the_mime_type() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/octet-stream"), "png");
    }
}
