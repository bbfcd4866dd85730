use std::path::Path;

use thiserror::Error;
use typst::foundations::{Array, Dict, IntoValue, Value};
use typst::layout::PagedDocument;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_as_lib::TypstEngine;
use typst_pdf::PdfOptions;

static COVER_TEMPLATE: &str = include_str!("../templates/cover.typ");

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cover template failed to compile: {0}")]
    Compile(String),
    #[error("PDF export failed: {0}")]
    Export(String),
}

/// Render one "cc:" cover sheet listing `names`, returning the PDF bytes.
pub fn render_cover(names: &[String]) -> Result<Vec<u8>, CoverError> {
    let template = TypstEngine::builder()
        .main_file(COVER_TEMPLATE)
        .search_fonts_with(TypstKitFontOptions::default())
        .build();

    let names_value: Value = names
        .iter()
        .map(|name| Value::Str(name.as_str().into()))
        .collect::<Array>()
        .into_value();
    let mut input = Dict::new();
    input.insert("names".into(), names_value);

    let doc: PagedDocument = template
        .compile_with_input(input)
        .output
        .map_err(|err| match err {
            typst_as_lib::TypstAsLibError::TypstSource(diags) => {
                CoverError::Compile(diagnostic_text(&diags))
            }
            other => CoverError::Compile(other.to_string()),
        })?;

    typst_pdf::pdf(&doc, &PdfOptions::default())
        .map_err(|diags| CoverError::Export(diagnostic_text(&diags)))
}

/// Render and write a cover sheet to `path`.
pub fn write_cover(path: &Path, names: &[String]) -> Result<(), CoverError> {
    let bytes = render_cover(names)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn diagnostic_text(diags: &[typst::diag::SourceDiagnostic]) -> String {
    diags
        .iter()
        .map(|d| d.message.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_cover_produces_pdf_bytes() {
        let names = vec![
            "Jane Smith ending 4321".to_string(),
            "John Smith".to_string(),
        ];
        let bytes = render_cover(&names).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn render_cover_with_no_names_still_renders() {
        let bytes = render_cover(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn write_cover_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CC_HH_4521.pdf");
        write_cover(&path, &["Jane Smith".to_string()]).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
