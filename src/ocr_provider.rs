use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    #[default]
    Tesseract,
    Claude,
}

const CLAUDE_OCR_PROMPT: &str =
    "Transcribe every line of text on this receipt exactly as printed. Output only the text.";

impl OcrProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            OcrProvider::Tesseract => "tesseract",
            OcrProvider::Claude => "claude",
        }
    }

    /// OCRコマンドの引数（テキストは標準出力に出す）
    pub fn args(&self, image: &Path, language: &str) -> Vec<String> {
        let image = image.display().to_string();
        match self {
            OcrProvider::Tesseract => vec![
                image,
                "stdout".into(),
                "-l".into(),
                language.to_string(),
            ],
            OcrProvider::Claude => vec![
                "-p".into(),
                format!("Read the image file {} . {}", image.replace('\\', "/"), CLAUDE_OCR_PROMPT),
                "--output-format".into(),
                "text".into(),
            ],
        }
    }
}

impl std::fmt::Display for OcrProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_name())
    }
}
