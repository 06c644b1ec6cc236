//! Single-line comment wrappers per file extension

use crate::error::GeneratorError;
use std::path::Path;

type Wrapper = fn(&str) -> String;

fn slashes(content: &str) -> String {
    format!("// {}", content)
}

fn block(content: &str) -> String {
    format!("/* {} */", content)
}

fn markup(content: &str) -> String {
    format!("<!-- {} -->", content)
}

fn hash(content: &str) -> String {
    format!("# {}", content)
}

/// Extension (no leading dot) to comment wrapper
const FORMATTERS: &[(&str, Wrapper)] = &[
    ("js", slashes),
    ("mjs", slashes),
    ("cjs", slashes),
    ("jsx", slashes),
    ("ts", slashes),
    ("mts", slashes),
    ("cts", slashes),
    ("tsx", slashes),
    ("scss", slashes),
    ("less", slashes),
    ("rs", slashes),
    ("go", slashes),
    ("java", slashes),
    ("kt", slashes),
    ("swift", slashes),
    ("c", slashes),
    ("h", slashes),
    ("cpp", slashes),
    ("css", block),
    ("html", markup),
    ("htm", markup),
    ("md", markup),
    ("vue", markup),
    ("xml", markup),
    ("svg", markup),
    ("py", hash),
    ("sh", hash),
    ("bash", hash),
    ("yml", hash),
    ("yaml", hash),
    ("toml", hash),
    ("rb", hash),
];

fn wrapper_for(extension: &str) -> Option<Wrapper> {
    FORMATTERS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, wrap)| *wrap)
}

/// Whether copyright statements can be written for this extension
pub fn is_supported(extension: &str) -> bool {
    wrapper_for(extension).is_some()
}

/// Extension of `path` without the leading dot
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Wrap `sentence` in the comment syntax for `extension`
pub fn format_line(extension: &str, sentence: &str) -> Result<String, GeneratorError> {
    let wrap = wrapper_for(extension).ok_or_else(|| GeneratorError::UnsupportedExtension {
        extension: extension.to_string(),
    })?;
    Ok(wrap(sentence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_styles() {
        let sentence = "Copyright 2020 A.";
        assert_eq!(format_line("js", sentence).unwrap(), "// Copyright 2020 A.");
        assert_eq!(format_line("css", sentence).unwrap(), "/* Copyright 2020 A. */");
        assert_eq!(format_line("html", sentence).unwrap(), "<!-- Copyright 2020 A. -->");
        assert_eq!(format_line("py", sentence).unwrap(), "# Copyright 2020 A.");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = format_line("xyz", "Copyright 2020 A.").unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedExtension { ref extension } if extension == "xyz"));
        assert!(!is_supported("xyz"));
        assert!(!is_supported(".js"));
    }

    #[test]
    fn test_content_is_not_normalized() {
        assert_eq!(format_line("ts", "  padded  ").unwrap(), "//   padded  ");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("src/app.min.js")), Some("js"));
        assert_eq!(extension_of(Path::new("Makefile")), None);
    }
}
