//! Output file name derivation.

use crate::config::DEFAULT_FILE_NAME_TEMPLATE;

/// Placeholder replaced with the document title.
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// Name used when the title is blank after sanitizing.
const UNTITLED: &str = "Untitled";

/// Extensions of the formats the exporter can write.
const OUTPUT_EXTENSIONS: [&str; 2] = ["docx", "json"];

/// Remove characters that are not allowed in file names.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build an output file name from a template and a title.
///
/// The title is sanitized and replaced by `Untitled` when nothing is left.
/// A blank template falls back to `{title}`. The result always ends with
/// `.<extension>`, compared case-insensitively; a template ending in another
/// output format's extension has it replaced.
pub fn apply_file_name_template(template: &str, title: &str, extension: &str) -> String {
    let mut title = sanitize_file_name(title);
    if title.is_empty() {
        title = UNTITLED.to_string();
    }

    let template = match template.trim() {
        "" => DEFAULT_FILE_NAME_TEMPLATE,
        t => t,
    };

    let mut name = template.replace(TITLE_PLACEHOLDER, &title);
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    if ends_with_ignore_case(&name, &suffix) {
        return name;
    }

    let other = OUTPUT_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .find(|ext| name.len() > ext.len() && ends_with_ignore_case(&name, ext));
    if let Some(ext) = other {
        name.truncate(name.len() - ext.len());
    }
    name.push_str(&suffix);
    name
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        assert_eq!(apply_file_name_template("", "Отчёт", "docx"), "Отчёт.docx");
        assert_eq!(
            apply_file_name_template("{title}.docx", "Report", "docx"),
            "Report.docx"
        );
    }

    #[test]
    fn test_illegal_characters_removed() {
        assert_eq!(
            apply_file_name_template("{title}", "a<b>:c\"d/e\\f|g?h*", "docx"),
            "abcdefgh.docx"
        );
        assert_eq!(sanitize_file_name(" tab\there\u{7} "), "tabhere");
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(apply_file_name_template("{title}.DOCX", "x", "docx"), "x.DOCX");
        assert_eq!(apply_file_name_template("{title}", "x", "docx"), "x.docx");
        assert_eq!(
            apply_file_name_template("export-{title}", "notes", "json"),
            "export-notes.json"
        );
    }

    #[test]
    fn test_other_format_extension_is_replaced() {
        assert_eq!(apply_file_name_template("", "Отчёт", "json"), "Отчёт.json");
        assert_eq!(apply_file_name_template("{title}.docx", "Отчёт", "json"), "Отчёт.json");
        assert_eq!(apply_file_name_template("{title}.JSON", "x", "docx"), "x.docx");
        assert_eq!(apply_file_name_template("{title}.txt", "x", "json"), "x.txt.json");
    }

    #[test]
    fn test_blank_title_is_untitled() {
        assert_eq!(apply_file_name_template("{title}", "", "docx"), "Untitled.docx");
        assert_eq!(apply_file_name_template("{title}.docx", "???", "docx"), "Untitled.docx");
        assert_eq!(
            apply_file_name_template("ВКР - {title}", " ", "docx"),
            "ВКР - Untitled.docx"
        );
    }

    #[test]
    fn test_template_prefix() {
        assert_eq!(
            apply_file_name_template("ВКР - {title}", "Глава 1", "docx"),
            "ВКР - Глава 1.docx"
        );
    }
}
