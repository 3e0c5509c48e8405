//! Clean-up of model output before it is stored.

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Normalize a model completion.
///
/// Strips every `"`, turns literal `\n` escapes into line breaks, collapses
/// runs of blank lines to a single blank line, trims, and emits the platform
/// line separator. Blank input yields an empty string.
pub fn clean_content(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let unescaped = content
        .replace('"', "")
        .replace("\\n", "\n")
        .replace("\r\n", "\n");

    let mut out = String::with_capacity(unescaped.len());
    let mut newlines = 0usize;
    for ch in unescaped.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }

    let trimmed = out.trim();
    if LINE_ENDING == "\n" {
        trimmed.to_string()
    } else {
        trimmed.replace('\n', LINE_ENDING)
    }
}
