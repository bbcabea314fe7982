//! Env file parsing.
//!
//! Only variable names are extracted; values are never interpreted. A name is
//! whatever precedes the first `=` on a line, trimmed. Comments start at an
//! unescaped `#` and run to the end of the line.

/// Remove comments and blank lines from env file contents.
///
/// The result parses to the same names as the input.
pub fn strip_comments(contents: &str) -> String {
    let mut stripped = String::with_capacity(contents.len());

    for line in contents.lines() {
        let line = strip_line_comment(line);
        if line.trim().is_empty() {
            continue;
        }
        stripped.push_str(line);
        stripped.push('\n');
    }

    stripped
}

/// Extract the variable names declared in `contents`, in source order.
///
/// Duplicates are kept. Names are not validated as identifiers.
pub fn parse_env_file(contents: &str) -> Vec<String> {
    let names: Vec<String> = strip_comments(contents)
        .lines()
        .filter_map(variable_name)
        .collect();

    log::debug!("Collected {} env variable(s)", names.len());
    names
}

/// Cut `line` at the first `#` not preceded by a backslash.
fn strip_line_comment(line: &str) -> &str {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '#' if !escaped => return &line[..i],
            _ => escaped = false,
        }
    }
    line
}

fn variable_name(line: &str) -> Option<String> {
    let lhs = match line.find('=') {
        Some(0) => {
            log::debug!("Skipping line without a name: {line:?}");
            return None;
        }
        Some(idx) => &line[..idx],
        None => line,
    };

    let name = lhs.trim();
    if name.is_empty() {
        log::debug!("Skipping line with a blank name: {line:?}");
        return None;
    }

    Some(name.to_string())
}
