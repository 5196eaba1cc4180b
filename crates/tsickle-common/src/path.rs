//! Path helpers.
//!
//! All helpers operate on `/`-separated strings; backslashes are converted on
//! the way in. Paths handed to the pipeline are not required to exist on disk,
//! so nothing here touches the filesystem.

/// Convert separators to `/` and fold `.` / `..` segments.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// True for `/abs/path` and `C:/abs/path`.
pub fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() > 2
            && bytes[0].is_ascii_alphabetic()
            && bytes[1] == b':'
            && (bytes[2] == b'/' || bytes[2] == b'\\'))
}

/// Module specifiers starting with `./` or `../` (or exactly `.` / `..`).
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Everything before the last `/`, or `.` when there is none.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Last path segment.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Join `relative` onto `base` and normalize. An absolute `relative` wins.
pub fn join(base: &str, relative: &str) -> String {
    if is_absolute(relative) || base.is_empty() || base == "." {
        return normalize(relative);
    }
    normalize(&format!("{base}/{relative}"))
}

/// Strip a TypeScript or JavaScript source extension (`.d.ts`, `.ts`,
/// `.tsx`, `.js`, `.jsx`).
pub fn strip_script_extension(path: &str) -> &str {
    for ext in [".d.ts", ".tsx", ".ts", ".jsx", ".js"] {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped;
        }
    }
    path
}

pub fn is_declaration_file(path: &str) -> bool {
    path.ends_with(".d.ts")
}

/// Express `path` relative to the directory `from_dir`. Both must be
/// normalized and of the same kind (both absolute or both relative).
pub fn relative(from_dir: &str, path: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    let to: Vec<&str> = path.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut parts: Vec<&str> = std::iter::repeat_n("..", from.len() - common).collect();
    parts.extend(&to[common..]);
    parts.join("/")
}

/// The output file name for a source file: extension swapped for `ext`,
/// re-rooted from `root_dir` into `out_dir` when both are configured.
pub fn output_file_name(
    file_name: &str,
    ext: &str,
    root_dir: Option<&str>,
    out_dir: Option<&str>,
) -> String {
    let stem = strip_script_extension(file_name);
    let rerooted = match (root_dir, out_dir) {
        (Some(root), Some(out)) => {
            let root = normalize(root);
            let stem = normalize(stem);
            match stem.strip_prefix(&format!("{root}/")) {
                Some(rest) => join(out, rest),
                None => stem,
            }
        }
        (None, Some(out)) => join(out, basename(stem)),
        _ => stem.to_string(),
    };
    format!("{rerooted}{ext}")
}

#[cfg(test)]
#[path = "../tests/path.rs"]
mod tests;
