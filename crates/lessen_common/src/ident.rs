//! Derivation of CSS-safe identifiers from stylesheet paths.

/// Derives the marker identifier for a relative path.
///
/// Takes the last path segment, replaces every character that is not an
/// ASCII letter, digit, `_`, `-`, or `.` with `_`, collapses runs of `_`,
/// and drops leading characters up to the first ASCII letter. The file
/// extension is kept, so `styles/test.css` becomes `test.css`.
///
/// Returns `None` when no letter survives; such files get no markers.
pub fn marker_ident(relative_path: &str) -> Option<String> {
    sanitise(last_segment(relative_path))
}

/// Derives the keyframe scope prefix for a relative path.
///
/// Like [`marker_ident`] but with the final extension removed first
/// (`test1.css` becomes `test1`). When the sanitised name has no letter,
/// falls back to `scope` followed by a stable hash of the full path so
/// the prefix is still deterministic and unique per file.
pub fn scope_prefix(relative_path: &str) -> String {
    let name = last_segment(relative_path);
    let stem = match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    };
    sanitise(stem).unwrap_or_else(|| {
        format!(
            "scope{}",
            crate::ContentHash::of(relative_path.as_bytes())
        )
    })
}

fn last_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn sanitise(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            c
        } else {
            '_'
        };
        if mapped == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(mapped);
    }
    let start = out.find(|c: char| c.is_ascii_alphabetic())?;
    Some(out[start..].to_string())
}
