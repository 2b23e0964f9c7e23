//! Go struct tag parsing

/// Strip the quotes from a tag literal as written in source
///
/// Raw literals (`` `json:"name"` ``) are taken verbatim; interpreted
/// literals (`"json:\"name\""`) are unescaped.
pub fn literal_value(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return raw.to_string();
    }

    match literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(quoted) => unescape(quoted).unwrap_or_else(|| quoted.to_string()),
        None => literal.to_string(),
    }
}

/// Look up `key` in a struct tag using Go's `key:"value"` convention
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .bytes()
            .take_while(|&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
            .count();
        let after_name = &rest[name_len..];
        if name_len == 0 || !after_name.starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_len];

        // Find the closing quote, skipping escaped characters
        let quoted = &after_name[1..];
        let bytes = quoted.as_bytes();
        let mut end = 1;
        while end < bytes.len() && bytes[end] != b'"' {
            if bytes[end] == b'\\' {
                end += 1;
            }
            end += 1;
        }
        if end >= bytes.len() {
            return None;
        }

        if name == key {
            return unescape(&quoted[1..end]);
        }
        rest = &quoted[end + 1..];
    }
}

/// External name a field takes under `key`, if the tag renames it
///
/// `json:"name,omitempty"` yields `name`; an empty name or a bare `-` yields
/// nothing, while `json:"-,"` names the field `-`.
pub fn alias(tag: &str, key: &str) -> Option<String> {
    let value = lookup(tag, key)?;
    if value == "-" {
        return None;
    }

    let name = value.split(',').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Whether the tag leaves the field out of the `key` encoding (`key:"-"`)
pub fn omits(tag: &str, key: &str) -> bool {
    lookup(tag, key).as_deref() == Some("-")
}

fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            other => out.push(other),
        }
    }

    Some(out)
}
