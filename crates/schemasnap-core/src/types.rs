/// Normalize a raw catalog type for DBML output.
///
/// Drops the `unsigned` token, rewrites `tinyint` to `boolean` and removes
/// every parenthesized length or precision suffix, so `tinyint(1) unsigned`
/// becomes `boolean` and `varchar(255)` becomes `varchar`. A parenthesized
/// group also ends the token before it, so `int(10)unsigned` becomes `int`.
/// Whitespace is collapsed. Normalizing an already normalized string is a
/// no-op.
pub fn normalize_type(declared: &str) -> String {
    strip_parenthesized(declared)
        .split_whitespace()
        .filter(|token| !token.eq_ignore_ascii_case("unsigned"))
        .map(rewrite_tinyint)
        .collect::<Vec<_>>()
        .join(" ")
}

fn rewrite_tinyint(token: &str) -> String {
    const TINYINT: &str = "tinyint";

    match token.get(..TINYINT.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(TINYINT) => {
            format!("boolean{}", &token[TINYINT.len()..])
        }
        _ => token.to_string(),
    }
}

// Each closed group becomes a space. An unclosed `(` drops the rest of the
// string; a stray `)` is kept.
fn strip_parenthesized(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth = 0usize;

    for ch in value.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    out.push(' ');
                }
            }
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}
