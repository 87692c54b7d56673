//! Positional placeholder (`$1, $2, ...`) scanning.

/// List the indices of every `$N` placeholder in `sql`, in order of occurrence.
///
/// Quoted literals (`'...'`), quoted identifiers (`"..."`), and `--` line
/// comments are skipped. A `$` directly after an identifier character is not
/// a placeholder.
pub fn placeholders(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        if i + 1 < bytes.len() && bytes[i + 1] == quote {
                            i += 1; // escaped quote
                        } else {
                            break;
                        }
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => match sql[i..].find('\n') {
                Some(pos) => i += pos,
                None => break,
            },
            b'$' => {
                let after_ident = i > 0 && is_ident_byte(bytes[i - 1]);
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if !after_ident && end > start {
                    if let Ok(n) = sql[start..end].parse() {
                        out.push(n);
                    }
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    out
}

/// Highest placeholder index referenced by `sql` (0 when there are none).
pub fn max_placeholder(sql: &str) -> usize {
    placeholders(sql).into_iter().max().unwrap_or(0)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
