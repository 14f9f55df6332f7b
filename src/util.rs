//! Command-line rendering and parsing helpers.

/// Quote one token for display in logs and report metadata.
fn quote_token(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}

/// Render a command vector as a copy-pasteable shell string.
pub fn quote_command<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|part| quote_token(part.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a user-supplied argument string into tokens, honoring single and
/// double quotes and backslash escapes.
pub fn split_arguments(line: &str) -> Result<Vec<String>, String> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Normal,
        SingleQuoted,
        DoubleQuoted,
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut pending = false;
    let mut mode = Mode::Normal;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match mode {
            Mode::Normal => match ch {
                '\'' => {
                    mode = Mode::SingleQuoted;
                    pending = true;
                }
                '"' => {
                    mode = Mode::DoubleQuoted;
                    pending = true;
                }
                '\\' => match chars.next() {
                    Some(next) => {
                        current.push(next);
                        pending = true;
                    }
                    None => return Err("dangling backslash".to_string()),
                },
                c if c.is_whitespace() => {
                    if pending {
                        out.push(std::mem::take(&mut current));
                        pending = false;
                    }
                }
                _ => {
                    current.push(ch);
                    pending = true;
                }
            },
            Mode::SingleQuoted => match ch {
                '\'' => mode = Mode::Normal,
                _ => current.push(ch),
            },
            Mode::DoubleQuoted => match ch {
                '"' => mode = Mode::Normal,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\')) => current.push(next),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => return Err("dangling backslash".to_string()),
                },
                _ => current.push(ch),
            },
        }
    }

    if mode != Mode::Normal {
        return Err("unterminated quote".to_string());
    }
    if pending {
        out.push(current);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_tokens_with_spaces() {
        let rendered = quote_command(["target-query", "/cases/my disk.E01", "-f", "evtx"]);
        assert_eq!(rendered, "target-query '/cases/my disk.E01' -f evtx");
    }

    #[test]
    fn quotes_embedded_single_quotes() {
        let rendered = quote_command(["echo", "it's"]);
        assert_eq!(rendered, "echo 'it'\\''s'");
    }

    #[test]
    fn splits_plain_tokens() {
        let tokens = split_arguments("-f evtx --limit 10").unwrap();
        assert_eq!(tokens, vec!["-f", "evtx", "--limit", "10"]);
    }

    #[test]
    fn splits_quoted_tokens() {
        let tokens = split_arguments("-s 'a b' \"c d\"").unwrap();
        assert_eq!(tokens, vec!["-s", "a b", "c d"]);
    }

    #[test]
    fn keeps_empty_quoted_token() {
        let tokens = split_arguments("-s ''").unwrap();
        assert_eq!(tokens, vec!["-s", ""]);
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(split_arguments("-s 'oops").is_err());
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(split_arguments("   ").unwrap().is_empty());
    }
}
