//! Python adapter: strips `#` comments and triple-quoted string/docstring
//! bodies, leaving everything else (including single-quoted strings,
//! needed so annotation/literal text survives for the extractor).

use super::{ParseTree, SourceLine};

pub fn parse(source: &str) -> ParseTree {
    let mut lines = Vec::new();
    // Which triple-quote delimiter we're inside of, if any.
    let mut in_triple: Option<&'static str> = None;

    for (idx, raw_line) in source.lines().enumerate() {
        let mut code = String::with_capacity(raw_line.len());
        let bytes: Vec<char> = raw_line.chars().collect();
        let mut i = 0;
        let mut in_string: Option<char> = None;

        while i < bytes.len() {
            if let Some(delim) = in_triple {
                let delim_char = delim.chars().next().unwrap();
                if bytes[i] == delim_char && matches(&bytes, i, delim) {
                    in_triple = None;
                    i += 3;
                    continue;
                }
                i += 1;
                continue;
            }

            let c = bytes[i];

            if let Some(q) = in_string {
                code.push(c);
                if c == '\\' {
                    if let Some(&next) = bytes.get(i + 1) {
                        code.push(next);
                        i += 2;
                        continue;
                    }
                } else if c == q {
                    in_string = None;
                }
                i += 1;
                continue;
            }

            if (c == '"' || c == '\'') && matches(&bytes, i, &c.to_string().repeat(3)) {
                in_triple = Some(if c == '"' { "\"\"\"" } else { "'''" });
                i += 3;
                continue;
            }

            if c == '"' || c == '\'' {
                in_string = Some(c);
                code.push(c);
                i += 1;
                continue;
            }

            if c == '#' {
                break;
            }

            code.push(c);
            i += 1;
        }

        lines.push(SourceLine {
            line: idx + 1,
            raw: raw_line.to_string(),
            code,
        });
    }

    ParseTree { lines }
}

fn matches(chars: &[char], at: usize, pat: &str) -> bool {
    let pat_chars: Vec<char> = pat.chars().collect();
    if at + pat_chars.len() > chars.len() {
        return false;
    }
    chars[at..at + pat_chars.len()] == pat_chars[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hash_comments() {
        let tree = parse("x = 1  # trailing\ny = 2");
        assert_eq!(tree.lines[0].code.trim_end(), "x = 1  ");
        assert_eq!(tree.lines[1].code.trim_end(), "y = 2");
    }

    #[test]
    fn strips_triple_quoted_docstrings_across_lines() {
        let tree = parse("\"\"\"\nmodule docstring\nspanning lines\n\"\"\"\nx = 1");
        assert!(tree.lines[0].code.trim().is_empty());
        assert!(tree.lines[1].code.trim().is_empty());
        assert!(tree.lines[4].code.contains("x = 1"));
    }

    #[test]
    fn preserves_single_quoted_strings() {
        let tree = parse("x: int = 0  # not a float");
        assert!(tree.lines[0].code.contains("x: int = 0"));
    }

    #[test]
    fn hash_inside_string_is_not_a_comment() {
        let tree = parse(r#"x = "a # b""#);
        assert!(tree.lines[0].code.contains("a # b"));
    }
}
