//! C/header adapter: strips comments while tracking string and
//! character literals so that `//` or `/*` inside a string (e.g. a
//! format literal `"// not a comment"`) is never mistaken for one.

use super::{ParseTree, SourceLine};

pub fn parse(source: &str) -> ParseTree {
    let mut lines = Vec::new();
    let mut in_block_comment = false;

    for (idx, raw_line) in source.lines().enumerate() {
        let mut code = String::with_capacity(raw_line.len());
        let mut in_string = false;
        let mut in_char = false;
        let chars: Vec<char> = raw_line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if in_block_comment {
                if c == '*' && chars.get(i + 1) == Some(&'/') {
                    in_block_comment = false;
                    i += 2;
                    continue;
                }
                i += 1;
                continue;
            }

            if in_string {
                code.push(c);
                if c == '\\' {
                    if let Some(&next) = chars.get(i + 1) {
                        code.push(next);
                        i += 2;
                        continue;
                    }
                } else if c == '"' {
                    in_string = false;
                }
                i += 1;
                continue;
            }

            if in_char {
                code.push(c);
                if c == '\\' {
                    if let Some(&next) = chars.get(i + 1) {
                        code.push(next);
                        i += 2;
                        continue;
                    }
                } else if c == '\'' {
                    in_char = false;
                }
                i += 1;
                continue;
            }

            if c == '/' && chars.get(i + 1) == Some(&'/') {
                // Rest of line is a line comment; drop it.
                break;
            }
            if c == '/' && chars.get(i + 1) == Some(&'*') {
                in_block_comment = true;
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = true;
                code.push(c);
                i += 1;
                continue;
            }
            if c == '\'' {
                in_char = true;
                code.push(c);
                i += 1;
                continue;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comments() {
        let tree = parse("int x = 1; // trailing\nint y = 2;");
        assert_eq!(tree.lines[0].code.trim_end(), "int x = 1; ");
        assert_eq!(tree.lines[1].code.trim_end(), "int y = 2;");
    }

    #[test]
    fn strips_block_comments_across_lines() {
        let tree = parse("int x = 1; /* start\nmiddle\nend */ int y = 2;");
        assert!(tree.lines[0].code.contains("int x = 1;"));
        assert!(tree.lines[1].code.trim().is_empty());
        assert!(tree.lines[2].code.contains("int y = 2;"));
    }

    #[test]
    fn preserves_comment_markers_inside_strings() {
        let tree = parse(r#"printf("// not a comment");"#);
        assert!(tree.lines[0].code.contains("// not a comment"));
    }

    #[test]
    fn unterminated_block_comment_recovers_to_end_of_file() {
        let tree = parse("int x; /* never closed\nint y;");
        assert!(tree.lines[0].code.contains("int x;"));
        assert!(tree.lines[1].code.trim().is_empty());
    }
}
