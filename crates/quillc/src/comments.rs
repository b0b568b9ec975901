//! Comment stripping: a plain character copy.
//!
//! A `%` starts a comment that runs to the end of the line. The newline
//! itself survives, so line numbers in the cleaned file match the source.

/// Return `source` with every comment removed.
pub fn strip(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_comment = false;
    for c in source.chars() {
        if c == '%' {
            in_comment = true;
        }
        if !in_comment {
            out.push(c);
        }
        if in_comment && c == '\n' {
            in_comment = false;
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comment_to_end_of_line() {
        assert_eq!(strip("b2 <--- 4; % set it\nreturn;\n"), "b2 <--- 4; \nreturn;\n");
    }

    #[test]
    fn keeps_newlines_for_line_numbering() {
        let source = "% first\n% second\nb2\n";
        assert_eq!(strip(source), "\n\nb2\n");
    }

    #[test]
    fn comment_without_trailing_newline() {
        assert_eq!(strip("b2 % trailing"), "b2 ");
    }

    #[test]
    fn leaves_clean_source_alone() {
        let source = "_main\nreturn;\nend\n";
        assert_eq!(strip(source), source);
    }

    #[test]
    fn stripping_is_idempotent() {
        let source = "a % one\nb % two\nc\n";
        let once = strip(source);
        assert_eq!(strip(&once), once);
    }
}
