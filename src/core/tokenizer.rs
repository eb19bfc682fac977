//! Line tokenizer for console input.
//!
//! Splits a raw line into a command name and its arguments. Quoted arguments
//! keep their surrounding quote characters, which is what existing console
//! scripts expect. No external dependencies.

/// Result of tokenizing a console line.
///
/// All tokens borrow from the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCommand<'a> {
    /// The command name (first token).
    pub command: &'a str,
    /// The arguments (remaining tokens).
    pub args: Vec<&'a str>,
    /// The raw input string.
    pub raw: &'a str,
}

/// Tokenize a console line into command name and arguments.
///
/// # Syntax
///
/// - The command is everything up to the first whitespace character
/// - Arguments are separated by whitespace; runs of whitespace never produce
///   empty arguments
/// - A token starting with `'` or `"` extends to the next occurrence of the
///   same quote character and is kept *with* both quotes
/// - There are no escape sequences
/// - A quote with no closing partner is dropped along with the rest of its
///   token, and scanning resumes at the next token. Older console scripts
///   dropped only the quote character (`foo "abc def` gave `abc`, `def`);
///   here it gives just `def`, so `foo 'unterminated` has no arguments
///
/// Tokenizing never fails: an empty line yields an empty command.
///
/// # Examples
///
/// ```
/// use bevy_prompt_console::core::tokenize;
///
/// let result = tokenize("echo hello world");
/// assert_eq!(result.command, "echo");
/// assert_eq!(result.args, vec!["hello", "world"]);
///
/// // Quotes group words and are retained
/// let result = tokenize(r#"say "hello world""#);
/// assert_eq!(result.args, vec![r#""hello world""#]);
///
/// // A stray quote swallows its token
/// let result = tokenize("say 'oops");
/// assert!(result.args.is_empty());
/// ```
pub fn tokenize(input: &str) -> TokenizedCommand<'_> {
    let line = input.trim_start();

    let Some((command, rest)) = line.split_once(char::is_whitespace) else {
        return TokenizedCommand {
            command: line,
            args: Vec::new(),
            raw: input,
        };
    };

    TokenizedCommand {
        command,
        args: tokenize_args(rest),
        raw: input,
    }
}

/// Tokenize argument text (everything after the command name).
///
/// Lower-level function used by [`tokenize`].
pub fn tokenize_args(input: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        match c {
            c if c.is_whitespace() => {
                rest = &rest[c.len_utf8()..];
            }

            '"' | '\'' => {
                let body = &rest[1..];
                match body.find(c) {
                    Some(close) => {
                        // Both quote characters stay in the argument.
                        let end = close + 2;
                        args.push(&rest[..end]);
                        rest = &rest[end..];
                    }
                    None => {
                        rest = &body[token_end(body)..];
                    }
                }
            }

            _ => {
                let end = token_end(rest);
                args.push(&rest[..end]);
                rest = &rest[end..];
            }
        }
    }

    args
}

/// Byte offset of the first whitespace character, or the length of `text`.
fn token_end(text: &str) -> usize {
    text.find(char::is_whitespace).unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_no_args() {
        let result = tokenize("foo");
        assert_eq!(result.command, "foo");
        assert!(result.args.is_empty());
        assert_eq!(result.raw, "foo");
    }

    #[test]
    fn test_tokenize_simple() {
        let result = tokenize("foo bar baz");
        assert_eq!(result.command, "foo");
        assert_eq!(result.args, vec!["bar", "baz"]);
    }

    #[test]
    fn test_tokenize_double_quotes_retained() {
        let result = tokenize(r#"foo "a b" c"#);
        assert_eq!(result.command, "foo");
        assert_eq!(result.args, vec![r#""a b""#, "c"]);
    }

    #[test]
    fn test_tokenize_single_quotes_retained() {
        let result = tokenize("say 'hello world'");
        assert_eq!(result.args, vec!["'hello world'"]);
    }

    #[test]
    fn test_tokenize_other_quote_inside_quoted() {
        let result = tokenize(r#"say "it's fine" ok"#);
        assert_eq!(result.args, vec![r#""it's fine""#, "ok"]);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let result = tokenize("foo 'unterminated");
        assert_eq!(result.command, "foo");
        assert!(result.args.is_empty());
    }

    #[test]
    fn test_tokenize_unterminated_quote_keeps_following_tokens() {
        let result = tokenize("foo \"abc def ghi");
        assert_eq!(result.args, vec!["def", "ghi"]);
    }

    #[test]
    fn test_tokenize_quoted_token_followed_by_text() {
        let result = tokenize(r#"foo "a b"c d"#);
        assert_eq!(result.args, vec![r#""a b""#, "c", "d"]);
    }

    #[test]
    fn test_tokenize_quote_inside_bare_token_is_literal() {
        let result = tokenize("foo it's");
        assert_eq!(result.args, vec!["it's"]);
    }

    #[test]
    fn test_tokenize_extra_whitespace() {
        let result = tokenize("  echo   hello    world  ");
        assert_eq!(result.command, "echo");
        assert_eq!(result.args, vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_trailing_space_only() {
        let result = tokenize("quit ");
        assert_eq!(result.command, "quit");
        assert!(result.args.is_empty());
    }

    #[test]
    fn test_tokenize_tabs() {
        let result = tokenize("echo\ta\tb");
        assert_eq!(result.command, "echo");
        assert_eq!(result.args, vec!["a", "b"]);
    }

    #[test]
    fn test_tokenize_empty() {
        let result = tokenize("");
        assert_eq!(result.command, "");
        assert!(result.args.is_empty());
    }

    #[test]
    fn test_tokenize_empty_quotes() {
        let result = tokenize(r#"set name """#);
        assert_eq!(result.args, vec!["name", r#""""#]);
    }

    #[test]
    fn test_tokenize_unicode() {
        let result = tokenize("greet Zoë 'Ünïcode nåme'");
        assert_eq!(result.args, vec!["Zoë", "'Ünïcode nåme'"]);
    }

    #[test]
    fn test_tokenize_rejoined_is_stable() {
        let first = tokenize("copy   src/a.txt  dst/b.txt -v");
        let joined = std::iter::once(first.command)
            .chain(first.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let second = tokenize(&joined);
        assert_eq!(second.command, first.command);
        assert_eq!(second.args, first.args);
    }

    #[test]
    fn test_tokenize_args_whitespace_only() {
        assert!(tokenize_args("   \t  ").is_empty());
    }
}
