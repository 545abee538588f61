//! Brace-placeholder scanning for template skeletons.
//!
//! `{name}` marks a placeholder and `{{` / `}}` stand for literal braces.
//! Substitution is a single left-to-right pass: bound values are appended as
//! they are and never scanned again.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed skeleton at byte {offset}: '{text}'")]
pub struct SkeletonError {
    pub offset: usize,
    pub text: String,
}

fn flush<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
}

pub fn tokenize(skeleton: &str) -> Result<Vec<Token<'_>>, SkeletonError> {
    let bytes = skeleton.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'{', Some(b'{')) | (b'}', Some(b'}')) => {
                flush(&mut tokens, &skeleton[start..i]);
                tokens.push(Token::Text(&skeleton[i..i + 1]));
                i += 2;
                start = i;
            }
            (b'{', _) => {
                let close = skeleton[i + 1..]
                    .find('}')
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| SkeletonError {
                        offset: i,
                        text: skeleton[i..].chars().take(32).collect(),
                    })?;
                let name = &skeleton[i + 1..close];
                if !is_placeholder_name(name) {
                    return Err(SkeletonError {
                        offset: i,
                        text: skeleton[i..=close].to_string(),
                    });
                }
                flush(&mut tokens, &skeleton[start..i]);
                tokens.push(Token::Placeholder(name));
                i = close + 1;
                start = i;
            }
            (b'}', _) => {
                return Err(SkeletonError {
                    offset: i,
                    text: "}".to_string(),
                });
            }
            _ => i += 1,
        }
    }
    flush(&mut tokens, &skeleton[start..]);
    Ok(tokens)
}

/// Placeholder names referenced by `skeleton`, in first-use order, without repeats.
pub fn placeholder_names(skeleton: &str) -> Result<Vec<&str>, SkeletonError> {
    let mut names: Vec<&str> = Vec::new();
    for token in tokenize(skeleton)? {
        if let Token::Placeholder(name) = token {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Fills `tokens` using `resolve`; stops at the first name it cannot resolve.
pub fn render<'t, 'v, F>(tokens: &[Token<'t>], mut resolve: F) -> Result<String, &'t str>
where
    F: FnMut(&str) -> Option<&'v str>,
{
    let capacity = tokens
        .iter()
        .map(|t| match t {
            Token::Text(text) => text.len(),
            Token::Placeholder(_) => 0,
        })
        .sum();
    let mut out = String::with_capacity(capacity);
    for token in tokens {
        match *token {
            Token::Text(text) => out.push_str(text),
            Token::Placeholder(name) => out.push_str(resolve(name).ok_or(name)?),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_text_and_placeholders() {
        let tokens = tokenize("class {method_name} : public {method_type}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("class "),
                Token::Placeholder("method_name"),
                Token::Text(" : public "),
                Token::Placeholder("method_type"),
            ]
        );
    }

    #[test]
    fn doubled_braces_are_literal() {
        let tokens = tokenize("{{{atom_parameters}}}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("{"),
                Token::Placeholder("atom_parameters"),
                Token::Text("}"),
            ]
        );
    }

    #[test]
    fn tokenize_rejects_stray_and_unclosed_braces() {
        assert_eq!(tokenize("a } b").unwrap_err().offset, 2);
        assert!(tokenize("open { forever").is_err());
        assert!(tokenize("{Not_A_Name}").is_err());
        assert!(tokenize("{}").is_err());
    }

    #[test]
    fn placeholder_names_are_unique_and_ordered() {
        let names = placeholder_names("{b} {a} {b}").unwrap();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn render_does_not_rescan_values() {
        let tokens = tokenize("[{code}]").unwrap();
        let out = render(&tokens, |name| (name == "code").then_some("{method_name}")).unwrap();
        assert_eq!(out, "[{method_name}]");
    }

    #[test]
    fn render_reports_the_first_unresolved_name() {
        let tokens = tokenize("{a}{b}").unwrap();
        let err = render(&tokens, |name| (name == "a").then_some("x")).unwrap_err();
        assert_eq!(err, "b");
    }
}
