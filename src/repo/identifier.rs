//! Repository identifier parsing.
//!
//! Accepts `host/owner/repo` and `scheme://host/owner/repo`. This is a
//! token count check, not a URL grammar: anything else is rejected.

use crate::models::RepoId;
use thiserror::Error;

/// Why a repository identifier was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error(
        "invalid repository identifier '{input}': expected host/owner/repo or \
         https://host/owner/repo (got {tokens} '/'-separated parts)"
    )]
    TokenCount { input: String, tokens: usize },

    #[error("invalid repository identifier '{0}': owner and repository must not be empty")]
    EmptySegment(String),
}

/// Parse a repository identifier into owner and repository name.
pub fn parse_repo_identifier(input: &str) -> Result<RepoId, IdentifierError> {
    let tokens: Vec<&str> = input.split('/').collect();

    let (owner, name) = match tokens.len() {
        // github.com/owner/repo
        3 => (tokens[1], tokens[2]),
        // https://github.com/owner/repo
        5 => (tokens[3], tokens[4]),
        n => {
            return Err(IdentifierError::TokenCount {
                input: input.to_string(),
                tokens: n,
            })
        }
    };

    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() {
        return Err(IdentifierError::EmptySegment(input.to_string()));
    }

    Ok(RepoId::new(owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_form() {
        let repo = parse_repo_identifier("github.com/golang/go").unwrap();
        assert_eq!(repo, RepoId::new("golang", "go"));
    }

    #[test]
    fn test_parse_full_url() {
        let repo = parse_repo_identifier("https://github.com/golang/go").unwrap();
        assert_eq!(repo, RepoId::new("golang", "go"));
    }

    #[test]
    fn test_parse_strips_git_suffix() {
        let repo = parse_repo_identifier("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(repo, RepoId::new("rust-lang", "rust"));
    }

    #[test]
    fn test_parse_any_host() {
        let repo = parse_repo_identifier("git.example.org/team/tool").unwrap();
        assert_eq!(repo, RepoId::new("team", "tool"));
    }

    #[test]
    fn test_parse_wrong_token_count() {
        for input in [
            "golang/go",
            "go",
            "",
            "https://github.com/golang",
            "https://github.com/golang/go/",
            "https://github.com/golang/go/tree/master",
        ] {
            let err = parse_repo_identifier(input).unwrap_err();
            assert!(
                matches!(err, IdentifierError::TokenCount { .. }),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_empty_segment() {
        assert_eq!(
            parse_repo_identifier("github.com//go"),
            Err(IdentifierError::EmptySegment("github.com//go".to_string()))
        );
        assert!(parse_repo_identifier("github.com/golang/.git").is_err());
    }

    #[test]
    fn test_error_message_names_input() {
        let err = parse_repo_identifier("golang/go").unwrap_err();
        assert!(err.to_string().contains("golang/go"));
        assert!(err.to_string().contains("2"));
    }
}
