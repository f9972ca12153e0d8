//! Mount path construction.
//!
//! # Responsibilities
//! - Normalize a route's `base_url` prefix
//! - Join prefix and step path into a final mount path
//! - Expand a trailing parameter pattern (`/:action?`) into concrete
//!   axum paths, one per optional-segment combination
//! - Reject literal paths axum would read as captures, and reduce mount
//!   paths to the shape axum uses to detect conflicts
//!
//! # Design Decisions
//! - Patterns use the `:name` / `:name?` segment form
//! - Optional segments must trail all required ones
//! - Expansion happens once at validation time, never per request

/// A concrete path registered on the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPath {
    /// Path in axum syntax (`/one/{action}`).
    pub path: String,
    /// Whether the path captures parameters.
    pub has_params: bool,
}

/// Error raised for a parameter pattern that cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pub pattern: String,
    pub reason: &'static str,
}

/// Normalize a mount prefix: `None`, `""` and `"/"` all mean the root,
/// anything else gains a leading `/` and loses trailing ones.
pub fn normalize_base_url(base_url: Option<&str>) -> String {
    let trimmed = base_url.unwrap_or("").trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Expand a parameter pattern into path suffixes.
///
/// `/:action?` yields `["", "/{action}"]`; `/:id/:tab?` yields
/// `["/{id}", "/{id}/{tab}"]`. An absent pattern yields `[""]`.
pub fn expand_params(pattern: Option<&str>) -> Result<Vec<String>, PatternError> {
    let pattern = match pattern {
        Some(p) if !p.trim_matches('/').is_empty() => p,
        _ => return Ok(vec![String::new()]),
    };

    let fail = |reason| PatternError {
        pattern: pattern.to_string(),
        reason,
    };

    let mut required = String::new();
    let mut optional: Vec<String> = Vec::new();

    for segment in pattern.trim_matches('/').split('/') {
        let (literal, is_optional) = match segment.strip_suffix('?') {
            Some(s) => (s, true),
            None => (segment, false),
        };
        let rendered = match literal.strip_prefix(':') {
            Some(name) if is_valid_name(name) => format!("/{{{}}}", name),
            Some(_) => return Err(fail("invalid parameter name")),
            None if is_optional => return Err(fail("only parameters can be optional")),
            None if literal.is_empty() || literal.contains(['{', '}', '*']) => {
                return Err(fail("invalid literal segment"))
            }
            None => format!("/{}", literal),
        };
        if is_optional {
            optional.push(rendered);
        } else if !optional.is_empty() {
            return Err(fail("required segment after an optional one"));
        } else {
            required.push_str(&rendered);
        }
    }

    let mut suffixes = vec![required.clone()];
    let mut acc = required;
    for seg in optional {
        acc.push_str(&seg);
        suffixes.push(acc.clone());
    }
    Ok(suffixes)
}

/// Build every mount path for one step.
///
/// `base_url` must already be normalized; `step` starts with `/`.
pub fn mount_paths(base_url: &str, step: &str, suffixes: &[String]) -> Vec<MountPath> {
    let step = step.trim_end_matches('/');
    suffixes
        .iter()
        .map(|suffix| {
            let joined = format!("{}{}{}", base_url, step, suffix);
            MountPath {
                path: if joined.is_empty() { "/".to_string() } else { joined },
                has_params: suffix.contains('{'),
            }
        })
        .collect()
}

/// Check that a step path or base url is purely literal.
///
/// Captures only come from the params pattern; a segment starting with
/// `:` or `*`, or containing braces, would be taken as one by the router.
pub fn check_literal(path: &str) -> Result<(), &'static str> {
    for segment in path.split('/') {
        if segment.starts_with([':', '*']) {
            return Err("segments must not start with ':' or '*'");
        }
        if segment.contains(['{', '}']) {
            return Err("segments must not contain '{' or '}'");
        }
    }
    Ok(())
}

/// The shape of a mount path: every `{name}` capture becomes `{}`.
///
/// Two paths with the same shape cannot both be registered on one router.
pub fn conflict_key(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(None), "");
        assert_eq!(normalize_base_url(Some("/")), "");
        assert_eq!(normalize_base_url(Some("/app_1/")), "/app_1");
        assert_eq!(normalize_base_url(Some("app_1")), "/app_1");
    }

    #[test]
    fn test_optional_param_expansion() {
        assert_eq!(expand_params(None).unwrap(), vec![""]);
        assert_eq!(
            expand_params(Some("/:action?")).unwrap(),
            vec!["".to_string(), "/{action}".to_string()]
        );
        assert_eq!(
            expand_params(Some("/:id/:tab?")).unwrap(),
            vec!["/{id}".to_string(), "/{id}/{tab}".to_string()]
        );
    }

    #[test]
    fn test_rejects_bad_patterns() {
        assert!(expand_params(Some("/:a?/:b")).is_err());
        assert!(expand_params(Some("/edit?")).is_err());
        assert!(expand_params(Some("/:")).is_err());
        assert!(expand_params(Some("/{x}")).is_err());
    }

    #[test]
    fn test_mount_paths() {
        let suffixes = expand_params(Some("/:action?")).unwrap();
        let paths = mount_paths("/app_1", "/one", &suffixes);
        assert_eq!(paths[0].path, "/app_1/one");
        assert!(!paths[0].has_params);
        assert_eq!(paths[1].path, "/app_1/one/{action}");
        assert!(paths[1].has_params);

        let root = mount_paths("", "/", &[String::new()]);
        assert_eq!(root[0].path, "/");
        let prefixed_root = mount_paths("/app_1", "/", &[String::new()]);
        assert_eq!(prefixed_root[0].path, "/app_1");
    }

    #[test]
    fn test_check_literal() {
        assert!(check_literal("/one").is_ok());
        assert!(check_literal("/").is_ok());
        assert!(check_literal("/app_1/one").is_ok());
        assert!(check_literal("/:id").is_err());
        assert!(check_literal("/files/*rest").is_err());
        assert!(check_literal("/{id}").is_err());
        assert!(check_literal("/one}").is_err());
    }

    #[test]
    fn test_conflict_key_ignores_capture_names() {
        assert_eq!(conflict_key("/one/{action}"), "/one/{}");
        assert_eq!(conflict_key("/one/{action}"), conflict_key("/one/{id}"));
        assert_ne!(conflict_key("/one/{id}"), conflict_key("/one/two"));
        assert_eq!(conflict_key("/"), "/");
    }
}
