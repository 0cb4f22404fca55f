//! URL helpers for npm style dependency specifiers

/// Expands npm shorthand repository specifiers to full URLs
///
/// Handles `github:owner/repo`, `gitlab:owner/repo`, `bitbucket:owner/repo`,
/// `gist:id` and bare `owner/repo` (GitHub). A trailing `#ref` is kept. Every
/// other input, including full URLs, is returned unchanged.
pub fn expand_shorthand_url(url: &str) -> String {
    let url = url.trim();
    let (specifier, fragment) = match url.split_once('#') {
        Some((specifier, fragment)) => (specifier, Some(fragment)),
        None => (url, None),
    };

    let expanded = if let Some(id) = specifier.strip_prefix("gist:") {
        Some(format!("https://gist.github.com/{}.git", id))
    } else if let Some((prefix, path)) = specifier.split_once(':') {
        hosted_base(prefix)
            .filter(|_| is_owner_repo(path))
            .map(|base| format!("{}/{}.git", base, path.trim_end_matches(".git")))
    } else if is_owner_repo(specifier) {
        Some(format!(
            "https://github.com/{}.git",
            specifier.trim_end_matches(".git")
        ))
    } else {
        None
    };

    match (expanded, fragment) {
        (Some(expanded), Some(fragment)) => format!("{}#{}", expanded, fragment),
        (Some(expanded), None) => expanded,
        (None, _) => url.to_string(),
    }
}

/// Fixes download URLs npm is known to record in a broken form
///
/// The public registry is rewritten to https and `git+ssh://git@` remotes to
/// plain https so that the URL can be downloaded without credentials.
pub fn fix_npm_download_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("http://registry.npmjs.org/") {
        return format!("https://registry.npmjs.org/{}", rest);
    }

    if let Some(rest) = url.strip_prefix("git+ssh://git@") {
        return format!("https://{}", rest.replacen(':', "/", 1).replace("//", "/"));
    }

    url.to_string()
}

/// Splits an npm `from` specifier (`name@range`, `@scope/name@range`) into
/// the package name and the version part
pub fn split_from_specifier(from: &str) -> (&str, &str) {
    let search_start = usize::from(from.starts_with('@'));
    match from[search_start..].find('@') {
        Some(index) => {
            let at = search_start + index;
            (&from[..at], &from[at + 1..])
        }
        None => (from, ""),
    }
}

/// Splits `@scope/name` into `("@scope", "name")` on the last `/`
pub fn split_namespace(name: &str) -> (&str, &str) {
    match name.rsplit_once('/') {
        Some((namespace, name)) => (namespace, name),
        None => ("", name),
    }
}

fn hosted_base(prefix: &str) -> Option<&'static str> {
    match prefix {
        "github" => Some("https://github.com"),
        "gitlab" => Some("https://gitlab.com"),
        "bitbucket" => Some("https://bitbucket.org"),
        _ => None,
    }
}

fn is_owner_repo(specifier: &str) -> bool {
    let mut parts = specifier.split('/');
    let valid = |part: Option<&str>| {
        part.is_some_and(|p| {
            !p.is_empty()
                && !p.starts_with('.')
                && p
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
    };

    !specifier.starts_with('@')
        && valid(parts.next())
        && valid(parts.next())
        && parts.next().is_none()
}
