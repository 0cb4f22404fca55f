use std::fmt;
use url::Url;

/// Version control system type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VcsType {
    Git,
    Mercurial,
    Subversion,
    #[default]
    Unknown,
}

impl VcsType {
    /// Maps the free-form `repository.type` of a manifest
    pub fn from_manifest_type(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "git" => VcsType::Git,
            "hg" | "mercurial" => VcsType::Mercurial,
            "svn" | "subversion" => VcsType::Subversion,
            _ => VcsType::Unknown,
        }
    }

    /// Prefix used for SPDX download locations (`git+https://...`)
    pub fn spdx_tool(&self) -> Option<&'static str> {
        match self {
            VcsType::Git => Some("git"),
            VcsType::Mercurial => Some("hg"),
            VcsType::Subversion => Some("svn"),
            VcsType::Unknown => None,
        }
    }
}

impl fmt::Display for VcsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsType::Git => write!(f, "Git"),
            VcsType::Mercurial => write!(f, "Mercurial"),
            VcsType::Subversion => write!(f, "Subversion"),
            VcsType::Unknown => write!(f, ""),
        }
    }
}

/// Hosting services whose URLs can be decomposed into owner and repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VcsHost {
    GitHub,
    GitLab,
    Bitbucket,
}

impl VcsHost {
    fn from_host(host: &str) -> Option<Self> {
        match host.trim_start_matches("www.") {
            "github.com" | "codeload.github.com" => Some(VcsHost::GitHub),
            "gitlab.com" => Some(VcsHost::GitLab),
            "bitbucket.org" => Some(VcsHost::Bitbucket),
            _ => None,
        }
    }

    fn repository_url(&self, owner: &str, repo: &str) -> String {
        match self {
            VcsHost::GitHub => format!("https://github.com/{}/{}.git", owner, repo),
            VcsHost::GitLab => format!("https://gitlab.com/{}/{}.git", owner, repo),
            VcsHost::Bitbucket => format!("https://bitbucket.org/{}/{}.git", owner, repo),
        }
    }

    fn archive_url(&self, owner: &str, repo: &str, revision: &str) -> String {
        match self {
            VcsHost::GitHub => format!(
                "https://github.com/{}/{}/archive/{}.tar.gz",
                owner, repo, revision
            ),
            VcsHost::GitLab => format!(
                "https://gitlab.com/{}/{}/-/archive/{}/{}-{}.tar.gz",
                owner, repo, revision, repo, revision
            ),
            VcsHost::Bitbucket => format!(
                "https://bitbucket.org/{}/{}/get/{}.tar.gz",
                owner, repo, revision
            ),
        }
    }
}

/// A repository location on a known host, decomposed from a URL
struct HostedRepository {
    host: VcsHost,
    owner: String,
    repo: String,
    revision: String,
    path: String,
}

impl HostedRepository {
    fn parse(raw_url: &str) -> Option<Self> {
        let (without_fragment, fragment) = match raw_url.split_once('#') {
            Some((base, fragment)) => (base, fragment),
            None => (raw_url, ""),
        };

        let url = Url::parse(&to_https(without_fragment)).ok()?;
        let host = VcsHost::from_host(url.host_str()?)?;
        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.len() < 2 {
            return None;
        }

        let owner = segments[0].to_string();
        let repo = segments[1].trim_end_matches(".git").to_string();
        let mut revision = fragment.to_string();
        let mut path = String::new();
        let rest = &segments[2..];

        match (host, url.host_str()) {
            (VcsHost::GitHub, Some("codeload.github.com")) => {
                // codeload.github.com/<owner>/<repo>/tar.gz/<revision>
                if let Some(rev) = rest.get(1) {
                    revision = rev.to_string();
                }
            }
            _ => match rest {
                ["archive", archive, ..] => {
                    revision = archive
                        .trim_end_matches(".tar.gz")
                        .trim_end_matches(".zip")
                        .to_string();
                }
                ["tree", rev, sub_path @ ..] | ["-", "tree", rev, sub_path @ ..] => {
                    revision = rev.to_string();
                    path = sub_path.join("/");
                }
                _ => {}
            },
        }

        Some(Self {
            host,
            owner,
            repo,
            revision,
            path,
        })
    }
}

/// Rewrites SSH, scp-like and `git://` remote forms to plain https URLs
fn to_https(url: &str) -> String {
    let url = url.trim().trim_start_matches("git+");

    if let Some(rest) = url.strip_prefix("git@") {
        // scp-like syntax: git@github.com:owner/repo.git
        if let Some((host, path)) = rest.split_once(':') {
            return format!("https://{}/{}", host, path);
        }
    }

    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.strip_prefix("git@").unwrap_or(rest);
        return format!("https://{}", rest);
    }

    if let Some(rest) = url.strip_prefix("git://") {
        return format!("https://{}", rest);
    }

    url.to_string()
}

/// VcsInfo value object describing where the sources of a package live
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VcsInfo {
    pub vcs_type: VcsType,
    pub url: String,
    pub revision: String,
    pub path: String,
}

impl VcsInfo {
    pub fn new(
        vcs_type: VcsType,
        url: impl Into<String>,
        revision: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            vcs_type,
            url: url.into(),
            revision: revision.into(),
            path: path.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.url.trim().is_empty()
    }

    /// Infers VCS information from an arbitrary URL
    ///
    /// URLs on known hosts are reduced to the repository URL plus revision and
    /// path. Any other URL is returned unchanged with an unknown type (or Git if
    /// the URL clearly points at a Git remote).
    pub fn from_url(url: &str) -> Self {
        if url.trim().is_empty() {
            return Self::empty();
        }

        if let Some(hosted) = HostedRepository::parse(url) {
            return Self::new(
                VcsType::Git,
                hosted.host.repository_url(&hosted.owner, &hosted.repo),
                hosted.revision,
                hosted.path,
            );
        }

        let (base, fragment) = match url.split_once('#') {
            Some((base, fragment)) => (base, fragment),
            None => (url, ""),
        };

        if url.starts_with("git+") || url.starts_with("git://") || base.ends_with(".git") {
            return Self::new(VcsType::Git, to_https(base), fragment, "");
        }

        Self::new(VcsType::Unknown, url, "", "")
    }

    /// Combines two sources of VCS information field by field
    ///
    /// Non-empty fields of `self` win; empty ones are filled from `other`.
    pub fn merge(&self, other: &VcsInfo) -> VcsInfo {
        fn pick(preferred: &str, fallback: &str) -> String {
            if preferred.trim().is_empty() {
                fallback.to_string()
            } else {
                preferred.to_string()
            }
        }

        VcsInfo {
            vcs_type: if self.vcs_type == VcsType::Unknown {
                other.vcs_type
            } else {
                self.vcs_type
            },
            url: pick(&self.url, &other.url),
            revision: pick(&self.revision, &other.revision),
            path: pick(&self.path, &other.path),
        }
    }

    /// Returns a normalized copy, falling back to the homepage for the URL
    /// when the homepage points at a known hosting service
    pub fn normalized(&self, homepage_url: &str) -> VcsInfo {
        let mut vcs = if self.is_empty() && HostedRepository::parse(homepage_url).is_some() {
            let from_homepage = VcsInfo::from_url(homepage_url);
            VcsInfo {
                revision: self.revision.clone(),
                path: self.path.clone(),
                ..from_homepage
            }
        } else {
            self.clone()
        };

        if vcs.is_empty() {
            return vcs;
        }

        match HostedRepository::parse(&vcs.url) {
            Some(hosted) => {
                vcs.url = hosted.host.repository_url(&hosted.owner, &hosted.repo);
                vcs.vcs_type = VcsType::Git;
            }
            None => {
                vcs.url = to_https(&vcs.url).trim_end_matches('/').to_string();
            }
        }

        vcs
    }

    /// Archive download URL for this repository at its revision, if the host
    /// is known and a revision is set
    pub fn archive_download_url(&self) -> Option<String> {
        if self.revision.trim().is_empty() {
            return None;
        }

        let hosted = HostedRepository::parse(&self.url)?;
        Some(
            hosted
                .host
                .archive_url(&hosted.owner, &hosted.repo, &self.revision),
        )
    }
}
