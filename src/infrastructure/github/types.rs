use serde::Deserialize;

use crate::domain::models::RepositoryDescriptor;

/// Subset of the GitHub repository object the sync needs
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub clone_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl From<GitHubRepo> for RepositoryDescriptor {
    fn from(repo: GitHubRepo) -> Self {
        Self {
            name: repo.name,
            clone_url: repo.clone_url,
            default_branch: repo.default_branch,
        }
    }
}

/// Parse the `Link` header and return the `rel="next"` page number.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/repos?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn next_page_from_link(link_header: &str) -> Option<u32> {
    link_header.split(',').find_map(|part| {
        let mut url = None;
        let mut is_next = false;

        for segment in part.split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel) = segment.strip_prefix("rel=") {
                is_next = rel.trim_matches('"') == "next";
            }
        }

        if is_next {
            url.and_then(page_param)
        } else {
            None
        }
    })
}

/// Extract the `page` query parameter from a URL.
fn page_param(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}
