/// Turns CMS asset paths into absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    host: String,
}

impl MediaResolver {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.trim().trim_end_matches('/').to_string(),
        }
    }

    /// `None` for missing or blank input; absolute (`http…`, `//…`) URLs pass
    /// through; anything else is joined onto the CMS host.
    pub fn resolve(&self, path: Option<&str>) -> Option<String> {
        let path = path?.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http") || path.starts_with("//") {
            return Some(path.to_string());
        }
        if path.starts_with('/') {
            Some(format!("{}{path}", self.host))
        } else {
            Some(format!("{}/{path}", self.host))
        }
    }
}
