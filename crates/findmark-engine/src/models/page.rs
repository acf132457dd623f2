use relative_path::{RelativePath, RelativePathBuf};

/// A markdown page with its relative path, display name and route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    relative_path: RelativePathBuf,
    display_name: String,
    route: String,
}

impl Page {
    /// Create a new Page from a relative path
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = Self::extract_display_name(&relative_path);
        let route = Self::route_for(&relative_path);

        Self {
            relative_path,
            display_name,
            route,
        }
    }

    /// Create from a relative path string
    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the .md extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// URL-style route: `index.md` is `/`, `work/art.md` is `/work/art`
    pub fn route(&self) -> &str {
        &self.route
    }

    fn extract_display_name(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }

    fn route_for(path: &RelativePath) -> String {
        let path_str = path.as_str();
        let without_ext = path_str.strip_suffix(".md").unwrap_or(path_str);
        let trimmed = if without_ext == "index" {
            ""
        } else {
            without_ext.strip_suffix("/index").unwrap_or(without_ext)
        };
        format!("/{trimmed}")
    }
}

impl From<RelativePathBuf> for Page {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for Page {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("index.md", "/")]
    #[case("frontend-projects.md", "/frontend-projects")]
    #[case("work/art.md", "/work/art")]
    #[case("work/index.md", "/work")]
    #[case("reindex.md", "/reindex")]
    fn routes_from_paths(#[case] path: &str, #[case] route: &str) {
        assert_eq!(Page::from(path).route(), route);
    }

    #[test]
    fn display_name_strips_extension() {
        let page = Page::from("work/frontend-projects.md");
        assert_eq!(page.display_name(), "frontend-projects");
        assert_eq!(page.relative_path().as_str(), "work/frontend-projects.md");
    }
}
