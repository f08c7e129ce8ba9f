//! Repository path handling and the browsing path stack.

/// Collapse leading, trailing and repeated slashes. The root is `""`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a child name onto a parent path without producing a leading slash
/// at the root.
pub fn join_path(parent: &str, name: &str) -> String {
    let parent = normalize_path(parent);
    let name = normalize_path(name);
    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name,
        (false, true) => parent,
        (false, false) => format!("{parent}/{name}"),
    }
}

/// Current directory while browsing, kept as path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack {
    segments: Vec<String>,
}

/// One breadcrumb: the label shown and the path it leads back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
    pub depth: usize,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn current(&self) -> String {
        self.segments.join("/")
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Descend into `name`, which may itself contain slashes.
    pub fn enter(&mut self, name: &str) {
        self.segments.extend(
            name.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }

    /// Pop one level. Returns `false` when already at the root.
    pub fn up(&mut self) -> bool {
        self.segments.pop().is_some()
    }

    /// Truncate to `depth` segments (0 = root). Depths past the end are ignored.
    pub fn jump_to(&mut self, depth: usize) {
        self.segments.truncate(depth);
    }

    pub fn reset(&mut self) {
        self.segments.clear();
    }

    pub fn child_path(&self, name: &str) -> String {
        join_path(&self.current(), name)
    }

    /// Root crumb followed by one crumb per segment.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "/".to_string(),
            path: String::new(),
            depth: 0,
        }];
        for (i, segment) in self.segments.iter().enumerate() {
            crumbs.push(Breadcrumb {
                label: segment.clone(),
                path: self.segments[..=i].join("/"),
                depth: i + 1,
            });
        }
        crumbs
    }
}
