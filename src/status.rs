/// Snapshot of `git status --porcelain` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    raw: String,
}

/// One line of porcelain status: a two-letter code and the path it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: String,
    pub path: String,
}

impl WorkingTreeStatus {
    pub fn new(raw: String) -> Self {
        Self { raw }
    }

    /// True when there is nothing to commit.
    pub fn is_clean(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn entries(&self) -> Vec<StatusEntry> {
        self.raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                // Porcelain v1 lines are "XY <path>"; renames read "XY <from> -> <to>"
                let (code, path) = match (line.get(..2), line.get(3..)) {
                    (Some(code), Some(path)) => (code, path),
                    _ => (line, ""),
                };
                StatusEntry {
                    code: code.trim().to_string(),
                    path: path.to_string(),
                }
            })
            .collect()
    }
}
