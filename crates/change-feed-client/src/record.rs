/// Kind of change reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// An existing page was modified (`type: "edit"`).
    Edit,
    /// A page was created (`type: "new"`).
    Created,
}

impl ChangeKind {
    /// Map the feed's `type` field; `None` for anything unrecognized.
    pub fn from_feed(value: &str) -> Option<Self> {
        match value {
            "edit" => Some(ChangeKind::Edit),
            "new" => Some(ChangeKind::Created),
            _ => None,
        }
    }
}

/// One reported modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// When the change happened, seconds since epoch.
    pub timestamp: u64,
    pub kind: ChangeKind,
    /// User who made the change.
    pub actor: String,
    /// Affected page title.
    pub subject: String,
    /// Edit summary; never `Some("")`.
    pub annotation: Option<String>,
}

impl ChangeRecord {
    pub fn new(
        timestamp: u64,
        kind: ChangeKind,
        actor: impl Into<String>,
        subject: impl Into<String>,
        annotation: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            actor: actor.into(),
            subject: subject.into(),
            annotation: annotation.filter(|a| !a.is_empty()),
        }
    }
}
