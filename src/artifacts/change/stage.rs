/// Steps of a submission, in the order they run
///
/// `Validate → Precheck → (DirectCommit | BranchCreate → StageChange → OpenPr)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validate,
    Precheck,
    DirectCommit,
    BranchCreate,
    StageChange,
    OpenPr,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Precheck => "precheck",
            Stage::DirectCommit => "direct commit",
            Stage::BranchCreate => "branch create",
            Stage::StageChange => "stage change",
            Stage::OpenPr => "open pull request",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
