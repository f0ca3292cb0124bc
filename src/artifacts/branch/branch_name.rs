use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use anyhow::Context;

const REF_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid branch name: {}", name);
        } else {
            Ok(Self(name))
        }
    }

    /// Parse a fully qualified ref such as `refs/heads/main`
    pub fn try_parse_ref(full_ref: &str) -> anyhow::Result<Self> {
        let name = full_ref.strip_prefix(REF_PREFIX).with_context(|| {
            format!("ref name must start with '{}', got '{}'", REF_PREFIX, full_ref)
        })?;

        Self::try_parse(name.to_string())
    }

    /// Fully qualified ref, as the hosting API expects when creating refs
    pub fn as_ref_path(&self) -> String {
        format!("{}{}", REF_PREFIX, self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
