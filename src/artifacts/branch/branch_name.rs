use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::errors::{GitletError, UsageError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(GitletError::from(UsageError::InvalidBranchName(name)).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(GitletError::from(UsageError::InvalidBranchName(name)).into())
        } else {
            Ok(Self(name))
        }
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl TryFrom<String> for BranchName {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_parse(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

impl Borrow<str> for BranchName {
    fn borrow(&self) -> &str {
        &self.0
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("master")]
    #[case("feature/login")]
    #[case("fix-123")]
    #[case("other")]
    fn accepts_valid_names(#[case] name: &str) {
        assert!(BranchName::try_parse(name.to_string()).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("a..b")]
    #[case("trailing/")]
    #[case("with space")]
    #[case("name.lock")]
    #[case("star*")]
    fn rejects_invalid_names(#[case] name: &str) {
        let error = BranchName::try_parse(name.to_string()).unwrap_err();

        assert_eq!(
            error.downcast_ref::<GitletError>(),
            Some(&GitletError::Usage(UsageError::InvalidBranchName(
                name.to_string()
            )))
        );
    }

    #[test]
    fn default_branch_is_master() {
        assert_eq!(BranchName::default().as_ref(), "master");
    }
}
