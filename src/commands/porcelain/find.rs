use crate::areas::repository::Repository;
use crate::errors::{GitletError, NotFound};
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for commit in self.database().all_commits()? {
            let commit = commit?;
            if commit.message() == message {
                writeln!(self.writer(), "{}", commit.oid())?;
                found = true;
            }
        }

        if !found {
            return Err(GitletError::from(NotFound::MessageNotFound(message.to_string())).into());
        }

        Ok(())
    }
}
