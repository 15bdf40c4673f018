use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Parents};
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// History of the head branch, following primary parents only
    pub fn log(&self) -> anyhow::Result<()> {
        let head_oid = self.refs().head_oid()?.clone();

        for commit in self.database().first_parent_history(head_oid) {
            self.display_commit(&commit?)?;
        }

        Ok(())
    }

    /// Every commit ever made, in no particular order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit in self.database().all_commits()? {
            self.display_commit(&commit?)?;
        }

        Ok(())
    }

    pub fn display_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit.oid()).yellow()
        )?;
        if let Parents::Merge {
            parent,
            secondary_parent,
        } = commit.parents()
        {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                parent.to_short_oid(),
                secondary_parent.to_short_oid()
            )?;
        }
        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
