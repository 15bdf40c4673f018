use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let status = self.status_report().initialize()?;

        self.print_branches(&status)?;
        self.print_section(
            "Staged Files",
            status.staged_files.iter().map(|name| name.green().to_string()),
        )?;
        self.print_section(
            "Removed Files",
            status.removed_files.iter().map(|name| name.red().to_string()),
        )?;
        self.print_section(
            "Modifications Not Staged For Commit",
            status
                .workspace_changeset
                .iter()
                .map(|(name, change)| format!("{} ({})", name, change.colored())),
        )?;
        self.print_section("Untracked Files", status.untracked_files.iter().cloned())?;

        Ok(())
    }

    fn print_branches(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Branches ===")?;
        for branch in &status.branches {
            if branch == &status.head {
                writeln!(self.writer(), "*{}", branch.as_ref().green())?;
            } else {
                writeln!(self.writer(), "{}", branch)?;
            }
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_section(
        &self,
        title: &str,
        lines: impl Iterator<Item = String>,
    ) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== {} ===", title)?;
        for line in lines {
            writeln!(self.writer(), "{}", line)?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
