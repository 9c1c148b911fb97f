//! `my_edit` command: open a file in the editor

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Command, CommandContext, CommandLine, TabContext};

pub struct MyEdit;

#[async_trait(?Send)]
impl Command for MyEdit {
    fn name(&self) -> &'static str {
        "my_edit"
    }

    fn usage(&self) -> &'static str {
        ":my_edit <filename>\n\
         \n\
         Open a file in the editor. Without a filename the selected file is used."
    }

    async fn execute(&self, line: &CommandLine, ctx: &mut CommandContext<'_>) {
        let target = if line.arg(1).is_empty() {
            match ctx.host.selected_file() {
                Some(path) => path,
                None => {
                    ctx.host.error("No file selected. Usage: my_edit <filename>");
                    return;
                }
            }
        } else {
            PathBuf::from(shellexpand::tilde(line.rest(1).trim_end()).as_ref())
        };

        ctx.host.info(&format!("Let's edit the file {}!", target.display()));

        // Relative names are relative to the host's directory, not the process's
        let target = ctx.host.current_dir().join(target);
        if !target.exists() {
            ctx.host.error("The given file does not exist!");
            return;
        }

        ctx.host.edit_file(&target);
    }

    fn tab(&self, line: &CommandLine, ctx: &TabContext<'_>) -> Vec<String> {
        directory_content(line.rest(1), ctx.cwd)
            .into_iter()
            .map(|entry| format!("{} {}", self.name(), entry))
            .collect()
    }
}

/// Entries of the directory named by `partial` that start with its last component
fn directory_content(partial: &str, cwd: &Path) -> Vec<String> {
    let (dir, prefix) = match partial.rfind('/') {
        Some(i) => (&partial[..=i], &partial[i + 1..]),
        None => ("", partial),
    };

    let base = if dir.is_empty() {
        cwd.to_path_buf()
    } else {
        let expanded = PathBuf::from(shellexpand::tilde(dir).as_ref());
        if expanded.is_absolute() {
            expanded
        } else {
            cwd.join(expanded)
        }
    };

    let Ok(entries) = std::fs::read_dir(&base) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            if !name.starts_with(prefix) || (name.starts_with('.') && !prefix.starts_with('.')) {
                return None;
            }
            let suffix = if e.path().is_dir() { "/" } else { "" };
            Some(format!("{}{}{}", dir, name, suffix))
        })
        .collect();

    names.sort();
    names
}
