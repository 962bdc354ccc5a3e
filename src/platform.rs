use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use tracing::{debug, info, warn};

/// What the host platform can do with a freshly exported file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformCapabilities {
    pub can_reveal_in_folder: bool,
    pub can_invoke_share_sheet: bool,
}

/// Advisory follow-up after a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostExportAction {
    OpenContainingFolder(PathBuf),
    InvokeShareSheet(PathBuf),
}

impl PostExportAction {
    /// Pick the follow-up for `path`. Sharing wins where it is available.
    pub fn for_capabilities(capabilities: PlatformCapabilities, path: &Path) -> Option<Self> {
        if capabilities.can_invoke_share_sheet {
            Some(PostExportAction::InvokeShareSheet(path.to_path_buf()))
        } else if capabilities.can_reveal_in_folder {
            Some(PostExportAction::OpenContainingFolder(path.to_path_buf()))
        } else {
            None
        }
    }

    /// Share sheets open right after the export; revealing the folder
    /// waits for the user to ask for it.
    pub fn runs_automatically(&self) -> bool {
        matches!(self, PostExportAction::InvokeShareSheet(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            PostExportAction::OpenContainingFolder(path) => path,
            PostExportAction::InvokeShareSheet(path) => path,
        }
    }
}

/// Native actions offered by the host platform
pub trait PlatformActions: Send + Sync {
    fn capabilities(&self) -> PlatformCapabilities;

    /// Show `path` in the native file browser
    fn reveal_in_folder(&self, path: &Path) -> Result<(), String>;

    /// Present the native share/export UI for `path`
    fn invoke_share_sheet(&self, path: &Path) -> Result<(), String>;

    fn perform(&self, action: &PostExportAction) -> Result<(), String> {
        match action {
            PostExportAction::OpenContainingFolder(path) => self.reveal_in_folder(path),
            PostExportAction::InvokeShareSheet(path) => self.invoke_share_sheet(path),
        }
    }
}

/// Desktop file browsers: can reveal, cannot share
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPlatform;

impl DesktopPlatform {
    #[cfg(target_os = "macos")]
    fn reveal_command(path: &Path) -> Command {
        let mut command = Command::new("open");
        command.arg("-R").arg(path);
        command
    }

    #[cfg(target_os = "windows")]
    fn reveal_command(path: &Path) -> Command {
        let mut command = Command::new("explorer");
        command.arg(format!("/select,{}", path.display()));
        command
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn reveal_command(path: &Path) -> Command {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut command = Command::new("xdg-open");
        command.arg(dir);
        command
    }
}

impl PlatformActions for DesktopPlatform {
    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities {
            can_reveal_in_folder: true,
            can_invoke_share_sheet: false,
        }
    }

    fn reveal_in_folder(&self, path: &Path) -> Result<(), String> {
        info!("Revealing {} in file browser", path.display());
        spawn_reaped(Self::reveal_command(path))
            .map(|_| ())
            .map_err(|e| format!("Failed to open file browser: {}", e))
    }

    fn invoke_share_sheet(&self, path: &Path) -> Result<(), String> {
        warn!("Share sheet requested for {} on desktop", path.display());
        Err("Sharing is not available on this platform".to_string())
    }
}

/// Start `command` and reap it on a detached thread
fn spawn_reaped(mut command: Command) -> io::Result<thread::JoinHandle<()>> {
    let mut child = command.spawn()?;
    Ok(thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => debug!("File browser exited with {}", status),
        Ok(_) => {}
        Err(e) => warn!("Failed to wait for file browser: {}", e),
    }))
}

/// No native UI at all (command line, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl PlatformActions for HeadlessPlatform {
    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities::default()
    }

    fn reveal_in_folder(&self, _path: &Path) -> Result<(), String> {
        Err("No file browser available".to_string())
    }

    fn invoke_share_sheet(&self, _path: &Path) -> Result<(), String> {
        Err("Sharing is not available on this platform".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_preferred_over_reveal() {
        let caps = PlatformCapabilities {
            can_reveal_in_folder: true,
            can_invoke_share_sheet: true,
        };
        let action = PostExportAction::for_capabilities(caps, Path::new("/out/a.gmd"));
        assert_eq!(
            action,
            Some(PostExportAction::InvokeShareSheet(PathBuf::from("/out/a.gmd")))
        );
    }

    #[test]
    fn test_only_share_runs_automatically() {
        assert!(PostExportAction::InvokeShareSheet(PathBuf::from("a.gmd")).runs_automatically());
        assert!(!PostExportAction::OpenContainingFolder(PathBuf::from("a.gmd")).runs_automatically());
    }

    #[test]
    fn test_desktop_reveals() {
        let action =
            PostExportAction::for_capabilities(DesktopPlatform.capabilities(), Path::new("a.gmd"));
        assert_eq!(
            action,
            Some(PostExportAction::OpenContainingFolder(PathBuf::from("a.gmd")))
        );
    }

    #[test]
    fn test_headless_has_no_action() {
        let action =
            PostExportAction::for_capabilities(HeadlessPlatform.capabilities(), Path::new("a.gmd"));
        assert_eq!(action, None);
        assert!(HeadlessPlatform.invoke_share_sheet(Path::new("a.gmd")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_spawned_command_is_waited_for() {
        let waiter = spawn_reaped(Command::new("true")).unwrap();
        // Joins only once wait() has collected the exit status
        waiter.join().unwrap();
    }

    #[test]
    fn test_missing_program_is_an_error() {
        assert!(spawn_reaped(Command::new("gmd-transfer-no-such-program")).is_err());
    }
}
