// Fake runtime launcher and debug proxy used by the coordinator tests.
//
// The launcher is a shell script that drops the `exec` subcommand and runs the
// helper with /bin/sh; the helper is a shell script standing in for
// BrowserDebugHost.dll. Each helper start appends a line to spawns.log.

use launcher_core::output::sink::OutputSink;
use launcher_core::{DEBUG_PROXY_BINARY, DEBUG_PROXY_FOLDER, StaticHostingContext};

use std::fs::{Permissions, create_dir_all, read_to_string, set_permissions, write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Mutex;

use tempfile::TempDir;

const LAUNCHER_SCRIPT: &str = "#!/bin/sh\n[ \"$1\" = exec ] && shift\nexec /bin/sh \"$@\"\n";

pub const STARTED: &str = "Application started. Press Ctrl+C to shut down.";

pub struct FakeInstall {
    pub dir: TempDir,
    launcher: PathBuf,
    spawn_log: PathBuf,
}

impl FakeInstall {
    /// An application root with a launcher but no helper binary.
    pub fn without_helper() -> Self {
        let dir = TempDir::new().unwrap();
        let launcher = dir.path().join("fake-dotnet");
        write(&launcher, LAUNCHER_SCRIPT).unwrap();
        set_permissions(&launcher, Permissions::from_mode(0o755)).unwrap();
        let spawn_log = dir.path().join("spawns.log");

        Self {
            dir,
            launcher,
            spawn_log,
        }
    }

    /// An application root whose helper runs `body` after recording its start.
    pub fn with_helper(body: &str) -> Self {
        let install = Self::without_helper();
        install.write_helper(body);
        install
    }

    /// A helper that writes its PID to [`pid_file`](Self::pid_file) and never becomes ready.
    pub fn with_hung_helper_recording_pid() -> Self {
        let install = Self::without_helper();
        let body = format!(
            "echo $$ > '{pid}'\nexec sleep 5",
            pid = install.pid_file().display()
        );
        install.write_helper(&body);
        install
    }

    fn write_helper(&self, body: &str) {
        let folder = self.dir.path().join(DEBUG_PROXY_FOLDER);
        create_dir_all(&folder).unwrap();

        let script = format!(
            "echo started >> '{spawn_log}'\n{body}\n",
            spawn_log = self.spawn_log.display()
        );
        write(folder.join(DEBUG_PROXY_BINARY), script).unwrap();
    }

    pub fn host(&self) -> StaticHostingContext {
        StaticHostingContext::new("SampleApp", self.dir.path())
            .with_runtime_launcher(self.launcher.clone())
    }

    pub fn pid_file(&self) -> PathBuf {
        self.dir.path().join("helper.pid")
    }

    pub fn helper_pid(&self) -> u32 {
        read_to_string(self.pid_file())
            .unwrap()
            .trim()
            .parse()
            .unwrap()
    }

    /// Number of times the helper script actually ran.
    pub fn helper_starts(&self) -> usize {
        read_to_string(&self.spawn_log)
            .map(|contents| contents.lines().count())
            .unwrap_or(0)
    }
}

/// `kill -0`: true while a process with `pid` exists.
pub fn process_alive(pid: u32) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("kill -0 {pid} 2>/dev/null"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

pub fn kill_process(pid: u32) {
    let _ = Command::new("sh")
        .arg("-c")
        .arg(format!("kill {pid} 2>/dev/null"))
        .status();
}

#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn display(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
