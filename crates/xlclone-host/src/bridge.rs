//! Spawning and line-framed JSON transport for the WINE bridge subprocess.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use xlclone_host_protocol::{Command, Request, Response, ResponseData, ResponseResult};

/// Transport and host-side failures surfaced by the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("could not spawn the WINE bridge process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("bridge process is not running")]
    NotRunning,

    #[error("sending a command to the bridge failed: {0}")]
    SendFailed(String),

    #[error("reading a response from the bridge failed: {0}")]
    ReadFailed(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("bridge reported an error: {0}")]
    BridgeError(String),

    #[error("bridge sent unexpected response data")]
    UnexpectedResponse,

    #[error("WINE not found; install WINE and put 'wine' on PATH")]
    WineNotFound,

    #[error("bridge executable not found at: {0}")]
    BridgeExeNotFound(String),
}

/// Where to find the bridge exe and how to run it under WINE.
pub struct ExcelBridgeConfig {
    /// Path to the `xlclone-host-bridge.exe` Windows executable.
    /// When `None`, probed next to the current binary and under `target/`.
    pub bridge_exe_path: Option<PathBuf>,

    /// WINE binary to run the bridge with; `wine` from `PATH` by default.
    pub wine_path: PathBuf,

    /// WINEPREFIX for the subprocess, when a dedicated prefix is wanted.
    pub wine_prefix: Option<PathBuf>,

    /// Whether the bridge may launch a hidden Excel instance when no
    /// running one can be attached. Off by default: single-document cloning
    /// only makes sense against the instance that has the document open.
    pub allow_launch: bool,
}

impl Default for ExcelBridgeConfig {
    fn default() -> Self {
        Self {
            bridge_exe_path: None,
            wine_path: PathBuf::from("wine"),
            wine_prefix: None,
            allow_launch: false,
        }
    }
}

/// The transport handle for the bridge process: subprocess lifecycle plus
/// one-request-one-response JSON framing.
pub struct ExcelBridge {
    child: Mutex<Child>,
    stdin: Mutex<std::process::ChildStdin>,
    stdout: Mutex<BufReader<std::process::ChildStdout>>,
    next_id: AtomicU64,
}

impl ExcelBridge {
    /// Start the bridge process. No command is sent yet; callers follow up
    /// with [`Command::Connect`] before anything else.
    pub fn start(config: &ExcelBridgeConfig) -> Result<Self, BridgeError> {
        let exe_path = config
            .bridge_exe_path
            .clone()
            .unwrap_or_else(find_bridge_exe);

        if !exe_path.exists() {
            return Err(BridgeError::BridgeExeNotFound(
                exe_path.display().to_string(),
            ));
        }

        let mut cmd = std::process::Command::new(&config.wine_path);

        if let Some(prefix) = &config.wine_prefix {
            cmd.env("WINEPREFIX", prefix);
        }

        cmd.arg(&exe_path);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::inherit()); // Bridge diagnostics go to our stderr

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BridgeError::WineNotFound
            } else {
                BridgeError::SpawnFailed(e)
            }
        })?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");

        Ok(Self {
            child: Mutex::new(child),
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(BufReader::new(stdout)),
            next_id: AtomicU64::new(1),
        })
    }

    /// Send one command and block until its response line comes back.
    pub fn send_command(&self, command: Command) -> Result<Option<ResponseData>, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let request = Request { id, command };
        let json = serde_json::to_string(&request)?;

        {
            let mut stdin = self.stdin.lock().unwrap();
            writeln!(stdin, "{json}").map_err(|e| BridgeError::SendFailed(e.to_string()))?;
            stdin
                .flush()
                .map_err(|e| BridgeError::SendFailed(e.to_string()))?;
        }

        let response: Response = {
            let mut stdout = self.stdout.lock().unwrap();
            let mut line = String::new();
            stdout
                .read_line(&mut line)
                .map_err(|e| BridgeError::ReadFailed(e.to_string()))?;

            if line.is_empty() {
                return Err(BridgeError::NotRunning);
            }

            serde_json::from_str(&line)?
        };

        match response.result {
            ResponseResult::Ok { data } => Ok(data),
            ResponseResult::Error { message } => Err(BridgeError::BridgeError(message)),
        }
    }

    /// Shut down the bridge and wait for the process to exit.
    pub fn shutdown(self) -> Result<(), BridgeError> {
        let _ = self.send_command(Command::Shutdown);

        let mut child = self.child.lock().unwrap();
        let _ = child.wait();

        Ok(())
    }
}

/// Rewrite a Linux path as the Windows path WINE exposes it at.
///
/// WINE maps `/` to `Z:\`, so `/home/user/file.xlsx` becomes
/// `Z:\home\user\file.xlsx`. The WINE prefix's `drive_c` maps to `C:\`.
pub fn linux_to_wine_path(linux_path: &Path) -> String {
    let abs = if linux_path.is_absolute() {
        linux_path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(linux_path)
    };

    // Everything under / shows up on drive Z:
    format!("Z:{}", abs.display()).replace('/', "\\")
}

/// Probe the usual locations for the bridge exe.
fn find_bridge_exe() -> PathBuf {
    // Alongside whatever binary is running
    if let Ok(mut exe) = std::env::current_exe() {
        exe.pop();
        let candidate = exe.join("xlclone-host-bridge.exe");
        if candidate.exists() {
            return candidate;
        }
    }

    // Cross-compile output dirs, for running from a checkout
    let target_path = PathBuf::from("target/x86_64-pc-windows-gnu/release/xlclone-host-bridge.exe");
    if target_path.exists() {
        return target_path;
    }

    let target_path = PathBuf::from("target/x86_64-pc-windows-gnu/debug/xlclone-host-bridge.exe");
    if target_path.exists() {
        return target_path;
    }

    // Last resort: current directory
    PathBuf::from("xlclone-host-bridge.exe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linux_to_wine_path() {
        assert_eq!(
            linux_to_wine_path(Path::new("/tmp/book.xlsx")),
            "Z:\\tmp\\book.xlsx"
        );
        assert_eq!(
            linux_to_wine_path(Path::new("/home/user/My Files/book.xlsx")),
            "Z:\\home\\user\\My Files\\book.xlsx"
        );
    }

    #[test]
    fn test_linux_to_wine_path_relative() {
        let wine = linux_to_wine_path(Path::new("book.xlsx"));
        assert!(wine.starts_with("Z:\\"));
        assert!(wine.ends_with("\\book.xlsx"));
    }
}
