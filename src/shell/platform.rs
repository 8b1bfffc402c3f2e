//! Platform detection helpers.

use super::command::{execute, CommandOptions};

/// Shell used to run command strings.
///
/// Always a POSIX `sh` rather than `$SHELL`: package listings must not pick
/// up output from interactive rc files.
pub fn detect_shell() -> String {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        "/bin/sh".to_string()
    }
}

/// Get the flag to pass commands to the shell.
pub fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-c"
    }
}

/// Name of the OS user this process runs as.
///
/// Resolved from the process uid with `id -un`. `USER` then `LOGNAME` are
/// consulted only when that lookup fails, since both survive `su`.
pub fn current_username() -> Option<String> {
    resolve_username(uid_username, |key| std::env::var(key))
}

fn uid_username() -> Option<String> {
    let result = execute("id -un", &CommandOptions::default()).ok()?;
    let name = result.stdout_text().trim().to_string();
    (result.success && !name.is_empty()).then_some(name)
}

/// Resolve the current user with custom uid and env var lookups.
///
/// This allows testing without modifying actual environment variables.
pub fn resolve_username<U, F>(uid_fn: U, env_fn: F) -> Option<String>
where
    U: FnOnce() -> Option<String>,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Some(name) = uid_fn() {
        return Some(name);
    }

    ["USER", "LOGNAME"].into_iter().find_map(|key| {
        env_fn(key)
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    })
}
