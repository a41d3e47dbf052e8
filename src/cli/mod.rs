//! cli
//!
//! The `cmdtree-demo` binary: a small remote-management tool built on the
//! default registry.
//!
//! # Commands
//!
//! ```text
//! cmdtree-demo [-v] remote [--timeout n] add [--fetch] <name> <url>
//! cmdtree-demo [-v] remote [--timeout n] remove <name>
//! cmdtree-demo [-v] status [--short]
//! cmdtree-demo legacy                      (deprecated, hidden)
//! ```
//!
//! `remote add` replays its arguments to its ancestors, so `-v` and
//! `--timeout` may also be given after `add`.

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::core::Command;
use crate::flags::{Flag, FlagSet};
use crate::global;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CMDTREE_LOG";

/// Run the demo with the process arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    global::reset();
    register()?;

    let args: Vec<String> = std::env::args().collect();
    debug!(args = ?args, "running demo");
    global::execute(&args)?;

    if verbose() {
        report();
    }
    Ok(())
}

fn verbose() -> bool {
    global::with_registry(|registry| {
        registry
            .root()
            .flags()
            .is_some_and(|flags| flags.get_bool("verbose") == Ok(true))
    })
}

/// Print the settings the invoked commands ended up with.
fn report() {
    global::with_registry(|registry| {
        let Some(remote) = registry.lookup("remote").filter(|c| c.is_active()) else {
            return;
        };
        if let Some(timeout) = remote.flags().and_then(|flags| flags.get_uint("timeout").ok()) {
            eprintln!("remote timeout {}s", timeout);
        }
    });
}

fn register() -> Result<()> {
    global::set_description("Demonstrates nested commands with per-level flags.");
    global::set_flags(
        FlagSet::new("cmdtree-demo")
            .with(Flag::bool("verbose", false).short('v').describe("Print more detail."))?,
    );
    global::set_callback(|command, _| {
        print!("{}", command.command_usage());
        Ok(())
    });

    global::command(
        "remote",
        "Manage remotes.",
        Some(
            FlagSet::new("remote")
                .with(Flag::uint("timeout", 30).describe("Seconds to wait for the server."))?,
        ),
    )?;
    global::with_command(&["remote"], |remote| -> Result<()> {
        let add = remote.command(
            "add",
            "Add a remote.",
            Some(
                FlagSet::new("add")
                    .with(Flag::bool("fetch", false).short('f').describe("Fetch after adding."))?,
            ),
        )?;
        add.set_recurse_arguments(true);
        add.set_callback(remote_add);

        remote
            .command("remove", "Remove a remote.", None)?
            .set_callback(|_, flags| match flags.args() {
                [name] => {
                    println!("removed {}", name);
                    Ok(())
                }
                _ => bail!("remove expects exactly one name"),
            });
        Ok(())
    })
    .context("remote command missing")??;

    global::command(
        "status",
        "Show status.",
        Some(FlagSet::new("status").with(Flag::bool("short", false).short('s').describe("Short format."))?),
    )?;
    global::with_command(&["status"], |status| {
        status.set_callback(|_, flags| {
            if flags.get_bool("short")? {
                println!("ok");
            } else {
                println!("everything is up to date");
            }
            Ok(())
        });
    })
    .context("status command missing")?;

    let mut legacy = Command::new("legacy", "Old entry point.", None);
    legacy.mark_deprecated();
    legacy.set_callback(|_, _| {
        println!("legacy done");
        Ok(())
    });
    global::add_command(legacy)?;

    Ok(())
}

fn remote_add(command: &Command, flags: &FlagSet) -> Result<()> {
    let [name, url] = flags.args() else {
        bail!("{} expects <name> <url>", command.name());
    };
    println!("added {} -> {}", name, url);
    if flags.get_bool("fetch")? {
        println!("fetching {}", name);
    }
    Ok(())
}
