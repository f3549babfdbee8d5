//! The process command surface: built-ins, configured commands, plugin
//! commands, and namespaced sub-application command groups.

use crate::component::Command;
use crate::context::AppContext;
use crate::error::ComposeError;
use anyhow::bail;
use fxhash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

/// Built-in commands, always present on the surface.
pub const BUILTIN_COMMANDS: &[&str] = &["run", "routes", "config"];

/// What the dispatcher decided: hand control to the server loop, or the
/// invocation was handled in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliAction {
    Serve,
    Handled,
}

/// The assembled CLI: one clap root command plus the handler map.
pub struct CommandSurface {
    root: clap::Command,
    names: FxHashSet<String>,
    handlers: FxHashMap<String, Arc<dyn Command>>,
}

impl CommandSurface {
    pub(crate) fn new(namespace: &str) -> Self {
        let root = clap::Command::new(namespace.to_owned())
            .about("Composed application")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(clap::Command::new("run").about("Start the HTTP server"))
            .subcommand(clap::Command::new("routes").about("Print the committed route table"))
            .subcommand(clap::Command::new("config").about("Print the effective settings"));

        let names = BUILTIN_COMMANDS.iter().map(|&n| n.to_owned()).collect();
        Self { root, names, handlers: FxHashMap::default() }
    }

    /// Registers one top-level command.
    ///
    /// # Errors
    /// [`ComposeError::DuplicateCommand`] when the name is already taken
    /// (including by a built-in).
    pub(crate) fn register(&mut self, cmd: Arc<dyn Command>) -> Result<(), ComposeError> {
        let name = cmd.name().to_owned();
        if !self.names.insert(name.clone()) {
            return Err(ComposeError::DuplicateCommand { name });
        }
        self.root = self.root.clone().subcommand(cmd.clap().name(name.clone()));
        self.handlers.insert(name, cmd);
        Ok(())
    }

    /// Attaches a sub-application's command set under one namespaced group.
    ///
    /// # Errors
    /// [`ComposeError::DuplicateCommand`] when the group name or a command
    /// inside it is already taken.
    pub(crate) fn mount(
        &mut self,
        name: &str,
        help: Option<&str>,
        commands: Vec<Arc<dyn Command>>,
    ) -> Result<(), ComposeError> {
        if !self.names.insert(name.to_owned()) {
            return Err(ComposeError::DuplicateCommand { name: name.to_owned() });
        }

        let mut group = clap::Command::new(name.to_owned());
        if let Some(help) = help {
            group = group.about(help.to_owned());
        }
        for cmd in commands {
            let key = format!("{name}.{}", cmd.name());
            if self.handlers.contains_key(&key) {
                return Err(ComposeError::DuplicateCommand { name: key });
            }
            group = group.subcommand(cmd.clap().name(cmd.name().to_owned()));
            self.handlers.insert(key, cmd);
        }
        self.root = self.root.clone().subcommand(group);
        Ok(())
    }

    /// The clap declaration, ready for `get_matches`.
    #[must_use]
    pub fn clap(&self) -> clap::Command {
        self.root.clone()
    }

    /// Whether a top-level command (built-in, configured, plugin, or mounted
    /// group) with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Sorted top-level command names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Routes a parsed invocation to its handler.
    ///
    /// # Errors
    /// Unknown subcommands and handler failures surface to the entry point.
    pub fn dispatch(&self, ctx: &AppContext, matches: &clap::ArgMatches) -> anyhow::Result<CliAction> {
        match matches.subcommand() {
            Some(("run", _)) => Ok(CliAction::Serve),
            Some(("routes", _)) => {
                print_routes(ctx);
                Ok(CliAction::Handled)
            },
            Some(("config", _)) => {
                print_config(ctx);
                Ok(CliAction::Handled)
            },
            Some((name, sub)) => {
                if let Some(handler) = self.handlers.get(name) {
                    handler.run(ctx, sub)?;
                    return Ok(CliAction::Handled);
                }
                // A mounted group: the actual command is one level deeper.
                if let Some((inner, inner_matches)) = sub.subcommand()
                    && let Some(handler) = self.handlers.get(&format!("{name}.{inner}"))
                {
                    handler.run(ctx, inner_matches)?;
                    return Ok(CliAction::Handled);
                }
                bail!("unknown command `{name}`")
            },
            None => Ok(CliAction::Handled),
        }
    }
}

impl fmt::Debug for CommandSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSurface").field("names", &self.names()).finish_non_exhaustive()
    }
}

#[allow(clippy::print_stdout)]
fn print_routes(ctx: &AppContext) {
    for record in ctx.routes().records() {
        println!("{record}");
    }
    for point in ctx.mounts().points() {
        println!("{:<28} {:<24} {} [mount]", point.name, "*", point.prefix);
    }
}

#[allow(clippy::print_stdout)]
fn print_config(ctx: &AppContext) {
    println!("environment: {}", ctx.environment());
    println!("{:#?}", ctx.settings());
}
