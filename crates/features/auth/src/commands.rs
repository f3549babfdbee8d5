//! CLI commands contributed by the auth slice.

use crate::store::UserStore;
use anyhow::{Context, bail};
use clap::{Arg, ArgMatches};
use manifold_kernel::prelude::{AppContext, Command};
use std::sync::Arc;
use tracing::info;

/// `create-user`: inserts a pre-confirmed account directly into the store.
#[derive(Debug, Clone)]
pub struct CreateUser {
    store: Arc<UserStore>,
}

impl CreateUser {
    pub(crate) fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }
}

impl Command for CreateUser {
    fn name(&self) -> &str {
        "create-user"
    }

    fn clap(&self) -> clap::Command {
        clap::Command::new("create-user")
            .about("Create a confirmed account")
            .arg(Arg::new("username").long("username").required(true))
            .arg(Arg::new("email").long("email").required(true))
            .arg(Arg::new("password").long("password").required(true))
    }

    fn run(&self, _ctx: &AppContext, matches: &ArgMatches) -> anyhow::Result<()> {
        let username = matches.get_one::<String>("username").context("--username is required")?;
        let email = matches.get_one::<String>("email").context("--email is required")?;
        let password = matches.get_one::<String>("password").context("--password is required")?;

        if !self.store.insert(username, email, password) {
            bail!("account `{email}` already exists");
        }
        self.store.confirm(email);
        info!(%email, "account created");
        Ok(())
    }
}
