//! Administrative CLI for the user and device registry.
//!
//! # Responsibility
//! - Collect raw field strings from the command line and hand them to the
//!   core services unchanged.
//! - Render returned entities, or the error's human-readable reason.
//!
//! # Invariants
//! - Never writes to the store directly; every mutation goes through the
//!   core validation and uniqueness checks.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, DeviceArgs, DeviceCommand, LookupArgs, UserCommand};
use log::info;
use registry_core::model::entity::normalize_identity;
use registry_core::{
    core_version, default_log_level, init_logging, open_db, DeviceDraft, DeviceService,
    SqliteDeviceRepository, SqliteUserRepository, UserService,
};
use rusqlite::Connection;
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(effective_log_level(&cli), cli.log_dir.as_deref())
        .map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::Version => {
            println!("registry_core version={}", core_version());
            Ok(())
        }
        Command::User(command) => run_user(&mut open(&cli.db)?, command),
        Command::Device(command) => run_device(&mut open(&cli.db)?, command),
    }
}

fn effective_log_level(cli: &Cli) -> &str {
    cli.log_level.as_deref().unwrap_or(default_log_level())
}

fn open(path: &Path) -> Result<Connection> {
    let conn = open_db(path)
        .with_context(|| format!("failed to open database `{}`", path.display()))?;
    info!("event=cli_open module=cli status=ok");
    Ok(conn)
}

fn run_user(conn: &mut Connection, command: UserCommand) -> Result<()> {
    let mut service = UserService::new(SqliteUserRepository::try_new(conn)?);

    match command {
        UserCommand::Add { email, name } => {
            let user = service.create_user(&email, &name)?;
            println!("created user {user}");
        }
        UserCommand::List { json } => {
            print_all(&service.list_users()?, json, "no users registered")?;
        }
        UserCommand::Show(LookupArgs { by, value, json }) => {
            match service.find_user(&by, &value)? {
                Some(user) => print_one(&user, json)?,
                None => bail!("no user with {by} `{value}`"),
            }
        }
        UserCommand::Update { email, name } => {
            let user = service.rename_user(&email, &name)?;
            println!("updated user {user}");
        }
        UserCommand::Delete { email } => {
            if service.delete_user(&email)? {
                println!("deleted user {}", normalize_identity(&email));
            } else {
                println!("no user {}; nothing to delete", normalize_identity(&email));
            }
        }
    }
    Ok(())
}

fn run_device(conn: &mut Connection, command: DeviceCommand) -> Result<()> {
    let mut service = DeviceService::new(SqliteDeviceRepository::try_new(conn)?);

    match command {
        DeviceCommand::Add(args) => {
            let device = service.create_device(&draft(args))?;
            println!("created device {device}");
        }
        DeviceCommand::List { json } => {
            print_all(&service.list_devices()?, json, "no devices registered")?;
        }
        DeviceCommand::Show(LookupArgs { by, value, json }) => {
            match service.find_device(&by, &value)? {
                Some(device) => print_one(&device, json)?,
                None => bail!("no device with {by} `{value}`"),
            }
        }
        DeviceCommand::Update(args) => {
            let device = service.update_device(&draft(args))?;
            println!("updated device {device}");
        }
        DeviceCommand::Delete { id } => {
            if service.delete_device(&id)? {
                println!("deleted device {}", normalize_identity(&id));
            } else {
                println!("no device {}; nothing to delete", normalize_identity(&id));
            }
        }
    }
    Ok(())
}

fn draft(args: DeviceArgs) -> DeviceDraft {
    DeviceDraft {
        id: args.id,
        name: args.name,
        device_type: args.device_type,
        location: args.location,
        status: args.status,
        remarks: args.remarks,
    }
}

fn print_one<T: Serialize + Display>(item: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{item}");
    }
    Ok(())
}

fn print_all<T: Serialize + Display>(items: &[T], json: bool, empty_message: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("{empty_message}");
    } else {
        for item in items {
            println!("{item}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::effective_log_level;
    use crate::cli::Cli;
    use clap::Parser;
    use registry_core::default_log_level;

    #[test]
    fn log_level_falls_back_to_build_default() {
        let cli = Cli::try_parse_from(["registry", "version"]).unwrap();
        if cli.log_level.is_none() {
            assert_eq!(effective_log_level(&cli), default_log_level());
        }

        let cli = Cli::try_parse_from(["registry", "--log-level", "warn", "version"]).unwrap();
        assert_eq!(effective_log_level(&cli), "warn");
    }
}
