//! Command-line surface.
//!
//! Every flag can also come from the environment so the tool can run from
//! scripts without repeating the database path.

use clap::{Args, Parser, Subcommand};
use registry_core::DeviceStatus;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "registry", version)]
#[command(about = "Administer registered users and devices", long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "REGISTRY_DB", default_value = "registry.sqlite3", global = true)]
    pub db: PathBuf,

    /// trace|debug|info|warn|error (defaults to debug in debug builds, info otherwise)
    #[arg(long, env = "REGISTRY_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset
    #[arg(long, env = "REGISTRY_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage users (identified by email address)
    #[command(subcommand)]
    User(UserCommand),
    /// Manage devices (identified by inventory number)
    #[command(subcommand)]
    Device(DeviceCommand),
    /// Print the core library version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a new user
    Add { email: String, name: String },
    /// List users ordered by name
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one user
    Show(LookupArgs),
    /// Change the name of an existing user
    Update { email: String, name: String },
    /// Delete a user; unknown emails are not an error
    Delete { email: String },
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// Register a new device
    Add(DeviceArgs),
    /// List devices ordered by name
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one device
    Show(LookupArgs),
    /// Replace the attributes of an existing device
    Update(DeviceArgs),
    /// Delete a device; unknown inventory numbers are not an error
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Attribute to match: id or name
    #[arg(long, default_value = "id")]
    pub by: String,
    pub value: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Inventory number, e.g. DEV-0010
    pub id: String,
    pub name: String,
    #[arg(long = "type")]
    pub device_type: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// available|in-maintenance|defective|reserved
    #[arg(long, default_value = "available")]
    pub status: DeviceStatus,
    #[arg(long)]
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, DeviceCommand, UserCommand};
    use clap::{CommandFactory, Parser};
    use registry_core::DeviceStatus;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_user_add_with_global_db_flag() {
        let cli = Cli::try_parse_from([
            "registry",
            "user",
            "add",
            "max@example.com",
            "Max Mustermann",
            "--db",
            "/tmp/test.sqlite3",
        ])
        .unwrap();

        assert_eq!(cli.db.to_str(), Some("/tmp/test.sqlite3"));
        match cli.command {
            Command::User(UserCommand::Add { email, name }) => {
                assert_eq!(email, "max@example.com");
                assert_eq!(name, "Max Mustermann");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_device_status_and_type() {
        let cli = Cli::try_parse_from([
            "registry",
            "device",
            "update",
            "DEV-1",
            "Lasercutter",
            "--type",
            "Schneidgerät",
            "--status",
            "in-maintenance",
        ])
        .unwrap();

        match cli.command {
            Command::Device(DeviceCommand::Update(args)) => {
                assert_eq!(args.device_type.as_deref(), Some("Schneidgerät"));
                assert_eq!(args.status, DeviceStatus::InMaintenance);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_device_status() {
        let result = Cli::try_parse_from([
            "registry", "device", "add", "DEV-1", "Drucker", "--status", "lost",
        ]);
        assert!(result.is_err());
    }
}
