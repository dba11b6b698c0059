use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "mclauncher",
    version,
    about = "Install and launch Minecraft releases from the official metadata",
    after_help = "Examples:\n  mclauncher versions\n  mclauncher install 1.20.4\n  mclauncher launch 1.20.4 --dry-run\n  mclauncher config set memory 4"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "MCLAUNCHER_ROOT",
        value_parser = value_parser!(PathBuf),
        help = "Installation root (defaults to <data dir>/mclauncher)"
    )]
    pub root: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "List releases from the release index")]
    Versions(VersionsArgs),
    #[command(about = "List releases installed under the root")]
    Installed,
    #[command(
        about = "Download a release with its libraries, natives and assets",
        after_help = "Example:\n  mclauncher install 1.20.4\n"
    )]
    Install(ReleaseArgs),
    #[command(
        about = "Launch an installed release",
        after_help = "Examples:\n  mclauncher launch 1.20.4\n  mclauncher launch 1.8.9 --dry-run\n"
    )]
    Launch(LaunchArgs),
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct VersionsArgs {
    #[arg(long, action = ArgAction::SetTrue, help = "Include snapshots and old betas")]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    #[arg(value_name = "ID", help = "Release id, e.g. 1.20.4")]
    pub id: String,
}

#[derive(Args, Debug)]
pub struct LaunchArgs {
    #[arg(value_name = "ID", help = "Release id, e.g. 1.20.4")]
    pub id: String,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Print the command line instead of starting the game"
    )]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    #[command(about = "Print the effective settings")]
    Show,
    #[command(
        about = "Change one setting",
        override_usage = "mclauncher config set <KEY> <VALUE>",
        after_help = "Keys: username, memory, java, verify-hashes, timeout\n\nExamples:\n  mclauncher config set username Steve\n  mclauncher config set memory 4\n"
    )]
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
}
