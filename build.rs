// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: channel identity
fn channel_arg() -> Arg {
    Arg::new("channel")
        .long("channel")
        .value_name("GROUP:ARTIFACT")
        .required(true)
        .help("Channel document identity")
}

/// Common argument: target repository
fn target_repo_arg() -> Arg {
    Arg::new("target_repo")
        .long("target-repo")
        .value_name("URL")
        .required(true)
        .help("Target repository URL or path")
}

fn build_cli() -> Command {
    Command::new("stagehand")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Stagehand Contributors")
        .about("Artifact promotion and channel manifest versioning for Maven-style repositories")
        .subcommand_required(false)
        .subcommand(
            Command::new("promote")
                .about("Promote staged artifacts into a channel")
                .arg(channel_arg())
                .arg(target_repo_arg())
                .arg(
                    Arg::new("artifact")
                        .long("artifact")
                        .value_name("COORDINATE")
                        .action(clap::ArgAction::Append)
                        .help("Artifact coordinate to promote (repeatable)"),
                )
                .arg(
                    Arg::new("source_repo")
                        .long("source-repo")
                        .value_name("URL")
                        .help("Source repository URL or path"),
                )
                .arg(
                    Arg::new("bundle")
                        .long("bundle")
                        .value_name("PATH")
                        .help("Promotable artifact bundle (.tar.gz)"),
                ),
        )
        .subcommand(
            Command::new("streams")
                .about("Show the streams pinned by the current channel manifest")
                .arg(channel_arg())
                .arg(target_repo_arg()),
        )
        .subcommand(
            Command::new("bundle")
                .about("Pack artifacts from a local repository into a promotable bundle")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("PATH")
                        .required(true)
                        .help("Bundle file to create"),
                )
                .arg(
                    Arg::new("repository")
                        .long("repository")
                        .value_name("PATH")
                        .required(true)
                        .help("Local repository containing the artifacts"),
                )
                .arg(
                    Arg::new("artifact")
                        .long("artifact")
                        .value_name("COORDINATE")
                        .action(clap::ArgAction::Append)
                        .required(true)
                        .help("Artifact coordinate to include (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("stagehand.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
