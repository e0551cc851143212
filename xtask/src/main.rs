use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "scramble";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install scramble binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run scramble with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to scramble")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for scramble-core"))
                .subcommand(Command::new("bin").about("Run tests for scramble-bin"))
                .subcommand(Command::new("integration").about("Run integration tests"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing scramble...");
    cargo(&["install", "--path", "crates/scramble-bin"], "Failed to install scramble")?;
    println!("✓ scramble installed successfully");
    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    println!("Building and running scramble...");

    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let mut command = process::Command::new("cargo");
    command.args(["run", "--bin", BIN_NAME, "--"]);
    command.args(&run_args);

    if !command.status()?.success() {
        anyhow::bail!("Failed to run scramble");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => test_core(),
        Some(("bin", _args)) => test_bin(),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for scramble-core");
            println!("  bin          - Run tests for scramble-bin");
            println!("  integration  - Run integration tests");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("🧪 Running all tests for the scramble project...\n");

    let suites: [(&str, fn() -> Result<()>); 4] = [
        ("scramble-core", test_core),
        ("scramble-bin", test_bin),
        ("workspace", test_workspace),
        ("integration", test_integration),
    ];

    let mut all_passed = true;
    for (name, suite) in suites {
        match suite() {
            Ok(()) => println!("✅ {} tests passed\n", name),
            Err(e) => {
                all_passed = false;
                println!("❌ {} tests failed: {:?}\n", name, e);
            }
        }
    }

    if !all_passed {
        println!("💥 Some tests failed. Please check the output above.");
        anyhow::bail!("Test suite failed");
    }

    println!("🎉 All tests passed successfully!");
    Ok(())
}

fn test_core() -> Result<()> {
    println!("🧪 Running scramble-core tests...");
    cargo(&["test", "--package", "scramble-core", "--lib"], "Core tests failed")
}

fn test_bin() -> Result<()> {
    println!("🧪 Running scramble-bin tests...");
    cargo(&["test", "--package", "scramble-bin"], "Binary tests failed")
}

fn test_workspace() -> Result<()> {
    println!("🧪 Running workspace tests...");
    cargo(&["test", "--workspace"], "Workspace tests failed")
}

fn test_integration() -> Result<()> {
    println!("🧪 Running integration tests...");
    cargo(
        &["test", "--package", "scramble-core", "--test", "end_to_end_test"],
        "Integration tests failed",
    )?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--help"], "CLI help command failed")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--version"], "CLI version command failed")
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("{}", failure);
    }
    Ok(())
}
