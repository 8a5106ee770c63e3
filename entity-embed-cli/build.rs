use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() from src/main.rs, trimmed to what completions need.
// Build scripts can't access src/ modules.
fn entity_args() -> [Arg; 3] {
    [
        Arg::new("entities")
            .long("entities")
            .required(true)
            .value_hint(ValueHint::FilePath),
        Arg::new("uuid").long("uuid").required(true),
        Arg::new("type").long("type").default_value("file"),
    ]
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("entity-embed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and build inline entity embeds")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-displays")
                .long("list-displays")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .arg(Arg::new("input").index(1).value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("entities")
                        .long("entities")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("displays").args(entity_args()))
        .subcommand(
            Command::new("form")
                .arg(Arg::new("display").index(1))
                .args(entity_args()),
        )
        .subcommand(
            Command::new("dialog")
                .args(entity_args())
                .arg(Arg::new("display").long("display"))
                .arg(
                    Arg::new("setting")
                        .long("setting")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("alt").long("alt"))
                .arg(Arg::new("title").long("title")),
        )
        .subcommand(Command::new("save-command").arg(Arg::new("values").index(1)));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "entity-embed", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "entity-embed", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "entity-embed", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
