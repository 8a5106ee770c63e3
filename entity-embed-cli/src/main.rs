// Command-line interface for entity-embed
//
// This binary drives the entity-embed library from a shell: it renders stored field values,
// and walks the embed dialog non-interactively so that the messages sent to an editor client can
// be inspected.
//
// Entities come from a JSON store file ({"entities": [...]}), since there is no host system to
// load them from.
//
// Usage:
//  entity-embed render <input.html> --entities <store.json> [-o <file>]   - Replace embed placeholders
//  entity-embed displays --entities <store.json> --uuid <uuid> [--type <type>]
//                                                                      - Displays offered for an entity
//  entity-embed form <display> --entities <store.json> --uuid <uuid>   - Configuration form as JSON
//  entity-embed dialog --entities <store.json> --uuid <uuid> --display <id> [--setting k=v]...
//                      [--alt <text>] [--title <text>]                  - Commit an embed, print the AJAX response
//  entity-embed save-command <values-json>                              - Wrap a payload in the save command
//  entity-embed --list-displays                                         - List every registered display
//
// Logging goes to stderr. RUST_LOG wins over the logging.filter config key.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use entity_embed::{
    AjaxCommand, AjaxResponse, DisplayRegistry, EmbedError, EmbedFilter, InMemoryEntityStore,
    Overrides, RenderContext, Renderer, SelectDialog, SelectDialogSave, Settings,
};
use entity_embed_config::{EmbedConfig, Loader};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn entity_args() -> [Arg; 3] {
    [
        Arg::new("entities")
            .long("entities")
            .value_name("PATH")
            .help("JSON entity store ({\"entities\": [...]})")
            .required(true)
            .value_hint(ValueHint::FilePath),
        Arg::new("uuid")
            .long("uuid")
            .value_name("UUID")
            .help("Uuid of the entity")
            .required(true),
        Arg::new("type")
            .long("type")
            .value_name("TYPE")
            .help("Entity type")
            .default_value("file"),
    ]
}

fn build_cli() -> Command {
    Command::new("entity-embed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and build inline entity embeds")
        .long_about(
            "entity-embed renders entity embed placeholders found in rich-text field values,\n\
            and runs the embed selection dialog from the command line.\n\n\
            Examples:\n  \
            entity-embed render body.html --entities store.json          # Rendered HTML on stdout\n  \
            entity-embed displays --entities store.json --uuid <uuid>    # Displays for a file\n  \
            entity-embed dialog --entities store.json --uuid <uuid> \\\n      \
            --display image:image --setting image_link=file --alt 'A cat'"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-displays")
                .long("list-displays")
                .help("List every registered display")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an entity-embed.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Replace embed placeholders in an HTML fragment")
                .arg(
                    Arg::new("input")
                        .help("HTML fragment holding embed placeholders")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("entities")
                        .long("entities")
                        .value_name("PATH")
                        .help("JSON entity store ({\"entities\": [...]})")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("displays")
                .about("List the displays able to render an entity")
                .args(entity_args()),
        )
        .subcommand(
            Command::new("form")
                .about("Print a display's configuration form as JSON")
                .arg(
                    Arg::new("display")
                        .help("Display id, e.g. image:image")
                        .required(true)
                        .index(1),
                )
                .args(entity_args()),
        )
        .subcommand(
            Command::new("dialog")
                .about("Run the embed dialog and print the AJAX response")
                .args(entity_args())
                .arg(
                    Arg::new("display")
                        .long("display")
                        .value_name("ID")
                        .help("Display id")
                        .required(true),
                )
                .arg(
                    Arg::new("setting")
                        .long("setting")
                        .value_name("KEY=VALUE")
                        .help("Display setting; the value is read as JSON, or as text if that fails")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("alt")
                        .long("alt")
                        .help("Alternate text override"),
                )
                .arg(Arg::new("title").long("title").help("Title override")),
        )
        .subcommand(
            Command::new("save-command")
                .about("Print the save command for a JSON payload")
                .arg(
                    Arg::new("values")
                        .help("Payload, as JSON")
                        .required(true)
                        .index(1),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config.logging.filter);
    let registry = Arc::new(config.registry());

    if matches.get_flag("list-displays") {
        handle_list_displays_command(&registry);
        return;
    }

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            let input = required(sub_matches, "input");
            let entities = required(sub_matches, "entities");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_render_command(input, entities, output, registry, &config);
        }
        Some(("displays", sub_matches)) => {
            handle_displays_command(sub_matches, &registry);
        }
        Some(("form", sub_matches)) => {
            let display = required(sub_matches, "display");
            handle_form_command(sub_matches, display, &registry);
        }
        Some(("dialog", sub_matches)) => {
            handle_dialog_command(sub_matches, registry);
        }
        Some(("save-command", sub_matches)) => {
            handle_save_command(required(sub_matches, "values"));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(2);
        })
}

/// Handle the render command
fn handle_render_command(
    input: &str,
    entities: &str,
    output: Option<&str>,
    registry: Arc<DisplayRegistry>,
    config: &EmbedConfig,
) {
    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });
    let store = load_store(entities);
    let context = render_context(config);

    let filter = EmbedFilter::new(Renderer::new(registry, Arc::new(store), context));
    let result = filter.process(&source).unwrap_or_else(|e| {
        eprintln!("Render error: {e}");
        std::process::exit(1);
    });
    debug!(
        embedded = result.embedded,
        omitted = result.omitted,
        "rendered {input}"
    );

    match output {
        Some(path) => {
            fs::write(path, result.html).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{}", result.html),
    }
}

/// Handle the displays command
fn handle_displays_command(matches: &ArgMatches, registry: &DisplayRegistry) {
    let store = load_store(required(matches, "entities"));
    let entity = load_entity(&store, matches);

    for (id, label) in registry.definition_options_for_entity(&entity) {
        println!("{id}\t{label}");
    }
}

/// Handle the form command
fn handle_form_command(matches: &ArgMatches, display: &str, registry: &DisplayRegistry) {
    let store = load_store(required(matches, "entities"));
    let entity = load_entity(&store, matches);

    let instance = registry
        .instantiate_for(display, &Settings::new(), &entity)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
    let form = registry.build_configuration_form(&instance, &entity);
    println!("{}", to_pretty_json(&form));
}

/// Handle the dialog command
fn handle_dialog_command(matches: &ArgMatches, registry: Arc<DisplayRegistry>) {
    let store = load_store(required(matches, "entities"));
    let entity_type = required(matches, "type");
    let uuid = parse_uuid(required(matches, "uuid"));

    let settings = matches
        .get_many::<String>("setting")
        .into_iter()
        .flatten()
        .map(|raw| parse_setting(raw))
        .collect::<Settings>();
    let overrides = Overrides::new(
        matches.get_one::<String>("alt").cloned(),
        matches.get_one::<String>("title").cloned(),
    );

    let mut dialog = SelectDialog::new(registry, Arc::new(store));
    let display = required(matches, "display");
    let response = run_dialog(&mut dialog, entity_type, &uuid, display, &settings, overrides)
        .unwrap_or_else(|e| {
            eprintln!("Error ({}): {e}", dialog.step());
            std::process::exit(1);
        });

    println!("{}", to_pretty_json(&response.render()));
}

fn run_dialog(
    dialog: &mut SelectDialog,
    entity_type: &str,
    uuid: &Uuid,
    display: &str,
    settings: &Settings,
    overrides: Overrides,
) -> Result<AjaxResponse, EmbedError> {
    dialog.select_entity(entity_type, uuid)?;
    dialog.select_display(display)?;
    dialog.configure(settings, overrides)?;
    dialog.commit()
}

/// Handle the save-command command
fn handle_save_command(raw: &str) {
    let values: Value = serde_json::from_str(raw).unwrap_or_else(|e| {
        eprintln!("Error: payload is not valid JSON: {e}");
        std::process::exit(1);
    });
    println!("{}", SelectDialogSave::new(values).render());
}

/// Handle the list-displays command
fn handle_list_displays_command(registry: &DisplayRegistry) {
    println!("Available displays:\n");
    for id in registry.list_displays() {
        let label = registry.get(&id).map(|d| d.label()).unwrap_or_default();
        println!("  {id:<46} {label}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> EmbedConfig {
    let loader = Loader::new().with_optional_file("entity-embed.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(default_filter).unwrap_or_else(|e| {
            eprintln!("Invalid logging.filter '{default_filter}': {e}");
            std::process::exit(1);
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn render_context(config: &EmbedConfig) -> RenderContext {
    config.render.to_context().unwrap_or_else(|e| {
        eprintln!("Invalid render configuration: {e}");
        std::process::exit(1);
    })
}

fn load_store(path: &str) -> InMemoryEntityStore {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });
    InMemoryEntityStore::from_json_str(&source).unwrap_or_else(|e| {
        eprintln!("Invalid entity store '{path}': {e}");
        std::process::exit(1);
    })
}

fn load_entity(store: &InMemoryEntityStore, matches: &ArgMatches) -> entity_embed::Entity {
    use entity_embed::EntityRepository;

    let entity_type = required(matches, "type");
    let uuid = parse_uuid(required(matches, "uuid"));
    store.resolve(entity_type, &uuid).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

fn parse_uuid(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|e| {
        eprintln!("Error: invalid uuid '{raw}': {e}");
        std::process::exit(1);
    })
}

/// Split `key=value`, reading the value as JSON when it parses
fn parse_setting(raw: &str) -> (String, Value) {
    let Some((key, value)) = raw.split_once('=') else {
        eprintln!("Error: setting '{raw}' is not of the form KEY=VALUE");
        std::process::exit(1);
    };
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    (key.to_string(), value)
}

fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    })
}
