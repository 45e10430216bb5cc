//! Command dispatch: load the document, run one editor, emit the result.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, Document};
use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs, OutputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, MarkupSettings, Settings};
use crate::domain::DomainResult;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = &cli.command {
        return completion(*shell);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let markup = &settings.markup;

    match &cli.command {
        Commands::Render { input } => {
            let document = load_document(input, markup)?;
            emit(&document.render()?, None)
        }
        Commands::Tree { input } => {
            let document = load_document(input, markup)?;
            emit(&document.debug_print()?, None)
        }
        Commands::Replace {
            input,
            from,
            to,
            output,
        } => edit(input, output, markup, "replaced", |doc| doc.replace(from, to)),
        Commands::BoldRow { input, row, output } => {
            edit(input, output, markup, "bolded", |doc| doc.bold_row(*row))
        }
        Commands::Remove { input, tag, output } => {
            edit(input, output, markup, "removed", |doc| doc.remove(tag))
        }
        Commands::TagWord {
            input,
            word,
            tag,
            output,
        } => edit(input, output, markup, "tagged", |doc| doc.tag_word(word, tag)),
        Commands::Config { command } => config_command(command, &settings, cli),
        Commands::Completion { shell } => completion(*shell),
    }
}

#[instrument(level = "debug", skip(markup))]
fn load_document(input: &InputArgs, markup: &MarkupSettings) -> CliResult<Document> {
    let document = match input.file.as_deref() {
        Some(path) if path != Path::new("-") => Document::from_path(path)?,
        _ => {
            debug!("reading stdin");
            Document::from_reader(io::stdin().lock())
        }
    };
    let mut document = document.with_settings(markup.clone());
    document.build()?;
    Ok(document)
}

fn edit<F>(
    input: &InputArgs,
    target: &OutputArgs,
    markup: &MarkupSettings,
    verb: &str,
    op: F,
) -> CliResult<()>
where
    F: FnOnce(&mut Document) -> DomainResult<usize>,
{
    let mut document = load_document(input, markup)?;
    let count = op(&mut document)?;
    if count == 0 {
        output::warning("no matching nodes");
    } else {
        output::success(&format!("{verb} {count} node(s)"));
    }

    let text = if target.tree {
        document.debug_print()?
    } else {
        document.render()?
    };
    emit(&text, target.output.as_deref())
}

fn emit(text: &str, target: Option<&Path>) -> CliResult<()> {
    match target {
        Some(path) => {
            fs::write(path, text).map_err(|e| ApplicationError::OperationFailed {
                context: format!("write {}", path.display()),
                source: Box::new(e),
            })?;
            output::success(&format!("wrote {}", path.display()));
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).map_err(CliError::Output)?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n").map_err(CliError::Output)?;
            }
            stdout.flush().map_err(CliError::Output)
        }
    }
}

fn config_command(command: &ConfigCommands, settings: &Settings, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => emit(&settings.to_toml()?, None),
        ConfigCommands::Template => emit(&Settings::template(), None),
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (missing)" };
                    output::detail(&format!("global: {}{}", path.display(), state));
                }
                None => output::detail("global: (no home directory)"),
            }
            match cli.config.as_deref() {
                Some(path) => output::detail(&format!("local:  {}", path.display())),
                None => output::detail("local:  (none)"),
            }
            Ok(())
        }
    }
}

fn completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
