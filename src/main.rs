mod catalog;
mod config;
mod diagnostics;
mod error;
mod executor;
mod http;
mod i18n;
mod matcher;
mod model;
mod ranking;
mod resolver;
mod shutdown;
mod state;
mod tokenizer;
mod worker;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use crate::catalog::Catalog;
use crate::config::{load_config, Config, Environment};
use crate::diagnostics::{ErrorSink, StderrSink};
use crate::executor::{ActionContext, SystemLauncher};
use crate::http::HttpGateway;
use crate::i18n::Translations;
use crate::model::ShutdownStep;
use crate::resolver::TitleResolver;
use crate::state::Session;
use crate::worker::ActionWorker;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the detected environment
    #[arg(short, long, value_enum)]
    environment: Option<Environment>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the catalog against a query and print the matches
    Query {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        text: Vec<String>,
    },
    /// Run the action of a catalog entry and wait for it to finish
    Run { key: String },
    /// Print the shutdown sequence of the active environment
    Steps,
}

#[derive(Serialize)]
struct ResultView<'a> {
    key: &'a str,
    title: &'a str,
    subtitle: &'a str,
    icon: &'a str,
    score: i64,
    highlight: Option<&'a [Range<usize>]>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // 1. Load Config
    let config = load_config(args.config.as_deref())?;
    let environment = args.environment.unwrap_or_else(|| config.environment());
    log::info!("Environment: {}", environment.as_str());

    // 2. Parse the shutdown sequence once; it never changes afterwards
    let steps = load_shutdown_steps(&config, environment);

    if let Some(Command::Steps) = args.command {
        for (i, step) in steps.iter().enumerate() {
            println!("{:>2}. {} {}", i + 1, step.program, step.arguments);
        }
        return Ok(());
    }

    // 3. Build translations and the catalog before the first query
    let translations = Arc::new(
        Translations::new(config.general.locale).with_overrides(&config.translations),
    );
    let catalog = Arc::new(Catalog::build(&translations, environment, steps));
    log::info!(
        "Catalog: {} entries, translated locale '{}'",
        catalog.len(),
        translations.translated_locale().as_str()
    );

    // 4. Action worker
    let errors: Arc<dyn ErrorSink> = Arc::new(StderrSink);
    let error_title = translations.text_or_key("scenedeck_error_title").to_string();
    let ctx = ActionContext::new(
        &config,
        Arc::new(HttpGateway::from_config(&config)),
        Arc::new(SystemLauncher),
        errors.clone(),
        error_title,
    );
    let worker = ActionWorker::spawn(ctx, config.general.queue_size);
    let greeting = banner(&translations);

    let resolver = TitleResolver::new(translations, errors);
    let mut session = Session::new(catalog, resolver, worker);

    match args.command {
        Some(Command::Query { json, text }) => {
            session.update_query(&text.join(" "));
            print_results(&session, json)?;
        }
        Some(Command::Run { key }) => {
            let entry = session
                .catalog
                .find(&key)
                .ok_or_else(|| error::ActionError::UnknownEntry(key.clone()))?;
            session.worker.submit(entry.action.clone())?;
        }
        Some(Command::Steps) => {}
        None => interactive(&mut session, &greeting)?,
    }

    // Let anything already triggered run to completion
    session.worker.shutdown();
    Ok(())
}

fn load_shutdown_steps(config: &Config, environment: Environment) -> Vec<ShutdownStep> {
    let raw = config.shutdown.commands_for(environment);
    let warn = config.shutdown.warn_unparsed_lines;
    let steps = shutdown::build_sequence_with(raw, |line| {
        if warn {
            log::warn!("Shutdown: could not parse '{}', skipped", line);
        }
    });
    log::info!("Shutdown: {} step(s) for {}", steps.len(), environment.as_str());
    steps
}

fn banner(translations: &Translations) -> String {
    format!(
        "{}: {}\n(+/- move, ! runs the selection, !N runs result N, :q quits)",
        translations.text_or_key("scenedeck_plugin_name"),
        translations.text_or_key("scenedeck_plugin_description"),
    )
}

/// One line typed in the interactive session.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Move(i32),
    Trigger(Option<usize>), // 1-based result number, or the current selection
    Query(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        ":q" => Input::Quit,
        "+" => Input::Move(1),
        "-" => Input::Move(-1),
        "!" => Input::Trigger(None),
        trimmed => match trimmed.strip_prefix('!').map(|n| n.trim().parse::<usize>()) {
            Some(Ok(n)) => Input::Trigger(Some(n)),
            _ => Input::Query(line),
        },
    }
}

fn interactive(session: &mut Session, greeting: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    writeln!(out, "{greeting}")?;
    write!(out, "> ")?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;

        match parse_input(line.trim_end_matches(['\r', '\n'])) {
            Input::Quit => break,
            Input::Move(delta) => {
                session.move_selection(delta);
                match session.get_selected() {
                    Some((result, _)) => {
                        println!("* {}. {}", session.selected_index + 1, result.title)
                    }
                    None => eprintln!("no results"),
                }
            }
            Input::Trigger(Some(n)) if n == 0 || n > session.results.len() => {
                eprintln!("no result #{n}");
            }
            Input::Trigger(choice) => {
                if let Some(n) = choice {
                    session.selected_index = n - 1;
                }
                if let Err(e) = session.trigger_selected() {
                    eprintln!("{e}");
                }
            }
            Input::Query(query) => {
                session.update_query(query);
                print_results(session, false)?;
            }
        }

        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

fn print_results(session: &Session, json: bool) -> Result<()> {
    let views: Vec<ResultView> = session
        .results
        .iter()
        .filter_map(|r| {
            let entry = session.catalog.get(r.entry)?;
            Some(ResultView {
                key: &entry.key,
                title: &r.title,
                subtitle: &entry.subtitle,
                icon: &entry.icon,
                score: r.score,
                highlight: r.highlight.as_deref(),
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for (i, view) in views.iter().enumerate() {
        let title = match view.highlight {
            Some(spans) => mark_spans(view.title, spans),
            None => view.title.to_string(),
        };
        println!("{:>2}. {:<40} {:>5}  {}", i + 1, title, view.score, view.subtitle);
    }
    Ok(())
}

/// Wraps the matched char ranges of `text` in brackets.
fn mark_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if spans.iter().any(|s| s.start == i) {
            out.push('[');
        }
        out.push(c);
        if spans.iter().any(|s| s.end == i + 1) {
            out.push(']');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{banner, mark_spans, parse_input, Input};
    use crate::i18n::{Locale, Translations};

    #[test]
    fn marks_highlighted_chars() {
        assert_eq!(mark_spans("Exit Office", &[0..4]), "[Exit] Office");
        assert_eq!(mark_spans("Office Hot", &[0..1, 7..10]), "[O]ffice [Hot]");
        assert_eq!(mark_spans("Nuit", &[]), "Nuit");
    }

    #[test]
    fn selection_lines_are_not_queries() {
        assert_eq!(parse_input(":q"), Input::Quit);
        assert_eq!(parse_input("+"), Input::Move(1));
        assert_eq!(parse_input(" - "), Input::Move(-1));
        assert_eq!(parse_input("!"), Input::Trigger(None));
        assert_eq!(parse_input("!3"), Input::Trigger(Some(3)));
        assert_eq!(parse_input("! 2"), Input::Trigger(Some(2)));
    }

    #[test]
    fn everything_else_is_a_query() {
        assert_eq!(parse_input("office hot"), Input::Query("office hot"));
        assert_eq!(parse_input("!nuit"), Input::Query("!nuit"));
        assert_eq!(parse_input("++"), Input::Query("++"));
        assert_eq!(parse_input(""), Input::Query(""));
    }

    #[test]
    fn banner_names_the_plugin() {
        let text = banner(&Translations::new(Locale::Fr));
        assert!(text.starts_with("Scene Deck: Office scenes"));
        assert!(!text.contains("scenedeck_plugin"));
    }
}
