//! # Command Dispatch
//!
//! `run` wires the process together:
//!
//! 1. **Parse** arguments with clap ([`super::setup`])
//! 2. **Configure**: load [`CardboardConfig`], then apply `--data-dir`
//! 3. **Log**: install a `tracing` subscriber on stderr
//! 4. **Dispatch** to one handler per subcommand, each a thin call into
//!    [`CardboardApi`] followed by rendering
//!
//! Partial batch failures are not errors: the handler prints what went
//! through and warns on stderr about the rest.

use super::learn;
use super::render;
use super::setup::{CardCommands, Cli, Commands, GroupCommands, SpaceCommands, TopicCommands};
use super::styles;
use anyhow::{bail, Context, Result};
use cardboardapp::commands::flashcards::NewFlashcard;
use cardboardapp::config::CardboardConfig;
use cardboardapp::model::StatusFilter;
use cardboardapp::store::memory::FileStore;
use cardboardapp::store::BatchReport;
use cardboardapp::CardboardApi;
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

type Api = CardboardApi<FileStore>;

struct Ctx {
    api: Api,
    json: bool,
}

impl Ctx {
    /// Prints `value` as JSON under `--json`, otherwise the rendered text.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CardboardConfig::load_from(Some(path)),
        None => CardboardConfig::load(),
    }
    .context("loading configuration")?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    init_tracing(cli.verbose, &config.log_level);

    let root = config.resolve_data_dir()?;
    tracing::debug!(root = %root.display(), "opening store");
    let mut ctx = Ctx {
        api: CardboardApi::new(FileStore::open(root), config),
        json: cli.json,
    };

    match cli.command {
        Commands::Space { action } => handle_space(&mut ctx, action),
        Commands::Group { action } => handle_group(&mut ctx, action),
        Commands::Topic { action } => handle_topic(&mut ctx, action),
        Commands::Card { action } => handle_card(&mut ctx, action),
        Commands::Learn { topic, status } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            learn::run(
                &mut ctx.api,
                &topic,
                status.map(StatusFilter),
                &mut stdin.lock(),
                &mut stdout.lock(),
            )?;
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` means debug, else the configured level.
fn init_tracing(verbose: bool, level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { level }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn warn_batch(report: &BatchReport) {
    let warnings = render::batch_warnings(report);
    if !warnings.is_empty() {
        eprint!("{}", warnings);
    }
}

fn done(message: &str) {
    println!("{}", styles::success().apply_to(message));
}

fn handle_space(ctx: &mut Ctx, action: SpaceCommands) -> Result<()> {
    match action {
        SpaceCommands::Add { name, group } => {
            let space = ctx.api.create_space(&name, &group)?;
            ctx.emit(&space, || {
                format!(
                    "{} {} ({})\n",
                    styles::success().apply_to("Created space"),
                    space.name,
                    space.id
                )
            })
        }
        SpaceCommands::List => {
            if ctx.json {
                return ctx.emit(&ctx.api.list_spaces()?, String::new);
            }
            print!("{}", render::space_groups(&ctx.api.grouped_spaces()?));
            Ok(())
        }
        SpaceCommands::Rename { id, name } => {
            ctx.api.rename_space(&id, &name)?;
            done("Space renamed");
            Ok(())
        }
        SpaceCommands::Group { id, group } => {
            ctx.api.set_space_group(&id, &group)?;
            done("Space moved");
            Ok(())
        }
        SpaceCommands::Reorder { ids } => {
            let report = ctx.api.reorder_spaces(&ids)?;
            warn_batch(&report);
            done("Spaces reordered");
            Ok(())
        }
        SpaceCommands::Rm { id } => {
            let report = ctx.api.delete_space(&id)?;
            ctx.emit(&report, || render::cascade(&report))
        }
    }
}

fn handle_group(ctx: &mut Ctx, action: GroupCommands) -> Result<()> {
    match action {
        GroupCommands::Rename { from, to } => {
            let report = ctx.api.rename_group(&from, &to)?;
            warn_batch(&report);
            done(&format!("Moved {} space(s)", report.succeeded.len()));
            Ok(())
        }
        GroupCommands::Rm { name } => {
            let report = ctx.api.delete_group(&name)?;
            ctx.emit(&report, || render::cascade(&report))
        }
    }
}

fn handle_topic(ctx: &mut Ctx, action: TopicCommands) -> Result<()> {
    match action {
        TopicCommands::Add {
            space,
            title,
            content,
            x,
            y,
        } => {
            let position = x.zip(y);
            let topic = ctx.api.create_topic(&space, &title, &content, position)?;
            ctx.emit(&topic, || {
                format!(
                    "{} {} ({})\n",
                    styles::success().apply_to("Created topic"),
                    topic.title,
                    topic.id
                )
            })
        }
        TopicCommands::List { space } => {
            ctx.api.get_space(&space)?;
            let topics = ctx.api.list_topics(&space)?;
            ctx.emit(&topics, || render::topic_list(&topics))
        }
        TopicCommands::Show { id } => {
            let loaded = ctx.api.load_topic(&id)?;
            warn_batch(&loaded.migration);
            ctx.emit(&loaded.topic, || {
                render::topic_detail(&loaded.topic, &loaded.cards)
            })
        }
        TopicCommands::Edit { id, title, content } => {
            if title.is_none() && content.is_none() {
                bail!("nothing to change: pass --title and/or --content");
            }
            let topic = ctx
                .api
                .update_topic(&id, title.as_deref(), content.as_deref())?;
            ctx.emit(&topic, || format!("{}\n", styles::success().apply_to("Topic updated")))
        }
        TopicCommands::Move { id, x, y } => {
            ctx.api.move_topic(&id, x, y)?;
            done("Topic moved");
            Ok(())
        }
        TopicCommands::Rm { id } => {
            let report = ctx.api.delete_topic(&id)?;
            ctx.emit(&report, || render::cascade(&report))
        }
    }
}

/// Converts a 1-based listing position to an index.
fn position(value: usize, name: &str) -> Result<usize> {
    match value.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("{} positions start at 1", name),
    }
}

fn read_source(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn handle_card(ctx: &mut Ctx, action: CardCommands) -> Result<()> {
    match action {
        CardCommands::Add {
            topic,
            question,
            answer,
            bold,
            italic,
            color,
        } => {
            let mut card = NewFlashcard::plain(question, answer);
            card.is_bold = bold;
            card.is_italic = italic;
            if let Some(color) = color {
                card.text_color = color;
            }
            let change = ctx.api.create_flashcard(&topic, card)?;
            ctx.emit(&change.card, || {
                format!(
                    "{} {} ({})\n",
                    styles::success().apply_to("Added card"),
                    change.card.question,
                    change.card.id
                )
            })
        }
        CardCommands::List { topic, status } => {
            let cards = ctx.api.list_flashcards(&topic)?;
            let filter = status.map(StatusFilter);
            if ctx.json {
                let visible: Vec<_> = cards
                    .iter()
                    .filter(|c| filter.map_or(true, |f| f.matches(c)))
                    .collect();
                return ctx.emit(&visible, String::new);
            }
            print!("{}", render::card_list(&cards, filter));
            Ok(())
        }
        CardCommands::Edit {
            topic,
            card,
            question,
            answer,
            bold,
            italic,
            color,
        } => {
            let current = ctx
                .api
                .list_flashcards(&topic)?
                .into_iter()
                .find(|c| c.id == card)
                .with_context(|| format!("Flashcard not found: {}", card))?;

            // Replacing plain text drops the rich rendition of that side.
            let mut edited = NewFlashcard {
                question: current.question,
                question_html_content: current.question_html_content,
                answer: current.answer,
                html_content: current.html_content,
                is_bold: bold.unwrap_or(current.is_bold),
                is_italic: italic.unwrap_or(current.is_italic),
                text_color: color.unwrap_or(current.text_color),
            };
            if let Some(question) = question {
                edited.question = question;
                edited.question_html_content = None;
            }
            if let Some(answer) = answer {
                edited.answer = answer;
                edited.html_content = None;
            }
            let change = ctx.api.edit_flashcard(&topic, &card, edited)?;
            ctx.emit(&change.card, || format!("{}\n", styles::success().apply_to("Card updated")))
        }
        CardCommands::Rm { topic, card } => {
            let removal = ctx.api.delete_flashcard(&topic, &card)?;
            warn_batch(&removal.reorder.batch);
            done("Card deleted");
            Ok(())
        }
        CardCommands::Status {
            topic,
            card,
            status,
        } => {
            let change = ctx.api.set_card_status(&topic, &card, status)?;
            ctx.emit(&change.card, || {
                format!(
                    "{} {}, topic average {}\n",
                    styles::success().apply_to("Marked"),
                    styles::status(status).apply_to(status),
                    render::average_badge(Some(change.average))
                )
            })
        }
        CardCommands::Move {
            topic,
            from,
            to,
            status,
        } => {
            let from = position(from, "from")?;
            let to = position(to, "to")?;
            let filter = status.map(StatusFilter);
            let outcome = ctx.api.move_flashcard(&topic, filter, from, to)?;
            warn_batch(&outcome.batch);
            if ctx.json {
                return ctx.emit(&outcome.cards, String::new);
            }
            print!("{}", render::card_list(&outcome.cards, filter));
            Ok(())
        }
        CardCommands::Reorder { topic, ids } => {
            let outcome = ctx.api.reorder_flashcards(&topic, &ids)?;
            warn_batch(&outcome.batch);
            if ctx.json {
                return ctx.emit(&outcome.cards, String::new);
            }
            print!("{}", render::card_list(&outcome.cards, None));
            Ok(())
        }
        CardCommands::Import { topic, file } => {
            let text = read_source(&file)?;
            let outcome = ctx.api.import_flashcards_from_json(&topic, &text)?;
            if ctx.json {
                ctx.emit(&outcome.created, String::new)?;
            } else {
                print!("{}", render::import_summary(&outcome));
            }
            match outcome.error {
                Some(err) => Err(err).context("import stopped early"),
                None => Ok(()),
            }
        }
    }
}
