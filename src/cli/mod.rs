use std::sync::Arc;
use clap::Subcommand;
use colored::Colorize;
use log::info;
use crate::config::AppConfig;
use crate::entities::{InsertResult, PrivacyField, ProfileId, ProfileRecord};
use crate::session::EditSession;
use crate::storage::FileStore;
use crate::tags::taxonomy::classify;
use crate::tags::{group_by_category, parse_delimited, suggest, COMMON_HOBBIES};
use crate::visibility::WriteState;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the category of each tag
    Classify {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Print catalog suggestions for partially typed input
    Suggest {
        input: String,
        #[arg(long = "selected", help = "Tag that is already selected (repeatable)")]
        selected: Vec<String>,
    },
    /// Split a `;`-delimited hobby string into tags
    Parse {
        source: String,
    },
    /// Create an empty profile in the store
    Init {
        #[arg(long)]
        id: Option<ProfileId>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Print a profile's tags and privacy flags
    Show {
        id: ProfileId,
    },
    AddTag {
        id: ProfileId,
        tag: String,
    },
    RemoveTag {
        id: ProfileId,
        tag: String,
    },
    /// Flip the visibility of a privacy field
    Toggle {
        id: ProfileId,
        field: PrivacyField,
    },
}

pub async fn run(config: AppConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Classify { tags } => classify_tags(&tags),
        Command::Suggest { input, selected } => print_suggestions(&input, &selected),
        Command::Parse { source } => print_parsed(&source),
        Command::Init { id, first_name, last_name, email } => {
            let record = ProfileRecord {
                first_name,
                last_name,
                email,
                ..ProfileRecord::new(id.unwrap_or_default())
            };
            init_profile(config, record).await
        }
        Command::Show { id } => show_profile(config, id).await,
        Command::AddTag { id, tag } => add_tag(config, id, &tag).await,
        Command::RemoveTag { id, tag } => remove_tag(config, id, &tag).await,
        Command::Toggle { id, field } => toggle_field(config, id, field).await,
    }
}

fn classify_tags(tags: &[String]) -> anyhow::Result<()> {
    for tag in tags {
        let category = classify(tag);
        println!("{}\t{}\t{}", tag.bold(), category, category.accent());
    }
    Ok(())
}

fn print_suggestions(input: &str, selected: &[String]) -> anyhow::Result<()> {
    for suggestion in suggest(COMMON_HOBBIES, input, selected) {
        println!("{}", suggestion);
    }
    Ok(())
}

fn print_parsed(source: &str) -> anyhow::Result<()> {
    for tag in parse_delimited(source) {
        println!("{}", tag);
    }
    Ok(())
}

async fn open_session(config: &AppConfig, id: ProfileId) -> anyhow::Result<EditSession<FileStore>> {
    let store = FileStore::new(config.store.path.clone())?;
    let session = EditSession::load(Arc::new(store), id).await?;
    Ok(session)
}

async fn init_profile(config: AppConfig, record: ProfileRecord) -> anyhow::Result<()> {
    let store = FileStore::new(config.store.path.clone())?;
    match store.create_record(record).await? {
        InsertResult::New(record) => println!("Profile created: {}", record.id),
        InsertResult::Existing(record) => println!("Profile already exists: {}", record.id),
    }
    Ok(())
}

async fn show_profile(config: AppConfig, id: ProfileId) -> anyhow::Result<()> {
    let session = open_session(&config, id).await?;
    println!("{} ({})", session.full_name().bold(), session.initials());
    println!("Hobbies & interests:");
    for (category, tags) in group_by_category(session.editor().tags()) {
        println!("  {:<14}{}", category.to_string(), tags.join(", "));
    }
    println!("Privacy:");
    for (field, visible) in session.flags().iter() {
        let label = if visible { "visible".green() } else { "private".red() };
        println!("  {:<14}{}", field.to_string(), label);
    }
    Ok(())
}

async fn add_tag(config: AppConfig, id: ProfileId, tag: &str) -> anyhow::Result<()> {
    let mut session = open_session(&config, id).await?;
    if !session.add_tag(tag) {
        println!("Nothing to add: {:?}", tag);
        return Ok(());
    }
    session.save_tags().await?;
    println!("Tags: {}", session.tags().join(", "));
    Ok(())
}

async fn remove_tag(config: AppConfig, id: ProfileId, tag: &str) -> anyhow::Result<()> {
    let mut session = open_session(&config, id).await?;
    if !session.remove_tag(tag) {
        println!("Tag not found: {:?}", tag);
        return Ok(());
    }
    session.save_tags().await?;
    println!("Tags: {}", session.tags().join(", "));
    Ok(())
}

async fn toggle_field(config: AppConfig, id: ProfileId, field: PrivacyField) -> anyhow::Result<()> {
    let mut session = open_session(&config, id).await?;
    let state = session.toggle_and_persist(field).await;
    info!("toggle of {} finished as {:?}", field, state);
    for notification in session.take_notifications() {
        eprintln!("{}", notification.message.red());
    }
    if state == WriteState::RolledBack {
        anyhow::bail!("{} visibility was not changed", field);
    }
    let label = if session.flags().get(field) { "visible" } else { "private" };
    println!("{} is now {}", field, label);
    Ok(())
}
