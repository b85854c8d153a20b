use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::error::SyncError;
use crate::net;
use crate::notes::{NewNote, Note};
use crate::pantry::{ExpiryStatus, ItemForm, NewPantryItem, PantryItem};
use crate::session::UserId;

#[derive(Parser, Debug)]
#[command(name = "pantry", version, about = "Manage pantry items and shopping notes")]
pub struct Cli {
    /// Server base URL (overrides PANTRY_SERVER_URL).
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// Signed-in user id (overrides PANTRY_USER_ID).
    #[arg(long, global = true)]
    pub user_id: Option<i64>,
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pantry items.
    #[command(subcommand)]
    Items(ItemsCommand),
    /// Shopping notes.
    #[command(subcommand)]
    Notes(NotesCommand),
}

#[derive(Subcommand, Debug)]
pub enum ItemsCommand {
    List,
    Search {
        term: String,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        quantity: String,
        /// Expiry date, YYYY-MM-DD or YYYY/MM/DD.
        #[arg(long, default_value = "")]
        expiry: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    List,
    Add { content: String },
    Delete { id: i64 },
}

#[derive(Serialize)]
struct ItemRow<'a> {
    #[serde(flatten)]
    item: &'a PantryItem,
    expiry: ExpiryStatus,
}

fn build_config(cli: &Cli) -> Result<ClientConfig, SyncError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(server) = cli.server.as_deref() {
        config.server_url = net::parse_base_url(server)?;
    }
    if let Some(user) = cli.user_id {
        config.default_user = Some(UserId(user));
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs.max(1)));
    }
    Ok(config)
}

fn quantity_label(item: &PantryItem) -> String {
    match item.quantity {
        Some(quantity) => format!("x{quantity}"),
        None => "x?".to_string(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), SyncError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| SyncError::malformed(format!("failed to render json: {e}")))?;
    println!("{out}");
    Ok(())
}

fn print_items(
    items: &[PantryItem],
    json: bool,
    today: Date,
    soon_days: i64,
) -> Result<(), SyncError> {
    let rows: Vec<ItemRow<'_>> = items
        .iter()
        .map(|item| ItemRow {
            item,
            expiry: item.expiry_status(today, soon_days),
        })
        .collect();
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No pantry items.");
    }
    for row in rows {
        println!(
            "{:>5}  {}  {}  ({})",
            row.item.id,
            row.item.name,
            quantity_label(row.item),
            row.expiry
        );
    }
    Ok(())
}

fn print_notes(notes: &[Note], json: bool) -> Result<(), SyncError> {
    if json {
        return print_json(&notes);
    }
    if notes.is_empty() {
        println!("No shopping notes.");
    }
    for note in notes {
        println!("{:>5}  {}", note.id, note.content);
    }
    Ok(())
}

/// A mutation may succeed while its follow-up refresh fails; report the latter.
fn refresh_error(last_error: Option<SyncError>) -> Result<(), SyncError> {
    match last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn dispatch(context: &AppContext, cli: Cli, today: Date) -> Result<(), SyncError> {
    let soon_days = context.config().expiry_soon_days;
    match cli.command {
        Command::Items(command) => {
            let items = context.items();
            match command {
                ItemsCommand::List => {
                    items.list().await?;
                }
                ItemsCommand::Search { term } => {
                    items.search(&term).await?;
                }
                ItemsCommand::Add {
                    name,
                    quantity,
                    expiry,
                } => {
                    let draft = NewPantryItem::from_form(&ItemForm {
                        name,
                        expiry_date: expiry,
                        quantity,
                    })?;
                    items.create(&draft).await?;
                    refresh_error(items.last_error())?;
                }
                ItemsCommand::Delete { id } => {
                    items.delete(id).await?;
                    refresh_error(items.last_error())?;
                }
            }
            print_items(&items.records(), cli.json, today, soon_days)
        }
        Command::Notes(command) => {
            let notes = context.notes();
            match command {
                NotesCommand::List => {
                    notes.list().await?;
                }
                NotesCommand::Add { content } => {
                    notes.create(&NewNote::new(&content)?).await?;
                    refresh_error(notes.last_error())?;
                }
                NotesCommand::Delete { id } => {
                    notes.delete(id).await?;
                    refresh_error(notes.last_error())?;
                }
            }
            print_notes(&notes.records(), cli.json)
        }
    }
}

pub async fn execute(cli: Cli) -> Result<(), SyncError> {
    let config = build_config(&cli)?;
    let context = AppContext::new(config)?;
    let today = OffsetDateTime::now_utc().date();

    let result = dispatch(&context, cli, today).await;
    context.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_add_flags() {
        let cli = Cli::try_parse_from([
            "pantry", "--user-id", "3", "items", "add", "--name", "Milk", "--quantity", "2",
            "--expiry", "2024/05/01",
        ])
        .unwrap();
        assert_eq!(cli.user_id, Some(3));
        match cli.command {
            Command::Items(ItemsCommand::Add {
                name,
                quantity,
                expiry,
            }) => {
                assert_eq!(name, "Milk");
                assert_eq!(quantity, "2");
                assert_eq!(expiry, "2024/05/01");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["pantry", "notes", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Notes(NotesCommand::List)));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(Cli::try_parse_from(["pantry", "items", "delete", "milk"]).is_err());
    }

    #[test]
    fn item_rows_flatten_with_expiry_status() {
        let item = PantryItem {
            id: 1,
            name: "Milk".to_string(),
            quantity: Some(2),
            expiry_date: Some("2024-05-12".to_string()),
            user_id: None,
        };
        let row = ItemRow {
            item: &item,
            expiry: item.expiry_status(time::macros::date!(2024 - 05 - 10), 3),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["name"], "Milk");
        assert_eq!(value["expiry"]["status"], "expires_soon");
        assert_eq!(value["expiry"]["days"], 2);
    }

    #[test]
    fn search_hits_without_quantity_render_unknown() {
        let mut item = PantryItem {
            id: 4,
            name: "Flour".to_string(),
            quantity: None,
            expiry_date: None,
            user_id: Some(UserId(3)),
        };
        assert_eq!(quantity_label(&item), "x?");
        item.quantity = Some(5);
        assert_eq!(quantity_label(&item), "x5");
    }
}
