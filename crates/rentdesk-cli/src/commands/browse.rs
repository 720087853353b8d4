//! Interactive table.
//!
//! Reads one command per line from stdin and redraws the table after each.
//! Works the same when stdin is piped, which is how the integration tests
//! drive it.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use rentdesk_core::{
    ActionDispatcher, Column, ControllerConfig, DateRange, DispatchConfig, FetchOutcome,
    PageSize, RecordId, ReturnDetails, TableSession, TargetPolicy, parse_date,
};

use crate::backend::Backend;
use crate::cli::ConnectionArgs;
use crate::output;
use crate::render;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Rows per page (10, 20, 30, 40 or 50)
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Book or return every selected product instead of exactly one
    #[arg(long)]
    pub batch: bool,
}

const HELP: &str = "\
commands:
  next | prev | first | last    move between pages
  page N                        go to page N
  size N                        rows per page (10, 20, 30, 40, 50)
  filter [TEXT]                 fuzzy filter, empty to clear
  sort COLUMN                   cycle ascending, descending, unsorted
  select ID                     toggle a row
  all                           toggle every visible row
  clear                         deselect everything
  from DATE | to DATE           rental dates (YYYY-MM-DD)
  book                          book the selection
  return MILEAGE [repair]       return the selection
  refresh                       reload the current page
  help | quit";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Next,
    Previous,
    First,
    Last,
    Page(usize),
    Size(PageSize),
    Filter(String),
    Sort(Column),
    Select(RecordId),
    All,
    Clear,
    From(chrono::NaiveDate),
    To(chrono::NaiveDate),
    Book,
    Return(ReturnDetails),
    Refresh,
    Help,
    Quit,
}

fn argument<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(format!("missing {}", what))
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(rest: &str, what: &str) -> Result<T, String> {
    let text = argument(rest, what)?;
    text.parse()
        .map_err(|_| format!("'{}' is not a valid {}", text, what))
}

fn date(rest: &str) -> Result<chrono::NaiveDate, String> {
    parse_date(argument(rest, "date")?).map_err(|e| e.to_string())
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match word.to_lowercase().as_str() {
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Previous,
        "first" => Command::First,
        "last" => Command::Last,
        "page" => match number::<usize>(rest, "page number")? {
            0 => return Err("pages are numbered from 1".to_string()),
            page => Command::Page(page - 1),
        },
        "size" => {
            let size = number::<usize>(rest, "page size")?;
            Command::Size(PageSize::new(size).map_err(|e| e.to_string())?)
        }
        "filter" => Command::Filter(rest.trim().to_string()),
        "sort" => Command::Sort(
            argument(rest, "column")?
                .parse()
                .map_err(|e: rentdesk_core::Error| e.to_string())?,
        ),
        "select" => Command::Select(RecordId(number(rest, "product id")?)),
        "all" => Command::All,
        "clear" => Command::Clear,
        "from" => Command::From(date(rest)?),
        "to" => Command::To(date(rest)?),
        "book" => Command::Book,
        "return" => {
            let mut words = rest.split_whitespace();
            let mileage_used = number(words.next().unwrap_or(""), "mileage")?;
            let needs_repair = match words.next() {
                None => false,
                Some("repair") => true,
                Some(other) => return Err(format!("unexpected '{}'", other)),
            };
            Command::Return(ReturnDetails {
                mileage_used,
                needs_repair,
            })
        }
        "refresh" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

struct Browser {
    session: TableSession<Backend>,
    dispatcher: ActionDispatcher<Backend>,
    range: DateRange,
}

impl Browser {
    async fn draw(&self) {
        let view = self.session.view();
        println!("{}", render::table(&view));

        let from = self.range.from.map(|d| d.to_string());
        let to = self.range.to.map(|d| d.to_string());
        let mut dates = format!(
            "from {} to {}",
            from.as_deref().unwrap_or("-"),
            to.as_deref().unwrap_or("-")
        );
        if let [record] = self.selection().await.as_slice()
            && let Some(price) = self.range.estimate_for(record)
        {
            dates.push_str(&format!(" | estimate {:.2}", price));
        }
        println!("{}", dates.dimmed());
    }

    async fn selection(&self) -> Vec<rentdesk_core::Record> {
        self.session
            .read(|table| table.selected_records())
            .await
    }

    async fn sync(&self) {
        if let Some(FetchOutcome::Failed(failure)) = self.session.sync().await {
            output::error(&failure.to_string());
        }
    }

    /// Apply one command. Returns false when the user asked to quit.
    async fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Next => {
                self.session.update(|t| t.next_page()).await;
                self.sync().await;
            }
            Command::Previous => {
                self.session.update(|t| t.previous_page()).await;
                self.sync().await;
            }
            Command::First => {
                self.session.update(|t| t.first_page()).await;
                self.sync().await;
            }
            Command::Last => {
                self.session.update(|t| t.last_page()).await;
                self.sync().await;
            }
            Command::Page(index) => {
                self.session.update(|t| t.set_page(index)).await;
                self.sync().await;
            }
            Command::Size(size) => {
                self.session.update(|t| t.set_page_size(size)).await;
                self.sync().await;
            }
            Command::Filter(text) => {
                self.session.update(|t| t.set_global_filter(text)).await;
            }
            Command::Sort(column) => {
                self.session.update(|t| t.toggle_sort(column)).await;
            }
            Command::Select(id) => {
                if !self.session.update(|t| t.toggle_row_selected(id)).await {
                    output::error(&format!("Product {} is not on this page", id));
                }
            }
            Command::All => {
                self.session.update(|t| t.toggle_all_rows_selected()).await;
            }
            Command::Clear => {
                self.session.update(|t| t.clear_selection()).await;
            }
            Command::From(date) => self.range.set_from(date),
            Command::To(date) => self.range.set_to(date),
            Command::Book => {
                let selection = self.selection().await;
                let outcomes = self.dispatcher.book(&selection, &self.range).await;
                output::outcomes(&outcomes);
            }
            Command::Return(details) => {
                let selection = self.selection().await;
                let outcomes = self
                    .dispatcher
                    .return_products(&selection, &self.range, details)
                    .await;
                output::outcomes(&outcomes);
            }
            Command::Refresh => {
                if let FetchOutcome::Failed(failure) = self.session.refresh().await {
                    output::error(&failure.to_string());
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }
}

pub async fn run(args: BrowseArgs, connection: &ConnectionArgs) -> Result<()> {
    let backend = Backend::connect(connection)?;
    let page_size = PageSize::new(args.page_size)?;
    output::hint(&format!("Browsing {}", backend.describe()));

    let target_policy = if args.batch {
        TargetPolicy::Batch
    } else {
        TargetPolicy::Single
    };
    let mut browser = Browser {
        dispatcher: ActionDispatcher::new(backend.clone(), DispatchConfig { target_policy }),
        session: TableSession::new(
            backend,
            ControllerConfig {
                page_size,
                ..ControllerConfig::default()
            },
        ),
        range: DateRange::default(),
    };

    if let FetchOutcome::Failed(failure) = browser.session.refresh().await {
        output::error(&failure.to_string());
    }
    browser.draw().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                let redraw = !matches!(command, Command::Help);
                if !browser.apply(command).await {
                    break;
                }
                if redraw {
                    browser.draw().await;
                }
            }
            Err(message) => output::error(&message),
        }
    }

    Ok(())
}
