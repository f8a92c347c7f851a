use crate::common::config::{MENU_DELETE, MENU_ENTER, MENU_LIST, MENU_QUIT, MENU_SEARCH, TableConfig};
use crate::common::debug::DebugTrace;
use crate::common::exception::{CliError, HashTableError};
use crate::common::logger::initialize_logger;
use crate::container::chained_hash_table::{ChainedHashTable, DeleteOutcome, InsertOutcome};
use crate::container::record::truncate_key;
use crate::trace_op;
use clap::Parser;
use colored::*;
use log::error;
use parking_lot::Mutex;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of buckets in the hash table
    #[arg(long = "hashsize", allow_negative_numbers = true)]
    hashsize: i64,

    /// Print trace lines for every table operation
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Enter,
    List,
    Search,
    Delete,
    Quit,
    Invalid,
}

impl MenuChoice {
    /// Reads the leading number of a menu line.
    pub fn parse(line: &str) -> Self {
        let digits: String = line
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        match digits.parse::<u32>() {
            Ok(MENU_ENTER) => MenuChoice::Enter,
            Ok(MENU_LIST) => MenuChoice::List,
            Ok(MENU_SEARCH) => MenuChoice::Search,
            Ok(MENU_DELETE) => MenuChoice::Delete,
            Ok(MENU_QUIT) => MenuChoice::Quit,
            _ => MenuChoice::Invalid,
        }
    }

    /// Prompt shown before reading the data line, if the choice needs one.
    pub fn data_prompt(&self) -> Option<&'static str> {
        match self {
            MenuChoice::Enter => Some("Enter new data:  "),
            MenuChoice::Search => Some("Search data:  "),
            MenuChoice::Delete => Some("Data to delete:  "),
            _ => None,
        }
    }
}

/// Cuts a raw input line at its first carriage return or newline.
pub fn strip_line_ending(line: &str) -> &str {
    match line.find(['\r', '\n']) {
        Some(end) => &line[..end],
        None => line,
    }
}

pub fn write_menu(writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "   [{}] Enter new data", MENU_ENTER)?;
    writeln!(writer, "   [{}] List table", MENU_LIST)?;
    writeln!(writer, "   [{}] Search data", MENU_SEARCH)?;
    writeln!(writer, "   [{}] Delete data", MENU_DELETE)?;
    writeln!(writer, "   [{}] Quit", MENU_QUIT)
}

/// Runs menu commands against a shared table.
///
/// Each command holds the table lock for its whole duration.
pub struct HashTableExecutor {
    table: Arc<Mutex<ChainedHashTable>>,
}

impl HashTableExecutor {
    pub fn new(table: Arc<Mutex<ChainedHashTable>>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> Arc<Mutex<ChainedHashTable>> {
        Arc::clone(&self.table)
    }

    pub fn execute_command(
        &self,
        choice: MenuChoice,
        data: &str,
        writer: &mut impl Write,
    ) -> Result<(), CliError> {
        let data = strip_line_ending(data);
        match choice {
            MenuChoice::Enter => self.handle_insert(data, writer)?,
            MenuChoice::List => {
                self.handle_list(writer)?;
            }
            MenuChoice::Search => self.handle_search(data, writer)?,
            MenuChoice::Delete => self.handle_delete(data, writer)?,
            MenuChoice::Quit => {}
            MenuChoice::Invalid => writeln!(writer, "Invalid option, please try again")?,
        }
        Ok(())
    }

    fn handle_insert(&self, data: &str, writer: &mut impl Write) -> Result<(), CliError> {
        let mut table = self.table.lock();
        trace_op!(table.trace(), "New data to add: [{}]", data);

        match table.insert(data) {
            Ok(InsertOutcome::Inserted) => {
                let bucket = table.bucket_of(truncate_key(data, table.payload_capacity()));
                writeln!(writer, "Data [{}] added to bucket [{}]", data, bucket)?;
            }
            Ok(InsertOutcome::AlreadyExists) => {
                writeln!(writer, "Data [{}] already exists", data)?;
            }
            Err(HashTableError::EmptyKey) => {
                writeln!(writer, "No data entered")?;
            }
            Err(e) => {
                error!("Failed to add [{}]: {}", data, e);
                writeln!(writer, "Unable to add data [{}]: {}", data, e)?;
            }
        }
        Ok(())
    }

    /// Prints every stored record and returns how many were printed.
    pub fn handle_list(&self, writer: &mut impl Write) -> Result<usize, CliError> {
        let table = self.table.lock();
        let mut result = Ok(());
        let count = table.enumerate(|entry| {
            if result.is_ok() {
                result = writeln!(writer, "Bucket[{}] data:  [{}]", entry.bucket, entry.payload);
            }
        });
        result?;
        writeln!(writer, "{} record(s) in {} bucket(s)", count, table.bucket_count())?;
        Ok(count)
    }

    fn handle_search(&self, data: &str, writer: &mut impl Write) -> Result<(), CliError> {
        let table = self.table.lock();
        trace_op!(table.trace(), "Data to search: [{}]", data);

        match table.search(data) {
            Some(hit) => writeln!(
                writer,
                "Data [{}] found in bucket [{}] in chain [{}]",
                data, hit.bucket, hit.position
            )?,
            None => writeln!(writer, "Data [{}] not found", data)?,
        }
        Ok(())
    }

    fn handle_delete(&self, data: &str, writer: &mut impl Write) -> Result<(), CliError> {
        let mut table = self.table.lock();
        trace_op!(table.trace(), "Data to delete: [{}]", data);

        match table.delete(data) {
            DeleteOutcome::Deleted => writeln!(writer, "Data [{}] deleted", data)?,
            DeleteOutcome::NotFound => writeln!(writer, "Data [{}] not found", data)?,
        }
        Ok(())
    }
}

/// Reads one line, returning `None` when input ends or is interrupted.
fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>, CliError> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let args = Args::parse();
    initialize_logger(args.debug);

    let trace = DebugTrace::new();
    trace.latch(args.debug);

    let config = TableConfig::new(args.hashsize).with_debug(args.debug);
    let table = ChainedHashTable::with_trace(config, trace)?;
    let executor = HashTableExecutor::new(Arc::new(Mutex::new(table)));

    println!("{}", "\nChained Hash Table".blue().bold());
    println!("Buckets: {}\n", args.hashsize);

    let mut rl = DefaultEditor::new()?;
    let mut stdout = io::stdout();

    loop {
        write_menu(&mut stdout)?;
        let Some(line) = read_line(&mut rl, "   Choice:  ")? else {
            break;
        };

        let choice = MenuChoice::parse(&line);
        if choice == MenuChoice::Quit {
            break;
        }

        let data = match choice.data_prompt() {
            Some(prompt) => match read_line(&mut rl, prompt)? {
                Some(data) => data,
                None => break,
            },
            None => String::new(),
        };
        if !data.is_empty() {
            let _ = rl.add_history_entry(data.as_str());
        }

        if let Err(e) = executor.execute_command(choice, &data, &mut stdout) {
            println!("{}", format!("Error: {}", e).red());
        }
    }

    println!("Shutting down...");
    Ok(())
}
