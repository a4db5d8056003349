//! Interactive terminal transport.
//!
//! A numbered menu over the same operations the MCP tools expose. Each choice
//! prompts for its arguments, calls the engine and prints the result as
//! pretty-printed JSON, or `Error: <message>`. The loop ends on `7` or at end
//! of input.
//!
//! The transport is generic over its reader and writer so that sessions can be
//! scripted.

use crate::error::{DbError, DbResult};
use crate::models::ToolArguments;
use crate::tools::{Operation, QueryEngine};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;
use tracing::info;

const MENU: &str = "\n=== MySQL MCP Tools ===\n\
    1. List Schemas\n\
    2. List Tables\n\
    3. Get Table Structure\n\
    4. Get Table CREATE Statement\n\
    5. Execute Query\n\
    6. Search in Table\n\
    7. Exit\n\
    \nSelect a tool (1-7): ";

/// Menu choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Operation),
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim() {
            "1" => Self::Run(Operation::ListSchemas),
            "2" => Self::Run(Operation::ListTables),
            "3" => Self::Run(Operation::GetTableStructure),
            "4" => Self::Run(Operation::GetTableCreate),
            "5" => Self::Run(Operation::ExecuteQuery),
            "6" => Self::Run(Operation::SearchTable),
            "7" => Self::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

/// Terminal menu transport.
pub struct InteractiveTransport<R, W> {
    engine: Arc<QueryEngine>,
    io: Mutex<(R, W)>,
}

impl InteractiveTransport<BufReader<Stdin>, Stdout> {
    /// A session on the process's stdin and stdout.
    pub fn stdio(engine: Arc<QueryEngine>) -> Self {
        Self::new(engine, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> InteractiveTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(engine: Arc<QueryEngine>, reader: R, writer: W) -> Self {
        Self {
            engine,
            io: Mutex::new((reader, writer)),
        }
    }

    /// Give back the reader and writer, e.g. to inspect scripted output.
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }

    async fn session(&self) -> DbResult<()> {
        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;
        let mut session = Session {
            engine: &self.engine,
            reader,
            writer,
        };
        session.run().await
    }
}

impl<R, W> Transport for InteractiveTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn run(&self) -> DbResult<()> {
        info!("Starting interactive session");
        let result = self.session().await;
        self.engine.close().await;
        info!("Interactive session ended");
        result
    }

    fn name(&self) -> &'static str {
        "interactive"
    }
}

struct Session<'a, R, W> {
    engine: &'a QueryEngine,
    reader: &'a mut R,
    writer: &'a mut W,
}

impl<R, W> Session<'_, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn run(&mut self) -> DbResult<()> {
        loop {
            self.write(MENU).await?;
            let Some(input) = self.read_line().await? else {
                break;
            };

            match MenuChoice::parse(&input) {
                Some(MenuChoice::Exit) => {
                    self.write("Exiting...\n").await?;
                    break;
                }
                Some(MenuChoice::Run(operation)) => {
                    let Some(args) = self.collect_arguments(operation).await? else {
                        break;
                    };
                    let result = self.engine.invoke(operation, &args).await;
                    self.print_result(result).await?;
                }
                None => self.write("Invalid choice. Please select 1-7.\n").await?,
            }
        }
        Ok(())
    }

    /// Prompt for every argument of `operation`. `None` means input ended.
    async fn collect_arguments(
        &mut self,
        operation: Operation,
    ) -> DbResult<Option<ToolArguments>> {
        let mut args = ToolArguments::new();
        let fields: &[(&str, &str, bool)] = match operation {
            Operation::ListSchemas => &[("page", "Enter page number (default 1): ", true)],
            Operation::ListTables => &[
                ("schema", "Enter schema name: ", false),
                ("page", "Enter page number (default 1): ", true),
            ],
            Operation::GetTableStructure | Operation::GetTableCreate => &[
                ("schema", "Enter schema name: ", false),
                ("table", "Enter table name: ", false),
            ],
            Operation::ExecuteQuery => &[
                (
                    "query",
                    "Enter SQL query (SELECT/SHOW/DESCRIBE/EXPLAIN only): ",
                    false,
                ),
                ("limit", "Enter result limit (default 100): ", true),
            ],
            Operation::SearchTable => &[
                ("schema", "Enter schema name: ", false),
                ("table", "Enter table name: ", false),
                ("search_term", "Enter search term: ", false),
                ("limit", "Enter result limit (default 100): ", true),
            ],
        };

        for (key, prompt, numeric) in fields {
            self.write(prompt).await?;
            let Some(value) = self.read_line().await? else {
                return Ok(None);
            };
            if *numeric {
                // Blank or unparsable numbers fall back to the engine default.
                if let Ok(n) = value.parse::<i64>() {
                    args.insert(key, n);
                }
            } else {
                args.insert(key, value);
            }
        }
        Ok(Some(args))
    }

    async fn print_result(&mut self, result: DbResult<serde_json::Value>) -> DbResult<()> {
        let text = match result {
            Ok(value) => serde_json::to_string_pretty(&value)
                .map_err(|e| DbError::internal(format!("failed to format result: {}", e)))?,
            Err(e) => format!("Error: {}", e),
        };
        self.write(&format!("\n{}\n", text)).await
    }

    async fn read_line(&mut self) -> DbResult<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| DbError::internal(format!("failed to read input: {}", e)))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn write(&mut self, text: &str) -> DbResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(|e| DbError::internal(format!("failed to write output: {}", e)))?;
        self.writer
            .flush()
            .await
            .map_err(|e| DbError::internal(format!("failed to write output: {}", e)))
    }
}
