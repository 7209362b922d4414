//! Connection core
//!
//! The `Connection` type: greeting, per-command request/response cycle,
//! status dispatch, and shutdown.

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard, broadcast, watch};

use crate::connection::address::{DEFAULT_PORT, ServerAddress};
use crate::connection::events::DictEvent;
use crate::error::{DictError, Result};
use crate::model::database::{ALL_DATABASES, FIRST_MATCH};
use crate::model::{Catalog, Database, Definition, MatchingStrategy};
use crate::protocol::parser;
use crate::protocol::responses::*;
use crate::protocol::{Command, LineReader, StatusLine};

const EVENT_CAPACITY: usize = 64;

/// Socket halves, present until the connection is closed.
struct Session {
    reader: LineReader<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Session {
    async fn send(&mut self, command: &Command) -> Result<()> {
        let line = format!("{}{}", command, LINE_ENDING);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        debug!("Sent command: {}", command);
        Ok(())
    }

    /// Sends one command line and reads the first status line of the reply.
    async fn execute(&mut self, command: &Command) -> Result<StatusLine> {
        self.send(command).await?;
        self.reader.read_status().await
    }
}

/// A connection to one DICT server.
///
/// Every public operation holds an internal lock from sending its command
/// until the terminal status is consumed, so a `Connection` may be shared
/// between tasks (e.g. behind an `Arc`) without interleaving replies.
///
/// `close` may be called while another task is waiting on the server: the
/// waiting operation fails promptly with [`DictError::NotConnected`].
pub struct Connection {
    address: ServerAddress,
    session: Mutex<Option<Session>>,
    open: AtomicBool,
    shutdown: watch::Sender<bool>,
    events: broadcast::Sender<DictEvent>,
}

impl Connection {
    /// Connects and waits for the `220` greeting.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_to(&ServerAddress::new(host, port)).await
    }

    /// Connects on the default DICT port.
    pub async fn connect_default(host: &str) -> Result<Self> {
        Self::connect(host, DEFAULT_PORT).await
    }

    pub async fn connect_to(address: &ServerAddress) -> Result<Self> {
        let failed = |source: std::io::Error| DictError::ConnectionFailed {
            address: address.to_string(),
            source,
        };

        let stream = TcpStream::connect((address.host.as_str(), address.port))
            .await
            .map_err(failed)?;
        info!("Connected to {}", address);

        let (read_half, writer) = stream.into_split();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut reader = LineReader::with_shutdown(BufReader::new(read_half), shutdown_rx);

        let greeting = match reader.read_status().await {
            Ok(status) => status,
            Err(DictError::Io(e)) => return Err(failed(e)),
            Err(e) => return Err(e),
        };
        if greeting.code() != SERVICE_READY {
            warn!("Server {} rejected connection: {}", address, greeting);
            return Err(DictError::ConnectionRejected {
                code: greeting.code(),
                detail: greeting.detail().to_string(),
            });
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let connection = Self {
            address: address.clone(),
            session: Mutex::new(Some(Session { reader, writer })),
            open: AtomicBool::new(true),
            shutdown,
            events,
        };
        connection.emit(DictEvent::Connected {
            banner: greeting.detail().to_string(),
        });
        Ok(connection)
    }

    pub fn address(&self) -> &ServerAddress {
        &self.address
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DictEvent> {
        self.events.subscribe()
    }

    /// Sends `QUIT` best-effort and closes the socket. Never fails; calling
    /// it again is a no-op.
    pub async fn close(&self) {
        let was_open = self.open.swap(false, Ordering::SeqCst);
        // Wake any operation parked on a read so the lock is released.
        self.shutdown.send_replace(true);

        let Some(mut session) = self.session.lock().await.take() else {
            return;
        };

        // A connection poisoned by an I/O failure only needs its socket dropped.
        if was_open {
            if let Err(e) = session.send(&Command::Quit).await {
                warn!("Error sending QUIT to {}: {}", self.address, e);
            }
        }
        if let Err(e) = session.writer.shutdown().await {
            warn!("Error closing connection to {}: {}", self.address, e);
        }
        drop(session);

        info!("Connection to {} closed", self.address);
        self.emit(DictEvent::Closed);
    }

    /// `DEFINE <db> <word>`. Unknown database and no match yield an empty list.
    pub async fn get_definitions(&self, word: &str, database: &Database) -> Result<Vec<Definition>> {
        let command = Command::define(database.name(), word)?;
        let mut session = self.session().await?;
        let result = self.define(&mut session, &command, word, database).await;
        self.settle(result)
    }

    /// `MATCH <db> <strategy> <word>`. Returns matched words in server order.
    pub async fn get_match_list(
        &self,
        word: &str,
        strategy: &MatchingStrategy,
        database: &Database,
    ) -> Result<Catalog<String>> {
        let command = Command::match_word(database.name(), strategy.name(), word)?;
        let mut session = self.session().await?;
        let result = self
            .match_words(&mut session, &command, word, strategy, database)
            .await;
        self.settle(result)
    }

    /// `SHOW DB`, keyed by database name in server order.
    pub async fn get_database_list(&self) -> Result<Catalog<Database>> {
        let mut session = self.session().await?;
        let result = self.show_databases(&mut session).await;
        self.settle(result)
    }

    /// `SHOW STRAT`, in server order.
    pub async fn get_strategy_list(&self) -> Result<Catalog<MatchingStrategy>> {
        let mut session = self.session().await?;
        let result = self.show_strategies(&mut session).await;
        self.settle(result)
    }

    /// `SHOW INFO <db>`. The sentinels are answered locally; an unknown
    /// database is an error here, unlike the lookups.
    pub async fn get_database_info(&self, database: &Database) -> Result<String> {
        match database.name() {
            ALL_DATABASES => return Ok("Searching in all databases".to_string()),
            FIRST_MATCH => return Ok("Searching in first database with match".to_string()),
            _ => {}
        }

        let command = Command::show_info(database.name())?;
        let mut session = self.session().await?;
        let result = self.show_info(&mut session, &command, database).await;
        self.settle(result)
    }

    async fn define(
        &self,
        session: &mut Session,
        command: &Command,
        word: &str,
        database: &Database,
    ) -> Result<Vec<Definition>> {
        let status = session.execute(command).await?;
        match status.code() {
            INVALID_DATABASE => {
                warn!("Invalid database: {}", database.name());
                self.emit(DictEvent::InvalidDatabase(database.name().to_string()));
                Ok(Vec::new())
            }
            NO_MATCH => {
                info!("No definitions found for word: {}", word);
                self.emit(DictEvent::NoMatch(word.to_string()));
                Ok(Vec::new())
            }
            DEFINITIONS_RETRIEVED => {
                let definitions =
                    parser::read_definitions(&mut session.reader, word, status.detail()).await?;
                self.complete(session, command).await?;
                info!("Retrieved {} definitions for: {}", definitions.len(), word);
                Ok(definitions)
            }
            other => Err(DictError::unexpected(
                &[DEFINITIONS_RETRIEVED, INVALID_DATABASE, NO_MATCH],
                other,
                status.detail(),
            )),
        }
    }

    async fn match_words(
        &self,
        session: &mut Session,
        command: &Command,
        word: &str,
        strategy: &MatchingStrategy,
        database: &Database,
    ) -> Result<Catalog<String>> {
        let status = session.execute(command).await?;
        match status.code() {
            INVALID_DATABASE => {
                warn!("Invalid database: {}", database.name());
                self.emit(DictEvent::InvalidDatabase(database.name().to_string()));
                Ok(Catalog::new())
            }
            INVALID_STRATEGY => {
                warn!("Invalid strategy: {}", strategy.name());
                self.emit(DictEvent::InvalidStrategy(strategy.name().to_string()));
                Ok(Catalog::new())
            }
            NO_MATCH => {
                info!("No matches found for: {}", word);
                self.emit(DictEvent::NoMatch(word.to_string()));
                Ok(Catalog::new())
            }
            MATCHES_FOUND => {
                let matches = parser::read_matches(&mut session.reader).await?;
                self.complete(session, command).await?;
                info!("Retrieved {} matches for: {}", matches.len(), word);
                Ok(matches)
            }
            other => Err(DictError::unexpected(
                &[MATCHES_FOUND, INVALID_DATABASE, INVALID_STRATEGY, NO_MATCH],
                other,
                status.detail(),
            )),
        }
    }

    async fn show_databases(&self, session: &mut Session) -> Result<Catalog<Database>> {
        let command = Command::ShowDb;
        let status = session.execute(&command).await?;
        match status.code() {
            NO_DATABASES => {
                info!("No databases available");
                self.emit(DictEvent::NoDatabases);
                Ok(Catalog::new())
            }
            DATABASES_PRESENT => {
                let databases = parser::read_databases(&mut session.reader).await?;
                self.complete(session, &command).await?;
                info!("Retrieved {} databases", databases.len());
                Ok(databases)
            }
            other => Err(DictError::unexpected(
                &[DATABASES_PRESENT, NO_DATABASES],
                other,
                status.detail(),
            )),
        }
    }

    async fn show_strategies(&self, session: &mut Session) -> Result<Catalog<MatchingStrategy>> {
        let command = Command::ShowStrat;
        let status = session.execute(&command).await?;
        match status.code() {
            NO_STRATEGIES => {
                info!("No strategies available");
                self.emit(DictEvent::NoStrategies);
                Ok(Catalog::new())
            }
            STRATEGIES_AVAILABLE => {
                let strategies = parser::read_strategies(&mut session.reader).await?;
                self.complete(session, &command).await?;
                info!("Retrieved {} strategies", strategies.len());
                Ok(strategies)
            }
            other => Err(DictError::unexpected(
                &[STRATEGIES_AVAILABLE, NO_STRATEGIES],
                other,
                status.detail(),
            )),
        }
    }

    async fn show_info(
        &self,
        session: &mut Session,
        command: &Command,
        database: &Database,
    ) -> Result<String> {
        let status = session.execute(command).await?;
        match status.code() {
            INVALID_DATABASE => {
                warn!("Invalid database: {}", database.name());
                self.emit(DictEvent::InvalidDatabase(database.name().to_string()));
                Err(DictError::InvalidDatabase(database.name().to_string()))
            }
            DATABASE_INFO => {
                let info = parser::read_database_info(&mut session.reader).await?;
                self.complete(session, command).await?;
                info!("Retrieved info for database: {}", database.name());
                Ok(info)
            }
            other => Err(DictError::unexpected(
                &[DATABASE_INFO, INVALID_DATABASE],
                other,
                status.detail(),
            )),
        }
    }

    /// Locks the session for one full request/response cycle.
    async fn session(&self) -> Result<MappedMutexGuard<'_, Session>> {
        if !self.is_open() {
            return Err(DictError::NotConnected);
        }
        let guard = self.session.lock().await;
        // `close` may have started while this caller waited for the lock.
        if !self.is_open() {
            return Err(DictError::NotConnected);
        }
        MutexGuard::try_map(guard, Option::as_mut).map_err(|_| DictError::NotConnected)
    }

    /// Reads the terminal `250` of a multi-line reply.
    async fn complete(&self, session: &mut Session, command: &Command) -> Result<()> {
        session.reader.expect_status(OK).await?;
        self.emit(DictEvent::Completed {
            command: command.verb(),
        });
        Ok(())
    }

    /// A failed read or write leaves the stream mid-reply; refuse further use.
    fn settle<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(DictError::Io(e)) = &result {
            warn!("I/O failure on connection to {}: {}", self.address, e);
            self.open.store(false, Ordering::SeqCst);
        }
        result
    }

    fn emit(&self, event: DictEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
