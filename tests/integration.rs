use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use rax_dict_client::{Connection, Database, DictError, DictEvent, MatchingStrategy};

const GREETING: &str = "220 dict.example.org dictd 1.13 <auth.mime> <1@dict.example.org>\r\n";

/// What the mock server does when it receives a scripted command.
enum Reply {
    Send(&'static str),
    /// Never answer; the client stays parked on its read.
    Silent,
    /// Send a partial reply, then drop the socket.
    HangUp(&'static str),
}

struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl MockServer {
    async fn connect(&self) -> Connection {
        Connection::connect("127.0.0.1", self.addr.port())
            .await
            .expect("connect to mock server")
    }

    /// Commands received, in order, once the client has hung up.
    async fn received(self) -> Vec<String> {
        self.handle.await.unwrap()
    }
}

// Start a one-shot DICT server that answers each command from `script`.
// Entries are matched by command text, so concurrent callers are fine.
async fn mock_server(greeting: &'static str, script: Vec<(&'static str, Reply)>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    mock_server_on(listener, greeting, script)
}

fn mock_server_on(
    listener: TcpListener,
    greeting: &'static str,
    script: Vec<(&'static str, Reply)>,
) -> MockServer {
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut script: Vec<Option<(&str, Reply)>> = script.into_iter().map(Some).collect();
        let mut received = Vec::new();
        let mut line = String::new();

        let _ = write_half.write_all(greeting.as_bytes()).await;

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let command = line.trim_end_matches(['\r', '\n']).to_string();
            received.push(command.clone());

            let entry = script
                .iter_mut()
                .find(|entry| matches!(entry, Some((c, _)) if *c == command))
                .and_then(Option::take);

            match entry {
                Some((_, Reply::Send(text))) => {
                    let _ = write_half.write_all(text.as_bytes()).await;
                }
                Some((_, Reply::Silent)) => {}
                Some((_, Reply::HangUp(text))) => {
                    let _ = write_half.write_all(text.as_bytes()).await;
                    break;
                }
                None if command == "QUIT" => {
                    let _ = write_half.write_all(b"221 bye\r\n").await;
                }
                None => {
                    let _ = write_half.write_all(b"500 unknown command\r\n").await;
                }
            }
        }

        received
    });

    MockServer { addr, handle }
}

fn wordnet() -> Database {
    Database::new("wn", "WordNet (r) 3.0 (2006)")
}

#[tokio::test]
async fn test_connect_accepts_220_greeting() {
    let server = mock_server(GREETING, vec![]).await;
    let connection = server.connect().await;
    assert!(connection.is_open());

    connection.close().await;
    assert!(!connection.is_open());
    assert_eq!(server.received().await, vec!["QUIT"]);
}

#[tokio::test]
async fn test_connect_rejected_greeting() {
    let server = mock_server("530 access denied\r\n", vec![]).await;
    let result = Connection::connect("127.0.0.1", server.addr.port()).await;

    match result {
        Err(DictError::ConnectionRejected { code, .. }) => assert_eq!(code, 530),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("connection should have been rejected"),
    }
}

#[tokio::test]
async fn test_connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = Connection::connect("127.0.0.1", port).await;
    assert!(matches!(result, Err(DictError::ConnectionFailed { .. })));
}

#[tokio::test]
async fn test_define_two_definitions() {
    let server = mock_server(
        GREETING,
        vec![(
            "DEFINE * parrot",
            Reply::Send(concat!(
                "150 2 definitions retrieved\r\n",
                "151 \"parrot\" wn \"WordNet (r) 3.0 (2006)\"\r\n",
                "parrot\r\n",
                "    n 1: usually brightly colored zygodactyl tropical birds\r\n",
                "\r\n",
                "    v 1: repeat mindlessly\r\n",
                ".\r\n",
                "151 \"parrot\" gcide \"The Collaborative International Dictionary of English\"\r\n",
                "Parrot, n. Any bird of the order Psittaci.\r\n",
                ".\r\n",
                "250 ok [d/m/c = 2/0/20; 0.000r 0.000u 0.000s]\r\n",
            )),
        )],
    )
    .await;
    let connection = server.connect().await;

    let definitions = connection
        .get_definitions("parrot", &Database::all())
        .await
        .unwrap();

    assert_eq!(definitions.len(), 2);
    assert!(definitions.iter().all(|d| d.word() == "parrot"));
    assert_eq!(definitions[0].database(), "wn");
    assert_eq!(definitions[1].database(), "gcide");
    assert_eq!(
        definitions[0].text(),
        "parrot\n    n 1: usually brightly colored zygodactyl tropical birds\n\n    v 1: repeat mindlessly"
    );

    connection.close().await;
    assert_eq!(server.received().await, vec!["DEFINE * parrot", "QUIT"]);
}

#[tokio::test]
async fn test_define_no_match_is_empty() {
    let server = mock_server(
        GREETING,
        vec![("DEFINE wn xyzzy", Reply::Send("552 no match\r\n"))],
    )
    .await;
    let connection = server.connect().await;
    let mut events = connection.subscribe();

    let definitions = connection.get_definitions("xyzzy", &wordnet()).await.unwrap();
    assert!(definitions.is_empty());
    assert_eq!(events.try_recv().unwrap(), DictEvent::NoMatch("xyzzy".into()));

    connection.close().await;
}

#[tokio::test]
async fn test_define_invalid_database_is_empty() {
    let server = mock_server(
        GREETING,
        vec![("DEFINE nosuchdb parrot", Reply::Send("550 invalid database\r\n"))],
    )
    .await;
    let connection = server.connect().await;
    let mut events = connection.subscribe();

    let definitions = connection
        .get_definitions("parrot", &Database::new("nosuchdb", ""))
        .await
        .unwrap();
    assert!(definitions.is_empty());
    assert_eq!(
        events.try_recv().unwrap(),
        DictEvent::InvalidDatabase("nosuchdb".into())
    );

    connection.close().await;
}

#[tokio::test]
async fn test_define_requires_trailing_250() {
    let server = mock_server(
        GREETING,
        vec![(
            "DEFINE wn parrot",
            Reply::Send(concat!(
                "150 1 definitions retrieved\r\n",
                "151 parrot wn \"WordNet\"\r\n",
                "a bird\r\n",
                ".\r\n",
                "420 server temporarily unavailable\r\n",
            )),
        )],
    )
    .await;
    let connection = server.connect().await;

    match connection.get_definitions("parrot", &wordnet()).await {
        Err(DictError::UnexpectedStatus {
            expected, actual, ..
        }) => {
            assert_eq!(expected, vec![250]);
            assert_eq!(actual, 420);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    connection.close().await;
}

#[tokio::test]
async fn test_define_unexpected_initial_status() {
    let server = mock_server(
        GREETING,
        vec![("DEFINE wn parrot", Reply::Send("501 syntax error, illegal parameters\r\n"))],
    )
    .await;
    let connection = server.connect().await;

    let result = connection.get_definitions("parrot", &wordnet()).await;
    assert!(matches!(
        result,
        Err(DictError::UnexpectedStatus { actual: 501, .. })
    ));

    connection.close().await;
}

#[tokio::test]
async fn test_malformed_status() {
    let server = mock_server(
        GREETING,
        vec![("SHOW DB", Reply::Send("this is not a status line\r\n"))],
    )
    .await;
    let connection = server.connect().await;

    let result = connection.get_database_list().await;
    assert!(matches!(result, Err(DictError::MalformedStatus(_))));

    connection.close().await;
}

#[tokio::test]
async fn test_match_list() {
    let server = mock_server(
        GREETING,
        vec![(
            "MATCH wn prefix parrot",
            Reply::Send(concat!(
                "152 2 matches found\r\n",
                "wn \"parrot\"\r\n",
                "wn \"parroting\"\r\n",
                ".\r\n",
                "250 ok\r\n",
            )),
        )],
    )
    .await;
    let connection = server.connect().await;
    let mut events = connection.subscribe();

    let matches = connection
        .get_match_list("parrot", &MatchingStrategy::new("prefix", "Match prefixes"), &wordnet())
        .await
        .unwrap();

    assert_eq!(matches.into_vec(), vec!["parrot", "parroting"]);
    assert_eq!(
        events.try_recv().unwrap(),
        DictEvent::Completed { command: "MATCH" }
    );

    connection.close().await;
}

#[tokio::test]
async fn test_match_invalid_database_is_empty() {
    let server = mock_server(
        GREETING,
        vec![("MATCH nosuchdb prefix parrot", Reply::Send("550 invalid database\r\n"))],
    )
    .await;
    let connection = server.connect().await;
    let mut events = connection.subscribe();

    let matches = connection
        .get_match_list(
            "parrot",
            &MatchingStrategy::new("prefix", ""),
            &Database::new("nosuchdb", ""),
        )
        .await
        .unwrap();
    assert!(matches.is_empty());
    assert_eq!(
        events.try_recv().unwrap(),
        DictEvent::InvalidDatabase("nosuchdb".into())
    );

    connection.close().await;
}

#[tokio::test]
async fn test_match_no_match_is_empty() {
    let server = mock_server(
        GREETING,
        vec![("MATCH wn exact xyzzy", Reply::Send("552 no match\r\n"))],
    )
    .await;
    let connection = server.connect().await;
    let mut events = connection.subscribe();

    let matches = connection
        .get_match_list("xyzzy", &MatchingStrategy::new("exact", ""), &wordnet())
        .await
        .unwrap();
    assert!(matches.is_empty());
    assert_eq!(events.try_recv().unwrap(), DictEvent::NoMatch("xyzzy".into()));

    connection.close().await;
}

#[tokio::test]
async fn test_match_invalid_strategy_is_empty() {
    let server = mock_server(
        GREETING,
        vec![("MATCH * bogus parrot", Reply::Send("551 invalid strategy\r\n"))],
    )
    .await;
    let connection = server.connect().await;

    let matches = connection
        .get_match_list("parrot", &MatchingStrategy::new("bogus", ""), &Database::all())
        .await
        .unwrap();
    assert!(matches.is_empty());

    connection.close().await;
}

#[tokio::test]
async fn test_database_then_strategy_lists_stay_separate() {
    let server = mock_server(
        GREETING,
        vec![
            (
                "SHOW DB",
                Reply::Send(concat!(
                    "110 2 databases present\r\n",
                    "wn \"WordNet (r) 3.0 (2006)\"\r\n",
                    "foldoc \"The Free On-line Dictionary of Computing\"\r\n",
                    ".\r\n",
                    "250 ok\r\n",
                )),
            ),
            (
                "SHOW STRAT",
                Reply::Send(concat!(
                    "111 2 strategies available\r\n",
                    "exact \"Match headwords exactly\"\r\n",
                    "prefix \"Match prefixes\"\r\n",
                    ".\r\n",
                    "250 ok\r\n",
                )),
            ),
        ],
    )
    .await;
    let connection = server.connect().await;

    let databases = connection.get_database_list().await.unwrap();
    let strategies = connection.get_strategy_list().await.unwrap();

    assert_eq!(databases.keys().collect::<Vec<_>>(), vec!["wn", "foldoc"]);
    assert_eq!(
        databases.get("wn").unwrap().description(),
        "WordNet (r) 3.0 (2006)"
    );
    assert!(!databases.contains("exact"));
    assert_eq!(strategies.keys().collect::<Vec<_>>(), vec!["exact", "prefix"]);

    connection.close().await;
    assert_eq!(
        server.received().await,
        vec!["SHOW DB", "SHOW STRAT", "QUIT"]
    );
}

#[tokio::test]
async fn test_empty_lists() {
    let server = mock_server(
        GREETING,
        vec![
            ("SHOW DB", Reply::Send("554 no databases present\r\n")),
            ("SHOW STRAT", Reply::Send("555 no strategies available\r\n")),
        ],
    )
    .await;
    let connection = server.connect().await;

    assert!(connection.get_database_list().await.unwrap().is_empty());
    assert!(connection.get_strategy_list().await.unwrap().is_empty());

    connection.close().await;
}

#[tokio::test]
async fn test_database_info() {
    let server = mock_server(
        GREETING,
        vec![(
            "SHOW INFO wn",
            Reply::Send(concat!(
                "112 database information follows\r\n",
                "============ wn ============\r\n",
                "WordNet (r) 3.0 (2006)\r\n",
                "\r\n",
                "A large lexical database of English.\r\n",
                ".\r\n",
                "250 ok\r\n",
            )),
        )],
    )
    .await;
    let connection = server.connect().await;

    let info = connection.get_database_info(&wordnet()).await.unwrap();
    assert_eq!(
        info,
        "WordNet (r) 3.0 (2006)\n\nA large lexical database of English."
    );

    connection.close().await;
}

#[tokio::test]
async fn test_database_info_unknown_database_fails() {
    let server = mock_server(
        GREETING,
        vec![("SHOW INFO nosuchdb", Reply::Send("550 invalid database\r\n"))],
    )
    .await;
    let connection = server.connect().await;

    let result = connection
        .get_database_info(&Database::new("nosuchdb", ""))
        .await;
    assert!(matches!(result, Err(DictError::InvalidDatabase(name)) if name == "nosuchdb"));

    // Still usable afterwards.
    assert!(connection.is_open());
    connection.close().await;
}

#[tokio::test]
async fn test_database_info_sentinels_stay_local() {
    let server = mock_server(GREETING, vec![]).await;
    let connection = server.connect().await;

    assert_eq!(
        connection.get_database_info(&Database::all()).await.unwrap(),
        "Searching in all databases"
    );
    assert_eq!(
        connection
            .get_database_info(&Database::first_match())
            .await
            .unwrap(),
        "Searching in first database with match"
    );

    connection.close().await;
    assert_eq!(server.received().await, vec!["QUIT"]);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let server = mock_server(GREETING, vec![]).await;
    let connection = server.connect().await;
    let mut events = connection.subscribe();

    connection.close().await;
    connection.close().await;

    assert_eq!(events.try_recv().unwrap(), DictEvent::Closed);
    assert!(events.try_recv().is_err());
    assert_eq!(server.received().await, vec!["QUIT"]);
}

#[tokio::test]
async fn test_operations_after_close_fail() {
    let server = mock_server(GREETING, vec![]).await;
    let connection = server.connect().await;
    connection.close().await;

    assert!(matches!(
        connection.get_database_list().await,
        Err(DictError::NotConnected)
    ));
    assert!(matches!(
        connection.get_definitions("parrot", &wordnet()).await,
        Err(DictError::NotConnected)
    ));
}

#[tokio::test]
async fn test_close_unblocks_pending_operation() {
    let server = mock_server(GREETING, vec![("SHOW DB", Reply::Silent)]).await;
    let connection = Arc::new(server.connect().await);

    let pending = {
        let connection = Arc::clone(&connection);
        tokio::spawn(async move { connection.get_database_list().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    tokio::time::timeout(Duration::from_secs(5), connection.close())
        .await
        .expect("close should not hang");

    let result = pending.await.unwrap();
    assert!(matches!(result, Err(DictError::NotConnected)));
    assert_eq!(server.received().await, vec!["SHOW DB", "QUIT"]);
}

#[tokio::test]
async fn test_caller_queued_during_close_sends_nothing() {
    let server = mock_server(GREETING, vec![("SHOW DB", Reply::Silent)]).await;
    let connection = Arc::new(server.connect().await);

    let parked = {
        let connection = Arc::clone(&connection);
        tokio::spawn(async move { connection.get_database_list().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let queued = {
        let connection = Arc::clone(&connection);
        tokio::spawn(async move { connection.get_strategy_list().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    connection.close().await;

    assert!(matches!(parked.await.unwrap(), Err(DictError::NotConnected)));
    assert!(matches!(queued.await.unwrap(), Err(DictError::NotConnected)));
    assert_eq!(server.received().await, vec!["SHOW DB", "QUIT"]);
}

#[tokio::test]
async fn test_connect_default_uses_port_2628() {
    // Skip when something else already owns the DICT port on this host.
    let Ok(listener) = TcpListener::bind(("127.0.0.1", 2628)).await else {
        return;
    };
    let server = mock_server_on(listener, GREETING, vec![]);

    let connection = Connection::connect_default("127.0.0.1").await.unwrap();
    assert_eq!(connection.address().port, 2628);

    connection.close().await;
    assert_eq!(server.received().await, vec!["QUIT"]);
}

#[tokio::test]
async fn test_concurrent_callers_are_serialized() {
    let server = mock_server(
        GREETING,
        vec![
            (
                "SHOW DB",
                Reply::Send("110 1 databases present\r\nwn \"WordNet\"\r\n.\r\n250 ok\r\n"),
            ),
            (
                "SHOW STRAT",
                Reply::Send("111 1 strategies available\r\nexact \"Exact\"\r\n.\r\n250 ok\r\n"),
            ),
        ],
    )
    .await;
    let connection = Arc::new(server.connect().await);

    let dbs = {
        let connection = Arc::clone(&connection);
        tokio::spawn(async move { connection.get_database_list().await })
    };
    let strategies = {
        let connection = Arc::clone(&connection);
        tokio::spawn(async move { connection.get_strategy_list().await })
    };

    let dbs = dbs.await.unwrap().unwrap();
    let strategies = strategies.await.unwrap().unwrap();
    assert_eq!(dbs.keys().collect::<Vec<_>>(), vec!["wn"]);
    assert_eq!(strategies.keys().collect::<Vec<_>>(), vec!["exact"]);

    connection.close().await;
}

#[tokio::test]
async fn test_hang_up_mid_reply() {
    let server = mock_server(
        GREETING,
        vec![(
            "SHOW DB",
            Reply::HangUp("110 2 databases present\r\nwn \"WordNet\"\r\n"),
        )],
    )
    .await;
    let connection = server.connect().await;

    let result = connection.get_database_list().await;
    assert!(matches!(result, Err(DictError::Io(_))));
    assert!(!connection.is_open());
    assert!(matches!(
        connection.get_strategy_list().await,
        Err(DictError::NotConnected)
    ));

    let mut events = connection.subscribe();
    connection.close().await;
    assert_eq!(events.try_recv().unwrap(), DictEvent::Closed);
}

#[tokio::test]
async fn test_invalid_word_never_reaches_server() {
    let server = mock_server(GREETING, vec![]).await;
    let connection = server.connect().await;

    let result = connection.get_definitions("bad\r\nQUIT", &wordnet()).await;
    assert!(matches!(result, Err(DictError::InvalidArgument(_))));

    connection.close().await;
    assert_eq!(server.received().await, vec!["QUIT"]);
}
