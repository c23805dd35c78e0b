//! Shell Commands
//!
//! Parses whitespace-separated command lines and executes them against a
//! byte-valued store.

use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::storage::{ttl_from_millis, Store};

/// Errors produced while parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}. Type 'help' for available commands.")]
    Unknown(String),

    #[error("{verb} requires {usage}")]
    MissingArgument {
        verb: &'static str,
        usage: &'static str,
    },

    #[error("Invalid TTL '{0}': expected an integer number of milliseconds")]
    InvalidTtl(String),
}

/// Parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a value, a zero TTL means no expiration
    Put {
        key: String,
        value: Bytes,
        ttl: Duration,
    },

    Get { key: String },

    Del { key: String },

    Exists { key: String },

    /// Remaining lifetime in milliseconds
    Ttl { key: String },

    Keys,

    /// Remove every expired entry now
    Purge,

    Len,

    Clear,

    Stats,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(verb) = parts.first() else {
            return Err(CommandError::Empty);
        };

        let key = |verb: &'static str| -> Result<String, CommandError> {
            parts
                .get(1)
                .map(|k| k.to_string())
                .ok_or(CommandError::MissingArgument {
                    verb,
                    usage: "a key",
                })
        };

        match verb.to_uppercase().as_str() {
            "PUT" | "SET" => {
                if parts.len() < 3 {
                    return Err(CommandError::MissingArgument {
                        verb: "PUT",
                        usage: "key and value: PUT <key> <value> [ttl_ms]",
                    });
                }
                let ttl = match parts.get(3) {
                    Some(raw) => raw
                        .parse::<i64>()
                        .map(ttl_from_millis)
                        .map_err(|_| CommandError::InvalidTtl(raw.to_string()))?,
                    None => Duration::ZERO,
                };
                Ok(Command::Put {
                    key: parts[1].to_string(),
                    value: Bytes::copy_from_slice(parts[2].as_bytes()),
                    ttl,
                })
            }
            "GET" => Ok(Command::Get { key: key("GET")? }),
            "DEL" | "DELETE" => Ok(Command::Del { key: key("DEL")? }),
            "EXISTS" => Ok(Command::Exists {
                key: key("EXISTS")?,
            }),
            "TTL" => Ok(Command::Ttl { key: key("TTL")? }),
            "KEYS" => Ok(Command::Keys),
            "PURGE" => Ok(Command::Purge),
            "LEN" => Ok(Command::Len),
            "CLEAR" => Ok(Command::Clear),
            "STATS" => Ok(Command::Stats),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    /// Run the command against `store`
    pub fn execute(self, store: &Store<Bytes>) -> Reply {
        match self {
            Command::Put { key, value, ttl } => {
                store.put(key, value, ttl);
                Reply::Ok
            }
            Command::Get { key } => match store.get(&key) {
                Some(value) => Reply::Value(value),
                None => Reply::Nil,
            },
            Command::Del { key } => Reply::Integer(store.delete(&key) as i64),
            Command::Exists { key } => Reply::Integer(store.contains_key(&key) as i64),
            Command::Ttl { key } => Reply::Integer(match store.ttl(&key) {
                None => -2,
                Some(None) => -1,
                Some(Some(remaining)) => remaining.as_millis() as i64,
            }),
            Command::Keys => {
                let mut keys = store.keys();
                keys.sort();
                Reply::Keys(keys)
            }
            Command::Purge => Reply::Integer(store.purge_expired() as i64),
            Command::Len => Reply::Integer(store.len() as i64),
            Command::Clear => {
                store.clear();
                Reply::Ok
            }
            Command::Stats => Reply::Text(store.stats().to_string()),
        }
    }
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Nil,
    Value(Bytes),
    Integer(i64),
    Keys(Vec<String>),
    Text(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Value(v) => write!(f, "{:?}", String::from_utf8_lossy(v)),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Keys(keys) if keys.is_empty() => write!(f, "(empty list)"),
            Reply::Keys(keys) => {
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {:?}", i + 1, key)?;
                }
                Ok(())
            }
            Reply::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn run(store: &Store<Bytes>, line: &str) -> Reply {
        line.parse::<Command>().unwrap().execute(store)
    }

    #[test]
    fn test_parse_put() {
        let cmd: Command = "put k v 1500".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Put {
                key: "k".into(),
                value: Bytes::from_static(b"v"),
                ttl: Duration::from_millis(1500),
            }
        );
    }

    #[test]
    fn test_parse_non_positive_ttl() {
        for line in ["PUT k v", "PUT k v 0", "PUT k v -100"] {
            match line.parse::<Command>().unwrap() {
                Command::Put { ttl, .. } => assert_eq!(ttl, Duration::ZERO),
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "FLY away".parse::<Command>(),
            Err(CommandError::Unknown("FLY".into()))
        );
        assert!(matches!(
            "GET".parse::<Command>(),
            Err(CommandError::MissingArgument { verb: "GET", .. })
        ));
        assert!(matches!(
            "PUT k".parse::<Command>(),
            Err(CommandError::MissingArgument { verb: "PUT", .. })
        ));
        assert_eq!(
            "PUT k v soon".parse::<Command>(),
            Err(CommandError::InvalidTtl("soon".into()))
        );
    }

    #[test]
    fn test_session() {
        let store = Store::new();

        assert_eq!(run(&store, "PUT name ttlkv"), Reply::Ok);
        assert_eq!(run(&store, "GET name").to_string(), "\"ttlkv\"");
        assert_eq!(run(&store, "EXISTS name"), Reply::Integer(1));
        assert_eq!(run(&store, "TTL name"), Reply::Integer(-1));
        assert_eq!(run(&store, "TTL other"), Reply::Integer(-2));
        assert_eq!(run(&store, "DEL name"), Reply::Integer(1));
        assert_eq!(run(&store, "DEL name"), Reply::Integer(0));
        assert_eq!(run(&store, "GET name").to_string(), "(nil)");
    }

    #[test]
    fn test_expiry_and_purge() {
        let store = Store::new();
        run(&store, "PUT a 1 5");
        run(&store, "PUT b 2 5");
        run(&store, "PUT c 3");
        thread::sleep(Duration::from_millis(20));

        assert_eq!(run(&store, "LEN"), Reply::Integer(3));
        assert_eq!(run(&store, "PURGE"), Reply::Integer(2));
        assert_eq!(run(&store, "KEYS").to_string(), "1) \"c\"");
        assert_eq!(run(&store, "CLEAR"), Reply::Ok);
        assert_eq!(run(&store, "KEYS").to_string(), "(empty list)");
    }

    #[test]
    fn test_replies_escape_quotes() {
        let store = Store::new();
        run(&store, r#"PUT a"b say"hi""#);

        assert_eq!(run(&store, r#"GET a"b"#).to_string(), r#""say\"hi\"""#);
        assert_eq!(run(&store, "KEYS").to_string(), r#"1) "a\"b""#);
    }

    #[test]
    fn test_stats_reply() {
        let store = Store::new();
        run(&store, "GET missing");
        let reply = run(&store, "STATS").to_string();
        assert!(reply.contains("misses=1"), "{}", reply);
    }
}
