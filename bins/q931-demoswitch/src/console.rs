use std::io::BufRead;
use std::thread;

use crossbeam_channel::Sender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Call the other interface from interface A
    Dial(String),
    /// Disconnect every call on interface A
    Hangup,
    /// Print the calls of both interfaces
    Calls,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Err("empty command".to_string());
        };
        match word {
            "dial" | "d" => match words.next() {
                Some(digits) if digits.chars().all(|c| c.is_ascii_digit() || c == '*' || c == '#') => {
                    Ok(Command::Dial(digits.to_string()))
                }
                Some(digits) => Err(format!("not a dialable number: {}", digits)),
                None => Err("usage: dial <digits>".to_string()),
            },
            "hangup" | "h" => Ok(Command::Hangup),
            "calls" | "c" => Ok(Command::Calls),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(format!("unknown command '{}', use: dial <digits> | hangup | calls | exit", word)),
        }
    }
}

/// Reads commands from stdin on its own thread. End of input counts as `exit`.
pub fn spawn(tx: Sender<Command>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        return;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        let _ = tx.send(Command::Exit);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("dial 4711"), Ok(Command::Dial("4711".to_string())));
        assert_eq!(Command::parse("  d *21#  "), Ok(Command::Dial("*21#".to_string())));
        assert_eq!(Command::parse("hangup"), Ok(Command::Hangup));
        assert_eq!(Command::parse("q"), Ok(Command::Exit));
        assert!(Command::parse("dial").is_err());
        assert!(Command::parse("dial 12a").is_err());
        assert!(Command::parse("transfer 12").is_err());
    }
}
