use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use octech_core::{ChatDelays, ChatError, ChatSession};
use octech_schema::{ChatMessage, ContactInfo, Sender};

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Accept,
    Decline,
    Contact(ContactInfo),
    Say(String),
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    Some(match line {
        "quit" | "exit" => Input::Quit,
        "/accept" => Input::Accept,
        "/decline" => Input::Decline,
        _ => match line.strip_prefix("/contact ") {
            Some(rest) => {
                let (name, email) = rest.trim().rsplit_once(' ').unwrap_or((rest.trim(), ""));
                Input::Contact(ContactInfo {
                    name: name.trim().to_string(),
                    email: email.trim().to_string(),
                })
            }
            None => Input::Say(line.to_string()),
        },
    })
}

pub async fn run_repl() -> Result<()> {
    let session = ChatSession::new(ChatDelays::immediate());

    println!("octech chat REPL. Type 'quit' to exit.");
    println!("Commands: /accept, /decline, /contact <name> <email>");
    println!("---");

    let mut shown = print_new(&session, 0).await;

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let Some(input) = parse_input(&line) else {
            continue;
        };

        let result = match input {
            Input::Quit => break,
            Input::Accept => session.accept_handoff().await.map(|_| ()),
            Input::Decline => session.decline_handoff().await.map(|_| ()),
            Input::Contact(info) => session.submit_contact_info(&info).await.map(|_| ()),
            Input::Say(text) => session.send(&text).await.map(|_| ()),
        };

        if let Err(err) = result {
            report(&err);
            continue;
        }

        wait_until_idle(&session).await;
        shown = print_new(&session, shown).await;
    }

    session.close().await;
    Ok(())
}

fn report(err: &ChatError) {
    eprintln!("Error: {err}");
}

async fn wait_until_idle(session: &ChatSession) {
    while session.snapshot().await.typing {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn print_new(session: &ChatSession, shown: usize) -> usize {
    let messages = session.messages().await;
    for message in messages.iter().skip(shown) {
        println!("{}", render(message));
    }
    messages.len()
}

fn render(message: &ChatMessage) -> String {
    match message.sender {
        Sender::Bot => format!("bot: {}", message.text),
        Sender::User => format!("you: {}", message.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(parse_input("   "), None);
        assert_eq!(parse_input("quit"), Some(Input::Quit));
        assert_eq!(parse_input("/accept"), Some(Input::Accept));
        assert_eq!(parse_input("/decline\n"), Some(Input::Decline));
        assert_eq!(
            parse_input("/contact Ann Lee ann@example.com"),
            Some(Input::Contact(ContactInfo {
                name: "Ann Lee".into(),
                email: "ann@example.com".into(),
            }))
        );
        assert_eq!(
            parse_input("What services do you offer?"),
            Some(Input::Say("What services do you offer?".into()))
        );
    }

    #[tokio::test]
    async fn wait_until_idle_sees_immediate_reply() {
        let session = ChatSession::new(ChatDelays::immediate());
        session.send("how much does it cost?").await.unwrap();
        wait_until_idle(&session).await;

        let messages = session.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(render(&messages[2]), format!("bot: {}", octech_core::responder::PRICING));
    }
}
