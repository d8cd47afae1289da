// Line-oriented driver for a topic session

use tokio::io::{AsyncBufReadExt, BufReader};
use tutor_types::ChatMessage;
use tutor_workflow::{GenerationOutcome, Submission, TopicSession};

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    CreateDocument,
    History,
    Logout,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/ktp" => Command::CreateDocument,
            "/history" => Command::History,
            "/logout" => Command::Logout,
            "/quit" | "/exit" => Command::Quit,
            cmd if cmd.starts_with('/') => Command::Unknown(cmd),
            _ => Command::Ask(line),
        }
    }
}

fn render(message: &ChatMessage) -> String {
    format!("[{}] {}: {}", message.timestamp, message.sender.label(), message.text)
}

pub async fn run(session: TopicSession) -> anyhow::Result<()> {
    println!("Topic: {}", session.topic().name);
    println!("Type a question, or /ktp, /history, /logout, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Ask(text) => {
                // Questions run in the background so several can be in flight
                let conversation = session.conversation().clone();
                let text = text.to_string();
                tokio::spawn(async move {
                    match conversation.submit_question(&text).await {
                        Ok(Submission::Answered { answer, .. }) => println!("{}", render(&answer)),
                        Ok(Submission::Ignored) | Ok(Submission::Discarded { .. }) => {}
                        Err(e) => println!("! Question not answered: {}", e),
                    }
                });
            }
            Command::CreateDocument => {
                println!("Generating KTP...");
                match session.create_document().await {
                    GenerationOutcome::Delivered { path, .. } => {
                        println!("Saved {}", path.display())
                    }
                    GenerationOutcome::Failed { message } => println!("{}", message),
                    GenerationOutcome::AlreadyRunning | GenerationOutcome::Discarded => {}
                }
            }
            Command::History => {
                for message in session.conversation().messages().await {
                    println!("{}", render(&message));
                }
                if let Some(notice) = session.documents().notice().await {
                    println!("{}", notice);
                }
            }
            Command::Logout => {
                session.logout().await?;
                println!("Logged out");
                return Ok(());
            }
            Command::Quit => break,
            Command::Unknown(cmd) => println!("Unknown command: {}", cmd),
        }
    }

    session.close().await;
    Ok(())
}
