//! Support chat handler

use std::io::BufRead;

use crate::cli::output::*;
use crate::services::PincodeServices;
use crate::support::SupportConversation;
use crate::support::SUPPORT_GREETING;
use crate::Result;

pub async fn handle_support_command(
    services: &PincodeServices,
    message: Option<String>,
    interactive: bool,
) -> Result<()> {
    let mut conversation = SupportConversation::default();
    println!("🤖 {SUPPORT_GREETING}");

    if let Some(message) = message {
        println!("👤 {message}");
        let reply = services.support.reply(&mut conversation, &message).await?;
        println!("🤖 {reply}");
    }

    if !interactive {
        return Ok(());
    }

    print_info("Type a message, or 'exit' to quit");
    let stdin = std::io::stdin();
    loop {
        print_prompt("👤 ");
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        let reply = services.support.reply(&mut conversation, line).await?;
        println!("🤖 {reply}");
    }
    Ok(())
}
